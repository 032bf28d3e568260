//! Core data structures: multistep forecast arrays and time-indexed tables.

mod multistep;
mod table;

pub use multistep::{MultistepArray, ValueLayout};
pub use table::{FlowTable, FlowTableBuilder};
