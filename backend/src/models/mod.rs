pub mod log_entry;

pub use log_entry::{NewLogEntry, PathCount, PathEntry, StatsResponse};
