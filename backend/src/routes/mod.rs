pub mod intercepted;
pub mod stats;
