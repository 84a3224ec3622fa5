extern crate self as mempool_core;

pub mod log;
pub mod panic;
pub mod signals;
pub mod task;
pub mod time;

pub use ::log::{debug, error, info, trace, warn};
