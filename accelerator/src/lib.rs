//! Client for the transaction accelerator of the mempool services backend.
//!
//! [`AccelerationClient`] reads the currently active accelerations and the acceleration history
//! over HTTP, and tells whether a mined block was produced by a pool credited with any of them.

pub mod block;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod monitor;
pub mod outcome;

#[cfg(test)]
pub(crate) mod testing;

pub use block::{is_accelerated_block, MinedBlock};
pub use client::AccelerationClient;
pub use config::AcceleratorConfig;
pub use model::{Acceleration, AccelerationHistory, PoolId};
pub use outcome::FetchOutcome;
