//! Gateway implementations that need no network.

mod memory;

pub use memory::{MemoryGateway, Operation};
