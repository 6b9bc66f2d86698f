//! Adapter implementations of the task ports.

pub mod files;
pub mod imaging;
pub mod memory;
