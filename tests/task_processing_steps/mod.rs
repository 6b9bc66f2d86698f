//! Step definitions for task processing scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
