//! Task processing pipeline.
//!
//! A task represents one request to process an image. The module covers the
//! whole lifecycle: resolving the submitted reference to a local file,
//! assigning a price, persisting the pending task, generating resized
//! variants, and recording the terminal `completed` or `failed` state. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
