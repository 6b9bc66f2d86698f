//! Image tasks: queued, asynchronous generation of resized image variants.
//!
//! A client submits a reference to an image (a local path or a remote URL).
//! The reference is acquired into a managed input directory, a priced task is
//! persisted in the `pending` state, and a background worker derives one
//! resized copy per configured width before moving the task to `completed`
//! or `failed`.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (filesystem, HTTP, memory)
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, source acquisition and variant generation
//! - [`http`]: JSON API exposing task creation and lookup
//! - [`config`]: Pipeline and server configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod http;
pub mod task;
pub mod telemetry;
