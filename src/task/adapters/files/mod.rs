//! Filesystem and HTTP source acquisition.

mod download;
mod local;
mod resolver;

pub use local::normalize_local_reference;
pub use resolver::FileSourceResolver;
