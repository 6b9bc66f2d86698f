//! Port contracts for image task processing.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod image_repository;
pub mod repository;
pub mod source;
pub mod variants;

pub use image_repository::{ImageRepository, ImageRepositoryError, ImageRepositoryResult};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use source::{AcquisitionError, AcquisitionResult, SourceResolver};
pub use variants::{ProcessingError, ProcessingResult, VariantGenerator};

#[cfg(test)]
pub use source::MockSourceResolver;
#[cfg(test)]
pub use variants::MockVariantGenerator;
