//! In-memory task and image stores.

mod image;
mod task;

pub use image::InMemoryImageRepository;
pub use task::InMemoryTaskRepository;
