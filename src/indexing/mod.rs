//! Index construction from a source tree

pub mod builder;
pub mod errors;

pub use builder::{IndexBuilder, IndexReport};
pub use errors::{ErrorReport, FileError, ProcessingStage};
