//! Data module - file loading and column selection

mod loader;
mod processor;

pub use loader::{DataLoader, FileFormat, UploadedFile};
pub use processor::{DataProcessor, NumericColumn, PreviewTable};
