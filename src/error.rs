//! Error types for loading and charting.

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisualizerError {
    #[error("Unsupported file format. Please upload a CSV or Excel file.")]
    UnsupportedFormat { extension: String },

    #[error("Dataset must have at least two numerical columns for visualization.")]
    InsufficientNumericColumns { found: usize },

    #[error("Failed to parse data: {0}")]
    Parse(#[from] PolarsError),

    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Spreadsheet has no readable worksheet")]
    EmptyWorkbook,
}

impl VisualizerError {
    /// The two conditions the page reports as plain messages. Everything else
    /// is an unexpected failure of the file or the underlying libraries.
    pub fn is_recognized(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat { .. } | Self::InsufficientNumericColumns { .. }
        )
    }
}

pub type VisualizerResult<T> = Result<T, VisualizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_messages_match_page_text() {
        let unsupported = VisualizerError::UnsupportedFormat {
            extension: "txt".into(),
        };
        assert_eq!(
            unsupported.to_string(),
            "Unsupported file format. Please upload a CSV or Excel file."
        );
        assert!(unsupported.is_recognized());

        let insufficient = VisualizerError::InsufficientNumericColumns { found: 1 };
        assert_eq!(
            insufficient.to_string(),
            "Dataset must have at least two numerical columns for visualization."
        );
        assert!(insufficient.is_recognized());

        assert!(!VisualizerError::EmptyWorkbook.is_recognized());
    }
}
