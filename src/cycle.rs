//! Render cycle: one upload taken through load, preview and charting.
//!
//! A cycle owns everything derived from the upload. The page keeps at most
//! one and replaces it wholesale on the next upload.

use crate::charts::ChartSet;
use crate::config::PREVIEW_ROWS;
use crate::data::{DataLoader, DataProcessor, PreviewTable, UploadedFile};
use crate::error::VisualizerError;

/// Result of loading the upload.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The file could not be turned into a dataset; nothing else is shown.
    LoadFailed(VisualizerError),
    /// Preview is always shown; charts may still be refused.
    Loaded {
        rows: usize,
        columns: usize,
        preview: PreviewTable,
        charts: Result<ChartSet, VisualizerError>,
    },
}

#[derive(Debug)]
pub struct RenderCycle {
    /// Distinguishes widget ids between cycles
    pub id: u64,
    pub file_name: String,
    pub outcome: CycleOutcome,
}

impl RenderCycle {
    /// Run the whole straight-line flow for one upload.
    pub fn run(id: u64, file: &UploadedFile) -> Self {
        let outcome = match DataLoader::load(file) {
            Err(e) => {
                Self::log_failure(&file.name, &e);
                CycleOutcome::LoadFailed(e)
            }
            Ok(df) => {
                log::info!(
                    "Loaded {}: {} rows, {} columns",
                    file.name,
                    df.height(),
                    df.width()
                );
                let preview = DataProcessor::preview(&df, PREVIEW_ROWS);
                let charts = ChartSet::from_dataframe(&df);
                if let Err(e) = &charts {
                    Self::log_failure(&file.name, e);
                }
                CycleOutcome::Loaded {
                    rows: df.height(),
                    columns: df.width(),
                    preview,
                    charts,
                }
            }
        };

        Self {
            id,
            file_name: file.name.clone(),
            outcome,
        }
    }

    fn log_failure(file_name: &str, error: &VisualizerError) {
        if error.is_recognized() {
            log::warn!("{}: {}", file_name, error);
        } else {
            log::error!("{}: {}", file_name, error);
        }
    }

    pub fn preview(&self) -> Option<&PreviewTable> {
        match &self.outcome {
            CycleOutcome::Loaded { preview, .. } => Some(preview),
            CycleOutcome::LoadFailed(_) => None,
        }
    }

    pub fn charts(&self) -> Option<&ChartSet> {
        match &self.outcome {
            CycleOutcome::Loaded {
                charts: Ok(charts), ..
            } => Some(charts),
            _ => None,
        }
    }

    /// The error that ended this cycle early, if any.
    pub fn error(&self) -> Option<&VisualizerError> {
        match &self.outcome {
            CycleOutcome::LoadFailed(e) => Some(e),
            CycleOutcome::Loaded { charts: Err(e), .. } => Some(e),
            CycleOutcome::Loaded { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartKind;

    #[test]
    fn txt_upload_shows_only_the_unsupported_message() {
        let file = UploadedFile::new("data.txt", b"a,b\n1,2\n".to_vec());
        let cycle = RenderCycle::run(1, &file);

        assert!(cycle.preview().is_none());
        assert!(cycle.charts().is_none());
        let error = cycle.error().unwrap();
        assert!(matches!(error, VisualizerError::UnsupportedFormat { .. }));
        assert_eq!(
            error.to_string(),
            "Unsupported file format. Please upload a CSV or Excel file."
        );
    }

    #[test]
    fn one_numeric_column_previews_then_refuses_charts() {
        let file = UploadedFile::new("data.csv", b"value,name\n1,a\n2,b\n3,c\n".to_vec());
        let cycle = RenderCycle::run(2, &file);

        let preview = cycle.preview().unwrap();
        assert_eq!(preview.headers, vec!["value", "name"]);
        assert_eq!(preview.rows.len(), 3);
        assert!(cycle.charts().is_none());
        assert!(matches!(
            cycle.error(),
            Some(VisualizerError::InsufficientNumericColumns { found: 1 })
        ));
    }

    #[test]
    fn valid_csv_previews_five_rows_and_builds_charts() {
        let mut content = String::from("x,y,label\n");
        for i in 0..12 {
            content.push_str(&format!("{},{},row{}\n", i, i * i, i));
        }
        let file = UploadedFile::new("Data.CSV", content.into_bytes());
        let cycle = RenderCycle::run(3, &file);

        assert!(cycle.error().is_none());
        let preview = cycle.preview().unwrap();
        assert_eq!(preview.rows.len(), PREVIEW_ROWS);
        assert_eq!(preview.rows[4], vec!["4", "16", "row4"]);

        let charts = cycle.charts().unwrap();
        assert_eq!(charts.len(), 9, "12 distinct x values leave out the pie");
        assert_eq!(charts.kinds()[0], ChartKind::Scatter);

        match &cycle.outcome {
            CycleOutcome::Loaded { rows, columns, .. } => {
                assert_eq!((*rows, *columns), (12, 3));
            }
            other => panic!("expected a loaded cycle, got {:?}", other),
        }
    }

    #[test]
    fn empty_csv_is_an_unrecognized_failure() {
        let file = UploadedFile::new("empty.csv", Vec::new());
        let cycle = RenderCycle::run(4, &file);

        assert!(cycle.preview().is_none());
        match cycle.error() {
            Some(error @ VisualizerError::Parse(_)) => assert!(!error.is_recognized()),
            other => panic!("expected a CSV parse failure, got {:?}", other),
        }
    }
}
