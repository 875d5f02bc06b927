//! Application constants and viewer layout settings.

/// Window and page title
pub const APP_TITLE: &str = "Dataset Visualizer with 10 Charts";

/// Label of the upload control
pub const UPLOAD_PROMPT: &str = "Upload a CSV or Excel file";

/// Extensions accepted by the loader (compared case-insensitively)
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["csv", "xls", "xlsx"];

/// Rows shown in the data preview
pub const PREVIEW_ROWS: usize = 5;

/// Charts need at least this many numeric columns
pub const MIN_NUMERIC_COLUMNS: usize = 2;

/// Pie chart is drawn only when the first numeric column has fewer distinct values
pub const PIE_MAX_DISTINCT: usize = 10;

/// Rows scanned by the CSV reader for schema inference
pub const CSV_INFER_SCHEMA_ROWS: usize = 10_000;

/// Upper limit on histogram bins; wider spreads fall back to Sturges' rule
pub const HISTOGRAM_MAX_BINS: usize = 1_000;

/// Evaluation points for the histogram density overlay and the KDE chart
pub const KDE_GRID_POINTS: usize = 200;

/// Evaluation points per violin
pub const VIOLIN_GRID_POINTS: usize = 100;

/// KDE support extends this many bandwidths past the data range
pub const KDE_CUT: f64 = 3.0;
pub const VIOLIN_CUT: f64 = 2.0;

/// Initial window geometry
pub const WINDOW_SIZE: [f32; 2] = [1400.0, 900.0];
pub const WINDOW_MIN_SIZE: [f32; 2] = [1000.0, 650.0];

/// Layout sizes used by the chart viewer.
#[derive(Debug, Clone, Copy)]
pub struct ViewerSettings {
    pub chart_height: f32,
    pub card_width: f32,
    pub pair_cell_size: f32,
    pub card_spacing: f32,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            chart_height: 360.0,
            card_width: 780.0,
            pair_cell_size: 150.0,
            card_spacing: 15.0,
        }
    }
}
