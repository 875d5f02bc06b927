//! Dataset Loader Module
//! Turns an uploaded CSV or Excel file into a Polars DataFrame.

use crate::config::{CSV_INFER_SCHEMA_ROWS, SUPPORTED_EXTENSIONS};
use crate::error::{VisualizerError, VisualizerResult};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use polars::prelude::*;
use std::collections::HashMap;
use std::io::Cursor;

/// A file handed over by the upload control: its name and raw content.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Text after the final dot. A name without a dot is returned whole.
    pub fn extension(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or_default()
    }
}

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Excel,
}

impl FileFormat {
    /// Resolve the format from a file extension, ignoring ASCII case.
    pub fn from_extension(extension: &str) -> VisualizerResult<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xls" | "xlsx" => Ok(FileFormat::Excel),
            _ => Err(VisualizerError::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    pub fn is_supported(extension: &str) -> bool {
        SUPPORTED_EXTENSIONS
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

/// Loads uploaded files into DataFrames.
pub struct DataLoader;

impl DataLoader {
    /// Dispatch on the file extension and parse the content.
    pub fn load(file: &UploadedFile) -> VisualizerResult<DataFrame> {
        let format = FileFormat::from_extension(file.extension())?;
        log::debug!("Loading {} as {:?}", file.name, format);

        match format {
            FileFormat::Csv => Self::load_csv(&file.bytes),
            FileFormat::Excel => Self::load_excel(&file.bytes),
        }
    }

    /// Parse comma-separated content with a header row.
    pub fn load_csv(bytes: &[u8]) -> VisualizerResult<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(CSV_INFER_SCHEMA_ROWS))
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()?;
        Ok(df)
    }

    /// Parse the first worksheet of an xls/xlsx workbook.
    pub fn load_excel(bytes: &[u8]) -> VisualizerResult<DataFrame> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(VisualizerError::EmptyWorkbook)??;
        Self::range_to_dataframe(&range)
    }

    /// Convert a worksheet range to a DataFrame. The first row holds the headers.
    pub fn range_to_dataframe(range: &Range<Data>) -> VisualizerResult<DataFrame> {
        let mut rows = range.rows();
        let header = rows.next().ok_or(VisualizerError::EmptyWorkbook)?;
        let body: Vec<&[Data]> = rows.collect();

        let columns: Vec<Column> = Self::header_names(header)
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let cells: Vec<Option<&Data>> = body.iter().map(|row| row.get(idx)).collect();
                Self::build_column(name, &cells)
            })
            .collect();

        Ok(DataFrame::new(columns)?)
    }

    /// Header labels with blanks named by position and repeats suffixed `.1`, `.2`, ...
    fn header_names(header: &[Data]) -> Vec<String> {
        let mut seen: HashMap<String, usize> = HashMap::new();

        header
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let base = match cell {
                    Data::Empty => format!("Unnamed: {}", idx),
                    other => other.to_string(),
                };
                let count = seen.entry(base.clone()).or_insert(0);
                let name = if *count == 0 {
                    base
                } else {
                    format!("{}.{}", base, count)
                };
                *count += 1;
                name
            })
            .collect()
    }

    /// Infer one column type from its cells: integers, floats, booleans, else text.
    fn build_column(name: String, cells: &[Option<&Data>]) -> Column {
        let filled: Vec<&Data> = cells
            .iter()
            .flatten()
            .copied()
            .filter(|cell| !matches!(cell, Data::Empty))
            .collect();

        let is_numeric = filled
            .iter()
            .all(|cell| matches!(cell, Data::Int(_) | Data::Float(_)));
        let is_bool = filled.iter().all(|cell| matches!(cell, Data::Bool(_)));

        if filled.is_empty() || is_numeric {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|cell| match cell {
                    Some(Data::Int(v)) => Some(*v as f64),
                    Some(Data::Float(v)) => Some(*v),
                    _ => None,
                })
                .collect();

            let integral = !filled.is_empty()
                && values
                    .iter()
                    .flatten()
                    .all(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64);

            if integral {
                let ints: Vec<Option<i64>> = values.iter().map(|v| v.map(|x| x as i64)).collect();
                Column::new(name.into(), ints)
            } else {
                Column::new(name.into(), values)
            }
        } else if is_bool {
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|cell| match cell {
                    Some(Data::Bool(b)) => Some(*b),
                    _ => None,
                })
                .collect();
            Column::new(name.into(), values)
        } else {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|cell| match cell {
                    None | Some(Data::Empty) => None,
                    Some(other) => Some(other.to_string()),
                })
                .collect();
            Column::new(name.into(), values)
        }
    }
}
