//! Data Processor Module
//! Numeric column selection and the head-of-table preview.

use crate::error::VisualizerResult;
use polars::prelude::*;

/// A numeric column widened to f64. Missing values (null or NaN) are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl NumericColumn {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Present values in row order.
    pub fn finite_values(&self) -> Vec<f64> {
        self.values.iter().flatten().copied().collect()
    }
}

/// First rows of a dataset rendered as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Handles column selection and preview extraction.
pub struct DataProcessor;

impl DataProcessor {
    /// Whether a dtype supports arithmetic. Booleans, strings and dates do not.
    pub fn is_numeric_dtype(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        )
    }

    /// Names of the numeric columns, in dataset order.
    pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| Self::is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// The numeric subset of a dataset, values widened to f64.
    pub fn numeric_columns(df: &DataFrame) -> VisualizerResult<Vec<NumericColumn>> {
        Self::numeric_column_names(df)
            .iter()
            .map(|name| -> VisualizerResult<NumericColumn> {
                let col = df.column(name)?;
                let value_f64 = col.cast(&DataType::Float64)?;
                let values = value_f64
                    .f64()?
                    .into_iter()
                    .map(|v| v.filter(|x| !x.is_nan()))
                    .collect();
                Ok(NumericColumn::new(name.clone(), values))
            })
            .collect()
    }

    /// The first `n` rows with every column, formatted for display.
    pub fn preview(df: &DataFrame, n: usize) -> PreviewTable {
        let head = df.head(Some(n));
        let headers = head
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let rows = (0..head.height())
            .map(|i| {
                head.get_columns()
                    .iter()
                    .map(|col| {
                        col.get(i)
                            .map(|val| Self::format_cell(&val))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        PreviewTable { headers, rows }
    }

    /// Text cells are shown verbatim; Display would wrap them in quotes.
    fn format_cell(val: &AnyValue) -> String {
        match val {
            AnyValue::Null => "NaN".to_string(),
            AnyValue::String(s) => s.to_string(),
            AnyValue::StringOwned(s) => s.to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            "a" => [1i64, 2, 3, 4, 5, 6, 7],
            "label" => ["p", "q", "r", "s", "t", "u", "v"],
            "b" => [Some(0.5), None, Some(1.5), Some(2.5), Some(3.5), Some(f64::NAN), Some(5.5)],
            "flag" => [true, false, true, false, true, false, true]
        )
        .unwrap()
    }

    #[test]
    fn numeric_subset_keeps_dataset_order() {
        let df = sample();
        assert_eq!(DataProcessor::numeric_column_names(&df), vec!["a", "b"]);

        let cols = DataProcessor::numeric_columns(&df).unwrap();
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].name, "a");
        assert_eq!(cols[0].values[0], Some(1.0));
        assert_eq!(cols[1].values[1], None);
        assert_eq!(cols[1].values[5], None, "NaN counts as missing");
        assert_eq!(cols[1].finite_values().len(), 5);
    }

    #[test]
    fn preview_is_first_five_rows_with_all_columns() {
        let df = sample();
        let preview = DataProcessor::preview(&df, 5);

        assert_eq!(preview.headers, vec!["a", "label", "b", "flag"]);
        assert_eq!(preview.rows.len(), 5);
        assert!(preview.rows.iter().all(|row| row.len() == 4));
        assert_eq!(preview.rows[0][0], "1");
        assert_eq!(preview.rows[0][1], "p");
        assert_eq!(preview.rows[1][2], "NaN");
    }

    #[test]
    fn preview_keeps_quotes_that_are_part_of_the_text() {
        let df = df!(
            "quote" => ["\"hi\"", "plain", "'single'"],
            "n" => [1i64, 2, 3]
        )
        .unwrap();
        let preview = DataProcessor::preview(&df, 5);

        assert_eq!(preview.rows[0][0], "\"hi\"");
        assert_eq!(preview.rows[1][0], "plain");
        assert_eq!(preview.rows[2][0], "'single'");
    }

    #[test]
    fn preview_of_short_dataset_shows_every_row() {
        let df = df!("x" => [1i64, 2], "y" => [3i64, 4]).unwrap();
        let preview = DataProcessor::preview(&df, 5);
        assert_eq!(preview.rows, vec![vec!["1", "3"], vec!["2", "4"]]);
    }
}
