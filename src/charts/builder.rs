//! Chart Builder Module
//! Computes the ten chart payloads from the numeric columns of a dataset.
//!
//! Order:
//! 1. Scatter of the first two numeric columns
//! 2. Histogram with density overlay of the first column
//! 3. Box plot of every numeric column
//! 4. Pair grid of every numeric column
//! 5. Correlation heatmap
//! 6. Line plot against row position
//! 7. Bar plot of column means
//! 8. Violin plot of every numeric column
//! 9. Filled KDE of the first column
//! 10. Pie of value frequencies of the first column (low cardinality only)

use crate::config::{
    KDE_CUT, KDE_GRID_POINTS, MIN_NUMERIC_COLUMNS, PIE_MAX_DISTINCT, VIOLIN_CUT,
    VIOLIN_GRID_POINTS,
};
use crate::data::{DataProcessor, NumericColumn};
use crate::error::{VisualizerError, VisualizerResult};
use crate::stats::{BoxSummary, GaussianKde, HistogramBin, StatsCalculator, ValueCount};
use polars::prelude::DataFrame;
use rayon::prelude::*;

/// Half of the horizontal room a violin may take around its center
const VIOLIN_HALF_WIDTH: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Scatter,
    Histogram,
    Box,
    PairGrid,
    CorrelationHeatmap,
    Line,
    MeanBar,
    Violin,
    Kde,
    Pie,
}

impl ChartKind {
    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Histogram => "Histogram",
            ChartKind::Box => "Box Plot",
            ChartKind::PairGrid => "Pair Plot",
            ChartKind::CorrelationHeatmap => "Correlation Heatmap",
            ChartKind::Line => "Line Plot",
            ChartKind::MeanBar => "Bar Plot of Means",
            ChartKind::Violin => "Violin Plot",
            ChartKind::Kde => "KDE Plot",
            ChartKind::Pie => "Pie Chart",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScatterChart {
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone)]
pub struct HistogramChart {
    pub label: String,
    pub bins: Vec<HistogramBin>,
    /// Density curve scaled to bin counts
    pub density: Vec<[f64; 2]>,
}

#[derive(Debug, Clone)]
pub struct LabeledBox {
    pub label: String,
    pub summary: BoxSummary,
}

#[derive(Debug, Clone)]
pub struct BoxChart {
    pub boxes: Vec<LabeledBox>,
}

#[derive(Debug, Clone)]
pub enum PairCell {
    Histogram(Vec<HistogramBin>),
    Scatter(Vec<[f64; 2]>),
}

#[derive(Debug, Clone)]
pub struct PairGridChart {
    pub labels: Vec<String>,
    /// `cells[row][col]`; the diagonal holds histograms
    pub cells: Vec<Vec<PairCell>>,
}

#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(f64::NAN)
    }
}

#[derive(Debug, Clone)]
pub struct LineSeries {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone)]
pub struct LineChart {
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone)]
pub struct MeanBar {
    pub label: String,
    pub mean: f64,
}

#[derive(Debug, Clone)]
pub struct MeanBarChart {
    pub bars: Vec<MeanBar>,
}

#[derive(Debug, Clone)]
pub struct Violin {
    pub label: String,
    /// `[value, half_width]` pairs along the value axis
    pub outline: Vec<[f64; 2]>,
    pub summary: BoxSummary,
}

#[derive(Debug, Clone)]
pub struct ViolinChart {
    pub violins: Vec<Violin>,
}

#[derive(Debug, Clone)]
pub struct KdeChart {
    pub label: String,
    pub curve: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub value: f64,
    pub count: usize,
    pub fraction: f64,
}

impl PieSlice {
    pub fn label(&self) -> String {
        format_value(self.value)
    }

    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.fraction * 100.0)
    }
}

#[derive(Debug, Clone)]
pub struct PieChart {
    pub label: String,
    pub slices: Vec<PieSlice>,
}

/// One computed chart, ready for plotting.
#[derive(Debug, Clone)]
pub enum Chart {
    Scatter(ScatterChart),
    Histogram(HistogramChart),
    Box(BoxChart),
    PairGrid(PairGridChart),
    CorrelationHeatmap(CorrelationMatrix),
    Line(LineChart),
    MeanBar(MeanBarChart),
    Violin(ViolinChart),
    Kde(KdeChart),
    Pie(PieChart),
}

impl Chart {
    pub fn kind(&self) -> ChartKind {
        match self {
            Chart::Scatter(_) => ChartKind::Scatter,
            Chart::Histogram(_) => ChartKind::Histogram,
            Chart::Box(_) => ChartKind::Box,
            Chart::PairGrid(_) => ChartKind::PairGrid,
            Chart::CorrelationHeatmap(_) => ChartKind::CorrelationHeatmap,
            Chart::Line(_) => ChartKind::Line,
            Chart::MeanBar(_) => ChartKind::MeanBar,
            Chart::Violin(_) => ChartKind::Violin,
            Chart::Kde(_) => ChartKind::Kde,
            Chart::Pie(_) => ChartKind::Pie,
        }
    }

    pub fn title(&self) -> &'static str {
        self.kind().title()
    }
}

/// Per-column data shared by several charts.
struct ColumnSummary {
    finite: Vec<f64>,
    summary: BoxSummary,
    kde: Option<GaussianKde>,
}

impl ColumnSummary {
    fn compute(column: &NumericColumn) -> Self {
        let finite = column.finite_values();
        let summary = StatsCalculator::box_summary(&finite);
        let kde = GaussianKde::new(&finite);
        Self {
            finite,
            summary,
            kde,
        }
    }
}

/// The charts of one render cycle, in display order.
#[derive(Debug, Clone)]
pub struct ChartSet {
    pub numeric_columns: Vec<String>,
    pub charts: Vec<Chart>,
}

impl ChartSet {
    /// Select the numeric columns of a dataset and build the charts.
    pub fn from_dataframe(df: &DataFrame) -> VisualizerResult<Self> {
        let columns = DataProcessor::numeric_columns(df)?;
        Self::build(&columns)
    }

    /// Build every chart. Fails when fewer than two numeric columns exist.
    pub fn build(columns: &[NumericColumn]) -> VisualizerResult<Self> {
        if columns.len() < MIN_NUMERIC_COLUMNS {
            return Err(VisualizerError::InsufficientNumericColumns {
                found: columns.len(),
            });
        }

        let summaries: Vec<ColumnSummary> =
            columns.par_iter().map(ColumnSummary::compute).collect();
        let first = &columns[0];
        let first_summary = &summaries[0];

        let mut charts = vec![
            Chart::Scatter(Self::scatter(first, &columns[1])),
            Chart::Histogram(Self::histogram(first, first_summary)),
            Chart::Box(Self::box_plot(columns, &summaries)),
            Chart::PairGrid(Self::pair_grid(columns, &summaries)),
            Chart::CorrelationHeatmap(Self::correlation(columns)),
            Chart::Line(Self::line(columns)),
            Chart::MeanBar(Self::mean_bars(columns, &summaries)),
            Chart::Violin(Self::violins(columns, &summaries)),
            Chart::Kde(Self::kde(first, first_summary)),
        ];

        let value_counts = StatsCalculator::value_counts(&first_summary.finite);
        let include_pie = value_counts.len() < PIE_MAX_DISTINCT;
        if include_pie {
            charts.push(Chart::Pie(Self::pie(first, &value_counts)));
        }

        log::info!(
            "Built {} charts over {} numeric columns (pie included: {})",
            charts.len(),
            columns.len(),
            include_pie
        );

        Ok(Self {
            numeric_columns: columns.iter().map(|c| c.name.clone()).collect(),
            charts,
        })
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    #[allow(dead_code)]
    pub fn kinds(&self) -> Vec<ChartKind> {
        self.charts.iter().map(Chart::kind).collect()
    }

    pub fn has_pie(&self) -> bool {
        self.charts.iter().any(|c| c.kind() == ChartKind::Pie)
    }

    fn paired_points(x: &NumericColumn, y: &NumericColumn) -> Vec<[f64; 2]> {
        x.values
            .iter()
            .zip(y.values.iter())
            .filter_map(|(a, b)| Some([(*a)?, (*b)?]))
            .collect()
    }

    fn scatter(x: &NumericColumn, y: &NumericColumn) -> ScatterChart {
        ScatterChart {
            x_label: x.name.clone(),
            y_label: y.name.clone(),
            points: Self::paired_points(x, y),
        }
    }

    fn histogram(column: &NumericColumn, summary: &ColumnSummary) -> HistogramChart {
        let bins = StatsCalculator::auto_histogram(&summary.finite);

        // Density is scaled by n * bin width so the curve sits on the bar heights
        let density = match (&summary.kde, bins.first()) {
            (Some(kde), Some(bin)) => {
                let scale = summary.finite.len() as f64 * bin.width();
                kde.curve(0.0, KDE_GRID_POINTS)
                    .into_iter()
                    .map(|[x, d]| [x, d * scale])
                    .collect()
            }
            _ => Vec::new(),
        };

        HistogramChart {
            label: column.name.clone(),
            bins,
            density,
        }
    }

    fn box_plot(columns: &[NumericColumn], summaries: &[ColumnSummary]) -> BoxChart {
        BoxChart {
            boxes: columns
                .iter()
                .zip(summaries)
                .map(|(col, s)| LabeledBox {
                    label: col.name.clone(),
                    summary: s.summary.clone(),
                })
                .collect(),
        }
    }

    fn pair_grid(columns: &[NumericColumn], summaries: &[ColumnSummary]) -> PairGridChart {
        let cells = columns
            .iter()
            .enumerate()
            .map(|(row, y)| {
                columns
                    .iter()
                    .enumerate()
                    .map(|(col, x)| {
                        if row == col {
                            PairCell::Histogram(StatsCalculator::auto_histogram(
                                &summaries[col].finite,
                            ))
                        } else {
                            PairCell::Scatter(Self::paired_points(x, y))
                        }
                    })
                    .collect()
            })
            .collect();

        PairGridChart {
            labels: columns.iter().map(|c| c.name.clone()).collect(),
            cells,
        }
    }

    fn correlation(columns: &[NumericColumn]) -> CorrelationMatrix {
        let slices: Vec<&[Option<f64>]> = columns.iter().map(|c| c.values.as_slice()).collect();
        CorrelationMatrix {
            labels: columns.iter().map(|c| c.name.clone()).collect(),
            values: StatsCalculator::correlation_matrix(&slices),
        }
    }

    fn line(columns: &[NumericColumn]) -> LineChart {
        LineChart {
            series: columns
                .iter()
                .map(|col| LineSeries {
                    label: col.name.clone(),
                    points: col
                        .values
                        .iter()
                        .enumerate()
                        .filter_map(|(i, v)| v.map(|y| [i as f64, y]))
                        .collect(),
                })
                .collect(),
        }
    }

    fn mean_bars(columns: &[NumericColumn], summaries: &[ColumnSummary]) -> MeanBarChart {
        MeanBarChart {
            bars: columns
                .iter()
                .zip(summaries)
                .map(|(col, s)| MeanBar {
                    label: col.name.clone(),
                    mean: StatsCalculator::mean(&s.finite),
                })
                .collect(),
        }
    }

    fn violins(columns: &[NumericColumn], summaries: &[ColumnSummary]) -> ViolinChart {
        let curves: Vec<Vec<[f64; 2]>> = summaries
            .iter()
            .map(|s| {
                s.kde
                    .as_ref()
                    .map(|kde| kde.curve(VIOLIN_CUT, VIOLIN_GRID_POINTS))
                    .unwrap_or_default()
            })
            .collect();

        // Widths share one scale so violin areas stay comparable
        let peak = curves
            .iter()
            .flatten()
            .map(|p| p[1])
            .fold(0.0_f64, f64::max);

        let violins = columns
            .iter()
            .zip(summaries)
            .zip(curves)
            .map(|((col, s), curve)| Violin {
                label: col.name.clone(),
                outline: curve
                    .into_iter()
                    .map(|[v, d]| {
                        let width = if peak > 0.0 {
                            d / peak * VIOLIN_HALF_WIDTH
                        } else {
                            0.0
                        };
                        [v, width]
                    })
                    .collect(),
                summary: s.summary.clone(),
            })
            .collect();

        ViolinChart { violins }
    }

    fn kde(column: &NumericColumn, summary: &ColumnSummary) -> KdeChart {
        KdeChart {
            label: column.name.clone(),
            curve: summary
                .kde
                .as_ref()
                .map(|kde| kde.curve(KDE_CUT, KDE_GRID_POINTS))
                .unwrap_or_default(),
        }
    }

    fn pie(column: &NumericColumn, counts: &[ValueCount]) -> PieChart {
        let total: usize = counts.iter().map(|c| c.count).sum();
        PieChart {
            label: column.name.clone(),
            slices: counts
                .iter()
                .map(|c| PieSlice {
                    value: c.value,
                    count: c.count,
                    fraction: if total > 0 {
                        c.count as f64 / total as f64
                    } else {
                        0.0
                    },
                })
                .collect(),
        }
    }
}

/// Integral values print without a fractional part.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataLoader, UploadedFile};

    fn column(name: &str, values: &[f64]) -> NumericColumn {
        NumericColumn::new(name, values.iter().map(|v| Some(*v)).collect())
    }

    const NINE_KINDS: [ChartKind; 9] = [
        ChartKind::Scatter,
        ChartKind::Histogram,
        ChartKind::Box,
        ChartKind::PairGrid,
        ChartKind::CorrelationHeatmap,
        ChartKind::Line,
        ChartKind::MeanBar,
        ChartKind::Violin,
        ChartKind::Kde,
    ];

    #[test]
    fn fewer_than_two_numeric_columns_is_rejected() {
        for cols in [vec![], vec![column("a", &[1.0, 2.0])]] {
            match ChartSet::build(&cols) {
                Err(VisualizerError::InsufficientNumericColumns { found }) => {
                    assert_eq!(found, cols.len())
                }
                other => panic!("expected InsufficientNumericColumns, got {:?}", other),
            }
        }
    }

    #[test]
    fn low_cardinality_first_column_gets_a_pie() {
        let cols = [
            column("grade", &[1.0, 2.0, 2.0, 3.0, 3.0, 3.0]),
            column("score", &[10.0, 20.0, 25.0, 30.0, 35.0, 40.0]),
        ];
        let set = ChartSet::build(&cols).unwrap();

        let mut expected = NINE_KINDS.to_vec();
        expected.push(ChartKind::Pie);
        assert_eq!(set.kinds(), expected);
        assert!(set.has_pie());

        let Some(Chart::Pie(pie)) = set.charts.last() else {
            panic!("last chart should be the pie");
        };
        assert_eq!(pie.label, "grade");
        assert_eq!(pie.slices[0].value, 3.0);
        assert_eq!(pie.slices[0].percent_label(), "50.0%");
        assert_eq!(pie.slices[0].label(), "3");
        let total: f64 = pie.slices.iter().map(|s| s.fraction).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ten_or_more_distinct_values_omit_the_pie() {
        let xs: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| x * 2.0).collect();
        let set = ChartSet::build(&[column("x", &xs), column("y", &ys)]).unwrap();

        assert_eq!(set.len(), 9);
        assert_eq!(set.kinds(), NINE_KINDS.to_vec());
        assert!(!set.has_pie());
    }

    #[test]
    fn nine_distinct_values_still_get_a_pie() {
        let xs: Vec<f64> = (0..9).map(|i| i as f64).collect();
        let set = ChartSet::build(&[column("x", &xs), column("y", &xs)]).unwrap();
        assert_eq!(set.len(), 10);
    }

    #[test]
    fn multi_series_charts_cover_every_numeric_column() {
        let cols = [
            column("a", &[1.0, 2.0, 3.0, 4.0]),
            column("b", &[4.0, 3.0, 2.0, 1.0]),
            column("c", &[1.0, 3.0, 2.0, 5.0]),
        ];
        let set = ChartSet::build(&cols).unwrap();

        for chart in &set.charts {
            match chart {
                Chart::Box(b) => assert_eq!(b.boxes.len(), 3),
                Chart::PairGrid(g) => {
                    assert_eq!(g.cells.len(), 3);
                    assert!(g.cells.iter().all(|row| row.len() == 3));
                    assert!(matches!(g.cells[1][1], PairCell::Histogram(_)));
                    assert!(matches!(g.cells[0][1], PairCell::Scatter(_)));
                }
                Chart::CorrelationHeatmap(m) => assert_eq!(m.size(), 3),
                Chart::Line(l) => {
                    assert_eq!(l.series.len(), 3);
                    assert_eq!(l.series[2].points[3], [3.0, 5.0]);
                }
                Chart::MeanBar(m) => {
                    assert_eq!(m.bars.len(), 3);
                    assert!((m.bars[0].mean - 2.5).abs() < 1e-9);
                }
                Chart::Violin(v) => assert_eq!(v.violins.len(), 3),
                _ => {}
            }
        }
    }

    #[test]
    fn pair_grid_scatter_puts_column_on_x_and_row_on_y() {
        let cols = [column("a", &[1.0, 2.0]), column("b", &[10.0, 20.0])];
        let set = ChartSet::build(&cols).unwrap();
        let Some(Chart::PairGrid(grid)) = set.charts.get(3) else {
            panic!("fourth chart should be the pair grid");
        };
        match &grid.cells[0][1] {
            PairCell::Scatter(points) => assert_eq!(points[0], [10.0, 1.0]),
            other => panic!("expected scatter, got {:?}", other),
        }
    }

    #[test]
    fn missing_values_are_skipped_per_chart() {
        let cols = [
            NumericColumn::new("a", vec![Some(1.0), None, Some(3.0)]),
            NumericColumn::new("b", vec![Some(2.0), Some(5.0), None]),
        ];
        let set = ChartSet::build(&cols).unwrap();
        let Chart::Scatter(scatter) = &set.charts[0] else {
            panic!("first chart should be the scatter");
        };
        assert_eq!(scatter.points, vec![[1.0, 2.0]]);
        assert_eq!(scatter.x_label, "a");
        assert_eq!(scatter.y_label, "b");
    }

    #[test]
    fn single_row_dataset_still_renders() {
        let set = ChartSet::build(&[column("a", &[1.0]), column("b", &[2.0])]).unwrap();
        assert_eq!(set.len(), 10);
        let Chart::Kde(kde) = &set.charts[8] else {
            panic!("ninth chart should be the KDE");
        };
        assert!(kde.curve.is_empty());
    }

    #[test]
    fn two_row_csv_correlation_is_unit_matrix() {
        let file = UploadedFile::new("pair.csv", b"a,b\n1,2\n3,4\n".to_vec());
        let df = DataLoader::load(&file).unwrap();
        let set = ChartSet::from_dataframe(&df).unwrap();

        assert_eq!(set.numeric_columns, vec!["a", "b"]);
        let Chart::CorrelationHeatmap(matrix) = &set.charts[4] else {
            panic!("fifth chart should be the heatmap");
        };
        assert_eq!(matrix.size(), 2);
        assert!((matrix.get(0, 0) - 1.0).abs() < 1e-9);
        assert!((matrix.get(1, 1) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn histogram_density_tracks_bar_heights() {
        let values: Vec<f64> = (0..200).map(|i| ((i * 37) % 100) as f64 / 10.0).collect();
        let cols = [column("v", &values), column("w", &values)];
        let set = ChartSet::build(&cols).unwrap();
        let Chart::Histogram(hist) = &set.charts[1] else {
            panic!("second chart should be the histogram");
        };

        let tallest = hist.bins.iter().map(|b| b.count).max().unwrap() as f64;
        let peak = hist.density.iter().map(|p| p[1]).fold(0.0, f64::max);
        assert!(peak > 0.0 && peak < tallest * 2.0);
        assert_eq!(hist.density.first().unwrap()[0], 0.0);
    }

    #[test]
    fn format_value_drops_integral_fraction() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(-2.0), "-2");
        assert_eq!(format_value(2.5), "2.5");
    }
}
