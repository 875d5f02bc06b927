//! Chart Plotter Module
//! Draws computed chart payloads using egui_plot.

use crate::charts::builder::{
    format_value, BoxChart, Chart, CorrelationMatrix, HistogramChart, KdeChart, LineChart,
    MeanBarChart, PairCell, PairGridChart, PieChart, ScatterChart, ViolinChart,
};
use crate::config::ViewerSettings;
use crate::stats::HistogramBin;
use egui::{Color32, RichText, Stroke};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoint,
    PlotPoints, Points, Polygon, Text,
};
use std::f64::consts::TAU;
use std::ops::RangeInclusive;

/// Color palette for series
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(96, 125, 139),  // Blue Grey
    Color32::from_rgb(205, 220, 57),  // Lime
    Color32::from_rgb(0, 188, 212),   // Cyan
];

// Cool-warm diverging scale endpoints
const COOL: Color32 = Color32::from_rgb(59, 76, 192);
const NEUTRAL: Color32 = Color32::from_rgb(221, 221, 221);
const WARM: Color32 = Color32::from_rgb(180, 4, 38);

/// Pie circle resolution
const PIE_SEGMENTS: usize = 180;

/// Draws one chart per call; each chart gets its own plot ids.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Map a correlation in [-1, 1] onto the cool-warm scale.
    pub fn diverging_color(value: f64) -> Color32 {
        if !value.is_finite() {
            return Color32::TRANSPARENT;
        }
        let t = value.clamp(-1.0, 1.0) as f32;
        if t < 0.0 {
            Self::lerp_color(NEUTRAL, COOL, -t)
        } else {
            Self::lerp_color(NEUTRAL, WARM, t)
        }
    }

    fn lerp_color(from: Color32, to: Color32, t: f32) -> Color32 {
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color32::from_rgb(
            mix(from.r(), to.r()),
            mix(from.g(), to.g()),
            mix(from.b(), to.b()),
        )
    }

    /// Axis formatter that shows a category label at each integer position.
    fn category_formatter(
        labels: Vec<String>,
    ) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
        move |mark, _range| {
            let v = mark.value;
            if (v - v.round()).abs() > 1e-6 || v < -0.5 {
                return String::new();
            }
            labels.get(v.round() as usize).cloned().unwrap_or_default()
        }
    }

    /// Draw any chart. `salt` keeps plot ids unique per render cycle.
    pub fn draw(ui: &mut egui::Ui, chart: &Chart, salt: u64, settings: &ViewerSettings) {
        let height = settings.chart_height;
        match chart {
            Chart::Scatter(c) => Self::draw_scatter(ui, c, salt, height),
            Chart::Histogram(c) => Self::draw_histogram(ui, c, salt, height),
            Chart::Box(c) => Self::draw_box(ui, c, salt, height),
            Chart::PairGrid(c) => Self::draw_pair_grid(ui, c, salt, settings.pair_cell_size),
            Chart::CorrelationHeatmap(c) => Self::draw_heatmap(ui, c, salt, height),
            Chart::Line(c) => Self::draw_line(ui, c, salt, height),
            Chart::MeanBar(c) => Self::draw_mean_bars(ui, c, salt, height),
            Chart::Violin(c) => Self::draw_violin(ui, c, salt, height),
            Chart::Kde(c) => Self::draw_kde(ui, c, salt, height),
            Chart::Pie(c) => Self::draw_pie(ui, c, salt, height),
        }
    }

    pub fn draw_scatter(ui: &mut egui::Ui, chart: &ScatterChart, salt: u64, height: f32) {
        Plot::new(format!("scatter_{}", salt))
            .height(height)
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone())
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(PlotPoints::from(chart.points.clone()))
                        .radius(3.0)
                        .color(Self::series_color(0)),
                );
            });
    }

    fn histogram_bars(bins: &[HistogramBin], color: Color32) -> BarChart {
        let bars = bins
            .iter()
            .map(|bin| {
                Bar::new(bin.center(), bin.count as f64)
                    .width(bin.width())
                    .fill(color.gamma_multiply(0.6))
                    .stroke(Stroke::new(1.0, color))
            })
            .collect();
        BarChart::new(bars).color(color)
    }

    pub fn draw_histogram(ui: &mut egui::Ui, chart: &HistogramChart, salt: u64, height: f32) {
        let color = Self::series_color(0);
        Plot::new(format!("histogram_{}", salt))
            .height(height)
            .x_axis_label(chart.label.clone())
            .y_axis_label("Count")
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(Self::histogram_bars(&chart.bins, color).name(&chart.label));
                if !chart.density.is_empty() {
                    plot_ui.line(
                        Line::new(PlotPoints::from(chart.density.clone()))
                            .color(color)
                            .width(2.0)
                            .name("density"),
                    );
                }
            });
    }

    pub fn draw_box(ui: &mut egui::Ui, chart: &BoxChart, salt: u64, height: f32) {
        let labels: Vec<String> = chart.boxes.iter().map(|b| b.label.clone()).collect();

        Plot::new(format!("box_{}", salt))
            .height(height)
            .y_axis_label("Value")
            .allow_scroll(false)
            .x_axis_formatter(Self::category_formatter(labels))
            .show(ui, |plot_ui| {
                for (i, labeled) in chart.boxes.iter().enumerate() {
                    let s = &labeled.summary;
                    if s.count == 0 {
                        continue;
                    }
                    let color = Self::series_color(i);
                    let elem = BoxElem::new(
                        i as f64,
                        BoxSpread::new(s.whisker_low, s.q1, s.median, s.q3, s.whisker_high),
                    )
                    .box_width(0.6)
                    .fill(color.gamma_multiply(0.5))
                    .stroke(Stroke::new(1.5, color));
                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&labeled.label));

                    if !s.fliers.is_empty() {
                        let fliers: PlotPoints = s.fliers.iter().map(|&v| [i as f64, v]).collect();
                        plot_ui.points(Points::new(fliers).radius(2.5).color(color));
                    }
                }
            });
    }

    pub fn draw_pair_grid(ui: &mut egui::Ui, chart: &PairGridChart, salt: u64, cell_size: f32) {
        let n = chart.labels.len();
        egui::ScrollArea::horizontal()
            .id_salt(format!("pair_scroll_{}", salt))
            .show(ui, |ui| {
                egui::Grid::new(format!("pair_grid_{}", salt))
                    .spacing([4.0, 4.0])
                    .show(ui, |ui| {
                        for (row, cells) in chart.cells.iter().enumerate() {
                            for (col, cell) in cells.iter().enumerate() {
                                let mut plot = Plot::new(format!("pair_{}_{}_{}", salt, row, col))
                                    .width(cell_size)
                                    .height(cell_size)
                                    .show_x(false)
                                    .show_y(false)
                                    .allow_zoom(false)
                                    .allow_drag(false)
                                    .allow_scroll(false);
                                if row == n - 1 {
                                    plot = plot.x_axis_label(chart.labels[col].clone());
                                }
                                if col == 0 {
                                    plot = plot.y_axis_label(chart.labels[row].clone());
                                }

                                plot.show(ui, |plot_ui| match cell {
                                    PairCell::Histogram(bins) => {
                                        plot_ui.bar_chart(Self::histogram_bars(
                                            bins,
                                            Self::series_color(0),
                                        ));
                                    }
                                    PairCell::Scatter(points) => {
                                        plot_ui.points(
                                            Points::new(PlotPoints::from(points.clone()))
                                                .radius(1.5)
                                                .color(Self::series_color(0)),
                                        );
                                    }
                                });
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    pub fn draw_heatmap(ui: &mut egui::Ui, matrix: &CorrelationMatrix, salt: u64, height: f32) {
        let n = matrix.size();
        let x_labels = matrix.labels.clone();
        let y_labels = matrix.labels.clone();

        // Row 0 sits at the top, so rows are laid out at y = -row
        Plot::new(format!("heatmap_{}", salt))
            .height(height)
            .data_aspect(1.0)
            .show_grid(false)
            .allow_scroll(false)
            .x_axis_formatter(Self::category_formatter(x_labels))
            .y_axis_formatter(move |mark, _range| {
                let v = -mark.value;
                if (v - v.round()).abs() > 1e-6 || v < -0.5 {
                    return String::new();
                }
                y_labels.get(v.round() as usize).cloned().unwrap_or_default()
            })
            .include_x(-0.5)
            .include_x(n as f64 - 0.5)
            .include_y(0.5)
            .include_y(-(n as f64) + 0.5)
            .show(ui, |plot_ui| {
                for row in 0..n {
                    for col in 0..n {
                        let value = matrix.get(row, col);
                        let x = col as f64;
                        let y = -(row as f64);
                        let square = vec![
                            [x - 0.5, y - 0.5],
                            [x + 0.5, y - 0.5],
                            [x + 0.5, y + 0.5],
                            [x - 0.5, y + 0.5],
                        ];
                        let fill = Self::diverging_color(value);
                        plot_ui.polygon(
                            Polygon::new(PlotPoints::from(square))
                                .fill_color(fill)
                                .stroke(Stroke::new(1.0, Color32::WHITE)),
                        );

                        if value.is_finite() {
                            let text_color = if value.abs() > 0.6 {
                                Color32::WHITE
                            } else {
                                Color32::BLACK
                            };
                            plot_ui.text(
                                Text::new(
                                    PlotPoint::new(x, y),
                                    RichText::new(format!("{:.2}", value)).size(12.0),
                                )
                                .color(text_color),
                            );
                        }
                    }
                }
            });
    }

    pub fn draw_line(ui: &mut egui::Ui, chart: &LineChart, salt: u64, height: f32) {
        Plot::new(format!("line_{}", salt))
            .height(height)
            .legend(Legend::default())
            .x_axis_label("Row")
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for (i, series) in chart.series.iter().enumerate() {
                    plot_ui.line(
                        Line::new(PlotPoints::from(series.points.clone()))
                            .color(Self::series_color(i))
                            .width(1.5)
                            .name(&series.label),
                    );
                }
            });
    }

    pub fn draw_mean_bars(ui: &mut egui::Ui, chart: &MeanBarChart, salt: u64, height: f32) {
        let labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();

        Plot::new(format!("means_{}", salt))
            .height(height)
            .y_axis_label("Mean")
            .allow_scroll(false)
            .x_axis_formatter(Self::category_formatter(labels))
            .show(ui, |plot_ui| {
                let bars = chart
                    .bars
                    .iter()
                    .enumerate()
                    .filter(|(_, bar)| bar.mean.is_finite())
                    .map(|(i, bar)| {
                        Bar::new(i as f64, bar.mean)
                            .width(0.6)
                            .name(&bar.label)
                            .fill(Self::series_color(0))
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).color(Self::series_color(0)));
            });
    }

    pub fn draw_violin(ui: &mut egui::Ui, chart: &ViolinChart, salt: u64, height: f32) {
        let labels: Vec<String> = chart.violins.iter().map(|v| v.label.clone()).collect();

        Plot::new(format!("violin_{}", salt))
            .height(height)
            .y_axis_label("Value")
            .allow_scroll(false)
            .x_axis_formatter(Self::category_formatter(labels))
            .show(ui, |plot_ui| {
                for (i, violin) in chart.violins.iter().enumerate() {
                    let center = i as f64;
                    let color = Self::series_color(i);

                    if !violin.outline.is_empty() {
                        let right = violin.outline.iter().map(|&[v, w]| [center + w, v]);
                        let left = violin.outline.iter().rev().map(|&[v, w]| [center - w, v]);
                        let outline: PlotPoints = right.chain(left).collect();
                        plot_ui.polygon(
                            Polygon::new(outline)
                                .fill_color(color.gamma_multiply(0.5))
                                .stroke(Stroke::new(1.0, color))
                                .name(&violin.label),
                        );
                    }

                    let s = &violin.summary;
                    if s.count > 0 {
                        plot_ui.line(
                            Line::new(PlotPoints::from(vec![
                                [center, s.whisker_low],
                                [center, s.whisker_high],
                            ]))
                            .color(Color32::DARK_GRAY)
                            .width(1.0),
                        );
                        plot_ui.line(
                            Line::new(PlotPoints::from(vec![[center, s.q1], [center, s.q3]]))
                                .color(Color32::DARK_GRAY)
                                .width(5.0),
                        );
                        plot_ui.points(
                            Points::new(PlotPoints::from(vec![[center, s.median]]))
                                .radius(3.0)
                                .color(Color32::WHITE),
                        );
                    }
                }
            });
    }

    pub fn draw_kde(ui: &mut egui::Ui, chart: &KdeChart, salt: u64, height: f32) {
        Plot::new(format!("kde_{}", salt))
            .height(height)
            .x_axis_label(chart.label.clone())
            .y_axis_label("Density")
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from(chart.curve.clone()))
                        .color(Self::series_color(0))
                        .width(1.5)
                        .fill(0.0_f32)
                        .name(&chart.label),
                );
            });
    }

    /// Points of one wedge from `start` to `end` (radians), counter-clockwise.
    pub fn wedge(start: f64, end: f64) -> Vec<[f64; 2]> {
        let steps = (((end - start) / TAU) * PIE_SEGMENTS as f64).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(steps + 2);
        points.push([0.0, 0.0]);
        for k in 0..=steps {
            let angle = start + (end - start) * k as f64 / steps as f64;
            points.push([angle.cos(), angle.sin()]);
        }
        points
    }

    pub fn draw_pie(ui: &mut egui::Ui, chart: &PieChart, salt: u64, height: f32) {
        Plot::new(format!("pie_{}", salt))
            .height(height)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .show_x(false)
            .show_y(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_x(-1.3)
            .include_x(1.3)
            .include_y(-1.3)
            .include_y(1.3)
            .show(ui, |plot_ui| {
                let mut start = 0.0;
                for (i, slice) in chart.slices.iter().enumerate() {
                    let end = start + slice.fraction * TAU;
                    let color = Self::series_color(i);
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(Self::wedge(start, end)))
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE))
                            .name(slice.label()),
                    );

                    let mid = (start + end) / 2.0;
                    plot_ui.text(Text::new(
                        PlotPoint::new(1.15 * mid.cos(), 1.15 * mid.sin()),
                        RichText::new(slice.label()).size(12.0),
                    ));
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(0.6 * mid.cos(), 0.6 * mid.sin()),
                            RichText::new(slice.percent_label()).size(11.0),
                        )
                        .color(Color32::WHITE),
                    );
                    start = end;
                }
            });

        ui.label(
            RichText::new(format!("{} (value counts)", chart.label))
                .size(11.0)
                .color(Color32::GRAY),
        );
    }

    /// One-line summary shown under a chart.
    pub fn caption(chart: &Chart) -> String {
        match chart {
            Chart::Scatter(c) => format!("{} vs {}", c.y_label, c.x_label),
            Chart::Histogram(c) => format!("{} ({} bins)", c.label, c.bins.len()),
            Chart::Box(c) => format!("{} columns", c.boxes.len()),
            Chart::PairGrid(c) => format!("{} x {} grid", c.labels.len(), c.labels.len()),
            Chart::CorrelationHeatmap(c) => format!("Pearson, {} x {}", c.size(), c.size()),
            Chart::Line(c) => format!("{} series", c.series.len()),
            Chart::MeanBar(c) => c
                .bars
                .iter()
                .map(|b| format!("{}: {}", b.label, format_value((b.mean * 1000.0).round() / 1000.0)))
                .collect::<Vec<_>>()
                .join(", "),
            Chart::Violin(c) => format!("{} columns", c.violins.len()),
            Chart::Kde(c) => c.label.clone(),
            Chart::Pie(c) => format!("{} ({} values)", c.label, c.slices.len()),
        }
    }
}
