//! Chart Viewer Widget
//! Central scrollable area: data preview followed by the chart cards.
//! Cards wrap into as many columns as the available width allows.

use crate::charts::{Chart, ChartPlotter, ChartSet};
use crate::config::ViewerSettings;
use crate::cycle::{CycleOutcome, RenderCycle};
use crate::data::PreviewTable;
use egui::{Color32, RichText, ScrollArea};

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const CARD_BORDER: Color32 = Color32::from_rgb(100, 149, 237);

/// Scrollable display of the current render cycle.
pub struct ChartViewer {
    pub settings: ViewerSettings,
}

impl Default for ChartViewer {
    fn default() -> Self {
        Self {
            settings: ViewerSettings::default(),
        }
    }
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the viewer for the given cycle. Without one the page is empty.
    pub fn show(&self, ui: &mut egui::Ui, cycle: Option<&RenderCycle>) {
        let Some(cycle) = cycle else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .id_salt(("chart_viewer", cycle.id))
            .auto_shrink([false, false])
            .show(ui, |ui| match &cycle.outcome {
                CycleOutcome::LoadFailed(error) => {
                    Self::error_label(ui, &error.to_string());
                }
                CycleOutcome::Loaded {
                    rows,
                    columns,
                    preview,
                    charts,
                } => {
                    ui.heading("Data Preview");
                    ui.label(
                        RichText::new(format!("{}: {} rows, {} columns", cycle.file_name, rows, columns))
                            .size(12.0)
                            .color(Color32::GRAY),
                    );
                    ui.add_space(5.0);
                    Self::draw_preview(ui, preview, cycle.id);
                    ui.add_space(15.0);

                    match charts {
                        Err(error) => Self::error_label(ui, &error.to_string()),
                        Ok(charts) => self.draw_charts(ui, charts, cycle.id),
                    }
                }
            });
    }

    fn error_label(ui: &mut egui::Ui, message: &str) {
        ui.add_space(10.0);
        ui.label(RichText::new(message).size(15.0).color(ERROR_COLOR));
    }

    /// Preview grid. Missing cells are already rendered as "NaN".
    fn draw_preview(ui: &mut egui::Ui, preview: &PreviewTable, salt: u64) {
        ScrollArea::horizontal()
            .id_salt(("preview", salt))
            .show(ui, |ui| {
                egui::Grid::new(("preview_grid", salt))
                    .striped(true)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        for header in &preview.headers {
                            ui.label(RichText::new(header).strong());
                        }
                        ui.end_row();

                        for row in &preview.rows {
                            for cell in row {
                                ui.label(cell);
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    fn draw_charts(&self, ui: &mut egui::Ui, charts: &ChartSet, salt: u64) {
        ui.heading("Data Visualizations");
        ui.label(
            RichText::new(format!(
                "{} charts from {} numeric columns: {}",
                charts.len(),
                charts.numeric_columns.len(),
                charts.numeric_columns.join(", ")
            ))
            .size(12.0)
            .color(Color32::GRAY),
        );
        if !charts.has_pie() {
            ui.label(
                RichText::new("Pie chart skipped: first numeric column has too many distinct values")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        }
        ui.add_space(10.0);

        let spacing = self.settings.card_spacing;
        let card_total_width = self.settings.card_width + spacing;
        let num_columns = ((ui.available_width() / card_total_width).floor() as usize).max(1);

        for row in charts.charts.chunks(num_columns) {
            ui.horizontal_top(|ui| {
                for chart in row {
                    self.draw_card(ui, chart, salt);
                    ui.add_space(spacing);
                }
            });
            ui.add_space(spacing);
        }
    }

    /// One chart in a bordered card with its title and caption.
    fn draw_card(&self, ui: &mut egui::Ui, chart: &Chart, salt: u64) {
        let card_width = self.settings.card_width - 20.0;

        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, CARD_BORDER))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(card_width);
                ui.vertical(|ui| {
                    ui.label(RichText::new(chart.title()).size(18.0).strong());
                    ui.add_space(8.0);
                    ChartPlotter::draw(ui, chart, salt, &self.settings);
                    ui.add_space(6.0);
                    ui.label(
                        RichText::new(ChartPlotter::caption(chart))
                            .size(12.0)
                            .color(Color32::GRAY),
                    );
                });
            });
    }
}
