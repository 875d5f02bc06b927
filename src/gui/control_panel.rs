//! Control Panel Widget
//! Left side panel with the page title, upload control and status line.

use crate::config::{APP_TITLE, UPLOAD_PROMPT};
use egui::{Color32, RichText};

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const SUCCESS_COLOR: Color32 = Color32::from_rgb(40, 167, 69);

/// Tone of the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Neutral,
    Success,
    Error,
}

/// Left side control panel with file selection.
pub struct ControlPanel {
    pub file_name: Option<String>,
    pub status: String,
    pub tone: StatusTone,
    /// Set while a file is dragged over the window
    pub drop_hint: Option<String>,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            file_name: None,
            status: "Ready".to_string(),
            tone: StatusTone::Neutral,
            drop_hint: None,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: &str, tone: StatusTone) {
        self.status = status.to_string();
        self.tone = tone;
    }

    /// Forget the current file and return to the initial state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new(format!("📊 {}", APP_TITLE))
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Upload Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let file_text = self
                    .file_name
                    .clone()
                    .unwrap_or_else(|| "No file selected".to_string());
                ui.label(RichText::new(&file_text).size(12.0).color(
                    if self.file_name.is_some() {
                        ui.visuals().text_color()
                    } else {
                        Color32::GRAY
                    },
                ));

                ui.add_space(5.0);
                let button = egui::Button::new(RichText::new(format!("📂 {}", UPLOAD_PROMPT)))
                    .min_size(egui::vec2(ui.available_width(), 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Browse;
                }
                ui.label(
                    RichText::new("CSV, XLS or XLSX. Files can also be dropped onto the window.")
                        .size(11.0)
                        .color(Color32::GRAY),
                );
            });

        if let Some(hint) = &self.drop_hint {
            ui.add_space(5.0);
            ui.label(RichText::new(hint).size(12.0).strong());
        }

        ui.add_space(10.0);
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.file_name.is_some(), |ui| {
                if ui.button("✖ Clear").clicked() {
                    action = ControlPanelAction::Clear;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("ℹ Status").size(14.0).strong());
        ui.add_space(5.0);

        let status_color = match self.tone {
            StatusTone::Error => ERROR_COLOR,
            StatusTone::Success => SUCCESS_COLOR,
            StatusTone::Neutral => Color32::GRAY,
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Browse,
    Clear,
}
