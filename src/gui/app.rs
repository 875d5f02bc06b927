//! Dataset Visualizer Main Application
//! Main window with control panel and chart viewer.

use crate::config::SUPPORTED_EXTENSIONS;
use crate::cycle::{CycleOutcome, RenderCycle};
use crate::data::{FileFormat, UploadedFile};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, StatusTone};
use anyhow::{bail, Context};
use egui::SidePanel;
use std::path::Path;

/// Main application window.
pub struct VisualizerApp {
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    /// The cycle currently on screen, replaced by each upload
    cycle: Option<RenderCycle>,
    next_cycle_id: u64,
}

impl VisualizerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            cycle: None,
            next_cycle_id: 0,
        }
    }

    /// Handle file selection from the upload button
    fn handle_browse(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV or Excel", &SUPPORTED_EXTENSIONS)
            .pick_file()
        else {
            return; // User cancelled
        };

        match read_upload(&path) {
            Ok(file) => self.process_upload(file),
            Err(e) => self.report_read_failure(e),
        }
    }

    /// Handle files dropped onto the window. Only the first one is used.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(first) = dropped.into_iter().next() else {
            return;
        };

        match dropped_upload(first) {
            Ok(file) => self.process_upload(file),
            Err(e) => self.report_read_failure(e),
        }
    }

    /// Show what would happen to a file hovering over the window.
    fn update_drop_hint(&mut self, ctx: &egui::Context) {
        let hovered = ctx.input(|i| i.raw.hovered_files.clone());
        self.control_panel.drop_hint = hovered.first().map(|file| {
            let extension = file
                .path
                .as_deref()
                .and_then(Path::extension)
                .and_then(|ext| ext.to_str())
                .unwrap_or_default();
            if FileFormat::is_supported(extension) {
                "Release to upload".to_string()
            } else {
                "Unsupported file type".to_string()
            }
        });
    }

    /// Run one render cycle and replace whatever was shown before.
    fn process_upload(&mut self, file: UploadedFile) {
        self.next_cycle_id += 1;
        let cycle = RenderCycle::run(self.next_cycle_id, &file);

        match &cycle.outcome {
            CycleOutcome::LoadFailed(e) => {
                self.control_panel.set_status(&e.to_string(), StatusTone::Error);
            }
            CycleOutcome::Loaded {
                rows,
                columns,
                charts,
                ..
            } => {
                let summary = format!("Loaded {} rows, {} columns", rows, columns);
                match charts {
                    Ok(set) => self.control_panel.set_status(
                        &format!("{}. {} charts ready", summary, set.len()),
                        StatusTone::Success,
                    ),
                    Err(e) => self
                        .control_panel
                        .set_status(&format!("{}. {}", summary, e), StatusTone::Error),
                }
            }
        }

        self.control_panel.file_name = Some(file.name);
        self.cycle = Some(cycle);
    }

    fn report_read_failure(&mut self, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.control_panel
            .set_status(&format!("Error: {:#}", error), StatusTone::Error);
    }

    fn handle_clear(&mut self) {
        self.cycle = None;
        self.control_panel.reset();
    }
}

/// Read a file picked from disk.
fn read_upload(path: &Path) -> anyhow::Result<UploadedFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(UploadedFile::new(name, bytes))
}

/// Turn a dropped file into an upload. Native drops carry a path, web drops carry bytes.
fn dropped_upload(file: egui::DroppedFile) -> anyhow::Result<UploadedFile> {
    if let Some(bytes) = file.bytes {
        return Ok(UploadedFile::new(file.name, bytes.to_vec()));
    }
    match file.path {
        Some(path) => read_upload(&path),
        None => bail!("Dropped file {} has no readable content", file.name),
    }
}

impl eframe::App for VisualizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_drop_hint(ctx);
        self.handle_dropped_files(ctx);

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::Browse => self.handle_browse(),
                        ControlPanelAction::Clear => self.handle_clear(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, self.cycle.as_ref());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn dropped_bytes_become_an_upload() {
        let dropped = egui::DroppedFile {
            name: "data.csv".to_string(),
            bytes: Some(Arc::from(b"a,b\n1,2\n".as_slice())),
            ..Default::default()
        };
        let file = dropped_upload(dropped).unwrap();
        assert_eq!(file.name, "data.csv");
        assert_eq!(file.bytes, b"a,b\n1,2\n".to_vec());
    }

    #[test]
    fn dropped_file_without_content_is_an_error() {
        let dropped = egui::DroppedFile {
            name: "ghost.csv".to_string(),
            ..Default::default()
        };
        let message = format!("{:#}", dropped_upload(dropped).unwrap_err());
        assert!(message.contains("ghost.csv"));
    }

    #[test]
    fn missing_path_reports_the_file() {
        let error = read_upload(Path::new("/nonexistent/dir/data.csv")).unwrap_err();
        assert!(format!("{:#}", error).contains("Failed to read /nonexistent/dir/data.csv"));
    }
}
