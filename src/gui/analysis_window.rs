//! Data Visualization Window
//! Floating window with the per-column histograms and the correlation heatmap
//! of the loaded dataset.

use crate::charts::ChartPlotter;
use crate::stats::Analysis;
use egui::{RichText, ScrollArea};

#[derive(Default)]
pub struct AnalysisWindow {
    open: bool,
}

impl AnalysisWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn show(&mut self, ctx: &egui::Context, analysis: Option<&Analysis>) {
        let Some(analysis) = analysis else {
            return;
        };

        egui::Window::new("Data Visualization")
            .open(&mut self.open)
            .default_size([760.0, 680.0])
            .show(ctx, |ui| {
                ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                    ui.label(RichText::new("Histograms").size(16.0).strong());
                    ui.add_space(6.0);
                    ChartPlotter::draw_histograms(ui, &analysis.histograms);

                    ui.add_space(12.0);
                    ui.separator();
                    ui.label(RichText::new("Correlation").size(16.0).strong());
                    ui.add_space(6.0);
                    ChartPlotter::draw_heatmap(ui, &analysis.correlation);
                });
            });
    }
}
