//! Diabetes Prediction Main Application
//! Main window with menu bar, input form, result field and probability chart.

use crate::charts::{ChartPlotter, StaticChartRenderer, EXPORT_SIZE};
use crate::config::AppConfig;
use crate::gui::{AnalysisWindow, DialogQueue, InputForm, InputFormAction, MessageDialog};
use crate::model::Probabilities;
use crate::session::Session;
use egui::{Color32, RichText};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::thread;

const BACKGROUND: Color32 = Color32::from_rgb(0x10, 0x8F, 0x88);
const BUTTON: Color32 = Color32::from_rgb(0x81, 0x50, 0xA4);
const BUTTON_HOVER: Color32 = Color32::from_rgb(0x45, 0xA0, 0x49);
const PIE_SIDE: f32 = 340.0;

/// Dataset loading result from background thread
enum LoadResult {
    Progress(String),
    Complete(Box<Session>),
    Error(String),
}

/// Why a load was started; selects the failure dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadOrigin {
    Startup,
    Import,
}

/// Main application window.
pub struct DiabetesApp {
    config: AppConfig,
    session: Option<Session>,
    input_form: InputForm,
    analysis_window: AnalysisWindow,
    dialogs: DialogQueue,

    prediction: Option<Probabilities>,
    result_text: String,
    status: String,
    last_export: Option<PathBuf>,

    // Async dataset loading
    load_rx: Option<Receiver<LoadResult>>,
    load_origin: LoadOrigin,
    is_loading: bool,
}

impl DiabetesApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        startup_warning: Option<String>,
    ) -> Self {
        apply_style(&cc.egui_ctx);

        let mut app = Self::with_config(config, startup_warning);
        let path = app.config.dataset_path.clone();
        app.start_load(path, LoadOrigin::Startup);
        app
    }

    /// App state without a window or a pending load.
    fn with_config(config: AppConfig, startup_warning: Option<String>) -> Self {
        let mut app = Self {
            config,
            session: None,
            input_form: InputForm::new(),
            analysis_window: AnalysisWindow::new(),
            dialogs: DialogQueue::default(),
            prediction: None,
            result_text: String::new(),
            status: "Ready".to_string(),
            last_export: None,
            load_rx: None,
            load_origin: LoadOrigin::Startup,
            is_loading: false,
        };

        if let Some(warning) = startup_warning {
            app.dialogs.push(MessageDialog::warning("Configuration Error", warning));
        }
        app
    }

    /// Load, analyze and fit on a background thread.
    fn start_load(&mut self, path: PathBuf, origin: LoadOrigin) {
        if self.is_loading {
            return;
        }

        tracing::info!("Loading dataset from {}", path.display());
        self.status = format!("Loading {}...", path.display());
        self.is_loading = true;
        self.load_origin = origin;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        let config = self.config.clone();

        thread::spawn(move || {
            let progress_tx = tx.clone();
            let result = Session::load(&path, &config, |step| {
                let _ = progress_tx.send(LoadResult::Progress(step.to_string()));
            });

            let _ = match result {
                Ok(session) => tx.send(LoadResult::Complete(Box::new(session))),
                Err(e) => tx.send(LoadResult::Error(format!("{:#}", e))),
            };
        });
    }

    /// Check for dataset loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(step) => {
                        self.status = step;
                    }
                    LoadResult::Complete(session) => {
                        self.install_session(*session);
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        tracing::error!("Dataset load failed: {}", error);
                        self.dialogs.push(load_error_dialog(self.load_origin, &error));
                        self.status = format!("Error: {}", error);
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    fn install_session(&mut self, session: Session) {
        self.status = session.summary();
        if self.config.show_analysis_on_load {
            self.dialogs
                .push(MessageDialog::info("Data Analysis", session.analysis.report()).monospace());
            self.analysis_window.open();
        }

        // Results of the previous model no longer apply.
        self.prediction = None;
        self.result_text.clear();
        self.session = Some(session);
    }

    fn handle_import(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter("CSV Files", &["csv"]);
        if let Some(dir) = self.current_dataset_path().parent().filter(|p| p.is_dir()) {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.pick_file() {
            self.start_load(path, LoadOrigin::Import);
        }
    }

    fn handle_reload(&mut self) {
        let path = self.current_dataset_path().to_path_buf();
        self.start_load(path, LoadOrigin::Import);
    }

    fn current_dataset_path(&self) -> &Path {
        self.session
            .as_ref()
            .map(|s| s.dataset.source.as_path())
            .unwrap_or(self.config.dataset_path.as_path())
    }

    fn handle_predict(&mut self) {
        let Some(session) = &self.session else {
            tracing::warn!("Predict requested before a model was trained");
            self.dialogs.push(MessageDialog::warning(
                "Model Error",
                "The prediction model is not trained.",
            ));
            return;
        };

        match session.predict(&self.input_form.values) {
            Ok(probabilities) => {
                self.result_text = format_result(&probabilities);
                self.prediction = Some(probabilities);
            }
            Err(e) => {
                tracing::error!("Prediction failed: {:#}", e);
                self.dialogs
                    .push(MessageDialog::warning("Prediction Error", format!("{:#}", e)));
            }
        }
    }

    fn handle_export(&mut self) {
        let Some(probabilities) = self.prediction else {
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("diabetes_prediction.png")
            .save_file()
        else {
            return;
        };

        match StaticChartRenderer::render_pie_png(
            &probabilities,
            &self.result_text,
            &path,
            EXPORT_SIZE,
        ) {
            Ok(()) => {
                self.status = format!("Chart exported to {}", path.display());
                self.last_export = Some(path);
            }
            Err(e) => {
                tracing::error!("Chart export failed: {}", e);
                self.dialogs
                    .push(MessageDialog::warning("Export Error", e.to_string()));
            }
        }
    }

    fn handle_open_export(&mut self) {
        if let Some(path) = &self.last_export {
            if let Err(e) = open::that(path) {
                tracing::warn!("Could not open {}: {}", path.display(), e);
                self.status = format!("Could not open {}", path.display());
            }
        }
    }

    fn show_menu(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui
                    .add_enabled(!self.is_loading, egui::Button::new("Import Data..."))
                    .clicked()
                {
                    ui.close_menu();
                    self.handle_import();
                }
                if ui
                    .add_enabled(!self.is_loading, egui::Button::new("Reload Data"))
                    .clicked()
                {
                    ui.close_menu();
                    self.handle_reload();
                }
                ui.separator();
                if ui
                    .add_enabled(self.prediction.is_some(), egui::Button::new("Export Chart..."))
                    .clicked()
                {
                    ui.close_menu();
                    self.handle_export();
                }
                if ui
                    .add_enabled(
                        self.last_export.is_some(),
                        egui::Button::new("Open Exported Chart"),
                    )
                    .clicked()
                {
                    ui.close_menu();
                    self.handle_open_export();
                }
                ui.separator();
                if ui.button("Quit").clicked() {
                    ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                let has_session = self.session.is_some();
                if ui
                    .add_enabled(has_session, egui::Button::new("Data Analysis"))
                    .clicked()
                {
                    ui.close_menu();
                    if let Some(session) = &self.session {
                        self.dialogs.push(
                            MessageDialog::info("Data Analysis", session.analysis.report())
                                .monospace(),
                        );
                    }
                }
                if ui
                    .add_enabled(has_session, egui::Button::new("Data Visualization"))
                    .clicked()
                {
                    ui.close_menu();
                    self.analysis_window.open();
                }
            });
        });
    }

    fn show_main(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.add_space(6.0);
            let action = self.input_form.show(ui);
            if action == InputFormAction::Predict {
                self.handle_predict();
            }

            ui.add_space(12.0);
            ui.label(RichText::new("Prediction Result:").strong());
            ui.add(
                egui::TextEdit::singleline(&mut self.result_text.as_str())
                    .desired_width(f32::INFINITY),
            );

            if let Some(probabilities) = &self.prediction {
                ui.add_space(10.0);
                egui::Frame::none()
                    .fill(Color32::WHITE)
                    .rounding(6.0)
                    .inner_margin(6.0)
                    .show(ui, |ui| {
                        ui.vertical_centered(|ui| {
                            let side = PIE_SIDE.min(ui.available_width());
                            ChartPlotter::draw_probability_pie(ui, probabilities, side);
                        });
                    });
            }
        });
    }

    fn show_status(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if self.is_loading {
                ui.spinner();
            }
            let color = if self.status.starts_with("Error") {
                Color32::from_rgb(220, 53, 69)
            } else {
                Color32::WHITE
            };
            ui.label(RichText::new(&self.status).size(11.0).color(color));
        });
    }
}

impl eframe::App for DiabetesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        let interactive = self.dialogs.is_empty();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.add_enabled_ui(interactive, |ui| self.show_menu(ui));
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.show_status(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(interactive, |ui| self.show_main(ui));
        });

        let analysis = self.session.as_ref().map(|s| &s.analysis);
        self.analysis_window.show(ctx, analysis);
        self.dialogs.show(ctx);
    }
}

/// Text shown in the read-only result field.
pub fn format_result(probabilities: &Probabilities) -> String {
    format!(
        "Probability of being Diabetic: {:.2}%",
        probabilities.diabetic * 100.0
    )
}

fn load_error_dialog(origin: LoadOrigin, error: &str) -> MessageDialog {
    match origin {
        LoadOrigin::Startup => MessageDialog::warning(
            "Loading Error",
            format!("Failed to load data at startup: {}", error),
        ),
        LoadOrigin::Import => {
            MessageDialog::warning("Import Error", format!("Failed to import data: {}", error))
        }
    }
}

fn apply_style(ctx: &egui::Context) {
    ctx.style_mut(|style| {
        style.visuals.panel_fill = BACKGROUND;
        style.visuals.widgets.inactive.weak_bg_fill = BUTTON;
        style.visuals.widgets.hovered.weak_bg_fill = BUTTON_HOVER;
        style.visuals.widgets.active.weak_bg_fill = BUTTON_HOVER;
        style.visuals.widgets.noninteractive.fg_stroke.color = Color32::WHITE;
        style.spacing.button_padding = egui::vec2(10.0, 6.0);
        style.spacing.interact_size.y = 24.0;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn quiet_config() -> AppConfig {
        AppConfig {
            n_trees: 10,
            show_analysis_on_load: false,
            ..AppConfig::default()
        }
    }

    /// Glucose alone decides the outcome.
    fn fitted_session(config: &AppConfig) -> Session {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(
            file,
            "Pregnancies,Glucose,Blood_Pressure,Skin_Thickness,Insulin,BMI,Diabetes_Pedigree_Function,Age,Outcome"
        )
        .unwrap();
        for i in 0..40 {
            let glucose = 80 + i * 3;
            writeln!(
                file,
                "{},{},70,25,80,30.5,0.45,{},{}",
                i % 6,
                glucose,
                21 + i,
                u8::from(glucose > 140)
            )
            .unwrap();
        }
        file.flush().unwrap();
        Session::load(file.path(), config, |_| {}).unwrap()
    }

    fn deliver(app: &mut DiabetesApp, origin: LoadOrigin, result: LoadResult) {
        let (tx, rx) = channel();
        tx.send(result).unwrap();
        app.load_rx = Some(rx);
        app.load_origin = origin;
        app.is_loading = true;
        app.check_load_results();
    }

    #[test]
    fn failed_import_keeps_previous_session() {
        let config = quiet_config();
        let mut app = DiabetesApp::with_config(config.clone(), None);
        let session = fitted_session(&config);
        deliver(&mut app, LoadOrigin::Startup, LoadResult::Complete(Box::new(session)));
        assert!(app.session.is_some());
        assert!(app.dialogs.is_empty());

        deliver(
            &mut app,
            LoadOrigin::Import,
            LoadResult::Error("bad header".to_string()),
        );
        assert!(app.session.is_some());
        assert!(!app.is_loading);
        assert!(app.load_rx.is_none());
        let dialog = app.dialogs.front().unwrap();
        assert_eq!(dialog.title, "Import Error");
        assert_eq!(dialog.message, "Failed to import data: bad header");
    }

    #[test]
    fn new_session_clears_shown_prediction() {
        let config = quiet_config();
        let mut app = DiabetesApp::with_config(config.clone(), None);
        deliver(
            &mut app,
            LoadOrigin::Startup,
            LoadResult::Complete(Box::new(fitted_session(&config))),
        );

        app.handle_predict();
        assert!(app.prediction.is_some());
        assert!(app.result_text.starts_with("Probability of being Diabetic: "));

        deliver(
            &mut app,
            LoadOrigin::Import,
            LoadResult::Complete(Box::new(fitted_session(&config))),
        );
        assert!(app.prediction.is_none());
        assert!(app.result_text.is_empty());
        assert!(app.session.is_some());
    }

    #[test]
    fn predict_without_model_reports_untrained() {
        let mut app = DiabetesApp::with_config(quiet_config(), None);
        app.handle_predict();
        assert!(app.prediction.is_none());
        let dialog = app.dialogs.front().unwrap();
        assert_eq!(dialog.title, "Model Error");
        assert_eq!(dialog.message, "The prediction model is not trained.");
    }

    #[test]
    fn result_text_uses_two_decimal_percentage() {
        let p = Probabilities {
            not_diabetic: 0.63,
            diabetic: 0.37,
        };
        assert_eq!(format_result(&p), "Probability of being Diabetic: 37.00%");
    }

    #[test]
    fn load_failures_pick_dialog_by_origin() {
        let startup = load_error_dialog(LoadOrigin::Startup, "file missing");
        assert_eq!(startup.title, "Loading Error");
        assert_eq!(startup.message, "Failed to load data at startup: file missing");

        let import = load_error_dialog(LoadOrigin::Import, "bad header");
        assert_eq!(import.title, "Import Error");
        assert_eq!(import.message, "Failed to import data: bad header");
    }
}
