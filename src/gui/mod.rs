//! GUI module - User interface components

mod analysis_window;
mod app;
mod dialog;
mod input_form;

pub use analysis_window::AnalysisWindow;
pub use app::DiabetesApp;
pub use dialog::{DialogQueue, MessageDialog};
pub use input_form::{InputForm, InputFormAction};
