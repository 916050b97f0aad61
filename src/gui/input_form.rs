//! Input Form Widget
//! One row per feature with the widget kind and range defined for it, plus the
//! predict button.

use crate::data::{Feature, FeatureInput, InputKind, InputSpec};
use egui::{Color32, RichText, Stroke};

/// Angular travel of the dial, centered on twelve o'clock.
const DIAL_SWEEP_DEG: f64 = 270.0;
const DIAL_SIZE: f32 = 40.0;

/// Actions triggered by the input form
#[derive(Debug, Clone, PartialEq)]
pub enum InputFormAction {
    None,
    Predict,
}

#[derive(Default)]
pub struct InputForm {
    pub values: FeatureInput,
}

impl InputForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the form
    pub fn show(&mut self, ui: &mut egui::Ui) -> InputFormAction {
        let mut action = InputFormAction::None;

        egui::Grid::new("feature_inputs")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                for feature in Feature::ALL {
                    ui.label(RichText::new(format!("{}:", feature.column_name())).strong());
                    self.feature_widget(ui, feature);
                    ui.end_row();
                }
            });

        ui.add_space(12.0);
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(
                RichText::new("Predict Diabetes")
                    .size(15.0)
                    .color(Color32::WHITE),
            )
            .min_size(egui::vec2(200.0, 35.0));
            if ui.add(button).clicked() {
                action = InputFormAction::Predict;
            }
        });

        action
    }

    fn feature_widget(&mut self, ui: &mut egui::Ui, feature: Feature) {
        let spec = feature.input_spec();
        let mut value = self.values.get(feature);

        ui.horizontal(|ui| {
            match spec.kind {
                InputKind::Slider => {
                    ui.add(
                        egui::Slider::new(&mut value, spec.min..=spec.max)
                            .step_by(1.0)
                            .show_value(false),
                    );
                }
                InputKind::Dial => {
                    dial(ui, &mut value, spec.min, spec.max);
                }
                InputKind::SpinBox => {
                    ui.add(
                        egui::DragValue::new(&mut value)
                            .range(spec.min..=spec.max)
                            .speed(1.0)
                            .fixed_decimals(0),
                    );
                }
                InputKind::DoubleSpinBox { decimals } => {
                    let response = ui.add(
                        egui::DragValue::new(&mut value)
                            .range(spec.min..=spec.max)
                            .speed(10f64.powi(-(decimals as i32)))
                            .fixed_decimals(decimals),
                    );
                    if response.changed() {
                        value = round_to_decimals(value, decimals);
                    }
                }
            }

            if let Some(text) = value_label(&spec, value) {
                ui.label(text);
            }
        });

        self.values.set(feature, value);
    }
}

/// Live value label for sliders and dials.
pub fn value_label(spec: &InputSpec, value: f64) -> Option<String> {
    spec.shows_value_label()
        .then(|| format!("{}", value.round() as i64))
}

pub fn round_to_decimals(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Map a pointer offset from the dial center to a value. Offsets are in
/// screen coordinates; the dial's travel is centered on twelve o'clock.
pub fn dial_value_from_offset(dx: f32, dy: f32, min: f64, max: f64) -> f64 {
    let angle = (dx as f64).atan2(-dy as f64).to_degrees();
    let t = ((angle + DIAL_SWEEP_DEG / 2.0) / DIAL_SWEEP_DEG).clamp(0.0, 1.0);
    (min + t * (max - min)).round()
}

/// Rotary integer control. Click or drag to point the knob.
fn dial(ui: &mut egui::Ui, value: &mut f64, min: f64, max: f64) -> egui::Response {
    let (rect, mut response) =
        ui.allocate_exact_size(egui::vec2(DIAL_SIZE, DIAL_SIZE), egui::Sense::click_and_drag());

    if let Some(pointer) = response.interact_pointer_pos() {
        let offset = pointer - rect.center();
        let new_value = dial_value_from_offset(offset.x, offset.y, min, max);
        if new_value != *value {
            *value = new_value;
            response.mark_changed();
        }
    }

    if ui.is_rect_visible(rect) {
        let visuals = ui.style().interact(&response);
        let center = rect.center();
        let radius = rect.width() / 2.0 - 2.0;
        ui.painter()
            .circle(center, radius, visuals.bg_fill, visuals.fg_stroke);

        let t = if max > min {
            (*value - min) / (max - min)
        } else {
            0.0
        };
        let angle = (-DIAL_SWEEP_DEG / 2.0 + t * DIAL_SWEEP_DEG).to_radians() as f32;
        let tip = center + egui::vec2(angle.sin(), -angle.cos()) * (radius - 4.0);
        ui.painter()
            .line_segment([center, tip], Stroke::new(2.5, visuals.fg_stroke.color));
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_labels_only_for_sliders_and_dials() {
        assert_eq!(
            value_label(&Feature::Age.input_spec(), 42.0),
            Some("42".to_string())
        );
        assert_eq!(
            value_label(&Feature::SkinThickness.input_spec(), 10.0),
            Some("10".to_string())
        );
        assert_eq!(value_label(&Feature::Glucose.input_spec(), 120.0), None);
    }

    #[test]
    fn decimal_spin_boxes_round_to_their_precision() {
        assert_eq!(round_to_decimals(33.6789, 2), 33.68);
        assert_eq!(round_to_decimals(0.62749, 3), 0.627);
    }

    #[test]
    fn dial_maps_pointer_angle_onto_range() {
        // straight up is the middle of the travel
        assert_eq!(dial_value_from_offset(0.0, -10.0, 10.0, 50.0), 30.0);
        // pointing left of the start clamps to the minimum
        assert_eq!(dial_value_from_offset(-10.0, 10.0, 10.0, 50.0), 10.0);
        assert_eq!(dial_value_from_offset(10.0, 10.0, 10.0, 50.0), 50.0);
        // three o'clock is 225 of 270 degrees
        assert_eq!(dial_value_from_offset(10.0, 0.0, 10.0, 50.0), 43.0);
    }

    #[test]
    fn new_form_starts_at_minimums() {
        let form = InputForm::new();
        assert_eq!(form.values, FeatureInput::default());
    }
}
