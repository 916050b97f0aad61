//! Chart Plotter Module
//! Draws the interactive visualizations with egui and egui_plot: per-column
//! histograms, the correlation heatmap and the prediction pie chart.

use crate::charts::pie::{
    pie_slices, LABEL_DISTANCE, PCT_DISTANCE, PIE_EXPLODE, PIE_LABELS, PIE_RGB, PIE_START_ANGLE,
};
use crate::model::Probabilities;
use crate::stats::{abbreviate, ColumnHistogram, CorrelationMatrix};
use egui::{Align2, Color32, FontId, Pos2, RichText, Stroke};
use egui_plot::{Bar, BarChart, Plot};

pub const HISTOGRAM_COLOR: Color32 = Color32::from_rgb(31, 119, 180);
const HISTOGRAMS_PER_ROW: usize = 3;

/// Diverging heatmap stops for -1, 0 and 1.
const HEATMAP_LOW: Color32 = Color32::from_rgb(59, 76, 192);
const HEATMAP_MID: Color32 = Color32::from_rgb(221, 221, 221);
const HEATMAP_HIGH: Color32 = Color32::from_rgb(180, 4, 38);

pub fn pie_color(index: usize) -> Color32 {
    let (r, g, b) = PIE_RGB[index % PIE_RGB.len()];
    Color32::from_rgb(r, g, b)
}

/// Map a correlation in [-1, 1] onto the heatmap palette.
pub fn heatmap_color(value: f64) -> Color32 {
    if value.is_nan() {
        return Color32::DARK_GRAY;
    }
    let v = value.clamp(-1.0, 1.0) as f32;
    if v < 0.0 {
        lerp_color(HEATMAP_MID, HEATMAP_LOW, -v)
    } else {
        lerp_color(HEATMAP_MID, HEATMAP_HIGH, v)
    }
}

fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgb(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}

/// Creates visualization charts using egui and egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Grid of small bar charts, one per numeric column.
    pub fn draw_histograms(ui: &mut egui::Ui, histograms: &[ColumnHistogram]) {
        let plot_width =
            (ui.available_width() / HISTOGRAMS_PER_ROW as f32 - 12.0).clamp(140.0, 320.0);

        egui::Grid::new("histogram_grid")
            .num_columns(HISTOGRAMS_PER_ROW)
            .spacing([10.0, 10.0])
            .show(ui, |ui| {
                for (i, hist) in histograms.iter().enumerate() {
                    ui.vertical(|ui| {
                        ui.label(RichText::new(&hist.name).size(12.0).strong());
                        Self::draw_histogram(ui, hist, plot_width);
                    });
                    if (i + 1) % HISTOGRAMS_PER_ROW == 0 {
                        ui.end_row();
                    }
                }
            });
    }

    fn draw_histogram(ui: &mut egui::Ui, hist: &ColumnHistogram, width: f32) {
        let bars: Vec<Bar> = hist
            .bins
            .iter()
            .map(|bin| {
                Bar::new(bin.center(), bin.count as f64)
                    .width(bin.width() * 0.95)
                    .fill(HISTOGRAM_COLOR)
                    .name(format!("{:.2} - {:.2}", bin.start, bin.end))
            })
            .collect();

        Plot::new(format!("hist_{}", hist.name))
            .width(width)
            .height(140.0)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .include_y(0.0)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(HISTOGRAM_COLOR).name(&hist.name));
            });
    }

    /// Annotated correlation heatmap with `.2f` cell labels.
    pub fn draw_heatmap(ui: &mut egui::Ui, matrix: &CorrelationMatrix) {
        if matrix.is_empty() {
            ui.label("No numeric columns");
            return;
        }
        let n = matrix.len();

        let label_width = 110.0;
        let label_height = 70.0;
        let cell = ((ui.available_width() - label_width - 10.0) / n as f32).clamp(28.0, 60.0);
        let size = egui::vec2(label_width + cell * n as f32, label_height + cell * n as f32);
        let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
        let origin = response.rect.min + egui::vec2(label_width, 0.0);
        let text_color = ui.visuals().text_color();

        for i in 0..n {
            for j in 0..n {
                let value = matrix.get(i, j);
                let min = origin + egui::vec2(j as f32 * cell, i as f32 * cell);
                let rect = egui::Rect::from_min_size(min, egui::vec2(cell, cell));
                painter.rect_filled(rect.shrink(0.5), 0.0, heatmap_color(value));

                let annotation = if value.is_nan() {
                    String::new()
                } else {
                    format!("{:.2}", value)
                };
                let ink = if value.abs() > 0.6 {
                    Color32::WHITE
                } else {
                    Color32::BLACK
                };
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    annotation,
                    FontId::proportional((cell * 0.28).min(13.0)),
                    ink,
                );
            }

            let row_center = origin + egui::vec2(-6.0, i as f32 * cell + cell / 2.0);
            painter.text(
                row_center,
                Align2::RIGHT_CENTER,
                abbreviate(&matrix.names[i], 16),
                FontId::proportional(11.0),
                text_color,
            );

            let col_anchor = origin + egui::vec2(i as f32 * cell + cell / 2.0, n as f32 * cell + 4.0);
            painter.text(
                col_anchor,
                Align2::CENTER_TOP,
                abbreviate(&matrix.names[i], 7),
                FontId::proportional(10.0),
                text_color,
            );
        }
    }

    /// Prediction pie: "Not Diabetic" exploded, start angle 90°, equal aspect.
    pub fn draw_probability_pie(ui: &mut egui::Ui, probabilities: &Probabilities, side: f32) {
        let (response, painter) =
            ui.allocate_painter(egui::vec2(side, side), egui::Sense::hover());
        let rect = response.rect;
        let center = (rect.center().x as f64, rect.center().y as f64);
        let radius = side as f64 * 0.32;
        let to_pos = |(x, y): (f64, f64)| Pos2::new(x as f32, y as f32);

        let slices = pie_slices(&probabilities.as_array(), PIE_START_ANGLE, &PIE_EXPLODE);
        for (i, slice) in slices.iter().enumerate() {
            if slice.sweep_deg <= 0.0 {
                continue;
            }
            for wedge in slice.wedges(center, radius, 90.0) {
                let points: Vec<Pos2> = wedge.into_iter().map(to_pos).collect();
                painter.add(egui::Shape::convex_polygon(
                    points,
                    pie_color(i),
                    Stroke::NONE,
                ));
            }
        }

        for (i, slice) in slices.iter().enumerate() {
            let label_pos = to_pos(slice.anchor(center, radius, LABEL_DISTANCE));
            let align = if slice.mid_deg().to_radians().cos() >= 0.0 {
                Align2::LEFT_CENTER
            } else {
                Align2::RIGHT_CENTER
            };
            painter.text(
                label_pos,
                align,
                PIE_LABELS[i],
                FontId::proportional(13.0),
                Color32::BLACK,
            );
            painter.text(
                to_pos(slice.anchor(center, radius, PCT_DISTANCE)),
                Align2::CENTER_CENTER,
                slice.percent_label(),
                FontId::proportional(12.0),
                Color32::BLACK,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pie_colors_match_reference_palette() {
        assert_eq!(pie_color(0), Color32::from_rgb(0xff, 0x99, 0x99));
        assert_eq!(pie_color(1), Color32::from_rgb(0x66, 0xb3, 0xff));
    }

    #[test]
    fn heatmap_palette_endpoints() {
        assert_eq!(heatmap_color(-1.0), HEATMAP_LOW);
        assert_eq!(heatmap_color(0.0), HEATMAP_MID);
        assert_eq!(heatmap_color(1.0), HEATMAP_HIGH);
        assert_eq!(heatmap_color(3.0), HEATMAP_HIGH);
        assert_eq!(heatmap_color(f64::NAN), Color32::DARK_GRAY);
    }
}
