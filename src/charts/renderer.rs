//! Static Chart Renderer
//! Writes the prediction pie chart to a PNG file with plotters, using the same
//! slice geometry as the on-screen chart.

use crate::charts::pie::{
    pie_slices, LABEL_DISTANCE, PCT_DISTANCE, PIE_EXPLODE, PIE_LABELS, PIE_RGB, PIE_START_ANGLE,
};
use crate::model::Probabilities;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;

pub const EXPORT_SIZE: (u32, u32) = (800, 640);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to render")]
    Empty,
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the probability pie with a title line to `path`.
    pub fn render_pie_png(
        probabilities: &Probabilities,
        title: &str,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let slices = pie_slices(&probabilities.as_array(), PIE_START_ANGLE, &PIE_EXPLODE);
        if slices.is_empty() {
            return Err(RenderError::Empty);
        }

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let (w, h) = (size.0 as f64, size.1 as f64);
        let title_style = ("sans-serif", 26)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        root.draw(&Text::new(title.to_string(), ((w / 2.0) as i32, 16), title_style))
            .map_err(draw_err)?;

        let center = (w / 2.0, h / 2.0 + 20.0);
        let radius = w.min(h) * 0.3;
        let to_px = |(x, y): (f64, f64)| (x.round() as i32, y.round() as i32);

        for (i, slice) in slices.iter().enumerate() {
            if slice.sweep_deg <= 0.0 {
                continue;
            }
            let (r, g, b) = PIE_RGB[i];
            let points: Vec<(i32, i32)> = slice.outline(center, radius).into_iter().map(to_px).collect();
            root.draw(&Polygon::new(points, RGBColor(r, g, b).filled()))
                .map_err(draw_err)?;
        }

        for (i, slice) in slices.iter().enumerate() {
            let h_pos = if slice.mid_deg().to_radians().cos() >= 0.0 {
                HPos::Left
            } else {
                HPos::Right
            };
            let label_style = ("sans-serif", 22)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(h_pos, VPos::Center));
            root.draw(&Text::new(
                PIE_LABELS[i].to_string(),
                to_px(slice.anchor(center, radius, LABEL_DISTANCE)),
                label_style,
            ))
            .map_err(draw_err)?;

            let pct_style = ("sans-serif", 20)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center));
            root.draw(&Text::new(
                slice.percent_label(),
                to_px(slice.anchor(center, radius, PCT_DISTANCE)),
                pct_style,
            ))
            .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
        tracing::info!("Exported chart to {}", path.display());
        Ok(())
    }
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_probabilities_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let probabilities = Probabilities {
            not_diabetic: 0.0,
            diabetic: 0.0,
        };
        let result = StaticChartRenderer::render_pie_png(
            &probabilities,
            "Empty",
            &dir.path().join("pie.png"),
            EXPORT_SIZE,
        );
        assert!(matches!(result, Err(RenderError::Empty)));
    }

    #[test]
    fn prediction_pie_is_written_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diabetes_prediction.png");
        let probabilities = Probabilities {
            not_diabetic: 0.63,
            diabetic: 0.37,
        };

        StaticChartRenderer::render_pie_png(
            &probabilities,
            "Probability of being Diabetic: 37.00%",
            &path,
            EXPORT_SIZE,
        )
        .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }
}
