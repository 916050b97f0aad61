//! Pie Geometry
//! Slice angles and outlines shared by the on-screen chart and the PNG export.
//! Angles are in degrees, counter-clockwise, 0° at three o'clock; outlines are
//! in screen coordinates (y grows downward).

/// Slice order of the prediction pie.
pub const PIE_LABELS: [&str; 2] = ["Not Diabetic", "Diabetic"];
/// `#ff9999`, `#66b3ff`
pub const PIE_RGB: [(u8, u8, u8); 2] = [(0xff, 0x99, 0x99), (0x66, 0xb3, 0xff)];
/// Radial offset of each slice as a fraction of the radius.
pub const PIE_EXPLODE: [f64; 2] = [0.1, 0.0];
pub const PIE_START_ANGLE: f64 = 90.0;
/// Distance of the text label from the center, in radii.
pub const LABEL_DISTANCE: f64 = 1.1;
/// Distance of the percentage label from the center, in radii.
pub const PCT_DISTANCE: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSlice {
    pub fraction: f64,
    pub start_deg: f64,
    pub sweep_deg: f64,
    pub explode: f64,
}

impl PieSlice {
    pub fn mid_deg(&self) -> f64 {
        self.start_deg + self.sweep_deg / 2.0
    }

    /// Center of this slice after applying the explode offset.
    pub fn center(&self, center: (f64, f64), radius: f64) -> (f64, f64) {
        polar(center, radius * self.explode, self.mid_deg())
    }

    /// Point along the slice bisector at `distance` radii.
    pub fn anchor(&self, center: (f64, f64), radius: f64, distance: f64) -> (f64, f64) {
        polar(self.center(center, radius), radius * distance, self.mid_deg())
    }

    /// Closed outline: slice center followed by arc points.
    pub fn outline(&self, center: (f64, f64), radius: f64) -> Vec<(f64, f64)> {
        self.outline_from(self.center(center, radius), radius)
    }

    /// The outline split into convex wedges of at most `max_sweep` degrees.
    pub fn wedges(&self, center: (f64, f64), radius: f64, max_sweep: f64) -> Vec<Vec<(f64, f64)>> {
        let count = ((self.sweep_deg / max_sweep).ceil() as usize).max(1);
        let part = self.sweep_deg / count as f64;
        (0..count)
            .map(|i| {
                PieSlice {
                    start_deg: self.start_deg + part * i as f64,
                    sweep_deg: part,
                    ..*self
                }
                .outline_from(self.center(center, radius), radius)
            })
            .collect()
    }

    fn outline_from(&self, origin: (f64, f64), radius: f64) -> Vec<(f64, f64)> {
        let steps = (self.sweep_deg.abs().ceil() as usize).max(1);
        let mut points = Vec::with_capacity(steps + 2);
        points.push(origin);
        for i in 0..=steps {
            let angle = self.start_deg + self.sweep_deg * i as f64 / steps as f64;
            points.push(polar(origin, radius, angle));
        }
        points
    }

    /// `%1.1f%%` percentage text.
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.fraction * 100.0)
    }
}

fn polar(origin: (f64, f64), r: f64, angle_deg: f64) -> (f64, f64) {
    let rad = angle_deg.to_radians();
    (origin.0 + r * rad.cos(), origin.1 - r * rad.sin())
}

/// Lay out slices counter-clockwise from `start_deg`. Values are normalized
/// by their sum; an all-zero input yields no slices.
pub fn pie_slices(values: &[f64], start_deg: f64, explode: &[f64]) -> Vec<PieSlice> {
    let total: f64 = values.iter().filter(|v| v.is_finite() && **v > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut angle = start_deg;
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let fraction = if v.is_finite() && v > 0.0 { v / total } else { 0.0 };
            let slice = PieSlice {
                fraction,
                start_deg: angle,
                sweep_deg: fraction * 360.0,
                explode: explode.get(i).copied().unwrap_or(0.0),
            };
            angle += slice.sweep_deg;
            slice
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn slices_cover_full_circle_from_start_angle() {
        let slices = pie_slices(&[0.7, 0.3], PIE_START_ANGLE, &PIE_EXPLODE);
        assert_eq!(slices.len(), 2);
        assert!(approx(slices[0].start_deg, 90.0));
        assert!(approx(slices[0].sweep_deg, 252.0));
        assert!(approx(slices[1].start_deg, 342.0));
        assert!(approx(slices[0].sweep_deg + slices[1].sweep_deg, 360.0));
        assert_eq!(slices[0].explode, 0.1);
        assert_eq!(slices[1].explode, 0.0);
    }

    #[test]
    fn percent_labels_use_one_decimal() {
        let slices = pie_slices(&[0.125, 0.875], PIE_START_ANGLE, &PIE_EXPLODE);
        assert_eq!(slices[0].percent_label(), "12.5%");
        assert_eq!(slices[1].percent_label(), "87.5%");
    }

    #[test]
    fn zero_slice_has_no_sweep() {
        let slices = pie_slices(&[1.0, 0.0], PIE_START_ANGLE, &PIE_EXPLODE);
        assert!(approx(slices[0].sweep_deg, 360.0));
        assert!(approx(slices[1].sweep_deg, 0.0));
        assert!(pie_slices(&[0.0, 0.0], 90.0, &[]).is_empty());
    }

    #[test]
    fn exploded_slice_moves_along_its_bisector() {
        // a half pie starting at 90° bisects at 180°, i.e. to the left
        let slices = pie_slices(&[0.5, 0.5], 90.0, &[0.1, 0.0]);
        let (cx, cy) = slices[0].center((100.0, 100.0), 50.0);
        assert!(approx(cx, 95.0));
        assert!(approx(cy, 100.0));
        assert_eq!(slices[1].center((100.0, 100.0), 50.0), (100.0, 100.0));
    }

    #[test]
    fn first_slice_starts_at_the_top() {
        let slices = pie_slices(&[0.25, 0.75], 90.0, &[0.0, 0.0]);
        let outline = slices[0].outline((0.0, 0.0), 10.0);
        let (x, y) = outline[1];
        assert!(approx(x, 0.0));
        assert!(approx(y, -10.0));
    }

    #[test]
    fn wedges_stay_under_max_sweep() {
        let slices = pie_slices(&[0.9, 0.1], 90.0, &[0.0, 0.0]);
        let wedges = slices[0].wedges((0.0, 0.0), 10.0, 90.0);
        assert_eq!(wedges.len(), 4);
        assert!(wedges.iter().all(|w| w[0] == (0.0, 0.0)));
    }
}
