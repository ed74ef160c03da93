//! Display thresholds for the activity overlay.
//!
//! Thresholds are percentiles of |value| over the whole estimate, computed
//! once per job so every frame of an animation shares one color scale:
//! fmin = P96, fmid = P97.5, fmax = P99.95. Values below fmin are invisible,
//! the overlay fades in between fmin and fmid, and the color ramp spans
//! fmin..fmax.

const FMIN_PERCENTILE: f32 = 96.0;
const FMID_PERCENTILE: f32 = 97.5;
const FMAX_PERCENTILE: f32 = 99.95;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityScale {
    pub fmin: f32,
    pub fmid: f32,
    pub fmax: f32,
}

impl ActivityScale {
    /// Derive thresholds from every sample of the estimate. Non-finite
    /// samples are ignored; an empty or all-NaN input falls back to a unit
    /// scale that shows nothing.
    pub fn from_data(data: &[f32]) -> Self {
        let mut magnitudes: Vec<f32> = data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .map(f32::abs)
            .collect();
        if magnitudes.is_empty() {
            return Self {
                fmin: 0.0,
                fmid: 0.5,
                fmax: 1.0,
            };
        }

        let fmin = percentile(&mut magnitudes, FMIN_PERCENTILE);
        let fmid = percentile(&mut magnitudes, FMID_PERCENTILE);
        let fmax = percentile(&mut magnitudes, FMAX_PERCENTILE);
        Self::clamped(fmin, fmid, fmax)
    }

    /// Force fmin < fmid < fmax even for degenerate data (constant input,
    /// single sample).
    fn clamped(fmin: f32, fmid: f32, fmax: f32) -> Self {
        let mut fmax = fmax;
        if !(fmax > fmin) {
            fmax = fmin + fmin.abs().max(1.0) * 1e-6;
        }
        let mut fmid = fmid;
        if !(fmid > fmin && fmid < fmax) {
            fmid = 0.5 * (fmin + fmax);
        }
        Self { fmin, fmid, fmax }
    }

    /// Overlay opacity for one sample: 0 below fmin, ramping to 1 at fmid,
    /// saturated above.
    pub fn opacity(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return 0.0;
        }
        let magnitude = value.abs();
        if magnitude <= self.fmin {
            0.0
        } else if magnitude >= self.fmid {
            1.0
        } else {
            (magnitude - self.fmin) / (self.fmid - self.fmin)
        }
    }

    /// Normalized LUT position for one sample.
    ///
    /// Sequential palettes map |value| onto [0, 1]. Diverging palettes keep
    /// sign: the midpoint is neutral and the two signs ramp outward to the
    /// two ends.
    pub fn lut_position(&self, value: f32, diverging: bool) -> f32 {
        if !value.is_finite() {
            return if diverging { 0.5 } else { 0.0 };
        }
        let ramp = ((value.abs() - self.fmin) / (self.fmax - self.fmin)).clamp(0.0, 1.0);
        if diverging {
            if value < 0.0 {
                0.5 - 0.5 * ramp
            } else {
                0.5 + 0.5 * ramp
            }
        } else {
            ramp
        }
    }
}

/// Percentile by selection; `pct` in [0, 100]. Partially reorders `values`.
fn percentile(values: &mut [f32], pct: f32) -> f32 {
    let rank = ((pct / 100.0) * (values.len() - 1) as f32).round() as usize;
    let rank = rank.min(values.len() - 1);
    let (_, nth, _) = values.select_nth_unstable_by(rank, |a, b| a.total_cmp(b));
    *nth
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentiles_of_a_linear_ramp() {
        // 0..=1000 so the percentile ranks are exact.
        let data: Vec<f32> = (0..=1000).map(|v| v as f32).collect();
        let scale = ActivityScale::from_data(&data);
        assert_eq!(scale.fmin, 960.0);
        assert_eq!(scale.fmid, 975.0);
        assert!((scale.fmax - 1000.0).abs() <= 1.0);
    }

    #[test]
    fn negative_values_count_by_magnitude() {
        let data: Vec<f32> = (0..=1000).map(|v| -(v as f32)).collect();
        let scale = ActivityScale::from_data(&data);
        assert_eq!(scale.fmin, 960.0);
    }

    #[test]
    fn opacity_ramps_between_fmin_and_fmid() {
        let scale = ActivityScale {
            fmin: 10.0,
            fmid: 20.0,
            fmax: 40.0,
        };
        assert_eq!(scale.opacity(5.0), 0.0);
        assert_eq!(scale.opacity(10.0), 0.0);
        assert!((scale.opacity(15.0) - 0.5).abs() < 1e-6);
        assert_eq!(scale.opacity(20.0), 1.0);
        assert_eq!(scale.opacity(1000.0), 1.0);
        assert_eq!(scale.opacity(-15.0), scale.opacity(15.0));
        assert_eq!(scale.opacity(f32::NAN), 0.0);
    }

    #[test]
    fn diverging_positions_are_symmetric_about_the_midpoint() {
        let scale = ActivityScale {
            fmin: 1.0,
            fmid: 2.0,
            fmax: 5.0,
        };
        let up = scale.lut_position(3.0, true);
        let down = scale.lut_position(-3.0, true);
        assert!((up - 0.5) > 0.0);
        assert!(((up - 0.5) + (down - 0.5)).abs() < 1e-6);
        assert_eq!(scale.lut_position(0.5, true), 0.5);
        assert_eq!(scale.lut_position(99.0, true), 1.0);
        assert_eq!(scale.lut_position(-99.0, true), 0.0);
    }

    #[test]
    fn sequential_positions_span_the_ramp() {
        let scale = ActivityScale {
            fmin: 1.0,
            fmid: 2.0,
            fmax: 5.0,
        };
        assert_eq!(scale.lut_position(0.0, false), 0.0);
        assert_eq!(scale.lut_position(1.0, false), 0.0);
        assert!((scale.lut_position(3.0, false) - 0.5).abs() < 1e-6);
        assert_eq!(scale.lut_position(5.0, false), 1.0);
        assert_eq!(scale.lut_position(500.0, false), 1.0);
    }

    #[test]
    fn constant_data_still_yields_an_ordered_scale() {
        let scale = ActivityScale::from_data(&[3.0; 64]);
        assert!(scale.fmin < scale.fmid && scale.fmid < scale.fmax);
        // Nothing at the constant value itself lights up.
        assert_eq!(scale.opacity(3.0), 0.0);
    }

    #[test]
    fn empty_and_all_nan_data_fall_back_to_the_unit_scale() {
        for data in [vec![], vec![f32::NAN; 8]] {
            let scale = ActivityScale::from_data(&data);
            assert!(scale.fmin < scale.fmid && scale.fmid < scale.fmax);
        }
    }
}
