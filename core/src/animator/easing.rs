//! Easing curves used by the overlay animation.
//!
//! Inputs are normalized progress values; anything outside [0, 1] is clamped.

#[inline]
fn clamp_unit(t: f32) -> f32 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

/// Cubic ease-in/ease-out: slow start, fast middle, slow finish.
pub fn in_out_cubic(t: f32) -> f32 {
    let t = clamp_unit(t);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Cubic ease-out mapped onto `[from, to]`.
pub fn out_cubic_range(t: f32, from: f32, to: f32) -> f32 {
    let t = clamp_unit(t);
    from + (to - from) * (1.0 - (1.0 - t).powi(3))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn in_out_cubic_endpoints_and_midpoint() {
        assert!((in_out_cubic(0.0) - 0.0).abs() < EPS);
        assert!((in_out_cubic(0.5) - 0.5).abs() < EPS);
        assert!((in_out_cubic(1.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn in_out_cubic_clamps() {
        assert_eq!(in_out_cubic(-3.0), 0.0);
        assert_eq!(in_out_cubic(7.0), 1.0);
        assert_eq!(in_out_cubic(f32::NAN), 0.0);
    }

    #[test]
    fn in_out_cubic_is_monotonic() {
        let mut last = 0.0;
        for i in 0..=100 {
            let v = in_out_cubic(i as f32 / 100.0);
            assert!(v >= last, "curve decreased at step {i}");
            last = v;
        }
    }

    #[test]
    fn out_cubic_range_maps_endpoints() {
        assert!((out_cubic_range(0.0, 0.95, 1.05) - 0.95).abs() < EPS);
        assert!((out_cubic_range(1.0, 0.95, 1.05) - 1.05).abs() < EPS);
        // 1 - 0.5^3 = 0.875
        assert!((out_cubic_range(0.5, 0.0, 1.0) - 0.875).abs() < EPS);
    }
}
