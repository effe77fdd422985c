//! Angle helpers shared by the heading components. All values in degrees.

/// Reduce any angle into [0, 360). Negative values wrap forward.
pub fn normalize0_360(angle: f64) -> f64 {
    (angle % 360.0 + 360.0) % 360.0
}

// given two angles in degrees, the signed shortest rotation from b to a, in [-180, 180]
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let mut diff = a - b;
    if diff > 180.0 {
        diff -= 360.0;
    } else if diff < -180.0 {
        diff += 360.0;
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_normalize0_360() {
        assert_abs_diff_eq!(normalize0_360(370.0), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(normalize0_360(-10.0), 350.0, epsilon = 1e-9);
        assert_abs_diff_eq!(normalize0_360(720.0), 0.0);
        assert_abs_diff_eq!(normalize0_360(-1080.5), 359.5, epsilon = 1e-9);
        assert_eq!(normalize0_360(360.0), 0.0);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in [-725.25, -360.0, -0.5, 0.0, 12.75, 359.999, 360.0, 1000.0] {
            let once = normalize0_360(raw);
            assert_eq!(normalize0_360(once), once);
            assert!((0.0..360.0).contains(&once));
        }
    }

    #[test]
    fn test_reflected_alpha_stays_in_range() {
        let mut alpha = 0.0;
        while alpha < 360.0 {
            let h = normalize0_360(360.0 - alpha);
            assert!((0.0..360.0).contains(&h), "alpha {} gave {}", alpha, h);
            alpha += 0.25;
        }
    }

    #[test]
    fn test_angle_diff() {
        assert_abs_diff_eq!(angle_diff(10.0, 350.0), 20.0);
        assert_abs_diff_eq!(angle_diff(350.0, 10.0), -20.0);
        assert_abs_diff_eq!(angle_diff(90.0, 270.0), -180.0);
        assert_abs_diff_eq!(angle_diff(271.0, 90.0), -179.0);
        assert_abs_diff_eq!(angle_diff(45.0, 45.0), 0.0);
    }
}
