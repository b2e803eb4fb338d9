use std::f64::consts::PI;

use super::Reading;

/// Tilt of each axis against the gravity vector, in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltAngles {
    pub theta_x: f64,
    pub theta_y: f64,
    pub theta_z: f64,
}

impl TiltAngles {
    pub fn new(theta_x: f64, theta_y: f64, theta_z: f64) -> Self {
        Self { theta_x, theta_y, theta_z }
    }

    /// Computes the three inverse-tangent tilt angles of a reading.
    ///
    /// Denominators are not guarded: `z == 0` drives `theta_z` to ±90°, and an
    /// all-zero reading yields NaN on every axis. Those values are kept as-is.
    pub fn from_reading(reading: &Reading) -> Self {
        let Reading { x, y, z } = *reading;

        let theta_x = (x / (y * y + z * z).sqrt()).atan() * 180.0 / PI;
        let theta_y = (y / (x * x + z * z).sqrt()).atan() * 180.0 / PI;
        let theta_z = ((y * y + x * x).sqrt() / z).atan() * 180.0 / PI;

        Self { theta_x, theta_y, theta_z }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.theta_x, self.theta_y, self.theta_z]
    }

    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }
}

impl From<[f64; 3]> for TiltAngles {
    fn from(values: [f64; 3]) -> Self {
        Self::new(values[0], values[1], values[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn closed_form(x: f64, y: f64, z: f64) -> [f64; 3] {
        [
            (x / (y.powi(2) + z.powi(2)).sqrt()).atan().to_degrees(),
            (y / (x.powi(2) + z.powi(2)).sqrt()).atan().to_degrees(),
            ((x.powi(2) + y.powi(2)).sqrt() / z).atan().to_degrees(),
        ]
    }

    #[test]
    fn flat_device_is_level() {
        let angles = TiltAngles::from_reading(&Reading::new(0.0, 0.0, 9.8));
        assert!(angles.theta_x.abs() < EPS);
        assert!(angles.theta_y.abs() < EPS);
        assert!(angles.theta_z.abs() < EPS);
    }

    #[test]
    fn matches_closed_form_on_varied_readings() {
        let readings = [
            (1.2, -3.4, 9.1),
            (-9.8, 0.0, 0.5),
            (4.9, 4.9, 6.93),
            (0.01, 9.79, -0.3),
            (-2.0, -2.0, -9.0),
        ];

        for (x, y, z) in readings {
            let angles = TiltAngles::from_reading(&Reading::new(x, y, z));
            let expected = closed_form(x, y, z);
            for (got, want) in angles.as_array().iter().zip(expected.iter()) {
                assert!((got - want).abs() < EPS, "({x}, {y}, {z}): {got} vs {want}");
            }
        }
    }

    #[test]
    fn axis_aligned_gravity_gives_ninety_degrees() {
        let angles = TiltAngles::from_reading(&Reading::new(9.8, 0.0, 0.0));
        assert!((angles.theta_x - 90.0).abs() < EPS);
        assert!(angles.theta_y.abs() < EPS);
        // z == 0 divides by zero, atan(+inf) lands on 90°
        assert!((angles.theta_z - 90.0).abs() < EPS);
    }

    #[test]
    fn zero_reading_is_not_guarded() {
        let angles = TiltAngles::from_reading(&Reading::new(0.0, 0.0, 0.0));
        assert!(angles.theta_x.is_nan());
        assert!(angles.theta_y.is_nan());
        assert!(angles.theta_z.is_nan());
        assert!(!angles.is_finite());
    }
}
