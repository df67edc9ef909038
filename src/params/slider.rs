//! Slider quantization.
//!
//! A slider is a 0..=100 integer proxy for a parameter value. The mapping is
//! derived from the parameter bounds and must be rebuilt with
//! [`SliderQuantizer::rescale`] whenever `min` or `max` changes; slider drags
//! write `val` only through this mapping.

use crate::domain::Parameter;
use crate::error::ParamError;

/// Number of slider steps between `min` and `max`.
pub const SLIDER_STEPS: u8 = 100;
/// Keyboard single step.
pub const SINGLE_STEP: i32 = 1;
/// Keyboard page step.
pub const PAGE_STEP: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderQuantizer {
    min: f64,
    max: f64,
    scale: f64,
    inverse_scale: f64,
}

impl SliderQuantizer {
    pub fn new(min: f64, max: f64) -> Result<Self, ParamError> {
        let (scale, inverse_scale) = scales(min, max)?;
        Ok(Self {
            min,
            max,
            scale,
            inverse_scale,
        })
    }

    pub fn for_param(param: &Parameter) -> Result<Self, ParamError> {
        Self::new(param.min, param.max)
    }

    /// Rebuild the mapping for new bounds. On error the previous mapping is kept.
    pub fn rescale(&mut self, min: f64, max: f64) -> Result<(), ParamError> {
        let (scale, inverse_scale) = scales(min, max)?;
        self.min = min;
        self.max = max;
        self.scale = scale;
        self.inverse_scale = inverse_scale;
        Ok(())
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Quantize a value to a slider position.
    pub fn to_position(&self, val: f64) -> u8 {
        let raw = ((val - self.min) * self.scale).round();
        if raw.is_nan() {
            return 0;
        }
        raw.clamp(0.0, f64::from(SLIDER_STEPS)) as u8
    }

    /// Map a slider position back to a value. Positions above the top step are
    /// treated as the top step.
    pub fn to_value(&self, position: u8) -> f64 {
        let position = position.min(SLIDER_STEPS);
        f64::from(position) * self.inverse_scale + self.min
    }

    /// Move `position` by `steps`, saturating at both ends.
    pub fn step(position: u8, steps: i32) -> u8 {
        (i32::from(position) + steps).clamp(0, i32::from(SLIDER_STEPS)) as u8
    }
}

fn scales(min: f64, max: f64) -> Result<(f64, f64), ParamError> {
    let width = max - min;
    // Inverted bounds are degenerate too; NaN fails `is_finite`.
    if width <= 0.0 || !width.is_finite() {
        return Err(ParamError::DegenerateRange { min, max });
    }
    let scale = f64::from(SLIDER_STEPS) / width;
    Ok((scale, 1.0 / scale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_within_one_step() {
        let q = SliderQuantizer::new(-3.0, 7.0).unwrap();
        let tolerance = (7.0 - -3.0) / 100.0;
        let mut v = -3.0;
        while v <= 7.0 {
            let back = q.to_value(q.to_position(v));
            assert!((back - v).abs() <= tolerance, "v={v} back={back}");
            v += 0.037;
        }
    }

    #[test]
    fn positions_are_monotonic_and_clamped() {
        let q = SliderQuantizer::new(0.0, 2.0).unwrap();
        let mut last = 0;
        for i in 0..=200 {
            let p = q.to_position(i as f64 * 0.01);
            assert!(p >= last);
            last = p;
        }
        assert_eq!(q.to_position(-5.0), 0);
        assert_eq!(q.to_position(5.0), 100);
        assert_eq!(q.to_position(1.0), 50);
        assert!((q.to_value(100) - 2.0).abs() < 1e-12);
        assert_eq!(q.to_value(250), q.to_value(100));
    }

    #[test]
    fn degenerate_range_is_rejected() {
        assert_eq!(
            SliderQuantizer::new(1.0, 1.0).unwrap_err(),
            ParamError::DegenerateRange { min: 1.0, max: 1.0 }
        );
        assert!(SliderQuantizer::new(0.0, f64::INFINITY).is_err());

        let mut q = SliderQuantizer::new(0.0, 1.0).unwrap();
        assert!(q.rescale(4.0, 4.0).is_err());
        assert_eq!(q.bounds(), (0.0, 1.0));
    }

    #[test]
    fn rescale_changes_mapping() {
        let mut q = SliderQuantizer::new(0.0, 1.0).unwrap();
        assert_eq!(q.to_position(0.5), 50);
        q.rescale(0.0, 10.0).unwrap();
        assert_eq!(q.to_position(0.5), 5);
        assert!((q.to_value(50) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn inverted_range_is_degenerate() {
        assert_eq!(
            SliderQuantizer::new(10.0, 0.0).unwrap_err(),
            ParamError::DegenerateRange { min: 10.0, max: 0.0 }
        );
        assert!(SliderQuantizer::new(f64::NAN, 1.0).is_err());

        let mut q = SliderQuantizer::new(0.0, 1.0).unwrap();
        assert!(q.rescale(2.0, 1.0).is_err());
        assert_eq!(q.bounds(), (0.0, 1.0));
    }

    #[test]
    fn step_saturates() {
        assert_eq!(SliderQuantizer::step(95, PAGE_STEP), 100);
        assert_eq!(SliderQuantizer::step(3, -PAGE_STEP), 0);
        assert_eq!(SliderQuantizer::step(40, SINGLE_STEP), 41);
    }
}
