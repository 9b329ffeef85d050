//! Fractional-index lookup into a wavetable

use serde::{Deserialize, Serialize};

/// Reads a table at a fractional index.
///
/// Callers keep `index` in `[0, table.len())`; implementations wrap any
/// neighbour beyond the end back to the start.
pub trait Interpolator: Send + Sync {
    fn sample(&self, table: &[f32], index: f64) -> f32;
}

/// Two-point linear interpolation
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearInterpolator;

impl Interpolator for LinearInterpolator {
    fn sample(&self, table: &[f32], index: f64) -> f32 {
        let len = table.len();
        let low = index.floor();
        let high = index.ceil();
        if low == high {
            return table[low as usize % len];
        }
        let upper = table[high as usize % len] as f64;
        let lower = table[low as usize % len] as f64;
        ((index - low) * upper + (high - index) * lower) as f32
    }
}

/// Nearest-neighbour lookup
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestInterpolator;

impl Interpolator for NearestInterpolator {
    fn sample(&self, table: &[f32], index: f64) -> f32 {
        table[index.round() as usize % table.len()]
    }
}

/// Four-point Hermite interpolation
#[derive(Debug, Clone, Copy, Default)]
pub struct CubicInterpolator;

impl Interpolator for CubicInterpolator {
    fn sample(&self, table: &[f32], index: f64) -> f32 {
        let len = table.len();
        let i = index.floor() as usize % len;
        let t = index - index.floor();
        if t == 0.0 {
            return table[i];
        }

        let y0 = table[(i + len - 1) % len] as f64;
        let y1 = table[i] as f64;
        let y2 = table[(i + 1) % len] as f64;
        let y3 = table[(i + 2) % len] as f64;

        let c1 = 0.5 * (y2 - y0);
        let c2 = y0 - 2.5 * y1 + 2.0 * y2 - 0.5 * y3;
        let c3 = 0.5 * (y3 - y0) + 1.5 * (y1 - y2);
        (((c3 * t + c2) * t + c1) * t + y1) as f32
    }
}

/// Interpolation strategy selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMode {
    Nearest,
    #[default]
    Linear,
    Cubic,
}

impl InterpolationMode {
    /// Boxed interpolator for this mode
    pub fn build(&self) -> Box<dyn Interpolator> {
        match self {
            InterpolationMode::Nearest => Box::new(NearestInterpolator),
            InterpolationMode::Linear => Box::new(LinearInterpolator),
            InterpolationMode::Cubic => Box::new(CubicInterpolator),
        }
    }
}
