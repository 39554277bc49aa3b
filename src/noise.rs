//! Memoizing 1D smooth noise.
//!
//! Control values sit at integer positions and are drawn from the RNG the
//! first time they are needed, then kept for the lifetime of the noise.
//! Between two control points the curve eases with [`smoothstep`], so it
//! passes exactly through every control value.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::error::{PlotError, Result};
use crate::function::{Annotation, AnnotationProvider, PlotFunction, smoothstep};

/// Affine remap `var * y + off` applied to interpolated noise values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseScale {
    /// Multiplier.
    pub var: f64,
    /// Additive offset.
    pub off: f64,
}

impl NoiseScale {
    /// Maps `[0, 1]` onto `[-1, 1]`.
    pub const UNIT_TO_SIGNED: Self = Self {
        var: 2.0,
        off: -1.0,
    };

    /// Apply the remap to a value.
    pub fn apply(self, y: f64) -> f64 {
        self.var * y + self.off
    }
}

/// Construction options for [`SmoothNoise`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseConfig {
    /// Lower bound of generated control values (inclusive).
    pub low: f64,
    /// Upper bound of generated control values (exclusive unless equal to `low`).
    pub high: f64,
    /// Optional remap applied to every evaluated value.
    pub scale: Option<NoiseScale>,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl NoiseConfig {
    /// Controls drawn from `[0, 1]` and remapped onto `[-1, 1]`.
    pub fn scaled() -> Self {
        Self {
            low: 0.0,
            high: 1.0,
            scale: Some(NoiseScale::UNIT_TO_SIGNED),
            seed: None,
        }
    }

    /// Use a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            low: -1.0,
            high: 1.0,
            scale: None,
            seed: None,
        }
    }
}

struct NoiseState {
    rng: StdRng,
    controls: BTreeMap<i64, f64>,
}

/// Lazily extended smooth noise over `t >= 0`.
///
/// Left of the origin the noise is defined as `0`. The control map only ever
/// grows; asking for annotations never creates control points.
///
/// State is guarded by a mutex so the function can be shared with other
/// threads, but plotting expects all evaluation on the UI thread.
pub struct SmoothNoise {
    state: Mutex<NoiseState>,
    low: f64,
    high: f64,
    scale: Option<NoiseScale>,
}

impl SmoothNoise {
    /// Noise with controls in `[-1, 1]` seeded from the OS.
    pub fn new() -> Self {
        Self::build(NoiseConfig::default())
    }

    /// Noise with a fixed seed and the default control range.
    pub fn seeded(seed: u64) -> Self {
        Self::build(NoiseConfig::default().with_seed(seed))
    }

    /// Noise from an explicit configuration.
    ///
    /// The control range must be finite with `low <= high`, and its width
    /// `high - low` must itself be finite.
    pub fn with_config(config: NoiseConfig) -> Result<Self> {
        let width = config.high - config.low;
        if !config.low.is_finite()
            || !config.high.is_finite()
            || config.low > config.high
            || !width.is_finite()
        {
            return Err(PlotError::invalid_noise_range(config.low, config.high));
        }
        Ok(Self::build(config))
    }

    fn build(config: NoiseConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            state: Mutex::new(NoiseState {
                rng,
                controls: BTreeMap::new(),
            }),
            low: config.low,
            high: config.high,
            scale: config.scale,
        }
    }

    /// Cached raw control value at `index`, without generating it.
    pub fn control_value(&self, index: i64) -> Option<f64> {
        self.lock().controls.get(&index).copied()
    }

    /// Number of control points generated so far.
    pub fn control_point_count(&self) -> usize {
        self.lock().controls.len()
    }

    fn lock(&self) -> MutexGuard<'_, NoiseState> {
        // The map is valid after any panic: entries are inserted whole.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn control_or_generate(&self, state: &mut NoiseState, index: i64) -> f64 {
        let (low, high) = (self.low, self.high);
        *state.controls.entry(index).or_insert_with(|| {
            let value = if low < high {
                state.rng.gen_range(low..high)
            } else {
                low
            };
            trace!(index, value, "generated noise control point");
            value
        })
    }

    fn rescale(&self, y: f64) -> f64 {
        match self.scale {
            Some(scale) => scale.apply(y),
            None => y,
        }
    }
}

impl Default for SmoothNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SmoothNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmoothNoise")
            .field("low", &self.low)
            .field("high", &self.high)
            .field("scale", &self.scale)
            .field("control_points", &self.control_point_count())
            .finish()
    }
}

impl PlotFunction for SmoothNoise {
    fn evaluate(&self, t: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        if !t.is_finite() {
            return f64::NAN;
        }

        let floor = t.floor();
        let frac = t - floor;
        let index = floor as i64;

        let (r0, r1) = {
            let mut guard = self.lock();
            let state = &mut *guard;
            let r0 = self.control_or_generate(state, index);
            let r1 = self.control_or_generate(state, index.saturating_add(1));
            (r0, r1)
        };

        self.rescale(r0 + smoothstep(frac) * (r1 - r0))
    }

    fn annotation_provider(&self) -> Option<&dyn AnnotationProvider> {
        Some(self)
    }
}

impl AnnotationProvider for SmoothNoise {
    fn annotations(&self, min_x: f64, max_x: f64) -> Box<dyn Iterator<Item = Annotation> + '_> {
        Box::new(ControlPoints::new(self, min_x, max_x))
    }
}

/// Walks generated control indices in `[min_x, max_x]` in ascending order.
///
/// The lock is taken per item so the caller may evaluate the noise while
/// iterating.
struct ControlPoints<'a> {
    noise: &'a SmoothNoise,
    next: Option<i64>,
    last: i64,
}

impl<'a> ControlPoints<'a> {
    fn new(noise: &'a SmoothNoise, min_x: f64, max_x: f64) -> Self {
        let first = min_x.ceil();
        let last = max_x.floor();
        let next = if first.is_nan() || last.is_nan() || first > last {
            None
        } else {
            Some(first as i64)
        };
        Self {
            noise,
            next,
            last: last as i64,
        }
    }
}

impl Iterator for ControlPoints<'_> {
    type Item = Annotation;

    fn next(&mut self) -> Option<Annotation> {
        let from = self.next?;
        if from > self.last {
            self.next = None;
            return None;
        }
        let found = {
            let state = self.noise.lock();
            state
                .controls
                .range(from..=self.last)
                .next()
                .map(|(index, _)| *index)
        };
        match found {
            Some(index) => {
                self.next = index.checked_add(1);
                Some(Annotation::filled(index as f64))
            }
            None => {
                self.next = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::MarkerKind;

    fn annotated_indices(noise: &SmoothNoise, min_x: f64, max_x: f64) -> Vec<f64> {
        let Some(provider) = noise.annotation_provider() else {
            return Vec::new();
        };
        provider.annotations(min_x, max_x).map(|a| a.x).collect()
    }

    #[test]
    fn negative_input_is_zero_and_generates_nothing() {
        let noise = SmoothNoise::seeded(1);
        assert_eq!(noise.evaluate(-0.0001), 0.0);
        assert_eq!(noise.evaluate(-42.0), 0.0);
        assert_eq!(noise.evaluate(f64::NEG_INFINITY), 0.0);
        assert_eq!(noise.control_point_count(), 0);
    }

    #[test]
    fn non_finite_input_is_nan() {
        let noise = SmoothNoise::seeded(1);
        assert!(noise.evaluate(f64::NAN).is_nan());
        assert!(noise.evaluate(f64::INFINITY).is_nan());
        assert_eq!(noise.control_point_count(), 0);
    }

    #[test]
    fn repeated_evaluation_is_identical() {
        let noise = SmoothNoise::new();
        let first = noise.evaluate(2.3);
        let second = noise.evaluate(2.3);
        assert_eq!(first, second);
        assert_eq!(noise.control_point_count(), 2);
    }

    #[test]
    fn control_values_stay_in_range() {
        let noise = SmoothNoise::seeded(7);
        for i in 0..200 {
            noise.evaluate(f64::from(i) + 0.5);
        }
        for i in 0..=200 {
            let value = noise.control_value(i).expect("generated");
            assert!((-1.0..1.0).contains(&value), "{value}");
        }
    }

    #[test]
    fn endpoints_hit_control_values() {
        let noise = SmoothNoise::seeded(11);
        let at_three = noise.evaluate(3.0);
        let r0 = noise.control_value(3).expect("generated");
        let r1 = noise.control_value(4).expect("generated");
        assert_eq!(at_three, r0);
        assert_eq!(noise.evaluate(4.0), r1);
        assert_eq!(noise.evaluate(3.5), r0 + 0.5 * (r1 - r0));
    }

    #[test]
    fn dense_sampling_shrinks_differences() {
        let noise = SmoothNoise::seeded(3);
        let max_step_difference = |step: f64| {
            let samples = (2.0 / step) as usize;
            (0..samples)
                .map(|k| {
                    let t = 1.5 + k as f64 * step;
                    (noise.evaluate(t + step) - noise.evaluate(t)).abs()
                })
                .fold(0.0_f64, f64::max)
        };
        let coarse = max_step_difference(0.01);
        let fine = max_step_difference(0.001);
        assert!(fine < coarse);
        // |d/dt| <= 1.5 * |r1 - r0| <= 3 for controls in [-1, 1].
        assert!(coarse <= 3.0 * 0.01 + 1e-12);
        assert!(fine <= 3.0 * 0.001 + 1e-12);
    }

    #[test]
    fn same_seed_same_curve() {
        let a = SmoothNoise::seeded(99);
        let b = SmoothNoise::seeded(99);
        for t in [0.0, 0.25, 5.75, 1.5, 12.0] {
            assert_eq!(a.evaluate(t), b.evaluate(t));
        }
    }

    #[test]
    fn annotations_do_not_seed_points() {
        let queried = SmoothNoise::seeded(5);
        let untouched = SmoothNoise::seeded(5);

        assert!(annotated_indices(&queried, 0.0, 100.0).is_empty());
        assert_eq!(queried.control_point_count(), 0);

        for t in [4.2, 0.1, 9.9] {
            assert_eq!(queried.evaluate(t), untouched.evaluate(t));
        }
    }

    #[test]
    fn annotations_report_generated_points_in_window() {
        let noise = SmoothNoise::seeded(2);
        noise.evaluate(2.5);
        noise.evaluate(7.0);

        assert_eq!(
            annotated_indices(&noise, 0.0, 10.0),
            vec![2.0, 3.0, 7.0, 8.0]
        );
        assert_eq!(annotated_indices(&noise, 2.5, 7.0), vec![3.0, 7.0]);
        assert_eq!(annotated_indices(&noise, 2.0, 2.0), vec![2.0]);
        assert!(annotated_indices(&noise, 8.5, 2.0).is_empty());
        assert!(annotated_indices(&noise, f64::NAN, 10.0).is_empty());

        let kinds: Vec<MarkerKind> = noise
            .annotations(f64::NEG_INFINITY, f64::INFINITY)
            .map(|annotation| annotation.kind)
            .collect();
        assert_eq!(kinds, vec![MarkerKind::Filled; 4]);
    }

    #[test]
    fn annotations_reflect_state_at_each_call() {
        let noise = SmoothNoise::seeded(4);
        noise.evaluate(1.0);
        assert_eq!(annotated_indices(&noise, 0.0, 5.0), vec![1.0, 2.0]);
        noise.evaluate(4.5);
        assert_eq!(
            annotated_indices(&noise, 0.0, 5.0),
            vec![1.0, 2.0, 4.0, 5.0]
        );
    }

    #[test]
    fn evaluating_while_iterating_does_not_block() {
        let noise = SmoothNoise::seeded(8);
        noise.evaluate(0.5);
        let mut markers = Vec::new();
        for annotation in noise.annotations(0.0, 10.0) {
            markers.push((annotation.x, noise.evaluate(annotation.x)));
        }
        // Evaluating at an integer materialises the next index, which the
        // lazy walk then reports, up to the end of the window.
        assert_eq!(markers.len(), 11);
        assert_eq!(noise.control_point_count(), 12);
        assert_eq!(markers[0].1, noise.control_value(0).expect("generated"));
    }

    #[test]
    fn scaled_variant_remaps_controls() {
        let config = NoiseConfig::scaled().with_seed(21);
        let noise = SmoothNoise::with_config(config).expect("valid");
        let value = noise.evaluate(6.0);
        let raw = noise.control_value(6).expect("generated");
        assert!((0.0..1.0).contains(&raw));
        assert_eq!(value, 2.0 * raw - 1.0);
    }

    #[test]
    fn rejects_inverted_range() {
        let config = NoiseConfig {
            low: 1.0,
            high: -1.0,
            ..NoiseConfig::default()
        };
        assert!(matches!(
            SmoothNoise::with_config(config),
            Err(PlotError::InvalidNoiseRange { .. })
        ));
    }

    #[test]
    fn rejects_range_wider_than_f64() {
        let config = NoiseConfig {
            low: -f64::MAX,
            high: f64::MAX,
            ..NoiseConfig::default()
        };
        assert!(matches!(
            SmoothNoise::with_config(config),
            Err(PlotError::InvalidNoiseRange { .. })
        ));

        let config = NoiseConfig {
            low: -f64::MAX / 2.0,
            high: f64::MAX / 2.0,
            seed: Some(5),
            ..NoiseConfig::default()
        };
        let noise = SmoothNoise::with_config(config).expect("finite width");
        assert!(noise.evaluate(0.5).is_finite());
    }

    #[test]
    fn degenerate_range_is_constant() {
        let config = NoiseConfig {
            low: 0.5,
            high: 0.5,
            ..NoiseConfig::default()
        };
        let noise = SmoothNoise::with_config(config).expect("valid");
        assert_eq!(noise.evaluate(3.7), 0.5);
    }
}
