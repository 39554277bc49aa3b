//! Plottable functions and their optional self-annotation facet.
//!
//! A function only has to evaluate itself. Functions that want to decorate
//! their own curve additionally expose an [`AnnotationProvider`] through
//! [`PlotFunction::annotation_provider`]; the renderer asks for it once per
//! frame instead of inspecting concrete types.

/// Marker drawn for an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Filled circle.
    Filled,
    /// Outlined circle.
    Outlined,
}

/// A marker a function reports at a domain X position.
///
/// The marker is placed on the curve, at `(x, f(x))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    /// Domain X position of the marker.
    pub x: f64,
    /// Marker appearance.
    pub kind: MarkerKind,
}

impl Annotation {
    /// Create a filled marker annotation.
    pub fn filled(x: f64) -> Self {
        Self {
            x,
            kind: MarkerKind::Filled,
        }
    }

    /// Create an outlined marker annotation.
    pub fn outlined(x: f64) -> Self {
        Self {
            x,
            kind: MarkerKind::Outlined,
        }
    }
}

/// A real function of one real variable.
///
/// Implementations may keep internal state (memoization) and must therefore
/// synchronise it themselves; the plotter only ever holds shared references.
pub trait PlotFunction: Send + Sync {
    /// Evaluate the function at a domain X value.
    fn evaluate(&self, x: f64) -> f64;

    /// Access the annotation facet, if the function has one.
    fn annotation_provider(&self) -> Option<&dyn AnnotationProvider> {
        None
    }
}

/// Source of per-function markers.
pub trait AnnotationProvider {
    /// Lazily enumerate annotations whose X lies within `[min_x, max_x]`.
    ///
    /// Each call reflects the current state of the function. The iterator
    /// must not hold internal locks between items: the caller evaluates the
    /// function while consuming it.
    fn annotations(&self, min_x: f64, max_x: f64) -> Box<dyn Iterator<Item = Annotation> + '_>;
}

/// A stateless function backed by a closure.
#[derive(Clone)]
pub struct FnFunction<F> {
    f: F,
}

impl<F> std::fmt::Debug for FnFunction<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnFunction(<closure>)")
    }
}

impl<F> PlotFunction for FnFunction<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn evaluate(&self, x: f64) -> f64 {
        (self.f)(x)
    }
}

/// Wrap a closure as a [`PlotFunction`] without annotations.
pub fn from_fn<F>(f: F) -> FnFunction<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    FnFunction { f }
}

/// Clamp `x` into `[lower, upper]`.
pub fn clamp(x: f64, lower: f64, upper: f64) -> f64 {
    if x < lower {
        lower
    } else if x > upper {
        upper
    } else {
        x
    }
}

/// Cubic Hermite ease on `[0, 1]`; inputs outside are clamped.
pub fn smoothstep(x: f64) -> f64 {
    let x = clamp(x, 0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

/// Smoothstep with `x` first normalised from `[edge0, edge1]`.
pub fn smoothstep_between(x: f64, edge0: f64, edge1: f64) -> f64 {
    smoothstep((x - edge0) / (edge1 - edge0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_fixed_points() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert_eq!(smoothstep(0.5), 0.5);
        assert_eq!(smoothstep(-3.0), 0.0);
        assert_eq!(smoothstep(7.0), 1.0);
    }

    #[test]
    fn smoothstep_is_monotonic() {
        let mut previous = smoothstep(0.0);
        for i in 1..=1000 {
            let next = smoothstep(f64::from(i) / 1000.0);
            assert!(next >= previous);
            previous = next;
        }
    }

    #[test]
    fn smoothstep_between_rescales_edges() {
        assert_eq!(smoothstep_between(2.0, 2.0, 4.0), 0.0);
        assert_eq!(smoothstep_between(3.0, 2.0, 4.0), 0.5);
        assert_eq!(smoothstep_between(9.0, 2.0, 4.0), 1.0);
    }

    #[test]
    fn closures_have_no_annotations() {
        let ramp = from_fn(|x| 0.75 + smoothstep(x) * (0.25 - 0.75));
        assert_eq!(ramp.evaluate(0.0), 0.75);
        assert_eq!(ramp.evaluate(1.0), 0.25);
        assert!(ramp.annotation_provider().is_none());
    }
}
