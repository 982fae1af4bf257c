//! Easing curves.
//!
//! An easing curve maps linear progress in `[0, 1]` to the interpolation factor that is applied
//! to the bounds.

/// Interpolation curve selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Slow start, accelerating.
    EaseIn,
    /// Fast start, decelerating.
    EaseOut,
    /// Slow start and end.
    EaseInOut,
    /// Fast start and end, slow in the middle.
    FastInOut,
    /// Holds the start value until the animation completes.
    Zero,
}

impl Default for Easing {
    fn default() -> Self {
        Easing::EaseOut
    }
}

impl Easing {
    /// Evaluates the curve at progress `t`. The input is clamped to `[0, 1]`.
    pub fn evaluate(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0. } else { t.max(0.).min(1.) };

        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1. - (1. - t) * (1. - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2. * t * t
                } else {
                    1. - 2. * (1. - t) * (1. - t)
                }
            }
            Easing::FastInOut => ((t - 0.5).powi(3) + 0.125) / 0.25,
            Easing::Zero => {
                if t < 1. {
                    0.
                } else {
                    1.
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::FastInOut,
        Easing::Zero,
    ];

    #[test]
    fn endpoints() {
        for easing in &ALL {
            assert_eq!(easing.evaluate(0.), 0., "{:?} at 0", easing);
            assert_eq!(easing.evaluate(1.), 1., "{:?} at 1", easing);
        }
    }

    #[test]
    fn clamps_input() {
        for easing in &ALL {
            assert_eq!(easing.evaluate(-3.), 0.);
            assert_eq!(easing.evaluate(7.), 1.);
            assert_eq!(easing.evaluate(std::f64::NAN), 0.);
        }
    }

    #[test]
    fn monotonic_and_bounded() {
        for easing in &ALL {
            let mut last = 0.;
            for i in 0..=100 {
                let v = easing.evaluate(f64::from(i) / 100.);
                assert!(v >= last, "{:?} decreases at {}", easing, i);
                assert!(v >= 0. && v <= 1., "{:?} leaves [0, 1] at {}", easing, i);
                last = v;
            }
        }
    }

    #[test]
    fn symmetric_midpoints() {
        assert_eq!(Easing::Linear.evaluate(0.5), 0.5);
        assert_eq!(Easing::EaseInOut.evaluate(0.5), 0.5);
        assert_eq!(Easing::FastInOut.evaluate(0.5), 0.5);
        assert_eq!(Easing::EaseIn.evaluate(0.5), 0.25);
        assert_eq!(Easing::EaseOut.evaluate(0.5), 0.75);
    }
}
