//! Adaptive numerical integration of one-dimensional functions.
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Error;

/// The result of a numerical integration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub value: f64,
    /// An estimate of the absolute error.
    pub error: f64,
    /// The number of function evaluations.
    pub evaluations: usize,
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ± {:.1e}", self.value, self.error)
    }
}

/// Adaptive Simpson quadrature with Richardson extrapolation.
///
/// An interval is bisected until the difference between the Simpson
/// estimate on the interval and the sum of the estimates on its halves
/// drops below `15 * tolerance`, where the tolerance is halved with every
/// bisection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveSimpson {
    pub tolerance: f64,
    pub max_depth: u32,
}

impl Default for AdaptiveSimpson {
    fn default() -> Self {
        AdaptiveSimpson {
            tolerance: 1e-10,
            max_depth: 48,
        }
    }
}

struct Segment {
    a: f64,
    b: f64,
    fa: f64,
    fm: f64,
    fb: f64,
    whole: f64,
    tolerance: f64,
    depth: u32,
}

impl AdaptiveSimpson {
    pub fn new(tolerance: f64, max_depth: u32) -> Result<AdaptiveSimpson, Error> {
        let s = AdaptiveSimpson {
            tolerance,
            max_depth,
        };
        s.validate()?;
        Ok(s)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.) {
            return Err(Error::invalid_parameter(
                "tolerance",
                format!("must be positive and finite, got {}", self.tolerance),
            ));
        }
        if self.max_depth == 0 {
            return Err(Error::invalid_parameter("max_depth", "must be at least 1"));
        }
        Ok(())
    }

    /// Integrate `f` over `[lower, upper]`. Reversed bounds flip the sign.
    ///
    /// ```
    /// use symcalc::numerical_integration::AdaptiveSimpson;
    ///
    /// let r = AdaptiveSimpson::default().integrate(|x| x.sin(), 0., std::f64::consts::PI).unwrap();
    /// assert!((r.value - 2.).abs() < 1e-9);
    /// ```
    pub fn integrate<F: Fn(f64) -> f64>(
        &self,
        f: F,
        lower: f64,
        upper: f64,
    ) -> Result<Estimate, Error> {
        self.validate()?;

        if !(lower.is_finite() && upper.is_finite()) {
            return Err(Error::NoConvergence {
                lower,
                upper,
                reason: "the bounds must be finite".into(),
            });
        }

        if lower == upper {
            return Ok(Estimate {
                value: 0.,
                error: 0.,
                evaluations: 0,
            });
        }

        if lower > upper {
            let mut r = self.integrate(f, upper, lower)?;
            r.value = -r.value;
            return Ok(r);
        }

        let non_finite = |x: f64| Error::NoConvergence {
            lower,
            upper,
            reason: format!("the integrand is not finite at {}", x),
        };

        let eval = |x: f64| {
            let v = f(x);
            if v.is_finite() {
                Ok(v)
            } else {
                Err(non_finite(x))
            }
        };

        let m = 0.5 * (lower + upper);
        let (fa, fm, fb) = (eval(lower)?, eval(m)?, eval(upper)?);
        let mut evaluations = 3;

        let mut stack = vec![Segment {
            a: lower,
            b: upper,
            fa,
            fm,
            fb,
            whole: simpson(lower, upper, fa, fm, fb),
            tolerance: self.tolerance,
            depth: 0,
        }];

        let mut value = 0.;
        let mut error = 0.;
        while let Some(s) = stack.pop() {
            let m = 0.5 * (s.a + s.b);
            let (lm, rm) = (0.5 * (s.a + m), 0.5 * (m + s.b));
            let (flm, frm) = (eval(lm)?, eval(rm)?);
            evaluations += 2;

            let left = simpson(s.a, m, s.fa, flm, s.fm);
            let right = simpson(m, s.b, s.fm, frm, s.fb);
            let delta = left + right - s.whole;

            if delta.abs() <= 15. * s.tolerance {
                value += left + right + delta / 15.;
                error += delta.abs() / 15.;
                continue;
            }

            if s.depth + 1 >= self.max_depth {
                warn!(
                    "Maximum depth reached on [{}, {}] with difference {:e}",
                    s.a, s.b, delta
                );
                return Err(Error::NoConvergence {
                    lower,
                    upper,
                    reason: format!(
                        "maximum bisection depth {} reached on [{}, {}]",
                        self.max_depth, s.a, s.b
                    ),
                });
            }

            stack.push(Segment {
                a: m,
                b: s.b,
                fa: s.fm,
                fm: frm,
                fb: s.fb,
                whole: right,
                tolerance: 0.5 * s.tolerance,
                depth: s.depth + 1,
            });
            stack.push(Segment {
                a: s.a,
                b: m,
                fa: s.fa,
                fm: flm,
                fb: s.fm,
                whole: left,
                tolerance: 0.5 * s.tolerance,
                depth: s.depth + 1,
            });
        }

        debug!(
            "Integrated over [{}, {}] with {} evaluations",
            lower, upper, evaluations
        );

        Ok(Estimate {
            value,
            error,
            evaluations,
        })
    }
}

#[inline]
fn simpson(a: f64, b: f64, fa: f64, fm: f64, fb: f64) -> f64 {
    (b - a) / 6. * (fa + 4. * fm + fb)
}
