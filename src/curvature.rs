//! The radius of curvature of parametric curves.
//!
//! For a curve `(x(θ), y(θ))` the radius of curvature is
//!
//! ```text
//! R(θ) = (x'² + y'²)^(3/2) / |x' y'' - y' x''|
//! ```
//!
//! [`Ellipse`] evaluates the closed form for `x = a cos(θ)`, `y = b sin(θ)`,
//! while [`ParametricCurve`] derives the expression symbolically.
use std::f64::consts::TAU;

use ahash::HashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    atom::Atom,
    error::Error,
    numerical_integration::AdaptiveSimpson,
    state::Symbol,
};

/// A point of a sampled curve together with its radius of curvature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub theta: f64,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// The ellipse `x = a cos(θ)`, `y = b sin(θ)` with positive radii.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    major_radius: f64,
    minor_radius: f64,
}

fn check_radius(name: &'static str, value: f64) -> Result<(), Error> {
    if value.is_finite() && value > 0. {
        Ok(())
    } else {
        Err(Error::invalid_parameter(
            name,
            format!("the radius must be positive and finite, got {}", value),
        ))
    }
}

impl Ellipse {
    /// Create an ellipse. A radius that is zero, negative or not finite
    /// describes a degenerate curve and is rejected.
    pub fn new(major_radius: f64, minor_radius: f64) -> Result<Ellipse, Error> {
        check_radius("major_radius", major_radius)?;
        check_radius("minor_radius", minor_radius)?;

        Ok(Ellipse {
            major_radius,
            minor_radius,
        })
    }

    pub fn major_radius(&self) -> f64 {
        self.major_radius
    }

    pub fn minor_radius(&self) -> f64 {
        self.minor_radius
    }

    pub fn position(&self, theta: f64) -> (f64, f64) {
        (
            self.major_radius * theta.cos(),
            self.minor_radius * theta.sin(),
        )
    }

    /// The first derivatives `(x', y')`.
    pub fn velocity(&self, theta: f64) -> (f64, f64) {
        (
            -self.major_radius * theta.sin(),
            self.minor_radius * theta.cos(),
        )
    }

    /// The second derivatives `(x'', y'')`.
    pub fn acceleration(&self, theta: f64) -> (f64, f64) {
        (
            -self.major_radius * theta.cos(),
            -self.minor_radius * theta.sin(),
        )
    }

    /// The radius of curvature at `theta`.
    ///
    /// For the ellipse `x'y'' - y'x'' = ab`, so `R = |v|^3/(ab)`, which is
    /// evaluated as `|v| (|v|/a) (|v|/b)` to stay finite for any radii.
    pub fn radius_of_curvature(&self, theta: f64) -> f64 {
        let (dx, dy) = self.velocity(theta);
        let speed = dx.hypot(dy);
        speed * (speed / self.major_radius) * (speed / self.minor_radius)
    }

    /// The curvature `1/R` at `theta`.
    pub fn curvature(&self, theta: f64) -> f64 {
        self.radius_of_curvature(theta).recip()
    }

    /// Sample `count` evenly spaced points with `θ` from `0` to `2π` inclusive.
    pub fn sample(&self, count: usize) -> Result<Vec<CurvePoint>, Error> {
        sample_points(count, |theta| {
            let (x, y) = self.position(theta);
            Ok(CurvePoint {
                theta,
                x,
                y,
                radius: self.radius_of_curvature(theta),
            })
        })
    }

    /// The circumference, as the numerical integral of `sqrt(x'² + y'²)`.
    pub fn perimeter(&self) -> Result<f64, Error> {
        self.perimeter_with(&AdaptiveSimpson::default())
    }

    pub fn perimeter_with(&self, method: &AdaptiveSimpson) -> Result<f64, Error> {
        let r = method.integrate(
            |theta| {
                let (dx, dy) = self.velocity(theta);
                dx.hypot(dy)
            },
            0.,
            TAU,
        )?;
        Ok(r.value)
    }
}

/// The radius of curvature of the ellipse with radii `a` and `b` at `theta`.
///
/// ```
/// use symcalc::curvature::radius_of_curvature;
///
/// let r = radius_of_curvature(5., 4., 0.).unwrap();
/// assert!((r - 3.2).abs() < 1e-12);
/// assert!(radius_of_curvature(0., 4., 0.).is_err());
/// ```
pub fn radius_of_curvature(a: f64, b: f64, theta: f64) -> Result<f64, Error> {
    Ok(Ellipse::new(a, b)?.radius_of_curvature(theta))
}

fn sample_points<F: FnMut(f64) -> Result<CurvePoint, Error>>(
    count: usize,
    mut f: F,
) -> Result<Vec<CurvePoint>, Error> {
    if count < 2 {
        return Err(Error::invalid_parameter(
            "count",
            format!("at least two samples are needed, got {}", count),
        ));
    }

    let step = TAU / (count - 1) as f64;
    (0..count)
        .map(|i| {
            // hit the end point exactly
            let theta = if i == count - 1 { TAU } else { i as f64 * step };
            f(theta)
        })
        .collect()
}

/// The first and second derivatives of a parametric curve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveDerivatives {
    pub dx: Atom,
    pub dy: Atom,
    pub d2x: Atom,
    pub d2y: Atom,
}

/// A symbolic parametric curve `(x(t), y(t))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParametricCurve {
    x: Atom,
    y: Atom,
    parameter: Symbol,
    /// The symbols of the major and minor radius of an ellipse.
    radii: Option<(Symbol, Symbol)>,
}

impl ParametricCurve {
    pub fn new(x: Atom, y: Atom, parameter: Symbol) -> ParametricCurve {
        ParametricCurve {
            x,
            y,
            parameter,
            radii: None,
        }
    }

    /// The ellipse `(a cos(θ), b sin(θ))` with symbolic radii.
    ///
    /// ```
    /// use symcalc::{atom::Atom, curvature::ParametricCurve, symbol};
    ///
    /// let (a, b, theta) = symbol!("a", "b", "theta");
    /// let curve = ParametricCurve::ellipse(a, b, theta);
    /// let r = curve.radius_of_curvature_at(&[(a, 5.0), (b, 5.0)]).unwrap();
    /// assert_eq!(r, Atom::num(5.0));
    /// ```
    pub fn ellipse(major_radius: Symbol, minor_radius: Symbol, parameter: Symbol) -> ParametricCurve {
        let t = Atom::var(parameter);
        ParametricCurve {
            x: Atom::var(major_radius) * t.cos(),
            y: Atom::var(minor_radius) * t.sin(),
            parameter,
            radii: Some((major_radius, minor_radius)),
        }
    }

    pub fn x(&self) -> &Atom {
        &self.x
    }

    pub fn y(&self) -> &Atom {
        &self.y
    }

    pub fn parameter(&self) -> Symbol {
        self.parameter
    }

    pub fn derivatives(&self) -> CurveDerivatives {
        let dx = self.x.derivative(self.parameter);
        let dy = self.y.derivative(self.parameter);
        CurveDerivatives {
            d2x: dx.derivative(self.parameter),
            d2y: dy.derivative(self.parameter),
            dx,
            dy,
        }
    }

    /// The radius of curvature as a function of the parameter and of the
    /// constants of the curve.
    pub fn radius_of_curvature(&self) -> Atom {
        let (numerator, denominator) = self.radius_of_curvature_parts();
        numerator / denominator
    }

    /// Get `(x'² + y'²)^(3/2)` and `|x'y'' - y'x''|`.
    fn radius_of_curvature_parts(&self) -> (Atom, Atom) {
        let CurveDerivatives { dx, dy, d2x, d2y } = self.derivatives();

        let numerator = (dx.npow(2) + dy.npow(2)).npow((3, 2));
        let denominator = (&dx * &d2y - &dy * &d2x).abs();
        (numerator, denominator)
    }

    /// Substitute values for the constants of the curve into the radius of
    /// curvature and simplify the result.
    ///
    /// Values that make the curve degenerate, such as a radius of an ellipse
    /// that is not positive, are rejected.
    #[instrument(skip(self))]
    pub fn radius_of_curvature_at(&self, values: &[(Symbol, f64)]) -> Result<Atom, Error> {
        for (s, v) in values {
            if !v.is_finite() {
                return Err(Error::invalid_parameter(
                    "values",
                    format!("the value for {} is not finite", s),
                ));
            }

            if let Some((a, b)) = self.radii {
                if *s == a {
                    check_radius("major_radius", *v)?;
                } else if *s == b {
                    check_radius("minor_radius", *v)?;
                }
            }
        }

        let (_, denominator) = self.radius_of_curvature_parts();
        let denominator = denominator.substitute(values).simplify();
        if denominator.is_zero() {
            return Err(Error::invalid_parameter(
                "values",
                "the curve is degenerate: x'y'' - y'x'' vanishes identically",
            ));
        }

        let r = self.radius_of_curvature().substitute(values).simplify();
        debug!("Radius of curvature: {}", r);
        Ok(r)
    }

    /// Evaluate the curve and its radius of curvature at `count` evenly
    /// spaced parameter values from `0` to `2π` inclusive.
    pub fn sample(&self, values: &[(Symbol, f64)], count: usize) -> Result<Vec<CurvePoint>, Error> {
        let radius = self.radius_of_curvature_at(values)?;
        let x = self.x.substitute(values);
        let y = self.y.substitute(values);

        let mut point = HashMap::default();
        sample_points(count, |theta| {
            point.insert(self.parameter, theta);
            let r = radius.evaluate(&point)?;
            if !r.is_finite() {
                return Err(Error::invalid_parameter(
                    "values",
                    format!("the radius of curvature is not finite at {}", theta),
                ));
            }

            Ok(CurvePoint {
                theta,
                x: x.evaluate(&point)?,
                y: y.evaluate(&point)?,
                radius: r,
            })
        })
    }
}

#[cfg(test)]
mod test {
    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_relative_eq;

    use super::{radius_of_curvature, Ellipse, ParametricCurve};
    use crate::{atom::Atom, error::Error, state::Symbol};

    #[test]
    fn reject_degenerate() {
        for (a, b) in [(0., 4.), (5., 0.), (-1., 2.), (f64::NAN, 1.), (1., f64::INFINITY)] {
            assert!(matches!(
                Ellipse::new(a, b),
                Err(Error::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn axis_end_points() {
        let e = Ellipse::new(5., 4.).unwrap();
        assert_relative_eq!(e.radius_of_curvature(0.), 3.2, max_relative = 1e-12);
        assert_relative_eq!(e.radius_of_curvature(FRAC_PI_2), 6.25, max_relative = 1e-12);
        assert_relative_eq!(e.curvature(0.), 1. / 3.2, max_relative = 1e-12);
        assert_relative_eq!(radius_of_curvature(5., 4., PI).unwrap(), 3.2, max_relative = 1e-12);
    }

    #[test]
    fn extreme_radii() {
        for r in [1e200, 1e-200] {
            let circle = Ellipse::new(r, r).unwrap();
            assert_relative_eq!(circle.radius_of_curvature(0.3), r, max_relative = 1e-12);
            assert_relative_eq!(circle.curvature(1.1), 1. / r, max_relative = 1e-12);
        }

        let e = Ellipse::new(5e200, 4e200).unwrap();
        assert_relative_eq!(e.radius_of_curvature(0.), 3.2e200, max_relative = 1e-12);
        let e = Ellipse::new(5e-200, 4e-200).unwrap();
        assert_relative_eq!(e.radius_of_curvature(FRAC_PI_2), 6.25e-200, max_relative = 1e-12);
    }

    #[test]
    fn derivatives_of_the_ellipse() {
        let e = Ellipse::new(5., 4.).unwrap();
        let (dx, dy) = e.velocity(0.4);
        let (d2x, d2y) = e.acceleration(0.4);
        // x'y'' - y'x'' = ab
        assert_relative_eq!(dx * d2y - dy * d2x, 20., max_relative = 1e-12);
        assert_relative_eq!(
            e.radius_of_curvature(0.4),
            (dx * dx + dy * dy).powf(1.5) / 20.,
            max_relative = 1e-12
        );
    }

    #[test]
    fn sampling() {
        let e = Ellipse::new(5., 4.).unwrap();
        let points = e.sample(5).unwrap();
        assert_eq!(points.len(), 5);
        assert_eq!(points[0].theta, 0.);
        assert_eq!(points[4].theta, 2. * PI);
        assert_relative_eq!(points[1].theta, FRAC_PI_2);
        assert_relative_eq!(points[0].x, 5.);
        assert_relative_eq!(points[1].y, 4.);
        assert_relative_eq!(points[2].radius, 3.2, max_relative = 1e-12);
        assert!(e.sample(1).is_err());
    }

    #[test]
    fn circle_perimeter() {
        let e = Ellipse::new(3., 3.).unwrap();
        assert_relative_eq!(e.perimeter().unwrap(), 6. * PI, max_relative = 1e-9);
    }

    #[test]
    fn symbolic_circle() {
        let (a, b, t) = (Symbol::new("a"), Symbol::new("b"), Symbol::new("theta"));
        let curve = ParametricCurve::ellipse(a, b, t);

        let d = curve.derivatives();
        assert_eq!(d.dx, Atom::parse("-a*sin(theta)").unwrap());
        assert_eq!(d.d2y, Atom::parse("-b*sin(theta)").unwrap());

        let r = curve.radius_of_curvature_at(&[(a, 5.0), (b, 5.0)]).unwrap();
        assert_eq!(r, Atom::num(5.0));

        let r = curve.radius_of_curvature().simplify();
        let mut values = ahash::HashMap::default();
        values.insert(a, 5.);
        values.insert(b, 4.);
        values.insert(t, 0.3);
        assert_relative_eq!(
            r.evaluate(&values).unwrap(),
            radius_of_curvature(5., 4., 0.3).unwrap(),
            max_relative = 1e-12
        );

        assert!(curve
            .radius_of_curvature_at(&[(a, f64::NAN)])
            .is_err());
    }

    #[test]
    fn symbolic_degenerate() {
        let (a, b, t) = (Symbol::new("a"), Symbol::new("b"), Symbol::new("theta"));
        let ellipse = ParametricCurve::ellipse(a, b, t);

        assert!(matches!(
            ellipse.radius_of_curvature_at(&[(a, 0.0), (b, 4.0)]),
            Err(Error::InvalidParameter { name: "major_radius", .. })
        ));
        assert!(matches!(
            ellipse.radius_of_curvature_at(&[(a, 5.0), (b, -4.0)]),
            Err(Error::InvalidParameter { name: "minor_radius", .. })
        ));

        // the same curve without known radii is caught by its vanishing denominator
        let curve = ParametricCurve::new(ellipse.x().clone(), ellipse.y().clone(), t);
        assert!(matches!(
            curve.radius_of_curvature_at(&[(a, 0.0), (b, 4.0)]),
            Err(Error::InvalidParameter { name: "values", .. })
        ));
        assert!(curve.radius_of_curvature_at(&[(a, 3.0), (b, 4.0)]).is_ok());
    }

    #[test]
    fn symbolic_sampling() {
        let (a, b, t) = (Symbol::new("a"), Symbol::new("b"), Symbol::new("theta"));
        let curve = ParametricCurve::ellipse(a, b, t);
        let e = Ellipse::new(5., 4.).unwrap();

        let points = curve.sample(&[(a, 5.), (b, 4.)], 9).unwrap();
        for (p, q) in points.iter().zip(e.sample(9).unwrap()) {
            assert_relative_eq!(p.x, q.x, epsilon = 1e-12);
            assert_relative_eq!(p.y, q.y, epsilon = 1e-12);
            assert_relative_eq!(p.radius, q.radius, max_relative = 1e-12);
        }

        assert!(matches!(
            curve.sample(&[(a, 0.), (b, 4.)], 3),
            Err(Error::InvalidParameter { name: "major_radius", .. })
        ));

        // the parameter must stay free
        assert!(matches!(
            curve.sample(&[(a, 5.)], 3),
            Err(Error::UnboundSymbol(_))
        ));
    }
}
