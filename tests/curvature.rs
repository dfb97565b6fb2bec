use std::f64::consts::{FRAC_PI_2, PI};

use ahash::HashMap;
use approx::assert_relative_eq;
use symcalc::{
    atom::Atom,
    curvature::{radius_of_curvature, Ellipse, ParametricCurve},
    Error, Symbol,
};

#[test]
fn circle_has_constant_radius() {
    for r in [0.5, 1., 5., 123.25] {
        let e = Ellipse::new(r, r).unwrap();
        for i in 0..16 {
            let theta = i as f64 * PI / 8.;
            assert_relative_eq!(e.radius_of_curvature(theta), r, max_relative = 1e-12);
        }
    }
}

#[test]
fn ellipse_vertices() {
    assert_relative_eq!(radius_of_curvature(5., 4., 0.).unwrap(), 3.2, max_relative = 1e-12);
    assert_relative_eq!(
        radius_of_curvature(5., 4., FRAC_PI_2).unwrap(),
        6.25,
        max_relative = 1e-12
    );
}

#[test]
fn symmetry_and_positivity() {
    let e = Ellipse::new(7., 2.).unwrap();
    for i in 0..50 {
        let theta = -3. + 0.13 * i as f64;
        let r = e.radius_of_curvature(theta);
        assert!(r > 0.);
        assert_relative_eq!(r, e.radius_of_curvature(-theta), max_relative = 1e-10);
        assert_relative_eq!(r, e.radius_of_curvature(theta + PI), max_relative = 1e-10);
        assert_relative_eq!(r, e.radius_of_curvature(theta + 2. * PI), max_relative = 1e-10);
    }
}

#[test]
fn degenerate_ellipses_are_rejected() {
    assert!(matches!(
        radius_of_curvature(0., 4., 1.),
        Err(Error::InvalidParameter { name: "major_radius", .. })
    ));
    assert!(matches!(
        radius_of_curvature(5., 0., 1.),
        Err(Error::InvalidParameter { name: "minor_radius", .. })
    ));
    assert!(Ellipse::new(-5., 4.).is_err());
}

#[test]
fn symbolic_matches_closed_form() {
    let (a, b, t) = (Symbol::new("a"), Symbol::new("b"), Symbol::new("t"));
    let r = ParametricCurve::ellipse(a, b, t).radius_of_curvature();

    let e = Ellipse::new(3., 1.5).unwrap();
    let mut values = HashMap::default();
    values.insert(a, 3.);
    values.insert(b, 1.5);
    for i in 0..10 {
        let theta = 0.37 * i as f64;
        values.insert(t, theta);
        assert_relative_eq!(
            r.evaluate(&values).unwrap(),
            e.radius_of_curvature(theta),
            max_relative = 1e-12
        );
    }
}

#[test]
fn general_parametric_curve() {
    // the parabola (t, t^2) has radius (1 + 4t^2)^(3/2)/2
    let t = Symbol::new("t");
    let curve = ParametricCurve::new(Atom::var(t), Atom::parse("t^2").unwrap(), t);
    let r = curve.radius_of_curvature();

    let mut values = HashMap::default();
    for x in [-1f64, 0., 0.5, 2.] {
        values.insert(t, x);
        let expected = (1. + 4. * x * x).powf(1.5) / 2.;
        assert_relative_eq!(r.evaluate(&values).unwrap(), expected, max_relative = 1e-12);
    }
}

#[test]
fn perimeter() {
    let circle = Ellipse::new(2., 2.).unwrap();
    assert_relative_eq!(circle.perimeter().unwrap(), 4. * PI, max_relative = 1e-9);

    // Ramanujan's approximation is accurate to ~1e-10 relative for this shape
    let (a, b) = (5.0f64, 4.0f64);
    let h = ((a - b) / (a + b)).powi(2);
    let approx = PI * (a + b) * (1. + 3. * h / (10. + (4. - 3. * h).sqrt()));
    let e = Ellipse::new(a, b).unwrap();
    assert_relative_eq!(e.perimeter().unwrap(), approx, max_relative = 1e-8);
}
