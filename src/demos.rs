//! Worked examples of differentiation, integration and the radius of
//! curvature. Every demonstration returns the lines it would print, so that
//! the binary and the tests share them.
use ahash::HashMap;

use crate::{
    atom::Atom,
    curvature::ParametricCurve,
    derivative::{implicit_derivative, Derivative, Equation},
    error::Error,
    printer::PrintOptions,
    settings::Settings,
    state::Symbol,
};

/// Run every demonstration with the given settings.
pub fn run_all(settings: &Settings) -> Result<Vec<String>, Error> {
    settings.validate()?;

    let mut lines = vec![];
    lines.extend(explicit_differentiation(settings.print_options)?);
    lines.extend(implicit_differentiation(settings.print_options)?);
    lines.extend(integration(settings)?);
    lines.extend(radius_of_curvature(settings)?);
    Ok(lines)
}

/// Derivatives of explicitly given functions, unevaluated derivatives and
/// derivatives of undefined functions.
pub fn explicit_differentiation(opts: PrintOptions) -> Result<Vec<String>, Error> {
    let (x, y) = (Symbol::new("x"), Symbol::new("y"));
    let mut lines = vec![];

    let f = Atom::parse("x^3 + 2*x^2 + x + 1")?;
    lines.push(format!("(11.1) f = {}", f.printer(opts)));
    lines.push(format!("(11.1) df/dx = {}", f.derivative(x).printer(opts)));
    lines.push(format!(
        "(11.2) d3f/dx3 = {}",
        f.derivative(x).derivative(x).derivative(x).printer(opts)
    ));
    lines.push(format!("(11.2) d3f/dx3 = {}", f.derivative_n(x, 3).printer(opts)));

    let g = Atom::parse("3*x^5*y^2 + 5*x + 2*y + 6*y^3*x")?;
    lines.push(format!("(11.3) g = {}", g.printer(opts)));
    lines.push(format!(
        "(11.3) d3g/dxdy2 = {}",
        g.derivative(x).derivative(y).derivative(y).printer(opts)
    ));
    lines.push(format!(
        "(11.3) d3g/dxdy2 = {}",
        g.derivative_multi(&[(x, 1), (y, 2)]).printer(opts)
    ));

    let unevaluated = Derivative::new(g.clone()).wrt(x, 1).wrt(y, 2);
    lines.push(format!("(11.4) d3g/dxdy2 = {}", unevaluated));
    lines.push(format!("(11.4) d3g/dxdy2 = {}", unevaluated.doit().printer(opts)));

    let unevaluated = Derivative::new(g.clone()).wrt(x, 2).wrt(y, 1);
    lines.push(format!("(11.5) d3g/dx2dy = {}", unevaluated.doit().printer(opts)));
    lines.push(format!("(11.6) d3g/dx2dy = {}", unevaluated));

    // derivatives of an undefined function stay unevaluated
    let f = Atom::fun(Symbol::new("f"), vec![Atom::var(x), Atom::var(y)]);
    let f_der = f.derivative_multi(&[(x, 1), (y, 2)]);
    lines.push(format!("(11.7) d3f/dxdy2 = {}", f_der.printer(opts)));

    let unevaluated = Derivative::from_atom(&f_der)
        .ok_or_else(|| Error::invalid_parameter("f", "not a derivative of a function"))?
        .replace(&f, &g);
    lines.push(format!("(11.8) d3g/dxdy2 = {}", unevaluated));
    lines.push(format!("(11.8) d3g/dxdy2 = {}", unevaluated.doit().printer(opts)));

    lines.push(format!("(11.9) {}", unevaluated.expr().printer(opts)));
    for (s, n) in unevaluated.variables() {
        lines.push(format!("(11.9) {} {}", s, n));
    }

    Ok(lines)
}

/// The slope and curvature of the unit circle, defined implicitly.
pub fn implicit_differentiation(opts: PrintOptions) -> Result<Vec<String>, Error> {
    let (x, y) = (Symbol::new("x"), Symbol::new("y"));
    let eq = Equation::parse("x^2 + y^2 = 1")?;
    let f = eq.to_zero_form();

    Ok(vec![
        format!("(11.10) {}", eq),
        format!(
            "(11.10) dy/dx = {}",
            implicit_derivative(&f, y, x, 1)?.printer(opts)
        ),
        format!(
            "(11.11) d2y/dx2 = {}",
            implicit_derivative(&f, y, x, 2)?.printer(opts)
        ),
    ])
}

/// Indefinite, definite and numerical integrals.
pub fn integration(settings: &Settings) -> Result<Vec<String>, Error> {
    let opts = settings.print_options;
    let x = Symbol::new("x");
    let mut lines = vec![];

    for f in ["x^3 + 2*x^2 + x + 1", "x*exp(x)", "x^2*sin(x)", "x*log(x)", "1/(2*x + 1)"] {
        let f = Atom::parse(f)?;
        lines.push(format!(
            "(int) {} dx = {}",
            f.printer(opts),
            f.integrate(x)?.printer(opts)
        ));
    }

    let f = Atom::parse("sin(x)")?;
    let r = f.integrate_definite(x, &Atom::zero(), &Atom::parse("pi")?)?;
    lines.push(format!("(int) {} dx over [0, pi] = {}", f.printer(opts), r.printer(opts)));

    let f = Atom::parse("exp(-x^2)")?;
    let r = f.integrate_numeric(x, -10., 10., &HashMap::default(), &settings.quadrature)?;
    lines.push(format!("(int) {} dx over [-10, 10] = {}", f.printer(opts), r));

    Ok(lines)
}

/// Derive the radius of curvature of an ellipse symbolically and evaluate it.
pub fn radius_of_curvature(settings: &Settings) -> Result<Vec<String>, Error> {
    let opts = settings.print_options;
    let (theta, r_ma, r_mi) = (Symbol::new("theta"), Symbol::new("r_ma"), Symbol::new("r_mi"));
    let curve = ParametricCurve::ellipse(r_ma, r_mi, theta);
    let d = curve.derivatives();

    let mut lines = vec![
        format!("x = {}", curve.x().printer(opts)),
        format!("y = {}", curve.y().printer(opts)),
        format!("dx/dtheta = {}", d.dx.printer(opts)),
        format!("d2x/dtheta2 = {}", d.d2x.printer(opts)),
        format!("R = {}", curve.radius_of_curvature().printer(opts)),
        format!(
            "R(r_ma = 5.0, r_mi = 5.0) = {}",
            curve
                .radius_of_curvature_at(&[(r_ma, 5.0), (r_mi, 5.0)])?
                .printer(opts)
        ),
    ];

    let (a, b) = (settings.major_radius, settings.minor_radius);
    let values = [(r_ma, a), (r_mi, b)];
    lines.push(format!(
        "R(r_ma = {:?}, r_mi = {:?}) = {}",
        a,
        b,
        curve.radius_of_curvature_at(&values)?.printer(opts)
    ));

    let ellipse = settings.ellipse()?;
    for p in ellipse.sample(settings.sample_count)? {
        lines.push(format!(
            "theta = {:.4}, x = {:.4}, y = {:.4}, R = {:.4}",
            p.theta, p.x, p.y, p.radius
        ));
    }

    Ok(lines)
}

#[cfg(test)]
mod test {
    use crate::{printer::PrintOptions, settings::Settings};

    fn value(line: &str) -> &str {
        line.split_once(" = ").map(|(_, v)| v).unwrap_or(line)
    }

    #[test]
    fn explicit() {
        let lines = super::explicit_differentiation(PrintOptions::default()).unwrap();
        assert_eq!(lines[0], "(11.1) f = x^3 + 2*x^2 + x + 1");
        assert_eq!(lines[1], "(11.1) df/dx = 3*x^2 + 4*x + 1");
        assert_eq!(lines[2], "(11.2) d3f/dx3 = 6");
        assert_eq!(lines[3], "(11.2) d3f/dx3 = 6");
        assert_eq!(value(&lines[5]), value(&lines[6]));
        assert!(lines[7].starts_with("(11.4) d3g/dxdy2 = Derivative("));
        assert!(lines[7].ends_with(", x, (y, 2))"));
        assert_eq!(value(&lines[6]), value(&lines[8]));
        assert_eq!(lines[11], "(11.7) d3f/dxdy2 = der(1,2,f(x,y))");
        assert_eq!(value(&lines[13]), value(&lines[8]));
        assert_eq!(lines[15], "(11.9) x 1");
        assert_eq!(lines[16], "(11.9) y 2");
    }

    #[test]
    fn implicit() {
        let lines = super::implicit_differentiation(PrintOptions::default()).unwrap();
        assert_eq!(lines[0], "(11.10) x^2 + y^2 = 1");
        assert_eq!(lines[1], "(11.10) dy/dx = -x/y");
    }

    #[test]
    fn all() {
        let settings = Settings {
            sample_count: 3,
            ..Settings::default()
        };
        let lines = super::run_all(&settings).unwrap();
        assert!(lines.iter().any(|l| l == "R(r_ma = 5.0, r_mi = 5.0) = 5.0"));
        assert!(lines
            .iter()
            .any(|l| l == "theta = 0.0000, x = 5.0000, y = 0.0000, R = 3.2000"));
    }
}
