use ahash::HashMap;
use approx::assert_relative_eq;
use symcalc::{
    atom::Atom,
    demos,
    derivative::{implicit_derivative, Derivative, Equation},
    numerical_integration::AdaptiveSimpson,
    settings::Settings,
    Error, Symbol,
};

#[test]
fn integrate_then_differentiate() {
    let x = Symbol::new("x");

    for f in [
        "x^4 - 3*x + 7",
        "1/(3*x - 2)",
        "(x + 2)^(-3)",
        "exp(2*x + 1)",
        "sin(x/2) + cos(4*x)",
        "x^3*exp(-x)",
        "x^2*cos(x)",
        "x^2*log(x)",
        "y*sqrt(x)",
    ] {
        let f = Atom::parse(f).unwrap();
        let r = f.integrate(x).unwrap();
        assert_eq!((r.derivative(x) - &f).simplify(), Atom::zero(), "{}", f);
    }
}

#[test]
fn definite_and_numeric_agree() {
    let x = Symbol::new("x");
    let f = Atom::parse("x^2*sin(x) + 1/(x + 1)").unwrap();

    let exact = f
        .integrate_definite(x, &Atom::zero(), &Atom::num(2))
        .unwrap();
    let exact = exact.evaluate(&HashMap::default()).unwrap();

    let numeric = f
        .integrate_numeric(x, 0., 2., &HashMap::default(), &AdaptiveSimpson::default())
        .unwrap();
    assert_relative_eq!(exact, numeric.value, max_relative = 1e-9);
}

#[test]
fn implicit_circle() {
    let (x, y) = (Symbol::new("x"), Symbol::new("y"));
    let f = Equation::parse("x^2 + y^2 = 1").unwrap().to_zero_form();

    assert_eq!(
        implicit_derivative(&f, y, x, 1).unwrap(),
        Atom::parse("-x/y").unwrap()
    );

    // y'' = -1/y^3 on the unit circle
    let d2 = implicit_derivative(&f, y, x, 2).unwrap();
    let mut values = HashMap::default();
    values.insert(x, 0.6);
    values.insert(y, 0.8);
    assert_relative_eq!(d2.evaluate(&values).unwrap(), -1. / 0.512, max_relative = 1e-12);

    assert!(matches!(
        implicit_derivative(&Atom::parse("x^2 - 1").unwrap(), y, x, 1),
        Err(Error::InvalidParameter { .. })
    ));
}

#[test]
fn unevaluated_derivatives() {
    let (x, y) = (Symbol::new("x"), Symbol::new("y"));
    let f = Atom::parse("f(x,y)").unwrap();
    let g = Atom::parse("3*x^5*y^2 + 5*x + 2*y + 6*y^3*x").unwrap();

    let d = Derivative::from_atom(&f.derivative_multi(&[(x, 1), (y, 2)])).unwrap();
    assert_eq!(d.variables(), &[(x, 1), (y, 2)]);
    assert_eq!(d.order(), 3);

    let d = d.replace(&f, &g);
    assert_eq!(d.doit(), Atom::parse("30*x^4 + 36*y").unwrap());
}

#[test]
fn parse_print_is_stable() {
    for s in [
        "x^3 + 2*x^2 + x + 1",
        "-x/y",
        "3*y*(x + 1)",
        "sqrt(x + 1)",
        "exp(-x^2)/(2*y)",
        "der(1,2,f(x,y))",
    ] {
        let a = Atom::parse(s).unwrap();
        assert_eq!(Atom::parse(&a.to_string()).unwrap(), a, "{}", s);
    }
}

#[test]
fn demos_run() {
    let lines = demos::run_all(&Settings::default()).unwrap();
    assert!(lines.iter().any(|l| l.starts_with("(11.11) d2y/dx2 = ")));
    assert!(lines.iter().any(|l| l.starts_with("(int) sin(x) dx over [0, pi] = 2")));
    assert_eq!(
        lines.iter().filter(|l| l.starts_with("theta = ")).count(),
        Settings::default().sample_count
    );
}
