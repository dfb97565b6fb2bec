//! symcalc is a small computer algebra system for calculus on expression
//! trees, together with the radius of curvature of parametric curves.
//!
//! It can differentiate (explicitly, implicitly and unevaluated), integrate
//! symbolically and numerically, simplify and evaluate expressions.
//!
//! For example:
//!
//! ```
//! use symcalc::{atom::Atom, state::State};
//!
//! let input = Atom::parse("x^2*log(2*x + y) + exp(3*x)").unwrap();
//! let a = input.derivative(State::get_symbol("x"));
//! println!("d({})/dx = {}", input, a);
//! ```
//!
//! The radius of curvature of an ellipse:
//!
//! ```
//! use symcalc::curvature::Ellipse;
//!
//! let e = Ellipse::new(5., 4.).unwrap();
//! assert!((e.radius_of_curvature(0.) - 3.2).abs() < 1e-12);
//! ```

pub mod atom;
pub mod coefficient;
pub mod curvature;
pub mod demos;
pub mod derivative;
pub mod error;
mod evaluate;
mod expand;
mod integrate;
mod normalize;
pub mod numerical_integration;
pub mod parser;
pub mod printer;
mod replace;
pub mod settings;
mod simplify;
pub mod state;

pub use atom::Atom;
pub use error::Error;
pub use state::{State, Symbol};
