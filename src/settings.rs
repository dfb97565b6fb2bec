//! Settings for the demonstrations, read from a JSON file.
//!
//! Every field has a default, so a partial file such as
//!
//! ```json
//! { "major_radius": 3.0, "print_options": { "double_star_for_exponentiation": true } }
//! ```
//!
//! is valid.
use std::{fs::File, io::BufReader, io::Read, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    curvature::Ellipse, error::Error, numerical_integration::AdaptiveSimpson,
    printer::PrintOptions,
};

/// The environment variable that names the settings file.
pub const CONFIG_ENV: &str = "SYMCALC_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub major_radius: f64,
    pub minor_radius: f64,
    /// The number of points sampled along the ellipse.
    pub sample_count: usize,
    pub print_options: PrintOptions,
    pub quadrature: AdaptiveSimpson,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            major_radius: 5.0,
            minor_radius: 4.0,
            sample_count: 9,
            print_options: PrintOptions::default(),
            quadrature: AdaptiveSimpson::default(),
        }
    }
}

impl Settings {
    pub fn from_reader<R: Read>(reader: R) -> Result<Settings, Error> {
        let settings: Settings =
            serde_json::from_reader(reader).map_err(|e| Error::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Settings, Error> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::Config(format!("cannot open {}: {}", path.display(), e)))?;
        debug!("Reading settings from {}", path.display());
        Settings::from_reader(BufReader::new(file))
    }

    /// Read the file named by [`CONFIG_ENV`], or use the defaults when the
    /// variable is not set.
    pub fn from_env() -> Result<Settings, Error> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Settings::from_file(path),
            None => Ok(Settings::default()),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.ellipse()?;
        self.quadrature.validate()?;

        if self.sample_count < 2 {
            return Err(Error::invalid_parameter(
                "sample_count",
                format!("at least two samples are needed, got {}", self.sample_count),
            ));
        }
        Ok(())
    }

    pub fn ellipse(&self) -> Result<Ellipse, Error> {
        Ellipse::new(self.major_radius, self.minor_radius)
    }
}

#[cfg(test)]
mod test {
    use super::Settings;
    use crate::error::Error;

    #[test]
    fn defaults() {
        let s = Settings::from_reader("{}".as_bytes()).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.ellipse().unwrap().major_radius(), 5.0);
    }

    #[test]
    fn partial() {
        let s = Settings::from_reader(
            r#"{ "minor_radius": 2.5, "quadrature": { "tolerance": 1e-6 } }"#.as_bytes(),
        )
        .unwrap();
        assert_eq!(s.minor_radius, 2.5);
        assert_eq!(s.major_radius, 5.0);
        assert_eq!(s.quadrature.tolerance, 1e-6);
        assert_eq!(s.quadrature.max_depth, 48);
    }

    #[test]
    fn invalid() {
        assert!(matches!(
            Settings::from_reader("{ \"major_radius\": ".as_bytes()),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Settings::from_reader(r#"{ "unknown": 1 }"#.as_bytes()),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Settings::from_reader(r#"{ "major_radius": -1.0 }"#.as_bytes()),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(Settings::from_file("/nonexistent/symcalc.json").is_err());
    }
}
