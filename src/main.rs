use std::process::ExitCode;

use symcalc::{demos, settings::Settings};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("SYMCALC_LOG"))
        .init();

    let lines = Settings::from_env().and_then(|settings| demos::run_all(&settings));

    match lines {
        Ok(lines) => {
            for l in lines {
                println!("{}", l);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
