//! Runs the valid/expired/tampered/multi-endpoint scenarios against a live gateway.
//!
//! Pass a JSON configuration file as the first argument to override the defaults
//! (`localhost:8000`, credential `user-key` / `user-secret`). Set `RUST_LOG` to see spans.

// std
use std::{env, fs};
// crates.io
use color_eyre::Result;
use tracing_subscriber::EnvFilter;
// self
use gateway_token_probe::{
	config::ProbeConfig, exchange::Exerciser, scenario::ScenarioDriver, token::TokenIssuer,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

	let config = match env::args().nth(1) {
		Some(path) => ProbeConfig::from_json_str(&fs::read_to_string(path)?)?,
		None => ProbeConfig::default(),
	};
	let issuer = TokenIssuer::new(config.issuer)?;
	let exerciser = Exerciser::new(config.gateway)?;
	let driver = ScenarioDriver::new(issuer, exerciser);

	println!("Running JWT token tests...");

	let reports = driver.run_each(|report| println!("\n{report}")).await?;
	let failures = reports.iter().filter(|report| report.has_failures()).count();

	if failures > 0 {
		println!("\n{failures} scenario(s) could not reach the gateway.");
	}

	Ok(())
}
