//! Mints a token for the default gateway credential and prints a `curl` command that sends it.

// crates.io
use color_eyre::Result;
// self
use gateway_token_probe::{
	config::ProbeConfig,
	token::{IssueOptions, TokenIssuer},
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ProbeConfig::default();
	let issuer = TokenIssuer::new(config.issuer)?;
	let token = issuer.issue(IssueOptions::new())?;

	println!("\nGenerated JWT Token:");
	println!("{}", token.as_str());

	if let Some(claims) = token.decode_claims_unverified() {
		println!("\nClaims:");
		println!("{}", serde_json::to_string_pretty(&claims)?);
	}

	println!("\nCurl command for testing:");
	println!("{}", config.gateway.curl_command(token.as_str(), &config.gateway.default_path)?);

	Ok(())
}
