//! Environment configuration

use std::{env, path::PathBuf};

use outbound::auth_adapter::ACCESS_TOKEN_EXPIRY;
use outbound::prelude::*;

pub struct Config {
	pub listen: String,
	pub db_dir: PathBuf,
	pub jwt_secret: Option<String>,
	/// Lifetime of issued access tokens, in seconds
	pub token_ttl_secs: i64,
	/// Extra path prefixes excluded from auditing
	pub audit_exclude: Vec<String>,
	pub cors_origin: Option<String>,
}

/// Comma separated list, blank entries dropped
fn split_list(value: &str) -> Vec<String> {
	value.split(',').map(str::trim).filter(|p| !p.is_empty()).map(String::from).collect()
}

/// Parses `TOKEN_TTL_HOURS` into seconds
fn parse_ttl_hours(value: &str) -> OiResult<i64> {
	value
		.parse::<i64>()
		.ok()
		.filter(|h| *h > 0)
		.and_then(|h| h.checked_mul(3600))
		.ok_or_else(|| Error::ConfigError(format!("invalid TOKEN_TTL_HOURS: {}", value)))
}

fn non_empty(name: &str) -> Option<String> {
	env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Config {
	pub fn from_env() -> OiResult<Self> {
		let token_ttl_secs = match non_empty("TOKEN_TTL_HOURS") {
			Some(v) => parse_ttl_hours(&v)?,
			None => ACCESS_TOKEN_EXPIRY,
		};

		Ok(Config {
			listen: non_empty("LISTEN").unwrap_or_else(|| "127.0.0.1:8080".into()),
			db_dir: PathBuf::from(non_empty("DB_DIR").unwrap_or_else(|| "./data".into())),
			jwt_secret: non_empty("JWT_SECRET"),
			token_ttl_secs,
			audit_exclude: non_empty("AUDIT_EXCLUDE").map(|v| split_list(&v)).unwrap_or_default(),
			cors_origin: non_empty("CORS_ORIGIN"),
		})
	}

	/// The signing secret, required for anything that touches tokens
	pub fn jwt_secret(&self) -> OiResult<&str> {
		self.jwt_secret
			.as_deref()
			.ok_or_else(|| Error::ConfigError("JWT_SECRET is not set".into()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_split_list() {
		assert_eq!(split_list("/api/webhooks, /api/public ,,"), vec!["/api/webhooks", "/api/public"]);
		assert!(split_list(" , ").is_empty());
	}

	#[test]
	fn test_parse_ttl_hours() {
		assert_eq!(parse_ttl_hours("8").unwrap(), 8 * 3600);
		assert!(matches!(parse_ttl_hours("0"), Err(Error::ConfigError(_))));
		assert!(matches!(parse_ttl_hours("-1"), Err(Error::ConfigError(_))));
		assert!(matches!(parse_ttl_hours("eight"), Err(Error::ConfigError(_))));
		assert!(matches!(parse_ttl_hours(&i64::MAX.to_string()), Err(Error::ConfigError(_))));
	}
}

// vim: ts=4
