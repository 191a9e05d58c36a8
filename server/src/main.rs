//! Outbound Impact server
//!
//! Usage:
//!   outbound-impact [serve]           start the HTTP server
//!   outbound-impact token <user-id>   print an access token for an existing user

mod config;

use std::{env, process::ExitCode, sync::Arc};

use outbound::AppBuilder;
use outbound::auth_adapter::AuthAdapter;
use outbound::meta_adapter::UserStore;
use outbound::prelude::*;
use outbound_auth_adapter_jwt::AuthAdapterJwt;
use outbound_meta_adapter_sqlite::MetaAdapterSqlite;

use crate::config::Config;

async fn serve(config: Config) -> OiResult<()> {
	let auth_adapter = Arc::new(AuthAdapterJwt::new(config.jwt_secret()?.as_bytes())?);
	let meta_adapter = Arc::new(MetaAdapterSqlite::new(&config.db_dir).await?);

	let mut builder = AppBuilder::new();
	builder
		.listen(config.listen.as_str())
		.audit_exclude(config.audit_exclude.iter().map(String::as_str))
		.auth_adapter(auth_adapter)
		.meta_adapter(meta_adapter);
	if let Some(origin) = &config.cors_origin {
		builder.cors_origin(origin.as_str());
	}

	builder.run().await
}

async fn token(config: Config, user_id: &str) -> OiResult<()> {
	let auth_adapter = AuthAdapterJwt::new(config.jwt_secret()?.as_bytes())?;
	let meta_adapter = MetaAdapterSqlite::new(&config.db_dir).await?;

	let user = meta_adapter.read_user(&UserId::from(user_id)).await.inspect_err(|_| {
		error!(user_id, "User not found");
	})?;
	let token =
		auth_adapter.create_access_token(&user.id, user.role, config.token_ttl_secs).await?;

	println!("{}", token);
	Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_target(false)
		.init();

	let config = match Config::from_env() {
		Ok(config) => config,
		Err(err) => {
			error!("FATAL: {}", err);
			return ExitCode::FAILURE;
		}
	};

	let args: Vec<String> = env::args().skip(1).collect();
	let res = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
		[] | ["serve"] => serve(config).await,
		["token", user_id] => token(config, user_id).await,
		_ => {
			error!("Usage: outbound-impact [serve | token <user-id>]");
			return ExitCode::FAILURE;
		}
	};

	match res {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			error!("FATAL: {}", err);
			ExitCode::FAILURE
		}
	}
}

// vim: ts=4
