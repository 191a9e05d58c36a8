//! HS256 JWT authentication adapter
//!
//! Access tokens carry `{userId, role, iat, exp}`. Expiry is enforced without leeway;
//! everything past signature and expiry (session timeout, suspension) is policy and
//! belongs to the auth middleware.

#![forbid(unsafe_code)]

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use outbound_types::auth_adapter::{AccessClaims, AuthAdapter, AuthCtx};
use outbound_types::prelude::*;

/// Shortest accepted signing secret, in bytes
pub const MIN_SECRET_LEN: usize = 16;

pub struct AuthAdapterJwt {
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	validation: Validation,
}

impl std::fmt::Debug for AuthAdapterJwt {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AuthAdapterJwt").finish_non_exhaustive()
	}
}

impl AuthAdapterJwt {
	pub fn new(secret: &[u8]) -> OiResult<Self> {
		if secret.len() < MIN_SECRET_LEN {
			return Err(Error::ConfigError(format!(
				"JWT secret must be at least {} bytes",
				MIN_SECRET_LEN
			)));
		}

		let mut validation = Validation::new(Algorithm::HS256);
		validation.leeway = 0;

		Ok(Self {
			encoding_key: EncodingKey::from_secret(secret),
			decoding_key: DecodingKey::from_secret(secret),
			validation,
		})
	}

	/// Decodes and verifies a token, returning its raw claims
	pub fn decode_claims(&self, token: &str) -> OiResult<AccessClaims> {
		let token_data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
			.map_err(|err| {
				debug!("Access token rejected: {}", err);
				Error::Unauthorized
			})?;
		Ok(token_data.claims)
	}

	/// Signs a set of claims
	pub fn encode_claims(&self, claims: &AccessClaims) -> OiResult<Box<str>> {
		let token = encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
			.map_err(|err| Error::Internal(format!("token signing failed: {}", err)))?;
		Ok(token.into())
	}
}

#[async_trait]
impl AuthAdapter for AuthAdapterJwt {
	async fn validate_access_token(&self, token: &str) -> OiResult<AuthCtx> {
		Ok(self.decode_claims(token)?.into())
	}

	async fn create_access_token(
		&self,
		user_id: &UserId,
		role: Role,
		ttl_secs: i64,
	) -> OiResult<Box<str>> {
		let iat = Timestamp::now();
		self.encode_claims(&AccessClaims {
			user_id: user_id.clone(),
			role,
			iat,
			exp: iat.add_seconds(ttl_secs),
		})
	}
}

// vim: ts=4
