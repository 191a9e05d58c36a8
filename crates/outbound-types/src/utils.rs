//! Utility functions

use rand::RngExt;

pub const ID_LENGTH: usize = 24;
pub const SLUG_LENGTH: usize = 10;
pub const SAFE: [char; 62] = [
	'0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
	'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'A', 'B',
	'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U',
	'V', 'W', 'X', 'Y', 'Z',
];

fn random_string(len: usize) -> String {
	let mut rng = rand::rng();
	let mut result = String::with_capacity(len);

	for _ in 0..len {
		result.push(SAFE[rng.random_range(0..SAFE.len())]);
	}
	result
}

/// Random record identifier
pub fn random_id() -> String {
	random_string(ID_LENGTH)
}

/// Random share slug used in public QR/NFC links
pub fn random_slug() -> String {
	random_string(SLUG_LENGTH)
}

/// Normalize an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
	email.trim().to_lowercase()
}

/// Minimal email sanity check
pub fn is_valid_email(email: &str) -> bool {
	let email = email.trim();
	match email.split_once('@') {
		Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
		None => false,
	}
}

/// Trim a required text field, rejecting empty values
pub fn required_text(field: &str, value: &str) -> crate::error::OiResult<Box<str>> {
	let value = value.trim();
	if value.is_empty() {
		return Err(crate::error::Error::ValidationError(format!("{} is required", field)));
	}
	Ok(value.into())
}

/// Trim an optional text field, mapping blank values to `None`
pub fn optional_text(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|v| !v.is_empty())
}


// vim: ts=4
