//! Platform settings record

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Global platform configuration.
///
/// Stored as a single JSON object. Missing keys take their default value, unknown
/// keys are ignored, so the record survives field additions in either direction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformSettings {
	pub maintenance_mode: bool,
	/// Maximum credential age in minutes, `None` or `0` disables the check
	pub session_timeout_minutes: Option<u32>,
	pub currency: Box<str>,
	pub email_notifications: bool,
	pub new_user_notifications: bool,
	pub webhook_url: Option<Box<str>>,
	pub platform_name: Box<str>,
	pub max_upload_mb: u32,
}

impl Default for PlatformSettings {
	fn default() -> Self {
		Self {
			maintenance_mode: false,
			session_timeout_minutes: None,
			currency: "USD".into(),
			email_notifications: true,
			new_user_notifications: true,
			webhook_url: None,
			platform_name: "Outbound Impact".into(),
			max_upload_mb: 100,
		}
	}
}

impl PlatformSettings {
	/// Overlay a stored settings object on the defaults
	pub fn merge_stored(stored: &serde_json::Value) -> OiResult<Self> {
		let mut merged = serde_json::to_value(Self::default())?;
		merge_object(&mut merged, stored)?;
		Ok(serde_json::from_value(merged)?)
	}

	/// Apply a partial update on top of `self`
	pub fn patched(&self, patch: &serde_json::Value) -> OiResult<Self> {
		let mut merged = serde_json::to_value(self)?;
		merge_object(&mut merged, patch)?;
		serde_json::from_value(merged)
			.map_err(|err| Error::ValidationError(format!("invalid settings: {}", err)))
	}

	/// Session timeout in seconds, if one is in force
	pub fn session_timeout_secs(&self) -> Option<i64> {
		match self.session_timeout_minutes {
			Some(0) | None => None,
			Some(minutes) => Some(i64::from(minutes) * 60),
		}
	}
}

fn merge_object(target: &mut serde_json::Value, overlay: &serde_json::Value) -> OiResult<()> {
	let (Some(target), Some(overlay)) = (target.as_object_mut(), overlay.as_object()) else {
		return Err(Error::ValidationError("settings must be a JSON object".into()));
	};
	for (key, value) in overlay {
		target.insert(key.clone(), value.clone());
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_merge_keeps_defaults_for_missing_keys() {
		let settings = PlatformSettings::merge_stored(&json!({ "maintenanceMode": true })).unwrap();
		assert!(settings.maintenance_mode);
		assert_eq!(settings.currency.as_ref(), "USD");
		assert_eq!(settings.max_upload_mb, 100);
	}

	#[test]
	fn test_merge_ignores_unknown_keys() {
		let settings =
			PlatformSettings::merge_stored(&json!({ "legacyFlag": 1, "currency": "EUR" })).unwrap();
		assert_eq!(settings.currency.as_ref(), "EUR");
	}

	#[test]
	fn test_merge_rejects_bad_types() {
		assert!(PlatformSettings::merge_stored(&json!({ "maintenanceMode": "yes" })).is_err());
		assert!(PlatformSettings::merge_stored(&json!([1, 2])).is_err());
	}

	#[test]
	fn test_session_timeout_secs() {
		let mut settings = PlatformSettings::default();
		assert_eq!(settings.session_timeout_secs(), None);
		settings.session_timeout_minutes = Some(0);
		assert_eq!(settings.session_timeout_secs(), None);
		settings.session_timeout_minutes = Some(30);
		assert_eq!(settings.session_timeout_secs(), Some(1800));
	}

	#[test]
	fn test_patched_validates() {
		let settings = PlatformSettings::default();
		let patched = settings.patched(&json!({ "sessionTimeoutMinutes": 15 })).unwrap();
		assert_eq!(patched.session_timeout_minutes, Some(15));
		assert!(matches!(
			settings.patched(&json!({ "sessionTimeoutMinutes": -1 })),
			Err(Error::ValidationError(_))
		));
	}
}

// vim: ts=4
