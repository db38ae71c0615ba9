use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::{Error, Result};
use scout_config::ProfileProviderConfig;
use scout_domain::ProfileSummary;

/// Client for the remote profile service. Cheap to clone and safe to share across tasks.
#[derive(Clone, Debug)]
pub struct ProfileClient {
	client: Client,
	base_url: String,
}
impl ProfileClient {
	pub fn new(cfg: &ProfileProviderConfig) -> Result<Self> {
		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
			.build()?;
		let base_url = format!("{}{}", cfg.api_base, cfg.path.trim_end_matches('/'));

		Ok(Self { client, base_url })
	}

	pub fn profile_url(&self, profile_id: i64) -> String {
		format!("{}/{profile_id}", self.base_url)
	}

	pub async fn fetch_summary(&self, profile_id: i64) -> Result<ProfileSummary> {
		let res = self.client.get(self.profile_url(profile_id)).send().await?;

		if res.status() == StatusCode::NOT_FOUND {
			return Err(Error::NotFound { profile_id });
		}

		let json: Value = res.error_for_status()?.json().await?;

		tracing::debug!(profile_id, "Fetched profile summary.");

		parse_profile_response(profile_id, json)
	}
}

/// Accepts either a bare profile object or one wrapped in a `data` envelope. The returned
/// summary always carries the requested id.
pub fn parse_profile_response(profile_id: i64, json: Value) -> Result<ProfileSummary> {
	let body = match json {
		Value::Object(mut map) => match map.remove("data") {
			Some(data @ Value::Object(_)) => data,
			Some(_) =>
				return Err(Error::InvalidResponse {
					message: "Profile response data must be an object.".to_string(),
				}),
			None => Value::Object(map),
		},
		_ =>
			return Err(Error::InvalidResponse {
				message: "Profile response must be a JSON object.".to_string(),
			}),
	};
	let mut summary: ProfileSummary = serde_json::from_value(body)?;

	summary.id = profile_id;

	Ok(summary)
}
