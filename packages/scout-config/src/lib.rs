mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, Postgres, ProfileProviderConfig, Providers, Search, SearchAutocomplete, SearchHistory,
	Service, Storage,
};

use std::{fs, path::Path};

const MAX_ENRICHMENT_IN_FLIGHT: usize = 16;
const MAX_AUTOCOMPLETE_LIMIT: u32 = 100;
const MAX_AUTOCOMPLETE_EDITS: u8 = 2;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("storage.postgres.dsn", &cfg.storage.postgres.dsn),
		("providers.profile.api_base", &cfg.providers.profile.api_base),
		("providers.profile.api_key", &cfg.providers.profile.api_key),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.profile.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.profile.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (key, value) in &cfg.providers.profile.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("providers.profile.default_headers.{key} must be a string."),
			});
		}
	}

	if cfg.search.pipeline_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "search.pipeline_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.search.query_max_time_ms == 0 {
		return Err(Error::Validation {
			message: "search.query_max_time_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.search.query_max_time_ms >= cfg.search.pipeline_timeout_ms {
		return Err(Error::Validation {
			message: "search.query_max_time_ms must be less than search.pipeline_timeout_ms."
				.to_string(),
		});
	}
	if !(1..=MAX_ENRICHMENT_IN_FLIGHT).contains(&cfg.search.enrichment_max_in_flight) {
		return Err(Error::Validation {
			message: format!(
				"search.enrichment_max_in_flight must be in the range 1-{MAX_ENRICHMENT_IN_FLIGHT}."
			),
		});
	}
	if !(1..=MAX_AUTOCOMPLETE_LIMIT).contains(&cfg.search.autocomplete.limit) {
		return Err(Error::Validation {
			message: format!(
				"search.autocomplete.limit must be in the range 1-{MAX_AUTOCOMPLETE_LIMIT}."
			),
		});
	}
	if cfg.search.autocomplete.max_edits > MAX_AUTOCOMPLETE_EDITS {
		return Err(Error::Validation {
			message: format!(
				"search.autocomplete.max_edits must be {MAX_AUTOCOMPLETE_EDITS} or less."
			),
		});
	}
	if cfg.search.history.max_entries == 0 {
		return Err(Error::Validation {
			message: "search.history.max_entries must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let trimmed = cfg.providers.profile.api_base.trim().trim_end_matches('/').to_string();

	cfg.providers.profile.api_base = trimmed;

	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
