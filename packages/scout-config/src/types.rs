use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub search: Search,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub profile: ProfileProviderConfig,
}

/// Remote profile-lookup service. Profiles are fetched from `{api_base}{path}/{profile_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	/// Deadline covering scope resolution, both executors, merge and enrichment.
	#[serde(default = "default_pipeline_timeout_ms")]
	pub pipeline_timeout_ms: u64,
	/// Per-query execution cap applied inside the store.
	#[serde(default = "default_query_max_time_ms")]
	pub query_max_time_ms: u64,
	#[serde(default = "default_enrichment_max_in_flight")]
	pub enrichment_max_in_flight: usize,
	pub autocomplete: SearchAutocomplete,
	pub history: SearchHistory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchAutocomplete {
	pub limit: u32,
	pub max_edits: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHistory {
	pub max_entries: usize,
}

fn default_pipeline_timeout_ms() -> u64 {
	600_000
}

fn default_query_max_time_ms() -> u64 {
	105_000
}

fn default_enrichment_max_in_flight() -> usize {
	4
}
