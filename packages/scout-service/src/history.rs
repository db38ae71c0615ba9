use serde::Serialize;

use crate::{Error, Result, ScoutService};

pub const ADDED_MESSAGE: &str = "Added";
pub const FETCHED_MESSAGE: &str = "Search history fetched";
pub const EMPTY_MESSAGE: &str = "You have no search history";

#[derive(Debug, Clone, Serialize)]
pub struct HistoryData {
	#[serde(rename = "profileID")]
	pub profile_id: String,
	pub history: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
	pub data: HistoryData,
	pub status: i32,
	pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AckResponse {
	pub status: i32,
	pub message: String,
}

impl ScoutService {
	pub async fn add_to_search_history(&self, profile_id: i64, query: &str) -> Result<AckResponse> {
		let query = query.trim();

		if query.is_empty() {
			return Err(Error::invalid("search must be non-empty."));
		}

		let max_entries = self.cfg.search.history.max_entries;
		let stored = self.backends.history.append(profile_id, query, max_entries).await?;

		tracing::debug!(profile_id, entries = stored.len(), "Search history updated.");

		Ok(AckResponse { status: 1, message: ADDED_MESSAGE.to_string() })
	}

	/// Most recent query first, at most `search.history.max_entries` entries.
	pub async fn fetch_search_history(&self, profile_id: i64) -> Result<HistoryResponse> {
		let stored = self.backends.history.fetch(profile_id).await?;
		let max_entries = self.cfg.search.history.max_entries;
		let history = stored.into_iter().rev().take(max_entries).collect::<Vec<_>>();
		let message = if history.is_empty() { EMPTY_MESSAGE } else { FETCHED_MESSAGE };

		Ok(HistoryResponse {
			data: HistoryData { profile_id: profile_id.to_string(), history },
			status: 1,
			message: message.to_string(),
		})
	}
}
