use serde::{Deserialize, Serialize};

use crate::{Error, Result, ScoutService, execute, query};
use scout_domain::{EnrichedResult, MAX_AUTOCOMPLETE_CHARS};

pub const AUTOCOMPLETE_MESSAGE: &str = "Autocomplete results found.";

#[derive(Debug, Clone, Deserialize)]
pub struct AutocompleteRequest {
	pub profile_id: i64,
	pub query: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AutocompleteResponse {
	pub data: Vec<EnrichedResult>,
	pub status: i32,
	pub message: String,
}

impl ScoutService {
	/// Fuzzy prefix suggestions across all documents. No scope, type or date filtering applies.
	///
	/// Queries longer than [`MAX_AUTOCOMPLETE_CHARS`] after trimming are rejected.
	pub async fn autocomplete(&self, req: AutocompleteRequest) -> Result<AutocompleteResponse> {
		let query = req.query.trim();

		if query.is_empty() {
			return Ok(response(Vec::new()));
		}
		if query.chars().count() > MAX_AUTOCOMPLETE_CHARS {
			return Err(Error::invalid(format!(
				"search must be at most {MAX_AUTOCOMPLETE_CHARS} characters."
			)));
		}

		let settings = &self.cfg.search.autocomplete;
		let index_query = query::build_autocomplete(query, settings.limit, settings.max_edits);
		let data = self
			.with_deadline(async {
				let executed = execute::execute(
					self.backends.index.as_ref(),
					&index_query,
					None,
					self.cfg.search.query_max_time_ms,
				)
				.await?;

				self.enricher().enrich_hits(executed.primary).await
			})
			.await?;

		tracing::info!(profile_id = req.profile_id, results = data.len(), "Autocomplete served.");

		Ok(response(data))
	}
}

fn response(data: Vec<EnrichedResult>) -> AutocompleteResponse {
	AutocompleteResponse { data, status: 1, message: AUTOCOMPLETE_MESSAGE.to_string() }
}
