use scout_domain::{IndexQuery, SearchHit};

use crate::{Error, Result, SearchIndex};

/// Hits from both collections, kept apart until the merge step.
#[derive(Debug, Default)]
pub struct ExecutedSearch {
	pub primary: Vec<SearchHit>,
	pub connections: Vec<SearchHit>,
}

/// Starts the primary query and, when requested, the connection query, then waits for both.
/// The first failure cancels the other query.
pub async fn execute(
	index: &dyn SearchIndex,
	primary: &IndexQuery,
	connections: Option<&IndexQuery>,
	max_time_ms: u64,
) -> Result<ExecutedSearch> {
	tracing::debug!(query = %primary.to_value(), "Executing primary search.");

	let primary_search = async {
		index.search_things(primary, max_time_ms).await.map_err(|err| context("Primary", err))
	};
	let connection_search = async {
		match connections {
			Some(query) => {
				tracing::debug!(query = %query.to_value(), "Executing connection search.");

				index
					.search_connections(query, max_time_ms)
					.await
					.map_err(|err| context("Connection", err))
			},
			None => Ok(Vec::new()),
		}
	};
	let (primary, connections) = tokio::try_join!(primary_search, connection_search)?;

	tracing::info!(
		primary = primary.len(),
		connections = connections.len(),
		"Search executors finished."
	);

	Ok(ExecutedSearch { primary, connections })
}

fn context(label: &str, err: Error) -> Error {
	match err {
		Error::Storage { message } =>
			Error::Storage { message: format!("{label} search failed: {message}") },
		Error::Timeout { message } =>
			Error::Timeout { message: format!("{label} search failed: {message}") },
		other => other,
	}
}
