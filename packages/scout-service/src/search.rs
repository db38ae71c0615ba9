use std::{future::Future, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
	Error, Result, ScoutService, execute,
	merge::{self, MergedPage},
	query::{self, SortSpec},
	scope::{ResolvedScope, SearchFilter},
};
use scout_domain::EnrichedResult;

pub const FOUND_MESSAGE: &str = "Search results fetched successfully";
pub const EMPTY_MESSAGE: &str = "No search results found";

#[derive(Debug, Clone, Deserialize)]
pub struct FullTextSearchRequest {
	pub profile_id: i64,
	pub filter: Option<SearchFilter>,
	pub query: String,
	pub page: u32,
	pub limit: u32,
	pub sort_by: Option<String>,
	pub order_by: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
	pub data: Vec<EnrichedResult>,
	pub total: usize,
	pub status: i32,
	pub message: String,
}

impl ScoutService {
	/// Scope resolution, both searches, merge and enrichment under one deadline. A request
	/// either completes in full or fails; partial pages are never returned.
	pub async fn full_text_search(&self, req: FullTextSearchRequest) -> Result<SearchResponse> {
		if req.profile_id <= 0 {
			return Err(Error::invalid("profile_id must be a positive integer."));
		}
		if req.page == 0 {
			return Err(Error::invalid("page must be at least 1."));
		}
		if req.limit == 0 {
			return Err(Error::invalid("limit must be at least 1."));
		}

		let sort = SortSpec::parse(req.sort_by.as_deref(), req.order_by.as_deref())?;
		let page = self.with_deadline(self.search_page(&req, &sort)).await?;
		let total = page.total;
		let message = if total == 0 { EMPTY_MESSAGE } else { FOUND_MESSAGE };

		tracing::info!(
			profile_id = req.profile_id,
			page = req.page,
			limit = req.limit,
			total,
			returned = page.data.len(),
			"Search served."
		);

		Ok(SearchResponse { data: page.data, total, status: 1, message: message.to_string() })
	}

	pub(crate) async fn with_deadline<T, F>(&self, fut: F) -> Result<T>
	where
		F: Future<Output = Result<T>>,
	{
		let timeout_ms = self.cfg.search.pipeline_timeout_ms;

		match tokio::time::timeout(Duration::from_millis(timeout_ms), fut).await {
			Ok(result) => result,
			Err(_) => {
				tracing::warn!(timeout_ms, "Search pipeline deadline elapsed.");

				Err(Error::Timeout {
					message: format!("Search did not complete within {timeout_ms} ms."),
				})
			},
		}
	}

	async fn search_page(
		&self,
		req: &FullTextSearchRequest,
		sort: &SortSpec,
	) -> Result<EnrichedPage> {
		let scope: Option<ResolvedScope> = match &req.filter {
			Some(filter) => Some(self.resolve_scope(req.profile_id, filter).await?),
			None => None,
		};
		let primary = query::build(&req.query, scope.as_ref(), sort);
		let connections = scope
			.as_ref()
			.filter(|scope| scope.connections)
			.map(|scope| query::build_connections(&req.query, scope));
		let executed = execute::execute(
			self.backends.index.as_ref(),
			&primary,
			connections.as_ref(),
			self.cfg.search.query_max_time_ms,
		)
		.await?;
		let MergedPage { items, total } = merge::merge(
			executed.primary,
			executed.connections,
			connections.is_some(),
			sort,
			req.page,
			req.limit,
		);
		let data = self.enricher().enrich_hits(items).await?;

		Ok(EnrichedPage { data, total })
	}
}

struct EnrichedPage {
	data: Vec<EnrichedResult>,
	total: usize,
}
