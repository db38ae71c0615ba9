//! Owner profile enrichment with a request-scoped memo.

use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
};

use futures::future;
use tokio::sync::{OnceCell, Semaphore};

use crate::{Error, ProfileProvider, Result};
use scout_domain::{EnrichedResult, ProfileSummary, SearchHit};

/// Profile summaries keyed by profile id. Each id owns a cell that is initialized at most once,
/// so concurrent rows with the same owner share a single lookup.
#[derive(Debug, Default)]
pub struct ProfileMemo {
	entries: Mutex<HashMap<i64, Arc<OnceCell<ProfileSummary>>>>,
}
impl ProfileMemo {
	pub fn get(&self, profile_id: i64) -> Option<ProfileSummary> {
		let entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.get(&profile_id).and_then(|cell| cell.get().cloned())
	}

	/// Number of profiles resolved so far.
	pub fn len(&self) -> usize {
		let entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.values().filter(|cell| cell.initialized()).count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn cell(&self, profile_id: i64) -> Arc<OnceCell<ProfileSummary>> {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.entry(profile_id).or_default().clone()
	}
}

pub struct ProfileEnricher {
	provider: Arc<dyn ProfileProvider>,
	memo: ProfileMemo,
	permits: Semaphore,
}
impl ProfileEnricher {
	pub fn new(provider: Arc<dyn ProfileProvider>, max_in_flight: usize) -> Self {
		Self {
			provider,
			memo: ProfileMemo::default(),
			permits: Semaphore::new(max_in_flight.max(1)),
		}
	}

	pub fn memo(&self) -> &ProfileMemo {
		&self.memo
	}

	pub async fn enrich_hits(&self, hits: Vec<SearchHit>) -> Result<Vec<EnrichedResult>> {
		let mut rows = hits.into_iter().map(EnrichedResult::from).collect::<Vec<_>>();

		self.enrich(&mut rows).await?;

		Ok(rows)
	}

	/// Attaches `ownerInfo` to every row with an owner. Fails as a whole on the first failed
	/// lookup; lookups still in flight are dropped.
	pub async fn enrich(&self, rows: &mut [EnrichedResult]) -> Result<()> {
		let row_count = rows.len();

		future::try_join_all(rows.iter_mut().map(|row| async move {
			let Some(owner_id) = row.hit.owner_id() else {
				return Ok(());
			};

			row.owner_info = Some(self.summary(owner_id).await?);

			Ok::<(), Error>(())
		}))
		.await?;

		tracing::debug!(rows = row_count, profiles = self.memo.len(), "Enriched search results.");

		Ok(())
	}

	async fn summary(&self, profile_id: i64) -> Result<ProfileSummary> {
		let cell = self.memo.cell(profile_id);
		let summary = cell
			.get_or_try_init(|| async {
				let _permit = self.permits.acquire().await.map_err(|_| Error::Provider {
					message: "Profile lookups are no longer accepted.".to_string(),
				})?;

				self.provider.fetch_summary(profile_id).await
			})
			.await?;

		Ok(summary.clone())
	}
}
