pub mod autocomplete;
pub mod enrich;
pub mod execute;
pub mod history;
pub mod merge;
pub mod query;
pub mod scope;
pub mod search;

mod error;

pub use autocomplete::{AutocompleteRequest, AutocompleteResponse};
pub use enrich::{ProfileEnricher, ProfileMemo};
pub use error::{Error, Result};
pub use history::{AckResponse, HistoryData, HistoryResponse};
pub use merge::MergedPage;
pub use query::SortSpec;
pub use scope::{ResolvedScope, SearchFilter};
pub use search::{FullTextSearchRequest, SearchResponse};

use std::{future::Future, pin::Pin, sync::Arc};

use time::OffsetDateTime;
use uuid::Uuid;

use scout_config::{Config, ProfileProviderConfig};
use scout_domain::{IndexQuery, ProfileSummary, SearchHit};
use scout_providers::ProfileClient;
use scout_storage::{boards, db::Db, history as history_store, index};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Board id lookups that make up a profile's visibility scope.
pub trait BoardDirectory
where
	Self: Send + Sync,
{
	fn shared_board_ids<'a>(&'a self, profiles: &'a [i64]) -> BoxFuture<'a, Result<Vec<Uuid>>>;

	fn owned_board_ids<'a>(&'a self, profiles: &'a [i64]) -> BoxFuture<'a, Result<Vec<Uuid>>>;

	fn public_board_ids(&self) -> BoxFuture<'_, Result<Vec<Uuid>>>;

	fn followed_board_ids<'a>(&'a self, profiles: &'a [i64]) -> BoxFuture<'a, Result<Vec<Uuid>>>;
}

pub trait SearchIndex
where
	Self: Send + Sync,
{
	fn search_things<'a>(
		&'a self,
		query: &'a IndexQuery,
		max_time_ms: u64,
	) -> BoxFuture<'a, Result<Vec<SearchHit>>>;

	fn search_connections<'a>(
		&'a self,
		query: &'a IndexQuery,
		max_time_ms: u64,
	) -> BoxFuture<'a, Result<Vec<SearchHit>>>;
}

/// Stored search history, oldest entry first.
pub trait HistoryStore
where
	Self: Send + Sync,
{
	fn fetch(&self, profile_id: i64) -> BoxFuture<'_, Result<Vec<String>>>;

	fn append<'a>(
		&'a self,
		profile_id: i64,
		query: &'a str,
		max_entries: usize,
	) -> BoxFuture<'a, Result<Vec<String>>>;
}

pub trait ProfileProvider
where
	Self: Send + Sync,
{
	fn fetch_summary(&self, profile_id: i64) -> BoxFuture<'_, Result<ProfileSummary>>;
}

#[derive(Clone)]
pub struct Backends {
	pub boards: Arc<dyn BoardDirectory>,
	pub index: Arc<dyn SearchIndex>,
	pub history: Arc<dyn HistoryStore>,
}
impl Backends {
	pub fn new(
		boards: Arc<dyn BoardDirectory>,
		index: Arc<dyn SearchIndex>,
		history: Arc<dyn HistoryStore>,
	) -> Self {
		Self { boards, index, history }
	}

	pub fn postgres(db: Db) -> Self {
		let backend = Arc::new(PostgresBackend { db });

		Self { boards: backend.clone(), index: backend.clone(), history: backend }
	}
}

#[derive(Clone)]
pub struct Providers {
	pub profile: Arc<dyn ProfileProvider>,
}
impl Providers {
	pub fn new(profile: Arc<dyn ProfileProvider>) -> Self {
		Self { profile }
	}

	pub fn http(cfg: &ProfileProviderConfig) -> Result<Self> {
		let client = ProfileClient::new(cfg)?;

		Ok(Self { profile: Arc::new(HttpProfiles { client }) })
	}
}

pub struct ScoutService {
	pub cfg: Config,
	pub backends: Backends,
	pub providers: Providers,
}
impl ScoutService {
	pub fn new(cfg: Config, db: Db) -> Result<Self> {
		let providers = Providers::http(&cfg.providers.profile)?;

		Ok(Self { cfg, backends: Backends::postgres(db), providers })
	}

	pub fn with_backends(cfg: Config, backends: Backends, providers: Providers) -> Self {
		Self { cfg, backends, providers }
	}

	/// A fresh enricher with an empty memo. One per request.
	pub fn enricher(&self) -> ProfileEnricher {
		ProfileEnricher::new(
			self.providers.profile.clone(),
			self.cfg.search.enrichment_max_in_flight,
		)
	}
}

struct PostgresBackend {
	db: Db,
}

impl BoardDirectory for PostgresBackend {
	fn shared_board_ids<'a>(&'a self, profiles: &'a [i64]) -> BoxFuture<'a, Result<Vec<Uuid>>> {
		Box::pin(async move {
			boards::shared_board_ids(&self.db, profiles).await.map_err(Error::from)
		})
	}

	fn owned_board_ids<'a>(&'a self, profiles: &'a [i64]) -> BoxFuture<'a, Result<Vec<Uuid>>> {
		Box::pin(async move {
			boards::owned_board_ids(&self.db, profiles).await.map_err(Error::from)
		})
	}

	fn public_board_ids(&self) -> BoxFuture<'_, Result<Vec<Uuid>>> {
		Box::pin(async move { boards::public_board_ids(&self.db).await.map_err(Error::from) })
	}

	fn followed_board_ids<'a>(&'a self, profiles: &'a [i64]) -> BoxFuture<'a, Result<Vec<Uuid>>> {
		Box::pin(async move {
			boards::followed_board_ids(&self.db, profiles).await.map_err(Error::from)
		})
	}
}

impl SearchIndex for PostgresBackend {
	fn search_things<'a>(
		&'a self,
		query: &'a IndexQuery,
		max_time_ms: u64,
	) -> BoxFuture<'a, Result<Vec<SearchHit>>> {
		Box::pin(async move {
			index::search_things(&self.db, query, max_time_ms).await.map_err(Error::from)
		})
	}

	fn search_connections<'a>(
		&'a self,
		query: &'a IndexQuery,
		max_time_ms: u64,
	) -> BoxFuture<'a, Result<Vec<SearchHit>>> {
		Box::pin(async move {
			index::search_connections(&self.db, query, max_time_ms).await.map_err(Error::from)
		})
	}
}

impl HistoryStore for PostgresBackend {
	fn fetch(&self, profile_id: i64) -> BoxFuture<'_, Result<Vec<String>>> {
		Box::pin(async move {
			history_store::fetch_search_history(&self.db, profile_id)
				.await
				.map(|row| row.map(|row| row.history).unwrap_or_default())
				.map_err(Error::from)
		})
	}

	fn append<'a>(
		&'a self,
		profile_id: i64,
		query: &'a str,
		max_entries: usize,
	) -> BoxFuture<'a, Result<Vec<String>>> {
		Box::pin(async move {
			let now = OffsetDateTime::now_utc();

			history_store::append_search_history(&self.db, profile_id, query, max_entries, now)
				.await
				.map_err(Error::from)
		})
	}
}

struct HttpProfiles {
	client: ProfileClient,
}

impl ProfileProvider for HttpProfiles {
	fn fetch_summary(&self, profile_id: i64) -> BoxFuture<'_, Result<ProfileSummary>> {
		Box::pin(async move { self.client.fetch_summary(profile_id).await.map_err(Error::from) })
	}
}
