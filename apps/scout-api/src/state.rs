use std::sync::Arc;

use scout_service::ScoutService;
use scout_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ScoutService>,
}
impl AppState {
	pub async fn new(config: scout_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = ScoutService::new(config, db)?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: ScoutService) -> Self {
		Self { service: Arc::new(service) }
	}
}
