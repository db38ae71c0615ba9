use sqlx::{FromRow, postgres::PgRow};

use crate::{
	Error, Result,
	db::Db,
	models::{ConnectionRow, SearchResultRow},
	sql,
};
use scout_domain::{Collection, IndexQuery, SearchHit};

const QUERY_CANCELED: &str = "57014";

/// Runs a query against the primary collection, bounded by `max_time_ms`.
pub async fn search_things(
	db: &Db,
	query: &IndexQuery,
	max_time_ms: u64,
) -> Result<Vec<SearchHit>> {
	let include_score = query.includes_score();
	let rows: Vec<SearchResultRow> =
		fetch_rows(db, query, Collection::SearchResults, max_time_ms).await?;

	Ok(rows.into_iter().map(|row| row.into_hit(include_score)).collect())
}

/// Runs a query against the contacts collection, bounded by `max_time_ms`.
pub async fn search_connections(
	db: &Db,
	query: &IndexQuery,
	max_time_ms: u64,
) -> Result<Vec<SearchHit>> {
	let include_score = query.includes_score();
	let rows: Vec<ConnectionRow> =
		fetch_rows(db, query, Collection::Connections, max_time_ms).await?;

	Ok(rows.into_iter().map(|row| row.into_hit(include_score)).collect())
}

async fn fetch_rows<T>(
	db: &Db,
	query: &IndexQuery,
	expected: Collection,
	max_time_ms: u64,
) -> Result<Vec<T>>
where
	T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
	if query.collection != expected {
		return Err(Error::InvalidArgument(format!(
			"Expected a {} query, got {}.",
			expected.index_name(),
			query.collection.index_name()
		)));
	}

	let mut builder = sql::render(query)?;
	// SET LOCAL scopes the cap to this transaction.
	let mut tx = db.pool.begin().await?;

	sqlx::query(&format!("SET LOCAL statement_timeout = {max_time_ms}"))
		.execute(&mut *tx)
		.await?;

	let rows = builder
		.build_query_as::<T>()
		.fetch_all(&mut *tx)
		.await
		.map_err(|err| map_query_error(err, max_time_ms))?;

	tx.commit().await?;

	tracing::debug!(
		collection = expected.index_name(),
		rows = rows.len(),
		max_time_ms,
		"Index query executed."
	);

	Ok(rows)
}

fn map_query_error(err: sqlx::Error, max_time_ms: u64) -> Error {
	match &err {
		sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(QUERY_CANCELED) =>
			Error::QueryTimeout { max_time_ms },
		_ => Error::Sqlx(err),
	}
}
