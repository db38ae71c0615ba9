use time::OffsetDateTime;

use crate::{Result, db::Db, models::SearchHistoryRow};

/// Moves `query` to the most recent position and drops the oldest entries beyond
/// `max_entries`. Entries are stored oldest first.
pub fn push_entry(mut history: Vec<String>, query: &str, max_entries: usize) -> Vec<String> {
	history.retain(|entry| entry != query);
	history.push(query.to_string());

	if history.len() > max_entries {
		let excess = history.len() - max_entries;

		history.drain(..excess);
	}

	history
}

pub async fn fetch_search_history(db: &Db, profile_id: i64) -> Result<Option<SearchHistoryRow>> {
	let row = sqlx::query_as::<_, SearchHistoryRow>(
		"\
SELECT profile_id, history, updated_at
FROM search_history
WHERE profile_id = $1",
	)
	.bind(profile_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(row)
}

/// Appends `query` under a row lock and returns the stored list, oldest first.
///
/// The row is created first so that concurrent first appends for a profile serialize on its
/// lock instead of racing on the insert.
pub async fn append_search_history(
	db: &Db,
	profile_id: i64,
	query: &str,
	max_entries: usize,
	now: OffsetDateTime,
) -> Result<Vec<String>> {
	let mut tx = db.pool.begin().await?;

	sqlx::query(
		"\
INSERT INTO search_history (profile_id, history, updated_at)
VALUES ($1, '{}', $2)
ON CONFLICT (profile_id) DO NOTHING",
	)
	.bind(profile_id)
	.bind(now)
	.execute(&mut *tx)
	.await?;

	let current: Vec<String> = sqlx::query_scalar(
		"SELECT history FROM search_history WHERE profile_id = $1 FOR UPDATE",
	)
	.bind(profile_id)
	.fetch_one(&mut *tx)
	.await?;
	let history = push_entry(current, query, max_entries);

	sqlx::query("UPDATE search_history SET history = $2, updated_at = $3 WHERE profile_id = $1")
		.bind(profile_id)
		.bind(&history[..])
		.bind(now)
		.execute(&mut *tx)
		.await?;

	tx.commit().await?;

	Ok(history)
}
