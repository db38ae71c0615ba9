//! Board scope lookups. Each lookup returns ids only and runs independently of the others.

use uuid::Uuid;

use crate::{Result, db::Db};

pub const PUBLIC_STATE: &str = "PUBLIC";

/// Boards where any of `profiles` is a viewer, subscriber, admin or guest.
pub async fn shared_board_ids(db: &Db, profiles: &[i64]) -> Result<Vec<Uuid>> {
	let ids = sqlx::query_scalar::<_, Uuid>(
		"\
SELECT board_id
FROM boards
WHERE viewers && $1
	OR subscribers && $1
	OR admins && $1
	OR guests && $1
ORDER BY created_at, board_id",
	)
	.bind(profiles)
	.fetch_all(&db.pool)
	.await?;

	Ok(ids)
}

pub async fn owned_board_ids(db: &Db, profiles: &[i64]) -> Result<Vec<Uuid>> {
	let ids = sqlx::query_scalar::<_, Uuid>(
		"\
SELECT board_id
FROM boards
WHERE owner = ANY($1)
ORDER BY created_at, board_id",
	)
	.bind(profiles)
	.fetch_all(&db.pool)
	.await?;

	Ok(ids)
}

pub async fn public_board_ids(db: &Db) -> Result<Vec<Uuid>> {
	let ids = sqlx::query_scalar::<_, Uuid>(
		"\
SELECT board_id
FROM boards
WHERE state = $1
ORDER BY created_at, board_id",
	)
	.bind(PUBLIC_STATE)
	.fetch_all(&db.pool)
	.await?;

	Ok(ids)
}

/// Boards followed by any of `profiles`, from the relational follow table.
pub async fn followed_board_ids(db: &Db, profiles: &[i64]) -> Result<Vec<Uuid>> {
	let ids = sqlx::query_scalar::<_, Uuid>(
		"\
SELECT board_id
FROM boards_followed
WHERE profile_id = ANY($1)
ORDER BY followed_at, board_id",
	)
	.bind(profiles)
	.fetch_all(&db.pool)
	.await?;

	Ok(ids)
}
