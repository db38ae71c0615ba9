//! Resolution of a raw [`SearchFilter`] into the immutable [`ResolvedScope`] a query is built
//! from.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use time::{
	Date, OffsetDateTime, Time,
	macros::{format_description, time},
};
use uuid::Uuid;

use crate::{BoardDirectory, BoxFuture, Error, Result, ScoutService};

const FILE_TYPE: &str = "FILE";
const END_OF_DAY: Time = time!(23:59:59);

/// Filter toggles as sent by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchFilter {
	pub connections: bool,
	pub my_boards: bool,
	pub shared_boards: bool,
	pub followed_boards: bool,
	pub public_boards: bool,
	pub tags: bool,
	pub things: BTreeMap<String, bool>,
	pub start_date: Option<String>,
	pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScope {
	pub profiles: Vec<i64>,
	pub connections: bool,
	pub tags: bool,
	/// Upper-case entity types, in filter key order.
	pub types: Vec<String>,
	/// `^(image|video)/` style alternation; empty when neither photos nor videos are requested.
	pub mime_pattern: String,
	pub board_ids: Vec<Uuid>,
	pub created_after: Option<OffsetDateTime>,
	pub created_before: Option<OffsetDateTime>,
}
impl ResolvedScope {
	pub fn board_ids_pattern(&self) -> String {
		self.board_ids.iter().map(Uuid::to_string).collect::<Vec<_>>().join(" OR ")
	}
}

impl ScoutService {
	pub async fn resolve_scope(
		&self,
		profile_id: i64,
		filter: &SearchFilter,
	) -> Result<ResolvedScope> {
		resolve_scope(self.backends.boards.as_ref(), profile_id, filter).await
	}
}

/// Validates the date range, then runs every enabled board lookup concurrently. Lookups are
/// merged in a fixed order (shared, owned, public, followed) once all of them have finished.
pub async fn resolve_scope(
	boards: &dyn BoardDirectory,
	profile_id: i64,
	filter: &SearchFilter,
) -> Result<ResolvedScope> {
	let (created_after, created_before) = parse_date_range(filter)?;
	let (types, mime_pattern) = normalize_things(&filter.things);
	let profiles = vec![profile_id];
	let (shared, owned, public, followed) = tokio::try_join!(
		lookup(filter.shared_boards, || boards.shared_board_ids(&profiles)),
		lookup(filter.my_boards, || boards.owned_board_ids(&profiles)),
		lookup(filter.public_boards, || boards.public_board_ids()),
		lookup(filter.followed_boards, || boards.followed_board_ids(&profiles)),
	)?;
	let board_ids = merge_board_ids([shared, owned, public, followed]);

	tracing::debug!(
		profile_id,
		boards = board_ids.len(),
		types = ?types,
		mime_pattern = %mime_pattern,
		"Resolved search scope."
	);

	Ok(ResolvedScope {
		profiles,
		connections: filter.connections,
		tags: filter.tags,
		types,
		mime_pattern,
		board_ids,
		created_after,
		created_before,
	})
}

/// Concatenates the lookup results in order, keeping the first occurrence of each id.
fn merge_board_ids(lists: [Vec<Uuid>; 4]) -> Vec<Uuid> {
	let total = lists.iter().map(Vec::len).sum();
	let mut seen = HashSet::with_capacity(total);
	let mut board_ids = Vec::with_capacity(total);

	for id in lists.into_iter().flatten() {
		if seen.insert(id) {
			board_ids.push(id);
		}
	}

	board_ids
}

async fn lookup<'a, F>(enabled: bool, start: F) -> Result<Vec<Uuid>>
where
	F: FnOnce() -> BoxFuture<'a, Result<Vec<Uuid>>>,
{
	if enabled { start().await } else { Ok(Vec::new()) }
}

fn parse_date_range(
	filter: &SearchFilter,
) -> Result<(Option<OffsetDateTime>, Option<OffsetDateTime>)> {
	let start = parse_day(filter.start_date.as_deref(), "startDate", Time::MIDNIGHT)?;
	let end = parse_day(filter.end_date.as_deref(), "endDate", END_OF_DAY)?;

	if let (Some(start), Some(end)) = (start, end)
		&& end < start
	{
		return Err(Error::invalid("endDate must not be before startDate."));
	}

	Ok((start, end))
}

fn parse_day(raw: Option<&str>, label: &str, time: Time) -> Result<Option<OffsetDateTime>> {
	let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
		return Ok(None);
	};
	let date = Date::parse(raw, format_description!("[year]-[month]-[day]"))
		.map_err(|_| Error::invalid(format!("{label} must be a YYYY-MM-DD date.")))?;

	Ok(Some(date.with_time(time).assume_utc()))
}

/// Maps thing toggles to entity types. Photos and videos request the `FILE` type once and
/// contribute to the MIME alternation.
fn normalize_things(things: &BTreeMap<String, bool>) -> (Vec<String>, String) {
	let mut types: Vec<String> = Vec::new();
	let mut mimes: Vec<&str> = Vec::new();

	for (key, enabled) in things {
		if !enabled {
			continue;
		}

		let key = key.trim();
		let mime = if key.eq_ignore_ascii_case("photo") {
			Some("image")
		} else if key.eq_ignore_ascii_case("video") {
			Some("video")
		} else {
			None
		};
		let thing_type = match mime {
			Some(_) => FILE_TYPE.to_string(),
			None => key.to_uppercase(),
		};

		if let Some(mime) = mime
			&& !mimes.contains(&mime)
		{
			mimes.push(mime);
		}
		if !thing_type.is_empty() && !types.contains(&thing_type) {
			types.push(thing_type);
		}
	}

	let mime_pattern =
		if mimes.is_empty() { String::new() } else { format!("^({})/", mimes.join("|")) };

	(types, mime_pattern)
}
