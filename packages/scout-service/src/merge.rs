use scout_domain::{Direction, SearchHit};

use crate::query::SortSpec;

#[derive(Debug, Default)]
pub struct MergedPage {
	pub items: Vec<SearchHit>,
	/// Number of merged hits before slicing.
	pub total: usize,
}

/// Concatenates primary and connection hits, re-sorts by creation date when connections were
/// searched under a `createDate` sort, and cuts out the requested page.
pub fn merge(
	primary: Vec<SearchHit>,
	connections: Vec<SearchHit>,
	connections_requested: bool,
	sort: &SortSpec,
	page: u32,
	limit: u32,
) -> MergedPage {
	let mut merged = primary;

	merged.extend(connections);

	if connections_requested
		&& let SortSpec::Field { direction, .. } = sort
		&& sort.is_create_date()
	{
		match direction {
			Direction::Asc => merged.sort_by_key(SearchHit::create_date),
			Direction::Desc => merged.sort_by(|a, b| b.create_date().cmp(&a.create_date())),
		}
	}

	let total = merged.len();
	let items = paginate(merged, page, limit);

	MergedPage { items, total }
}

/// Returns everything when the result fits in one page. Otherwise returns the
/// `[(page - 1) * limit, page * limit)` window, clamped to the result length.
pub fn paginate<T>(mut items: Vec<T>, page: u32, limit: u32) -> Vec<T> {
	let len = items.len();
	let limit = limit as usize;

	if len <= limit {
		return items;
	}

	let start = (page.max(1) as usize - 1).saturating_mul(limit).min(len);
	let end = start.saturating_add(limit).min(len);

	items.truncate(end);
	items.drain(..start);

	items
}
