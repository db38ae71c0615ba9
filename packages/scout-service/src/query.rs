//! Pure translation of a query string and resolved scope into an [`IndexQuery`].

use crate::{Error, Result, scope::ResolvedScope};
use scout_domain::{Clause, Collection, Direction, Field, IndexQuery, Sort};

const BASE_TEXT_FIELDS: [Field; 3] = [Field::Title, Field::Description, Field::FileName];
const AUTOCOMPLETE_FIELDS: [Field; 3] = [Field::Tags, Field::Description, Field::Title];
const NOTE_TYPE: &str = "NOTE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortSpec {
	Relevance,
	Field { field: Field, direction: Direction },
}
impl SortSpec {
	/// An absent or blank `sort_by` selects relevance ordering. Unknown fields are rejected.
	pub fn parse(sort_by: Option<&str>, order_by: Option<&str>) -> Result<Self> {
		let Some(raw) = sort_by.map(str::trim).filter(|raw| !raw.is_empty()) else {
			return Ok(Self::Relevance);
		};
		let field = Field::parse_sort(raw)
			.ok_or_else(|| Error::invalid(format!("sortBy {raw:?} is not a sortable field.")))?;

		Ok(Self::Field { field, direction: Direction::parse(order_by) })
	}

	pub fn to_sort(self) -> Sort {
		match self {
			Self::Relevance => Sort::Relevance,
			Self::Field { field, direction } => Sort::Field { path: field, direction },
		}
	}

	pub fn is_create_date(self) -> bool {
		matches!(self, Self::Field { field: Field::CreateDate, .. })
	}
}

pub fn build(query: &str, scope: Option<&ResolvedScope>, sort: &SortSpec) -> IndexQuery {
	let mut builder = IndexQuery::builder(Collection::SearchResults);

	for field in BASE_TEXT_FIELDS {
		builder.should(Clause::text(field, query));
	}

	builder.minimum_should_match(1).sort(sort.to_sort());

	let Some(scope) = scope else {
		return builder.build();
	};

	if scope.tags {
		builder.should(Clause::text(Field::Tags, query));
	}
	if !scope.types.is_empty() {
		builder.must(Clause::text_any(Field::Type, scope.types.iter().cloned()));

		if scope.types.iter().any(|thing_type| thing_type == NOTE_TYPE) {
			builder.should(Clause::text(Field::BodyRaw, query));
		}
	}
	if !scope.board_ids.is_empty() {
		builder.should(Clause::text_any(
			Field::BoardId,
			scope.board_ids.iter().map(ToString::to_string),
		));
	}
	if scope.mime_pattern.contains("image") || scope.mime_pattern.contains("video") {
		builder.must(Clause::regex(Field::FileMime, scope.mime_pattern.clone()));
	}

	builder.must(Clause::range(Field::CreateDate, scope.created_after, scope.created_before));

	builder.build()
}

/// Contact search over the searcher's own address book.
pub fn build_connections(query: &str, scope: &ResolvedScope) -> IndexQuery {
	let mut builder = IndexQuery::builder(Collection::Connections);

	for field in Field::CONNECTION_TEXT {
		builder.should(Clause::text(field, query));
	}

	builder.minimum_should_match(1).must(Clause::text_any(
		Field::ProfileId,
		scope.profiles.iter().map(ToString::to_string),
	));

	builder.build()
}

pub fn build_autocomplete(query: &str, limit: u32, max_edits: u8) -> IndexQuery {
	let mut builder = IndexQuery::builder(Collection::SearchResults);

	for field in AUTOCOMPLETE_FIELDS {
		builder.should(Clause::autocomplete(field, query, max_edits));
	}

	builder.sort(Sort::Relevance).limit(limit);

	builder.build()
}
