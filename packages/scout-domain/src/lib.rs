pub mod document;
pub mod query;
pub mod time_serde;

pub use document::{
	ConnectionSearchDocument, EnrichedResult, ProfileSummary, SearchDocument, SearchHit,
	SearchResultDocument,
};
pub use query::{
	Clause, Collection, Direction, Field, FieldKind, IndexQuery, IndexQueryBuilder,
	MAX_AUTOCOMPLETE_CHARS, Sort,
};
