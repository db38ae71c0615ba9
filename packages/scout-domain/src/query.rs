use serde_json::Value;
use time::OffsetDateTime;

use crate::time_serde;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
	SearchResults,
	Connections,
}
impl Collection {
	pub fn index_name(self) -> &'static str {
		match self {
			Self::SearchResults => "searchResults",
			Self::Connections => "connections",
		}
	}
}

/// How the store matches a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
	/// Analyzed text, matched term by term and scored.
	FullText,
	/// Exact value, matched by equality.
	Keyword,
	Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
	Title,
	Description,
	FileName,
	Tags,
	Type,
	BodyRaw,
	BoardId,
	FileMime,
	CreateDate,
	Owner,
	ProfileId,
	Birthday,
	City,
	Email1,
	FirstName,
	LastName,
	MetNotes,
	NickName,
	Notes,
	Phone1,
	Relationship,
	ScreenName,
	State,
	Zip,
}
impl Field {
	/// Contact fields matched by free text in the connections collection.
	pub const CONNECTION_TEXT: [Self; 14] = [
		Self::Birthday,
		Self::City,
		Self::Email1,
		Self::FirstName,
		Self::LastName,
		Self::MetNotes,
		Self::NickName,
		Self::Notes,
		Self::Phone1,
		Self::Relationship,
		Self::ScreenName,
		Self::State,
		Self::Tags,
		Self::Zip,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Title => "title",
			Self::Description => "description",
			Self::FileName => "fileName",
			Self::Tags => "tags",
			Self::Type => "type",
			Self::BodyRaw => "body_raw",
			Self::BoardId => "boardID",
			Self::FileMime => "fileMime",
			Self::CreateDate => "createDate",
			Self::Owner => "owner",
			Self::ProfileId => "profileID",
			Self::Birthday => "birthday",
			Self::City => "city",
			Self::Email1 => "email1",
			Self::FirstName => "firstName",
			Self::LastName => "lastName",
			Self::MetNotes => "metNotes",
			Self::NickName => "nickName",
			Self::Notes => "notes",
			Self::Phone1 => "phone1",
			Self::Relationship => "relationship",
			Self::ScreenName => "screenName",
			Self::State => "state",
			Self::Zip => "zip",
		}
	}

	pub fn kind(self) -> FieldKind {
		match self {
			Self::Type | Self::BoardId | Self::FileMime | Self::Owner | Self::ProfileId =>
				FieldKind::Keyword,
			Self::CreateDate => FieldKind::Date,
			_ => FieldKind::FullText,
		}
	}

	/// Fields a caller may sort by. Anything else is rejected before a query is built.
	pub fn parse_sort(raw: &str) -> Option<Self> {
		match raw.trim() {
			"createDate" => Some(Self::CreateDate),
			"title" => Some(Self::Title),
			"type" => Some(Self::Type),
			"boardID" => Some(Self::BoardId),
			_ => None,
		}
	}
}

/// Longest autocomplete query, in characters, that the fuzzy prefix matcher accepts.
pub const MAX_AUTOCOMPLETE_CHARS: usize = 255;

#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
	/// Matches when the field matches any of the query strings.
	Text { path: Field, query: Vec<String> },
	Regex { path: Field, pattern: String },
	/// Inclusive bounds; `None` leaves that side open.
	Range { path: Field, gte: Option<OffsetDateTime>, lte: Option<OffsetDateTime> },
	/// Prefix match on any token of the field, tolerating `max_edits` edits.
	Autocomplete { path: Field, query: String, max_edits: u8 },
}
impl Clause {
	pub fn text(path: Field, query: impl Into<String>) -> Self {
		Self::Text { path, query: vec![query.into()] }
	}

	pub fn text_any<I, S>(path: Field, terms: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::Text { path, query: terms.into_iter().map(Into::into).collect() }
	}

	pub fn regex(path: Field, pattern: impl Into<String>) -> Self {
		Self::Regex { path, pattern: pattern.into() }
	}

	pub fn range(path: Field, gte: Option<OffsetDateTime>, lte: Option<OffsetDateTime>) -> Self {
		Self::Range { path, gte, lte }
	}

	pub fn autocomplete(path: Field, query: impl Into<String>, max_edits: u8) -> Self {
		Self::Autocomplete { path, query: query.into(), max_edits }
	}

	pub fn path(&self) -> Field {
		match self {
			Self::Text { path, .. }
			| Self::Regex { path, .. }
			| Self::Range { path, .. }
			| Self::Autocomplete { path, .. } => *path,
		}
	}

	pub fn to_value(&self) -> Value {
		match self {
			Self::Text { path, query } => {
				let query = match query.as_slice() {
					[single] => Value::String(single.clone()),
					many => Value::Array(many.iter().cloned().map(Value::String).collect()),
				};

				serde_json::json!({ "text": { "query": query, "path": path.as_str() } })
			},
			Self::Regex { path, pattern } => serde_json::json!({
				"regex": { "query": pattern, "path": path.as_str(), "allowAnalyzedField": true }
			}),
			Self::Range { path, gte, lte } => {
				let mut range = serde_json::Map::new();

				range.insert("path".to_string(), Value::String(path.as_str().to_string()));

				if let Some(gte) = gte {
					range.insert("gte".to_string(), time_serde::to_value(gte));
				}
				if let Some(lte) = lte {
					range.insert("lte".to_string(), time_serde::to_value(lte));
				}

				serde_json::json!({ "range": range })
			},
			Self::Autocomplete { path, query, max_edits } => serde_json::json!({
				"autocomplete": {
					"query": query,
					"path": path.as_str(),
					"fuzzy": { "maxEdits": max_edits },
				}
			}),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	Asc,
	Desc,
}
impl Direction {
	/// Only an explicit `asc` (any case) selects ascending order.
	pub fn parse(raw: Option<&str>) -> Self {
		match raw.map(str::trim) {
			Some(value) if value.eq_ignore_ascii_case("asc") => Self::Asc,
			_ => Self::Desc,
		}
	}

	pub fn as_i32(self) -> i32 {
		match self {
			Self::Asc => 1,
			Self::Desc => -1,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sort {
	/// Order by the index scorer and expose the score on each hit.
	Relevance,
	Field { path: Field, direction: Direction },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexQuery {
	pub collection: Collection,
	pub should: Vec<Clause>,
	pub must: Vec<Clause>,
	pub minimum_should_match: u32,
	pub sort: Sort,
	pub limit: Option<u32>,
}
impl IndexQuery {
	pub fn builder(collection: Collection) -> IndexQueryBuilder {
		IndexQueryBuilder {
			query: Self {
				collection,
				should: Vec::new(),
				must: Vec::new(),
				minimum_should_match: 1,
				sort: Sort::Relevance,
				limit: None,
			},
		}
	}

	pub fn includes_score(&self) -> bool {
		matches!(self.sort, Sort::Relevance)
	}

	pub fn has_should(&self, path: Field) -> bool {
		self.should.iter().any(|clause| clause.path() == path)
	}

	pub fn has_must(&self, path: Field) -> bool {
		self.must.iter().any(|clause| clause.path() == path)
	}

	/// Renders the query as a `$search` aggregation pipeline. Used for logs and traces.
	pub fn to_value(&self) -> Value {
		let mut compound = serde_json::Map::new();

		compound.insert(
			"should".to_string(),
			Value::Array(self.should.iter().map(Clause::to_value).collect()),
		);

		if !self.must.is_empty() {
			compound.insert(
				"must".to_string(),
				Value::Array(self.must.iter().map(Clause::to_value).collect()),
			);
		}

		compound.insert("minimumShouldMatch".to_string(), Value::from(self.minimum_should_match));

		let mut pipeline = vec![serde_json::json!({
			"$search": { "index": self.collection.index_name(), "compound": compound }
		})];

		match &self.sort {
			Sort::Relevance => {
				pipeline.push(serde_json::json!({
					"$addFields": { "score": { "$meta": "searchScore" } }
				}));
				pipeline.push(serde_json::json!({ "$sort": { "score": -1 } }));
			},
			Sort::Field { path, direction } => {
				let sort = serde_json::json!({ path.as_str(): direction.as_i32() });

				pipeline.push(serde_json::json!({ "$sort": sort }));
			},
		}

		if let Some(limit) = self.limit {
			pipeline.push(serde_json::json!({ "$limit": limit }));
		}

		Value::Array(pipeline)
	}
}

/// Incremental construction of an [`IndexQuery`].
#[derive(Debug, Clone)]
pub struct IndexQueryBuilder {
	query: IndexQuery,
}
impl IndexQueryBuilder {
	pub fn should(&mut self, clause: Clause) -> &mut Self {
		self.query.should.push(clause);

		self
	}

	pub fn must(&mut self, clause: Clause) -> &mut Self {
		self.query.must.push(clause);

		self
	}

	pub fn minimum_should_match(&mut self, count: u32) -> &mut Self {
		self.query.minimum_should_match = count;

		self
	}

	pub fn sort(&mut self, sort: Sort) -> &mut Self {
		self.query.sort = sort;

		self
	}

	pub fn limit(&mut self, limit: u32) -> &mut Self {
		self.query.limit = Some(limit);

		self
	}

	pub fn build(self) -> IndexQuery {
		self.query
	}
}
