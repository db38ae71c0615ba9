//! Renders an [`IndexQuery`] into a PostgreSQL full-text query.
//!
//! Full-text fields are matched with `to_tsvector('simple', ...)` and scored with `ts_rank`.
//! Keyword fields compare lower-cased values. Autocomplete clauses compare every token prefix
//! against the query with `levenshtein` from `fuzzystrmatch`.

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{Error, Result};
use scout_domain::{
	Clause, Collection, Direction, Field, FieldKind, IndexQuery, MAX_AUTOCOMPLETE_CHARS, Sort,
};

const SEARCH_RESULT_COLUMNS: &str = "\
id, board_id, type, visible, tags, description, title, body_raw, file_name, file_mime, owner, \
create_date";
const CONNECTION_COLUMNS: &str = "\
id, profile_id, connection_id, first_name, last_name, nick_name, screen_name, email1, phone1, \
city, state, zip, birthday, relationship, notes, met_notes, tags, create_date";
const TOKEN_SPLIT: &str = "'[^[:alnum:]]+'";

pub(crate) type SqlQuery = QueryBuilder<'static, Postgres>;

pub(crate) fn render(query: &IndexQuery) -> Result<SqlQuery> {
	let collection = query.collection;
	let mut qb = QueryBuilder::new("SELECT ");

	qb.push(columns(collection));
	qb.push(", (");

	if query.should.is_empty() {
		qb.push("0");
	} else {
		for (idx, clause) in query.should.iter().enumerate() {
			if idx > 0 {
				qb.push(" + ");
			}

			qb.push("CASE WHEN ");
			push_condition(&mut qb, collection, clause)?;
			qb.push(" THEN ");
			push_weight(&mut qb, collection, clause)?;
			qb.push(" ELSE 0 END");
		}
	}

	qb.push(")::real AS score FROM ");
	qb.push(table(collection));
	qb.push(" WHERE TRUE");

	if !query.should.is_empty() && query.minimum_should_match > 0 {
		qb.push(" AND (");

		for (idx, clause) in query.should.iter().enumerate() {
			if idx > 0 {
				qb.push(" + ");
			}

			qb.push("(");
			push_condition(&mut qb, collection, clause)?;
			qb.push(")::int");
		}

		qb.push(") >= ");
		qb.push_bind(i64::from(query.minimum_should_match));
	}

	for clause in &query.must {
		qb.push(" AND (");
		push_condition(&mut qb, collection, clause)?;
		qb.push(")");
	}

	qb.push(" ORDER BY ");

	match &query.sort {
		Sort::Relevance => {
			qb.push("score DESC");
		},
		Sort::Field { path, direction } => {
			qb.push(sort_column(collection, *path)?);
			qb.push(match direction {
				Direction::Asc => " ASC",
				Direction::Desc => " DESC",
			});
		},
	}

	qb.push(", id");

	if let Some(limit) = query.limit {
		qb.push(" LIMIT ");
		qb.push_bind(i64::from(limit));
	}

	Ok(qb)
}

/// Splits free text into lower-cased alphanumeric terms and OR-joins them for `to_tsquery`.
pub(crate) fn ts_query(terms: &[String]) -> Option<String> {
	let mut tokens: Vec<String> = Vec::new();

	for term in terms {
		for token in term.split(|ch: char| !ch.is_alphanumeric()) {
			if token.is_empty() {
				continue;
			}

			let token = token.to_lowercase();

			if !tokens.contains(&token) {
				tokens.push(token);
			}
		}
	}

	(!tokens.is_empty()).then(|| tokens.join(" | "))
}

fn table(collection: Collection) -> &'static str {
	match collection {
		Collection::SearchResults => "search_results",
		Collection::Connections => "connections",
	}
}

fn columns(collection: Collection) -> &'static str {
	match collection {
		Collection::SearchResults => SEARCH_RESULT_COLUMNS,
		Collection::Connections => CONNECTION_COLUMNS,
	}
}

fn field_expr(collection: Collection, field: Field) -> Result<&'static str> {
	let expr = match (collection, field) {
		(_, Field::Tags) => Some("array_to_string(tags, ' ')"),
		(_, Field::CreateDate) => Some("create_date"),
		(Collection::SearchResults, Field::Title) => Some("title"),
		(Collection::SearchResults, Field::Description) => Some("description"),
		(Collection::SearchResults, Field::FileName) => Some("coalesce(file_name, '')"),
		(Collection::SearchResults, Field::Type) => Some("type"),
		(Collection::SearchResults, Field::BodyRaw) => Some("body_raw"),
		(Collection::SearchResults, Field::BoardId) => Some("board_id::text"),
		(Collection::SearchResults, Field::FileMime) => Some("coalesce(file_mime, '')"),
		(Collection::SearchResults, Field::Owner) => Some("owner::text"),
		(Collection::Connections, Field::ProfileId) => Some("profile_id::text"),
		(Collection::Connections, Field::Birthday) => Some("birthday"),
		(Collection::Connections, Field::City) => Some("city"),
		(Collection::Connections, Field::Email1) => Some("email1"),
		(Collection::Connections, Field::FirstName) => Some("first_name"),
		(Collection::Connections, Field::LastName) => Some("last_name"),
		(Collection::Connections, Field::MetNotes) => Some("met_notes"),
		(Collection::Connections, Field::NickName) => Some("nick_name"),
		(Collection::Connections, Field::Notes) => Some("notes"),
		(Collection::Connections, Field::Phone1) => Some("phone1"),
		(Collection::Connections, Field::Relationship) => Some("relationship"),
		(Collection::Connections, Field::ScreenName) => Some("screen_name"),
		(Collection::Connections, Field::State) => Some("state"),
		(Collection::Connections, Field::Zip) => Some("zip"),
		_ => None,
	};

	expr.ok_or_else(|| {
		Error::InvalidArgument(format!(
			"Field {} is not indexed in {}.",
			field.as_str(),
			collection.index_name()
		))
	})
}

fn sort_column(collection: Collection, field: Field) -> Result<&'static str> {
	match (collection, field) {
		(_, Field::CreateDate) => Ok("create_date"),
		(Collection::SearchResults, Field::Title) => Ok("title"),
		(Collection::SearchResults, Field::Type) => Ok("type"),
		(Collection::SearchResults, Field::BoardId) => Ok("board_id"),
		_ => Err(Error::InvalidArgument(format!(
			"Field {} is not sortable in {}.",
			field.as_str(),
			collection.index_name()
		))),
	}
}

fn push_condition(qb: &mut SqlQuery, collection: Collection, clause: &Clause) -> Result<()> {
	let expr = field_expr(collection, clause.path())?;

	match clause {
		Clause::Text { path, query } => match path.kind() {
			FieldKind::FullText => match ts_query(query) {
				Some(terms) => {
					qb.push("to_tsvector('simple', ");
					qb.push(expr);
					qb.push(") @@ to_tsquery('simple', ");
					qb.push_bind(terms);
					qb.push(")");
				},
				None => {
					qb.push("FALSE");
				},
			},
			FieldKind::Keyword if *path == Field::BoardId => {
				// Compared as uuid so the board_id index applies; malformed ids match nothing.
				let ids = query
					.iter()
					.filter_map(|value| Uuid::parse_str(value.trim()).ok())
					.collect::<Vec<_>>();

				if ids.is_empty() {
					qb.push("FALSE");
				} else {
					qb.push("board_id = ANY(");
					qb.push_bind(ids);
					qb.push(")");
				}
			},
			FieldKind::Keyword => {
				let values = query
					.iter()
					.map(|value| value.trim().to_lowercase())
					.filter(|value| !value.is_empty())
					.collect::<Vec<_>>();

				if values.is_empty() {
					qb.push("FALSE");
				} else {
					qb.push("lower(");
					qb.push(expr);
					qb.push(") = ANY(");
					qb.push_bind(values);
					qb.push(")");
				}
			},
			FieldKind::Date => {
				return Err(Error::InvalidArgument(format!(
					"Field {} does not support text matching.",
					path.as_str()
				)));
			},
		},
		Clause::Regex { pattern, .. } => {
			qb.push(expr);
			qb.push(" ~ ");
			qb.push_bind(pattern.clone());
		},
		Clause::Range { gte, lte, .. } => {
			let mut bounded = false;

			if let Some(gte) = gte {
				qb.push(expr);
				qb.push(" >= ");
				qb.push_bind(*gte);

				bounded = true;
			}
			if let Some(lte) = lte {
				if bounded {
					qb.push(" AND ");
				}

				qb.push(expr);
				qb.push(" <= ");
				qb.push_bind(*lte);

				bounded = true;
			}
			if !bounded {
				qb.push("TRUE");
			}
		},
		Clause::Autocomplete { query, max_edits, .. } => {
			let query = autocomplete_query(query)?;

			if query.is_empty() {
				qb.push("FALSE");

				return Ok(());
			}

			qb.push("EXISTS (SELECT 1 FROM regexp_split_to_table(lower(");
			qb.push(expr);
			qb.push("), ");
			qb.push(TOKEN_SPLIT);
			qb.push(") AS tok(token) WHERE tok.token <> '' AND ");
			push_prefix_distance(qb, &query);
			qb.push(format!(" <= {max_edits})"));
		},
	}

	Ok(())
}

/// Score contributed by a matching `should` clause.
fn push_weight(qb: &mut SqlQuery, collection: Collection, clause: &Clause) -> Result<()> {
	let expr = field_expr(collection, clause.path())?;

	match clause {
		Clause::Text { path, query } if path.kind() == FieldKind::FullText => {
			match ts_query(query) {
				Some(terms) => {
					qb.push("ts_rank(to_tsvector('simple', ");
					qb.push(expr);
					qb.push("), to_tsquery('simple', ");
					qb.push_bind(terms);
					qb.push("))");
				},
				None => {
					qb.push("0");
				},
			}
		},
		// Closer prefixes rank higher: an exact prefix scores `max_edits + 1`.
		Clause::Autocomplete { query, max_edits, .. } => {
			let query = autocomplete_query(query)?;

			qb.push(format!("COALESCE((SELECT max({} - ", u32::from(*max_edits) + 1));
			push_prefix_distance(qb, &query);
			qb.push(") FROM regexp_split_to_table(lower(");
			qb.push(expr);
			qb.push("), ");
			qb.push(TOKEN_SPLIT);
			qb.push(") AS tok(token) WHERE tok.token <> ''), 0)");
		},
		_ => {
			qb.push("1");
		},
	}

	Ok(())
}

/// `levenshtein` rejects arguments longer than 255 characters.
fn autocomplete_query(query: &str) -> Result<String> {
	let query = query.trim().to_lowercase();

	if query.chars().count() > MAX_AUTOCOMPLETE_CHARS {
		return Err(Error::InvalidArgument(format!(
			"Autocomplete query must be at most {MAX_AUTOCOMPLETE_CHARS} characters."
		)));
	}

	Ok(query)
}

fn push_prefix_distance(qb: &mut SqlQuery, query: &str) {
	qb.push("levenshtein(left(tok.token, ");
	qb.push_bind(query.chars().count() as i32);
	qb.push("), ");
	qb.push_bind(query.to_string());
	qb.push(")");
}
