use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Projection of a board, post, note, task or file kept in the primary search index.
///
/// `board_id` equals `id` for boards and references the owning board for everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultDocument {
	#[serde(rename = "_id")]
	pub id: Uuid,
	#[serde(rename = "boardID")]
	pub board_id: Uuid,
	#[serde(rename = "type")]
	pub thing_type: String,
	pub visible: String,
	pub tags: Vec<String>,
	pub description: String,
	pub title: String,
	#[serde(rename = "body_raw")]
	pub body_raw: String,
	pub file_name: Option<String>,
	pub file_mime: Option<String>,
	pub owner: i64,
	#[serde(with = "crate::time_serde")]
	pub create_date: OffsetDateTime,
}

/// Projection of a contact entry. `profile_id` owns the entry, `connection_id` is the
/// profile the entry points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSearchDocument {
	#[serde(rename = "_id")]
	pub id: Uuid,
	#[serde(rename = "profileID")]
	pub profile_id: i64,
	#[serde(rename = "connectionID")]
	pub connection_id: i64,
	pub first_name: String,
	pub last_name: String,
	pub nick_name: String,
	pub screen_name: String,
	pub email1: String,
	pub phone1: String,
	pub city: String,
	pub state: String,
	pub zip: String,
	pub birthday: String,
	pub relationship: String,
	pub notes: String,
	pub met_notes: String,
	pub tags: Vec<String>,
	#[serde(with = "crate::time_serde")]
	pub create_date: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resultType", rename_all = "camelCase")]
pub enum SearchDocument {
	Thing(SearchResultDocument),
	Connection(ConnectionSearchDocument),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
	#[serde(flatten)]
	pub document: SearchDocument,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub score: Option<f32>,
}
impl SearchHit {
	pub fn thing(document: SearchResultDocument, score: Option<f32>) -> Self {
		Self { document: SearchDocument::Thing(document), score }
	}

	pub fn connection(document: ConnectionSearchDocument, score: Option<f32>) -> Self {
		Self { document: SearchDocument::Connection(document), score }
	}

	pub fn id(&self) -> Uuid {
		match &self.document {
			SearchDocument::Thing(doc) => doc.id,
			SearchDocument::Connection(doc) => doc.id,
		}
	}

	pub fn create_date(&self) -> OffsetDateTime {
		match &self.document {
			SearchDocument::Thing(doc) => doc.create_date,
			SearchDocument::Connection(doc) => doc.create_date,
		}
	}

	/// Profile whose summary is attached during enrichment. Non-positive ids are treated as
	/// missing.
	pub fn owner_id(&self) -> Option<i64> {
		let id = match &self.document {
			SearchDocument::Thing(doc) => doc.owner,
			SearchDocument::Connection(doc) => doc.connection_id,
		};

		(id > 0).then_some(id)
	}

	pub fn is_connection(&self) -> bool {
		matches!(self.document, SearchDocument::Connection(_))
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
	#[serde(default)]
	pub id: i64,
	#[serde(default)]
	pub first_name: String,
	#[serde(default)]
	pub last_name: String,
	#[serde(default)]
	pub photo: String,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub screen_name: String,
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub user_name: String,
}

/// A hit with the owner's profile summary attached. Lives for one response only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedResult {
	#[serde(flatten)]
	pub hit: SearchHit,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub owner_info: Option<ProfileSummary>,
}
impl From<SearchHit> for EnrichedResult {
	fn from(hit: SearchHit) -> Self {
		Self { hit, owner_info: None }
	}
}
