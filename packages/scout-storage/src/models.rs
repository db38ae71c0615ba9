use time::OffsetDateTime;
use uuid::Uuid;

use scout_domain::{ConnectionSearchDocument, SearchHit, SearchResultDocument};

#[derive(Debug, sqlx::FromRow)]
pub struct SearchResultRow {
	pub id: Uuid,
	pub board_id: Uuid,
	#[sqlx(rename = "type")]
	pub r#type: String,
	pub visible: String,
	pub tags: Vec<String>,
	pub description: String,
	pub title: String,
	pub body_raw: String,
	pub file_name: Option<String>,
	pub file_mime: Option<String>,
	pub owner: i64,
	pub create_date: OffsetDateTime,
	pub score: f32,
}
impl SearchResultRow {
	pub fn into_hit(self, include_score: bool) -> SearchHit {
		let score = include_score.then_some(self.score);

		SearchHit::thing(
			SearchResultDocument {
				id: self.id,
				board_id: self.board_id,
				thing_type: self.r#type,
				visible: self.visible,
				tags: self.tags,
				description: self.description,
				title: self.title,
				body_raw: self.body_raw,
				file_name: self.file_name,
				file_mime: self.file_mime,
				owner: self.owner,
				create_date: self.create_date,
			},
			score,
		)
	}
}

#[derive(Debug, sqlx::FromRow)]
pub struct ConnectionRow {
	pub id: Uuid,
	pub profile_id: i64,
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
	pub create_date: OffsetDateTime,
	pub score: f32,
}
impl ConnectionRow {
	pub fn into_hit(self, include_score: bool) -> SearchHit {
		let score = include_score.then_some(self.score);

		SearchHit::connection(
			ConnectionSearchDocument {
				id: self.id,
				profile_id: self.profile_id,
				connection_id: self.connection_id,
				first_name: self.first_name,
				last_name: self.last_name,
				nick_name: self.nick_name,
				screen_name: self.screen_name,
				email1: self.email1,
				phone1: self.phone1,
				city: self.city,
				state: self.state,
				zip: self.zip,
				birthday: self.birthday,
				relationship: self.relationship,
				notes: self.notes,
				met_notes: self.met_notes,
				tags: self.tags,
				create_date: self.create_date,
			},
			score,
		)
	}
}

#[derive(Debug, sqlx::FromRow)]
pub struct SearchHistoryRow {
	pub profile_id: i64,
	pub history: Vec<String>,
	pub updated_at: OffsetDateTime,
}
