use time::macros::datetime;
use uuid::Uuid;

use super::{CountingProfiles, FakeBoards, MemoryIndex, harness, tagged, thing, things_harness};
use scout_domain::{MAX_AUTOCOMPLETE_CHARS, SearchDocument, SearchHit};
use scout_service::{AutocompleteRequest, Error};

fn titled(title: &str) -> SearchHit {
	thing(Uuid::new_v4(), "NOTE", title, 5, datetime!(2024-03-01 9:00 UTC))
}

fn title_of(hit: &SearchHit) -> String {
	match &hit.document {
		SearchDocument::Thing(doc) => doc.title.clone(),
		SearchDocument::Connection(doc) => doc.first_name.clone(),
	}
}

fn request(query: &str) -> AutocompleteRequest {
	AutocompleteRequest { profile_id: 42, query: query.to_string() }
}

#[tokio::test]
async fn fuzzy_prefixes_rank_exact_prefixes_first() {
	let things = ["toxic", "task", "zebra", "tag", "tabular"].into_iter().map(titled).collect();
	let h = things_harness(things);
	let response = h.service.autocomplete(request("ta")).await.expect("Autocomplete failed.");
	let titles = response.data.iter().map(|row| title_of(&row.hit)).collect::<Vec<_>>();

	assert_eq!(response.status, 1);
	assert_eq!(response.message, "Autocomplete results found.");
	assert_eq!(titles.len(), 4);
	assert_eq!(titles.last().map(String::as_str), Some("toxic"));
	assert!(!titles.iter().any(|title| title == "zebra"));
	assert!(response.data.iter().all(|row| row.owner_info.is_some()));
	assert_eq!(h.profiles.calls_for(5), 1);
	assert_eq!(h.boards.calls(), 0);
}

#[tokio::test]
async fn tags_are_suggested_too() {
	let things = vec![tagged(titled("Untitled"), &["taxes", "2024"]), titled("Garden")];
	let h = things_harness(things);
	let response = h.service.autocomplete(request("tax")).await.expect("Autocomplete failed.");

	assert_eq!(response.data.len(), 1);
	assert_eq!(title_of(&response.data[0].hit), "Untitled");
}

#[tokio::test]
async fn suggestions_are_capped_by_the_configured_limit() {
	let things = (0..12).map(|i| titled(&format!("tango {i}"))).collect();
	let h = things_harness(things);
	let response = h.service.autocomplete(request("tan")).await.expect("Autocomplete failed.");

	assert_eq!(response.data.len(), 10);
	assert_eq!(h.index.queries()[0].limit, Some(10));
}

#[tokio::test]
async fn blank_query_returns_nothing_without_searching() {
	let h = harness(
		FakeBoards::default(),
		MemoryIndex::with_things(vec![titled("task")]),
		CountingProfiles::default(),
	);
	let response = h.service.autocomplete(request("   ")).await.expect("Autocomplete failed.");

	assert!(response.data.is_empty());
	assert_eq!(response.status, 1);
	assert_eq!(h.index.thing_calls(), 0);
}

#[tokio::test]
async fn overlong_queries_are_rejected_before_the_index() {
	let h = things_harness(vec![titled("tango")]);
	let query = format!("  {}  ", "t".repeat(MAX_AUTOCOMPLETE_CHARS + 1));
	let Err(err) = h.service.autocomplete(request(&query)).await else {
		panic!("Expected a validation error.");
	};

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err:?}");
	assert_eq!(h.index.thing_calls(), 0);
	assert_eq!(h.profiles.total_calls(), 0);
}

#[tokio::test]
async fn queries_at_the_length_limit_are_served() {
	let h = things_harness(vec![titled("tango")]);
	let query = format!("  {}  ", "t".repeat(MAX_AUTOCOMPLETE_CHARS));
	let response = h.service.autocomplete(request(&query)).await.expect("Autocomplete failed.");

	assert_eq!(response.status, 1);
	assert_eq!(h.index.thing_calls(), 1);
}
