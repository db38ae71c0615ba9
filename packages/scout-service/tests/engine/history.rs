use super::{CountingProfiles, FakeBoards, MemoryIndex, harness};
use scout_service::Error;

fn service_harness() -> super::Harness {
	harness(FakeBoards::default(), MemoryIndex::default(), CountingProfiles::default())
}

#[tokio::test]
async fn blank_entries_are_rejected() {
	let h = service_harness();
	let err = h.service.add_to_search_history(42, "  ").await.expect_err("Expected a rejection.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err:?}");
}

#[tokio::test]
async fn history_keeps_the_most_recent_entries_first() {
	let h = service_harness();

	for i in 1..=7 {
		let ack = h
			.service
			.add_to_search_history(42, &format!("query {i}"))
			.await
			.expect("Failed to add history entry.");

		assert_eq!(ack.status, 1);
		assert_eq!(ack.message, "Added");
	}

	h.service.add_to_search_history(42, "query 5").await.expect("Failed to add history entry.");

	let response = h.service.fetch_search_history(42).await.expect("Failed to fetch history.");

	assert_eq!(response.message, "Search history fetched");
	assert_eq!(response.data.profile_id, "42");
	assert_eq!(
		response.data.history,
		vec!["query 5", "query 7", "query 6", "query 4", "query 3"]
	);
}

#[tokio::test]
async fn unknown_profile_has_no_history() {
	let h = service_harness();

	h.service.add_to_search_history(7, "roadmap").await.expect("Failed to add history entry.");

	let response = h.service.fetch_search_history(42).await.expect("Failed to fetch history.");

	assert!(response.data.history.is_empty());
	assert_eq!(response.status, 1);
	assert_eq!(response.message, "You have no search history");
}
