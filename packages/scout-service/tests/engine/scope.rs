use uuid::Uuid;

use super::{CountingProfiles, FakeBoards, MemoryIndex, harness};
use scout_service::{Error, SearchFilter};

fn ids() -> [Uuid; 5] {
	[1_u128, 2, 3, 4, 5].map(Uuid::from_u128)
}

fn overlapping_boards() -> FakeBoards {
	let [a, b, c, d, e] = ids();

	FakeBoards {
		shared: vec![a, b],
		owned: vec![b, c],
		public: vec![c, d, a],
		followed: vec![e, a],
		..FakeBoards::default()
	}
}

fn all_boards() -> SearchFilter {
	SearchFilter {
		shared_boards: true,
		my_boards: true,
		public_boards: true,
		followed_boards: true,
		..SearchFilter::default()
	}
}

#[tokio::test]
async fn every_toggle_merges_in_fixed_order_without_duplicates() {
	let [a, b, c, d, e] = ids();
	let h = harness(overlapping_boards(), MemoryIndex::default(), CountingProfiles::default());
	let scope = h.service.resolve_scope(42, &all_boards()).await.expect("Failed to resolve scope.");

	assert_eq!(scope.board_ids, vec![a, b, c, d, e]);
	assert_eq!(scope.profiles, vec![42]);
	assert_eq!(h.boards.calls(), 4);
	assert_eq!(h.boards.lookups(), vec!["followed", "owned", "public", "shared"]);
}

#[tokio::test]
async fn only_enabled_toggles_are_looked_up() {
	let [a, b, c, d, _] = ids();
	let h = harness(overlapping_boards(), MemoryIndex::default(), CountingProfiles::default());
	let filter =
		SearchFilter { shared_boards: true, public_boards: true, ..SearchFilter::default() };
	let scope = h.service.resolve_scope(42, &filter).await.expect("Failed to resolve scope.");

	assert_eq!(scope.board_ids, vec![a, b, c, d]);
	assert_eq!(h.boards.calls(), 2);
	assert_eq!(h.boards.lookups(), vec!["public", "shared"]);
}

#[tokio::test]
async fn owned_and_followed_keep_owned_first() {
	let [a, b, c, _, e] = ids();
	let h = harness(overlapping_boards(), MemoryIndex::default(), CountingProfiles::default());
	let filter = SearchFilter { my_boards: true, followed_boards: true, ..SearchFilter::default() };
	let scope = h.service.resolve_scope(42, &filter).await.expect("Failed to resolve scope.");

	assert_eq!(scope.board_ids, vec![b, c, e, a]);
	assert_eq!(h.boards.lookups(), vec!["followed", "owned"]);
}

#[tokio::test]
async fn no_toggles_issue_no_lookups() {
	let h = harness(overlapping_boards(), MemoryIndex::default(), CountingProfiles::default());
	let scope = h
		.service
		.resolve_scope(42, &SearchFilter::default())
		.await
		.expect("Failed to resolve scope.");

	assert!(scope.board_ids.is_empty());
	assert_eq!(h.boards.calls(), 0);
}

#[tokio::test]
async fn failed_lookup_fails_the_scope() {
	let boards = FakeBoards { fail: true, ..overlapping_boards() };
	let h = harness(boards, MemoryIndex::default(), CountingProfiles::default());
	let Err(err) = h.service.resolve_scope(42, &all_boards()).await else {
		panic!("Expected a storage error.");
	};

	assert!(matches!(err, Error::Storage { .. }), "Unexpected error: {err:?}");
}

#[tokio::test]
async fn invalid_dates_fail_before_any_lookup() {
	let h = harness(overlapping_boards(), MemoryIndex::default(), CountingProfiles::default());
	let filter = SearchFilter { start_date: Some("yesterday".to_string()), ..all_boards() };
	let Err(err) = h.service.resolve_scope(42, &filter).await else {
		panic!("Expected a validation error.");
	};

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err:?}");
	assert_eq!(h.boards.calls(), 0);
}
