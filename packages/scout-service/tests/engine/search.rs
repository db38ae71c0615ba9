use std::{collections::BTreeMap, time::Duration};

use time::macros::datetime;
use uuid::Uuid;

use super::{
	CountingProfiles, FakeBoards, MemoryIndex, contact, harness, harness_with_config, test_config,
	thing, things_harness,
};
use scout_domain::{Field, SearchDocument};
use scout_service::{Error, FullTextSearchRequest, SearchFilter};

fn request(query: &str, filter: Option<SearchFilter>) -> FullTextSearchRequest {
	FullTextSearchRequest {
		profile_id: 42,
		filter,
		query: query.to_string(),
		page: 1,
		limit: 10,
		sort_by: None,
		order_by: None,
	}
}

fn my_boards() -> SearchFilter {
	SearchFilter { my_boards: true, ..SearchFilter::default() }
}

#[tokio::test]
async fn owned_boards_scope_returns_matching_roadmaps() {
	let owned = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
	let other = Uuid::new_v4();
	let things = vec![
		thing(owned[0], "NOTE", "Q3 roadmap", 42, datetime!(2024-03-01 9:00 UTC)),
		thing(owned[1], "TASK", "Roadmap review", 42, datetime!(2024-03-02 9:00 UTC)),
		thing(owned[2], "POST", "roadmap draft", 42, datetime!(2024-03-03 9:00 UTC)),
		thing(other, "NOTE", "Garden plans", 7, datetime!(2024-03-04 9:00 UTC)),
	];
	let h = harness(
		FakeBoards::owning(owned.clone()),
		MemoryIndex::with_things(things),
		CountingProfiles::default(),
	);
	let response = h
		.service
		.full_text_search(request("roadmap", Some(my_boards())))
		.await
		.expect("Search failed.");

	assert_eq!(response.total, 3);
	assert_eq!(response.data.len(), 3);
	assert_eq!(response.status, 1);
	assert_eq!(response.message, "Search results fetched successfully");
	assert_eq!(h.boards.calls(), 1);
	assert_eq!(h.index.connection_calls(), 0);

	for row in &response.data {
		let SearchDocument::Thing(doc) = &row.hit.document else {
			panic!("Expected only things, got {row:?}.");
		};

		assert!(owned.contains(&doc.board_id));
		assert_eq!(row.owner_info.as_ref().map(|info| info.id), Some(42));
	}

	assert_eq!(h.profiles.calls_for(42), 1);

	let queries = h.index.queries();

	assert!(queries[0].has_should(Field::BoardId));
	assert!(queries[0].has_must(Field::CreateDate));
}

#[tokio::test]
async fn missing_filter_skips_scope_and_connections() {
	let things = vec![thing(Uuid::new_v4(), "NOTE", "roadmap", 42, datetime!(2024-03-01 9:00 UTC))];
	let h = harness(
		FakeBoards::owning(vec![Uuid::new_v4()]),
		MemoryIndex::with_things(things),
		CountingProfiles::default(),
	);
	let response =
		h.service.full_text_search(request("roadmap", None)).await.expect("Search failed.");

	assert_eq!(response.total, 1);
	assert_eq!(h.boards.calls(), 0);
	assert_eq!(h.index.connection_calls(), 0);
	assert!(h.index.queries()[0].must.is_empty());
	assert!(response.data[0].hit.score.is_some());
}

#[tokio::test]
async fn inverted_dates_fail_before_any_lookup() {
	let h = harness(FakeBoards::default(), MemoryIndex::default(), CountingProfiles::default());
	let filter = SearchFilter {
		my_boards: true,
		start_date: Some("2024-03-10".to_string()),
		end_date: Some("2024-03-01".to_string()),
		..SearchFilter::default()
	};
	let err = h
		.service
		.full_text_search(request("roadmap", Some(filter)))
		.await
		.expect_err("Expected invalid date range.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err:?}");
	assert_eq!(h.boards.calls(), 0);
	assert_eq!(h.index.thing_calls(), 0);
}

#[tokio::test]
async fn unknown_sort_field_is_rejected() {
	let h = harness(FakeBoards::default(), MemoryIndex::default(), CountingProfiles::default());
	let mut req = request("roadmap", None);

	req.sort_by = Some("owner".to_string());

	let err = h.service.full_text_search(req).await.expect_err("Expected invalid sort.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err:?}");
	assert_eq!(h.index.thing_calls(), 0);
}

#[tokio::test]
async fn invalid_paging_is_rejected() {
	let h = harness(FakeBoards::default(), MemoryIndex::default(), CountingProfiles::default());

	for (page, limit) in [(0, 10), (1, 0)] {
		let mut req = request("roadmap", None);

		req.page = page;
		req.limit = limit;

		let err = h.service.full_text_search(req).await.expect_err("Expected invalid paging.");

		assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err:?}");
	}

	let mut req = request("roadmap", None);

	req.profile_id = 0;

	assert!(matches!(
		h.service.full_text_search(req).await,
		Err(Error::InvalidRequest { .. })
	));
}

#[tokio::test]
async fn connections_merge_by_creation_date() {
	let board = Uuid::new_v4();
	let index = MemoryIndex {
		things: vec![
			thing(board, "NOTE", "Ada notes", 42, datetime!(2024-03-01 9:00 UTC)),
			thing(board, "TASK", "Call Ada", 42, datetime!(2024-03-03 9:00 UTC)),
		],
		connections: vec![
			contact(42, 77, "Ada", datetime!(2024-03-02 9:00 UTC)),
			contact(7, 78, "Ada", datetime!(2024-02-01 9:00 UTC)),
		],
		..MemoryIndex::default()
	};
	let h = harness(FakeBoards::default(), index, CountingProfiles::default());
	let filter = SearchFilter { connections: true, ..SearchFilter::default() };
	let mut req = request("ada", Some(filter));

	req.sort_by = Some("createDate".to_string());
	req.order_by = Some("asc".to_string());

	let response = h.service.full_text_search(req).await.expect("Search failed.");
	let dates = response.data.iter().map(|row| row.hit.create_date()).collect::<Vec<_>>();

	assert_eq!(response.total, 3);
	assert_eq!(
		dates,
		vec![
			datetime!(2024-03-01 9:00 UTC),
			datetime!(2024-03-02 9:00 UTC),
			datetime!(2024-03-03 9:00 UTC),
		]
	);
	assert!(response.data[1].hit.is_connection());
	assert_eq!(response.data[1].owner_info.as_ref().map(|info| info.id), Some(77));
	assert!(
		response
			.data
			.iter()
			.filter(|row| !row.hit.is_connection())
			.all(|row| row.hit.score.is_none())
	);
	assert_eq!(h.index.connection_calls(), 1);
	assert_eq!(h.profiles.calls_for(78), 0);
}

#[tokio::test]
async fn pages_are_cut_from_the_sorted_result() {
	let board = Uuid::new_v4();
	let things = ["e", "c", "a", "d", "b"]
		.into_iter()
		.map(|suffix| {
			thing(board, "NOTE", &format!("roadmap {suffix}"), 42, datetime!(2024-03-01 9:00 UTC))
		})
		.collect();
	let h = things_harness(things);
	let mut req = request("roadmap", None);

	req.page = 2;
	req.limit = 2;
	req.sort_by = Some("title".to_string());
	req.order_by = Some("asc".to_string());

	let response = h.service.full_text_search(req).await.expect("Search failed.");
	let titles = response
		.data
		.iter()
		.map(|row| match &row.hit.document {
			SearchDocument::Thing(doc) => doc.title.clone(),
			SearchDocument::Connection(doc) => doc.first_name.clone(),
		})
		.collect::<Vec<_>>();

	assert_eq!(response.total, 5);
	assert_eq!(titles, vec!["roadmap c".to_string(), "roadmap d".to_string()]);
	assert_eq!(h.profiles.total_calls(), 1);
}

#[tokio::test]
async fn empty_result_reports_no_results() {
	let h = harness(FakeBoards::default(), MemoryIndex::default(), CountingProfiles::default());
	let response = h
		.service
		.full_text_search(request("roadmap", Some(my_boards())))
		.await
		.expect("Search failed.");

	assert_eq!(response.total, 0);
	assert!(response.data.is_empty());
	assert_eq!(response.status, 1);
	assert_eq!(response.message, "No search results found");
}

#[tokio::test]
async fn things_filter_restricts_types() {
	let board = Uuid::new_v4();
	let things = vec![
		thing(board, "NOTE", "roadmap", 42, datetime!(2024-03-01 9:00 UTC)),
		thing(board, "TASK", "roadmap", 42, datetime!(2024-03-01 9:00 UTC)),
	];
	let h = things_harness(things);
	let filter = SearchFilter {
		things: BTreeMap::from([("task".to_string(), true), ("note".to_string(), false)]),
		..SearchFilter::default()
	};
	let response = h
		.service
		.full_text_search(request("roadmap", Some(filter)))
		.await
		.expect("Search failed.");

	assert_eq!(response.total, 1);

	let SearchDocument::Thing(doc) = &response.data[0].hit.document else {
		panic!("Expected a thing.");
	};

	assert_eq!(doc.thing_type, "TASK");
}

#[tokio::test]
async fn slow_index_hits_the_pipeline_deadline() {
	let mut cfg = test_config();

	cfg.search.pipeline_timeout_ms = 50;
	cfg.search.query_max_time_ms = 10;

	let index = MemoryIndex {
		things: vec![thing(Uuid::new_v4(), "NOTE", "roadmap", 42, datetime!(2024-03-01 9:00 UTC))],
		delay: Some(Duration::from_millis(200)),
		..MemoryIndex::default()
	};
	let h = harness_with_config(cfg, FakeBoards::default(), index, CountingProfiles::default());
	let err = h
		.service
		.full_text_search(request("roadmap", None))
		.await
		.expect_err("Expected a timeout.");

	assert!(matches!(err, Error::Timeout { .. }), "Unexpected error: {err:?}");
	assert_eq!(h.profiles.total_calls(), 0);
}

#[tokio::test]
async fn board_lookup_failure_fails_the_search() {
	let boards = FakeBoards { fail: true, ..FakeBoards::default() };
	let h = harness(boards, MemoryIndex::default(), CountingProfiles::default());
	let err = h
		.service
		.full_text_search(request("roadmap", Some(my_boards())))
		.await
		.expect_err("Expected a storage error.");

	assert!(matches!(err, Error::Storage { .. }), "Unexpected error: {err:?}");
	assert_eq!(h.index.thing_calls(), 0);
}
