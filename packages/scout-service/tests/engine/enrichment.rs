use std::{sync::Arc, time::Duration};

use time::macros::datetime;
use uuid::Uuid;

use super::{CountingProfiles, thing};
use scout_domain::SearchHit;
use scout_service::{Error, ProfileEnricher};

fn hits(owners: &[i64]) -> Vec<SearchHit> {
	owners
		.iter()
		.map(|owner| {
			thing(Uuid::new_v4(), "NOTE", "roadmap", *owner, datetime!(2024-03-01 9:00 UTC))
		})
		.collect()
}

#[tokio::test]
async fn repeated_owners_are_fetched_once() {
	let profiles = Arc::new(CountingProfiles {
		delay: Some(Duration::from_millis(20)),
		..CountingProfiles::default()
	});
	let enricher = ProfileEnricher::new(profiles.clone(), 4);
	let rows = enricher
		.enrich_hits(hits(&[1, 2, 1, 2, 1, 2, 1, 2, 1, 2]))
		.await
		.expect("Enrichment failed.");

	assert_eq!(profiles.calls_for(1), 1);
	assert_eq!(profiles.calls_for(2), 1);
	assert_eq!(enricher.memo().len(), 2);
	assert_eq!(
		enricher.memo().get(2).map(|summary| summary.first_name),
		Some("First2".to_string())
	);

	for row in &rows {
		let owner = row.hit.owner_id().expect("Expected an owner.");

		assert_eq!(row.owner_info.as_ref().map(|info| info.id), Some(owner));
	}
}

#[tokio::test]
async fn lookups_respect_the_in_flight_bound() {
	let profiles = Arc::new(CountingProfiles {
		delay: Some(Duration::from_millis(20)),
		..CountingProfiles::default()
	});
	let enricher = ProfileEnricher::new(profiles.clone(), 2);

	enricher.enrich_hits(hits(&[1, 2, 3, 4, 5, 6, 7, 8])).await.expect("Enrichment failed.");

	assert_eq!(profiles.total_calls(), 8);
	assert!(profiles.max_in_flight() <= 2, "Too many lookups: {}", profiles.max_in_flight());
}

#[tokio::test]
async fn failed_lookup_fails_the_batch() {
	let profiles = Arc::new(CountingProfiles { missing: vec![3], ..CountingProfiles::default() });
	let enricher = ProfileEnricher::new(profiles, 4);
	let err = enricher.enrich_hits(hits(&[1, 3, 2])).await.expect_err("Expected a failure.");

	assert!(matches!(err, Error::Provider { .. }), "Unexpected error: {err:?}");
}

#[tokio::test]
async fn rows_without_owner_are_left_alone() {
	let profiles = Arc::new(CountingProfiles::default());
	let enricher = ProfileEnricher::new(profiles.clone(), 4);
	let rows = enricher.enrich_hits(hits(&[0, 5])).await.expect("Enrichment failed.");

	assert!(rows[0].owner_info.is_none());
	assert_eq!(rows[1].owner_info.as_ref().map(|info| info.id), Some(5));
	assert_eq!(profiles.total_calls(), 1);
	assert_eq!(profiles.calls_for(0), 0);
}
