//! End-to-end tests over the full stack: store, strategies, service.

use folio::prelude::*;
use folio::{EagerFetch, JoinedFetch, NaiveFetch};

/// Two authors, one with books and one without. The shape the whole
/// demonstration revolves around.
fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .seed("George Orwell", &["1984", "Animal Farm"])
        .unwrap();
    store.seed("Franz Kafka", &[]).unwrap();
    store
}

/// Canonical shape of a loaded result: (author id, sorted book ids).
fn shape(authors: &[Author]) -> Vec<(i64, Vec<i64>)> {
    let mut shaped: Vec<(i64, Vec<i64>)> = authors
        .iter()
        .map(|a| {
            let mut ids: Vec<i64> = a
                .books
                .try_get()
                .unwrap()
                .iter()
                .filter_map(|b| b.id)
                .collect();
            ids.sort_unstable();
            (a.id.unwrap(), ids)
        })
        .collect();
    shaped.sort();
    shaped
}

#[test]
fn all_strategies_load_equivalent_content() {
    let expected = vec![(1, vec![1, 2]), (2, vec![])];

    for strategy in [
        &NaiveFetch as &dyn FetchStrategy,
        &EagerFetch,
        &JoinedFetch,
    ] {
        let store = seeded_store();
        let authors = strategy.load(&store).unwrap();
        assert_eq!(shape(&authors), expected, "strategy {}", strategy.name());
    }
}

#[test]
fn fetch_costs_diverge_with_author_count() {
    let store = MemoryStore::new();
    for i in 0..5 {
        store.seed(&format!("Author {}", i), &["Book"]).unwrap();
    }

    let mut service = LoaderService::new(store);
    service.list_authors_with_books(None).unwrap();

    // 5 authors: 1 + 5 for naive, constant for the others.
    assert_eq!(service.tracker().fetches_for("naive"), 6);
    assert_eq!(service.tracker().fetches_for("eager"), 2);
    assert_eq!(service.tracker().fetches_for("joined"), 1);

    let stats = service.tracker().stats();
    assert_eq!(stats.runs, 3);
    assert_eq!(stats.flagged, 1);
    assert_eq!(stats.total_fetches, 9);
}

#[test]
fn service_returns_the_joined_result_fully_loaded() {
    let mut service = LoaderService::new(seeded_store());
    let authors = service.list_authors_with_books(None).unwrap();

    assert_eq!(service.phase(), Phase::Done);
    assert_eq!(authors.len(), 2);
    assert_eq!(authors[0].name, "George Orwell");
    assert_eq!(authors[1].name, "Franz Kafka");

    // Zero-book author comes back loaded-empty, never a placeholder.
    assert!(authors[1].books.is_loaded());
    assert!(authors[1].books.try_get().unwrap().is_empty());
}

#[test]
fn author_id_parameter_does_not_narrow_the_result() {
    let mut service = LoaderService::new(seeded_store());
    let authors = service.list_authors_with_books(Some(2)).unwrap();

    // The id is accepted and ignored; the whole catalog comes back.
    assert_eq!(authors.len(), 2);
}

#[test]
fn unloaded_relationship_read_is_an_error_not_a_fetch() {
    let store = seeded_store();
    let authors = store.authors_basic().unwrap();
    let before = store.fetches();

    let err = authors[0].books.try_get().unwrap_err();
    assert!(err.is_not_loaded());
    assert!(err.to_string().contains("books"));
    // The failed read issued no I/O.
    assert_eq!(store.fetches(), before);
}

#[test]
fn store_failure_aborts_the_comparison() {
    let store = seeded_store();
    store.set_unavailable(true);

    let mut service = LoaderService::new(store);
    let err = service.list_authors_with_books(None).unwrap_err();

    assert!(err.is_unavailable());
    assert_eq!(service.phase(), Phase::Naive);
    assert!(service.tracker().runs().is_empty());
}

#[test]
fn failure_midway_leaves_earlier_runs_recorded() {
    let mut service = LoaderService::new(seeded_store());
    service.run_strategy(&NaiveFetch).unwrap();

    service.store().set_unavailable(true);
    assert!(
        service
            .run_strategy(&EagerFetch)
            .unwrap_err()
            .is_unavailable()
    );

    // The naive run is still on the books; the failed one is not.
    assert_eq!(service.tracker().runs().len(), 1);
    assert_eq!(service.tracker().runs()[0].strategy, "naive");
}

#[test]
fn constraint_violations_surface_with_context() {
    let store = MemoryStore::new();
    let err = store
        .insert_book(Book::new("Orphan Book", 99))
        .unwrap_err();

    match err {
        Error::Constraint(c) => {
            assert_eq!(c.table, "books");
            assert_eq!(c.column, "author_id");
        }
        other => panic!("expected a constraint violation, got {other}"),
    }
}

#[test]
fn loaded_authors_serialize_with_nested_books() {
    let mut service = LoaderService::new(seeded_store());
    let authors = service.list_authors_with_books(None).unwrap();

    let json = serde_json::to_value(&authors).unwrap();
    assert_eq!(json[0]["name"], "George Orwell");
    assert_eq!(json[0]["books"][0]["name"], "1984");
    assert_eq!(json[1]["books"], serde_json::json!([]));

    // An unloaded relationship serializes as null, not as an empty list.
    let basic = service.store().authors_basic().unwrap();
    let json = serde_json::to_value(&basic).unwrap();
    assert_eq!(json[0]["books"], serde_json::Value::Null);
}
