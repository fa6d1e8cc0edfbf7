use std::collections::HashSet;

use catalog_core::{EntityQuery, EntityStore, NewEntity, SortKey, SqliteStore};
use uuid::Uuid;

fn store() -> SqliteStore {
    SqliteStore::open_in_memory().expect("open_in_memory should succeed")
}

fn add(store: &SqliteStore, name: &str, description: Option<&str>) -> catalog_core::Entity {
    let new = NewEntity::new(name, description.map(|d| d.to_string()))
        .expect("fields should be valid");
    store.add(&new).expect("add should succeed")
}

#[test]
fn test_add_then_get_round_trip() {
    let store = store();
    let added = add(&store, "Apple", Some("a sweet fruit"));

    assert_eq!(added.created_at(), added.updated_at());

    let fetched = store
        .get(&added.id())
        .expect("get should succeed")
        .expect("entity should exist");
    assert_eq!(fetched, added);
    assert_eq!(fetched.name(), "Apple");
    assert_eq!(fetched.description(), Some("a sweet fruit"));
}

#[test]
fn test_get_missing_is_absent() {
    let store = store();
    let result = store.get(&Uuid::new_v4()).expect("get should succeed");
    assert!(result.is_none());
}

#[test]
fn test_update_refreshes_updated_at() {
    let store = store();
    let mut entity = add(&store, "Original", Some("before"));
    let created_at = entity.created_at();

    entity.set_name("Updated").expect("name should be valid");
    entity
        .set_description(Some("after".to_string()))
        .expect("description should be valid");
    let updated = store.update(&mut entity).expect("update should succeed");
    assert!(updated);
    assert!(entity.updated_at() > created_at);

    let fetched = store
        .get(&entity.id())
        .expect("get should succeed")
        .expect("entity should exist");
    assert_eq!(fetched.name(), "Updated");
    assert_eq!(fetched.description(), Some("after"));
    assert_eq!(fetched.created_at(), created_at);
    assert_eq!(fetched.updated_at(), entity.updated_at());
}

#[test]
fn test_update_missing_row_returns_false() {
    let store = store();
    let mut entity = add(&store, "Ephemeral", None);
    store.delete(&entity.id()).expect("delete should succeed");

    let updated = store.update(&mut entity).expect("update should succeed");
    assert!(!updated);
}

#[test]
fn test_delete_then_get_is_absent() {
    let store = store();
    let entity = add(&store, "Doomed", Some("delete me"));

    store.delete(&entity.id()).expect("delete should succeed");
    assert!(store.get(&entity.id()).expect("get should succeed").is_none());

    // Deleting an id that never existed is a no-op.
    store.delete(&Uuid::new_v4()).expect("delete should succeed");
}

#[test]
fn test_get_all_orders_by_name_case_insensitively() {
    let store = store();
    add(&store, "banana", None);
    add(&store, "Cherry", None);
    add(&store, "APPLE", None);

    let all = store.get_all().expect("get_all should succeed");
    let names: Vec<&str> = all.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["APPLE", "banana", "Cherry"]);
}

#[test]
fn test_search_term_matches_name_and_description() {
    let store = store();
    add(&store, "Apple", Some("a sweet fruit"));
    add(&store, "Sweetroll", None);
    add(&store, "Cabbage", Some("savory"));

    let query = EntityQuery::new().term("sweet");
    let results = store.search(&query, 0, 10).expect("search should succeed");
    let names: Vec<&str> = results.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["Apple", "Sweetroll"]);
}

#[test]
fn test_search_is_case_insensitive() {
    let store = store();
    add(&store, "Apple", Some("sweet"));

    let query = EntityQuery::new().term("SWEET");
    assert_eq!(store.get_count(&query).expect("count should succeed"), 1);
}

#[test]
fn test_blank_search_term_matches_everything() {
    let store = store();
    add(&store, "Apple", None);
    add(&store, "Banana", None);

    let query = EntityQuery::new().term("   ");
    assert_eq!(store.get_count(&query).expect("count should succeed"), 2);
    assert_eq!(
        store.search(&query, 0, 10).expect("search should succeed").len(),
        2
    );
}

#[test]
fn test_search_treats_like_wildcards_literally() {
    let store = store();
    add(&store, "Juice", Some("100% pure"));
    add(&store, "Cider", Some("100 pure"));
    add(&store, "abc", None);

    let percent = EntityQuery::new().term("100%");
    let results = store.search(&percent, 0, 10).expect("search should succeed");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name(), "Juice");

    let underscore = EntityQuery::new().term("a_c");
    assert_eq!(store.get_count(&underscore).expect("count should succeed"), 0);
}

#[test]
fn test_sweet_example_ordering_and_count() {
    let store = store();
    add(&store, "Banana", Some("quite sweet"));
    add(&store, "Apple Pie", Some("very sweet"));
    add(&store, "Apple", Some("sweet"));
    add(&store, "Onion", Some("pungent"));

    let query = EntityQuery::new().term("sweet").sort(SortKey::Name);
    let results = store.search(&query, 0, 10).expect("search should succeed");
    let names: Vec<&str> = results.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["Apple", "Apple Pie", "Banana"]);
    assert_eq!(store.get_count(&query).expect("count should succeed"), 3);
}

#[test]
fn test_letters_only_filter() {
    let store = store();
    add(&store, "Apple", None);
    add(&store, "Apple Pie", None);
    add(&store, "R2D2 Unit", None);
    add(&store, "notes!!!", None);

    let query = EntityQuery::new().letters_only();
    let results = store.search(&query, 0, 10).expect("search should succeed");
    let names: Vec<&str> = results.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["Apple"]);
    assert_eq!(store.get_count(&query).expect("count should succeed"), 1);
}

#[test]
fn test_date_range_bounds_are_inclusive() {
    let store = store();
    let first = add(&store, "First", None);
    let second = add(&store, "Second", None);
    let third = add(&store, "Third", None);

    let since = EntityQuery::new().since(second.created_at()).sort(SortKey::CreatedAt);
    let names: Vec<String> = store
        .search(&since, 0, 10)
        .expect("search should succeed")
        .iter()
        .map(|e| e.name().to_string())
        .collect();
    assert_eq!(names, vec!["Second", "Third"]);

    let until = EntityQuery::new().until(second.created_at()).sort(SortKey::CreatedAt);
    let names: Vec<String> = store
        .search(&until, 0, 10)
        .expect("search should succeed")
        .iter()
        .map(|e| e.name().to_string())
        .collect();
    assert_eq!(names, vec!["First", "Second"]);

    let window = EntityQuery::new()
        .since(second.created_at())
        .until(second.created_at());
    assert_eq!(store.get_count(&window).expect("count should succeed"), 1);

    let all = EntityQuery::new()
        .since(first.created_at())
        .until(third.created_at());
    assert_eq!(store.get_count(&all).expect("count should succeed"), 3);
}

#[test]
fn test_conditions_combine_conjunctively() {
    let store = store();
    add(&store, "Apple", Some("sweet"));
    add(&store, "Apple Pie", Some("sweet"));
    add(&store, "Banana", Some("savory"));

    let query = EntityQuery::new().term("sweet").letters_only();
    let results = store.search(&query, 0, 10).expect("search should succeed");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name(), "Apple");
}

#[test]
fn test_sort_by_created_at_both_directions() {
    let store = store();
    add(&store, "Oldest", None);
    add(&store, "Middle", None);
    add(&store, "Newest", None);

    let asc = EntityQuery::new().sort(SortKey::CreatedAt);
    let results = store.search(&asc, 0, 10).expect("search should succeed");
    let names: Vec<&str> = results.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["Oldest", "Middle", "Newest"]);

    let desc = EntityQuery::new().sort(SortKey::CreatedAt).descending();
    let results = store.search(&desc, 0, 10).expect("search should succeed");
    let names: Vec<&str> = results.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["Newest", "Middle", "Oldest"]);
}

#[test]
fn test_count_equals_unpaginated_search_length() {
    let store = store();
    for i in 0..12 {
        let desc = if i % 2 == 0 { Some("even") } else { Some("odd") };
        add(&store, &format!("Entity{:02}", i), desc);
    }

    for query in [
        EntityQuery::new(),
        EntityQuery::new().term("even"),
        EntityQuery::new().term("odd"),
        EntityQuery::new().term("nothing matches this"),
    ] {
        let count = store.get_count(&query).expect("count should succeed");
        let all = store
            .search(&query, 0, usize::MAX / 2)
            .expect("search should succeed");
        assert_eq!(count, all.len());
    }
}

#[test]
fn test_pagination_partitions_the_result_set() {
    let store = store();
    for i in 0..7 {
        add(&store, &format!("Entity{:02}", i), None);
    }

    let query = EntityQuery::new();
    let count = store.get_count(&query).expect("count should succeed");
    assert_eq!(count, 7);

    let page_size = 3;
    let pages = count.div_ceil(page_size);
    assert_eq!(pages, 3);

    let mut collected = Vec::new();
    for page in 0..pages {
        let chunk = store
            .search(&query, page, page_size)
            .expect("search should succeed");
        assert!(chunk.len() <= page_size);
        if page < pages - 1 {
            assert_eq!(chunk.len(), page_size);
        }
        collected.extend(chunk);
    }

    // Last page holds the remainder, and the page past the end is empty.
    assert_eq!(collected.len(), count);
    let beyond = store
        .search(&query, pages, page_size)
        .expect("search should succeed");
    assert!(beyond.is_empty());

    let ids: HashSet<Uuid> = collected.iter().map(|e| e.id()).collect();
    assert_eq!(ids.len(), count);

    let full = store
        .search(&query, 0, count)
        .expect("search should succeed");
    assert_eq!(collected, full);
}

#[test]
fn test_name_boundaries_through_the_store() {
    let store = store();
    assert!(NewEntity::new("ab", None).is_err());
    add(&store, "abc", None);
    add(&store, &"x".repeat(50), None);
    assert!(NewEntity::new("x".repeat(51), None).is_err());

    assert_eq!(
        store.get_count(&EntityQuery::new()).expect("count should succeed"),
        2
    );
}

#[test]
fn test_description_boundary_through_the_store() {
    let store = store();
    let entity = add(&store, "Verbose", Some(&"x".repeat(255)));
    let fetched = store
        .get(&entity.id())
        .expect("get should succeed")
        .expect("entity should exist");
    assert_eq!(fetched.description().map(str::len), Some(255));

    assert!(NewEntity::new("Verbose", Some("x".repeat(256))).is_err());
}

#[test]
fn test_on_disk_store_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = dir.path().join("catalog.db");

    let id = {
        let store = SqliteStore::open(&path).expect("open should succeed");
        add(&store, "Durable", Some("survives reopen")).id()
    };

    // Reopening runs the idempotent schema creation against existing data.
    let store = SqliteStore::open(&path).expect("reopen should succeed");
    let fetched = store
        .get(&id)
        .expect("get should succeed")
        .expect("entity should exist");
    assert_eq!(fetched.name(), "Durable");
}
