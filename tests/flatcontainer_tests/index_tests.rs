//! Tests for VersionIndex
//!
//! These tests verify:
//! - Add/read round trip in ascending canonical order
//! - Add always rewrites the document
//! - Removing the last version deletes the document
//! - Absent and malformed documents read as empty

#[path = "../common/mod.rs"]
mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use bytes::Bytes;
use flatcontainer::flatcontainer::{FeedContext, IndexDocument, VersionIndex};
use flatcontainer::{Config, PackageId, PackageVersion, Storage};

use common::{path, RecordingStore};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_context() -> (Arc<RecordingStore>, FeedContext) {
    let store = Arc::new(RecordingStore::new());
    let context = FeedContext::new(Config::default(), store.clone()).unwrap();
    (store, context)
}

fn id(s: &str) -> PackageId {
    PackageId::new(s).unwrap()
}

fn versions(list: &[&str]) -> BTreeSet<PackageVersion> {
    list.iter().map(|v| PackageVersion::parse(v).unwrap()).collect()
}

fn stored_document(store: &RecordingStore, key: &str) -> serde_json::Value {
    let bytes = store.read(&path(key)).unwrap().unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Round-trip Tests
// =============================================================================

#[test]
fn test_apply_add_then_read_round_trips() {
    let (store, context) = setup_context();
    let index = VersionIndex::new(&context);
    let set = versions(&["3.0.0", "1.0.0-alpha", "1.0.0", "2.5"]);

    let written = index.apply_add(&id("pkg"), set.clone()).unwrap();

    assert_eq!(written, set);
    assert_eq!(index.read(&id("pkg")).unwrap(), set);
    assert_eq!(
        stored_document(&store, "flatcontainer/pkg/index.json"),
        serde_json::json!({"versions": ["1.0.0-alpha", "1.0.0", "2.5.0", "3.0.0"]})
    );
}

#[test]
fn test_apply_add_unions_with_existing() {
    let (_store, context) = setup_context();
    let index = VersionIndex::new(&context);

    index.apply_add(&id("pkg"), versions(&["1.0.0", "2.0.0"])).unwrap();
    let result = index.apply_add(&id("pkg"), versions(&["2.0.0", "1.5.0"])).unwrap();

    assert_eq!(result, versions(&["1.0.0", "1.5.0", "2.0.0"]));
}

#[test]
fn test_apply_add_always_writes() {
    let (store, context) = setup_context();
    let index = VersionIndex::new(&context);

    index.apply_add(&id("pkg"), versions(&["1.0.0"])).unwrap();
    index.apply_add(&id("pkg"), versions(&["1.0.0"])).unwrap();
    index.apply_add(&id("pkg"), Vec::<PackageVersion>::new()).unwrap();

    assert_eq!(store.index_mutations(), 3);
}

#[test]
fn test_read_is_case_insensitive() {
    let (_store, context) = setup_context();
    let index = VersionIndex::new(&context);

    index.apply_add(&id("Foo.Bar"), versions(&["1.0.0"])).unwrap();

    assert_eq!(index.read(&id("FOO.BAR")).unwrap(), versions(&["1.0.0"]));
}

#[test]
fn test_canonical_strings_written_regardless_of_spelling() {
    let (store, context) = setup_context();
    let index = VersionIndex::new(&context);

    index.apply_add(&id("pkg"), versions(&["1.0", "2.0.0.0+build", "3.0.0.1"])).unwrap();

    assert_eq!(
        stored_document(&store, "flatcontainer/pkg/index.json")["versions"],
        serde_json::json!(["1.0.0", "2.0.0", "3.0.0.1"])
    );
}

// =============================================================================
// Remove Tests
// =============================================================================

#[test]
fn test_apply_remove_keeps_remaining_versions() {
    let (store, context) = setup_context();
    let index = VersionIndex::new(&context);
    index.apply_add(&id("pkg"), versions(&["1.0.0", "2.0.0"])).unwrap();

    let remaining = index.apply_remove(&id("pkg"), &versions(&["1.0.0"])).unwrap();

    assert_eq!(remaining, versions(&["2.0.0"]));
    assert!(store.exists(&path("flatcontainer/pkg/index.json")).unwrap());
}

#[test]
fn test_apply_remove_last_version_deletes_document() {
    let (store, context) = setup_context();
    let index = VersionIndex::new(&context);
    index.apply_add(&id("pkg"), versions(&["1.0.0"])).unwrap();

    let remaining = index.apply_remove(&id("pkg"), &versions(&["1.0"])).unwrap();

    assert!(remaining.is_empty());
    assert!(!store.exists(&path("flatcontainer/pkg/index.json")).unwrap());
}

#[test]
fn test_apply_remove_on_absent_document() {
    let (store, context) = setup_context();
    let index = VersionIndex::new(&context);

    let remaining = index.apply_remove(&id("ghost"), &versions(&["1.0.0"])).unwrap();

    assert!(remaining.is_empty());
    assert!(store.inner.is_empty());
}

#[test]
fn test_apply_remove_unknown_version_rewrites_same_set() {
    let (_store, context) = setup_context();
    let index = VersionIndex::new(&context);
    index.apply_add(&id("pkg"), versions(&["1.0.0"])).unwrap();

    let remaining = index.apply_remove(&id("pkg"), &versions(&["9.9.9"])).unwrap();

    assert_eq!(remaining, versions(&["1.0.0"]));
}

// =============================================================================
// Malformed Document Tests
// =============================================================================

#[test]
fn test_malformed_documents_read_as_empty() {
    let (store, context) = setup_context();
    let index = VersionIndex::new(&context);
    let key = path("flatcontainer/pkg/index.json");

    let bodies: [&[u8]; 5] = [b"not json", b"{}", b"{\"versions\": {}}", b"[]", b"null"];
    for body in bodies {
        store.write(&key, Bytes::copy_from_slice(body)).unwrap();
        assert!(index.read(&id("pkg")).unwrap().is_empty(), "body {:?}", body);
    }
}

#[test]
fn test_add_over_malformed_document_replaces_it() {
    let (store, context) = setup_context();
    let index = VersionIndex::new(&context);
    store
        .write(&path("flatcontainer/pkg/index.json"), Bytes::from_static(b"{\"versions\": 5}"))
        .unwrap();

    index.apply_add(&id("pkg"), versions(&["1.0.0"])).unwrap();

    assert_eq!(index.read(&id("pkg")).unwrap(), versions(&["1.0.0"]));
}

#[test]
fn test_unparsable_version_in_document_is_data_format_error() {
    let (store, context) = setup_context();
    let index = VersionIndex::new(&context);
    store
        .write(
            &path("flatcontainer/pkg/index.json"),
            Bytes::from_static(b"{\"versions\": [\"1.0.0\", \"one\"]}"),
        )
        .unwrap();

    let err = index.read(&id("pkg")).unwrap_err();

    assert!(err.is_data_format());
}

#[test]
fn test_index_document_serializes_versions_key() {
    let doc = IndexDocument::from_versions(&versions(&["1.0.0"]));

    let bytes = doc.to_bytes().unwrap();
    let parsed: IndexDocument = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(parsed, doc);
}
