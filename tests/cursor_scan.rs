//! Cursor Scan Tests
//!
//! End-to-end behavior of a record cursor over a scripted store:
//! - Projection mode is a list-wide decision
//! - Paging stops at the first empty page
//! - Unknown keys are dropped, metadata columns always filled
//! - Coercion rules for booleans and collections
//! - Null detection and exhaustion

use searchtable::catalog::{ColumnDescriptor, ColumnSet, OutputType, PartitionDescriptor};
use searchtable::client::{
    MemorySearchClient, ProjectionMode, RawHit, RecordedRequest, SearchPage, StoreError,
};
use searchtable::config::ConnectionConfig;
use searchtable::cursor::{CursorError, CursorState, RecordCursor, SearchRecordCursor};
use searchtable::scan::{drain, RequestBuilder};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn config() -> ConnectionConfig {
    ConnectionConfig::new("file:///tables.json", "localhost", 9200, "search")
}

fn partition() -> PartitionDescriptor {
    PartitionDescriptor::whole_index("people")
}

fn people_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::scalar("_id", OutputType::Varchar),
        ColumnDescriptor::scalar("_index", OutputType::Varchar),
        ColumnDescriptor::scalar("name", OutputType::Varchar),
        ColumnDescriptor::scalar("flag", OutputType::Boolean),
    ]
}

fn source_hits(prefix: &str, count: usize) -> Vec<RawHit> {
    (0..count)
        .map(|i| RawHit::from_source("people", format!("{prefix}{i}"), json!({"name": format!("n{i}")})))
        .collect()
}

fn open(
    client: &mut MemorySearchClient,
    columns: Vec<ColumnDescriptor>,
) -> SearchRecordCursor<&mut MemorySearchClient> {
    SearchRecordCursor::new(ColumnSet::new(columns).unwrap(), &partition(), &config(), client)
}

fn single_source_hit(source: Value) -> MemorySearchClient {
    MemorySearchClient::with_pages([
        SearchPage::new("s1", vec![RawHit::from_source("people", "p1", source)]),
        SearchPage::empty("s2"),
    ])
}

// =============================================================================
// Projection Mode Tests
// =============================================================================

/// Any nested column switches every column to full documents.
#[test]
fn test_nested_column_anywhere_forces_full_documents() {
    for nested_at in 0..3 {
        let columns = ["a", "b", "c"]
            .iter()
            .enumerate()
            .map(|(i, path)| {
                if i == nested_at {
                    ColumnDescriptor::nested(path, OutputType::Varchar)
                } else {
                    ColumnDescriptor::scalar(path, OutputType::Varchar)
                }
            })
            .collect();

        let set = ColumnSet::new(columns).unwrap();
        let request = RequestBuilder::build(&set, &partition(), &config());

        assert_eq!(request.mode, ProjectionMode::Source);
        assert!(request.projected_fields().is_empty());
    }
}

/// Without nested columns exactly the document paths are projected.
#[test]
fn test_scalar_columns_project_exactly_their_paths() {
    let set = ColumnSet::new(people_columns()).unwrap();

    let request = RequestBuilder::build(&set, &partition(), &config());

    assert_eq!(request.mode, ProjectionMode::Fields);
    assert_eq!(request.projected_fields(), vec!["name", "flag"]);
}

// =============================================================================
// Paging Tests
// =============================================================================

/// Pages of 3, 2, 0 hits: five hits, three requests.
#[test]
fn test_pagination_terminates_on_empty_page() {
    let mut client = MemorySearchClient::with_pages([
        SearchPage::new("s1", source_hits("a", 3)),
        SearchPage::new("s2", source_hits("b", 2)),
        SearchPage::empty("s3"),
    ]);

    let mut ids = Vec::new();
    {
        let mut cursor = open(&mut client, people_columns());
        while cursor.advance_position().unwrap() {
            ids.push(cursor.read_text(0).unwrap());
        }
    }

    assert_eq!(ids, vec!["a0", "a1", "a2", "b0", "b1"]);
    assert_eq!(client.request_count(), 3);
    assert!(matches!(client.requests()[0], RecordedRequest::Search(_)));
}

/// The eager drain keeps the same termination rule.
#[test]
fn test_drain_collects_all_hits() {
    let mut client = MemorySearchClient::with_pages([
        SearchPage::new("s1", source_hits("a", 3)),
        SearchPage::new("s2", source_hits("b", 2)),
        SearchPage::empty("s3"),
    ]);
    let set = ColumnSet::new(people_columns()).unwrap();
    let request = RequestBuilder::build(&set, &partition(), &config());

    let hits = drain(&mut client, request).unwrap();

    assert_eq!(hits.len(), 5);
    assert_eq!(client.request_count(), 3);
}

/// An index without matches is an empty scan, not an error.
#[test]
fn test_empty_index() {
    let mut client = MemorySearchClient::with_pages([SearchPage::empty("s1")]);
    let mut cursor = open(&mut client, people_columns());

    assert!(!cursor.advance_position().unwrap());
    assert_eq!(cursor.state(), CursorState::Exhausted);
}

/// A failing continuation aborts the scan after the rows already read.
#[test]
fn test_continuation_failure_is_fatal() {
    let mut client = MemorySearchClient::with_pages([SearchPage::new("s1", source_hits("a", 1))]);
    client.push_error(StoreError::Status {
        status: 404,
        body: "search_context_missing_exception".into(),
    });
    let mut cursor = open(&mut client, people_columns());

    assert!(cursor.advance_position().unwrap());
    let err = cursor.advance_position().unwrap_err();
    assert!(matches!(err, CursorError::StoreProtocol(StoreError::Status { status: 404, .. })));
    assert!(!cursor.advance_position().unwrap());
}

// =============================================================================
// Projection Tests
// =============================================================================

/// Unknown document keys never reach a row.
#[test]
fn test_unknown_keys_are_dropped() {
    let mut client = single_source_hit(json!({"name": "Ann", "unexpected": {"deep": true}, "other": 5}));
    let mut cursor = open(&mut client, people_columns());

    assert!(cursor.advance_position().unwrap());
    assert_eq!(cursor.read_text(2).unwrap(), "Ann");
    assert!(cursor.is_null(3).unwrap());
}

/// Metadata columns are filled in both projection modes.
#[test]
fn test_synthetic_columns_in_both_modes() {
    let mut fields_client = MemorySearchClient::with_pages([
        SearchPage::new("s1", vec![RawHit::from_fields("people-2024", "f1", json!({"name": ["F"]}))]),
        SearchPage::empty("s2"),
    ]);
    let mut cursor = open(&mut fields_client, people_columns());
    assert_eq!(cursor.projection_mode(), ProjectionMode::Fields);
    assert!(cursor.advance_position().unwrap());
    assert_eq!(cursor.read_text(0).unwrap(), "f1");
    assert_eq!(cursor.read_text(1).unwrap(), "people-2024");
    drop(cursor);

    let mut columns = people_columns();
    columns.push(ColumnDescriptor::nested("address", OutputType::Varchar));
    let mut source_client = MemorySearchClient::with_pages([
        SearchPage::new("s1", vec![RawHit::from_source("people-2025", "d1", json!({"name": "D"}))]),
        SearchPage::empty("s2"),
    ]);
    let mut cursor = open(&mut source_client, columns);
    assert_eq!(cursor.projection_mode(), ProjectionMode::Source);
    assert!(cursor.advance_position().unwrap());
    assert_eq!(cursor.read_text(0).unwrap(), "d1");
    assert_eq!(cursor.read_text(1).unwrap(), "people-2025");
}

// =============================================================================
// Coercion Tests
// =============================================================================

fn read_flag(raw: &str) -> bool {
    let mut client = single_source_hit(json!({ "flag": raw }));
    let mut cursor = open(&mut client, people_columns());
    assert!(cursor.advance_position().unwrap());
    cursor.read_boolean(3).unwrap()
}

#[test]
fn test_boolean_coercion_table() {
    for raw in ["", "False", "OFF", "no", "0"] {
        assert!(!read_flag(raw), "{raw:?} should read as false");
    }
    for raw in ["true", "1", "yes", "anything-else"] {
        assert!(read_flag(raw), "{raw:?} should read as true");
    }
}

/// A list of maps renders as a JSON array with one element per entry.
#[test]
fn test_collection_renders_as_json_array() {
    let mut client = single_source_hit(json!({
        "address": [
            {"city": "Oslo", "zip": "0150"},
            {"city": "Bergen"},
            {"city": "Tromsø", "tags": ["north"]}
        ]
    }));
    let mut cursor = open(
        &mut client,
        vec![ColumnDescriptor::nested("address", OutputType::Varchar)],
    );

    assert!(cursor.advance_position().unwrap());
    let text = cursor.read_text(0).unwrap();

    let parsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 3);
    assert_eq!(parsed[2]["city"], "Tromsø");
}

/// Numbers read as text exactly as the store wrote them.
#[test]
fn test_numbers_read_as_text_without_loss() {
    let mut client = single_source_hit(json!({"big": u64::MAX, "f": 3.0, "huge": 1e300}));
    let mut cursor = open(
        &mut client,
        vec![
            ColumnDescriptor::scalar("big", OutputType::Varchar),
            ColumnDescriptor::scalar("f", OutputType::Varchar),
            ColumnDescriptor::scalar("huge", OutputType::Varchar),
        ],
    );

    assert!(cursor.advance_position().unwrap());
    assert_eq!(cursor.read_text(0).unwrap(), "18446744073709551615");
    assert_eq!(cursor.read_text(1).unwrap(), "3.0");
    assert_eq!(cursor.read_text(2).unwrap(), "1e300");
    assert!(matches!(cursor.read_integer(1), Err(CursorError::TypeCoercion { index: 1, .. })));
    assert_eq!(cursor.read_float(1).unwrap(), 3.0);
}

#[test]
fn test_numeric_coercion_failure() {
    let mut client = single_source_hit(json!({"age": "forty"}));
    let mut cursor = open(
        &mut client,
        vec![
            ColumnDescriptor::scalar("age", OutputType::Bigint),
            ColumnDescriptor::nested("weight", OutputType::Double),
        ],
    );

    assert!(cursor.advance_position().unwrap());
    assert!(matches!(cursor.read_integer(0), Err(CursorError::TypeCoercion { index: 0, .. })));
    assert!(matches!(cursor.read_float(0), Err(CursorError::TypeCoercion { index: 0, .. })));
}

// =============================================================================
// Null Detection & Exhaustion Tests
// =============================================================================

/// is_null is true exactly for columns whose path matched nothing.
#[test]
fn test_null_detection_per_row() {
    let mut client = MemorySearchClient::with_pages([
        SearchPage::new(
            "s1",
            vec![
                RawHit::from_source("people", "p1", json!({"name": "A"})),
                RawHit::from_source("people", "p2", json!({"flag": "yes"})),
                RawHit::from_source("people", "p3", json!({"name": null, "flag": "no"})),
            ],
        ),
        SearchPage::empty("s2"),
    ]);
    let mut cursor = open(&mut client, people_columns());

    let expected = [
        [false, false, false, true],
        [false, false, true, false],
        [false, false, true, false],
    ];
    for row in expected {
        assert!(cursor.advance_position().unwrap());
        for (field, null) in row.iter().enumerate() {
            assert_eq!(cursor.is_null(field).unwrap(), *null);
        }
    }
    assert!(!cursor.advance_position().unwrap());
}

/// Once exhausted, always exhausted; close afterwards is fine.
#[test]
fn test_exhaustion_is_idempotent() {
    let mut client = single_source_hit(json!({"name": "A"}));
    {
        let mut cursor = open(&mut client, people_columns());

        assert!(cursor.advance_position().unwrap());
        for _ in 0..5 {
            assert!(!cursor.advance_position().unwrap());
        }
        cursor.close();
        cursor.close();
        assert!(!cursor.advance_position().unwrap());
    }

    assert_eq!(client.request_count(), 2);
    assert_eq!(client.cleared_scrolls(), ["s2".to_string()]);
}

/// A failed scroll release does not surface from close.
#[test]
fn test_close_tolerates_release_failure() {
    let mut client = single_source_hit(json!({"name": "A"}));
    client.fail_clear_scroll();

    let mut cursor = open(&mut client, people_columns());
    assert!(cursor.advance_position().unwrap());
    cursor.close();
    assert_eq!(cursor.state(), CursorState::Closed);
}
