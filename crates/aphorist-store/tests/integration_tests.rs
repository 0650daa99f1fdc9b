//! Integration tests for aphorist-store
//!
//! These tests exercise loading, lookups, statistics and ranking over a small
//! corpus, including loading from a file on disk.

use aphorist_domain::RawQuote;
use aphorist_store::corpus::{load_from_path, export_json};
use aphorist_store::{
    CorpusWarning, LoadPolicy, QueryOptions, QuoteStore, SearchField, StoreError,
};
use std::io::Write;

fn entry(
    id: &str,
    text: &str,
    author: &str,
    tradition: &str,
    themes: &[&str],
    verified: bool,
) -> RawQuote {
    RawQuote {
        id: Some(id.to_string()),
        text: Some(text.to_string()),
        author: Some(author.to_string()),
        tradition: Some(tradition.to_string()),
        themes: Some(themes.iter().map(|t| t.to_string()).collect()),
        verified: Some(verified),
        ..Default::default()
    }
}

fn sample_store() -> QuoteStore {
    QuoteStore::load(vec![
        entry(
            "stoic-001",
            "You have power over your mind, not outside events.",
            "Marcus Aurelius",
            "Stoicism",
            &["control", "mind"],
            true,
        ),
        entry(
            "stoic-002",
            "We suffer more often in imagination than in reality.",
            "Seneca",
            "Stoicism",
            &["suffering", "fear"],
            true,
        ),
        entry(
            "exist-001",
            "Man is condemned to be free.",
            "Jean-Paul Sartre",
            "Existentialism",
            &["freedom", "responsibility"],
            true,
        ),
        entry(
            "misc-001",
            "Be the change that you wish to see in the world.",
            "Mahatma Gandhi",
            "Modern",
            &["change"],
            false,
        ),
        entry(
            "stoic-001",
            "It is not that we have a short time to live, but that we waste a lot of it.",
            "Seneca",
            "stoicism",
            &["time", "mind"],
            true,
        ),
    ])
    .unwrap()
}

#[test]
fn test_load_zero_records_fails() {
    let result = QuoteStore::load(Vec::new());
    assert!(matches!(result, Err(StoreError::EmptyCorpus)));
}

#[test]
fn test_load_record_missing_author_fails() {
    let mut bad = entry("x", "Some text here", "Nobody", "None", &["none"], true);
    bad.author = None;

    let result = QuoteStore::load(vec![
        entry("ok", "Fine text", "Someone", "Any", &["any"], true),
        bad,
    ]);

    match result {
        Err(StoreError::RecordValidation { index, .. }) => assert_eq!(index, 1),
        other => panic!("Expected RecordValidation, got {:?}", other),
    }
}

#[test]
fn test_all_preserves_insertion_order() {
    let store = sample_store();
    let ids: Vec<&str> = store.all().iter().map(|q| q.id()).collect();
    assert_eq!(
        ids,
        vec!["stoic-001", "stoic-002", "exist-001", "misc-001", "stoic-001"]
    );
}

#[test]
fn test_duplicate_and_unverified_are_warnings() {
    let store = sample_store();
    let warnings = store.warnings();

    assert_eq!(warnings.len(), 2);
    assert!(warnings
        .iter()
        .any(|w| matches!(w, CorpusWarning::Unverified { index: 3, .. })));
    assert!(warnings
        .iter()
        .any(|w| matches!(w, CorpusWarning::DuplicateId { index: 4, id } if id == "stoic-001")));
}

#[test]
fn test_get_by_id_returns_first() {
    let store = sample_store();
    let quote = store.get_by_id("stoic-001").unwrap();
    assert_eq!(quote.author(), "Marcus Aurelius");
    assert!(store.get_by_id("missing").is_none());
    assert_eq!(store.get_by_index(2).unwrap().id(), "exist-001");
    assert!(store.get_by_index(99).is_none());
}

#[test]
fn test_by_tradition_is_case_insensitive_exact() {
    let store = sample_store();
    assert_eq!(store.by_tradition("STOICISM").len(), 3);
    assert!(store.by_tradition("Stoic").is_empty());
}

#[test]
fn test_by_theme_is_case_insensitive_exact() {
    let store = sample_store();
    assert_eq!(store.by_theme("Mind").len(), 2);
    assert!(store.by_theme("min").is_empty());
}

#[test]
fn test_by_author_is_substring() {
    let store = sample_store();
    assert_eq!(store.by_author("sene").len(), 2);
    assert_eq!(store.by_author("SARTRE").len(), 1);
    assert!(store.by_author("Kant").is_empty());
}

#[test]
fn test_by_verification() {
    let store = sample_store();
    assert_eq!(store.by_verification(true).len(), 4);
    assert_eq!(store.by_verification(false).len(), 1);
}

#[test]
fn test_search_fields() {
    let store = sample_store();
    assert_eq!(store.search("imagination", SearchField::Text).len(), 1);
    assert_eq!(store.search("gandhi", SearchField::Author).len(), 1);
    assert_eq!(store.search("exist", SearchField::Tradition).len(), 1);
    assert_eq!(store.search("respons", SearchField::Themes).len(), 1);
}

#[test]
fn test_distinct_lists_are_sorted_and_deduplicated() {
    let store = sample_store();
    assert_eq!(
        store.distinct_traditions(),
        vec!["Existentialism", "Modern", "Stoicism", "stoicism"]
    );
    assert_eq!(
        store.distinct_authors(),
        vec!["Jean-Paul Sartre", "Mahatma Gandhi", "Marcus Aurelius", "Seneca"]
    );
    let themes = store.distinct_themes();
    assert_eq!(themes.first().map(String::as_str), Some("change"));
    assert_eq!(themes.iter().filter(|t| *t == "mind").count(), 1);
}

#[test]
fn test_stats_snapshot() {
    let store = sample_store();
    let stats = store.stats();

    assert_eq!(stats.total_quotes, 5);
    assert_eq!(stats.verified_quotes, 4);
    assert_eq!(stats.unverified_quotes, 1);
    assert_eq!(stats.total_traditions, 4);
    assert_eq!(stats.total_themes, 8);
    assert_eq!(stats.total_authors, 4);
    assert_eq!(stats, store.stats());
}

#[test]
fn test_find_similar_over_store() {
    let store = sample_store();

    let matches = store.find_similar(
        "My mind wastes time on fear",
        QueryOptions::default(),
    );
    let ids: Vec<(&str, usize)> = matches.iter().map(|m| (m.quote.id(), m.score)).collect();

    // stoic-001 (second) scores 2, the others 1 in corpus order
    assert_eq!(ids, vec![("stoic-001", 2), ("stoic-001", 1), ("stoic-002", 1)]);
    assert_eq!(matches[0].quote.author(), "Seneca");
}

#[test]
fn test_find_similar_respects_verification_filter() {
    let store = sample_store();

    let verified_only = store.find_similar("a change of heart", QueryOptions::default());
    assert!(verified_only.is_empty());

    let with_unverified = store.find_similar(
        "a change of heart",
        QueryOptions::default().with_unverified(true),
    );
    assert_eq!(with_unverified.len(), 1);
    assert_eq!(with_unverified[0].quote.id(), "misc-001");
}

#[test]
fn test_load_from_file() {
    let store = sample_store();
    let json = export_json(&store).unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let loaded = load_from_path(file.path(), LoadPolicy::Strict).unwrap();
    assert_eq!(loaded.all(), store.all());
}

#[test]
fn test_load_from_missing_file() {
    let result = load_from_path("/nonexistent/quotes_db.json", LoadPolicy::Strict);
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}
