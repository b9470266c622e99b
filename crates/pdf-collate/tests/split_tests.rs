mod common;

use common::*;
use lopdf::Document;
use pdf_collate::*;

fn markers(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    page_ids(&doc)
        .into_iter()
        .map(|id| page_marker(&doc, id))
        .collect()
}

#[test]
fn test_split_all_keeps_page_order() {
    let source = pdf_bytes("s", &[LETTER, A4, LETTER, (300, 400)]);

    let outcome = split(&LopdfBackend, &source, &SplitMode::All).unwrap();
    assert_eq!(outcome.parts.len(), 4);
    assert_eq!(outcome.dropped_entries, 0);

    let labels: Vec<&str> = outcome.parts.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, ["page_1", "page_2", "page_3", "page_4"]);

    let order: Vec<String> = outcome
        .parts
        .iter()
        .flat_map(|part| markers(&part.bytes))
        .collect();
    assert_eq!(order, ["s p1", "s p2", "s p3", "s p4"]);
}

#[test]
fn test_split_keeps_original_sizes() {
    let source = pdf_bytes("s", &[LETTER, (300, 400)]);

    let outcome = split(&LopdfBackend, &source, &SplitMode::All).unwrap();
    let doc = Document::load_mem(&outcome.parts[1].bytes).unwrap();
    let [_, _, width, height] = media_box(&doc, page_ids(&doc)[0]);
    assert_eq!((width, height), (300.0, 400.0));
}

#[test]
fn test_split_ranges() {
    let source = pdf_bytes("s", &uniform(A4, 6));
    let mode = SplitMode::Ranges(vec![
        "1-3".to_string(),
        "8-9".to_string(),
        "6, 4".to_string(),
        "abc".to_string(),
    ]);

    let outcome = split(&LopdfBackend, &source, &mode).unwrap();
    assert_eq!(outcome.dropped_entries, 2);
    assert_eq!(outcome.parts.len(), 2);

    assert_eq!(outcome.parts[0].label, "range_1-3");
    assert_eq!(outcome.parts[0].pages, [0, 1, 2]);
    assert_eq!(markers(&outcome.parts[0].bytes), ["s p1", "s p2", "s p3"]);

    // Pages come out in document order whatever the entry order
    assert_eq!(outcome.parts[1].pages, [3, 5]);
    assert_eq!(markers(&outcome.parts[1].bytes), ["s p4", "s p6"]);
}

#[test]
fn test_overlapping_ranges() {
    let source = pdf_bytes("s", &uniform(A4, 4));
    let mode = SplitMode::Ranges(vec!["1-3".to_string(), "2-4".to_string()]);

    let outcome = split(&LopdfBackend, &source, &mode).unwrap();
    assert_eq!(markers(&outcome.parts[0].bytes), ["s p1", "s p2", "s p3"]);
    assert_eq!(markers(&outcome.parts[1].bytes), ["s p2", "s p3", "s p4"]);
}

#[test]
fn test_split_no_valid_ranges() {
    let source = pdf_bytes("s", &uniform(A4, 2));
    let mode = SplitMode::Ranges(vec!["5".to_string(), "".to_string()]);

    let result = split(&LopdfBackend, &source, &mode);
    assert!(matches!(result, Err(CollateError::NoValidInput(_))));
}

#[test]
fn test_split_unreadable_document() {
    let result = split(&LopdfBackend, b"%PDF-garbage", &SplitMode::All);
    assert!(matches!(
        result,
        Err(CollateError::DocumentUnreadable { document: 0, .. })
    ));
}

#[test]
fn test_duplicate_ranges_labelled_apart() {
    let source = pdf_bytes("s", &uniform(A4, 3));
    let mode = SplitMode::Ranges(vec!["1-2".to_string(), "1-2".to_string()]);

    let outcome = split(&LopdfBackend, &source, &mode).unwrap();
    let labels: Vec<&str> = outcome.parts.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, ["range_1-2", "range_1-2_2"]);
    assert_eq!(markers(&outcome.parts[1].bytes), ["s p1", "s p2"]);
}
