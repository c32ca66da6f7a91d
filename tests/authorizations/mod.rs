// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::Result;
use authexpr::*;
use std::collections::{BTreeSet, HashMap, HashSet};

#[test]
fn csv_items_become_labels() {
    let labels = build_label_set("reader, writer ,\"ops team\"");
    assert_eq!(labels.len(), 3);
    for l in ["reader", "writer", "ops team"] {
        assert_eq!(labels.get(l), Some(&true), "{l}");
    }
}

#[test]
fn quotes_are_stripped_independently() {
    let labels = build_label_set("\"lead, trail\", \"both\"");
    let keys: Vec<&str> = labels.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["both", "lead", "trail"]);
}

#[test]
fn interior_content_is_not_decoded() {
    let labels = build_label_set(r#""a \"b\"""#);
    assert!(labels.contains_key(r#"a \"b\""#));
}

#[test]
fn empty_items_do_not_panic() {
    for csv in ["", ",", " , ,", "\"", "a,,", "   "] {
        let labels = build_label_set(csv);
        assert!(labels.is_granted(""), "{csv:?}");
    }
}

#[test]
fn any_lookup_can_back_evaluation() -> Result<()> {
    let expr = parse_expression("(a | b) & c")?;

    let map: HashMap<String, bool> = [("a".to_owned(), true), ("c".to_owned(), true)]
        .into_iter()
        .collect();
    assert!(expr.evaluate(&map));

    let revoked: HashMap<String, bool> = [("a".to_owned(), true), ("c".to_owned(), false)]
        .into_iter()
        .collect();
    assert!(!expr.evaluate(&revoked));

    let set: HashSet<String> = ["b", "c"].iter().map(|s| s.to_string()).collect();
    assert!(expr.evaluate(&set));

    let tree: BTreeSet<String> = ["b"].iter().map(|s| s.to_string()).collect();
    assert!(!expr.evaluate(&tree));

    let slice: &[&str] = &["a", "c"];
    assert!(expr.evaluate(slice));
    assert!(check_authorization_by_map("a & c", slice)?);
    Ok(())
}
