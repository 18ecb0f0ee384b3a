//! Tests for the grouping helpers.

use crate::group::{distinct_count, group_by};

#[test]
fn test_group_by_key_order() {
    let rows = vec![("b", 2), ("a", 1), ("b", 3), ("c", 4)];
    let groups = group_by(&rows, |(key, _)| Some(*key));

    let keys: Vec<&str> = groups.keys().copied().collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
    assert_eq!(groups["b"].len(), 2);
}

#[test]
fn test_group_by_drops_none_keys() {
    let rows = vec![Some("a"), None, Some("a"), None];
    let groups = group_by(&rows, |row| *row);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups["a"].len(), 2);
}

#[test]
fn test_distinct_count_ignores_blank() {
    let rows = vec!["u1", "u2", "u1", "", "u3", ""];
    let refs: Vec<&&str> = rows.iter().collect();
    assert_eq!(distinct_count(&refs, |value| *value), 3);
}

#[test]
fn test_distinct_count_empty() {
    let refs: Vec<&&str> = Vec::new();
    assert_eq!(distinct_count(&refs, |value| *value), 0);
}
