//! Generic grouping helpers shared by the aggregations.

use std::collections::{BTreeMap, BTreeSet};

/// Groups rows by a derived key, iterating groups in key order.
///
/// Rows whose key comes back `None` are excluded, which is how a null
/// date or blank id drops a row from a grouped metric.
pub fn group_by<'a, T, K, F>(rows: &'a [T], key: F) -> BTreeMap<K, Vec<&'a T>>
where
    K: Ord,
    F: Fn(&'a T) -> Option<K>,
{
    let mut groups: BTreeMap<K, Vec<&'a T>> = BTreeMap::new();
    for row in rows {
        if let Some(k) = key(row) {
            groups.entry(k).or_default().push(row);
        }
    }
    groups
}

/// Counts distinct non-blank values of a field across grouped rows.
pub fn distinct_count<'a, T, F>(rows: &[&'a T], field: F) -> usize
where
    F: Fn(&'a T) -> &'a str,
{
    rows.iter()
        .map(|row| field(row))
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .len()
}

#[cfg(test)]
#[path = "group_test.rs"]
mod group_test;
