//! Timestamp grouping and earliest-group selection.
//!
//! This is the only non-trivial logic in the service: partition an ordered
//! sequence of rows into groups keyed by timestamp, then pick the group whose
//! key denotes the chronologically earliest instant. Backs `GET /api/day`.
//!
//! The engine is pure and request-scoped: no I/O, no shared state, no
//! mutation of input rows. It never fails; an empty input is a valid empty
//! outcome, and an unparseable key is handled by ordering policy (see
//! [`select_earliest_group`]) rather than by an error.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

// ---

/// Partition `items` into groups keyed by `key_fn`, in one ordered pass.
///
/// The partition is stable: within each group, items keep the relative order
/// they had in the input. Every item lands in exactly one group; nothing is
/// dropped or duplicated. An empty input yields an empty map.
pub fn group_by_key<T, K, F>(items: impl IntoIterator<Item = T>, key_fn: F) -> HashMap<K, Vec<T>>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    // ---
    let mut groups: HashMap<K, Vec<T>> = HashMap::new();
    for item in items {
        groups.entry(key_fn(&item)).or_default().push(item);
    }
    groups
}

/// Pick the group whose key parses to the chronologically earliest instant.
///
/// Keys are compared by parsed temporal value, not lexically, since string
/// order and chronological order diverge across date formats. A key that
/// fails to parse sorts after every parseable key, so one malformed timestamp
/// cannot displace a valid earliest group. Two distinct keys denoting the
/// same instant tie arbitrarily.
///
/// Returns `None` only when the map is empty ("no data" is a valid outcome,
/// not an error); a selected group is never empty, since grouping only
/// creates a key on first occurrence.
pub fn select_earliest_group<T>(groups: HashMap<String, Vec<T>>) -> Option<Vec<T>> {
    // ---
    groups
        .into_iter()
        .min_by_key(|(key, _)| {
            let parsed = parse_timestamp(key);
            // Unparseable keys (None) sort after all valid ones.
            (parsed.is_none(), parsed)
        })
        .map(|(_, items)| items)
}

/// Group `items` by `key_fn` and return the chronologically earliest group.
///
/// The composed entry point used by the HTTP shell: `None` means the input
/// was empty and the response body carries an explicit JSON `null`.
pub fn earliest_group_by<T, F>(items: impl IntoIterator<Item = T>, key_fn: F) -> Option<Vec<T>>
where
    F: Fn(&T) -> String,
{
    // ---
    select_earliest_group(group_by_key(items, key_fn))
}

/// Parse a stored timestamp string into an instant.
///
/// Tries RFC 3339 first, then the naive ISO-like forms the table actually
/// holds (with and without seconds, `T` or space separated), then a bare
/// date. Naive values are taken as UTC. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    // ---
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::WaterReading;

    fn reading(id: i32, timestamp: &str) -> WaterReading {
        // ---
        WaterReading {
            id,
            timestamp: timestamp.to_string(),
            location: format!("station-{id}"),
            water_level: id as f64 * 0.5,
        }
    }

    fn by_timestamp(r: &WaterReading) -> String {
        r.timestamp.clone()
    }

    #[test]
    fn test_grouping_partitions_without_loss_or_duplication() {
        // ---
        let input = vec![
            reading(1, "2024-03-02"),
            reading(2, "2024-03-01"),
            reading(3, "2024-03-02"),
            reading(4, "2024-03-03"),
        ];

        let groups = group_by_key(input.clone(), by_timestamp);

        let mut regrouped: Vec<_> = groups.values().flatten().map(|r| r.id).collect();
        regrouped.sort_unstable();
        assert_eq!(regrouped, vec![1, 2, 3, 4]);
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn test_grouping_is_stable_within_groups() {
        // ---
        let input = vec![
            reading(1, "2024-03-02"),
            reading(2, "2024-03-01"),
            reading(3, "2024-03-02"),
        ];

        let groups = group_by_key(input, by_timestamp);

        let march_second = &groups["2024-03-02"];
        assert_eq!(
            march_second.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![1, 3],
            "intra-group order must match input order"
        );
        assert_eq!(groups["2024-03-01"].len(), 1);
    }

    #[test]
    fn test_empty_input_yields_empty_map_and_absence() {
        // ---
        let groups = group_by_key(Vec::<WaterReading>::new(), by_timestamp);
        assert!(groups.is_empty());
        assert!(select_earliest_group(groups).is_none());
    }

    #[test]
    fn test_exact_timestamps_form_singleton_groups_and_earliest_wins() {
        // ---
        let input = vec![
            reading(1, "2024-03-02T10:00"),
            reading(2, "2024-03-01T09:00"),
            reading(3, "2024-03-02T11:00"),
        ];

        let groups = group_by_key(input.clone(), by_timestamp);
        assert_eq!(groups.len(), 3);

        let earliest = select_earliest_group(groups).unwrap();
        assert_eq!(earliest.len(), 1);
        assert_eq!(earliest[0].id, 2);
        assert_eq!(earliest[0].timestamp, "2024-03-01T09:00");
    }

    #[test]
    fn test_date_truncated_keys_group_and_select() {
        // ---
        let input = vec![
            reading(1, "2024-03-02"),
            reading(2, "2024-03-01"),
            reading(3, "2024-03-02"),
        ];

        let earliest = earliest_group_by(input, by_timestamp).unwrap();
        assert_eq!(earliest.len(), 1);
        assert_eq!(earliest[0].id, 2);
    }

    #[test]
    fn test_selection_is_chronological_not_lexical() {
        // ---
        // Lexically "2024-03-01T08:00:00+00:00" < "2024-03-01T12:00:00+05:00",
        // but the offset timestamp denotes 07:00 UTC and is the earlier one.
        let input = vec![
            reading(1, "2024-03-01T08:00:00+00:00"),
            reading(2, "2024-03-01T12:00:00+05:00"),
        ];

        let earliest = earliest_group_by(input, by_timestamp).unwrap();
        assert_eq!(earliest[0].id, 2);
    }

    #[test]
    fn test_selected_group_is_invariant_under_input_permutation() {
        // ---
        let forward = vec![
            reading(1, "2024-03-03"),
            reading(2, "2024-03-01"),
            reading(3, "2024-03-02"),
            reading(4, "2024-03-01"),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let from_forward = earliest_group_by(forward, by_timestamp).unwrap();
        let from_reversed = earliest_group_by(reversed, by_timestamp).unwrap();

        let mut forward_ids: Vec<_> = from_forward.iter().map(|r| r.id).collect();
        let mut reversed_ids: Vec<_> = from_reversed.iter().map(|r| r.id).collect();
        forward_ids.sort_unstable();
        reversed_ids.sort_unstable();
        assert_eq!(forward_ids, reversed_ids);
        assert_eq!(forward_ids, vec![2, 4]);
    }

    #[test]
    fn test_malformed_key_sorts_after_valid_keys() {
        // ---
        let input = vec![
            reading(1, "not-a-date"),
            reading(2, "2024-03-02"),
            reading(3, "2024-03-01"),
        ];

        let earliest = earliest_group_by(input, by_timestamp).unwrap();
        assert_eq!(earliest[0].id, 3);
    }

    #[test]
    fn test_all_malformed_keys_still_select_a_group() {
        // ---
        let input = vec![reading(1, "garbage"), reading(2, "also-garbage")];

        // No valid key to prefer; some group is still returned rather than
        // failing the request.
        let earliest = earliest_group_by(input, by_timestamp);
        assert!(earliest.is_some());
        assert_eq!(earliest.unwrap().len(), 1);
    }

    #[test]
    fn test_parse_timestamp_accepted_forms() {
        // ---
        assert!(parse_timestamp("2024-03-01T09:00:00+00:00").is_some());
        assert!(parse_timestamp("2024-03-01T09:00:00").is_some());
        assert!(parse_timestamp("2024-03-01 09:00:00").is_some());
        assert!(parse_timestamp("2024-03-01T09:00").is_some());
        assert!(parse_timestamp("2024-03-01").is_some());

        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("03/01/2024").is_none());
        assert!(parse_timestamp("not-a-date").is_none());
    }

    #[test]
    fn test_bare_date_parses_to_midnight_utc() {
        // ---
        let bare = parse_timestamp("2024-03-01").unwrap();
        let explicit = parse_timestamp("2024-03-01T00:00:00").unwrap();
        assert_eq!(bare, explicit);
        assert!(bare < parse_timestamp("2024-03-01T00:00:01").unwrap());
    }
}
