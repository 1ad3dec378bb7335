use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// The most frequent value of a column, or a placeholder when the column had no values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Mode<T> {
    Found(T),
    Empty(String),
}

impl<T> Mode<T> {
    pub fn empty(label: &str) -> Self {
        Mode::Empty(format!("no {label} data found"))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Mode<U> {
        match self {
            Mode::Found(v) => Mode::Found(f(v)),
            Mode::Empty(placeholder) => Mode::Empty(placeholder),
        }
    }

    pub fn found(&self) -> Option<&T> {
        match self {
            Mode::Found(v) => Some(v),
            Mode::Empty(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Mode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Found(v) => v.fmt(f),
            Mode::Empty(placeholder) => f.write_str(placeholder),
        }
    }
}

/// Counts each distinct value, most frequent first.
///
/// Values with equal counts keep the order in which they first appeared.
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash + Clone,
{
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();

    for value in values {
        match index.get(&value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    // stable: ties stay in first-occurrence order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Returns the value with the highest count, or `Mode::empty(if_empty)` for no values.
///
/// Ties resolve to the tied value that appears first in `values`.
pub fn most_frequent<T, I>(values: I, if_empty: &str) -> Mode<T>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash + Clone,
{
    match value_counts(values).into_iter().next() {
        Some((value, _)) => Mode::Found(value),
        None => Mode::empty(if_empty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_frequent_picks_highest_count() {
        assert_eq!(most_frequent(vec![3, 1, 3, 2, 3, 1], "n"), Mode::Found(3));
    }

    #[test]
    fn test_most_frequent_tie_prefers_first_occurrence() {
        assert_eq!(most_frequent(vec!["b", "a", "a", "b"], "s"), Mode::Found("b"));
        assert_eq!(most_frequent(vec![9, 1, 1, 9, 5], "n"), Mode::Found(9));
    }

    #[test]
    fn test_most_frequent_empty_returns_placeholder() {
        let mode = most_frequent(Vec::<u32>::new(), "hour");
        assert_eq!(mode, Mode::Empty("no hour data found".to_string()));
        assert_eq!(mode.to_string(), "no hour data found");
        assert_eq!(mode.found(), None);
    }

    #[test]
    fn test_value_counts_order() {
        let counts = value_counts(vec!["x", "y", "z", "y", "z", "w"]);
        assert_eq!(counts, vec![("y", 2), ("z", 2), ("x", 1), ("w", 1)]);
    }

    #[test]
    fn test_map_keeps_placeholder() {
        let mode: Mode<u32> = Mode::empty("month");
        assert_eq!(mode.map(|m| m * 2), Mode::Empty("no month data found".to_string()));
        assert_eq!(Mode::Found(2).map(|m| m * 2), Mode::Found(4));
    }
}
