use std::collections::BTreeSet;
use std::fmt;

use super::model::{DatasetRow, DurationGroup, VideoTable};

// ---------------------------------------------------------------------------
// Selector values
// ---------------------------------------------------------------------------

/// A categorical selector: either every value, or one exact value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => write!(f, "All"),
            Choice::Only(v) => write!(f, "{v}"),
        }
    }
}

/// Selector entries: `All` followed by the distinct values, ascending.
pub fn choices<T: Clone>(values: &BTreeSet<T>) -> Vec<Choice<T>> {
    std::iter::once(Choice::All)
        .chain(values.iter().cloned().map(Choice::Only))
        .collect()
}

/// Inclusive `[low, high]` bound on `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationRange {
    pub low: f64,
    pub high: f64,
}

impl DurationRange {
    pub fn full(table: &VideoTable) -> Self {
        let (low, high) = table.duration_bounds;
        Self { low, high }
    }

    pub fn contains(&self, duration: f64) -> bool {
        self.low <= duration && duration <= self.high
    }

    /// Slider positions snap to `min + k * step`, which rarely lands on
    /// the observed extremes. A bound within half a step of either end of
    /// `bounds` (or past it) is moved onto that end exactly.
    pub fn pinned(self, bounds: (f64, f64), step: f64) -> Self {
        let (min, max) = bounds;
        let pin = |v: f64| {
            if v - min <= step / 2.0 {
                min
            } else if max - v <= step / 2.0 {
                max
            } else {
                v
            }
        };
        Self {
            low: pin(self.low),
            high: pin(self.high),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter state and predicates
// ---------------------------------------------------------------------------

/// Every user-adjustable filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub topic: Choice<String>,
    pub question_category: Choice<String>,
    pub duration_group: Choice<DurationGroup>,
    pub duration: DurationRange,
}

impl FilterState {
    /// The identity filter for `table`: every selector on `All`, the full
    /// observed duration range.
    pub fn for_table(table: &VideoTable) -> Self {
        Self {
            topic: Choice::All,
            question_category: Choice::All,
            duration_group: Choice::All,
            duration: DurationRange::full(table),
        }
    }

    /// The active predicates. Selectors left on `All` contribute nothing.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut preds = Vec::new();
        if let Choice::Only(v) = &self.topic {
            preds.push(Predicate::Topic(v.clone()));
        }
        if let Choice::Only(v) = &self.question_category {
            preds.push(Predicate::QuestionCategory(v.clone()));
        }
        if let Choice::Only(v) = &self.duration_group {
            preds.push(Predicate::DurationGroup(v.clone()));
        }
        preds.push(Predicate::Duration(self.duration));
        preds
    }
}

/// One row test. Predicates combine by logical AND.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Topic(String),
    QuestionCategory(String),
    DurationGroup(DurationGroup),
    Duration(DurationRange),
}

impl Predicate {
    pub fn keeps(&self, row: &DatasetRow) -> bool {
        match self {
            Predicate::Topic(t) => row.topic_category == *t,
            Predicate::QuestionCategory(q) => row.question_category == *q,
            Predicate::DurationGroup(g) => row.duration_group == *g,
            Predicate::Duration(range) => range.contains(row.duration),
        }
    }
}

/// Narrow `indices` to the rows every predicate keeps.
pub fn apply(table: &VideoTable, indices: &[usize], predicates: &[Predicate]) -> Vec<usize> {
    indices
        .iter()
        .copied()
        .filter(|&i| {
            let row = &table.rows[i];
            predicates.iter().all(|p| p.keeps(row))
        })
        .collect()
}

/// Return indices of rows passing all active filters, in table order.
/// An empty result is a valid state.
pub fn filtered_indices(table: &VideoTable, filters: &FilterState) -> Vec<usize> {
    let all: Vec<usize> = (0..table.len()).collect();
    apply(table, &all, &filters.predicates())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::row;

    fn table() -> VideoTable {
        let mut rows = vec![
            row("a", "Movie", 10.0),
            row("b", "News", 20.0),
            row("c", "Movie", 30.0),
            row("d", "Vlog", 40.0),
            row("e", "News", 50.0),
        ];
        rows[1].question_category = "TOS".into();
        rows[2].question_category = "TOS".into();
        rows[3].duration_group = DurationGroup::Seconds(60);
        rows[4].duration_group = DurationGroup::Seconds(60);
        VideoTable::from_rows(rows)
    }

    #[test]
    fn identity_filter_keeps_every_row_in_order() {
        let t = table();
        let filters = FilterState::for_table(&t);
        assert_eq!(filtered_indices(&t, &filters), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn selector_lists_start_with_all_then_sorted_values() {
        let t = table();
        let shown: Vec<String> = choices(&t.topics).iter().map(|c| c.to_string()).collect();
        assert_eq!(shown, ["All", "Movie", "News", "Vlog"]);
        assert_eq!(
            choices(&t.duration_groups),
            vec![
                Choice::All,
                Choice::Only(DurationGroup::Seconds(60)),
                Choice::Only(DurationGroup::Seconds(600)),
            ]
        );
    }

    #[test]
    fn narrowing_keeps_exactly_the_matching_rows() {
        let t = table();
        for topic in &t.topics {
            let filters = FilterState {
                topic: Choice::Only(topic.clone()),
                ..FilterState::for_table(&t)
            };
            let kept = filtered_indices(&t, &filters);
            let expected = t.rows.iter().filter(|r| r.topic_category == *topic).count();
            assert_eq!(kept.len(), expected);
            assert!(kept.iter().all(|&i| t.rows[i].topic_category == *topic));
        }

        let filters = FilterState {
            duration_group: Choice::Only(DurationGroup::Seconds(60)),
            ..FilterState::for_table(&t)
        };
        assert_eq!(filtered_indices(&t, &filters), vec![3, 4]);
    }

    #[test]
    fn predicate_order_does_not_matter() {
        let t = table();
        let filters = FilterState {
            topic: Choice::Only("News".into()),
            question_category: Choice::Only("TOS".into()),
            duration: DurationRange { low: 15.0, high: 45.0 },
            ..FilterState::for_table(&t)
        };
        let all: Vec<usize> = (0..t.len()).collect();
        let mut preds = filters.predicates();
        let forward = apply(&t, &all, &preds);
        preds.reverse();
        let backward = apply(&t, &all, &preds);

        // Applying one predicate at a time, in either order, agrees too.
        let stepwise = preds
            .iter()
            .fold(all.clone(), |acc, p| apply(&t, &acc, std::slice::from_ref(p)));

        assert_eq!(forward, vec![1]);
        assert_eq!(forward, backward);
        assert_eq!(forward, stepwise);
    }

    #[test]
    fn duration_bounds_are_inclusive() {
        let t = table();
        let filters = FilterState {
            duration: DurationRange { low: 20.0, high: 40.0 },
            ..FilterState::for_table(&t)
        };
        assert_eq!(filtered_indices(&t, &filters), vec![1, 2, 3]);
    }

    #[test]
    fn bounds_near_the_extremes_pin_to_them() {
        let bounds = (8.56, 3599.37);
        let snapped = DurationRange { low: 8.6, high: 3599.56 }.pinned(bounds, 1.0);
        assert_eq!(snapped, DurationRange { low: 8.56, high: 3599.37 });

        let below = DurationRange { low: 8.56, high: 3598.96 }.pinned(bounds, 1.0);
        assert_eq!(below.high, 3599.37);

        let inner = DurationRange { low: 60.56, high: 1200.56 }.pinned(bounds, 1.0);
        assert_eq!(inner, DurationRange { low: 60.56, high: 1200.56 });
    }

    #[test]
    fn conflicting_filters_yield_empty_result() {
        let t = table();
        let filters = FilterState {
            topic: Choice::Only("Vlog".into()),
            question_category: Choice::Only("TOS".into()),
            ..FilterState::for_table(&t)
        };
        assert!(filtered_indices(&t, &filters).is_empty());
    }
}
