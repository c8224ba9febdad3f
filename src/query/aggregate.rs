use std::cmp::Reverse;

use indexmap::{IndexMap, IndexSet};
use ordered_float::OrderedFloat;
use smallvec::SmallVec;

use crate::query::params::{AggregateOp, Aggregation, GroupBy};
use crate::query::view::ViewRow;

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(value) = value.filter(|v| v.is_finite()) {
            self.sum += value;
            self.count += 1;
        }
    }

    fn finish(self, op: AggregateOp) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        match op {
            AggregateOp::Sum => Some(self.sum),
            AggregateOp::Mean => Some(self.sum / self.count as f64),
        }
    }
}

struct Group {
    entity: String,
    code: Option<String>,
    year: Option<i32>,
    measure: Accumulator,
    components: SmallVec<[Accumulator; 6]>,
    total: Accumulator,
    x_value: Accumulator,
    marker_size: Accumulator,
    marker_color: Accumulator,
}

impl Group {
    fn new(entity: String, year: Option<i32>) -> Self {
        Self {
            entity,
            code: None,
            year,
            measure: Accumulator::default(),
            components: SmallVec::new(),
            total: Accumulator::default(),
            x_value: Accumulator::default(),
            marker_size: Accumulator::default(),
            marker_color: Accumulator::default(),
        }
    }

    fn push(&mut self, row: ViewRow) {
        if self.code.is_none() {
            self.code = row.code;
        }
        self.measure.push(row.measure);
        self.total.push(row.total);
        self.x_value.push(row.x_value);
        self.marker_size.push(row.marker_size);
        self.marker_color.push(row.marker_color);
        if self.components.len() < row.components.len() {
            self.components
                .resize(row.components.len(), Accumulator::default());
        }
        for (acc, value) in self.components.iter_mut().zip(row.components) {
            acc.push(value);
        }
    }

    fn finish(self, op: AggregateOp) -> ViewRow {
        ViewRow {
            entity: self.entity,
            code: self.code,
            year: self.year,
            month: None,
            measure: self.measure.finish(op),
            components: self
                .components
                .into_iter()
                .map(|acc| acc.finish(op))
                .collect(),
            total: self.total.finish(op),
            x_value: self.x_value.finish(op),
            marker_size: self.marker_size.finish(op),
            marker_color: self.marker_color.finish(op),
        }
    }
}

/// Groups rows and reduces measure, components and total.
///
/// Groups keep first-seen order. Missing and non-finite inputs are skipped;
/// a group without finite inputs gets a missing aggregate. Entity groups
/// keep the year when every input row shares it. Year groups are labelled
/// `all_label`. With `top_n` the result holds the N highest finite
/// aggregates in descending order, ties resolved by first-seen order.
#[must_use]
pub fn aggregate(rows: Vec<ViewRow>, aggregation: Aggregation, all_label: &str) -> Vec<ViewRow> {
    let shared_year = single_year(&rows);
    let mut groups: IndexMap<(String, Option<i32>), Group> = IndexMap::new();

    for row in rows {
        let (entity, year) = match aggregation.group_by {
            GroupBy::Entity => (row.entity.clone(), shared_year),
            GroupBy::EntityYear => (row.entity.clone(), row.year),
            GroupBy::Year => (all_label.to_owned(), row.year),
        };
        groups
            .entry((entity.clone(), year))
            .or_insert_with(|| Group::new(entity, year))
            .push(row);
    }

    let op = aggregation.op;
    let mut reduced: Vec<ViewRow> = groups
        .into_values()
        .map(|group| group.finish(op))
        .collect();

    if aggregation.group_by == GroupBy::Year {
        reduced.sort_by_key(|row| row.year);
    }

    if let Some(top_n) = aggregation.top_n {
        reduced.retain(|row| row.finite_measure().is_some());
        reduced.sort_by_key(|row| {
            Reverse(OrderedFloat(row.finite_measure().unwrap_or(f64::MIN)))
        });
        reduced.truncate(top_n);
    }

    reduced
}

fn single_year(rows: &[ViewRow]) -> Option<i32> {
    let first = rows.first()?.year?;
    rows.iter()
        .all(|row| row.year == Some(first))
        .then_some(first)
}

/// Keeps the rows of the `count` entities with the largest summed finite
/// measure, reordered by rank. Entities without a finite measure never
/// rank; ties go to the entity seen first.
#[must_use]
pub fn top_entities(rows: Vec<ViewRow>, count: usize) -> Vec<ViewRow> {
    let mut totals: IndexMap<&str, Accumulator> = IndexMap::new();
    for row in &rows {
        totals
            .entry(row.entity.as_str())
            .or_default()
            .push(row.measure);
    }

    let mut ranked: Vec<(&str, f64)> = totals
        .into_iter()
        .filter_map(|(entity, acc)| Some((entity, acc.finish(AggregateOp::Sum)?)))
        .collect();
    ranked.sort_by_key(|(_, total)| Reverse(OrderedFloat(*total)));
    ranked.truncate(count);
    let ranks: IndexSet<String> = ranked
        .into_iter()
        .map(|(entity, _)| entity.to_owned())
        .collect();

    let mut kept: Vec<ViewRow> = rows
        .into_iter()
        .filter(|row| ranks.contains(&row.entity))
        .collect();
    kept.sort_by_key(|row| ranks.get_index_of(&row.entity));
    kept
}

/// Finite measure totals per year over `rows`.
#[must_use]
pub fn year_totals(rows: &[ViewRow]) -> IndexMap<i32, f64> {
    let mut totals: IndexMap<i32, Accumulator> = IndexMap::new();
    for row in rows {
        if let Some(year) = row.year {
            totals.entry(year).or_default().push(row.measure);
        }
    }
    totals
        .into_iter()
        .filter_map(|(year, acc)| Some((year, acc.finish(AggregateOp::Sum)?)))
        .collect()
}

/// Replaces each measure with its percentage of the year's total.
///
/// Rows without a year, or whose year totals zero, lose their measure.
pub fn apply_year_share(rows: &mut [ViewRow], totals: &IndexMap<i32, f64>) {
    for row in rows {
        let total = row
            .year
            .and_then(|year| totals.get(&year).copied())
            .filter(|total| *total != 0.0);
        row.measure = match (row.finite_measure(), total) {
            (Some(value), Some(total)) => Some(value / total * 100.0),
            _ => None,
        };
    }
}
