use indexmap::IndexSet;
use tracing::debug;

use crate::core::primitives::is_iso3_code;
use crate::core::{Column, Dataset};
use crate::error::{DashError, DashResult};
use crate::query::aggregate::{aggregate, apply_year_share, top_entities, year_totals};
use crate::query::mapping::ColumnMapping;
use crate::query::params::ParameterSet;
use crate::query::percentile::{finite_min, percentile};
use crate::query::view::{FilteredView, ViewRow};

/// Applies `params` to `dataset` through `mapping`.
///
/// A row is kept when its entity is selected (or the selection is empty),
/// its year satisfies `year` and `year_range`, its measure lies in
/// `value_range` and its category matches. Kept rows then pass through
/// top-entity selection, year shares and aggregation, in that order. Year
/// shares are taken against every kept row, selected or not. No match
/// yields an empty view, never an error. The function reads the dataset
/// only.
pub fn query(
    dataset: &Dataset,
    mapping: &ColumnMapping,
    params: &ParameterSet,
) -> DashResult<FilteredView> {
    params.validate()?;

    let entities = dataset.column(&mapping.entity)?;
    let measures = dataset.numeric(&mapping.measure)?;
    let years = mapping
        .year
        .as_deref()
        .map(|column| dataset.temporal(column))
        .transpose()?;
    let months = mapping
        .month
        .as_deref()
        .map(|column| dataset.temporal(column))
        .transpose()?;
    let codes: Option<&Column> = mapping
        .code
        .as_deref()
        .map(|column| dataset.column(column))
        .transpose()?;
    let totals = mapping
        .total
        .as_deref()
        .map(|column| dataset.numeric(column))
        .transpose()?;
    let components = mapping
        .components
        .iter()
        .map(|column| dataset.numeric(column))
        .collect::<DashResult<Vec<_>>>()?;
    let x_values = optional_numeric(dataset, mapping.x_measure.as_deref())?;
    let sizes = optional_numeric(dataset, mapping.size.as_deref())?;
    let colors = optional_numeric(dataset, mapping.color.as_deref())?;

    if years.is_none() && (params.year.is_some() || params.year_range.is_some()) {
        return Err(DashError::InvalidParameter {
            key: "year".to_owned(),
            reason: format!("dataset `{}` has no year column mapped", dataset.id()),
        });
    }

    let category_filter = params
        .category
        .as_deref()
        .filter(|value| *value != mapping.category_all);
    let categories = match (category_filter, mapping.category.as_deref()) {
        (Some(_), Some(column)) => Some(dataset.categorical(column)?),
        (Some(_), None) => {
            return Err(DashError::InvalidParameter {
                key: "category".to_owned(),
                reason: format!("dataset `{}` has no category column mapped", dataset.id()),
            });
        }
        (None, _) => None,
    };

    if mapping.require_code && codes.is_none() {
        return Err(DashError::InvalidConfig(format!(
            "mapping of `{}` keeps coded rows only but maps no code column",
            dataset.id()
        )));
    }

    let mut rows = Vec::new();
    for row in 0..dataset.row_count() {
        let Some(entity) = entities.text_at(row) else {
            continue;
        };
        if !params.entities.is_empty() && !params.entities.contains(&entity) {
            continue;
        }

        let year = years.as_ref().and_then(|years| years.year(row));
        if params.year.is_some_and(|wanted| year != Some(wanted)) {
            continue;
        }
        if params
            .year_range
            .is_some_and(|range| !year.is_some_and(|year| range.contains(year)))
        {
            continue;
        }

        let measure = measures[row];
        if params.value_range.is_some_and(|range| {
            !measure.is_some_and(|value| value.is_finite() && range.contains(value))
        }) {
            continue;
        }

        if let (Some(wanted), Some(categories)) = (category_filter, categories) {
            if categories[row].as_deref() != Some(wanted) {
                continue;
            }
        }

        let code = codes.and_then(|column| column.text_at(row));
        if mapping.require_code && !code.as_deref().is_some_and(is_iso3_code) {
            continue;
        }

        rows.push(ViewRow {
            entity,
            code,
            year,
            month: months.as_ref().and_then(|months| months.month(row)),
            measure,
            components: components.iter().map(|values| values[row]).collect(),
            total: totals.and_then(|values| values[row]),
            x_value: x_values.and_then(|values| values[row]),
            marker_size: sizes.and_then(|values| values[row]),
            marker_color: colors.and_then(|values| values[row]),
        });
    }

    let matched = rows.len();
    let shares = params.share_of_year_total.then(|| year_totals(&rows));
    if let Some(count) = params.top_entities {
        rows = top_entities(rows, count);
    }
    if let Some(by_year) = &shares {
        apply_year_share(&mut rows, by_year);
    }
    if let Some(aggregation) = params.aggregation {
        rows = aggregate(rows, aggregation, &mapping.category_all);
    }

    let entity_order = entity_order(&rows, params);
    let color_range = params.color_percentile.and_then(|p| {
        let values = || rows.iter().filter_map(ViewRow::finite_measure);
        Some((finite_min(values())?, percentile(values(), p)?))
    });

    debug!(
        dataset = %dataset.id(),
        measure = %mapping.measure,
        matched,
        rows = rows.len(),
        series = entity_order.len(),
        "query evaluated"
    );

    Ok(FilteredView {
        dataset: dataset.id().clone(),
        measure_label: mapping.measure.clone(),
        component_labels: mapping.components.iter().cloned().collect(),
        rows,
        entity_order,
        color_range,
    })
}

fn optional_numeric<'a>(
    dataset: &'a Dataset,
    column: Option<&str>,
) -> DashResult<Option<&'a [Option<f64>]>> {
    column.map(|column| dataset.numeric(column)).transpose()
}

fn entity_order(rows: &[ViewRow], params: &ParameterSet) -> Vec<String> {
    let present: IndexSet<&str> = rows.iter().map(|row| row.entity.as_str()).collect();
    if params.entities.is_empty() {
        return present.into_iter().map(str::to_owned).collect();
    }
    params
        .entities
        .iter()
        .filter(|entity| present.contains(entity.as_str()))
        .cloned()
        .collect()
}
