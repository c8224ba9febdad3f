use approx::abs_diff_eq;
use climate_dash::chart::{ChartDescription, ChartOptions, SpiralOptions, build};
use climate_dash::core::{ChartKind, DatasetId};
use climate_dash::query::{FilteredView, ViewRow};
use proptest::prelude::*;
use smallvec::smallvec;

const ENTITIES: [&str; 3] = ["India", "Peru", "Chad"];

fn view(rows: &[(usize, i32, Option<f64>)]) -> FilteredView {
    let mut view = FilteredView::empty(DatasetId::new("prop"), "CO2");
    for (entity, year, measure) in rows {
        let mut row = ViewRow::new(ENTITIES[*entity], Some(*year), *measure);
        row.code = Some(ENTITIES[*entity][..3].to_uppercase());
        view.rows.push(row);
        if !view.entity_order.iter().any(|e| e == ENTITIES[*entity]) {
            view.entity_order.push(ENTITIES[*entity].to_owned());
        }
    }
    view
}

fn row_strategy() -> impl Strategy<Value = (usize, i32, Option<f64>)> {
    (
        0usize..ENTITIES.len(),
        1950i32..1960,
        prop::option::of(-500.0f64..500.0),
    )
}

proptest! {
    #[test]
    fn building_is_deterministic_and_json_stable(
        rows in prop::collection::vec(row_strategy(), 0..40),
        kind_index in 0usize..4
    ) {
        let kind = [
            ChartKind::TimeSeries,
            ChartKind::Scatter,
            ChartKind::Choropleth,
            ChartKind::Bar,
        ][kind_index];
        let view = view(&rows);
        let options = ChartOptions::titled("CO2 in {year}");

        let first = build(&view, kind, &options).expect("build");
        let second = build(&view, kind, &options).expect("build");
        prop_assert_eq!(&first, &second);

        let json = first.to_json_contract_v1_pretty().expect("json");
        let restored = ChartDescription::from_json_compat_str(&json).expect("parse");
        prop_assert_eq!(restored.kind, first.kind);
        prop_assert_eq!(restored.traces.len(), first.traces.len());
        prop_assert_eq!(restored.frames.len(), first.frames.len());
    }

    #[test]
    fn line_points_are_sorted_and_finite(rows in prop::collection::vec(row_strategy(), 0..40)) {
        let view = view(&rows);
        let chart = build(&view, ChartKind::TimeSeries, &ChartOptions::default()).expect("build");

        let with_values = view
            .entity_order
            .iter()
            .filter(|entity| view.rows_for(entity).any(|row| row.finite_measure().is_some()))
            .count();
        prop_assert_eq!(chart.traces.len(), with_values);
        for trace in &chart.traces {
            let line = trace.as_line().expect("line trace");
            prop_assert!(line.points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
            prop_assert!(line.points.windows(2).all(|pair| pair[0].x <= pair[1].x));
        }
    }

    #[test]
    fn map_frames_cover_every_year(rows in prop::collection::vec(row_strategy(), 0..40)) {
        let view = view(&rows);
        let chart = build(&view, ChartKind::Choropleth, &ChartOptions::default()).expect("build");

        let years = view.years();
        if years.len() > 1 {
            let names: Vec<String> = chart.frames.iter().map(|f| f.name.clone()).collect();
            let expected: Vec<String> = years.iter().map(ToString::to_string).collect();
            prop_assert_eq!(names, expected);
        } else {
            prop_assert!(chart.frames.is_empty());
        }
        for trace in chart.frames.iter().flat_map(|f| &f.traces).chain(&chart.traces) {
            let map = trace.as_choropleth().expect("map trace");
            prop_assert_eq!(map.locations.len(), map.values.len());
            prop_assert_eq!(map.hover_names.len(), map.values.len());
        }
    }

    #[test]
    fn stacked_segments_sum_to_component_totals(
        parts in prop::collection::vec(
            (prop::option::of(0.0f64..100.0), prop::option::of(0.0f64..100.0)),
            1..20
        )
    ) {
        let mut view = FilteredView::empty(DatasetId::new("prop"), "total");
        view.component_labels = vec!["coal".to_owned(), "oil".to_owned()];
        for (index, (coal, oil)) in parts.iter().enumerate() {
            let total = coal.unwrap_or(0.0) + oil.unwrap_or(0.0);
            let mut row = ViewRow::new(format!("E{index}"), Some(2020), Some(total));
            row.components = smallvec![*coal, *oil];
            view.entity_order.push(row.entity.clone());
            view.rows.push(row);
        }

        let chart = build(&view, ChartKind::StackedBar, &ChartOptions::default()).expect("build");
        prop_assert_eq!(chart.traces.len(), 2);
        let bars: Vec<_> = chart.traces.iter().map(|t| t.as_bar().expect("bar")).collect();
        for (index, row) in view.rows.iter().enumerate() {
            let stacked = bars[0].values[index] + bars[1].values[index];
            prop_assert!(abs_diff_eq!(stacked, row.measure.expect("total"), epsilon = 1e-9));
        }
    }

    #[test]
    fn spiral_radii_stay_within_the_scale(
        anomalies in prop::collection::vec(-3.0f64..3.0, 1..48)
    ) {
        let mut view = FilteredView::empty(DatasetId::new("anomaly"), "Anomaly");
        for (index, value) in anomalies.iter().enumerate() {
            let mut row = ViewRow::new("1880", Some(1880 + (index / 12) as i32), Some(*value));
            row.month = Some((index % 12) as u32 + 1);
            view.rows.push(row);
        }
        view.entity_order.push("1880".to_owned());
        let spiral = SpiralOptions::default();
        let options = ChartOptions::titled("Climate Spiral").with_spiral(spiral.clone());

        let chart = build(&view, ChartKind::Spiral3d, &options).expect("build");
        let data = chart.traces[0].as_scatter3d().expect("spiral trace");
        prop_assert_eq!(data.points.len(), anomalies.len());
        for point in &data.points {
            let radius = point.x.hypot(point.y);
            prop_assert!(radius <= spiral.radius_scale + 1e-9);
        }
        prop_assert!(data.points.windows(2).all(|pair| pair[0].z <= pair[1].z));
    }
}
