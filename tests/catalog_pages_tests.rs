use std::sync::Arc;

use approx::assert_relative_eq;
use chrono::NaiveDate;
use climate_dash::binding::{OutputUpdate, PageSession, ParameterValue};
use climate_dash::chart::{ChartDescription, TraceMode};
use climate_dash::core::{Column, Dataset, DatasetRegistry};
use climate_dash::pages::builtin_config;

fn registry(datasets: Vec<Dataset>) -> Arc<DatasetRegistry> {
    let mut registry = DatasetRegistry::new();
    for dataset in datasets {
        registry.insert(dataset).expect("insert dataset");
    }
    Arc::new(registry)
}

fn open(page: &str, datasets: Vec<Dataset>) -> PageSession {
    let config = builtin_config().expect("builtin config");
    let page = config.page(page).cloned().expect("builtin page");
    PageSession::open(Arc::new(page), registry(datasets))
}

fn chart<'a>(session: &'a PageSession, output: &str) -> &'a ChartDescription {
    session
        .output(output)
        .and_then(|slot| slot.content())
        .and_then(|content| content.as_chart())
        .expect("chart output")
}

fn updated_ids(updates: &[OutputUpdate]) -> Vec<&str> {
    updates.iter().map(|u| u.output_id.as_str()).collect()
}

fn date(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

#[test]
fn temperature_map_title_carries_the_selected_year() {
    let temperatures = Dataset::from_columns(
        "land_temperature",
        vec![
            Column::categorical("Country", vec![Some("India"), Some("India"), Some("Peru")]),
            Column::date("dt", vec![date(2013, 1), date(2013, 2), date(2013, 1)]),
            Column::numeric("AverageTemperature", vec![Some(20.0), Some(22.0), Some(10.0)]),
        ],
    )
    .expect("temperatures");
    let session = open("surface-temperature", vec![temperatures]);

    let map = chart(&session, "temperature-map");
    assert_eq!(map.layout.title, "Average land temperature in countries (2013)");
    assert!(map.frames.is_empty());
    let trace = map.traces[0].as_choropleth().expect("map trace");
    assert_eq!(trace.locations, ["India", "Peru"]);
    assert_eq!(trace.values, [21.0, 10.0]);
}

#[test]
fn gdp_maps_follow_the_continent_selector() {
    let correlation = |id: &str| {
        Dataset::from_columns(
            id,
            vec![
                Column::categorical("Country", vec![Some("India"), Some("Peru")]),
                Column::categorical("Continent", vec![Some("Asia"), Some("South America")]),
                Column::numeric("Rho", vec![Some(0.5), Some(-0.2)]),
            ],
        )
        .expect("correlation")
    };
    let mut session = open(
        "gdp-correlation",
        vec![
            correlation("gdp_emissions_correlation"),
            correlation("gdp_temperature_correlation"),
        ],
    );

    let updates = session.apply(ParameterValue::Category(Some("Asia".into())));
    assert_eq!(
        updated_ids(&updates),
        [
            "emissions-map",
            "emissions-tiles",
            "temperature-map",
            "temperature-tiles"
        ]
    );
    for output in ["emissions-map", "temperature-map"] {
        let trace = chart(&session, output).traces[0]
            .as_choropleth()
            .expect("map trace");
        assert_eq!(trace.locations, ["India"]);
    }

    session.apply(ParameterValue::Category(Some("World".into())));
    let trace = chart(&session, "emissions-map").traces[0]
        .as_choropleth()
        .expect("map trace");
    assert_eq!(trace.locations, ["India", "Peru"]);
}

fn per_capita() -> Dataset {
    Dataset::from_columns(
        "co2_per_capita",
        vec![
            Column::categorical(
                "Entity",
                vec![Some("India"), Some("Peru"), Some("India"), Some("Peru")],
            ),
            Column::numeric(
                "Year",
                vec![Some(2021.0), Some(2021.0), Some(2022.0), Some(2022.0)],
            ),
            Column::numeric(
                "Annual CO₂ emissions (per capita)",
                vec![Some(1.9), Some(1.8), Some(2.0), Some(1.7)],
            ),
        ],
    )
    .expect("per capita")
}

/// Ten countries `C0..C9` over 2000 and 2001; `Ci` emits `i + 1` then
/// `2 * (i + 1)`, so yearly totals are 55 and 110.
fn by_country() -> Dataset {
    let mut entities = Vec::new();
    let mut years = Vec::new();
    let mut values = Vec::new();
    for index in 0..10 {
        for (year, factor) in [(2000.0, 1.0), (2001.0, 2.0)] {
            entities.push(Some(format!("C{index}")));
            years.push(Some(year));
            values.push(Some(factor * f64::from(index + 1)));
        }
    }
    Dataset::from_columns(
        "co2_by_country",
        vec![
            Column::categorical("Entity", entities),
            Column::numeric("Year", years),
            Column::numeric("Annual CO2", values),
        ],
    )
    .expect("by country")
}

#[test]
fn co2_overview_renders_map_and_selected_trend() {
    let mut session = open("co2-overview", vec![per_capita(), by_country()]);

    let map = chart(&session, "per-capita-map");
    assert_eq!(
        map.layout.title,
        "Annual CO₂ Emissions per Capita (2022) (in tonnes per person)"
    );
    let color = map.layout.color_axis.as_ref().expect("color axis");
    assert_eq!((color.min, color.max), (0.0, 20.0));
    let trace = map.traces[0].as_choropleth().expect("map trace");
    assert_eq!(trace.locations, ["India", "Peru"]);

    let trend = chart(&session, "per-capita-trend");
    assert_eq!(trend.layout.title, "CO₂ emissions (per capita) trend - India");
    let line = trend.traces[0].as_line().expect("trend line");
    assert_eq!(line.mode, TraceMode::LinesMarkers);
    assert_eq!(line.points.len(), 2);

    let updates = session.apply(ParameterValue::Entities(vec!["Peru".into()]));
    assert_eq!(updated_ids(&updates), ["per-capita-trend"]);
    assert_eq!(
        chart(&session, "per-capita-trend").layout.title,
        "CO₂ emissions (per capita) trend - Peru"
    );
}

#[test]
fn co2_overview_ranks_top_emitters_and_their_shares() {
    let session = open("co2-overview", vec![per_capita(), by_country()]);
    let expected: Vec<String> = (2..10).rev().map(|i| format!("C{i}")).collect();

    let top = chart(&session, "top-emitters");
    assert_eq!(top.trace_names().collect::<Vec<_>>(), expected);
    let leader = top.traces[0].as_line().expect("leader line");
    assert_eq!(leader.points.len(), 2);
    assert_relative_eq!(leader.points[1].y, 20.0);

    let share = chart(&session, "top-emitter-share");
    assert_eq!(share.trace_names().collect::<Vec<_>>(), expected);
    let leader = share.traces[0].as_line().expect("leader share");
    assert_relative_eq!(leader.points[0].y, 10.0 / 55.0 * 100.0, epsilon = 1e-9);
    assert_relative_eq!(leader.points[1].y, 20.0 / 110.0 * 100.0, epsilon = 1e-9);

    let world = chart(&session, "world-total");
    assert_eq!(world.trace_names().collect::<Vec<_>>(), ["World"]);
    let totals: Vec<(f64, f64)> = world.traces[0]
        .as_line()
        .expect("world line")
        .points
        .iter()
        .map(|p| (p.x, p.y))
        .collect();
    assert_eq!(totals, [(2000.0, 55.0), (2001.0, 110.0)]);
}

#[test]
fn population_scatter_plots_emissions_against_population() {
    let population = Dataset::from_columns(
        "population_and_co2",
        vec![
            Column::categorical("Entity", vec![Some("India"), Some("Peru"), Some("Chad")]),
            Column::numeric(
                "Annual CO₂ emissions",
                vec![Some(2.7e9), Some(5.0e7), Some(1.0e6)],
            ),
            Column::numeric(
                "Population (2020)",
                vec![Some(1.38e9), Some(3.3e7), Some(1.6e7)],
            ),
            Column::numeric(
                "Land Area (Km²)",
                vec![Some(2.97e6), Some(1.28e6), Some(1.26e6)],
            ),
            Column::numeric("Density (P/Km²)", vec![Some(8.9), Some(4.7), Some(3.6)]),
        ],
    )
    .expect("population");
    let session = open("climate-indicators", vec![population]);

    let scatter = chart(&session, "population-vs-co2");
    assert_eq!(scatter.layout.title, "Population v. CO2 Emission, 2020");
    assert!(scatter.layout.x_axis.log_scale);
    assert!(scatter.layout.y_axis.log_scale);
    assert!(!scatter.layout.show_legend);
    let color = scatter.layout.color_axis.as_ref().expect("color axis");
    assert_eq!(color.scale, "Temps");
    assert_eq!((color.min, color.max), (3.6, 8.9));

    assert_eq!(scatter.traces.len(), 1);
    let trace = scatter.traces[0].as_line().expect("scatter trace");
    assert_eq!(trace.mode, TraceMode::Markers);
    assert_eq!(trace.text, ["Chad", "Peru", "India"]);
    let xy: Vec<(f64, f64)> = trace.points.iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(xy, [(1.0e6, 1.6e7), (5.0e7, 3.3e7), (2.7e9, 1.38e9)]);
    assert_eq!(trace.marker_sizes, [1.26e6, 1.28e6, 2.97e6]);
    assert_eq!(trace.marker_colors, [3.6, 4.7, 8.9]);
}
