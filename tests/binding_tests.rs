use std::sync::{Arc, Mutex};

use climate_dash::DashError;
use climate_dash::binding::{
    OutputBinding, OutputObserver, OutputState, OutputUpdate, PageSession, ParameterKey,
    ParameterValue,
};
use climate_dash::chart::ChartOptions;
use climate_dash::core::{ChartKind, Column, Dataset, DatasetRegistry, YearRange};
use climate_dash::pages::PageConfig;
use climate_dash::query::{Aggregation, ColumnMapping, GroupBy, ParameterSet, SummaryOptions};

#[derive(Clone)]
struct RecordingObserver {
    id: String,
    seen: Arc<Mutex<Vec<OutputUpdate>>>,
}

impl RecordingObserver {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn seen_ids(&self) -> Vec<String> {
        self.seen
            .lock()
            .expect("observer lock")
            .iter()
            .map(|update| update.output_id.clone())
            .collect()
    }
}

impl OutputObserver for RecordingObserver {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_update(&mut self, update: &OutputUpdate) {
        self.seen.lock().expect("observer lock").push(update.clone());
    }
}

fn registry() -> Arc<DatasetRegistry> {
    let mut registry = DatasetRegistry::new();
    registry
        .insert(
            Dataset::from_columns(
                "annual_co2",
                vec![
                    Column::categorical(
                        "Entity",
                        vec![Some("India"), Some("Peru"), Some("India"), Some("Peru")],
                    ),
                    Column::categorical(
                        "Code",
                        vec![Some("IND"), Some("PER"), Some("IND"), Some("PER")],
                    ),
                    Column::numeric(
                        "Year",
                        vec![Some(2000.0), Some(2000.0), Some(2001.0), Some(2001.0)],
                    ),
                    Column::numeric("CO2", vec![Some(10.0), Some(2.0), Some(12.0), Some(3.0)]),
                ],
            )
            .expect("emissions"),
        )
        .expect("insert emissions");
    Arc::new(registry)
}

fn page() -> Arc<PageConfig> {
    let mapping = ColumnMapping::new("CO2").with_code("Code");
    Arc::new(
        PageConfig::new("annual-co2", "Annual CO2 emissions")
            .with_defaults(
                ParameterSet::new(ChartKind::TimeSeries)
                    .with_entities(["India"])
                    .with_year(2000),
            )
            .with_output(
                OutputBinding::chart(
                    "trend",
                    "annual_co2",
                    mapping.clone(),
                    ChartOptions::titled("Emissions"),
                )
                .depending_on([ParameterKey::Entities, ParameterKey::ChartKind]),
            )
            .with_output(
                OutputBinding::chart(
                    "map",
                    "annual_co2",
                    mapping.clone(),
                    ChartOptions::titled("Emissions in {year}"),
                )
                .with_params(ParameterSet::new(ChartKind::Choropleth).with_year(2000))
                .depending_on([ParameterKey::Year]),
            )
            .with_output(
                OutputBinding::chart(
                    "top",
                    "annual_co2",
                    mapping.clone().countries_only(),
                    ChartOptions::titled("Top emitters"),
                )
                .with_params(
                    ParameterSet::new(ChartKind::Bar)
                        .with_year_range(YearRange::new(2000, 2001).expect("range"))
                        .with_aggregation(Aggregation::sum_by(GroupBy::Entity).with_top_n(1)),
                ),
            )
            .with_output(
                OutputBinding::summary("tiles", "annual_co2", mapping, SummaryOptions::default())
                    .with_params(ParameterSet::default().with_year(2000))
                    .depending_on([ParameterKey::Year]),
            ),
    )
}

#[test]
fn opening_a_session_renders_every_output() {
    let session = PageSession::open(page(), registry());

    let ids: Vec<&str> = session.outputs().map(|(id, _)| id).collect();
    assert_eq!(ids, ["trend", "map", "top", "tiles"]);
    assert!(
        session
            .outputs()
            .all(|(_, slot)| *slot.state() == OutputState::Idle && slot.content().is_some())
    );

    let trend = session
        .output("trend")
        .and_then(|slot| slot.content())
        .and_then(|content| content.as_chart())
        .expect("trend chart");
    assert_eq!(trend.trace_names().collect::<Vec<_>>(), ["India"]);

    let top = session
        .output("top")
        .and_then(|slot| slot.content())
        .and_then(|content| content.as_chart())
        .expect("top chart");
    let bar = top.traces[0].as_bar().expect("bar");
    assert_eq!(bar.categories, ["India"]);
    assert_eq!(bar.values, [22.0]);
}

#[test]
fn only_dependent_outputs_recompute() {
    let mut session = PageSession::open(page(), registry());

    let updates = session.apply(ParameterValue::Year(Some(2001)));
    let ids: Vec<&str> = updates.iter().map(|u| u.output_id.as_str()).collect();
    assert_eq!(ids, ["map", "tiles"]);

    let map = updates[0]
        .content
        .as_ref()
        .and_then(|content| content.as_chart())
        .expect("map chart");
    assert_eq!(map.layout.title, "Emissions in 2001");

    let updates = session.apply(ParameterValue::Entities(vec!["Peru".into(), "India".into()]));
    let ids: Vec<&str> = updates.iter().map(|u| u.output_id.as_str()).collect();
    assert_eq!(ids, ["trend"]);
    let trend = updates[0]
        .content
        .as_ref()
        .and_then(|content| content.as_chart())
        .expect("trend chart");
    assert_eq!(trend.trace_names().collect::<Vec<_>>(), ["Peru", "India"]);
}

#[test]
fn unchanged_values_recompute_nothing() {
    let mut session = PageSession::open(page(), registry());

    assert!(session.apply(ParameterValue::Year(Some(2000))).is_empty());
    assert!(
        session
            .apply(ParameterValue::Entities(vec!["India".into()]))
            .is_empty()
    );
    assert!(
        !session
            .apply(ParameterValue::ChartKind(ChartKind::Scatter))
            .is_empty()
    );
}

#[test]
fn outputs_without_dependencies_never_recompute() {
    let mut session = PageSession::open(page(), registry());
    let before = session.output("top").cloned().expect("top slot");

    for value in [
        ParameterValue::Year(Some(2001)),
        ParameterValue::Entities(vec!["Peru".into()]),
        ParameterValue::Category(Some("Low income".into())),
    ] {
        let updates = session.apply(value);
        assert!(updates.iter().all(|u| u.output_id != "top"));
    }
    assert_eq!(session.output("top"), Some(&before));
}

#[test]
fn a_failing_output_does_not_affect_its_siblings() {
    let mut session = PageSession::open(page(), registry());

    // "totals" maps no year column, so any year filter fails it.
    let page = Arc::new(
        PageConfig::new("broken", "Broken")
            .with_output(
                OutputBinding::chart(
                    "totals",
                    "annual_co2",
                    ColumnMapping::new("CO2").without_year(),
                    ChartOptions::default(),
                )
                .with_params(ParameterSet::new(ChartKind::Bar))
                .depending_on([ParameterKey::Year]),
            )
            .with_output(
                OutputBinding::chart(
                    "trend",
                    "annual_co2",
                    ColumnMapping::new("CO2"),
                    ChartOptions::default(),
                )
                .depending_on([ParameterKey::Year, ParameterKey::Entities]),
            ),
    );
    let mut broken = PageSession::open(page, registry());
    let updates = broken.apply(ParameterValue::Year(Some(2000)));
    assert_eq!(updates.len(), 2);
    assert!(updates[0].state.is_failed());
    assert!(updates[0].content.is_none());
    assert_eq!(updates[1].state, OutputState::Idle);
    assert!(updates[1].content.is_some());

    let updates = broken.apply(ParameterValue::Year(None));
    assert!(updates.iter().all(|u| u.state == OutputState::Idle));
    assert!(updates.iter().all(|u| u.content.is_some()));

    // Sessions are isolated from each other.
    assert_eq!(session.apply(ParameterValue::Year(Some(2001))).len(), 2);
    assert_eq!(session.params().year, Some(2001));
    assert_eq!(broken.params().year, None);
}

#[test]
fn missing_dataset_fails_only_its_output() {
    let page = Arc::new(
        PageConfig::new("partial", "Partial")
            .with_output(OutputBinding::chart(
                "ghost",
                "not_loaded",
                ColumnMapping::new("CO2"),
                ChartOptions::default(),
            ))
            .with_output(OutputBinding::chart(
                "trend",
                "annual_co2",
                ColumnMapping::new("CO2"),
                ChartOptions::default(),
            )),
    );
    let session = PageSession::open(page, registry());

    let ghost = session.output("ghost").expect("ghost slot");
    assert!(ghost.state().is_failed());
    assert!(ghost.content().is_none());
    assert_eq!(
        session.output("trend").map(|slot| slot.state().clone()),
        Some(OutputState::Idle)
    );
}

#[test]
fn observers_receive_updates_and_reject_duplicates() {
    let mut session = PageSession::open(page(), registry());
    let observer = RecordingObserver::new("view");
    session
        .register_observer(Box::new(observer.clone()))
        .expect("register observer");

    assert!(matches!(
        session.register_observer(Box::new(RecordingObserver::new("view"))),
        Err(DashError::InvalidConfig(_))
    ));
    assert!(matches!(
        session.register_observer(Box::new(RecordingObserver::new(""))),
        Err(DashError::InvalidConfig(_))
    ));
    assert_eq!(session.observer_count(), 1);

    session.apply(ParameterValue::Year(Some(2001)));
    session.apply(ParameterValue::Year(Some(2001)));
    assert_eq!(observer.seen_ids(), ["map", "tiles"]);

    assert!(session.unregister_observer("view"));
    assert!(!session.unregister_observer("view"));
    assert!(!session.has_observer("view"));

    session.apply(ParameterValue::Year(Some(2000)));
    assert_eq!(observer.seen_ids().len(), 2);
}

#[test]
fn raw_control_values_are_parsed() {
    let mut session = PageSession::open(page(), registry());

    let updates = session
        .apply_raw("entities", "Peru | India")
        .expect("entities");
    assert_eq!(updates.len(), 1);
    assert_eq!(
        session.params().entities.iter().collect::<Vec<_>>(),
        ["Peru", "India"]
    );

    session.apply_raw("year", "").expect("clear year");
    assert_eq!(session.params().year, None);

    assert!(matches!(
        session.apply_raw("year", "two thousand"),
        Err(DashError::InvalidParameter { .. })
    ));
    assert!(matches!(
        session.apply_raw("year_range", "2010..2000"),
        Err(DashError::InvalidParameter { .. })
    ));
    assert!(matches!(
        session.apply_raw("colour", "red"),
        Err(DashError::InvalidParameter { .. })
    ));
}

#[test]
fn effective_params_overlay_only_dependency_keys() {
    let binding = OutputBinding::chart(
        "map",
        "annual_co2",
        ColumnMapping::new("CO2"),
        ChartOptions::default(),
    )
    .with_params(ParameterSet::new(ChartKind::Choropleth).with_color_percentile(98.0))
    .depending_on([ParameterKey::Year]);

    let session = ParameterSet::new(ChartKind::Bar)
        .with_year(2010)
        .with_entities(["Peru"]);
    let params = binding.effective_params(&ParameterSet::default(), &session);

    assert_eq!(params.chart_kind, ChartKind::Choropleth);
    assert_eq!(params.year, Some(2010));
    assert!(params.entities.is_empty());
    assert_eq!(params.color_percentile, Some(98.0));
}

#[test]
fn summary_tiles_track_the_year() {
    let mut session = PageSession::open(page(), registry());
    let updates = session.apply(ParameterValue::Year(Some(2001)));
    let tiles = updates
        .iter()
        .find(|u| u.output_id == "tiles")
        .and_then(|u| u.content.as_ref())
        .and_then(|content| content.as_tiles())
        .expect("tiles");

    assert_eq!(tiles[0].title, "Highest");
    assert_eq!(tiles[0].caption, "India");
    assert_eq!(tiles[0].value, "12.0000");
    assert_eq!(tiles[2].caption, "World");
    assert_eq!(tiles[2].value, "7.5000");
}
