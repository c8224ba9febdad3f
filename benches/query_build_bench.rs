use climate_dash::chart::{ChartOptions, build};
use climate_dash::core::{ChartKind, Column, Dataset, YearRange};
use climate_dash::query::{Aggregation, ColumnMapping, GroupBy, ParameterSet, query};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const ENTITIES: usize = 200;
const YEARS: i32 = 100;

fn iso_like_code(index: usize) -> String {
    let letter = |n: usize| char::from(b'A' + (n % 26) as u8);
    [letter(index / 676), letter(index / 26), letter(index)]
        .into_iter()
        .collect()
}

fn dataset_20k() -> Dataset {
    let rows = ENTITIES * YEARS as usize;
    let mut entities = Vec::with_capacity(rows);
    let mut codes = Vec::with_capacity(rows);
    let mut years = Vec::with_capacity(rows);
    let mut values = Vec::with_capacity(rows);
    for e in 0..ENTITIES {
        for y in 0..YEARS {
            entities.push(Some(format!("Entity {e:03}")));
            codes.push(Some(iso_like_code(e)));
            years.push(Some(f64::from(1923 + y)));
            values.push(Some((e as f64 + 1.0) * (f64::from(y) * 0.37).sin().abs() * 1_000.0));
        }
    }
    Dataset::from_columns(
        "bench",
        vec![
            Column::categorical("Entity", entities),
            Column::categorical("Code", codes),
            Column::numeric("Year", years),
            Column::numeric("CO2", values),
        ],
    )
    .expect("bench dataset")
}

fn bench_time_series_20k(c: &mut Criterion) {
    let dataset = dataset_20k();
    let mapping = ColumnMapping::new("CO2");
    let params = ParameterSet::new(ChartKind::TimeSeries)
        .with_entities(["Entity 001", "Entity 050", "Entity 150"]);
    let options = ChartOptions::titled("bench");

    c.bench_function("query_build_time_series_20k", |b| {
        b.iter(|| {
            let view = query(black_box(&dataset), &mapping, &params).expect("query");
            let _ = build(&view, ChartKind::TimeSeries, &options).expect("build");
        })
    });
}

fn bench_choropleth_frames_20k(c: &mut Criterion) {
    let dataset = dataset_20k();
    let mapping = ColumnMapping::new("CO2").with_code("Code");
    let params = ParameterSet::new(ChartKind::Choropleth).with_color_percentile(98.0);
    let options = ChartOptions::titled("bench");

    c.bench_function("query_build_choropleth_frames_20k", |b| {
        b.iter(|| {
            let view = query(black_box(&dataset), &mapping, &params).expect("query");
            let _ = build(&view, ChartKind::Choropleth, &options).expect("build");
        })
    });
}

fn bench_top_n_bar_20k(c: &mut Criterion) {
    let dataset = dataset_20k();
    let mapping = ColumnMapping::new("CO2");
    let params = ParameterSet::new(ChartKind::Bar)
        .with_year_range(YearRange::new(2000, 2022).expect("range"))
        .with_aggregation(Aggregation::sum_by(GroupBy::Entity).with_top_n(20));
    let options = ChartOptions::titled("bench");

    c.bench_function("query_build_top_20_bar_20k", |b| {
        b.iter(|| {
            let view = query(black_box(&dataset), &mapping, &params).expect("query");
            let _ = build(&view, ChartKind::Bar, &options).expect("build");
        })
    });
}

criterion_group!(
    benches,
    bench_time_series_20k,
    bench_choropleth_frames_20k,
    bench_top_n_bar_20k
);
criterion_main!(benches);
