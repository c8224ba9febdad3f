//! Built-in climate dashboard: dataset declarations and page layouts.
//!
//! Paths are relative to the dashboard data root.

use crate::binding::{OutputBinding, ParameterKey};
use crate::chart::{BarMode, ChartOptions, LocationMode, Orientation, SeriesLayout, TraceMode, XField};
use crate::core::{
    ChartKind, DatasetSource, DatasetSpec, DerivedColumn, LoaderOptions, ValueRange, YearRange,
};
use crate::error::DashResult;
use crate::query::{Aggregation, ColumnMapping, GroupBy, ParameterSet, SummaryOptions};

use super::config::{DashboardConfig, PageConfig};

const ANNUAL_CO2: &str = "annual_co2";
const REGIONAL_CO2: &str = "regional_co2";
const CO2_SHARE: &str = "co2_share";
const CO2_GROWTH: &str = "co2_growth";
const CO2_BY_SOURCE: &str = "co2_by_source";
const FOSSIL_LAND_USE: &str = "fossil_land_use";
const LAND_TEMPERATURE: &str = "land_temperature";
const TEMPERATURE_ANOMALY: &str = "temperature_anomaly";
const GDP_EMISSIONS: &str = "gdp_emissions_correlation";
const GDP_TEMPERATURE: &str = "gdp_temperature_correlation";
const POPULATION_CO2: &str = "population_co2_correlation";
const POPULATION_TEMPERATURE: &str = "population_temperature_correlation";
const POPULATION_DENSITY: &str = "population_and_co2";
const GREENHOUSE_GASES: &str = "greenhouse_gases";
const CO2_PER_CAPITA: &str = "co2_per_capita";
const CO2_BY_COUNTRY: &str = "co2_by_country";

const ANNUAL_CO2_MEASURE: &str = "Annual CO₂ emissions";
const SOURCE_COLUMNS: [&str; 6] = ["coal", "oil", "gas", "flaring", "cement", "other"];
const SOURCE_COLORS: [&str; 6] = [
    "#606060", "#9C0000", "#800070", "#A52A2A", "#008000", "#0000AA",
];
const SOURCE_TOTAL: &str = "Total CO₂ emissions";
const PER_CAPITA_MEASURE: &str = "Annual CO₂ emissions (per capita)";
const COUNTRY_CO2_MEASURE: &str = "Annual CO2";
const TOP_EMITTERS: usize = 8;

/// Configuration of the complete climate dashboard.
pub fn builtin_config() -> DashResult<DashboardConfig> {
    let config = DashboardConfig {
        data_root: None,
        datasets: builtin_datasets(),
        pages: vec![
            annual_co2_page()?,
            co2_overview_page(),
            regional_co2_page(),
            co2_share_page(),
            co2_growth_page()?,
            co2_by_source_page(),
            fossil_land_use_page(),
            surface_temperature_page(),
            climate_spiral_page()?,
            gdp_correlation_page(),
            population_correlation_page(),
            climate_indicators_page(),
        ],
    };
    config.validate()?;
    Ok(config)
}

fn csv_spec(id: &str, path: &str) -> DatasetSpec {
    DatasetSpec {
        id: id.into(),
        source: DatasetSource::csv(path),
        options: LoaderOptions::default(),
    }
}

fn excel_spec(id: &str, path: &str, sheet: Option<&str>) -> DatasetSpec {
    DatasetSpec {
        id: id.into(),
        source: DatasetSource::excel(path, sheet),
        options: LoaderOptions::default(),
    }
}

fn with_options(mut spec: DatasetSpec, options: LoaderOptions) -> DatasetSpec {
    spec.options = options;
    spec
}

fn builtin_datasets() -> Vec<DatasetSpec> {
    let by_source = SOURCE_COLUMNS.iter().fold(
        LoaderOptions::default(),
        |options, source| {
            let label = if *source == "other" { "other industry" } else { *source };
            options.with_rename(format!("Annual CO₂ emissions from {label} (per capita)"), *source)
        },
    );

    vec![
        csv_spec(ANNUAL_CO2, "annual_co2_emission/annual-co2-emissions-per-country.csv"),
        csv_spec(REGIONAL_CO2, "annual_co2_emission/annual-co-emissions-by-region.csv"),
        csv_spec(CO2_SHARE, "annual_share_of_co2/annual-share-of-co2-emissions.csv"),
        csv_spec(CO2_GROWTH, "annual_co2_growth/change-co2-annual-pct.csv"),
        with_options(
            csv_spec(CO2_BY_SOURCE, "CO2_Emissions/per-capita-co2-by-source.csv"),
            by_source
                .with_derived(DerivedColumn::Sum {
                    name: SOURCE_TOTAL.to_owned(),
                    columns: SOURCE_COLUMNS.iter().map(|c| (*c).to_owned()).collect(),
                })
                .with_min_year_exclusive("Year", 1850),
        ),
        excel_spec(
            FOSSIL_LAND_USE,
            "sources_co2_emission/co2_emm_annual_fossil_land_use.xlsx",
            None,
        ),
        with_options(
            csv_spec(
                LAND_TEMPERATURE,
                "Surface Temperatures/GlobalLandTemperaturesByCountry.csv",
            ),
            LoaderOptions::default().with_entity_column("Country"),
        ),
        with_options(
            csv_spec(TEMPERATURE_ANOMALY, "Surface Temperatures/global_monthly_anomaly.csv"),
            LoaderOptions::default().with_entity_column("Year"),
        ),
        with_options(
            excel_spec(
                GDP_EMISSIONS,
                "GDP/Correlation - Emissions vs GDP.xlsx",
                Some("Correlation-Country"),
            ),
            LoaderOptions::default().with_entity_column("Country"),
        ),
        with_options(
            excel_spec(
                GDP_TEMPERATURE,
                "GDP/Correlation - GDP vs Temp.xlsx",
                Some("Correlation-Method 2"),
            ),
            LoaderOptions::default().with_entity_column("Country"),
        ),
        with_options(
            csv_spec(POPULATION_CO2, "Population/correlation - co2 vs population.csv"),
            LoaderOptions::default().with_entity_column("Country"),
        ),
        with_options(
            csv_spec(POPULATION_TEMPERATURE, "Population/correlation_temperature.csv"),
            LoaderOptions::default().with_entity_column("Country"),
        ),
        with_options(
            csv_spec(POPULATION_DENSITY, "population_and_co2/population_and_co2.csv"),
            LoaderOptions::default().with_derived(DerivedColumn::Log2p1 {
                column: "Density (P/Km²)".to_owned(),
            }),
        ),
        with_options(
            csv_spec(GREENHOUSE_GASES, "population_and_co2/all_greenhouse_gases.csv"),
            LoaderOptions::default().with_entity_column("year"),
        ),
        csv_spec(CO2_PER_CAPITA, "CO2_Emissions/co-emissions-per-capita.csv"),
        csv_spec(CO2_BY_COUNTRY, "CO2_Emissions/CO2_emission_by_countries.csv"),
    ]
}

fn annual_co2_page() -> DashResult<PageConfig> {
    let mapping = ColumnMapping::new(ANNUAL_CO2_MEASURE).with_code("Code");
    let top_20 = ParameterSet::new(ChartKind::Bar)
        .with_year_range(YearRange::new(2000, 2022)?)
        .with_aggregation(Aggregation::sum_by(GroupBy::Entity).with_top_n(20));

    Ok(PageConfig::new("annual-co2", "Annual CO₂ Emissions by Country")
        .with_defaults(
            ParameterSet::new(ChartKind::Choropleth)
                .with_entities([
                    "United States",
                    "India",
                    "China",
                    "Africa",
                    "South America",
                    "North America (excl. USA)",
                ])
                .with_color_percentile(98.0),
        )
        .with_output(
            OutputBinding::chart(
                "emissions",
                ANNUAL_CO2,
                mapping.clone(),
                ChartOptions::titled("CO2 Emissions by Country Over Time")
                    .with_axis_titles("Year", "CO2 Emissions (in tons)")
                    .with_color_scale("Viridis"),
            )
            .depending_on([ParameterKey::Entities, ParameterKey::ChartKind]),
        )
        .with_output(
            OutputBinding::chart(
                "top-20",
                ANNUAL_CO2,
                mapping.countries_only(),
                ChartOptions::titled(
                    "Total CO₂ Emission Between Years 2000 and 2022 - Top 20 Countries",
                )
                .with_axis_titles("Country", "Total Emissions"),
            )
            .with_params(top_20),
        ))
}

/// Per-capita map with a trend for the selected country, plus the top
/// emitters, their share of each year's total and the world total.
fn co2_overview_page() -> PageConfig {
    let per_capita = ColumnMapping::new(PER_CAPITA_MEASURE);
    let by_country = ColumnMapping::new(COUNTRY_CO2_MEASURE);
    let emission_axes = |title: &str| {
        ChartOptions::titled(title).with_axis_titles("Year", "Annual CO2 emission")
    };

    PageConfig::new("co2-overview", "CO2 Emissions Visualisation")
        .with_defaults(ParameterSet::new(ChartKind::TimeSeries).with_entities(["India"]))
        .with_output(
            OutputBinding::chart(
                "per-capita-map",
                CO2_PER_CAPITA,
                per_capita.clone(),
                ChartOptions::titled(
                    "Annual CO₂ Emissions per Capita ({year}) (in tonnes per person)",
                )
                .with_location_mode(LocationMode::CountryNames)
                .with_color_scale("YlOrBr")
                .with_color_range(0.0, 20.0),
            )
            .with_params(ParameterSet::new(ChartKind::Choropleth).with_year(2022)),
        )
        .with_output(
            OutputBinding::chart(
                "per-capita-trend",
                CO2_PER_CAPITA,
                per_capita,
                ChartOptions::titled("CO₂ emissions (per capita) trend - {entity}")
                    .with_axis_titles("Year", "Per Capita CO₂ emissions")
                    .with_line_mode(TraceMode::LinesMarkers),
            )
            .depending_on([ParameterKey::Entities]),
        )
        .with_output(
            OutputBinding::chart(
                "top-emitters",
                CO2_BY_COUNTRY,
                by_country.clone(),
                emission_axes("Annual CO2 Emission by top 8 countries"),
            )
            .with_params(ParameterSet::new(ChartKind::TimeSeries).with_top_entities(TOP_EMITTERS)),
        )
        .with_output(
            OutputBinding::chart(
                "top-emitter-share",
                CO2_BY_COUNTRY,
                by_country.clone(),
                ChartOptions::titled("Share of CO2 Emissions by Top 8 Countries")
                    .with_axis_titles("Year", "Share of CO2 Emissions (%)"),
            )
            .with_params(
                ParameterSet::new(ChartKind::TimeSeries)
                    .with_top_entities(TOP_EMITTERS)
                    .with_share_of_year_total()
                    .with_aggregation(Aggregation::sum_by(GroupBy::EntityYear)),
            ),
        )
        .with_output(
            OutputBinding::chart(
                "world-total",
                CO2_BY_COUNTRY,
                by_country,
                emission_axes("Annual CO2 Emission by World"),
            )
            .with_params(
                ParameterSet::new(ChartKind::TimeSeries)
                    .with_aggregation(Aggregation::sum_by(GroupBy::Year)),
            ),
        )
}

fn regional_co2_page() -> PageConfig {
    PageConfig::new("regional-co2", "Annual CO₂ Emissions by Region")
        .with_defaults(
            ParameterSet::new(ChartKind::TimeSeries)
                .with_entities(["United States", "Europe", "Asia", "Africa", "Oceania"])
                .with_aggregation(Aggregation::sum_by(GroupBy::EntityYear)),
        )
        .with_output(
            OutputBinding::chart(
                "regions",
                REGIONAL_CO2,
                ColumnMapping::new("Annual CO₂ emissions by region"),
                ChartOptions::titled("Change in CO₂ Emission Between Years 1750 and 2020 - Regions")
                    .with_axis_titles("Year", "Annual CO₂ emissions by region"),
            )
            .depending_on([ParameterKey::Entities]),
        )
}

fn co2_share_page() -> PageConfig {
    let mapping = ColumnMapping::new("Share of global annual CO₂ emissions").with_code("Code");
    PageConfig::new("co2-share", "Share of Global CO₂ Emissions")
        .with_defaults(
            ParameterSet::new(ChartKind::TimeSeries)
                .with_entities(["United States", "China", "India"])
                .with_year(1750),
        )
        .with_output(
            OutputBinding::chart(
                "share-map",
                CO2_SHARE,
                mapping.clone(),
                ChartOptions::titled("Global CO2 Emissions Share (%) in {year}")
                    .with_color_range(0.0, 20.0),
            )
            .with_params(ParameterSet::new(ChartKind::Choropleth).with_year(1750))
            .depending_on([ParameterKey::Year]),
        )
        .with_output(
            OutputBinding::chart(
                "share-trend",
                CO2_SHARE,
                mapping,
                ChartOptions::titled("Share of CO2 emissions (%) by countries over time")
                    .with_axis_titles("Year", "Share of CO2 Emission (%)"),
            )
            .with_params(ParameterSet::new(ChartKind::TimeSeries))
            .depending_on([ParameterKey::Entities, ParameterKey::ChartKind]),
        )
}

fn co2_growth_page() -> DashResult<PageConfig> {
    let mapping = ColumnMapping::new("Annual CO₂ emissions growth (%)").with_code("Code");
    let growth = ValueRange::new(-50.0, 50.0)?;
    Ok(PageConfig::new("co2-growth", "Annual CO₂ Growth")
        .with_defaults(
            ParameterSet::new(ChartKind::TimeSeries)
                .with_entities(["World"])
                .with_year(1750)
                .with_value_range(growth),
        )
        .with_output(
            OutputBinding::chart(
                "growth-map",
                CO2_GROWTH,
                mapping.clone(),
                ChartOptions::titled("Annual CO₂ emissions growth (%) in {year}")
                    .with_color_range(0.0, 20.0),
            )
            .with_params(
                ParameterSet::new(ChartKind::Choropleth)
                    .with_year(1750)
                    .with_value_range(growth),
            )
            .depending_on([ParameterKey::Year, ParameterKey::ValueRange]),
        )
        .with_output(
            OutputBinding::chart(
                "growth-trend",
                CO2_GROWTH,
                mapping,
                ChartOptions::titled("Annual percentage change in CO₂ emissions")
                    .with_axis_titles("Year", "Annual percentage change in CO₂ emissions"),
            )
            .with_params(ParameterSet::new(ChartKind::TimeSeries))
            .depending_on([ParameterKey::Entities, ParameterKey::ChartKind]),
        ))
}

fn co2_by_source_page() -> PageConfig {
    PageConfig::new("co2-by-source", "CO₂ Emissions per Capita by Source")
        .with_defaults(
            ParameterSet::new(ChartKind::StackedBar)
                .with_entities(["World", "India", "United States", "China", "South America"])
                .with_year(2022),
        )
        .with_output(
            OutputBinding::chart(
                "sources",
                CO2_BY_SOURCE,
                ColumnMapping::new(SOURCE_TOTAL)
                    .with_components(SOURCE_COLUMNS)
                    .with_total(SOURCE_TOTAL),
                ChartOptions::titled(
                    "Per Capita CO₂ Emissions by Source ({year}) (in tonnes per person)",
                )
                .with_axis_titles("Total CO₂ Emissions (Metric Tons)", "Country")
                .with_orientation(Orientation::Horizontal)
                .with_bar_mode(BarMode::Stack)
                .with_component_colors(SOURCE_COLORS),
            )
            .depending_on([ParameterKey::Entities, ParameterKey::Year]),
        )
}

fn fossil_land_use_page() -> PageConfig {
    PageConfig::new("fossil-vs-land-use", "Sources of CO₂ Emission")
        .with_defaults(ParameterSet::new(ChartKind::TimeSeries).with_entities(["India"]))
        .with_output(
            OutputBinding::chart(
                "sources",
                FOSSIL_LAND_USE,
                ColumnMapping::new("Total CO2 Emission").with_components([
                    "Total CO2 Emission",
                    "CO2 Emission from Fossil Fuels",
                    "CO2 Emission from Land Use Change",
                ]),
                ChartOptions::titled("CO2 Emissions")
                    .with_axis_titles("Year", "CO2 Emission (metric tons)")
                    .with_series_layout(SeriesLayout::PerComponent)
                    .with_line_mode(TraceMode::LinesMarkers),
            )
            .depending_on([ParameterKey::Entities]),
        )
}

fn surface_temperature_page() -> PageConfig {
    let mapping = ColumnMapping::new("AverageTemperature")
        .with_entity("Country")
        .with_year("dt")
        .with_month("dt");
    let yearly_mean = ParameterSet::new(ChartKind::Choropleth)
        .with_year(2013)
        .with_aggregation(Aggregation::mean_by(GroupBy::Entity));

    PageConfig::new("surface-temperature", "Surface Temperature")
        .with_defaults(
            ParameterSet::new(ChartKind::TimeSeries)
                .with_entities(["India"])
                .with_year(2013),
        )
        .with_output(
            OutputBinding::chart(
                "temperature-map",
                LAND_TEMPERATURE,
                mapping.clone(),
                ChartOptions::titled("Average land temperature in countries ({year})")
                    .with_location_mode(LocationMode::CountryNames)
                    .with_color_scale("RdBu_r"),
            )
            .with_params(yearly_mean.clone())
            .depending_on([ParameterKey::Year]),
        )
        .with_output(
            OutputBinding::summary(
                "temperature-tiles",
                LAND_TEMPERATURE,
                mapping.clone(),
                SummaryOptions {
                    count_title: Some("Data Available for".to_owned()),
                    highest_title: Some("Max Temp".to_owned()),
                    lowest_title: Some("Min Temp".to_owned()),
                    mean_title: Some("Global Avg Temp".to_owned()),
                    precision: 2,
                    unit: "°C".to_owned(),
                    ..SummaryOptions::default()
                },
            )
            .with_params(yearly_mean)
            .depending_on([ParameterKey::Year]),
        )
        .with_output(
            OutputBinding::chart(
                "monthly",
                LAND_TEMPERATURE,
                mapping,
                ChartOptions::titled("Average land temperature in countries")
                    .with_axis_titles("Month", "Temperature (°C)")
                    .with_x_field(XField::Month)
                    .with_line_mode(TraceMode::LinesMarkers),
            )
            .depending_on([ParameterKey::Entities, ParameterKey::Year]),
        )
}

fn climate_spiral_page() -> DashResult<PageConfig> {
    Ok(PageConfig::new("climate-spiral", "Climate Spiral")
        .with_defaults(
            ParameterSet::new(ChartKind::Spiral3d).with_year_range(YearRange::new(1880, 2023)?),
        )
        .with_output(
            OutputBinding::chart(
                "spiral",
                TEMPERATURE_ANOMALY,
                ColumnMapping::new("Anomaly")
                    .with_entity("Year")
                    .with_month("Month"),
                ChartOptions::titled("Global Surface Temperature Anomaly in {year} Climate Spiral")
                    .with_axis_titles("Year", "")
                    .with_color_scale("Turbo"),
            )
            .depending_on([ParameterKey::YearRange]),
        ))
}

fn gdp_correlation_page() -> PageConfig {
    let mapping = ColumnMapping::new("Rho")
        .with_entity("Country")
        .without_year()
        .with_category("Continent");
    let map = |title: &str| {
        ChartOptions::titled(title)
            .with_location_mode(LocationMode::CountryNames)
            .with_color_range(-1.0, 1.0)
            .with_color_scale("RdBu")
    };
    let tiles = SummaryOptions {
        highest_title: Some("Highest Correlation".to_owned()),
        lowest_title: Some("Lowest Correlation".to_owned()),
        mean_title: Some("Average Correlation".to_owned()),
        ..SummaryOptions::default()
    };

    PageConfig::new("gdp-correlation", "GDP Correlation")
        .with_defaults(ParameterSet::new(ChartKind::Choropleth).with_category("World"))
        .with_output(
            OutputBinding::chart(
                "emissions-map",
                GDP_EMISSIONS,
                mapping.clone(),
                map("Correlation between CO2 emissions and GDP"),
            )
            .depending_on([ParameterKey::Category]),
        )
        .with_output(
            OutputBinding::summary("emissions-tiles", GDP_EMISSIONS, mapping.clone(), tiles.clone())
                .depending_on([ParameterKey::Category]),
        )
        .with_output(
            OutputBinding::chart(
                "temperature-map",
                GDP_TEMPERATURE,
                mapping.clone(),
                map("Correlation between GDP and Temp"),
            )
            .depending_on([ParameterKey::Category]),
        )
        .with_output(
            OutputBinding::summary("temperature-tiles", GDP_TEMPERATURE, mapping, tiles)
                .depending_on([ParameterKey::Category]),
        )
}

fn population_correlation_page() -> PageConfig {
    let mapping = ColumnMapping::new("Correlation")
        .with_entity("Country")
        .without_year();
    let map = |title: &str| {
        ChartOptions::titled(title)
            .with_location_mode(LocationMode::CountryNames)
            .with_color_range(-1.0, 1.0)
    };

    PageConfig::new("population-correlation", "Population Correlation")
        .with_defaults(ParameterSet::new(ChartKind::Choropleth))
        .with_output(OutputBinding::chart(
            "co2-map",
            POPULATION_CO2,
            mapping.clone(),
            map("Correlation World Heatmap for Population vs CO2"),
        ))
        .with_output(OutputBinding::chart(
            "temperature-map",
            POPULATION_TEMPERATURE,
            mapping,
            map("Correlation World Heatmap for Population vs Temperature"),
        ))
}

fn climate_indicators_page() -> PageConfig {
    PageConfig::new("climate-indicators", "Climate Change Indicators")
        .with_defaults(ParameterSet::new(ChartKind::StackedBar))
        .with_output(OutputBinding::chart(
            "greenhouse-gases",
            GREENHOUSE_GASES,
            ColumnMapping::new("total_co2")
                .with_entity("year")
                .with_year("year")
                .with_components(["total_co2", "methane", "nitrous_oxide"]),
            ChartOptions::titled("Annual Gas Emissions")
                .with_axis_titles("Year", "Emissions (million tonnes)")
                .with_bar_mode(BarMode::Group)
                .with_component_colors(["rgb(0, 0, 255)", "rgb(0, 255, 255)", "rgb(255, 0, 0)"]),
        ))
        .with_output(
            OutputBinding::chart(
                "population-vs-co2",
                POPULATION_DENSITY,
                ColumnMapping::new("Population (2020)")
                    .without_year()
                    .with_x_measure(ANNUAL_CO2_MEASURE)
                    .with_size("Land Area (Km²)")
                    .with_color("Density (P/Km²)"),
                ChartOptions::titled("Population v. CO2 Emission, 2020")
                    .with_axis_titles("CO₂ Emission", "Population")
                    .with_x_field(XField::Measure)
                    .with_series_layout(SeriesLayout::Combined)
                    .with_color_scale("Temps")
                    .with_log_axes(true, true),
            )
            .with_params(ParameterSet::new(ChartKind::Scatter)),
        )
}
