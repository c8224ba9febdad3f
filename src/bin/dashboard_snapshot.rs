use std::fs;
use std::path::PathBuf;

use climate_dash::binding::OutputUpdate;
use climate_dash::pages::builtin_config;
use climate_dash::query::ParameterSet;
use climate_dash::{Dashboard, DashboardConfig};
use serde::Serialize;

const SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug)]
struct CliArgs {
    config_path: Option<PathBuf>,
    data_root: Option<PathBuf>,
    page: Option<String>,
    sets: Vec<(String, String)>,
    output_path: Option<PathBuf>,
    list_pages: bool,
}

#[derive(Debug, Serialize)]
struct PageSnapshot<'a> {
    schema_version: u32,
    page: &'a str,
    params: &'a ParameterSet,
    outputs: Vec<OutputUpdate>,
}

fn main() {
    let _ = climate_dash::telemetry::init_default_tracing("warn");
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let mut config = match &args.config_path {
        Some(path) => DashboardConfig::from_path(path).map_err(|err| err.to_string())?,
        None => builtin_config().map_err(|err| err.to_string())?,
    };
    if let Some(root) = args.data_root {
        config.data_root = Some(root);
    }

    let dashboard = Dashboard::load(&config).map_err(|err| err.to_string())?;
    if args.list_pages {
        for page in dashboard.available_pages() {
            println!("{}\t{}", page.id, page.title);
        }
        for entry in dashboard.unavailable_pages() {
            println!("{}\tunavailable: {}", entry.page, entry.reason);
        }
        return Ok(());
    }

    let page_id = args
        .page
        .ok_or_else(|| "missing --page (use --list to see pages)".to_owned())?;
    let mut session = dashboard
        .open_session(&page_id)
        .map_err(|err| err.to_string())?;
    for (key, value) in &args.sets {
        session
            .apply_raw(key, value)
            .map_err(|err| format!("--set {key}={value}: {err}"))?;
    }

    let snapshot = PageSnapshot {
        schema_version: SNAPSHOT_JSON_SCHEMA_V1,
        page: &page_id,
        params: session.params(),
        outputs: session.snapshot(),
    };
    let serialized = serde_json::to_string_pretty(&snapshot)
        .map_err(|err| format!("failed to serialize snapshot: {err}"))?;

    match &args.output_path {
        Some(path) => {
            fs::write(path, format!("{serialized}\n"))
                .map_err(|err| format!("failed to write `{}`: {err}", path.display()))?;
            println!("wrote snapshot of `{page_id}` to {}", path.display());
        }
        None => println!("{serialized}"),
    }
    Ok(())
}

fn parse_args() -> Result<CliArgs, String> {
    let mut parsed = CliArgs {
        config_path: None,
        data_root: None,
        page: None,
        sets: Vec::new(),
        output_path: None,
        list_pages: false,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --config".to_owned())?;
                parsed.config_path = Some(PathBuf::from(value));
            }
            "--data-root" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --data-root".to_owned())?;
                parsed.data_root = Some(PathBuf::from(value));
            }
            "--page" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --page".to_owned())?;
                parsed.page = Some(value);
            }
            "--set" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --set".to_owned())?;
                let (key, raw) = value
                    .split_once('=')
                    .ok_or_else(|| format!("--set expects key=value, got `{value}`"))?;
                parsed.sets.push((key.trim().to_owned(), raw.to_owned()));
            }
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output".to_owned())?;
                parsed.output_path = Some(PathBuf::from(value));
            }
            "--list" => parsed.list_pages = true,
            "-h" | "--help" => {
                println!(
                    "Usage: cargo run --bin dashboard_snapshot -- [--config <path>] [--data-root <path>] (--list | --page <id> [--set key=value]... [--output <path>])"
                );
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument `{arg}`"));
            }
        }
    }

    Ok(parsed)
}
