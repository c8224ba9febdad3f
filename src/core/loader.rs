use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use chrono::{Days, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::column::{Column, ColumnData, TemporalColumn};
use crate::core::dataset::Dataset;
use crate::core::primitives::normalize_column_name;
use crate::core::types::DatasetId;
use crate::error::{DashError, DashResult};

/// Location and format of a tabular resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum DatasetSource {
    Csv {
        path: PathBuf,
    },
    Excel {
        path: PathBuf,
        #[serde(default)]
        sheet: Option<String>,
    },
}

impl DatasetSource {
    #[must_use]
    pub fn csv(path: impl Into<PathBuf>) -> Self {
        Self::Csv { path: path.into() }
    }

    #[must_use]
    pub fn excel(path: impl Into<PathBuf>, sheet: Option<&str>) -> Self {
        Self::Excel {
            path: path.into(),
            sheet: sheet.map(str::to_owned),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Csv { path } | Self::Excel { path, .. } => path,
        }
    }

    /// Resolves a relative path against `root`; absolute paths are kept.
    #[must_use]
    pub fn resolved_against(&self, root: &Path) -> Self {
        let resolve = |path: &PathBuf| {
            if path.is_absolute() {
                path.clone()
            } else {
                root.join(path)
            }
        };
        match self {
            Self::Csv { path } => Self::Csv {
                path: resolve(path),
            },
            Self::Excel { path, sheet } => Self::Excel {
                path: resolve(path),
                sheet: sheet.clone(),
            },
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Csv { path } => path.display().to_string(),
            Self::Excel { path, sheet } => match sheet {
                Some(sheet) => format!("{}#{sheet}", path.display()),
                None => path.display().to_string(),
            },
        }
    }
}

/// Column computed once at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DerivedColumn {
    /// Row-wise sum; missing cells count as zero.
    Sum { name: String, columns: Vec<String> },
    /// In-place `log2(x + 1)` transform.
    Log2p1 { column: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderOptions {
    #[serde(default = "default_entity_column")]
    pub entity_column: String,
    #[serde(default)]
    pub rename: IndexMap<String, String>,
    #[serde(default)]
    pub derived: Vec<DerivedColumn>,
    #[serde(default)]
    pub year_column: Option<String>,
    #[serde(default)]
    pub min_year_exclusive: Option<i32>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            entity_column: default_entity_column(),
            rename: IndexMap::new(),
            derived: Vec::new(),
            year_column: None,
            min_year_exclusive: None,
        }
    }
}

impl LoaderOptions {
    #[must_use]
    pub fn with_entity_column(mut self, column: impl Into<String>) -> Self {
        self.entity_column = column.into();
        self
    }

    #[must_use]
    pub fn with_rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.rename.insert(from.into(), to.into());
        self
    }

    #[must_use]
    pub fn with_derived(mut self, derived: DerivedColumn) -> Self {
        self.derived.push(derived);
        self
    }

    #[must_use]
    pub fn with_min_year_exclusive(mut self, year_column: impl Into<String>, year: i32) -> Self {
        self.year_column = Some(year_column.into());
        self.min_year_exclusive = Some(year);
        self
    }
}

fn default_entity_column() -> String {
    "Entity".to_owned()
}

/// Dataset declaration used by dashboard configs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    pub id: DatasetId,
    pub source: DatasetSource,
    #[serde(default)]
    pub options: LoaderOptions,
}

struct RawTable {
    headers: Vec<String>,
    columns: Vec<Vec<String>>,
}

/// Reads a CSV or Excel resource into an immutable [`Dataset`].
///
/// Rows with a missing key (`options.entity_column`) are dropped; a resource
/// with no rows left fails with [`DashError::DataSource`].
pub fn load(
    id: impl Into<DatasetId>,
    source: &DatasetSource,
    options: &LoaderOptions,
) -> DashResult<Dataset> {
    let id = id.into();
    let resource = source.describe();
    let raw = match source {
        DatasetSource::Csv { path } => read_csv(path, &resource)?,
        DatasetSource::Excel { path, sheet } => read_excel(path, sheet.as_deref(), &resource)?,
    };

    let mut columns = Vec::with_capacity(raw.headers.len());
    for (header, cells) in raw.headers.iter().zip(raw.columns) {
        let normalized = normalize_column_name(header);
        let name = options
            .rename
            .get(&normalized)
            .cloned()
            .unwrap_or(normalized);
        columns.push(Column::infer(name, cells));
    }

    let raw_rows = columns.first().map_or(0, Column::len);
    let Some(key) = columns
        .iter()
        .position(|column| column.name() == options.entity_column)
    else {
        return Err(DashError::data_source(
            &resource,
            format!("missing key column `{}`", options.entity_column),
        ));
    };

    let mut keep: Vec<bool> = (0..raw_rows)
        .map(|row| columns[key].text_at(row).is_some())
        .collect();

    if let (Some(year_column), Some(min_year)) = (&options.year_column, options.min_year_exclusive)
    {
        let Some(year_index) = columns.iter().position(|c| c.name() == year_column) else {
            return Err(DashError::data_source(
                &resource,
                format!("missing year column `{year_column}`"),
            ));
        };
        let years = match columns[year_index].data() {
            ColumnData::Numeric(values) => TemporalColumn::Numeric(values),
            ColumnData::Date(values) => TemporalColumn::Date(values),
            ColumnData::Categorical(_) => {
                return Err(DashError::data_source(
                    &resource,
                    format!("year column `{year_column}` must be numeric or date"),
                ));
            }
        };
        for (row, flag) in keep.iter_mut().enumerate() {
            *flag = *flag && years.year(row).is_some_and(|year| year > min_year);
        }
    }

    for column in &mut columns {
        column.retain_rows(&keep);
    }
    let row_count = columns.first().map_or(0, Column::len);
    if row_count == 0 {
        return Err(DashError::data_source(
            &resource,
            "no rows left after dropping rows with a missing key",
        ));
    }
    debug!(
        dataset = %id,
        raw_rows,
        kept_rows = row_count,
        "filtered rows with missing keys"
    );

    for derived in &options.derived {
        apply_derived(&mut columns, derived, &resource)?;
    }

    let dataset = Dataset::from_columns(id, columns)?;
    info!(
        dataset = %dataset.id(),
        resource = %resource,
        rows = dataset.row_count(),
        columns = dataset.schema().len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Loads a [`DatasetSpec`], resolving relative paths against `root`.
pub fn load_spec(spec: &DatasetSpec, root: &Path) -> DashResult<Dataset> {
    load(
        spec.id.clone(),
        &spec.source.resolved_against(root),
        &spec.options,
    )
}

fn read_csv(path: &Path, resource: &str) -> DashResult<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Fields)
        .from_path(path)
        .map_err(|e| DashError::data_source(resource, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DashError::data_source(resource, e))?
        .iter()
        .map(str::to_owned)
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(DashError::data_source(resource, "empty header row"));
    }

    let mut columns = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.map_err(|e| DashError::data_source(resource, e))?;
        for (index, column) in columns.iter_mut().enumerate() {
            column.push(record.get(index).unwrap_or_default().to_owned());
        }
    }

    Ok(RawTable { headers, columns })
}

fn read_excel(path: &Path, sheet: Option<&str>, resource: &str) -> DashResult<RawTable> {
    let mut workbook = open_workbook_auto(path).map_err(|e| DashError::data_source(resource, e))?;
    let sheet_name = match sheet {
        Some(sheet) => sheet.to_owned(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| DashError::data_source(resource, "workbook has no sheets"))?,
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| DashError::data_source(resource, e))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| DashError::data_source(resource, "sheet has no header row"))?
        .iter()
        .map(excel_cell_text)
        .collect();

    let mut columns = vec![Vec::new(); headers.len()];
    for row in rows {
        for (index, column) in columns.iter_mut().enumerate() {
            column.push(row.get(index).map(excel_cell_text).unwrap_or_default());
        }
    }

    Ok(RawTable { headers, columns })
}

fn excel_cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => text.clone(),
        Data::Float(value) => value.to_string(),
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => excel_serial_to_iso(value.as_f64()).unwrap_or_default(),
    }
}

/// Excel serial day numbers count from 1899-12-30.
fn excel_serial_to_iso(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = epoch.checked_add_days(Days::new(serial.floor() as u64))?;
    Some(date.format("%Y-%m-%d").to_string())
}

fn apply_derived(
    columns: &mut Vec<Column>,
    derived: &DerivedColumn,
    resource: &str,
) -> DashResult<()> {
    match derived {
        DerivedColumn::Sum { name, columns: inputs } => {
            let row_count = columns.first().map_or(0, Column::len);
            let mut totals = vec![0.0; row_count];
            for input in inputs {
                let values = find_numeric(columns, input, resource)?;
                for (total, value) in totals.iter_mut().zip(values) {
                    *total += value.unwrap_or(0.0);
                }
            }
            let values = totals.into_iter().map(Some).collect();
            let column = Column::numeric(name.clone(), values);
            match columns.iter_mut().find(|c| c.name() == name) {
                Some(existing) => *existing = column,
                None => columns.push(column),
            }
            Ok(())
        }
        DerivedColumn::Log2p1 { column } => {
            let target = columns
                .iter_mut()
                .find(|c| c.name() == column)
                .ok_or_else(|| {
                    DashError::data_source(resource, format!("missing column `{column}`"))
                })?;
            match target.data_mut() {
                ColumnData::Numeric(values) => {
                    for value in values.iter_mut().flatten() {
                        *value = (*value + 1.0).log2();
                    }
                    Ok(())
                }
                _ => Err(DashError::data_source(
                    resource,
                    format!("column `{column}` must be numeric for log2 transform"),
                )),
            }
        }
    }
}

fn find_numeric<'a>(
    columns: &'a [Column],
    name: &str,
    resource: &str,
) -> DashResult<&'a [Option<f64>]> {
    let column = columns
        .iter()
        .find(|c| c.name() == name)
        .ok_or_else(|| DashError::data_source(resource, format!("missing column `{name}`")))?;
    column.as_numeric().ok_or_else(|| {
        DashError::data_source(resource, format!("column `{name}` must be numeric"))
    })
}
