use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::column::{Column, ColumnData, ColumnKind, TemporalColumn};
use crate::core::types::DatasetId;
use crate::error::{DashError, DashResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub kind: ColumnKind,
}

/// Immutable, named table with typed columns.
///
/// Columns keep their source order. Once constructed a dataset is never
/// mutated; sessions share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    id: DatasetId,
    columns: IndexMap<String, Column>,
    row_count: usize,
}

impl Dataset {
    pub fn from_columns(id: impl Into<DatasetId>, columns: Vec<Column>) -> DashResult<Self> {
        let id = id.into();
        let row_count = columns.first().map_or(0, Column::len);
        let mut by_name = IndexMap::with_capacity(columns.len());
        for column in columns {
            if column.len() != row_count {
                return Err(DashError::InvalidData(format!(
                    "column `{}` in dataset `{id}` has {} rows, expected {row_count}",
                    column.name(),
                    column.len()
                )));
            }
            let name = column.name().to_owned();
            if by_name.insert(name.clone(), column).is_some() {
                return Err(DashError::InvalidData(format!(
                    "duplicate column `{name}` in dataset `{id}`"
                )));
            }
        }

        Ok(Self {
            id,
            columns: by_name,
            row_count,
        })
    }

    #[must_use]
    pub fn id(&self) -> &DatasetId {
        &self.id
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    #[must_use]
    pub fn schema(&self) -> Vec<ColumnSchema> {
        self.columns
            .values()
            .map(|column| ColumnSchema {
                name: column.name().to_owned(),
                kind: column.kind(),
            })
            .collect()
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> DashResult<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| DashError::UnknownColumn {
                dataset: self.id.to_string(),
                column: name.to_owned(),
            })
    }

    pub fn numeric(&self, name: &str) -> DashResult<&[Option<f64>]> {
        let column = self.column(name)?;
        column
            .as_numeric()
            .ok_or_else(|| self.type_error(name, ColumnKind::Numeric))
    }

    pub fn categorical(&self, name: &str) -> DashResult<&[Option<String>]> {
        let column = self.column(name)?;
        column
            .as_categorical()
            .ok_or_else(|| self.type_error(name, ColumnKind::Categorical))
    }

    /// Reader for year/month values stored as numbers or dates.
    pub fn temporal(&self, name: &str) -> DashResult<TemporalColumn<'_>> {
        match self.column(name)?.data() {
            ColumnData::Numeric(values) => Ok(TemporalColumn::Numeric(values)),
            ColumnData::Date(values) => Ok(TemporalColumn::Date(values)),
            ColumnData::Categorical(_) => Err(DashError::ColumnType {
                dataset: self.id.to_string(),
                column: name.to_owned(),
                expected: "numeric or date",
            }),
        }
    }

    /// Distinct non-missing labels of a column in first-seen order.
    pub fn distinct_labels(&self, name: &str) -> DashResult<Vec<String>> {
        let column = self.column(name)?;
        let mut seen = indexmap::IndexSet::new();
        for row in 0..self.row_count {
            if let Some(label) = column.text_at(row) {
                seen.insert(label);
            }
        }
        Ok(seen.into_iter().collect())
    }

    /// Smallest and largest year found in a temporal column.
    pub fn year_bounds(&self, name: &str) -> DashResult<Option<(i32, i32)>> {
        let years = self.temporal(name)?;
        let mut bounds: Option<(i32, i32)> = None;
        for row in 0..self.row_count {
            if let Some(year) = years.year(row) {
                bounds = Some(match bounds {
                    Some((lo, hi)) => (lo.min(year), hi.max(year)),
                    None => (year, year),
                });
            }
        }
        Ok(bounds)
    }

    fn type_error(&self, name: &str, expected: ColumnKind) -> DashError {
        DashError::ColumnType {
            dataset: self.id.to_string(),
            column: name.to_owned(),
            expected: expected.describe(),
        }
    }
}
