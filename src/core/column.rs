use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::primitives::{is_missing_cell, parse_date, parse_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Date,
}

impl ColumnKind {
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Date => "date",
        }
    }
}

/// Typed cell storage. Missing cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
    Date(Vec<Option<NaiveDate>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    #[must_use]
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Numeric(values))
    }

    #[must_use]
    pub fn categorical<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        Self::new(
            name,
            ColumnData::Categorical(values.into_iter().map(|v| v.map(Into::into)).collect()),
        )
    }

    #[must_use]
    pub fn date(name: impl Into<String>, values: Vec<Option<NaiveDate>>) -> Self {
        Self::new(name, ColumnData::Date(values))
    }

    /// Builds a column from raw text cells, inferring its kind.
    ///
    /// Numeric wins when every non-missing cell parses as `f64`, then date,
    /// then categorical. An all-missing column is numeric.
    #[must_use]
    pub fn infer(name: impl Into<String>, cells: Vec<String>) -> Self {
        let present = || cells.iter().filter(|cell| !is_missing_cell(cell));

        if present().all(|cell| parse_number(cell).is_some()) {
            let values = cells
                .iter()
                .map(|cell| {
                    if is_missing_cell(cell) {
                        None
                    } else {
                        parse_number(cell)
                    }
                })
                .collect();
            return Self::numeric(name, values);
        }

        if present().all(|cell| parse_date(cell).is_some()) {
            let values = cells
                .iter()
                .map(|cell| {
                    if is_missing_cell(cell) {
                        None
                    } else {
                        parse_date(cell)
                    }
                })
                .collect();
            return Self::date(name, values);
        }

        let values = cells
            .into_iter()
            .map(|cell| {
                if is_missing_cell(&cell) {
                    None
                } else {
                    Some(cell.trim().to_owned())
                }
            })
            .collect();
        Self::new(name, ColumnData::Categorical(values))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut ColumnData {
        &mut self.data
    }

    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        match self.data {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
            ColumnData::Date(_) => ColumnKind::Date,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Categorical(values) => values.len(),
            ColumnData::Date(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(values) => Some(values),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_categorical(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Categorical(values) => Some(values),
            _ => None,
        }
    }

    /// Text view of a cell regardless of kind; numbers that are whole render
    /// without a fractional part so numeric codes still match as labels.
    #[must_use]
    pub fn text_at(&self, row: usize) -> Option<String> {
        match &self.data {
            ColumnData::Categorical(values) => values.get(row).cloned().flatten(),
            ColumnData::Numeric(values) => values.get(row).copied().flatten().map(|v| {
                if v.fract() == 0.0 && v.abs() < 1e15 {
                    format!("{}", v as i64)
                } else {
                    v.to_string()
                }
            }),
            ColumnData::Date(values) => values
                .get(row)
                .copied()
                .flatten()
                .map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }

    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        fn retain<T>(values: &mut Vec<T>, keep: &[bool]) {
            let mut index = 0;
            values.retain(|_| {
                let kept = keep.get(index).copied().unwrap_or(false);
                index += 1;
                kept
            });
        }

        match &mut self.data {
            ColumnData::Numeric(values) => retain(values, keep),
            ColumnData::Categorical(values) => retain(values, keep),
            ColumnData::Date(values) => retain(values, keep),
        }
    }
}

/// Year/month reader over either a numeric or a date column.
#[derive(Debug, Clone, Copy)]
pub enum TemporalColumn<'a> {
    Numeric(&'a [Option<f64>]),
    Date(&'a [Option<NaiveDate>]),
}

impl TemporalColumn<'_> {
    #[must_use]
    pub fn year(&self, row: usize) -> Option<i32> {
        match self {
            Self::Numeric(values) => values
                .get(row)
                .copied()
                .flatten()
                .filter(|v| v.is_finite())
                .map(|v| v.round() as i32),
            Self::Date(values) => values.get(row).copied().flatten().map(|d| d.year()),
        }
    }

    #[must_use]
    pub fn month(&self, row: usize) -> Option<u32> {
        match self {
            Self::Numeric(values) => values
                .get(row)
                .copied()
                .flatten()
                .filter(|v| v.is_finite() && (1.0..=12.0).contains(&v.round()))
                .map(|v| v.round() as u32),
            Self::Date(values) => values.get(row).copied().flatten().map(|d| d.month()),
        }
    }
}
