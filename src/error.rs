use thiserror::Error;

pub type DashResult<T> = Result<T, DashError>;

#[derive(Debug, Error)]
pub enum DashError {
    #[error("data source `{resource}` unavailable: {reason}")]
    DataSource { resource: String, reason: String },

    #[error("unknown dataset `{0}`")]
    UnknownDataset(String),

    #[error("dataset `{dataset}` has no column `{column}`")]
    UnknownColumn { dataset: String, column: String },

    #[error("column `{column}` in dataset `{dataset}` must be {expected}")]
    ColumnType {
        dataset: String,
        column: String,
        expected: &'static str,
    },

    #[error("unknown page `{0}`")]
    UnknownPage(String),

    #[error("page `{page}` is unavailable: {reason}")]
    PageUnavailable { page: String, reason: String },

    #[error("invalid parameter `{key}`: {reason}")]
    InvalidParameter { key: String, reason: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl DashError {
    pub(crate) fn data_source(resource: impl Into<String>, reason: impl ToString) -> Self {
        Self::DataSource {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }
}
