use serde::{Deserialize, Serialize};

use crate::error::{DashError, DashResult};

use super::ChartDescription;

pub const CHART_DESCRIPTION_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDescriptionJsonContractV1 {
    pub schema_version: u32,
    pub chart: ChartDescription,
}

impl ChartDescription {
    pub fn to_json_pretty(&self) -> DashResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            DashError::InvalidData(format!("failed to serialize chart description json: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> DashResult<String> {
        let payload = ChartDescriptionJsonContractV1 {
            schema_version: CHART_DESCRIPTION_JSON_SCHEMA_V1,
            chart: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            DashError::InvalidData(format!("failed to serialize chart contract v1: {e}"))
        })
    }

    /// Accepts either a bare description or a versioned contract envelope.
    pub fn from_json_compat_str(input: &str) -> DashResult<Self> {
        if let Ok(chart) = serde_json::from_str::<ChartDescription>(input) {
            return Ok(chart);
        }
        let payload: ChartDescriptionJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            DashError::InvalidData(format!("failed to parse chart json payload: {e}"))
        })?;
        if payload.schema_version != CHART_DESCRIPTION_JSON_SCHEMA_V1 {
            return Err(DashError::InvalidData(format!(
                "unsupported chart schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.chart)
    }
}
