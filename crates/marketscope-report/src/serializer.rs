use serde_json::Value;

use crate::error::ReportError;
use crate::report::AnalysisReport;

/// Converts reports to and from their JSON wire form.
///
/// A structural transform only: no values are recomputed and nothing is
/// stamped at serialization time, so equal reports serialize identically.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultSerializer;

impl ResultSerializer {
    /// # Errors
    ///
    /// Returns [`ReportError::Serialize`] if a live section holds a value
    /// JSON cannot represent.
    pub fn serialize(report: &AnalysisReport) -> Result<Value, ReportError> {
        serde_json::to_value(report).map_err(|source| ReportError::Serialize {
            context: "analysis report",
            source,
        })
    }

    /// Render the report as JSON text, indented when `pretty` is set.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialize`] on the same conditions as [`Self::serialize`].
    pub fn to_json_string(report: &AnalysisReport, pretty: bool) -> Result<String, ReportError> {
        let rendered = if pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        rendered.map_err(|source| ReportError::Serialize {
            context: "analysis report",
            source,
        })
    }

    /// # Errors
    ///
    /// Returns [`ReportError::Deserialize`] if `value` is not a report mapping.
    pub fn deserialize(value: Value) -> Result<AnalysisReport, ReportError> {
        serde_json::from_value(value).map_err(|source| ReportError::Deserialize {
            context: "analysis report",
            source,
        })
    }
}
