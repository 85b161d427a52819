use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Closed set of chart types the resolver may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Bar,
    Pie,
    Doughnut,
    Scatter,
}

impl ChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Bar => "bar",
            ChartType::Pie => "pie",
            ChartType::Doughnut => "doughnut",
            ChartType::Scatter => "scatter",
        }
    }

    /// Parse a wire value ("line", "bar", ...) back into the closed enum.
    pub fn parse(s: &str) -> Option<ChartType> {
        match s {
            "line" => Some(ChartType::Line),
            "bar" => Some(ChartType::Bar),
            "pie" => Some(ChartType::Pie),
            "doughnut" => Some(ChartType::Doughnut),
            "scatter" => Some(ChartType::Scatter),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChartType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured result of a prompt resolution: how to draw the chart.
///
/// `chart_type` and `x` are null only for the degenerate no-data case;
/// `text` is always present and non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub chart_type: Option<ChartType>,
    pub x: Option<String>,
    pub y: Vec<String>,
    pub text: String,
}

impl ChartSpec {
    /// The fixed specification returned for an empty dataset.
    pub fn no_data() -> Self {
        ChartSpec {
            chart_type: None,
            x: None,
            y: Vec::new(),
            text: "No data loaded".to_string(),
        }
    }
}

/// Verdict on a raw oracle reply after the schema check.
///
/// The oracle is trusted verbatim once its shape parses: an accepted spec may
/// name columns that do not exist in the live dataset, and that propagates
/// downstream unchanged. `Rejected` carries the reason for the fallback
/// annotation.
#[derive(Debug, Clone)]
pub enum OracleReply {
    Accepted(ChartSpec),
    Rejected { reason: String },
}

impl OracleReply {
    /// Validate free-form oracle output against the expected shape:
    /// a JSON object with a recognized `type`, a string `x`, an array of
    /// string `y` values, and an optional `text`.
    pub fn from_text(raw: &str) -> OracleReply {
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                return OracleReply::Rejected {
                    reason: format!("not valid JSON: {}", e),
                }
            }
        };

        let obj = match value.as_object() {
            Some(o) => o,
            None => {
                return OracleReply::Rejected {
                    reason: "not a JSON object".to_string(),
                }
            }
        };

        let chart_type = match obj.get("type").and_then(Value::as_str) {
            Some(s) => match ChartType::parse(s) {
                Some(t) => t,
                None => {
                    return OracleReply::Rejected {
                        reason: format!("unrecognized chart type '{}'", s),
                    }
                }
            },
            None => {
                return OracleReply::Rejected {
                    reason: "missing or non-string 'type'".to_string(),
                }
            }
        };

        let x = match obj.get("x").and_then(Value::as_str) {
            Some(s) => s.to_string(),
            None => {
                return OracleReply::Rejected {
                    reason: "missing or non-string 'x'".to_string(),
                }
            }
        };

        let y = match obj.get("y").and_then(Value::as_array) {
            Some(items) => {
                let mut cols = Vec::with_capacity(items.len());
                for item in items {
                    match item.as_str() {
                        Some(s) => cols.push(s.to_string()),
                        None => {
                            return OracleReply::Rejected {
                                reason: "'y' contains a non-string entry".to_string(),
                            }
                        }
                    }
                }
                cols
            }
            None => {
                return OracleReply::Rejected {
                    reason: "missing or non-array 'y'".to_string(),
                }
            }
        };

        let text = obj
            .get("text")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Oracle suggested a {} chart.", chart_type));

        OracleReply::Accepted(ChartSpec {
            chart_type: Some(chart_type),
            x: Some(x),
            y,
            text,
        })
    }
}
