use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A single sample value as delivered by the data source.
///
/// Series samples arrive loosely typed: numeric metrics, string states,
/// dates as epoch milliseconds or text, and occasionally arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum DataValue {
    #[default]
    Null,
    Number(f64),
    Text(String),
    List(Vec<DataValue>),
}

impl DataValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Numeric coercion: numbers as-is, trimmed numeric text parsed.
    ///
    /// Null, empty text and lists never coerce.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Number(n) => Some(*n),
            DataValue::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    None
                } else {
                    s.parse::<f64>().ok()
                }
            }
            _ => None,
        }
    }

    /// Extract as string, returning None for anything but text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// String form used for matching and display.
    ///
    /// Lists are joined with `", "`, null renders as `"null"`.
    pub fn to_display_string(&self) -> String {
        match self {
            DataValue::Null => "null".to_string(),
            DataValue::Number(n) => n.to_string(),
            DataValue::Text(s) => s.clone(),
            DataValue::List(items) => items
                .iter()
                .map(DataValue::to_display_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        DataValue::Number(v)
    }
}

impl From<&str> for DataValue {
    fn from(v: &str) -> Self {
        DataValue::Text(v.to_string())
    }
}

impl From<String> for DataValue {
    fn from(v: String) -> Self {
        DataValue::Text(v)
    }
}

/// One `[value, timestamp]` pair; timestamp is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapoint(pub DataValue, pub Option<i64>);

/// A named metric stream as handed over by the host panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Series {
    pub alias: String,
    #[serde(default)]
    pub datapoints: Vec<Datapoint>,
    /// Host-reduced statistics. Hosts send `null` for a statistic they
    /// could not compute; such entries are dropped on input.
    #[serde(default, deserialize_with = "present_stats")]
    pub stats: HashMap<String, f64>,
}

fn present_stats<'de, D>(deserializer: D) -> Result<HashMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, Option<f64>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect())
}

impl Series {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            ..Default::default()
        }
    }

    pub fn with_datapoints(mut self, datapoints: Vec<Datapoint>) -> Self {
        self.datapoints = datapoints;
        self
    }

    pub fn with_stat(mut self, key: &str, value: f64) -> Self {
        self.stats.insert(key.to_string(), value);
        self
    }

    /// Last raw sample value, `Null` when the series is empty.
    pub fn last_value(&self) -> DataValue {
        self.datapoints
            .last()
            .map(|dp| dp.0.clone())
            .unwrap_or(DataValue::Null)
    }

    /// Reduce numeric samples into the standard statistics.
    ///
    /// Null and non-numeric samples are skipped. Entries already present in
    /// `stats` are kept, so host-provided values win.
    pub fn compute_stats(&mut self) {
        let mut count = 0usize;
        let mut total = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut first: Option<f64> = None;
        let mut current: Option<f64> = None;
        let mut delta = 0.0;

        for dp in &self.datapoints {
            let v = match dp.0 {
                DataValue::Number(n) if n.is_finite() => n,
                _ => continue,
            };
            if let Some(prev) = current {
                // Counter resets restart the delta from zero.
                if v >= prev {
                    delta += v - prev;
                } else {
                    delta += v;
                }
            }
            if first.is_none() {
                first = Some(v);
            }
            current = Some(v);
            count += 1;
            total += v;
            min = min.min(v);
            max = max.max(v);
        }

        self.stats.entry("count".to_string()).or_insert(count as f64);
        let (first, current) = match (first, current) {
            (Some(f), Some(c)) => (f, c),
            _ => return,
        };

        let computed = [
            ("current", current),
            ("first", first),
            ("min", min),
            ("max", max),
            ("total", total),
            ("avg", total / count as f64),
            ("delta", delta),
            ("diff", current - first),
            ("range", max - min),
        ];
        for (key, value) in computed {
            self.stats.entry(key.to_string()).or_insert(value);
        }
    }
}
