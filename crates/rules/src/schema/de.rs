//! Lenient field deserializers for persisted panel configuration.
//!
//! Configurations written by older panel versions mix numbers and strings
//! for the same field. These helpers normalise them instead of rejecting
//! the whole document.

use serde::de::value::StringDeserializer;
use serde::de::{DeserializeOwned, Error as _, IntoDeserializer};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::{MappingType, RuleData, DEFAULT_DECIMALS};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Num(f64),
    Bool(bool),
    Null(()),
}

/// Accept a string, number or bool and keep its textual form.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Str(s) => s,
        Scalar::Num(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
        Scalar::Null(()) => "null".to_string(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawThresholds {
    List(Vec<Scalar>),
    Csv(String),
    Null(()),
}

fn finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Accept a list of numbers or numeric strings, or a comma-separated
/// string. Entries that are not finite numbers are dropped.
pub fn lenient_thresholds<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawThresholds::deserialize(deserializer)? {
        RawThresholds::List(items) => items
            .into_iter()
            .filter_map(|s| match s {
                Scalar::Num(n) if n.is_finite() => Some(n),
                Scalar::Str(s) => finite(&s),
                _ => None,
            })
            .collect(),
        RawThresholds::Csv(s) => s.split(',').filter_map(finite).collect(),
        RawThresholds::Null(()) => Vec::new(),
    })
}

/// Accept an integer or a numeric string, falling back to [`DEFAULT_DECIMALS`].
pub fn lenient_decimals<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Scalar::deserialize(deserializer)? {
        Scalar::Num(n) if n.is_finite() && n >= 0.0 => Some(n as u32),
        Scalar::Str(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    Ok(parsed.unwrap_or(DEFAULT_DECIMALS))
}

/// Accept a mapping type by name or by the numeric code older panels
/// stored (`1` value map, `2` range map).
pub fn mapping_type_code<'de, D>(deserializer: D) -> Result<MappingType, D::Error>
where
    D: Deserializer<'de>,
{
    match Scalar::deserialize(deserializer)? {
        Scalar::Num(n) if n == 1.0 => Ok(MappingType::ValueMap),
        Scalar::Num(n) if n == 2.0 => Ok(MappingType::RangeMap),
        Scalar::Num(n) => Err(D::Error::custom(format!("unknown mapping code {}", n))),
        Scalar::Str(s) => {
            let name: StringDeserializer<D::Error> = s.into_deserializer();
            MappingType::deserialize(name)
        }
        Scalar::Bool(b) => Err(D::Error::custom(format!("unknown mapping type {}", b))),
        Scalar::Null(()) => Ok(MappingType::default()),
    }
}

// ── Rule records ────────────────────────────────────────────────────

/// Pulls fields out of a rule object one at a time. A field that fails
/// to decode keeps its default and leaves a problem behind.
struct FieldReader {
    fields: Map<String, Value>,
    problems: Vec<String>,
}

impl FieldReader {
    fn take(&mut self, keys: &[&str]) -> Option<(String, Value)> {
        keys.iter()
            .find_map(|k| self.fields.remove(*k).map(|v| (k.to_string(), v)))
    }

    /// Strict decode. `null` means absent.
    fn field<T: DeserializeOwned>(&mut self, keys: &[&str], slot: &mut T) {
        match self.take(keys) {
            None | Some((_, Value::Null)) => {}
            Some((key, value)) => self.decoded(&key, serde_json::from_value(value), slot),
        }
    }

    /// Decode with a lenient helper, which also decides what `null` means.
    fn with<T>(
        &mut self,
        key: &str,
        slot: &mut T,
        decode: fn(Value) -> Result<T, serde_json::Error>,
    ) {
        if let Some((key, value)) = self.take(&[key]) {
            self.decoded(&key, decode(value), slot);
        }
    }

    /// Decode a list entry by entry, dropping the entries that fail.
    fn list<T: DeserializeOwned>(&mut self, key: &str, slot: &mut Vec<T>) {
        match self.take(&[key]) {
            None | Some((_, Value::Null)) => {}
            Some((key, Value::Array(items))) => {
                let mut decoded = Vec::with_capacity(items.len());
                for (i, item) in items.into_iter().enumerate() {
                    match serde_json::from_value(item) {
                        Ok(entry) => decoded.push(entry),
                        Err(e) => self
                            .problems
                            .push(format!("{}[{}]: {}; entry dropped", key, i, e)),
                    }
                }
                *slot = decoded;
            }
            Some((key, other)) => self.problems.push(format!(
                "{}: expected a list, found {}; using default",
                key,
                kind(&other)
            )),
        }
    }

    fn decoded<T>(&mut self, key: &str, result: Result<T, serde_json::Error>, slot: &mut T) {
        match result {
            Ok(value) => *slot = value,
            Err(e) => self.problems.push(format!("{}: {}; using default", key, e)),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn read_rule_data(fields: Map<String, Value>) -> RuleData {
    let mut r = FieldReader {
        fields,
        problems: Vec::new(),
    };
    let mut d = RuleData::default();

    r.field(&["alias"], &mut d.alias);
    r.field(&["pattern"], &mut d.pattern);
    r.field(&["hidden"], &mut d.hidden);
    r.field(&["type", "valueType"], &mut d.value_type);
    r.field(&["aggregation"], &mut d.aggregation);
    r.field(&["unit"], &mut d.unit);
    r.with("decimals", &mut d.decimals, lenient_decimals::<Value>);
    r.field(&["colors"], &mut d.colors);
    r.field(&["invert"], &mut d.invert);
    r.with("thresholds", &mut d.thresholds, lenient_thresholds::<Value>);
    r.with("stringWarning", &mut d.string_warning, string_or_number::<Value>);
    r.with("stringCritical", &mut d.string_critical, string_or_number::<Value>);
    r.field(&["dateFormat"], &mut d.date_format);
    r.field(&["colorOn"], &mut d.color_on);
    r.field(&["textOn"], &mut d.text_on);
    r.field(&["textReplace"], &mut d.text_replace);
    r.field(&["textPattern"], &mut d.text_pattern);
    r.field(&["link"], &mut d.link);
    r.field(&["linkUrl"], &mut d.link_url);
    r.field(&["linkParams"], &mut d.link_params);
    r.field(&["linkOn"], &mut d.link_on);
    r.field(&["tooltip"], &mut d.tooltip);
    r.field(&["tooltipLabel"], &mut d.tooltip_label);
    r.field(&["tooltipColors"], &mut d.tooltip_colors);
    r.field(&["tooltipOn"], &mut d.tooltip_on);
    r.field(&["tooltipDirection"], &mut d.tooltip_direction);
    r.field(&["overlayIcon"], &mut d.overlay_icon);
    r.with("mappingType", &mut d.mapping_type, mapping_type_code::<Value>);
    r.field(&["shapeProp"], &mut d.shape_prop);
    r.field(&["textProp"], &mut d.text_prop);
    r.field(&["linkProp"], &mut d.link_prop);
    r.list("shapeData", &mut d.shape_data);
    r.list("textData", &mut d.text_data);
    r.list("linkData", &mut d.link_data);
    r.list("valueData", &mut d.value_data);
    r.list("rangeData", &mut d.range_data);
    r.field(&["order"], &mut d.order);

    d.decode_problems = r.problems;
    d
}

/// Rule records decode field by field: a bad value degrades that field to
/// its default and is reported by [`RuleData::warnings`]. Only a record
/// that is not an object at all is rejected. Unknown keys are ignored.
impl<'de> Deserialize<'de> for RuleData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Object(fields) => Ok(read_rule_data(fields)),
            other => Err(D::Error::custom(format!(
                "expected a rule object, found {}",
                kind(&other)
            ))),
        }
    }
}
