use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ErrorQueue;

/// Title used when the map integration does not supply one.
pub const NO_ASSOCIATED_TITLE: &str = "No Associated Title";

/// Activity label supplied by the host at startup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Activity(pub String);

impl Activity {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Parcel picked on the map. Replaced wholesale on every selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub full_address: String,
    pub street_number: String,
    pub street_name: String,
    pub suburb: String,
    pub post_code: String,
    #[serde(default = "default_title", deserialize_with = "title_or_sentinel")]
    pub title: String,
    pub valuation_id: String,
    pub valuation_wufi: i64,
    pub dp_zone: String,
    pub special_residential_area: String,
}

fn default_title() -> String {
    NO_ASSOCIATED_TITLE.to_string()
}

fn title_or_sentinel<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_title))
}

/// Compliance outcome reported by the rules engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Permitted,
    Controlled,
    DiscretionaryRestricted,
    DiscretionaryUnrestricted,
    NonCompliant,
    #[default]
    Unknown,
}

impl Status {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Permitted => "Permitted",
            Self::Controlled => "Controlled",
            Self::DiscretionaryRestricted => "Restricted Discretionary",
            Self::DiscretionaryUnrestricted => "Unrestricted Discretionary",
            Self::NonCompliant => "Non-Compliant",
            Self::Unknown => {
                "Answer the questions below to determine the status of your consent application."
            }
        }
    }
}

/// One rule-check unit returned by the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standard {
    pub key: String,
    pub description: String,
    pub name: String,
    pub questions: Vec<Question>,
    pub section: String,
    #[serde(rename = "activityStatus", default, deserialize_with = "status_or_unknown")]
    pub status: Status,
}

fn status_or_unknown<'de, D>(deserializer: D) -> Result<Status, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Status>::deserialize(deserializer)?.unwrap_or_default())
}

/// Question belonging to a standard. The answer is never read from the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub key: String,
    pub input: Input,
    pub unit: String,
    #[serde(skip_deserializing, default)]
    pub value: String,
}

/// Control shape for a question, discriminated on the wire by `format`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum Input {
    Text { prompt: String },
    Number { prompt: String },
    Multichoice { prompt: String, options: Vec<String> },
    File { prompt: String },
}

impl Input {
    pub fn prompt(&self) -> &str {
        match self {
            Self::Text { prompt }
            | Self::Number { prompt }
            | Self::Multichoice { prompt, .. }
            | Self::File { prompt } => prompt,
        }
    }

    pub const fn format(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Number { .. } => "number",
            Self::Multichoice { .. } => "multichoice",
            Self::File { .. } => "file",
        }
    }
}

#[derive(Deserialize)]
struct PromptShape {
    prompt: String,
}

#[derive(Deserialize)]
struct MultichoiceShape {
    prompt: String,
    options: Vec<String>,
}

impl<'de> Deserialize<'de> for Input {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let format = match value.get("format") {
            Some(Value::String(format)) => format.as_str(),
            Some(other) => {
                return Err(de::Error::invalid_type(
                    unexpected_json(other),
                    &"a string input format",
                ))
            }
            None => return Err(de::Error::missing_field("format")),
        };

        let prompt = |value: &Value| -> Result<String, D::Error> {
            PromptShape::deserialize(value)
                .map(|shape| shape.prompt)
                .map_err(de::Error::custom)
        };

        match format {
            "text" => prompt(&value).map(|prompt| Self::Text { prompt }),
            "number" => prompt(&value).map(|prompt| Self::Number { prompt }),
            "file" => prompt(&value).map(|prompt| Self::File { prompt }),
            "multichoice" => MultichoiceShape::deserialize(&value)
                .map(|shape| Self::Multichoice {
                    prompt: shape.prompt,
                    options: shape.options,
                })
                .map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "unknown input format \"{other}\""
            ))),
        }
    }
}

fn unexpected_json(value: &Value) -> de::Unexpected<'_> {
    match value {
        Value::Null => de::Unexpected::Unit,
        Value::Bool(flag) => de::Unexpected::Bool(*flag),
        Value::Number(_) => de::Unexpected::Other("number"),
        Value::String(text) => de::Unexpected::Str(text),
        Value::Array(_) => de::Unexpected::Seq,
        Value::Object(_) => de::Unexpected::Map,
    }
}

/// Root state for one consent session. Only the dispatcher mutates it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsentModel {
    activities: Vec<Activity>,
    pub selected_activity: Option<Activity>,
    pub selected_property: Option<Property>,
    pub standards: Vec<Standard>,
    /// Set while a standards request is out with the rules engine.
    pub awaiting_standards: bool,
    pub status: Status,
    pub errors: ErrorQueue,
}

impl ConsentModel {
    pub fn new(activities: Vec<Activity>) -> Self {
        Self {
            activities,
            selected_activity: None,
            selected_property: None,
            standards: Vec::new(),
            awaiting_standards: false,
            status: Status::Unknown,
            errors: ErrorQueue::default(),
        }
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }
}
