use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Discriminator of a [`Rule`].
///
/// The backend may send codes this crate does not interpret; those are kept
/// verbatim in [`RuleCode::Other`] and ignored by every predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleCode {
    /// `"visibility"`: enablement and click-time gating.
    Visibility,
    /// `"visibilitybutton"`: per-button override while editing.
    VisibilityButton,
    /// `"calculator"`: derives the modify flag when an action fires.
    Calculator,
    Other(String),
}

impl RuleCode {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            RuleCode::Visibility => "visibility",
            RuleCode::VisibilityButton => "visibilitybutton",
            RuleCode::Calculator => "calculator",
            RuleCode::Other(code) => code,
        }
    }
}

impl From<String> for RuleCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "visibility" => RuleCode::Visibility,
            "visibilitybutton" => RuleCode::VisibilityButton,
            "calculator" => RuleCode::Calculator,
            _ => RuleCode::Other(code),
        }
    }
}

impl From<&str> for RuleCode {
    fn from(code: &str) -> Self {
        RuleCode::from(code.to_owned())
    }
}

impl From<RuleCode> for String {
    fn from(code: RuleCode) -> Self {
        match code {
            RuleCode::Other(code) => code,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display ordering of a rule. Carried through but never used to sequence
/// evaluation.
///
/// Deserializes from any JSON scalar so an unexpected `order` never rejects a
/// rule: integers, other numbers, strings, `null` (the default) and booleans
/// (kept as text).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RuleOrder {
    Number(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for RuleOrder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(match raw {
            serde_json::Value::Null => RuleOrder::default(),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => RuleOrder::Number(i),
                (None, Some(f)) => RuleOrder::Float(f),
                (None, None) => RuleOrder::Text(n.to_string()),
            },
            serde_json::Value::String(s) => RuleOrder::Text(s),
            other => RuleOrder::Text(other.to_string()),
        })
    }
}

impl Default for RuleOrder {
    fn default() -> Self {
        RuleOrder::Number(0)
    }
}

impl fmt::Display for RuleOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleOrder::Number(n) => write!(f, "{n}"),
            RuleOrder::Float(n) => write!(f, "{n}"),
            RuleOrder::Text(s) => f.write_str(s),
        }
    }
}

/// The effect a rule declares through its `ena_dis` key.
///
/// The naming is inverted: `"true"` means the rule disables its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Disable,
    Enable,
}

/// Opaque key/value configuration of a [`Rule`]. Serializes as a flat map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleConfig {
    entries: BTreeMap<String, String>,
}

impl RuleConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key, builder style.
    #[must_use]
    pub fn set(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(key.to_owned(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn component_event(&self) -> Option<&str> {
        self.get("component_event")
    }

    #[must_use]
    pub fn component_action(&self) -> Option<&str> {
        self.get("component_action")
    }

    /// The raw, undelimited `component_result` string.
    #[must_use]
    pub fn component_result(&self) -> Option<&str> {
        self.get("component_result")
    }

    /// `component_result` split on `;` without trimming.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.component_result().into_iter().flat_map(|r| r.split(';'))
    }

    /// `component_result` split on `;`, trimmed, empty segments dropped.
    pub fn trimmed_targets(&self) -> impl Iterator<Item = &str> {
        self.targets().map(str::trim).filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn ena_dis(&self) -> Option<&str> {
        self.get("ena_dis")
    }

    #[must_use]
    pub fn effect(&self) -> Option<Effect> {
        match self.ena_dis()? {
            "true" => Some(Effect::Disable),
            "false" => Some(Effect::Enable),
            _ => None,
        }
    }

    #[must_use]
    pub fn component_manager(&self) -> Option<&str> {
        self.get("component_manager")
    }

    #[must_use]
    pub fn function_cal(&self) -> Option<&str> {
        self.get("function_cal")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'de> Deserialize<'de> for RuleConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let entries = raw
            .into_iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    serde_json::Value::Null => return None,
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                Some((key, text))
            })
            .collect();
        Ok(Self { entries })
    }
}

/// A declarative record controlling a button's visibility, enablement or
/// derived modify flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub code: RuleCode,
    /// Rules not in use are ignored by the predicates that check it.
    #[serde(rename = "inUse", default)]
    pub in_use: bool,
    #[serde(default)]
    pub order: RuleOrder,
    #[serde(default)]
    pub config: RuleConfig,
}

impl Rule {
    /// An in-use rule with an empty config.
    #[must_use]
    pub fn new(code: impl Into<RuleCode>) -> Self {
        Self {
            code: code.into(),
            in_use: true,
            order: RuleOrder::default(),
            config: RuleConfig::new(),
        }
    }

    #[must_use]
    pub fn in_use(mut self, in_use: bool) -> Self {
        self.in_use = in_use;
        self
    }

    #[must_use]
    pub fn order(mut self, order: RuleOrder) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.config.insert(key, value);
        self
    }
}
