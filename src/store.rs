use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use tracing::warn;

use crate::{Calculator, ConfigError, FormgateError, Rule, RuleCode};

/// Ordered collection of rules, as supplied by the backend.
///
/// The store does not reorder or transform its rules. Predicates see them in
/// the order they were loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleStore {
    rules: Vec<Rule>,
}

impl RuleStore {
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Parse rules from JSON: either a bare array or a `{"rules": [...]}`
    /// document.
    ///
    /// # Errors
    ///
    /// Returns [`FormgateError::Json`] if the input is not JSON, matches
    /// neither shape, or holds a malformed rule.
    pub fn from_json(input: &str) -> Result<Self, FormgateError> {
        let document: serde_json::Value = serde_json::from_str(input)?;
        let list = match document {
            serde_json::Value::Object(mut map) if map.contains_key("rules") => map
                .remove("rules")
                .unwrap_or(serde_json::Value::Null),
            other => other,
        };
        let rules = Vec::<Rule>::deserialize(list)?;
        Ok(Self { rules })
    }

    /// Read a JSON rules file.
    ///
    /// # Errors
    ///
    /// Returns [`FormgateError`] on I/O or JSON failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, FormgateError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json(&input)
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Merge every rule's `component_manager` map, later rules overriding
    /// earlier keys. Malformed maps are logged and skipped.
    #[must_use]
    pub fn component_manager(&self) -> ComponentManager {
        let mut merged = ComponentManager::default();
        for (index, rule) in self.rules.iter().enumerate() {
            let Some(raw) = rule.config.component_manager() else {
                continue;
            };
            match parse_component_manager(index, raw) {
                Ok(entries) => merged.directives.extend(entries),
                Err(err) => warn!(error = %err, "ignoring component_manager"),
            }
        }
        merged
    }

    /// Statically check every `component_manager` and `function_cal`.
    ///
    /// The store is usable without validation; this surfaces configuration
    /// mistakes early.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, in store order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, rule) in self.rules.iter().enumerate() {
            if let Some(raw) = rule.config.component_manager() {
                parse_component_manager(index, raw)?;
            }
            if rule.code == RuleCode::Calculator {
                if let Some(source) = rule.config.function_cal() {
                    source
                        .parse::<Calculator>()
                        .map_err(|source| ConfigError::InvalidCalculator { index, source })?;
                }
            }
        }
        Ok(())
    }
}

impl From<Vec<Rule>> for RuleStore {
    fn from(rules: Vec<Rule>) -> Self {
        Self::new(rules)
    }
}

impl fmt::Display for RuleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let in_use = self.rules.iter().filter(|r| r.in_use).count();
        write!(f, "RuleStore({} rules, {in_use} in use)", self.rules.len())
    }
}

fn parse_component_manager(
    index: usize,
    raw: &str,
) -> Result<HashMap<String, String>, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidComponentManager { index, message };
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))?;
    let serde_json::Value::Object(map) = value else {
        return Err(invalid("expected a JSON object".to_owned()));
    };
    Ok(map
        .into_iter()
        .map(|(code, directive)| {
            let directive = match directive {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (code, directive)
        })
        .collect())
}

/// How a button's visibility depends on the presence of a record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityDirective {
    /// `"!!!"`: only shown while creating (no record id).
    WithoutRecord,
    /// `"!!"`: only shown for an existing record.
    WithRecord,
    Always,
}

impl VisibilityDirective {
    #[must_use]
    pub fn parse(directive: &str) -> Self {
        if directive.contains("!!!") {
            VisibilityDirective::WithoutRecord
        } else if directive.contains("!!") {
            VisibilityDirective::WithRecord
        } else {
            VisibilityDirective::Always
        }
    }

    #[must_use]
    pub fn allows(self, has_record: bool) -> bool {
        match self {
            VisibilityDirective::WithoutRecord => !has_record,
            VisibilityDirective::WithRecord => has_record,
            VisibilityDirective::Always => true,
        }
    }
}

/// Merged button-code → visibility directive map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentManager {
    directives: HashMap<String, String>,
}

impl ComponentManager {
    #[must_use]
    pub fn directive(&self, button_code: &str) -> VisibilityDirective {
        self.directives
            .get(button_code)
            .map_or(VisibilityDirective::Always, |d| VisibilityDirective::parse(d))
    }

    /// Buttons without a directive are always shown.
    #[must_use]
    pub fn should_show(&self, button_code: &str, has_record: bool) -> bool {
        self.directive(button_code).allows(has_record)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}
