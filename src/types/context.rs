use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

/// State of the form that owns the buttons being rendered.
///
/// Owned by the surrounding page; the engine only reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormContext {
    /// Whether an existing record is being edited.
    #[serde(rename = "ismodify", default)]
    pub is_modify: bool,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub selected_rows: Vec<Json>,
    #[serde(default)]
    pub role: Vec<RoleAssignment>,
    #[serde(default)]
    pub form_values: Map<String, Json>,
    #[serde(default)]
    pub search_text: Option<String>,
    #[serde(default)]
    pub language: String,
    /// Opaque session handed through to the transaction collaborator.
    #[serde(default)]
    pub session: Json,
    /// Localized strings for the current language.
    #[serde(default)]
    pub dictionary: Json,
}

impl FormContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn modify(mut self, is_modify: bool) -> Self {
        self.is_modify = is_modify;
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_selected(mut self, rows: Vec<Json>) -> Self {
        self.selected_rows = rows;
        self
    }

    #[must_use]
    pub fn with_role(mut self, role_id: impl Into<String>) -> Self {
        self.role.push(RoleAssignment {
            role_id: role_id.into(),
        });
        self
    }

    #[must_use]
    pub fn with_value(mut self, name: &str, value: impl Into<Json>) -> Self {
        self.form_values.insert(name.to_owned(), value.into());
        self
    }

    /// The record id, treating an empty id as absent.
    #[must_use]
    pub fn record_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    #[must_use]
    pub fn has_record(&self) -> bool {
        self.record_id().is_some()
    }

    /// Look up a localized string, if the dictionary carries it.
    #[must_use]
    pub fn translate(&self, key: &str) -> Option<&str> {
        self.dictionary.get(key).and_then(Json::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub role_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInstall {
    pub install: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenEntry {
    pub component: ComponentInstall,
}

/// Role-to-permission table: role id → hidden code → install flag.
///
/// Passed explicitly to every lookup; there is no global instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleTask {
    roles: HashMap<String, HashMap<String, HiddenEntry>>,
}

impl RoleTask {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn set(mut self, role_id: &str, code_hidden: &str, install: bool) -> Self {
        self.roles.entry(role_id.to_owned()).or_default().insert(
            code_hidden.to_owned(),
            HiddenEntry {
                component: ComponentInstall { install },
            },
        );
        self
    }

    #[must_use]
    pub fn install(&self, role_id: &str, code_hidden: &str) -> Option<bool> {
        self.roles
            .get(role_id)?
            .get(code_hidden)
            .map(|entry| entry.component.install)
    }

    /// True when any of the given roles marks `code_hidden` as not installed.
    /// Missing entries never hide.
    #[must_use]
    pub fn hides(&self, roles: &[RoleAssignment], code_hidden: &str) -> bool {
        roles
            .iter()
            .any(|r| self.install(&r.role_id, code_hidden) == Some(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_id_is_not_a_record() {
        assert!(!FormContext::new().has_record());
        assert!(!FormContext::new().with_id("").has_record());
        assert_eq!(FormContext::new().with_id("42").record_id(), Some("42"));
    }

    #[test]
    fn deserialize_form_context() {
        let ctx: FormContext = serde_json::from_str(
            r#"{"ismodify": true, "id": "9", "selectedRows": [{"id": 1}], "role": [{"role_id": "teller"}]}"#,
        )
        .unwrap();
        assert!(ctx.is_modify);
        assert_eq!(ctx.record_id(), Some("9"));
        assert_eq!(ctx.selected_rows.len(), 1);
        assert_eq!(ctx.role[0].role_id, "teller");
    }

    #[test]
    fn role_task_hides_on_any_role() {
        let table = RoleTask::new()
            .set("teller", "btn_delete", true)
            .set("auditor", "btn_delete", false);
        let teller = [RoleAssignment {
            role_id: "teller".into(),
        }];
        let both = [
            RoleAssignment {
                role_id: "teller".into(),
            },
            RoleAssignment {
                role_id: "auditor".into(),
            },
        ];
        assert!(!table.hides(&teller, "btn_delete"));
        assert!(table.hides(&both, "btn_delete"));
        assert!(!table.hides(&both, "btn_other"));
    }

    #[test]
    fn role_task_deserializes_nested_shape() {
        let table: RoleTask = serde_json::from_str(
            r#"{"r1": {"btn_save": {"component": {"install": false}}}}"#,
        )
        .unwrap();
        assert_eq!(table.install("r1", "btn_save"), Some(false));
        assert_eq!(table.install("r2", "btn_save"), None);
    }

    #[test]
    fn translate_reads_dictionary_strings() {
        let ctx = FormContext {
            dictionary: serde_json::json!({"txt_error_occurred": "Lỗi", "n": 1}),
            ..FormContext::default()
        };
        assert_eq!(ctx.translate("txt_error_occurred"), Some("Lỗi"));
        assert_eq!(ctx.translate("n"), None);
    }
}
