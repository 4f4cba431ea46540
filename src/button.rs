use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dispatch::{
    ExceptionReporter, FormHost, TransactionExecutor, TransactionRequest, TxAction, TxDescriptor,
    TxResult, compute_url,
};
use crate::evaluate::{check_button_visibility, check_rules, disable_button, handle_rule_execution};
use crate::{ButtonView, ClickError, ConfigError, FormContext, RoleTask, RuleStore, Severity};

/// Static per-button configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonInput {
    pub code: String,
    /// Permission key looked up in the [`RoleTask`] table.
    #[serde(default)]
    pub code_hidden: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub config: ButtonConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonConfig {
    /// `"true"` runs calculator rules only; anything else sends `tx_fo`.
    #[serde(default)]
    pub use_action: Option<String>,
    /// JSON list of transaction descriptors.
    #[serde(default)]
    pub tx_fo: Option<String>,
}

impl ButtonInput {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn code_hidden(mut self, code_hidden: impl Into<String>) -> Self {
        self.code_hidden = Some(code_hidden.into());
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn use_action(mut self, use_action: impl Into<String>) -> Self {
        self.config.use_action = Some(use_action.into());
        self
    }

    #[must_use]
    pub fn tx_fo(mut self, tx_fo: impl Into<String>) -> Self {
        self.config.tx_fo = Some(tx_fo.into());
        self
    }
}

/// Tunables for click handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonSettings {
    /// Delay between taking the click lock and evaluating rules.
    #[serde(rename = "grace_period_ms", with = "millis")]
    pub grace_period: Duration,
    /// Origin reported with application exceptions.
    pub origin: String,
    /// Dictionary key of the generic transaction failure alert.
    pub error_alert_key: String,
    /// Alert text used when the dictionary has no entry.
    pub error_alert_fallback: String,
}

impl Default for ButtonSettings {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_millis(300),
            origin: "RenderButton".to_owned(),
            error_alert_key: "txt_error_occurred".to_owned(),
            error_alert_fallback: "An error occurred while processing the request".to_owned(),
        }
    }
}

impl ButtonSettings {
    #[must_use]
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Parse settings from JSON; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] on malformed input.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// Read-only inputs a button is rendered against.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub rules: &'a RuleStore,
    pub form: &'a FormContext,
    pub role_task: &'a RoleTask,
}

/// External collaborators a click may call.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub executor: &'a dyn TransactionExecutor,
    pub host: &'a dyn FormHost,
    pub reporter: &'a dyn ExceptionReporter,
}

/// How a click ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Another click on this button was still in flight.
    Ignored,
    /// The click-time rule gate locked the action.
    Blocked,
    /// Calculator rules ran; nothing was sent.
    Calculated,
    PreviewOpened,
    Reset,
    Navigated(String),
    Completed,
    Searched,
    /// Form validation failed; errors were shown on the form.
    Invalid,
    /// A configuration or transaction error was reported.
    Failed,
}

#[derive(Debug, Default)]
struct ClickState {
    locked: AtomicBool,
    loading: AtomicBool,
}

/// Releases the click lock and loading flag when dropped, whatever path the
/// click took.
struct ClickGuard<'a>(&'a ClickState);

impl Drop for ClickGuard<'_> {
    fn drop(&mut self) {
        self.0.loading.store(false, Ordering::Release);
        self.0.locked.store(false, Ordering::Release);
    }
}

/// One rendered button: static input, settings and its click lock.
#[derive(Debug)]
pub struct RenderButton {
    input: ButtonInput,
    settings: ButtonSettings,
    state: ClickState,
}

impl RenderButton {
    #[must_use]
    pub fn new(input: ButtonInput) -> Self {
        Self::with_settings(input, ButtonSettings::default())
    }

    #[must_use]
    pub fn with_settings(input: ButtonInput, settings: ButtonSettings) -> Self {
        Self {
            input,
            settings,
            state: ClickState::default(),
        }
    }

    #[must_use]
    pub fn input(&self) -> &ButtonInput {
        &self.input
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.input.code
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.state.locked.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.loading.load(Ordering::Acquire)
    }

    /// Visibility from the merged `component_manager` directives.
    #[must_use]
    pub fn should_show_button(&self, cx: &RenderContext<'_>) -> bool {
        cx.rules
            .component_manager()
            .should_show(self.code(), cx.form.has_record())
    }

    /// Whether this button is explicitly allowed while editing.
    #[must_use]
    pub fn should_visibility_button(&self, cx: &RenderContext<'_>) -> bool {
        check_button_visibility(cx.rules.rules(), cx.form.is_modify, self.code())
    }

    /// Whether the user's roles withdraw this button's permission.
    #[must_use]
    pub fn is_component_hidden(&self, cx: &RenderContext<'_>) -> bool {
        self.input
            .code_hidden
            .as_deref()
            .is_some_and(|hidden| cx.role_task.hides(&cx.form.role, hidden))
    }

    #[must_use]
    pub fn is_disabled(&self, cx: &RenderContext<'_>) -> bool {
        let code = self.code();
        let is_modify = cx.form.is_modify;

        disable_button(cx.rules.rules(), code)
            || (!self.should_visibility_button(cx) && is_modify)
            || self.input.disabled
            || self.is_locked()
            || (!is_modify && code == "modify")
            || (code == "delete" && cx.form.selected_rows.is_empty())
            || self.is_component_hidden(cx)
    }

    pub fn view(&self, cx: &RenderContext<'_>) -> ButtonView {
        ButtonView::new(
            self.code(),
            self.should_show_button(cx),
            !self.is_disabled(cx),
            self.is_locked(),
            self.is_loading(),
        )
    }

    /// Handle a click. Never fails: errors are reported to the collaborators
    /// and summarized in the returned [`ClickOutcome`].
    ///
    /// At most one click runs per button; a click arriving while another is in
    /// flight returns [`ClickOutcome::Ignored`] immediately.
    pub async fn handle_click(
        &self,
        cx: &RenderContext<'_>,
        with: &Collaborators<'_>,
    ) -> ClickOutcome {
        if self
            .state
            .locked
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(button = self.code(), "click ignored while another is in flight");
            return ClickOutcome::Ignored;
        }
        let _guard = ClickGuard(&self.state);
        self.state.loading.store(true, Ordering::Release);

        tokio::time::sleep(self.settings.grace_period).await;

        match self.run_click(cx, with).await {
            Ok(outcome) => outcome,
            Err(ClickError::Validation(errors)) => {
                debug!(button = self.code(), %errors, "form validation failed");
                with.host.show_field_errors(&errors);
                with.host.alert(&errors.to_string());
                ClickOutcome::Invalid
            }
            Err(ClickError::Transaction(err)) => {
                with.host.alert(self.error_alert(cx.form));
                with.reporter
                    .app_exception(&self.settings.origin, &err.to_string(), Severity::Error);
                ClickOutcome::Failed
            }
            Err(err) => {
                with.reporter
                    .app_exception(&self.settings.origin, &err.to_string(), err.severity());
                ClickOutcome::Failed
            }
        }
    }

    async fn run_click(
        &self,
        cx: &RenderContext<'_>,
        with: &Collaborators<'_>,
    ) -> Result<ClickOutcome, ClickError> {
        let code = self.code();

        if check_rules(cx.rules.rules(), cx.form.is_modify, code) {
            debug!(button = code, "click locked by rules");
            return Ok(ClickOutcome::Blocked);
        }

        let use_action = self.input.config.use_action.as_deref().ok_or_else(|| {
            ConfigError::MissingUseAction {
                button: code.to_owned(),
            }
        })?;

        if use_action == "true" {
            handle_rule_execution(cx.rules.rules(), code, cx.form, |flag| {
                with.host.set_is_modify(flag);
            });
            return Ok(ClickOutcome::Calculated);
        }

        let raw = self
            .input
            .config
            .tx_fo
            .as_deref()
            .ok_or_else(|| ConfigError::MissingTxFo {
                button: code.to_owned(),
            })?;
        let tx_fo = TxDescriptor::parse_list(code, raw)?;
        let descriptor = tx_fo[0].clone();
        let action = TxAction::classify(&descriptor);
        debug!(button = code, txcode = %descriptor.txcode, %action, "dispatching");

        match action {
            TxAction::PreviewModal => {
                with.host.validate().await?;
                with.host.open_preview(&descriptor);
                Ok(ClickOutcome::PreviewOpened)
            }
            TxAction::ResetForm => {
                with.host.reset_form();
                Ok(ClickOutcome::Reset)
            }
            TxAction::OpenUrl => {
                let template = descriptor
                    .url
                    .as_deref()
                    .filter(|url| !url.trim().is_empty())
                    .ok_or_else(|| ConfigError::MissingUrl {
                        button: code.to_owned(),
                        txcode: descriptor.txcode.clone(),
                    })?;
                let url = compute_url(template, cx.form);
                with.host.open_url(&url);
                Ok(ClickOutcome::Navigated(url))
            }
            TxAction::Transaction(kind) => {
                if kind.requires_validation() {
                    with.host.validate().await?;
                }
                let request = TransactionRequest::new(tx_fo, cx.form);
                match with.executor.perform(request).await? {
                    TxResult::Search(page) => {
                        with.host.set_search_results(page, &descriptor);
                        Ok(ClickOutcome::Searched)
                    }
                    TxResult::Completed(_) => Ok(ClickOutcome::Completed),
                }
            }
        }
    }

    fn error_alert<'a>(&'a self, form: &'a FormContext) -> &'a str {
        form.translate(&self.settings.error_alert_key)
            .unwrap_or(&self.settings.error_alert_fallback)
    }
}
