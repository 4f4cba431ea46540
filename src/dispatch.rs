use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use tracing::{error, info, warn};

use crate::{ConfigError, FormContext, Severity, TransactionError, ValidationErrors};

/// One entry of a button's `txFo` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxDescriptor {
    pub txcode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Json>,
}

impl TxDescriptor {
    pub fn new(txcode: impl Into<String>) -> Self {
        Self {
            txcode: txcode.into(),
            txtype: None,
            url: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn txtype(mut self, txtype: impl Into<String>) -> Self {
        self.txtype = Some(txtype.into());
        self
    }

    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Parse a `txFo` JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTxFo`] for malformed JSON and
    /// [`ConfigError::EmptyTxFo`] for an empty list.
    pub fn parse_list(button: &str, raw: &str) -> Result<Vec<TxDescriptor>, ConfigError> {
        let list: Vec<TxDescriptor> =
            serde_json::from_str(raw).map_err(|source| ConfigError::InvalidTxFo {
                button: button.to_owned(),
                source,
            })?;
        if list.is_empty() {
            return Err(ConfigError::EmptyTxFo {
                button: button.to_owned(),
            });
        }
        Ok(list)
    }
}

/// The kind of backend transaction a descriptor performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxKind {
    Create,
    Update,
    Delete,
    View,
    Search,
    Other(String),
}

impl TxKind {
    #[must_use]
    pub fn from_txtype(txtype: Option<&str>) -> Self {
        match txtype.map(str::to_ascii_lowercase).as_deref() {
            Some("create" | "insert" | "add") => TxKind::Create,
            Some("update" | "modify") => TxKind::Update,
            Some("delete") => TxKind::Delete,
            Some("view") => TxKind::View,
            Some("search") => TxKind::Search,
            Some(other) => TxKind::Other(other.to_owned()),
            None => TxKind::Other(String::new()),
        }
    }

    /// Create and update submit form values and must pass validation first.
    #[must_use]
    pub fn requires_validation(&self) -> bool {
        matches!(self, TxKind::Create | TxKind::Update)
    }
}

/// What a click does once the rules allow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxAction {
    PreviewModal,
    ResetForm,
    OpenUrl,
    Transaction(TxKind),
}

impl TxAction {
    /// UI-only codes are handled locally; everything else goes to the
    /// transaction collaborator.
    #[must_use]
    pub fn classify(descriptor: &TxDescriptor) -> Self {
        match descriptor.txcode.as_str() {
            "preview" => TxAction::PreviewModal,
            "reset" | "clear" => TxAction::ResetForm,
            "redirect" | "open_url" => TxAction::OpenUrl,
            _ => TxAction::Transaction(TxKind::from_txtype(descriptor.txtype.as_deref())),
        }
    }
}

/// Expand `{name}` placeholders in a URL template.
///
/// `{id}` is the record id, `{language}` the form language, anything else a
/// form value. Unknown or unterminated placeholders are kept verbatim.
#[must_use]
pub fn compute_url(template: &str, ctx: &FormContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match placeholder(name, ctx) {
            Some(value) => out.push_str(&value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

fn placeholder(name: &str, ctx: &FormContext) -> Option<String> {
    match name {
        "id" => ctx.record_id().map(str::to_owned),
        "language" => Some(ctx.language.clone()),
        _ => match ctx.form_values.get(name)? {
            Json::String(s) => Some(s.clone()),
            Json::Null => None,
            other => Some(other.to_string()),
        },
    }
}

/// Everything the transaction collaborator needs to run one transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub txcode: String,
    pub tx_fo: Vec<TxDescriptor>,
    pub session: Json,
    pub form_values: Map<String, Json>,
    pub selected_rows: Vec<Json>,
    pub dictionary: Json,
    pub searchtext: Option<String>,
    pub language: String,
}

impl TransactionRequest {
    #[must_use]
    pub fn new(tx_fo: Vec<TxDescriptor>, ctx: &FormContext) -> Self {
        let txcode = tx_fo.first().map(|d| d.txcode.clone()).unwrap_or_default();
        Self {
            txcode,
            tx_fo,
            session: ctx.session.clone(),
            form_values: ctx.form_values.clone(),
            selected_rows: ctx.selected_rows.clone(),
            dictionary: ctx.dictionary.clone(),
            searchtext: ctx.search_text.clone(),
            language: ctx.language.clone(),
        }
    }
}

/// Typed result of a transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum TxResult {
    /// A page of search results.
    Search(Json),
    Completed(Json),
}

/// Runs create/update/delete/view/search transactions against the backend.
#[async_trait]
pub trait TransactionExecutor: Send + Sync {
    async fn perform(&self, request: TransactionRequest) -> Result<TxResult, TransactionError>;
}

/// The page hosting the form. All methods are UI side effects.
#[async_trait]
pub trait FormHost: Send + Sync {
    /// Validate the current form values.
    async fn validate(&self) -> Result<(), ValidationErrors>;

    /// Show per-field validation messages inline.
    fn show_field_errors(&self, errors: &ValidationErrors);

    /// Show a user-visible alert.
    fn alert(&self, message: &str);

    fn reset_form(&self);

    fn open_preview(&self, descriptor: &TxDescriptor);

    /// Open a new browser context at `url`.
    fn open_url(&self, url: &str);

    fn set_is_modify(&self, is_modify: bool);

    /// Forward a page of search results along with the originating transaction.
    fn set_search_results(&self, page: Json, descriptor: &TxDescriptor);
}

/// Application-level exception sink. Fire-and-forget.
pub trait ExceptionReporter: Send + Sync {
    fn app_exception(&self, origin: &str, message: &str, severity: Severity);
}

/// Reports application exceptions as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ExceptionReporter for TracingReporter {
    fn app_exception(&self, origin: &str, message: &str, severity: Severity) {
        match severity {
            Severity::Info => info!(origin, "{message}"),
            Severity::Warning => warn!(origin, "{message}"),
            Severity::Error => error!(origin, "{message}"),
        }
    }
}

impl fmt::Display for TxAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxAction::PreviewModal => write!(f, "preview"),
            TxAction::ResetForm => write!(f, "reset"),
            TxAction::OpenUrl => write!(f, "open-url"),
            TxAction::Transaction(kind) => write!(f, "transaction({kind:?})"),
        }
    }
}
