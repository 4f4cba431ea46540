//! Declarative button and form-action rules.
//!
//! Rules arrive from the backend as plain records. This crate decides, for a
//! given form state, whether a button is shown, whether it is enabled, whether
//! a click may proceed, and what a click dispatches.

mod button;
mod dispatch;
mod error;
mod evaluate;
pub mod parse;
mod store;
mod types;

pub use button::{
    ButtonConfig, ButtonInput, ButtonSettings, ClickOutcome, Collaborators, RenderButton,
    RenderContext,
};
pub use dispatch::{
    ExceptionReporter, FormHost, TracingReporter, TransactionExecutor, TransactionRequest,
    TxAction, TxDescriptor, TxKind, TxResult, compute_url,
};
pub use error::{ClickError, FormgateError, Severity, TransactionError, ValidationErrors};
pub use evaluate::{check_button_visibility, check_rules, disable_button, handle_rule_execution};
pub use store::{ComponentManager, RuleStore, VisibilityDirective};
pub use types::{
    ButtonView, Calculator, CompareOp, ComponentInstall, ConfigError, Effect, Fact, FactExpr,
    FormContext, HiddenEntry, RoleAssignment, RoleTask, Rule, RuleCode, RuleConfig, RuleOrder,
    Value, fact,
};
