mod context;
mod error;
mod expr;
mod rule;
mod value;
mod view;

pub use context::{ComponentInstall, FormContext, HiddenEntry, RoleAssignment, RoleTask};
pub use error::ConfigError;
pub use expr::{Calculator, CompareOp, Fact, FactExpr, fact};
pub use rule::{Effect, Rule, RuleCode, RuleConfig, RuleOrder};
pub use value::Value;
pub use view::ButtonView;
