use std::fmt;
use std::ops::Not;
use std::str::FromStr;

use super::context::FormContext;
use super::value::Value;

/// Comparison operators supported in calculator expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// A named fact about the form that a calculator may read.
///
/// This is the complete set; calculators cannot reach anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fact {
    /// Whether an existing record is being edited.
    IsModify,
    /// Whether the form has a record id.
    HasId,
    /// The record id as a string, absent when there is none.
    RecordId,
    /// Number of selected rows.
    SelectedCount,
    /// Whether at least one row is selected.
    HasSelection,
}

impl Fact {
    pub const ALL: [Fact; 5] = [
        Fact::IsModify,
        Fact::HasId,
        Fact::RecordId,
        Fact::SelectedCount,
        Fact::HasSelection,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Fact::IsModify => "is_modify",
            Fact::HasId => "has_id",
            Fact::RecordId => "record_id",
            Fact::SelectedCount => "selected_count",
            Fact::HasSelection => "has_selection",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Fact> {
        Fact::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Read this fact from the form.
    #[must_use]
    pub fn resolve(self, ctx: &FormContext) -> Option<Value> {
        match self {
            Fact::IsModify => Some(Value::Bool(ctx.is_modify)),
            Fact::HasId => Some(Value::Bool(ctx.has_record())),
            Fact::RecordId => ctx.record_id().map(Value::from),
            Fact::SelectedCount => {
                Some(Value::Int(i64::try_from(ctx.selected_rows.len()).unwrap_or(i64::MAX)))
            }
            Fact::HasSelection => Some(Value::Bool(!ctx.selected_rows.is_empty())),
        }
    }
}

/// A declarative calculator attached to a `calculator` rule through its
/// `function_cal` key. Parsed from text, never executed as code.
#[derive(Debug, Clone, PartialEq)]
pub enum Calculator {
    Const(Value),
    Fact(Fact),
    Compare {
        fact: Fact,
        op: CompareOp,
        value: Value,
    },
    And(Box<Calculator>, Box<Calculator>),
    Or(Box<Calculator>, Box<Calculator>),
    Not(Box<Calculator>),
}

impl Calculator {
    #[must_use]
    pub fn and(self, other: Calculator) -> Calculator {
        Calculator::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn or(self, other: Calculator) -> Calculator {
        Calculator::Or(Box::new(self), Box::new(other))
    }

    /// Evaluate against the form. `None` means the expression produced no
    /// value (e.g. `record_id` on a new record).
    #[must_use]
    pub fn evaluate(&self, ctx: &FormContext) -> Option<Value> {
        crate::evaluate::eval_calculator(self, ctx)
    }
}

impl FromStr for Calculator {
    type Err = crate::parse::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::parse(s)
    }
}

impl Not for Calculator {
    type Output = Calculator;

    fn not(self) -> Calculator {
        Calculator::Not(Box::new(self))
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Neq => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Calculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Calculator::Const(v) => write!(f, "{v}"),
            Calculator::Fact(fact) => write!(f, "{fact}"),
            Calculator::Compare { fact, op, value } => write!(f, "({fact} {op} {value})"),
            Calculator::And(a, b) => write!(f, "({a} AND {b})"),
            Calculator::Or(a, b) => write!(f, "({a} OR {b})"),
            Calculator::Not(inner) => write!(f, "(NOT {inner})"),
        }
    }
}

/// Intermediate builder for fact comparisons. Created by [`fact()`].
#[derive(Debug, Clone, Copy)]
pub struct FactExpr {
    fact: Fact,
}

impl FactExpr {
    fn compare(self, op: CompareOp, value: impl Into<Value>) -> Calculator {
        Calculator::Compare {
            fact: self.fact,
            op,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn eq(self, value: impl Into<Value>) -> Calculator {
        self.compare(CompareOp::Eq, value)
    }

    #[must_use]
    pub fn neq(self, value: impl Into<Value>) -> Calculator {
        self.compare(CompareOp::Neq, value)
    }

    #[must_use]
    pub fn gt(self, value: impl Into<Value>) -> Calculator {
        self.compare(CompareOp::Gt, value)
    }

    #[must_use]
    pub fn gte(self, value: impl Into<Value>) -> Calculator {
        self.compare(CompareOp::Gte, value)
    }

    #[must_use]
    pub fn lt(self, value: impl Into<Value>) -> Calculator {
        self.compare(CompareOp::Lt, value)
    }

    #[must_use]
    pub fn lte(self, value: impl Into<Value>) -> Calculator {
        self.compare(CompareOp::Lte, value)
    }

    /// The bare fact, without a comparison.
    #[must_use]
    pub fn value(self) -> Calculator {
        Calculator::Fact(self.fact)
    }
}

#[must_use]
pub fn fact(fact: Fact) -> FactExpr {
    FactExpr { fact }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fact_names_round_trip() {
        for f in Fact::ALL {
            assert_eq!(Fact::from_name(f.name()), Some(f));
        }
        assert_eq!(Fact::from_name("window"), None);
    }

    #[test]
    fn facts_resolve_against_form() {
        let ctx = FormContext::new()
            .modify(true)
            .with_selected(vec![serde_json::json!({"id": 1}), serde_json::json!({"id": 2})]);
        assert_eq!(Fact::IsModify.resolve(&ctx), Some(Value::Bool(true)));
        assert_eq!(Fact::HasId.resolve(&ctx), Some(Value::Bool(false)));
        assert_eq!(Fact::RecordId.resolve(&ctx), None);
        assert_eq!(Fact::SelectedCount.resolve(&ctx), Some(Value::Int(2)));
        assert_eq!(Fact::HasSelection.resolve(&ctx), Some(Value::Bool(true)));

        let ctx = ctx.with_id("77");
        assert_eq!(Fact::RecordId.resolve(&ctx), Some(Value::from("77")));
    }

    #[test]
    fn builder_produces_compare() {
        let calc = fact(Fact::SelectedCount).gte(1_i64);
        assert_eq!(
            calc,
            Calculator::Compare {
                fact: Fact::SelectedCount,
                op: CompareOp::Gte,
                value: Value::Int(1),
            }
        );
    }

    #[test]
    fn display_is_fully_parenthesized() {
        let calc = !fact(Fact::IsModify).value().and(fact(Fact::SelectedCount).gt(0_i64));
        assert_eq!(
            calc.to_string(),
            "(NOT (is_modify AND (selected_count > 0)))"
        );
    }
}
