use tracing::{debug, warn};

use crate::{Calculator, Effect, FormContext, Rule, RuleCode, Value};

/// Whether `button_code` is explicitly allowed while editing, despite the
/// general edit lock.
///
/// Considers in-use `visibilitybutton` rules whose `component_action` is
/// `"modify"`. With no such rule there is no override and the result is
/// `false`. Otherwise the button is allowed when the form is being modified and
/// any of those rules lists it in `component_result` with `ena_dis == "false"`.
#[must_use]
pub fn check_button_visibility(rules: &[Rule], is_modify: bool, button_code: &str) -> bool {
    let mut matching = rules
        .iter()
        .filter(|r| {
            r.code == RuleCode::VisibilityButton
                && r.in_use
                && r.config.component_action() == Some("modify")
        })
        .peekable();

    if matching.peek().is_none() {
        return false;
    }

    is_modify
        && matching.any(|r| {
            r.config.targets().any(|t| t == button_code)
                && r.config.effect() == Some(Effect::Enable)
        })
}

/// Whether any `visibility` rule forces `button_code` disabled.
///
/// A rule fires when its trimmed targets contain the button, its event is
/// `on_change` (or `on_click` with `component_action` differing from the raw
/// `component_result` string), and `ena_dis == "true"`. `inUse` is not
/// consulted here.
#[must_use]
pub fn disable_button(rules: &[Rule], button_code: &str) -> bool {
    rules
        .iter()
        .filter(|r| r.code == RuleCode::Visibility)
        .any(|r| {
            let config = &r.config;
            let event = config.component_event();
            let fires = config.trimmed_targets().any(|t| t == button_code)
                && (event == Some("on_change")
                    || (config.component_action() != config.component_result()
                        && event == Some("on_click")))
                && config.effect() == Some(Effect::Disable);
            if fires {
                debug!(button = button_code, order = %r.order, "visibility rule disables button");
            }
            fires
        })
}

/// Click-time gate. Returns `true` when the click must be locked.
///
/// Looks at in-use `visibility` rules bound to `on_click`. With none, the click
/// is never locked. When editing, an `ena_dis == "false"` rule that targets
/// `field_name` unlocks unconditionally. Otherwise the click is locked when any
/// rule's `component_action` equals its raw `component_result` and
/// `ena_dis == "true"`.
#[must_use]
pub fn check_rules(rules: &[Rule], is_modify: bool, field_name: &str) -> bool {
    let on_click: Vec<&Rule> = rules
        .iter()
        .filter(|r| {
            r.code == RuleCode::Visibility
                && r.in_use
                && r.config.component_event() == Some("on_click")
        })
        .collect();

    if on_click.is_empty() {
        return false;
    }

    if is_modify
        && on_click.iter().any(|r| {
            r.config.effect() == Some(Effect::Enable)
                && r.config.targets().any(|t| t == field_name)
        })
    {
        debug!(field = field_name, "click explicitly unlocked while editing");
        return false;
    }

    on_click.iter().any(|r| {
        r.config.component_action() == r.config.component_result()
            && r.config.effect() == Some(Effect::Disable)
    })
}

/// Run every `calculator` rule bound to `action` and report the derived modify
/// flag through `set_is_modify`, once per rule that produced one. The last call
/// wins.
///
/// Rules that are not `on_click` or carry no `function_cal` are skipped
/// silently. An unparsable `function_cal` is logged and skipped. A calculator
/// that yields no value is logged and reported as `false`.
pub fn handle_rule_execution(
    rules: &[Rule],
    action: &str,
    ctx: &FormContext,
    mut set_is_modify: impl FnMut(bool),
) {
    let calculators = rules.iter().filter(|r| {
        r.code == RuleCode::Calculator && r.config.component_action() == Some(action)
    });

    for rule in calculators {
        if rule.config.component_event() != Some("on_click") {
            continue;
        }
        let Some(source) = rule.config.function_cal() else {
            continue;
        };
        let calc: Calculator = match source.parse() {
            Ok(calc) => calc,
            Err(err) => {
                warn!(
                    action,
                    function_cal = source,
                    error = %err,
                    "skipping unparsable calculator"
                );
                continue;
            }
        };
        let flag = match calc.evaluate(ctx) {
            Some(value) => value.as_flag(),
            None => {
                warn!(
                    action,
                    function_cal = source,
                    "calculator produced no value; treating as not modified"
                );
                false
            }
        };
        debug!(action, flag, "calculator rule fired");
        set_is_modify(flag);
    }
}

pub(crate) fn eval_calculator(calc: &Calculator, ctx: &FormContext) -> Option<Value> {
    match calc {
        Calculator::Const(value) => Some(value.clone()),
        Calculator::Fact(fact) => fact.resolve(ctx),
        Calculator::Compare { fact, op, value } => {
            let Some(actual) = fact.resolve(ctx) else {
                return Some(Value::Bool(false));
            };
            let result = actual.compare(*op, value);
            if result.is_none() {
                debug!(
                    %fact,
                    actual = actual.type_name(),
                    literal = value.type_name(),
                    "comparison across types is false"
                );
            }
            Some(Value::Bool(result.unwrap_or(false)))
        }
        Calculator::And(a, b) => Some(Value::Bool(flag(a, ctx) && flag(b, ctx))),
        Calculator::Or(a, b) => Some(Value::Bool(flag(a, ctx) || flag(b, ctx))),
        Calculator::Not(inner) => Some(Value::Bool(!flag(inner, ctx))),
    }
}

fn flag(calc: &Calculator, ctx: &FormContext) -> bool {
    eval_calculator(calc, ctx).is_some_and(|v| v.as_flag())
}
