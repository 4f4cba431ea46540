use winnow::ascii::dec_int;
use winnow::combinator::{alt, cut_err, delimited, fail, opt, preceded, repeat};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use crate::{Calculator, CompareOp, Fact, Value};

// -- Whitespace -------------------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

// -- Identifiers ------------------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

// -- Values -----------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn negative_number(input: &mut &str) -> ModalResult<Value> {
    let neg_str = (
        '-',
        take_while(1.., |c: char| c.is_ascii_digit() || c == '.'),
    )
        .take()
        .parse_next(input)?;
    if neg_str.contains('.') {
        let f: f64 = neg_str
            .parse()
            .map_err(|_| ErrMode::from_input(input).cut())?;
        Ok(Value::Float(f))
    } else {
        let i: i64 = neg_str
            .parse()
            .map_err(|_| ErrMode::from_input(input).cut())?;
        Ok(Value::Int(i))
    }
}

fn float_literal(input: &mut &str) -> ModalResult<f64> {
    (
        take_while(1.., |c: char| c.is_ascii_digit()),
        '.',
        take_while(1.., |c: char| c.is_ascii_digit()),
    )
        .take()
        .try_map(|s: &str| s.parse::<f64>())
        .parse_next(input)
}

fn value(input: &mut &str) -> ModalResult<Value> {
    ws.parse_next(input)?;
    alt((
        string_literal.map(Value::String),
        "true".value(Value::Bool(true)),
        "false".value(Value::Bool(false)),
        negative_number,
        float_literal.map(Value::Float),
        dec_int::<_, i64, _>.map(Value::Int),
    ))
    .context(StrContext::Expected(StrContextValue::Description("value")))
    .parse_next(input)
}

// -- Comparison operators ---------------------------------------------------

fn compare_op(input: &mut &str) -> ModalResult<CompareOp> {
    ws.parse_next(input)?;
    alt((
        ">=".value(CompareOp::Gte),
        ">".value(CompareOp::Gt),
        "<=".value(CompareOp::Lte),
        "<".value(CompareOp::Lt),
        "==".value(CompareOp::Eq),
        "!=".value(CompareOp::Neq),
    ))
    .parse_next(input)
}

// -- Expressions (precedence: OR < AND < NOT < primary) ---------------------

/// Deepest `NOT`/parenthesis nesting accepted. An `AND`/`OR` chain also counts
/// one level per operator.
pub(crate) const MAX_DEPTH: usize = 64;

fn check_depth(input: &mut &str, depth: usize) -> ModalResult<()> {
    if depth > MAX_DEPTH {
        return cut_err(fail.context(StrContext::Expected(StrContextValue::Description(
            "at most 64 levels of nesting",
        ))))
        .parse_next(input);
    }
    Ok(())
}

fn fact_or_comparison(input: &mut &str) -> ModalResult<Calculator> {
    let fact = cut_err(ident.verify_map(Fact::from_name))
        .context(StrContext::Expected(StrContextValue::Description(
            "fact name",
        )))
        .parse_next(input)?;
    let checkpoint = input.checkpoint();
    if let Ok(op) = compare_op.parse_next(input) {
        let value = cut_err(value).parse_next(input)?;
        Ok(Calculator::Compare { fact, op, value })
    } else {
        input.reset(&checkpoint);
        Ok(Calculator::Fact(fact))
    }
}

fn primary(input: &mut &str, depth: usize) -> ModalResult<Calculator> {
    ws.parse_next(input)?;
    alt((
        delimited(
            '(',
            |i: &mut &str| expr(i, depth + 1),
            (ws, cut_err(')')),
        ),
        value.map(Calculator::Const),
        fact_or_comparison,
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "expression",
    )))
    .parse_next(input)
}

fn unary(input: &mut &str, depth: usize) -> ModalResult<Calculator> {
    check_depth(input, depth)?;
    ws.parse_next(input)?;
    if opt(alt(("NOT", "not"))).parse_next(input)?.is_some() {
        let inner = cut_err(|i: &mut &str| unary(i, depth + 1)).parse_next(input)?;
        Ok(Calculator::Not(Box::new(inner)))
    } else {
        primary(input, depth)
    }
}

fn and_expr(input: &mut &str, depth: usize) -> ModalResult<Calculator> {
    let first = unary(input, depth)?;
    let rest: Vec<Calculator> = repeat(
        0..,
        preceded(
            (ws, alt(("AND", "and"))),
            cut_err(|i: &mut &str| unary(i, depth + 1)),
        ),
    )
    .parse_next(input)?;
    check_depth(input, depth + rest.len())?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, r| Calculator::And(Box::new(acc), Box::new(r))))
}

fn or_expr(input: &mut &str, depth: usize) -> ModalResult<Calculator> {
    let first = and_expr(input, depth)?;
    let rest: Vec<Calculator> = repeat(
        0..,
        preceded(
            (ws, alt(("OR", "or"))),
            cut_err(|i: &mut &str| and_expr(i, depth + 1)),
        ),
    )
    .parse_next(input)?;
    check_depth(input, depth + rest.len())?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, r| Calculator::Or(Box::new(acc), Box::new(r))))
}

fn expr(input: &mut &str, depth: usize) -> ModalResult<Calculator> {
    ws.parse_next(input)?;
    or_expr(input, depth)
}

// -- Top-level parser -------------------------------------------------------

pub fn calculator(input: &mut &str) -> ModalResult<Calculator> {
    let calc = expr(input, 0)?;
    ws.parse_next(input)?;
    Ok(calc)
}
