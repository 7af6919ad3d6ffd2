//! Evaluation of an arithmetic expression string.
//!
//! The expression is never turned into a tree. It is rewritten in place:
//! bracketed groups are evaluated recursively and spliced back as literals,
//! then the multiplicative tier and the additive tier are each exhausted in
//! turn. Whatever is left must be a single number.

use super::brackets::locate_brackets;
use super::errors::{EvalError, EvalResult};
use super::models::format_number;
use super::operators::{resolve_tier, Tier};
use super::stack::ensure_sufficient_stack;

/// Evaluates an expression made of numbers, brackets and `+ - * /`.
///
/// Cell references must already have been substituted. Whitespace is
/// ignored. Division by zero is not an error: it produces an infinite or
/// NaN result.
///
/// # Examples
///
/// ```
/// use gridcalc::domain::evaluate_expression;
///
/// assert_eq!(evaluate_expression("(2+3)*4").unwrap(), 20.0);
/// assert_eq!(evaluate_expression("1 + 2 * 3").unwrap(), 7.0);
/// assert!(evaluate_expression("1/(1-1)").unwrap().is_infinite());
/// assert!(evaluate_expression("(1+2").is_err());
/// ```
pub fn evaluate_expression(text: &str) -> EvalResult<f64> {
    let expr: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    reduce(expr)
}

fn reduce(mut expr: String) -> EvalResult<f64> {
    if let Some(value) = parse_literal(&expr) {
        return Ok(value);
    }

    while let Some(span) = locate_brackets(&expr)? {
        let inner = span.inner.to_string();
        let (open, close) = (span.open, span.close);
        let value = ensure_sufficient_stack(|| reduce(inner))?;
        expr.replace_range(open..=close, &format_number(value));
    }

    let expr = resolve_tier(expr, Tier::Multiplicative)?;
    let expr = resolve_tier(expr, Tier::Additive)?;

    parse_literal(&expr).ok_or(EvalError::MalformedExpression(expr))
}

/// Parses a whole expression that is already a single number.
///
/// Accepts an optionally signed decimal literal, or one of the texts a
/// non-finite intermediate result is spliced back as. Exponents and other
/// spellings of infinity or NaN are not literals.
fn parse_literal(text: &str) -> Option<f64> {
    match text {
        "inf" => return Some(f64::INFINITY),
        "-inf" => return Some(f64::NEG_INFINITY),
        "NaN" => return Some(f64::NAN),
        _ => {}
    }

    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let digits = unsigned.bytes().filter(u8::is_ascii_digit).count();
    let points = unsigned.bytes().filter(|&b| b == b'.').count();
    if digits == 0 || points > 1 || digits + points != unsigned.len() {
        return None;
    }
    text.parse().ok()
}
