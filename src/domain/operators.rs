//! Resolution of one operator precedence tier by textual rewriting.
//!
//! Each step finds the leftmost numeral that is immediately followed by an
//! operator of the tier, scans the operands on both sides, and splices the
//! result back into the expression.

use super::errors::{EvalError, EvalResult};
use super::models::format_number;
use super::scanner::{scan_number, Direction};

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'+' => Some(BinaryOp::Add),
            b'-' => Some(BinaryOp::Subtract),
            b'*' => Some(BinaryOp::Multiply),
            b'/' => Some(BinaryOp::Divide),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Subtract => '-',
            BinaryOp::Multiply => '*',
            BinaryOp::Divide => '/',
        }
    }

    pub fn tier(self) -> Tier {
        match self {
            BinaryOp::Add | BinaryOp::Subtract => Tier::Additive,
            BinaryOp::Multiply | BinaryOp::Divide => Tier::Multiplicative,
        }
    }

    /// Applies the operator with IEEE-754 semantics; division by zero
    /// yields an infinity or NaN rather than an error.
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOp::Add => left + right,
            BinaryOp::Subtract => left - right,
            BinaryOp::Multiply => left * right,
            BinaryOp::Divide => left / right,
        }
    }
}

/// One precedence level of operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// `*` and `/`
    Multiplicative,
    /// `+` and `-`
    Additive,
}

impl Tier {
    fn operator_at(self, bytes: &[u8], index: usize) -> Option<BinaryOp> {
        let op = BinaryOp::from_byte(*bytes.get(index)?)?;
        (op.tier() == self).then_some(op)
    }
}

/// Location of "numeral followed by a tier operator".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OperatorMatch {
    /// Offset of the digit right before the operator (or before its `.`).
    anchor: usize,
    /// Offset of the operator itself.
    position: usize,
    op: BinaryOp,
}

/// Finds the leftmost digit that is followed directly by a tier operator,
/// or by a decimal point and then a tier operator (as in `3.*2`).
fn find_operator(expr: &str, tier: Tier) -> Option<OperatorMatch> {
    let bytes = expr.as_bytes();
    bytes
        .iter()
        .enumerate()
        .filter(|(_, byte)| byte.is_ascii_digit())
        .find_map(|(anchor, _)| {
            if let Some(op) = tier.operator_at(bytes, anchor + 1) {
                return Some(OperatorMatch { anchor, position: anchor + 1, op });
            }
            if bytes.get(anchor + 1) == Some(&b'.') {
                if let Some(op) = tier.operator_at(bytes, anchor + 2) {
                    return Some(OperatorMatch { anchor, position: anchor + 2, op });
                }
            }
            None
        })
}

/// Rewrites `expr` until no operator of `tier` is left to apply.
///
/// Operators of one tier are applied strictly left to right.
///
/// # Examples
///
/// ```
/// use gridcalc::domain::{resolve_tier, Tier};
///
/// assert_eq!(resolve_tier("1+2*3".to_string(), Tier::Multiplicative).unwrap(), "1+6");
/// assert_eq!(resolve_tier("8-2-1".to_string(), Tier::Additive).unwrap(), "5");
/// ```
pub fn resolve_tier(mut expr: String, tier: Tier) -> EvalResult<String> {
    while let Some(found) = find_operator(&expr, tier) {
        let malformed = EvalError::MalformedOperand { operator: found.op.symbol() };
        let left = scan_number(&expr, found.anchor, Direction::Backward).ok_or(malformed.clone())?;
        let right = scan_number(&expr, found.position + 1, Direction::Forward).ok_or(malformed)?;

        let result = found.op.apply(left.value, right.value);
        tracing::trace!(
            left = left.value,
            op = %found.op.symbol(),
            right = right.value,
            result,
            "applied operator"
        );
        expr.replace_range(left.start..=right.end, &format_number(result));
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolve(expr: &str, tier: Tier) -> EvalResult<String> {
        resolve_tier(expr.to_string(), tier)
    }

    #[test]
    fn test_binary_op_apply() {
        assert_eq!(BinaryOp::Add.apply(2.0, 3.0), 5.0);
        assert_eq!(BinaryOp::Subtract.apply(2.0, 3.0), -1.0);
        assert_eq!(BinaryOp::Multiply.apply(2.0, 3.0), 6.0);
        assert_eq!(BinaryOp::Divide.apply(3.0, 2.0), 1.5);
        assert!(BinaryOp::Divide.apply(1.0, 0.0).is_infinite());
        assert!(BinaryOp::Divide.apply(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_tier_membership() {
        assert_eq!(BinaryOp::from_byte(b'*').map(BinaryOp::tier), Some(Tier::Multiplicative));
        assert_eq!(BinaryOp::from_byte(b'-').map(BinaryOp::tier), Some(Tier::Additive));
        assert_eq!(BinaryOp::from_byte(b'^'), None);
    }

    #[test]
    fn test_multiplicative_leaves_additive_alone() {
        assert_eq!(resolve("1+2*3", Tier::Multiplicative).unwrap(), "1+6");
        assert_eq!(resolve("2*3+4/8", Tier::Multiplicative).unwrap(), "6+0.5");
    }

    #[test]
    fn test_left_to_right_within_tier() {
        assert_eq!(resolve("8/4/2", Tier::Multiplicative).unwrap(), "1");
        assert_eq!(resolve("10-4-3", Tier::Additive).unwrap(), "3");
        assert_eq!(resolve("1-2+3", Tier::Additive).unwrap(), "2");
    }

    #[test]
    fn test_subtraction_before_product_is_kept() {
        assert_eq!(resolve("6-4*5", Tier::Multiplicative).unwrap(), "6-20");
        assert_eq!(resolve("6-20", Tier::Additive).unwrap(), "-14");
    }

    #[test]
    fn test_signed_operands() {
        assert_eq!(resolve("2*-3", Tier::Multiplicative).unwrap(), "-6");
        assert_eq!(resolve("5+-3*2", Tier::Multiplicative).unwrap(), "5+-6");
        assert_eq!(resolve("5+-6", Tier::Additive).unwrap(), "-1");
        assert_eq!(resolve("5--3", Tier::Additive).unwrap(), "8");
        assert_eq!(resolve("-5+3", Tier::Additive).unwrap(), "-2");
    }

    #[test]
    fn test_trailing_point_operand() {
        assert_eq!(resolve("3.*2", Tier::Multiplicative).unwrap(), "6");
    }

    #[test]
    fn test_division_by_zero_is_carried_as_text() {
        assert_eq!(resolve("1/0", Tier::Multiplicative).unwrap(), "inf");
        assert_eq!(resolve("0/0", Tier::Multiplicative).unwrap(), "NaN");
    }

    #[test]
    fn test_missing_right_operand() {
        assert_eq!(
            resolve("5*", Tier::Multiplicative),
            Err(EvalError::MalformedOperand { operator: '*' })
        );
        assert_eq!(
            resolve("5+x", Tier::Additive),
            Err(EvalError::MalformedOperand { operator: '+' })
        );
    }

    #[test]
    fn test_no_match_returns_input() {
        assert_eq!(resolve("*5", Tier::Multiplicative).unwrap(), "*5");
        assert_eq!(resolve("42", Tier::Additive).unwrap(), "42");
    }
}
