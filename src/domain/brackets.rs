use super::errors::{EvalError, EvalResult};

/// The outermost matched bracket pair of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketSpan<'a> {
    /// Byte offset of the opening `(`.
    pub open: usize,
    /// Byte offset of the matching `)`.
    pub close: usize,
    /// Text strictly between the two brackets.
    pub inner: &'a str,
}

/// Finds the first top-level bracket pair in `text`.
///
/// Returns `Ok(None)` when the text contains no brackets. The whole text is
/// checked for balance even though only the first pair is reported, so an
/// excess `)` or an unclosed `(` anywhere fails with
/// [`EvalError::UnbalancedBrackets`].
///
/// # Examples
///
/// ```
/// use gridcalc::domain::locate_brackets;
///
/// let span = locate_brackets("2*(1+(3))").unwrap().unwrap();
/// assert_eq!((span.open, span.close, span.inner), (2, 8, "1+(3)"));
/// assert!(locate_brackets("1+2").unwrap().is_none());
/// ```
pub fn locate_brackets(text: &str) -> EvalResult<Option<BracketSpan<'_>>> {
    let mut depth = 0usize;
    let mut open = None;
    let mut close = None;

    for (index, byte) in text.bytes().enumerate() {
        match byte {
            b'(' => {
                if depth == 0 && open.is_none() {
                    open = Some(index);
                }
                depth += 1;
            }
            b')' => {
                if depth == 0 {
                    return Err(EvalError::UnbalancedBrackets);
                }
                depth -= 1;
                if depth == 0 && close.is_none() {
                    close = Some(index);
                }
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(EvalError::UnbalancedBrackets);
    }

    Ok(open.zip(close).map(|(open, close)| BracketSpan {
        open,
        close,
        inner: &text[open + 1..close],
    }))
}
