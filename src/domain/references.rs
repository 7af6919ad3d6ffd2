use std::ops::Range;

use super::errors::EvalResult;

/// Byte ranges of every `letter digits+` token in `body`, left to right.
///
/// Tokens never overlap and take all consecutive digits. A letter directly
/// preceded by other letters still starts a token, so `ab1` contains `b1`.
pub fn find_references(body: &str) -> Vec<Range<usize>> {
    let bytes = body.as_bytes();
    let mut references = Vec::new();
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index].is_ascii_lowercase() {
            let digits = bytes[index + 1..]
                .iter()
                .take_while(|byte| byte.is_ascii_digit())
                .count();
            if digits > 0 {
                references.push(index..index + 1 + digits);
                index += 1 + digits;
                continue;
            }
        }
        index += 1;
    }

    references
}

/// Replaces every reference token in `body` with the text `resolve`
/// returns for it.
///
/// Tokens are resolved one at a time, left to right; the first failure
/// aborts the substitution.
///
/// # Examples
///
/// ```
/// use gridcalc::domain::substitute_references;
///
/// let text = substitute_references("a0*(b12+1)", |token| Ok(format!("[{token}]"))).unwrap();
/// assert_eq!(text, "[a0]*([b12]+1)");
/// ```
pub fn substitute_references<F>(body: &str, mut resolve: F) -> EvalResult<String>
where
    F: FnMut(&str) -> EvalResult<String>,
{
    let mut substituted = String::with_capacity(body.len());
    let mut copied_up_to = 0;

    for range in find_references(body) {
        substituted.push_str(&body[copied_up_to..range.start]);
        substituted.push_str(&resolve(&body[range.clone()])?);
        copied_up_to = range.end;
    }
    substituted.push_str(&body[copied_up_to..]);

    Ok(substituted)
}
