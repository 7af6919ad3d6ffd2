//! Scanning of signed decimal literals inside an expression string.
//!
//! The scanner works in both directions. Forward scans find the right-hand
//! operand of an operator, backward scans find the left-hand one. Signs are
//! handled asymmetrically: reading forward a sign can only lead a literal,
//! reading backward it can only be picked up once digits have been seen.

/// Direction in which [`scan_number`] walks the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// A literal located by [`scan_number`].
///
/// `start` and `end` are byte offsets into the scanned text, both inclusive.
/// For backward scans `start` includes any sign characters that were
/// consumed, so replacing `start..=end` removes the whole signed operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberSpan {
    pub start: usize,
    pub end: usize,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Digit,
    Point,
    Sign,
    Other,
}

impl CharClass {
    fn of(byte: u8) -> Self {
        match byte {
            b'0'..=b'9' => CharClass::Digit,
            b'.' => CharClass::Point,
            b'+' | b'-' => CharClass::Sign,
            _ => CharClass::Other,
        }
    }
}

/// Accumulated state of one scanning attempt.
#[derive(Debug, Default)]
struct Attempt {
    /// Lowest byte offset of the digit/point run.
    first: Option<usize>,
    /// Highest byte offset of the digit/point run.
    last: Option<usize>,
    numeric: bool,
    decimal: bool,
    signed: bool,
    negative: bool,
}

impl Attempt {
    fn flip_if_minus(&mut self, byte: u8) {
        if byte == b'-' {
            self.negative = !self.negative;
        }
    }

    fn value(&self, bytes: &[u8]) -> Option<f64> {
        if !self.numeric {
            return None;
        }
        let (first, last) = (self.first?, self.last?);
        if last < first {
            return None;
        }
        let literal = std::str::from_utf8(&bytes[first..=last]).ok()?;
        let magnitude = literal.parse::<f64>().ok()?;
        Some(if self.negative { -magnitude } else { magnitude })
    }
}

/// Scans the literal starting at `start` in the given direction.
///
/// Returns `None` when no digit is ever accepted or `start` lies outside
/// the text.
///
/// # Examples
///
/// ```
/// use gridcalc::domain::{scan_number, Direction};
///
/// let span = scan_number("3.5+2", 0, Direction::Forward).unwrap();
/// assert_eq!((span.start, span.end, span.value), (0, 2, 3.5));
///
/// let span = scan_number("3.5+2", 3, Direction::Backward).unwrap();
/// assert_eq!((span.start, span.end, span.value), (0, 2, 3.5));
/// ```
pub fn scan_number(text: &str, start: usize, direction: Direction) -> Option<NumberSpan> {
    let bytes = text.as_bytes();
    if start >= bytes.len() {
        return None;
    }
    match direction {
        Direction::Forward => scan_forward(bytes, start),
        Direction::Backward => scan_backward(bytes, start),
    }
}

fn scan_forward(bytes: &[u8], start: usize) -> Option<NumberSpan> {
    let mut attempt = Attempt::default();

    for (index, &byte) in bytes.iter().enumerate().skip(start) {
        let class = CharClass::of(byte);
        let accepted = match class {
            CharClass::Digit => true,
            CharClass::Point => !attempt.decimal,
            CharClass::Sign => !attempt.decimal && !attempt.numeric,
            CharClass::Other => false,
        };

        if accepted {
            attempt.last = Some(index);
            attempt.first.get_or_insert(index);
            match class {
                CharClass::Digit => attempt.numeric = true,
                CharClass::Point => attempt.decimal = true,
                CharClass::Sign => {
                    // The literal itself starts after the sign.
                    attempt.first = Some(index + 1);
                    attempt.signed = true;
                    attempt.flip_if_minus(byte);
                }
                CharClass::Other => {}
            }
        } else if attempt.first.is_some() && attempt.numeric {
            break;
        } else {
            attempt = Attempt::default();
        }
    }

    let value = attempt.value(bytes)?;
    Some(NumberSpan {
        start: attempt.first?,
        end: attempt.last?,
        value,
    })
}

fn scan_backward(bytes: &[u8], start: usize) -> Option<NumberSpan> {
    let mut attempt = Attempt::default();
    // Offset of the character that ended the scan; `None` when the scan
    // ran off the beginning of the text.
    let mut stop = None;

    for index in (0..=start).rev() {
        let byte = bytes[index];
        let class = CharClass::of(byte);
        let accepted = match class {
            CharClass::Digit => !attempt.signed,
            CharClass::Point => !attempt.decimal && !attempt.signed,
            CharClass::Sign => attempt.numeric,
            CharClass::Other => false,
        };

        if accepted {
            attempt.last.get_or_insert(index);
            match class {
                CharClass::Digit => {
                    attempt.numeric = true;
                    attempt.first = Some(index);
                }
                CharClass::Point => {
                    attempt.decimal = true;
                    attempt.first = Some(index);
                }
                CharClass::Sign => {
                    attempt.signed = true;
                    attempt.flip_if_minus(byte);
                }
                CharClass::Other => {}
            }
        } else if attempt.last.is_some() && attempt.numeric {
            let mut end_of_context = index;
            if matches!(class, CharClass::Digit | CharClass::Point) && attempt.signed {
                // The sign next to this digit is the enclosing binary
                // operator, not part of the literal: give it back.
                end_of_context += 1;
                attempt.flip_if_minus(bytes[end_of_context]);
            }
            stop = Some(end_of_context);
            break;
        } else {
            attempt = Attempt::default();
        }
    }

    let value = attempt.value(bytes)?;
    Some(NumberSpan {
        start: stop.map_or(0, |index| index + 1),
        end: attempt.last?,
        value,
    })
}
