//! Validation of CPF numbers, the 11-digit identifiers of Brazilian taxpayers.
//!
//! The last two digits are check digits computed from the first nine.

use log::debug;
use std::error::Error;
use std::fmt::Display;

const NUM_DIGITS: usize = 11;

/// The reasons why an identifier is refused.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum IdentifierError {
    /// The input does not contain exactly 11 digits.
    WrongLength { found: usize },
    /// All the digits are the same (00000000000, 11111111111, ...).
    /// These numbers satisfy the checksum but are never issued.
    AllSameDigit,
    /// The check digit at the given position (10 or 11, counting from 1) does not match.
    ChecksumMismatch { position: usize },
}

impl Error for IdentifierError {}

impl Display for IdentifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentifierError::WrongLength { found } => {
                write!(f, "expected {} digits, found {}", NUM_DIGITS, found)
            }
            IdentifierError::AllSameDigit => write!(f, "all the digits are identical"),
            IdentifierError::ChecksumMismatch { position } => {
                write!(f, "check digit {} does not match", position)
            }
        }
    }
}

/// An identifier that passed all the checks. Only the digits are kept.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct ValidIdentifier {
    digits: String,
}

impl ValidIdentifier {
    /// The 11 digits, without punctuation.
    pub fn digits(&self) -> &str {
        &self.digits
    }
}

impl Display for ValidIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_identifier(&self.digits))
    }
}

fn check_digit(digits: &[u32]) -> u32 {
    // The weights go down to 2 for the last digit.
    let first_weight = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(idx, d)| d * (first_weight - idx as u32))
        .sum();
    match (sum * 10) % 11 {
        10 => 0,
        r => r,
    }
}

/// Checks an identifier. Any character that is not a digit is ignored, so both
/// `529.982.247-25` and `52998224725` are accepted.
pub fn validate_identifier(input: &str) -> Result<ValidIdentifier, IdentifierError> {
    let digits: Vec<u32> = input.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != NUM_DIGITS {
        return Err(IdentifierError::WrongLength {
            found: digits.len(),
        });
    }
    if digits.iter().all(|d| *d == digits[0]) {
        return Err(IdentifierError::AllSameDigit);
    }
    for position in [10, 11] {
        let expected = check_digit(&digits[..position - 1]);
        let found = digits[position - 1];
        if expected != found {
            debug!(
                "validate_identifier: check digit {}: expected {} found {}",
                position, expected, found
            );
            return Err(IdentifierError::ChecksumMismatch { position });
        }
    }
    Ok(ValidIdentifier {
        digits: digits
            .iter()
            .filter_map(|d| char::from_digit(*d, 10))
            .collect(),
    })
}

/// True if [`validate_identifier`] accepts the input.
pub fn is_valid_identifier(input: &str) -> bool {
    validate_identifier(input).is_ok()
}

/// Applies the `###.###.###-##` mask to the digits of the input, as they are typed.
///
/// Digits beyond the 11th are dropped. A separator is only written when a digit follows it.
///
/// ```
/// use vote_certainty::format_identifier;
///
/// assert_eq!(format_identifier("5299"), "529.9");
/// assert_eq!(format_identifier("529982247"), "529.982.247");
/// assert_eq!(format_identifier("52998224725"), "529.982.247-25");
/// ```
pub fn format_identifier(input: &str) -> String {
    let mut res = String::with_capacity(NUM_DIGITS + 3);
    for (idx, c) in input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(NUM_DIGITS)
        .enumerate()
    {
        match idx {
            3 | 6 => res.push('.'),
            9 => res.push('-'),
            _ => {}
        }
        res.push(c);
    }
    res
}
