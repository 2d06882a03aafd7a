//! Canonical mobile numbers and the normalization that produces them.
//!
//! [`MobileNumber`] is the only form the rest of the service handles. All the
//! messy inputs people type ("+91 83180 90007", "083180-90007") collapse to
//! one canonical spelling before any storage or upstream call happens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{COUNTRY_CODE_RULES, MOBILE_NUMBER_LEN, VALID_LEADING_DIGITS};
use crate::error::{CoreError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// MOBILE NUMBER
// ═══════════════════════════════════════════════════════════════════════════════

/// A mobile number in canonical national form: exactly ten ASCII digits,
/// the first of which is 6, 7, 8 or 9.
///
/// The only way to obtain one is [`MobileNumber::parse`], so holding a
/// `MobileNumber` is proof the digits already passed validation. Parsing is
/// idempotent: feeding a canonical number back in returns an equal value.
///
/// # Example
/// ```
/// use namelink_core::MobileNumber;
///
/// let a = MobileNumber::parse("8318090007").unwrap();
/// let b = MobileNumber::parse("+91-83180-90007").unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MobileNumber(String);

impl MobileNumber {
    /// Normalizes free-form input into a canonical mobile number.
    ///
    /// Strips every non-digit character, removes a recognized country-code
    /// prefix (longer unrecognized inputs keep their last ten digits), then
    /// validates length and leading digit.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

        if digits.is_empty() {
            return Err(CoreError::EmptyNumber);
        }

        if digits.len() > MOBILE_NUMBER_LEN {
            let rule = COUNTRY_CODE_RULES
                .iter()
                .find(|(prefix, total)| digits.len() == *total && digits.starts_with(prefix));
            match rule {
                Some((prefix, _)) => {
                    digits.drain(..prefix.len());
                }
                None => {
                    digits.drain(..digits.len() - MOBILE_NUMBER_LEN);
                }
            }
        }

        if digits.len() != MOBILE_NUMBER_LEN {
            return Err(CoreError::InvalidLength {
                digits: digits.len(),
            });
        }

        match digits.chars().next() {
            Some(d) if VALID_LEADING_DIGITS.contains(&d) => Ok(Self(digits)),
            Some(d) => Err(CoreError::InvalidPrefix { digit: d }),
            None => Err(CoreError::EmptyNumber),
        }
    }

    /// Returns the canonical ten digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the number, returning the owned digit string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for MobileNumber {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MobileNumber {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<MobileNumber> for String {
    fn from(number: MobileNumber) -> Self {
        number.0
    }
}

impl fmt::Debug for MobileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MobileNumber({})", self.0)
    }
}

impl fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
