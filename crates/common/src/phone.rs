//! Phone number normalization and validation.
//!
//! Every layer of the service works with one canonical representation of an
//! Algerian mobile number: the 10-character local format `0XXXXXXXXX` with a
//! second digit of 5, 6 or 7. International prefixes (`+213`, `00213`, bare
//! `213`) and formatting noise are folded into that form before anything is
//! validated, stored or looked up.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{AppError, AppResult};

/// Canonical local mobile format: `0` + {5,6,7} + 8 digits.
static MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0[567]\d{8}$").expect("mobile pattern is valid"));

/// Bare subscriber number missing the leading trunk `0`.
static BARE_MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[567]\d{8}$").expect("bare mobile pattern is valid"));

/// Normalize a phone number to the canonical local format.
///
/// Strips whitespace, hyphens and parentheses, then folds international
/// prefixes into a local leading `0`. Does not validate; pair with
/// [`is_valid_mobile`] or use [`normalize_and_validate`].
#[must_use]
pub fn normalize(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();

    // Prefix priority: +213, 00213, bare 213, then a bare 9-digit
    // subscriber number. Already-local numbers pass through.
    if let Some(rest) = cleaned.strip_prefix("+213") {
        format!("0{rest}")
    } else if let Some(rest) = cleaned.strip_prefix("00213") {
        format!("0{rest}")
    } else if let Some(rest) = cleaned.strip_prefix("213") {
        format!("0{rest}")
    } else if BARE_MOBILE_RE.is_match(&cleaned) {
        format!("0{cleaned}")
    } else {
        cleaned
    }
}

/// Whether a string is already in the canonical mobile format.
#[must_use]
pub fn is_valid_mobile(phone: &str) -> bool {
    MOBILE_RE.is_match(phone)
}

/// Normalize and validate in one step.
///
/// Returns the canonical `0XXXXXXXXX` form, or [`AppError::InvalidPhone`]
/// carrying both the original input and the normalized value for diagnostics.
pub fn normalize_and_validate(input: &str) -> AppResult<String> {
    let normalized = normalize(input);
    if is_valid_mobile(&normalized) {
        Ok(normalized)
    } else {
        Err(AppError::InvalidPhone {
            input: input.to_string(),
            normalized,
        })
    }
}
