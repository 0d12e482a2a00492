//! Centralized validation and helper functions.

/// Maximum number of signals accepted from a single input (DOS protection)
pub const MAX_SIGNALS: usize = 10_000;

/// Minimum input size in bytes
pub const MIN_FILE_CONTENT_SIZE: usize = 1;

/// Input validation error types
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid nucleus label '{0}': expected mass number and element, e.g. 13C")]
    InvalidNucleus(String),
    #[error("File content appears malformed or invalid")]
    InvalidFileContent,
}

/// Validate a nucleus label: a mass number followed by an element symbol.
///
/// # Examples
///
/// ```
/// use signal_registry::utils::validation::is_valid_nucleus;
///
/// assert!(is_valid_nucleus("13C"));
/// assert!(is_valid_nucleus("29Si"));
/// assert!(!is_valid_nucleus("C13"));
/// assert!(!is_valid_nucleus("13"));
/// ```
#[must_use]
pub fn is_valid_nucleus(s: &str) -> bool {
    let element = s.trim_start_matches(|c: char| c.is_ascii_digit());
    let mass_digits = s.len() - element.len();
    let mut chars = element.chars();

    mass_digits > 0
        && chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_lowercase())
        && element.len() <= 2
}

/// Validate a nucleus label and return it unchanged
///
/// # Errors
///
/// Returns `ValidationError::InvalidNucleus` if the label is not well formed.
pub fn validate_nucleus(s: &str) -> Result<String, ValidationError> {
    let trimmed = s.trim();
    if is_valid_nucleus(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(ValidationError::InvalidNucleus(s.to_string()))
    }
}

/// Normalize a multiplicity label to lowercase.
/// Returns None for empty labels and the placeholder `-`.
#[must_use]
pub fn normalize_multiplicity(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "-" {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Check if adding another signal would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new signal.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_signal_limit(count: usize) -> Option<String> {
    if count >= MAX_SIGNALS {
        Some(format!(
            "Too many signals: adding another would exceed maximum of {MAX_SIGNALS}"
        ))
    } else {
        None
    }
}

/// Reject inputs that are empty or clearly not text
///
/// # Errors
///
/// Returns `ValidationError::InvalidFileContent` if the content is too small,
/// contains excessive binary data, or fails UTF-8 validation.
pub fn validate_text_content(content: &[u8]) -> Result<(), ValidationError> {
    if content.len() < MIN_FILE_CONTENT_SIZE {
        return Err(ValidationError::InvalidFileContent);
    }

    let non_printable_count = content
        .iter()
        .filter(|&&b| b < 9 || (b > 13 && b < 32))
        .count();

    // Allow up to 5% control characters
    if content.len() > 100 && non_printable_count > content.len() / 20 {
        return Err(ValidationError::InvalidFileContent);
    }

    if std::str::from_utf8(content).is_err() {
        return Err(ValidationError::InvalidFileContent);
    }

    Ok(())
}
