//! Validation of inbound request parameters.
//!
//! Pure functions, no I/O. Every rejection carries the exact message the
//! caller puts in the problem body, so the messages here are part of the
//! public contract.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

pub const TITLE_PARAMETER: &str = "title";
pub const LANGUAGE_PARAMETER: &str = "language";
pub const PAGE_PARAMETER: &str = "page";
pub const RESULTS_PARAMETER: &str = "results";

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_RESULTS_PER_PAGE: u32 = 5;

/// A request parameter that is missing, empty, or malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Parameter 'title' is missing or invalid. \
             May only contain alphanumeric characters, dash, comma, period and whitespace")]
    InvalidTitle,

    #[error("Parameter 'language' has invalid value")]
    InvalidLanguage,

    #[error("Parameter 'page' has invalid value, needs to be a positive number")]
    InvalidPage,

    #[error("Parameter 'results' has invalid value, needs to be a positive number")]
    InvalidNumberOfResults,

    #[error("Invalid path parameter for id, needs to be a number")]
    InvalidId,
}

/// Languages the upstream API can answer in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Nb,
    En,
}

impl Language {
    /// The two-letter code used on the wire, both inbound and upstream.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::Nb => "nb",
            Language::En => "en",
        }
    }

    fn parse(code: &str) -> Result<Self, ValidationError> {
        match code {
            "nb" => Ok(Language::Nb),
            "en" => Ok(Language::En),
            _ => Err(ValidationError::InvalidLanguage),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Validated parameters for the title-search operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub title: String,
    pub language: Language,
    pub page: u32,
    pub results_per_page: u32,
}

/// Validated parameters for the single-project lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupParams {
    pub id: u64,
    pub language: Language,
}

/// Validate the query-string parameters of a search request.
///
/// `language` defaults to `nb` when absent; a supplied-but-unknown value is
/// a hard error, never a fallback. `page` and `results` default to 1 and 5.
///
/// # Errors
///
/// Returns the [`ValidationError`] naming the first offending parameter.
pub fn validate_query_params(raw: &HashMap<String, String>) -> Result<QueryParams, ValidationError> {
    let title = raw
        .get(TITLE_PARAMETER)
        .map(String::as_str)
        .filter(|t| is_valid_title(t))
        .ok_or(ValidationError::InvalidTitle)?;
    let language = parse_language(raw.get(LANGUAGE_PARAMETER).map(String::as_str))?;
    let page = parse_positive(
        raw.get(PAGE_PARAMETER).map(String::as_str),
        DEFAULT_PAGE,
        ValidationError::InvalidPage,
    )?;
    let results_per_page = parse_positive(
        raw.get(RESULTS_PARAMETER).map(String::as_str),
        DEFAULT_RESULTS_PER_PAGE,
        ValidationError::InvalidNumberOfResults,
    )?;

    Ok(QueryParams {
        title: title.to_owned(),
        language,
        page,
        results_per_page,
    })
}

/// Validate the path and query parameters of a lookup request.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidId`] unless `id` parses as a positive
/// integer, or [`ValidationError::InvalidLanguage`] for an unknown language.
pub fn validate_lookup_params(
    id: Option<&str>,
    language: Option<&str>,
) -> Result<LookupParams, ValidationError> {
    let id = id
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|&n| n > 0)
        .ok_or(ValidationError::InvalidId)?;
    let language = parse_language(language)?;

    Ok(LookupParams { id, language })
}

fn parse_language(raw: Option<&str>) -> Result<Language, ValidationError> {
    raw.map_or(Ok(Language::default()), Language::parse)
}

fn parse_positive(
    raw: Option<&str>,
    default: u32,
    error: ValidationError,
) -> Result<u32, ValidationError> {
    match raw {
        None => Ok(default),
        Some(value) => match value.parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(error),
        },
    }
}

/// A title is valid when it is non-empty and every character is a letter,
/// digit, whitespace, dash, comma or period. One bad character rejects the
/// whole string.
fn is_valid_title(title: &str) -> bool {
    !title.is_empty() && title.chars().all(is_valid_title_character)
}

fn is_valid_title_character(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || matches!(c, '-' | ',' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn query_with_title_only_applies_defaults() {
        let params = validate_query_params(&raw(&[("title", "reindeer")])).expect("valid");
        assert_eq!(params.title, "reindeer");
        assert_eq!(params.language, Language::Nb);
        assert_eq!(params.page, 1);
        assert_eq!(params.results_per_page, 5);
    }

    #[test]
    fn query_accepts_dash_comma_period_and_whitespace_in_title() {
        let result = validate_query_params(&raw(&[("title", "abc 123-d,e.f")]));
        assert!(result.is_ok(), "got: {result:?}");
    }

    #[test]
    fn query_rejects_title_with_illegal_characters() {
        let result = validate_query_params(&raw(&[("title", "abc123- ,-?")]));
        assert_eq!(result, Err(ValidationError::InvalidTitle));
    }

    #[test]
    fn query_rejects_empty_title() {
        let result = validate_query_params(&raw(&[("title", "")]));
        assert_eq!(result, Err(ValidationError::InvalidTitle));
    }

    #[test]
    fn query_rejects_missing_title() {
        let result = validate_query_params(&raw(&[("language", "nb")]));
        assert_eq!(result, Err(ValidationError::InvalidTitle));
    }

    #[test]
    fn query_rejects_unknown_language() {
        let result = validate_query_params(&raw(&[("title", "reindeer"), ("language", "ru")]));
        assert_eq!(result, Err(ValidationError::InvalidLanguage));
    }

    #[test]
    fn query_accepts_english_language() {
        let params =
            validate_query_params(&raw(&[("title", "reindeer"), ("language", "en")])).expect("valid");
        assert_eq!(params.language, Language::En);
    }

    #[test]
    fn query_accepts_explicit_page_and_results() {
        let params = validate_query_params(&raw(&[
            ("title", "reindeer"),
            ("page", "2"),
            ("results", "10"),
        ]))
        .expect("valid");
        assert_eq!(params.page, 2);
        assert_eq!(params.results_per_page, 10);
    }

    #[test]
    fn query_rejects_non_numeric_page() {
        let result = validate_query_params(&raw(&[("title", "reindeer"), ("page", "abc123- ,-?")]));
        assert_eq!(result, Err(ValidationError::InvalidPage));
    }

    #[test]
    fn query_rejects_zero_page() {
        let result = validate_query_params(&raw(&[("title", "reindeer"), ("page", "0")]));
        assert_eq!(result, Err(ValidationError::InvalidPage));
    }

    #[test]
    fn query_rejects_negative_results() {
        let result = validate_query_params(&raw(&[("title", "reindeer"), ("results", "-5")]));
        assert_eq!(result, Err(ValidationError::InvalidNumberOfResults));
    }

    #[test]
    fn lookup_accepts_numeric_id() {
        let params = validate_lookup_params(Some("9999"), None).expect("valid");
        assert_eq!(params.id, 9999);
        assert_eq!(params.language, Language::Nb);
    }

    #[test]
    fn lookup_rejects_non_numeric_id() {
        let result = validate_lookup_params(Some("Not an ID"), None);
        assert_eq!(result, Err(ValidationError::InvalidId));
    }

    #[test]
    fn lookup_rejects_zero_id() {
        let result = validate_lookup_params(Some("0"), None);
        assert_eq!(result, Err(ValidationError::InvalidId));
    }

    #[test]
    fn lookup_rejects_invalid_language_instead_of_falling_back() {
        let result = validate_lookup_params(Some("9999"), Some("sv"));
        assert_eq!(result, Err(ValidationError::InvalidLanguage));
    }
}
