//! Argument validation for search terms.
//!
//! These checks run before any option is applied and before any I/O, so a
//! rejected call never reaches the network.

use crate::error::RegistrantAlertError;
use crate::types::{AdvancedSearchTerm, BasicSearchTerms};

/// Maximum number of terms in each search list.
pub const LIMIT_OF_SEARCH_TERMS: usize = 4;

/// Validate the terms of a basic search.
///
/// `include` must hold 1 to 4 items and `exclude` at most 4. Returns the
/// validated terms.
pub fn validate_basic(
    terms: Option<&BasicSearchTerms>,
) -> Result<&BasicSearchTerms, RegistrantAlertError> {
    let terms = terms.ok_or_else(|| {
        RegistrantAlertError::invalid_argument("basicSearchTerms.include", "is required.")
    })?;

    if terms.include.is_empty() || terms.include.len() > LIMIT_OF_SEARCH_TERMS {
        return Err(RegistrantAlertError::invalid_argument(
            "basicSearchTerms.include",
            "must have between 1 and 4 items.",
        ));
    }

    if terms.exclude.len() > LIMIT_OF_SEARCH_TERMS {
        return Err(RegistrantAlertError::invalid_argument(
            "basicSearchTerms.exclude",
            "must have between 0 and 4 items.",
        ));
    }

    Ok(terms)
}

/// Validate the terms of an advanced search.
///
/// Between 1 and 4 terms, each with a non-empty field and term. The first
/// offending index is reported.
pub fn validate_advanced(
    terms: Option<&[AdvancedSearchTerm]>,
) -> Result<&[AdvancedSearchTerm], RegistrantAlertError> {
    let terms = terms
        .ok_or_else(|| RegistrantAlertError::invalid_argument("advancedSearchTerms", "is required."))?;

    if terms.is_empty() || terms.len() > LIMIT_OF_SEARCH_TERMS {
        return Err(RegistrantAlertError::invalid_argument(
            "advancedSearchTerms",
            "must have between 1 and 4 items.",
        ));
    }

    for (i, term) in terms.iter().enumerate() {
        if term.field.is_empty() {
            return Err(RegistrantAlertError::invalid_argument(
                format!("advancedSearchTerms.{}.Field", i),
                "is required.",
            ));
        }
        if term.term.is_empty() {
            return Err(RegistrantAlertError::invalid_argument(
                format!("advancedSearchTerms.{}.Term", i),
                "is required.",
            ));
        }
    }

    Ok(terms)
}
