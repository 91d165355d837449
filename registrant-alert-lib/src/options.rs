//! Request model and search options.
//!
//! A request starts from fixed defaults (preview mode, punycode on, JSON
//! output, no date filters) and then every [`SearchOption`] is applied in
//! order. Empty fields are left out of the serialized body.

use crate::error::RegistrantAlertError;
use crate::types::{is_false, AdvancedSearchTerm, BasicSearchTerms, Date, Mode};
use chrono::NaiveDate;
use serde::Serialize;

/// Response format the parsed entry points always request.
pub const FORMAT_JSON: &str = "json";

/// A single request parameter override.
///
/// Options are applied in the order they are given, so a later option wins
/// over an earlier one touching the same field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOption {
    /// Response output format, `json` or `xml`. Sent verbatim.
    ResponseFormat(String),
    /// Search through activities discovered since the given date.
    SinceDate(NaiveDate),
    /// Encode domain names in the response to Punycode. Default: true.
    Punycode(bool),
    /// Domains created after the given date.
    CreatedDateFrom(NaiveDate),
    /// Domains created before the given date.
    CreatedDateTo(NaiveDate),
    /// Domains updated after the given date.
    UpdatedDateFrom(NaiveDate),
    /// Domains updated before the given date.
    UpdatedDateTo(NaiveDate),
    /// Domains expired after the given date.
    ExpiredDateFrom(NaiveDate),
    /// Domains expired before the given date.
    ExpiredDateTo(NaiveDate),
}

impl SearchOption {
    pub fn response_format<S: Into<String>>(format: S) -> Self {
        Self::ResponseFormat(format.into())
    }

    /// Apply this option to a request.
    pub(crate) fn apply(&self, request: &mut RegistrantAlertRequest<'_>) {
        match self {
            Self::ResponseFormat(format) => request.response_format = format.clone(),
            Self::SinceDate(day) => request.since_date = Date::from(*day),
            Self::Punycode(punycode) => request.punycode = *punycode,
            Self::CreatedDateFrom(day) => request.created_date_from = Date::from(*day),
            Self::CreatedDateTo(day) => request.created_date_to = Date::from(*day),
            Self::UpdatedDateFrom(day) => request.updated_date_from = Date::from(*day),
            Self::UpdatedDateTo(day) => request.updated_date_to = Date::from(*day),
            Self::ExpiredDateFrom(day) => request.expired_date_from = Date::from(*day),
            Self::ExpiredDateTo(day) => request.expired_date_to = Date::from(*day),
        }
    }
}

/// The search terms a request carries. Exactly one kind per request.
#[derive(Debug, Clone, Copy)]
pub(crate) enum SearchTerms<'a> {
    Basic(&'a BasicSearchTerms),
    Advanced(&'a [AdvancedSearchTerm]),
}

/// Body of a Registrant Alert API request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegistrantAlertRequest<'a> {
    pub api_key: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_search_terms: Option<&'a BasicSearchTerms>,

    #[serde(skip_serializing_if = "is_empty_slice")]
    pub advanced_search_terms: &'a [AdvancedSearchTerm],

    #[serde(skip_serializing_if = "Date::is_unset")]
    pub since_date: Date,

    pub mode: Mode,

    #[serde(skip_serializing_if = "is_false")]
    pub punycode: bool,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub response_format: String,

    #[serde(skip_serializing_if = "Date::is_unset")]
    pub created_date_from: Date,

    #[serde(skip_serializing_if = "Date::is_unset")]
    pub created_date_to: Date,

    #[serde(skip_serializing_if = "Date::is_unset")]
    pub updated_date_from: Date,

    #[serde(skip_serializing_if = "Date::is_unset")]
    pub updated_date_to: Date,

    #[serde(skip_serializing_if = "Date::is_unset")]
    pub expired_date_from: Date,

    #[serde(skip_serializing_if = "Date::is_unset")]
    pub expired_date_to: Date,
}

fn is_empty_slice<T>(items: &&[T]) -> bool {
    items.is_empty()
}

impl<'a> RegistrantAlertRequest<'a> {
    /// Create a request with default parameters for the given terms.
    pub fn new(api_key: &'a str, terms: SearchTerms<'a>, mode: Mode) -> Self {
        let (basic_search_terms, advanced_search_terms) = match terms {
            SearchTerms::Basic(basic) => (Some(basic), &[][..]),
            SearchTerms::Advanced(advanced) => (None, advanced),
        };

        Self {
            api_key,
            basic_search_terms,
            advanced_search_terms,
            since_date: Date::UNSET,
            mode,
            punycode: true,
            response_format: FORMAT_JSON.to_string(),
            created_date_from: Date::UNSET,
            created_date_to: Date::UNSET,
            updated_date_from: Date::UNSET,
            updated_date_to: Date::UNSET,
            expired_date_from: Date::UNSET,
            expired_date_to: Date::UNSET,
        }
    }

    /// Apply options in order.
    pub fn apply_all<'o, I>(&mut self, opts: I)
    where
        I: IntoIterator<Item = &'o SearchOption>,
    {
        for opt in opts {
            opt.apply(self);
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, RegistrantAlertError> {
        serde_json::to_vec(self).map_err(RegistrantAlertError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn body(request: &RegistrantAlertRequest<'_>) -> serde_json::Value {
        serde_json::from_slice(&request.to_json().unwrap()).unwrap()
    }

    #[test]
    fn test_each_option_sets_its_field() {
        let terms = BasicSearchTerms::new(["whois"]);
        let cases = [
            (SearchOption::response_format("xml"), "responseFormat", "xml"),
            (SearchOption::SinceDate(day(2021, 1, 1)), "sinceDate", "2021-01-01"),
            (SearchOption::CreatedDateFrom(day(2022, 1, 1)), "createdDateFrom", "2022-01-01"),
            (SearchOption::CreatedDateTo(day(2021, 2, 1)), "createdDateTo", "2021-02-01"),
            (SearchOption::UpdatedDateFrom(day(2021, 1, 3)), "updatedDateFrom", "2021-01-03"),
            (SearchOption::UpdatedDateTo(day(2021, 1, 1)), "updatedDateTo", "2021-01-01"),
            (SearchOption::ExpiredDateFrom(day(2021, 1, 1)), "expiredDateFrom", "2021-01-01"),
            (SearchOption::ExpiredDateTo(day(2021, 1, 1)), "expiredDateTo", "2021-01-01"),
        ];

        for (option, field, want) in cases {
            let mut request =
                RegistrantAlertRequest::new("key", SearchTerms::Basic(&terms), Mode::Preview);
            option.apply(&mut request);
            assert_eq!(body(&request)[field], want, "option {:?}", option);
        }
    }

    #[test]
    fn test_defaults_and_omitted_fields() {
        let terms = BasicSearchTerms::new(["whois"]);
        let request = RegistrantAlertRequest::new("key", SearchTerms::Basic(&terms), Mode::Preview);
        let json = body(&request);

        assert_eq!(json["apiKey"], "key");
        assert_eq!(json["mode"], "preview");
        assert_eq!(json["punycode"], true);
        assert_eq!(json["responseFormat"], "json");
        assert_eq!(json["basicSearchTerms"]["include"][0], "whois");
        assert!(json.get("advancedSearchTerms").is_none());
        assert!(json.get("sinceDate").is_none());
        assert!(json.get("createdDateFrom").is_none());
        assert!(json.get("expiredDateTo").is_none());
    }

    #[test]
    fn test_punycode_false_is_omitted() {
        let terms = [AdvancedSearchTerm::new("RegistrantContact.Name", "whois")];
        let mut request =
            RegistrantAlertRequest::new("key", SearchTerms::Advanced(&terms), Mode::Purchase);
        request.apply_all(&[SearchOption::Punycode(false)]);
        assert!(!request.punycode);

        let json = body(&request);
        assert!(json.get("punycode").is_none());
        assert!(json.get("basicSearchTerms").is_none());
        assert_eq!(json["advancedSearchTerms"][0]["field"], "RegistrantContact.Name");
        assert_eq!(json["mode"], "purchase");
    }

    #[test]
    fn test_options_apply_in_order() {
        let terms = BasicSearchTerms::new(["whois"]);
        let mut request = RegistrantAlertRequest::new("key", SearchTerms::Basic(&terms), Mode::Preview);
        request.apply_all(&[
            SearchOption::response_format("xml"),
            SearchOption::response_format(FORMAT_JSON),
        ]);
        assert_eq!(request.response_format, "json");

        request.apply_all(&[SearchOption::response_format("")]);
        assert!(body(&request).get("responseFormat").is_none());
    }
}
