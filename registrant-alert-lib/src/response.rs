//! Response envelope and body demultiplexing.
//!
//! Parsed entry points decode the body into a union of the success shape
//! and the application error shape, then decide which one it is. Raw entry
//! points skip decoding and only look at the status code.

use crate::error::{ApiError, RegistrantAlertError, StatusError};
use crate::types::{Messages, RegistrantAlertResponse};
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Url, Version};
use serde::Deserialize;

/// HTTP response metadata together with the captured body bytes.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub version: Version,
    pub headers: HeaderMap,
    /// Final URL after redirects.
    pub url: Url,
    /// Whole response body as received.
    pub body: Vec<u8>,
}

impl Response {
    pub(crate) fn from_head(http_response: &reqwest::Response) -> Self {
        Self {
            status: http_response.status(),
            version: http_response.version(),
            headers: http_response.headers().clone(),
            url: http_response.url().clone(),
            body: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The `Content-Length` header, if present and numeric.
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok())
    }

    #[cfg(test)]
    pub(crate) fn for_status(status: StatusCode) -> Self {
        Self {
            status,
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            url: Url::parse("http://localhost/").expect("static url"),
            body: Vec::new(),
        }
    }
}

/// Union of the success and error shapes of a response body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiEnvelope {
    #[serde(flatten)]
    pub result: RegistrantAlertResponse,

    #[serde(default)]
    pub code: i64,

    #[serde(default)]
    pub messages: Option<Messages>,
}

impl ApiEnvelope {
    /// Split the envelope into a result or an application error.
    ///
    /// Any non-zero code or any `messages` value marks an error, whatever
    /// the HTTP status was.
    pub fn into_result(self) -> Result<RegistrantAlertResponse, ApiError> {
        if self.code != 0 || self.messages.is_some() {
            return Err(ApiError {
                code: self.code,
                messages: self.messages.unwrap_or_default(),
            });
        }
        Ok(self.result)
    }
}

/// Decode the first JSON value of a response body. Trailing bytes are ignored.
pub(crate) fn parse(raw: &[u8]) -> Result<ApiEnvelope, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_slice(raw);
    ApiEnvelope::deserialize(&mut deserializer)
}

/// Fail unless the status code is in 200..=299.
pub(crate) fn check_response(response: Response) -> Result<Response, RegistrantAlertError> {
    if response.status.is_success() {
        return Ok(response);
    }

    Err(StatusError {
        status: response.status,
        message: None,
        response: Box::new(response),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;

    #[test]
    fn test_parse_success_body() {
        let raw = br#"{"domainsCount":4,"domainsList":[
{"domainName":"batchwhois.com","date":"2022-10-30","action":"discovered"},
{"domainName":"betterwhoislookup.com","date":"2022-10-30","action":"discovered"},
{"domainName":"whoisdomainlookup.info","date":"2022-10-30","action":"updated"},
{"domainName":"whoisdodster.com","date":"2022-10-30","action":"added"}]}"#;

        let result = parse(raw).unwrap().into_result().unwrap();
        assert_eq!(result.domains_count, 4);
        let actions: Vec<Action> = result.domains_list.iter().map(|d| d.action).collect();
        assert_eq!(
            actions,
            vec![Action::Discovered, Action::Discovered, Action::Updated, Action::Added]
        );
    }

    #[test]
    fn test_parse_preview_body() {
        let result = parse(br#"{"domainsCount":4}"#).unwrap().into_result().unwrap();
        assert_eq!(result.domains_count, 4);
        assert!(result.domains_list.is_empty());
    }

    #[test]
    fn test_application_error_from_code_and_messages() {
        let err = parse(br#"{"code":499,"messages":["Test error message."]}"#)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert_eq!(err.to_string(), "API error: [499] [Test error message.]");
    }

    #[test]
    fn test_application_error_from_code_only() {
        let err = parse(br#"{"code":403}"#).unwrap().into_result().unwrap_err();
        assert_eq!(err.code, 403);
        assert!(err.messages.is_empty());
    }

    #[test]
    fn test_application_error_from_messages_only() {
        let err = parse(br#"{"domainsCount":1,"messages":"Quota exceeded"}"#)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert_eq!(err.code, 0);
        assert_eq!(err.messages.as_slice(), ["Quota exceeded".to_string()]);
    }

    #[test]
    fn test_null_messages_is_success() {
        let result = parse(br#"{"domainsCount":2,"code":0,"messages":null}"#)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(result.domains_count, 2);
    }

    #[test]
    fn test_parse_rejects_xml_and_truncation() {
        let err = parse(br#"<?xml version="1.0" encoding="utf-8"?><>"#).unwrap_err();
        assert!(err.is_syntax());

        let err = parse(br#"{"domainsCount":4,"domainsList":[{"doma"#).unwrap_err();
        assert!(err.is_eof());

        assert!(parse(b"").unwrap_err().is_eof());
    }

    #[test]
    fn test_parse_ignores_trailing_data() {
        let result = parse(b"{\"domainsCount\":3}\n<garbage>").unwrap().into_result();
        assert_eq!(result.unwrap().domains_count, 3);
    }

    #[test]
    fn test_check_response() {
        assert!(check_response(Response::for_status(StatusCode::OK)).is_ok());

        let err = check_response(Response::for_status(StatusCode::INTERNAL_SERVER_ERROR))
            .unwrap_err();
        assert_eq!(err.to_string(), "API failed with status code: 500");
        assert_eq!(
            err.response().map(|r| r.status),
            Some(StatusCode::INTERNAL_SERVER_ERROR)
        );
    }
}
