//! Registrant Alert API client.
//!
//! This module provides the [`Client`] with the six search entry points:
//! preview, purchase and raw data, each for basic and advanced searches.

use crate::error::RegistrantAlertError;
use crate::options::{RegistrantAlertRequest, SearchOption, SearchTerms, FORMAT_JSON};
use crate::response::{check_response, parse, Response};
use crate::transport::{HttpTransport, RequestContext, DEFAULT_USER_AGENT};
use crate::types::{AdvancedSearchTerm, BasicSearchTerms, Mode, RegistrantAlertResponse};
use crate::validation::{validate_advanced, validate_basic};
use reqwest::Url;

/// Production endpoint of the Registrant Alert API.
pub const DEFAULT_BASE_URL: &str = "https://registrant-alert.whoisxmlapi.com/api/v2";

/// Optional parameters for [`Client::with_params`].
///
/// Leaving everything unset works for most cases.
#[derive(Debug, Clone, Default)]
pub struct ClientParams {
    /// HTTP client used to reach the endpoint. Its timeouts, proxies and TLS
    /// settings apply to every call. A default client is built when unset.
    pub http_client: Option<reqwest::Client>,

    /// Endpoint of the Registrant Alert service. Defaults to [`DEFAULT_BASE_URL`].
    pub base_url: Option<Url>,

    /// Overrides the `User-Agent` header.
    pub user_agent: Option<String>,
}

/// Client for the Registrant Alert API.
///
/// Holds only immutable configuration, so one client can be shared across
/// tasks; each call is an independent request/response exchange.
///
/// # Example
///
/// ```rust,no_run
/// use registrant_alert_lib::{BasicSearchTerms, Client, RequestContext};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Client::new("at_your_api_key")?;
///     let terms = BasicSearchTerms::new(["Airbnb", "US"]).with_exclude(["Europe", "EU"]);
///     let (count, _) = client
///         .basic_preview(&RequestContext::new(), Some(&terms), &[])
///         .await?;
///     println!("{} domains", count);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    api_key: String,
    transport: HttpTransport,
}

impl Client {
    /// Create a client with recommended parameters.
    pub fn new<K: Into<String>>(api_key: K) -> Result<Self, RegistrantAlertError> {
        Self::with_params(api_key, ClientParams::default())
    }

    /// Create a client with the given parameters.
    pub fn with_params<K: Into<String>>(
        api_key: K,
        params: ClientParams,
    ) -> Result<Self, RegistrantAlertError> {
        let base_url = match params.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL).map_err(|e| {
                RegistrantAlertError::config(format!("invalid base URL: {}", e))
            })?,
        };

        let http_client = match params.http_client {
            Some(client) => client,
            None => HttpTransport::default_http_client(None)?,
        };

        let user_agent = params
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Ok(Self {
            api_key: api_key.into(),
            transport: HttpTransport::new(http_client, base_url, user_agent),
        })
    }

    /// Endpoint this client posts to.
    pub fn base_url(&self) -> &Url {
        self.transport.base_url()
    }

    /// Number of domains matching a basic search. No credits deducted.
    pub async fn basic_preview(
        &self,
        ctx: &RequestContext,
        terms: Option<&BasicSearchTerms>,
        opts: &[SearchOption],
    ) -> Result<(i64, Response), RegistrantAlertError> {
        let terms = SearchTerms::Basic(validate_basic(terms)?);
        let (result, response) = self.parsed(ctx, terms, Mode::Preview, opts).await?;
        Ok((result.domains_count, response))
    }

    /// Parsed result of a basic search.
    pub async fn basic_purchase(
        &self,
        ctx: &RequestContext,
        terms: Option<&BasicSearchTerms>,
        opts: &[SearchOption],
    ) -> Result<(RegistrantAlertResponse, Response), RegistrantAlertError> {
        let terms = SearchTerms::Basic(validate_basic(terms)?);
        self.parsed(ctx, terms, Mode::Purchase, opts).await
    }

    /// Raw response of a basic search, in whatever format was requested.
    pub async fn basic_raw_data(
        &self,
        ctx: &RequestContext,
        terms: Option<&BasicSearchTerms>,
        opts: &[SearchOption],
    ) -> Result<Response, RegistrantAlertError> {
        let terms = SearchTerms::Basic(validate_basic(terms)?);
        self.raw(ctx, terms, opts).await
    }

    /// Number of domains matching an advanced search. No credits deducted.
    pub async fn advanced_preview(
        &self,
        ctx: &RequestContext,
        terms: Option<&[AdvancedSearchTerm]>,
        opts: &[SearchOption],
    ) -> Result<(i64, Response), RegistrantAlertError> {
        let terms = SearchTerms::Advanced(validate_advanced(terms)?);
        let (result, response) = self.parsed(ctx, terms, Mode::Preview, opts).await?;
        Ok((result.domains_count, response))
    }

    /// Parsed result of an advanced search.
    pub async fn advanced_purchase(
        &self,
        ctx: &RequestContext,
        terms: Option<&[AdvancedSearchTerm]>,
        opts: &[SearchOption],
    ) -> Result<(RegistrantAlertResponse, Response), RegistrantAlertError> {
        let terms = SearchTerms::Advanced(validate_advanced(terms)?);
        self.parsed(ctx, terms, Mode::Purchase, opts).await
    }

    /// Raw response of an advanced search, in whatever format was requested.
    pub async fn advanced_raw_data(
        &self,
        ctx: &RequestContext,
        terms: Option<&[AdvancedSearchTerm]>,
        opts: &[SearchOption],
    ) -> Result<Response, RegistrantAlertError> {
        let terms = SearchTerms::Advanced(validate_advanced(terms)?);
        self.raw(ctx, terms, opts).await
    }

    /// Build, send and read one request.
    async fn request(
        &self,
        ctx: &RequestContext,
        terms: SearchTerms<'_>,
        mode: Mode,
        opts: &[SearchOption],
        force_json: bool,
    ) -> Result<Response, RegistrantAlertError> {
        let mut request = RegistrantAlertRequest::new(&self.api_key, terms, mode);
        request.apply_all(opts);
        if force_json {
            // The parser only understands JSON, whatever the caller asked for.
            SearchOption::response_format(FORMAT_JSON).apply(&mut request);
        }

        tracing::debug!(mode = %mode, format = %request.response_format, "registrant alert request");

        let body = request.to_json()?;
        Ok(self.transport.post(ctx, body).await?)
    }

    /// Request in JSON and demultiplex the body.
    ///
    /// An application error drops the envelope; transport and parse errors keep it.
    async fn parsed(
        &self,
        ctx: &RequestContext,
        terms: SearchTerms<'_>,
        mode: Mode,
        opts: &[SearchOption],
    ) -> Result<(RegistrantAlertResponse, Response), RegistrantAlertError> {
        let response = self.request(ctx, terms, mode, opts, true).await?;

        let envelope = match parse(&response.body) {
            Ok(envelope) => envelope,
            Err(source) => {
                return Err(RegistrantAlertError::Parse {
                    source,
                    response: Box::new(response),
                })
            }
        };

        let result = envelope.into_result()?;
        Ok((result, response))
    }

    /// Purchase request passed through untouched, checked only by status code.
    async fn raw(
        &self,
        ctx: &RequestContext,
        terms: SearchTerms<'_>,
        opts: &[SearchOption],
    ) -> Result<Response, RegistrantAlertError> {
        let response = self.request(ctx, terms, Mode::Purchase, opts, false).await?;
        check_response(response)
    }
}
