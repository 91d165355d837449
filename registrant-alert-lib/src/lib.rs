//! # Registrant Alert Library
//!
//! An async client for the Registrant Alert API, which reports domains that
//! were newly registered, updated or dropped and whose registration data
//! mentions given terms.
//!
//! Every search comes in two flavours (basic and advanced) and three modes:
//! a free preview returning a count, a purchase returning parsed domain
//! records, and raw data returning the body untouched.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use registrant_alert_lib::{BasicSearchTerms, Client, RequestContext, SearchOption};
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("at_your_api_key")?;
//!     let terms = BasicSearchTerms::new(["Airbnb", "US"]);
//!     let since = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!
//!     let (result, _response) = client
//!         .basic_purchase(&RequestContext::new(), Some(&terms), &[SearchOption::SinceDate(since)])
//!         .await?;
//!
//!     for item in &result.domains_list {
//!         println!("{} {} {}", item.domain_name, item.action, item.date);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! All entry points fail with [`RegistrantAlertError`]. Whenever a response
//! was received before the failure, [`RegistrantAlertError::response`]
//! returns it so the caller can inspect the status and body.

// Re-export main public API types and functions
pub use client::{Client, ClientParams, DEFAULT_BASE_URL};
pub use config::{
    load_env_config, parse_timeout_string, ClientConfig, ConfigManager, EnvConfig, FileConfig,
    SearchDefaults,
};
pub use error::{ApiError, RegistrantAlertError, StatusError, TransportCause, TransportError};
pub use options::{SearchOption, FORMAT_JSON};
pub use response::Response;
pub use transport::{RequestContext, DEFAULT_USER_AGENT, MEDIA_TYPE};
pub use types::{
    Action, AdvancedSearchTerm, BasicSearchTerms, Date, DomainItem, Messages, Mode,
    RegistrantAlertResponse, DATE_FORMAT,
};
pub use validation::{validate_advanced, validate_basic, LIMIT_OF_SEARCH_TERMS};

// Cancellation tokens are part of the public API through RequestContext.
pub use tokio_util::sync::CancellationToken;

// Internal modules - these are not part of the public API
mod client;
mod config;
mod error;
mod options;
mod response;
mod transport;
mod types;
mod validation;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, RegistrantAlertError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Get library information for debugging or display purposes.
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        author: AUTHOR,
        user_agent: DEFAULT_USER_AGENT,
        default_base_url: DEFAULT_BASE_URL,
    }
}

/// Information about the library build
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub version: &'static str,
    pub author: &'static str,
    pub user_agent: &'static str,
    pub default_base_url: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info() {
        let info = info();
        assert_eq!(info.version, VERSION);
        assert!(info.user_agent.contains(VERSION));
        assert_eq!(info.default_base_url, DEFAULT_BASE_URL);
    }
}
