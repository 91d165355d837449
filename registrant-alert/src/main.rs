//! Registrant Alert CLI Application
//!
//! A command-line interface for the Registrant Alert API. It wires
//! configuration files, environment variables and flags into a client from
//! registrant-alert-lib and prints the results.

mod ui;

use chrono::NaiveDate;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand, ValueEnum};
use registrant_alert_lib::{
    load_env_config, AdvancedSearchTerm, BasicSearchTerms, Client, ClientConfig, ConfigManager,
    FileConfig, RegistrantAlertError, RequestContext, SearchOption, DATE_FORMAT,
};
use std::process;
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for registrant-alert
#[derive(Parser, Debug)]
#[command(name = "registrant-alert")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search newly registered, updated and dropped domains by registrant")]
#[command(
    long_about = "Query the Registrant Alert API for domains whose registration data matches search terms.\n\nEach search runs as a free preview (count only), a purchase (parsed records) or a raw data call (body as returned)."
)]
#[command(styles = STYLES)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// API key (overrides REGISTRANT_ALERT_API_KEY and config files)
    #[arg(long = "api-key", value_name = "KEY", global = true, help_heading = "Connection")]
    pub api_key: Option<String>,

    /// Endpoint URL of the Registrant Alert service
    #[arg(long = "base-url", value_name = "URL", global = true, help_heading = "Connection")]
    pub base_url: Option<String>,

    /// HTTP timeout, e.g. "30s" or "2m"
    #[arg(long = "timeout", value_name = "DURATION", global = true, help_heading = "Connection")]
    pub timeout: Option<String>,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", global = true, help_heading = "Configuration")]
    pub config: Option<String>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", global = true, help_heading = "Configuration")]
    pub verbose: bool,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", global = true, help_heading = "Output Format")]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search by terms that must (or must not) appear in registration data
    Basic {
        /// What to fetch
        #[arg(value_enum)]
        operation: Operation,

        /// Terms that must appear (comma-separated, 1 to 4)
        #[arg(long = "include", value_name = "TERM", value_delimiter = ',', action = clap::ArgAction::Append)]
        include: Vec<String>,

        /// Terms that must not appear (comma-separated, up to 4)
        #[arg(long = "exclude", value_name = "TERM", value_delimiter = ',', action = clap::ArgAction::Append)]
        exclude: Vec<String>,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Search specific registration fields
    Advanced {
        /// What to fetch
        #[arg(value_enum)]
        operation: Operation,

        /// Field search as FIELD=TERM, suffix ":exact" for exact matching (1 to 4)
        #[arg(long = "term", value_name = "FIELD=TERM[:exact]", value_parser = parse_term, action = clap::ArgAction::Append)]
        terms: Vec<AdvancedSearchTerm>,

        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Number of matching domains, no credits deducted
    Preview,
    /// Matching domain records
    Purchase,
    /// Response body exactly as returned
    Raw,
}

/// Flags shared by every search
#[derive(clap::Args, Debug, Default)]
pub struct SearchArgs {
    /// Only activities discovered since this date (YYYY-MM-DD)
    #[arg(long = "since-date", value_name = "DATE", value_parser = parse_date, help_heading = "Search")]
    pub since_date: Option<NaiveDate>,

    /// Return domain names as-is instead of Punycode
    #[arg(long = "no-punycode", help_heading = "Search")]
    pub no_punycode: bool,

    /// Response format for raw calls (json or xml)
    #[arg(long = "response-format", value_name = "FORMAT", help_heading = "Search")]
    pub response_format: Option<String>,

    /// Domains created on or after this date
    #[arg(long = "created-from", value_name = "DATE", value_parser = parse_date, help_heading = "Date Filters")]
    pub created_from: Option<NaiveDate>,

    /// Domains created before this date
    #[arg(long = "created-to", value_name = "DATE", value_parser = parse_date, help_heading = "Date Filters")]
    pub created_to: Option<NaiveDate>,

    /// Domains updated on or after this date
    #[arg(long = "updated-from", value_name = "DATE", value_parser = parse_date, help_heading = "Date Filters")]
    pub updated_from: Option<NaiveDate>,

    /// Domains updated before this date
    #[arg(long = "updated-to", value_name = "DATE", value_parser = parse_date, help_heading = "Date Filters")]
    pub updated_to: Option<NaiveDate>,

    /// Domains expired on or after this date
    #[arg(long = "expired-from", value_name = "DATE", value_parser = parse_date, help_heading = "Date Filters")]
    pub expired_from: Option<NaiveDate>,

    /// Domains expired before this date
    #[arg(long = "expired-to", value_name = "DATE", value_parser = parse_date, help_heading = "Date Filters")]
    pub expired_to: Option<NaiveDate>,
}

impl SearchArgs {
    /// Options given on the command line, in a fixed order.
    fn to_options(&self) -> Vec<SearchOption> {
        let dated = [
            self.since_date.map(SearchOption::SinceDate),
            self.created_from.map(SearchOption::CreatedDateFrom),
            self.created_to.map(SearchOption::CreatedDateTo),
            self.updated_from.map(SearchOption::UpdatedDateFrom),
            self.updated_to.map(SearchOption::UpdatedDateTo),
            self.expired_from.map(SearchOption::ExpiredDateFrom),
            self.expired_to.map(SearchOption::ExpiredDateTo),
        ];

        let mut opts: Vec<SearchOption> = dated.into_iter().flatten().collect();
        if self.no_punycode {
            opts.push(SearchOption::Punycode(false));
        }
        if let Some(format) = &self.response_format {
            opts.push(SearchOption::response_format(format.as_str()));
        }
        opts
    }
}

/// Parse `FIELD=TERM[:exact]` into an advanced search term.
fn parse_term(raw: &str) -> Result<AdvancedSearchTerm, String> {
    let (field, term) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=TERM, got '{}'", raw))?;

    let (term, exact) = match term.strip_suffix(":exact") {
        Some(stripped) => (stripped, true),
        None => (term, false),
    };

    Ok(AdvancedSearchTerm::new(field.trim(), term).exact_match(exact))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| format!("invalid date '{}' (expected YYYY-MM-DD): {}", raw, e))
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    if let Err(e) = run(args).await {
        ui::print_failure(e.as_ref());
        process::exit(1);
    }
}

/// Install the stderr subscriber. `--verbose` wins over `RUST_LOG`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&args)?;

    let api_key = config.api_key().map(str::to_string).ok_or_else(|| {
        RegistrantAlertError::config(
            "API key is required (use --api-key, REGISTRANT_ALERT_API_KEY or a config file)",
        )
    })?;

    let client = Client::with_params(api_key, config.client_params()?)?;
    tracing::debug!(base_url = %client.base_url(), "client ready");

    let ctx = RequestContext::new();
    let mut opts = config.search_options();

    match &args.command {
        Command::Basic {
            operation,
            include,
            exclude,
            search,
        } => {
            opts.extend(search.to_options());
            let terms = BasicSearchTerms::new(include.iter().cloned())
                .with_exclude(exclude.iter().cloned());

            match operation {
                Operation::Preview => {
                    let (count, _) = client.basic_preview(&ctx, Some(&terms), &opts).await?;
                    ui::print_count(count, args.json);
                }
                Operation::Purchase => {
                    let (result, _) = client.basic_purchase(&ctx, Some(&terms), &opts).await?;
                    ui::print_domains(&result, args.json);
                }
                Operation::Raw => {
                    let response = client.basic_raw_data(&ctx, Some(&terms), &opts).await?;
                    ui::print_raw(&response)
                        .map_err(|e| format!("cannot write response: {}", e))?;
                }
            }
        }
        Command::Advanced {
            operation,
            terms,
            search,
        } => {
            opts.extend(search.to_options());

            match operation {
                Operation::Preview => {
                    let (count, _) = client.advanced_preview(&ctx, Some(terms.as_slice()), &opts).await?;
                    ui::print_count(count, args.json);
                }
                Operation::Purchase => {
                    let (result, _) = client.advanced_purchase(&ctx, Some(terms.as_slice()), &opts).await?;
                    ui::print_domains(&result, args.json);
                }
                Operation::Raw => {
                    let response = client.advanced_raw_data(&ctx, Some(terms.as_slice()), &opts).await?;
                    ui::print_raw(&response)
                        .map_err(|e| format!("cannot write response: {}", e))?;
                }
            }
        }
    }

    Ok(())
}

/// Merge configuration sources.
///
/// Precedence, lowest first: discovered config files (or `--config`),
/// environment variables, command-line flags.
fn build_config(args: &Args) -> Result<FileConfig, RegistrantAlertError> {
    let manager = ConfigManager::new(args.verbose);

    let file_config = match &args.config {
        Some(path) => manager.load_file(path)?,
        None => manager.discover_and_load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "config discovery failed, continuing without config files");
            FileConfig::default()
        }),
    };

    let mut config = file_config.with_env(&load_env_config());

    let client = config.client.get_or_insert_with(ClientConfig::default);
    if args.api_key.is_some() {
        client.api_key = args.api_key.clone();
    }
    if args.base_url.is_some() {
        client.base_url = args.base_url.clone();
    }
    if args.timeout.is_some() {
        client.timeout = args.timeout.clone();
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_term() {
        let term = parse_term("RegistrantContact.Name=whois").unwrap();
        assert_eq!(term.field, "RegistrantContact.Name");
        assert_eq!(term.term, "whois");
        assert!(!term.exact_match);

        let term = parse_term("RegistrantContact.Email=whoisxmlapi.com:exact").unwrap();
        assert_eq!(term.term, "whoisxmlapi.com");
        assert!(term.exact_match);

        // An empty field is left for the library to reject.
        let term = parse_term("=whois").unwrap();
        assert!(term.field.is_empty());

        assert!(parse_term("no-separator").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2022-10-30").unwrap(),
            NaiveDate::from_ymd_opt(2022, 10, 30).unwrap()
        );
        assert!(parse_date("30/10/2022").is_err());
    }

    #[test]
    fn test_search_args_to_options() {
        let search = SearchArgs {
            since_date: Some(NaiveDate::from_ymd_opt(2022, 10, 1).unwrap()),
            no_punycode: true,
            response_format: Some("xml".to_string()),
            ..Default::default()
        };

        assert_eq!(
            search.to_options(),
            vec![
                SearchOption::SinceDate(NaiveDate::from_ymd_opt(2022, 10, 1).unwrap()),
                SearchOption::Punycode(false),
                SearchOption::response_format("xml"),
            ]
        );
        assert!(SearchArgs::default().to_options().is_empty());
    }

    #[test]
    fn test_args_parse_basic() {
        let args = Args::try_parse_from([
            "registrant-alert",
            "basic",
            "preview",
            "--include",
            "whois,xml",
            "--exclude",
            "api",
            "--api-key",
            "at_key",
        ])
        .unwrap();

        assert_eq!(args.api_key.as_deref(), Some("at_key"));
        match args.command {
            Command::Basic {
                operation,
                include,
                exclude,
                ..
            } => {
                assert_eq!(operation, Operation::Preview);
                assert_eq!(include, vec!["whois", "xml"]);
                assert_eq!(exclude, vec!["api"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_args_parse_advanced() {
        let args = Args::try_parse_from([
            "registrant-alert",
            "--json",
            "advanced",
            "raw",
            "--term",
            "RegistrantContact.Name=whois",
            "--term",
            "RegistrantContact.Email=whoisxmlapi.com:exact",
            "--response-format",
            "xml",
        ])
        .unwrap();

        assert!(args.json);
        match args.command {
            Command::Advanced {
                operation,
                terms,
                search,
            } => {
                assert_eq!(operation, Operation::Raw);
                assert_eq!(terms.len(), 2);
                assert!(terms[1].exact_match);
                assert_eq!(search.response_format.as_deref(), Some("xml"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let args = Args::try_parse_from([
            "registrant-alert",
            "basic",
            "preview",
            "--include",
            "whois",
            "--api-key",
            "at_cli",
            "--timeout",
            "5s",
            "--config",
            "/nonexistent/registrant-alert.toml",
        ])
        .unwrap();

        assert!(build_config(&args).is_err());
    }
}
