//! Terminal output for search results and errors.

use console::style;
use registrant_alert_lib::{Action, RegistrantAlertError, RegistrantAlertResponse, Response};
use std::error::Error;
use std::io::{self, Write};

/// Print the number of matching domains.
pub fn print_count(count: i64, json: bool) {
    if json {
        println!("{}", serde_json::json!({ "domainsCount": count }));
        return;
    }

    println!(
        "{} {}",
        style(count).bold(),
        style(if count == 1 { "domain" } else { "domains" }).dim()
    );
}

/// Print purchased domain records, one per line.
pub fn print_domains(result: &RegistrantAlertResponse, json: bool) {
    if json {
        match serde_json::to_string_pretty(result) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => eprintln!("Error: cannot render JSON: {}", e),
        }
        return;
    }

    let width = result
        .domains_list
        .iter()
        .map(|item| item.domain_name.len())
        .max()
        .unwrap_or(0);

    for item in &result.domains_list {
        let action = format!("{:<10}", item.action);
        let action = match item.action {
            Action::Added => style(action).green(),
            Action::Updated => style(action).cyan(),
            Action::Dropped => style(action).red(),
            Action::Discovered => style(action).yellow(),
            Action::Unknown => style(action).dim(),
        };
        println!(
            "{:<width$}  {} {}",
            item.domain_name,
            action,
            style(item.date).dim(),
            width = width
        );
    }

    println!(
        "{}",
        style(format!("{} domains in total", result.domains_count)).dim()
    );
}

/// Write the body exactly as received.
pub fn print_raw(response: &Response) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write_raw(&mut stdout, &response.body)
}

fn write_raw<W: Write>(out: &mut W, body: &[u8]) -> io::Result<()> {
    out.write_all(body)?;
    if !body.ends_with(b"\n") {
        out.write_all(b"\n")?;
    }
    out.flush()
}

/// Report any failure from `run` on stderr.
pub fn print_failure(error: &(dyn Error + 'static)) {
    match error.downcast_ref::<RegistrantAlertError>() {
        Some(api_error) => print_error(api_error),
        None => eprintln!("{} {}", style("Error:").red().bold(), error),
    }
}

/// Report a failed call on stderr.
pub fn print_error(error: &RegistrantAlertError) {
    eprintln!("{} {}", style("Error:").red().bold(), error);

    if let Some(api) = error.api_error() {
        eprintln!("  {} {}", style("code:").dim(), api.code);
        for message in api.messages.iter() {
            eprintln!("  {} {}", style("message:").dim(), message);
        }
    }

    if let Some(response) = error.response() {
        eprintln!(
            "  {} {}",
            style("status:").dim(),
            response.status.as_u16()
        );
        if !response.body.is_empty() {
            eprintln!("  {} {}", style("body:").dim(), response.text().trim_end());
        }
    }
}
