//! Request inspection and custom requests.

use anyhow::{anyhow, Context, Result};
use console::style;
use wam_core::{CustomEdit, Header, Request, RequestId, WamError};

use super::{explain, format_ms, open_repo};

fn parse_id(id: &str) -> Result<RequestId> {
    RequestId::parse(id).ok_or_else(|| anyhow!("Invalid request id: {}", id))
}

/// Parses `Name: value`. A name with no colon becomes a header without value.
fn parse_header(raw: &str) -> Result<Header> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok(Header::new(name.trim(), value.trim()))
        }
        None if !raw.trim().is_empty() => Ok(Header {
            name: raw.trim().to_string(),
            value: None,
        }),
        _ => Err(anyhow!("Invalid header: {:?}", raw)),
    }
}

pub fn show(id: &str, json: bool) -> Result<()> {
    let repo = open_repo()?;
    let id = parse_id(id)?;
    let request = repo
        .repository()
        .request(id)?
        .ok_or_else(|| explain(WamError::RequestNotFound(id.to_string())))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&request)?);
    } else {
        print_request(&request);
    }
    Ok(())
}

pub fn custom(
    id: &str,
    method: Option<String>,
    destination: Option<String>,
    headers: &[String],
) -> Result<()> {
    let repo = open_repo()?;
    let base = parse_id(id)?;

    let request_headers = if headers.is_empty() {
        None
    } else {
        Some(
            headers
                .iter()
                .map(|h| parse_header(h))
                .collect::<Result<Vec<_>>>()?,
        )
    };
    let edit = CustomEdit {
        method,
        destination,
        request_headers,
    };

    let request = repo
        .correlator()
        .record_custom(base, edit)
        .map_err(explain)
        .context("Failed to record custom request")?;

    println!("{} Recorded custom request {}", style("✓").green(), request.id);
    Ok(())
}

fn print_request(request: &Request) {
    println!(
        "{} {}",
        style(&request.method).bold(),
        style(&request.destination).cyan()
    );
    println!("  Id:        {}", request.id);
    println!("  Time:      {}", format_ms(request.timestamp_ms));
    if let Some(source) = &request.source {
        println!("  Initiator: {}", source);
    }
    if request.custom {
        println!("  Kind:      {}", style("custom").magenta());
    }
    if let Some(size) = request.body_size {
        println!("  Body:      {} bytes", size);
    }

    println!();
    println!("{}", style("Request headers:").bold());
    for header in &request.request_headers {
        print_header(header);
    }

    let response = &request.response;
    println!();
    println!(
        "{} {}",
        style("Response:").bold(),
        if response.status_line.is_empty() {
            response.status_code.to_string()
        } else {
            response.status_line.clone()
        }
    );
    for header in &response.headers {
        print_header(header);
    }
    println!(
        "  ({} bytes sent, {} bytes received)",
        response.request_size, response.response_size
    );
}

fn print_header(header: &Header) {
    match &header.value {
        Some(value) => println!("  {}: {}", header.name, value),
        None => println!("  {}", header.name),
    }
}
