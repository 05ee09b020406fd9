//! Reporting commands: analytics and invoices.

use chrono::NaiveDate;

use crate::api::{ApiClient, InvoiceRequest};
use crate::cli::args::{InvoiceArgs, OutputFormat, ReportPeriod};
use crate::core::{local_day_bounds, parse_date};
use crate::error::PunchError;
use crate::output::{format_invoice, format_report};

/// Execute report command
///
/// # Errors
///
/// Returns an error if the request fails or output formatting fails.
pub async fn report(
    client: &ApiClient,
    period: ReportPeriod,
    format: OutputFormat,
) -> Result<String, PunchError> {
    let summary = client.analytics(period.into()).await?;
    format_report(&summary, format)
}

/// Execute invoice command
///
/// # Errors
///
/// Returns an error if the dates are invalid, the request fails, or output
/// formatting fails.
pub async fn invoice(
    client: &ApiClient,
    args: &InvoiceArgs,
    format: OutputFormat,
) -> Result<String, PunchError> {
    let request = invoice_request(args)?;
    let invoice = client.generate_invoice(&request).await?;
    format_invoice(&invoice, format)
}

/// The range covers whole local days, `from` through `to` inclusive.
fn invoice_request(args: &InvoiceArgs) -> Result<InvoiceRequest, PunchError> {
    let from = date_arg(&args.from)?;
    let to = date_arg(&args.to)?;

    if to < from {
        return Err(PunchError::InvalidInput(format!(
            "--to ({to}) is before --from ({from})"
        )));
    }

    let (start_date, _) = bounds(from)?;
    let (_, end_date) = bounds(to)?;

    Ok(InvoiceRequest {
        project_id: args.project,
        start_date,
        end_date,
    })
}

fn date_arg(input: &str) -> Result<NaiveDate, PunchError> {
    parse_date(input).ok_or_else(|| {
        PunchError::InvalidInput(format!("Unrecognized date: {input} (expected YYYY-MM-DD)"))
    })
}

fn bounds(date: NaiveDate) -> Result<(chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>), PunchError> {
    local_day_bounds(date)
        .ok_or_else(|| PunchError::InvalidInput(format!("{date} does not exist in the local timezone")))
}
