//! Accounts command implementation.

use crate::error::{CliError, Result};
use crate::output::Formatter;
use gleaner_crm::CrmClient;

/// Execute the accounts command.
///
/// Fetch failures print an empty list; the cause is logged.
pub async fn execute_accounts(crm: Option<&CrmClient>, formatter: &Formatter) -> Result<()> {
    let crm = crm.ok_or_else(|| {
        CliError::Config(
            "CRM webhook URL is not configured (set [crm] webhook_url or pass --webhook-url)".into(),
        )
    })?;

    let accounts = crm.fetch_accounts().await;
    println!("{}", formatter.format_accounts(&accounts, None)?);
    Ok(())
}
