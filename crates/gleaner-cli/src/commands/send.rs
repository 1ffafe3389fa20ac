//! Send command implementation.

use crate::cli::SendArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::schema_file::load_schema;
use gleaner_crm::CrmClient;
use gleaner_domain::{ExtractedData, ResponseSchema, Schema};
use serde_json::Value;
use std::fs;

/// Execute the send command.
pub async fn execute_send(args: SendArgs, crm: &CrmClient, formatter: &Formatter) -> Result<()> {
    let schema = load_schema(&args.schema)?;
    let saved: Value = serde_json::from_str(&fs::read_to_string(&args.result)?)?;
    let data = saved_result_data(&saved, &schema)?;

    crm.send_result(&args.account, &data).await?;

    println!(
        "{}",
        formatter.success(&format!("Sent {} field(s) to account '{}'", data.len(), args.account))
    );
    Ok(())
}

/// Recover typed data from a saved JSON result.
///
/// Only successful results can be sent; the data must match the schema.
fn saved_result_data(saved: &Value, schema: &Schema) -> Result<ExtractedData> {
    if saved.get("status").and_then(Value::as_str) != Some("success") {
        let reason = saved
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("result is not a successful extraction");
        return Err(CliError::InvalidInput(format!("Nothing to send: {}", reason)));
    }

    let data = saved
        .get("data")
        .ok_or_else(|| CliError::InvalidInput("Result has no data".to_string()))?;

    Ok(ResponseSchema::build(schema)?.interpret(data)?)
}
