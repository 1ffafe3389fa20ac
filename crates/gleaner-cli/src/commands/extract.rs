//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::schema_file::load_schema;
use crate::session::Session;
use gleaner_domain::LlmProvider;
use gleaner_extractor::SourceFile;
use std::fmt::Display;

/// Execute the extract command.
pub async fn execute_extract<L>(
    args: ExtractArgs,
    session: &mut Session<L>,
    formatter: &Formatter,
) -> Result<()>
where
    L: LlmProvider,
    L::Error: Display,
{
    if let Some(path) = &args.schema {
        session.set_schema(load_schema(path)?);
    }
    for template in &args.templates {
        session.apply_template(template)?;
    }

    for path in args.files {
        session.add_file(SourceFile::from_path(path))?;
    }
    for spec in &args.data_uris {
        let (name, uri) = parse_data_uri_arg(spec)?;
        session.add_file(SourceFile::from_data_uri(name, uri))?;
    }

    let result = session.extract().await?;
    println!("{}", formatter.format_result(result)?);

    if result.is_success() {
        Ok(())
    } else {
        Err(CliError::ExtractionFailed)
    }
}

/// Split a `<name>=<data-uri>` argument.
fn parse_data_uri_arg(spec: &str) -> Result<(&str, &str)> {
    match spec.split_once('=') {
        Some((name, uri)) if !name.trim().is_empty() && uri.trim_start().starts_with("data:") => {
            Ok((name.trim(), uri.trim()))
        }
        _ => Err(CliError::InvalidInput(format!(
            "Invalid data URI argument '{}'. Expected '<name>=data:<mime>;base64,<payload>'",
            spec
        ))),
    }
}
