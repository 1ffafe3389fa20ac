//! Templates command implementation.

use crate::error::Result;
use crate::output::Formatter;
use gleaner_domain::SchemaTemplate;

/// Execute the templates command.
pub fn execute_templates(templates: &[SchemaTemplate], formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_templates(templates)?);
    Ok(())
}
