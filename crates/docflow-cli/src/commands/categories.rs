//! Categories command implementation.

use crate::error::Result;
use crate::output::Formatter;
use docflow_domain::SchemaRegistry;

/// Execute the categories command.
pub fn execute_categories(registry: &SchemaRegistry, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_categories(registry)?);
    Ok(())
}
