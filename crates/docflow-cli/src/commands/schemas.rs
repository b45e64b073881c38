//! Schemas command implementation.

use crate::cli::SchemasArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use docflow_domain::{Category, CategorySchema, SchemaRegistry};

/// Execute the schemas command.
pub fn execute_schemas(
    args: SchemasArgs,
    registry: &SchemaRegistry,
    formatter: &Formatter,
) -> Result<()> {
    let schemas = select_schemas(args.category.as_deref(), registry)?;
    println!("{}", formatter.format_schemas(&schemas)?);
    Ok(())
}

fn select_schemas<'a>(
    category: Option<&str>,
    registry: &'a SchemaRegistry,
) -> Result<Vec<&'a CategorySchema>> {
    match category {
        Some(name) => {
            let category: Category = name.parse().map_err(CliError::InvalidInput)?;
            Ok(vec![registry.schema_for(&category).map_err(|e| {
                CliError::InvalidInput(e.to_string())
            })?])
        }
        None => Ok(registry
            .categories()
            .filter_map(|c| registry.schema_for(c).ok())
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all() {
        let registry = SchemaRegistry::builtin();
        assert_eq!(select_schemas(None, &registry).unwrap().len(), 3);
    }

    #[test]
    fn test_select_one() {
        let registry = SchemaRegistry::builtin();
        let selected = select_schemas(Some(" orders "), &registry).unwrap();
        assert_eq!(selected[0].record_noun, "order");
    }

    #[test]
    fn test_select_unknown() {
        let registry = SchemaRegistry::builtin();
        assert!(matches!(
            select_schemas(Some("receipts"), &registry),
            Err(CliError::InvalidInput(_))
        ));
        assert!(select_schemas(Some("Not A Slug"), &registry).is_err());
    }
}
