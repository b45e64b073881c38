//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use docflow_domain::{CategorySchema, FieldSpec, FieldType, Requirement, SchemaRegistry};
use docflow_extractor::RunReport;
use colored::*;
use serde_json::{Map, Value};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a run report.
    pub fn format_report(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(report.to_json()?),
            OutputFormat::Table => Ok(self.format_report_table(report)),
        }
    }

    fn format_report_table(&self, report: &RunReport) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Category", "Listed", "Published", "Failed"]);
        for category in &report.categories {
            builder.push_record([
                category.category.to_string(),
                category.documents.to_string(),
                category.successes.to_string(),
                category.failures.len().to_string(),
            ]);
        }

        let mut sections = vec![
            self.info(&format!("Run {} ({}ms)", report.run_id, report.elapsed_ms)),
            styled(builder),
        ];

        let failures: Vec<_> = report
            .categories
            .iter()
            .flat_map(|c| c.failures.iter().map(move |f| (&c.category, f)))
            .collect();

        if !failures.is_empty() {
            let mut builder = Builder::default();
            builder.push_record(["Category", "Location", "Kind", "Message"]);
            for (category, failure) in failures {
                builder.push_record([
                    category.to_string(),
                    failure.location.clone(),
                    failure.kind.to_string(),
                    failure.message.clone(),
                ]);
            }
            sections.push(styled(builder));
        }

        let totals = format!(
            "{} published, {} failed",
            report.total_successes(),
            report.total_failures()
        );
        sections.push(if report.is_clean() {
            self.success(&totals)
        } else {
            self.warning(&totals)
        });

        sections.join("\n")
    }

    /// Format registered categories.
    pub fn format_categories(&self, registry: &SchemaRegistry) -> Result<String> {
        let entries: Vec<&CategorySchema> = registry
            .categories()
            .filter_map(|c| registry.schema_for(c).ok())
            .collect();

        match self.format {
            OutputFormat::Json => {
                let json: Vec<Value> = entries
                    .iter()
                    .map(|entry| {
                        serde_json::json!({
                            "category": entry.category,
                            "record": entry.schema.title,
                            "identifying_field": entry.identifying_field,
                            "fields": entry.schema.fields.len(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Category", "Record", "Identifying Field", "Fields"]);
                for entry in entries {
                    builder.push_record([
                        entry.category.to_string(),
                        entry.schema.title.clone(),
                        entry
                            .identifying_field
                            .clone()
                            .unwrap_or_else(|| format!("({}_N)", entry.record_noun)),
                        entry.schema.fields.len().to_string(),
                    ]);
                }
                Ok(styled(builder))
            }
        }
    }

    /// Format category schemas.
    ///
    /// JSON output is the JSON Schema submitted to the extraction service.
    pub fn format_schemas(&self, schemas: &[&CategorySchema]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Map<String, Value> = schemas
                    .iter()
                    .map(|entry| (entry.category.to_string(), entry.schema.to_json_schema()))
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => {
                let sections: Vec<String> = schemas
                    .iter()
                    .map(|entry| {
                        let mut builder = Builder::default();
                        builder.push_record(["Field", "Type", "Required", "Default", "Description"]);
                        push_fields(&mut builder, &entry.schema.fields, "");
                        format!(
                            "{}\n{}",
                            self.info(&format!("{} ({})", entry.category, entry.schema.title)),
                            styled(builder)
                        )
                    })
                    .collect();
                Ok(sections.join("\n\n"))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

/// Nested list fields are flattened as `items[].quantity`
fn push_fields(builder: &mut Builder, fields: &[FieldSpec], prefix: &str) {
    for field in fields {
        let name = format!("{}{}", prefix, field.name);
        let (required, default) = match &field.requirement {
            Requirement::Required => ("yes", String::new()),
            Requirement::Optional { default } => ("no", default.to_string()),
        };
        builder.push_record([
            name.clone(),
            field.field_type.name().to_string(),
            required.to_string(),
            default,
            field.description.clone(),
        ]);
        if let FieldType::List(inner) = &field.field_type {
            push_fields(builder, &inner.fields, &format!("{}[].", name));
        }
    }
}
