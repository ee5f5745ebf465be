use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One decoded field and the offset it started at.
#[derive(Serialize, Debug)]
pub struct DumpField {
    pub offset: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Value,
    /// The field failed after this much of it was decoded.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub partial: bool,
}

#[derive(Serialize, Debug)]
pub struct DumpOutput {
    pub path: String,
    pub size: u64,
    pub fields: Vec<DumpField>,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct InfoOutput {
    pub path: String,
    pub size: u64,
    pub mode: Vec<String>,
}

pub fn print_dump(out: &DumpOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OFFSET", "TYPE", "VALUE"]);
            for field in &out.fields {
                table.add_row(vec![
                    format!("{:#010x}", field.offset),
                    field.kind.clone(),
                    render_value(field),
                ]);
            }
            println!("{table}");
            if let Some(error) = &out.error {
                println!("stopped: {error}");
            }
        }
        OutputFormat::Pretty => {
            for field in &out.fields {
                println!(
                    "{:#010x}  {:<12} {}",
                    field.offset,
                    field.kind,
                    render_value(field)
                );
            }
            if let Some(error) = &out.error {
                println!("stopped: {error}");
            }
        }
    }
}

pub fn print_info(out: &InfoOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("File Info:");
            println!("  Path:  {}", out.path);
            println!("  Size:  {} bytes", out.size);
            println!("  Mode:  {}", out.mode.join(" | "));
        }
    }
}

fn render_value(field: &DumpField) -> String {
    if field.partial {
        format!("{} (partial)", field.value)
    } else {
        field.value.to_string()
    }
}

fn print_json<T: Serialize>(out: &T) {
    println!(
        "{}",
        serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
    );
}
