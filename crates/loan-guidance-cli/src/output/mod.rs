pub mod csv_out;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => print_minimal(value),
    }
}

/// Pretty-print JSON to stdout.
fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// Print just the key answer value.
///
/// Analysis responses reduce to the monthly payment; arrays print one
/// element per line.
fn print_minimal(value: &Value) {
    let target = value
        .as_object()
        .and_then(|m| m.get("analysis"))
        .unwrap_or(value);

    let priority_keys = [
        "monthly_payment",
        "total_interest",
        "total_payments",
        "debt_service_coverage_ratio",
    ];

    match target {
        Value::Object(map) => {
            for key in &priority_keys {
                if let Some(val) = map.get(*key) {
                    if !val.is_null() {
                        println!("{}", render(val));
                        return;
                    }
                }
            }
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, render(val));
            }
        }
        Value::Array(items) => {
            for item in items {
                println!("{}", render(item));
            }
        }
        other => println!("{}", render(other)),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
