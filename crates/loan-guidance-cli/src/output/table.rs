use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tabled::{builder::Builder, Table};

use loan_guidance_core::sanitize::{format_currency, format_percentage};

/// Format output as tables using the tabled crate.
///
/// Analysis responses get a metrics table, the risk summary with its
/// recommendation bullets, and the schedule summary; bare arrays
/// (schedules, recommendation lists) get a single table.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) if map.contains_key("analysis") => print_analysis(map),
        Value::Object(_) => print_flat_object(value),
        Value::Array(items) => print_rows(items),
        _ => println!("{}", value),
    }
}

fn print_analysis(map: &serde_json::Map<String, Value>) {
    if let Some(Value::Object(analysis)) = map.get("analysis") {
        let mut builder = Builder::default();
        builder.push_record(["Metric", "Value"]);
        for (key, val) in analysis {
            builder.push_record([key.as_str(), &format_metric(key, val)]);
        }
        println!("{}", Table::from(builder));
    }

    if let Some(Value::Object(risk)) = map.get("risk") {
        if let Some(Value::String(overall)) = risk.get("overall_risk") {
            println!("\nOverall risk: {}", overall);
        }
        if let Some(Value::Array(recommendations)) = risk.get("recommendations") {
            println!("Recommendations:");
            for rec in recommendations {
                if let Value::String(text) = rec {
                    println!("  - {}", text);
                }
            }
        }
    }

    if let Some(Value::Array(schedule)) = map.get("schedule_summary") {
        println!();
        print_rows(schedule);
    }
}

/// Money columns render as currency, ratio columns as percentages.
fn format_metric(key: &str, value: &Value) -> String {
    let parsed = match value {
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    };

    let Some(number) = parsed else {
        return flatten(value);
    };

    const MONEY_KEYS: [&str; 3] = ["monthly_payment", "total_interest", "total_payments"];
    const PERCENT_KEYS: [&str; 3] = ["loan_to_income", "payment_to_income", "loan_to_value"];

    if MONEY_KEYS.contains(&key) {
        format_currency(number)
    } else if PERCENT_KEYS.contains(&key) {
        format_percentage(number)
    } else {
        flatten(value)
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &flatten(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_rows(items: &[Value]) {
    if items.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = items.first() {
        // Headers from the union of keys so optional summary fields show up.
        let mut headers: Vec<String> = first.keys().cloned().collect();
        for item in items {
            if let Value::Object(map) = item {
                for key in map.keys() {
                    if !headers.contains(key) {
                        headers.push(key.clone());
                    }
                }
            }
        }

        let mut builder = Builder::default();
        builder.push_record(&headers);
        for item in items {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(flatten).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }
        println!("{}", Table::from(builder));
    } else {
        for item in items {
            println!("{}", flatten(item));
        }
    }
}

fn flatten(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items.iter().map(flatten).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
