//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{GamerecArgs, ReportFormat};
use crate::engine::RunSummary;
use crate::error::Result;

/// Report for a finished recommend command.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendReport {
    /// Where the artifact was written.
    pub artifact: String,
    /// Run counters.
    #[serde(flatten)]
    pub summary: RunSummary,
}

/// Output a report in the format selected on the command line.
pub fn output_report<T: Serialize>(message: &str, report: &T, args: &GamerecArgs) -> Result<()> {
    match args.report_format {
        ReportFormat::Human => output_human(message, report, args),
        ReportFormat::Json => output_json(report, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, report: &T, args: &GamerecArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(report)?;
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(&val);
                println!("{key}: {formatted_val}");
            }
        }
        _ => {
            let formatted_value = format_value(&value);
            println!("{formatted_value}");
        }
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(report: &T, args: &GamerecArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "null".to_string(),
    }
}
