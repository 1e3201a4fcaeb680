// Output dumpers for structured command results.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plaintext,
    Text,
    Json,
    Yaml,
    Yml,
}

pub const DEFAULT_PLAINTEXT: OutputFormat = OutputFormat::Text;
pub const DEFAULT_STRUCTURED: OutputFormat = OutputFormat::Json;

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Plaintext => "plaintext",
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Yml => "yml",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFormat(pub String);

impl fmt::Display for InvalidFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid output format '{}'.", self.0)
    }
}

impl std::error::Error for InvalidFormat {}

impl FromStr for OutputFormat {
    type Err = InvalidFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plaintext" => Ok(OutputFormat::Plaintext),
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            "yml" => Ok(OutputFormat::Yml),
            other => Err(InvalidFormat(other.to_string())),
        }
    }
}

/// Render `data` in the requested format.
pub fn render<T: Serialize>(data: &T, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::Yaml | OutputFormat::Yml => serde_yaml::to_string(data)?,
        OutputFormat::Plaintext | OutputFormat::Text => {
            let mut out = String::new();
            plaintext(&serde_json::to_value(data)?, 0, &mut out);
            out
        }
    })
}

pub fn dump<T: Serialize>(data: &T, format: OutputFormat) -> anyhow::Result<()> {
    let text = render(data, format)?;
    println!("{}", text.trim_end());
    Ok(())
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".into(),
        other => other.to_string(),
    }
}

fn plaintext(value: &Value, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                if v.is_object() || v.is_array() {
                    out.push_str(&format!("{}{}:\n", indent, key));
                    plaintext(v, depth + 1, out);
                } else {
                    out.push_str(&format!("{}{}: {}\n", indent, key, scalar(v)));
                }
            }
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                if item.is_object() || item.is_array() {
                    if idx > 0 {
                        out.push('\n');
                    }
                    plaintext(item, depth, out);
                } else {
                    out.push_str(&format!("{}- {}\n", indent, scalar(item)));
                }
            }
        }
        other => {
            out.push_str(&format!("{}{}\n", indent, scalar(other)));
        }
    }
}
