use std::io::Read;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use crate::cli::OutputFormat;
use crate::models::Mutation;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Output a single record; text mode prints it as indented JSON too
pub fn output_record<T: Serialize>(
    output_format: &OutputFormat,
    item_type: &str,
    record: &T,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ item_type: record }))?);
        }
        OutputFormat::Text => {
            println!("{}", serde_json::to_string_pretty(record)?);
        }
    }
    Ok(())
}

/// Output the echoed entity of a create or update, or `message` when the server sent none
pub fn output_mutation<T: Serialize>(
    output_format: &OutputFormat,
    item_type: &str,
    outcome: &Mutation<T>,
    message: &str,
) -> anyhow::Result<()> {
    match outcome {
        Mutation::Entity(record) => output_record(output_format, item_type, record),
        Mutation::Status(_) => output_success(output_format, message, None),
    }
}

/// Output a list: JSON under `collection_name`, or one text row per record
pub fn output_rows<T: Serialize>(
    output_format: &OutputFormat,
    collection_name: &str,
    records: &[T],
    header: &str,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if records.is_empty() {
        return output_empty_collection(
            output_format,
            collection_name,
            &format!("No {} found", collection_name),
        );
    }

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: records }))?);
        }
        OutputFormat::Text => {
            println!("{}", header);
            println!("{}", "-".repeat(header.len().max(40)));
            for record in records {
                println!("{}", row(record));
            }
        }
    }
    Ok(())
}

/// Output current item information in the appropriate format
pub fn output_current_item(
    output_format: &OutputFormat,
    item_type: &str,
    name: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                format!("current_{}", item_type): name
            }))?);
        }
        OutputFormat::Text => {
            println!("Current {}: {}", item_type, name);
        }
    }
    Ok(())
}

/// Output "no current item" message in the appropriate format
pub fn output_no_current_item(
    output_format: &OutputFormat,
    item_type: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                format!("current_{}", item_type): null
            }))?);
        }
        OutputFormat::Text => {
            println!("No current {} set", item_type);
        }
    }
    Ok(())
}

/// Extract target item name from optional parameter or use current
pub fn resolve_target_item(
    provided_name: Option<String>,
    current_getter: impl Fn() -> anyhow::Result<Option<String>>,
    item_type: &str,
) -> anyhow::Result<String> {
    match provided_name {
        Some(name) => Ok(name),
        None => {
            match current_getter()? {
                Some(current) => Ok(current),
                None => Err(anyhow::anyhow!(
                    "No current {0} set (pass --{0} or run 'ayon {0} use <name>')",
                    item_type
                )),
            }
        }
    }
}

/// Project from `--project` or the one selected with `ayon project use`
pub fn resolve_project(provided: Option<String>) -> anyhow::Result<String> {
    resolve_target_item(provided, crate::cli::config::current_project, "project")
}

/// Read a JSON document from stdin and decode it
pub fn read_json_stdin<T: DeserializeOwned>(what: &str) -> anyhow::Result<T> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    parse_json_input(&input, what)
}

pub fn parse_json_input<T: DeserializeOwned>(input: &str, what: &str) -> anyhow::Result<T> {
    if input.trim().is_empty() {
        return Err(anyhow::anyhow!("Expected {} JSON on stdin", what));
    }
    serde_json::from_str(input).map_err(|e| anyhow::anyhow!("Invalid {} JSON: {}", what, e))
}

/// Text cell for an optional value
pub fn cell(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
