pub mod detect;
pub mod init;
pub mod normalize;
pub mod template;
pub mod validate;
pub mod verify;

use std::path::Path;

/// Read a JSON document given inline or as a path to a file.
pub fn read_json(source: &str) -> anyhow::Result<serde_json::Value> {
    // Try reading as file first, then as inline JSON
    let json_str = if Path::new(source).exists() {
        std::fs::read_to_string(source)?
    } else {
        source.to_string()
    };

    serde_json::from_str(&json_str).map_err(|e| anyhow::anyhow!("invalid badge JSON: {}", e))
}

/// Pretty-print a value as JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
