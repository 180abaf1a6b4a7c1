//! Media record and configuration handlers.

use pinway::{
    ConfigError, ConfigErrorKind, MediaError, MediaErrorKind, MediaRecord, MediaReference,
    PinwayConfig, PinwayResult,
};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Flatten the media record in `input` (stdin when `None`) and print it.
pub fn normalize_record(input: Option<&Path>) -> PinwayResult<()> {
    let json = match input {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            MediaError::new(MediaErrorKind::Malformed(format!(
                "cannot read {}: {e}",
                path.display()
            )))
        })?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map_err(|e| {
                MediaError::new(MediaErrorKind::Malformed(format!("cannot read stdin: {e}")))
            })?;
            buf
        }
    };

    let record = MediaRecord::from_json(&json)?;
    debug!(legacy = record.is_legacy(), "Parsed media record");
    print_reference(&record.normalize()?)
}

/// Print the configuration in effect as TOML. The JWT is never printed.
pub fn show_config(config: &PinwayConfig) -> PinwayResult<()> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| ConfigError::new(ConfigErrorKind::Parse(e.to_string())))?;
    print!("{rendered}");
    Ok(())
}

pub(super) fn print_reference(reference: &MediaReference) -> PinwayResult<()> {
    let json = serde_json::to_string_pretty(reference)
        .map_err(|e| MediaError::new(MediaErrorKind::Malformed(e.to_string())))?;
    println!("{json}");
    Ok(())
}
