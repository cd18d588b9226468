//! Interactive prompts and small terminal layout helpers.

use crossterm::style::{Attribute, Stylize};
use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::errors::{DbxError, Result};

/// Display a yes/no confirmation prompt.
///
/// `default` sets the pre-selected answer.
/// Returns `None` if the user cancels.
pub fn confirm(prompt: &str, default: bool) -> Result<Option<bool>> {
    let result = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact_opt()
        .map_err(|e| DbxError::Application(format!("Confirm prompt error: {e}")))?;
    Ok(result)
}

/// Render label/value pairs as an aligned two-column block.
pub fn key_value_block(rows: &[(&str, String)]) -> String {
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(k, v)| {
            let label = format!("{:<width$}", k, width = width);
            format!("  {}  {}", label.attribute(Attribute::Bold), v)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
