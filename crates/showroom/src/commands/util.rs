//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("{}: {e}", path.display()),
    })
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// `-` for missing optional text.
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use showroom_core::ContactDraft;

    #[test]
    fn json_file_parses_into_draft() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contact.json");
        std::fs::write(&path, r#"{"name":"Budi","mobile":"081234567890"}"#).unwrap();

        let draft: ContactDraft = read_json_file(&path).unwrap();
        assert_eq!(draft.name, "Budi");
        assert!(draft.email.is_none());
    }

    #[test]
    fn malformed_file_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vehicle.json");
        std::fs::write(&path, "{ nope").unwrap();

        let err = read_json_file::<ContactDraft>(&path).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "from-file"));
    }

    #[test]
    fn yes_flag_skips_prompt() {
        assert!(confirm("Delete 3 contacts?", true).unwrap());
    }
}
