//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use campus_core::{FetchOutcome, Resource};

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
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Run `fut` under a stderr spinner when attached to a terminal.
pub async fn with_spinner<F: Future>(message: &str, quiet: bool, fut: F) -> F::Output {
    if quiet || !std::io::stderr().is_terminal() {
        return fut.await;
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(80));
    let out = fut.await;
    bar.finish_and_clear();
    out
}

/// Fetch a resource and hand back its data, or the fetch error.
pub async fn fetch<T>(resource: &Resource<T>, quiet: bool) -> Result<Arc<T>, CliError>
where
    T: Send + Sync + 'static,
{
    let outcome = with_spinner("Loading…", quiet, resource.refetch()).await;
    settle(resource, outcome)
}

/// Turn a finished fetch into data or a CLI error.
pub fn settle<T>(resource: &Resource<T>, outcome: FetchOutcome) -> Result<Arc<T>, CliError>
where
    T: Send + Sync + 'static,
{
    match outcome {
        FetchOutcome::Failed => Err(CliError::Api {
            status: None,
            message: resource
                .error()
                .unwrap_or_else(|| campus_core::error::FALLBACK_MESSAGE.into()),
        }),
        _ => Ok(resource.data()),
    }
}

/// Single-record fetch with a 404 mapped to a "not found" hint.
pub fn found<T>(
    result: Result<T, campus_api::Error>,
    resource_type: &str,
    identifier: impl ToString,
    list_command: &str,
) -> Result<T, CliError> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_not_found() => Err(CliError::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.to_string(),
            list_command: list_command.into(),
        }),
        Err(e) => Err(campus_core::CoreError::from(e).into()),
    }
}

/// Overwrite a form field when its flag was given.
pub fn overlay(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// `"class:subject"` → id pair.
pub fn parse_pair(raw: &str) -> Result<(u64, u64), CliError> {
    let invalid = || CliError::Validation {
        field: "assign".into(),
        reason: format!("expected CLASS_ID:SUBJECT_ID, got '{raw}'"),
    };
    let (left, right) = raw.split_once(':').ok_or_else(invalid)?;
    let class = left.trim().parse().map_err(|_| invalid())?;
    let subject = right.trim().parse().map_err(|_| invalid())?;
    Ok((class, subject))
}

/// Date for display, e.g. "Sep 02, 2024".
pub fn short_date(raw: Option<chrono::DateTime<chrono::Utc>>) -> String {
    raw.map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn assignment_pairs_parse() {
        assert_eq!(parse_pair("3:7").unwrap(), (3, 7));
        assert_eq!(parse_pair(" 3 : 7 ").unwrap(), (3, 7));
        assert!(parse_pair("3").is_err());
        assert!(parse_pair("a:7").is_err());
    }

    #[test]
    fn yes_flag_skips_prompt() {
        assert!(confirm("Delete everything?", true).unwrap());
    }
}
