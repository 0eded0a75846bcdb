//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use prdash::harvest::{HarvestPhase, Lifespan};
use prdash::{IntakeError, PullRequest};

/// Writes the dashboard as an aligned, one-line-per-pull-request table.
pub fn write_dashboard_table<W: Write>(
    writer: &mut W,
    organisation: &str,
    pulls: &[&PullRequest],
) -> Result<(), IntakeError> {
    writeln!(writer, "Open pull requests for {organisation}:").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    for pull in pulls {
        let title = pull.title.as_deref().unwrap_or("(no title)");
        let author = pull.author.as_deref().unwrap_or("unknown");
        writeln!(
            writer,
            "  {repository}#{number} {title} (@{author}) opened {created}d ago, updated {updated}d ago",
            repository = pull.repository,
            number = pull.number,
            created = pull.days_since_created,
            updated = pull.days_since_updated,
        )
        .map_err(|e| io_error(&e))?;

        if let Some(comment) = &pull.last_comment {
            let commenter = comment.author.as_deref().unwrap_or("unknown");
            let first_line = comment.body.lines().next().unwrap_or_default();
            writeln!(writer, "      last comment by @{commenter}: {first_line}")
                .map_err(|e| io_error(&e))?;
        }
    }

    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "{} pull requests shown", pulls.len()).map_err(|e| io_error(&e))
}

/// Writes one JSON object per pull request.
pub fn write_dashboard_jsonl<W: Write>(
    writer: &mut W,
    pulls: &[&PullRequest],
) -> Result<(), IntakeError> {
    for pull in pulls {
        let line = serde_json::to_string(pull).map_err(|error| IntakeError::Io {
            message: format!("failed to serialise pull request: {error}"),
        })?;
        writeln!(writer, "{line}").map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes the average lifespan line.
pub fn write_lifespan<W: Write>(writer: &mut W, lifespan: Lifespan) -> Result<(), IntakeError> {
    writeln!(writer, "Average lifespan: {lifespan} days").map_err(|e| io_error(&e))
}

/// Writes a progress line for a phase; idle and settled phases print
/// nothing.
pub fn write_progress<W: Write>(writer: &mut W, phase: &HarvestPhase) -> Result<(), IntakeError> {
    if matches!(phase, HarvestPhase::Idle | HarvestPhase::Settled) {
        return Ok(());
    }
    writeln!(writer, "{phase}").map_err(|e| io_error(&e))
}

/// Converts an I/O error to an [`IntakeError::Io`].
pub(crate) fn io_error(error: &io::Error) -> IntakeError {
    IntakeError::Io {
        message: error.to_string(),
    }
}
