//! Offline rendering of saved API responses.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use super::{emit, SECTION_SEPARATOR};
use crate::cli::args::RenderKind;
use crate::cli::context::RunContext;
use crate::models::{CallDetailsResponse, Party};
use crate::output::markdown::{
    format_call_details_table, format_call_summary, format_calls_table, format_transcript,
    format_users_table,
};
use crate::query::normalize::{
    normalize_call_details_response, normalize_calls_response, normalize_transcripts_response,
    normalize_users_response,
};

/// Read a JSON payload from a file, or stdin when no path is given.
pub fn read_payload(path: Option<&Path>) -> Result<Value> {
    let text = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    let source = path.map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", source))
}

/// Normalize `raw` as `kind` and render it.
///
/// `parties_raw` is a call details payload; it is only used to name
/// transcript speakers.
pub fn render(
    kind: RenderKind,
    raw: Value,
    parties_raw: Option<Value>,
    ctx: &RunContext,
) -> Result<String> {
    let tz = &ctx.tz;
    let output = match kind {
        RenderKind::Calls => {
            let response = normalize_calls_response(raw)?;
            emit(ctx.output_mode, &response, |r| format_calls_table(r, tz))
        }
        RenderKind::Search => {
            let response = normalize_call_details_response(raw)?;
            emit(ctx.output_mode, &response, |r| format_call_details_table(r, tz))
        }
        RenderKind::Call => {
            let response = normalize_call_details_response(raw)?;
            if response.calls.is_empty() {
                bail!("No calls in payload");
            }
            emit(ctx.output_mode, &response.calls, |calls| {
                calls
                    .iter()
                    .map(|c| format_call_summary(c, tz))
                    .collect::<Vec<_>>()
                    .join(SECTION_SEPARATOR)
            })
        }
        RenderKind::Transcript => {
            let response = normalize_transcripts_response(raw)?;
            if response.call_transcripts.is_empty() {
                bail!("No transcripts in payload");
            }
            let details = parties_raw
                .map(normalize_call_details_response)
                .transpose()?;
            emit(ctx.output_mode, &response.call_transcripts, |transcripts| {
                transcripts
                    .iter()
                    .map(|t| format_transcript(t, parties_for(details.as_ref(), &t.call_id)))
                    .collect::<Vec<_>>()
                    .join(SECTION_SEPARATOR)
            })
        }
        RenderKind::Users => {
            let response = normalize_users_response(raw)?;
            emit(ctx.output_mode, &response, format_users_table)
        }
    };
    Ok(output)
}

fn parties_for<'a>(details: Option<&'a CallDetailsResponse>, call_id: &str) -> Option<&'a [Party]> {
    details?
        .calls
        .iter()
        .find(|c| c.meta_data.id == call_id)
        .map(|c| c.parties.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::format::OutputMode;
    use chrono::FixedOffset;
    use serde_json::json;
    use tempfile::TempDir;

    fn ctx(mode: OutputMode) -> RunContext {
        RunContext {
            output_mode: mode,
            tz: FixedOffset::east_opt(0).unwrap(),
        }
    }

    #[test]
    fn renders_users_payload() {
        let output = render(
            RenderKind::Users,
            json!({"records": {"totalRecords": 0}, "users": []}),
            None,
            &ctx(OutputMode::Markdown),
        )
        .unwrap();
        assert_eq!(output, "**Users** (0 total)\n\nNo users found.");
    }

    #[test]
    fn renders_each_call_summary() {
        let output = render(
            RenderKind::Call,
            json!({
                "records": {"totalRecords": 2},
                "calls": [{"metaData": {"id": "1"}}, {"metaData": {"id": "2", "title": "Second"}}]
            }),
            None,
            &ctx(OutputMode::Markdown),
        )
        .unwrap();
        assert_eq!(
            output,
            "## Untitled Call\n\n**ID:** 1\n\n---\n\n## Second\n\n**ID:** 2"
        );
    }

    #[test]
    fn call_kind_without_calls_fails() {
        let err = render(
            RenderKind::Call,
            json!({"records": {"totalRecords": 0}}),
            None,
            &ctx(OutputMode::Markdown),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "No calls in payload");
    }

    #[test]
    fn transcript_uses_parties_payload() {
        let output = render(
            RenderKind::Transcript,
            json!({
                "records": {"totalRecords": 1},
                "callTranscripts": [{"callId": "3", "transcript": [{"speakerId": "a", "sentences": [{"text": "Hello"}]}]}]
            }),
            Some(json!({
                "records": {"totalRecords": 1},
                "calls": [{"metaData": {"id": "3"}, "parties": [{"emailAddress": "x@example.com", "speakerId": "a"}]}]
            })),
            &ctx(OutputMode::Markdown),
        )
        .unwrap();
        assert!(output.contains("[x@example.com]: Hello"));
    }

    #[test]
    fn malformed_payload_names_kind() {
        let err = render(
            RenderKind::Transcript,
            json!({"records": {"totalRecords": 1}, "callTranscripts": [{"transcript": []}]}),
            None,
            &ctx(OutputMode::Markdown),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("Malformed transcripts response"));
    }

    #[test]
    fn json_mode_prints_normalized_calls() {
        let output = render(
            RenderKind::Search,
            json!({"records": {"totalRecords": 1, "cursor": ""}, "calls": [{"metaData": {"id": "1", "title": null}}]}),
            None,
            &ctx(OutputMode::Json),
        )
        .unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["calls"][0]["metaData"], json!({"id": "1"}));
    }

    #[test]
    fn read_payload_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("calls.json");
        fs::write(&path, r#"{"records": {"totalRecords": 0}}"#).unwrap();
        let value = read_payload(Some(&path)).unwrap();
        assert_eq!(value["records"]["totalRecords"], 0);
    }

    #[test]
    fn read_payload_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "not json").unwrap();
        let err = read_payload(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("is not valid JSON"));
    }
}
