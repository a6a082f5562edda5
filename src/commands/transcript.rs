use std::collections::HashMap;

use anyhow::Result;
use log::{debug, warn};

use super::call::validate_call_ids;
use super::{emit, post_json, SECTION_SEPARATOR};
use crate::api::types::{
    CallsExtensiveRequest, TranscriptRequest, CALLS_EXTENSIVE_PATH, CALLS_TRANSCRIPT_PATH,
};
use crate::api::Transport;
use crate::cli::context::RunContext;
use crate::models::{CallTranscript, Party};
use crate::output::format::OutputMode;
use crate::output::markdown::format_transcript;
use crate::query::normalize::{normalize_call_details_response, normalize_transcripts_response};

/// Transcripts for the given calls, fetched in one request, with speakers
/// named from each call's parties.
pub fn show(transport: &dyn Transport, ids: &[String], ctx: &RunContext) -> Result<String> {
    validate_call_ids(ids)?;

    let raw = post_json(transport, CALLS_TRANSCRIPT_PATH, &TranscriptRequest::for_calls(ids))?;
    let response = normalize_transcripts_response(raw)?;

    let transcripts: Vec<CallTranscript> = ids
        .iter()
        .map(|id| {
            response
                .call_transcripts
                .iter()
                .find(|t| &t.call_id == id)
                .cloned()
                .unwrap_or_else(|| {
                    debug!("no transcript returned for call {}", id);
                    CallTranscript {
                        call_id: id.clone(),
                        transcript: Vec::new(),
                    }
                })
        })
        .collect();

    // Names only matter for markdown, and only when there is something to name.
    let parties = match ctx.output_mode {
        OutputMode::Markdown => {
            let spoken: Vec<String> = transcripts
                .iter()
                .filter(|t| !t.transcript.is_empty())
                .map(|t| t.call_id.clone())
                .collect();
            if spoken.is_empty() {
                HashMap::new()
            } else {
                fetch_parties(transport, &spoken)
            }
        }
        OutputMode::Json => HashMap::new(),
    };

    Ok(emit(ctx.output_mode, &transcripts, |transcripts| {
        transcripts
            .iter()
            .map(|t| format_transcript(t, parties.get(&t.call_id).map(Vec::as_slice)))
            .collect::<Vec<_>>()
            .join(SECTION_SEPARATOR)
    }))
}

/// Parties are a nicety: if they cannot be fetched, speakers fall back to
/// their labels.
fn fetch_parties(transport: &dyn Transport, ids: &[String]) -> HashMap<String, Vec<Party>> {
    let result = post_json(transport, CALLS_EXTENSIVE_PATH, &CallsExtensiveRequest::parties(ids))
        .and_then(|raw| Ok(normalize_call_details_response(raw)?));

    match result {
        Ok(response) => response
            .calls
            .into_iter()
            .map(|c| (c.meta_data.id, c.parties))
            .collect(),
        Err(e) => {
            warn!("could not fetch parties for calls {}: {}", ids.join(", "), e);
            HashMap::new()
        }
    }
}
