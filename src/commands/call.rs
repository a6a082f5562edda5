use anyhow::{bail, Result};
use serde_json::json;

use super::{emit, post_json, SECTION_SEPARATOR};
use crate::api::types::{CallsExtensiveRequest, CALLS_EXTENSIVE_PATH};
use crate::api::Transport;
use crate::cli::context::RunContext;
use crate::output::markdown::format_call_summary;
use crate::query::normalize::normalize_call_details_response;
use crate::query::{validate_search_filter, ValidationError};

/// Run call IDs through the same rules as a search filter's `callIds`.
pub fn validate_call_ids(ids: &[String]) -> Result<(), ValidationError> {
    validate_search_filter(Some(&json!({ "callIds": ids })))?;
    Ok(())
}

/// Calls with parties and summary content, fetched in one request and
/// rendered in the order the IDs were given.
pub fn show(transport: &dyn Transport, ids: &[String], ctx: &RunContext) -> Result<String> {
    validate_call_ids(ids)?;

    let raw = post_json(transport, CALLS_EXTENSIVE_PATH, &CallsExtensiveRequest::call_summary(ids))?;
    let response = normalize_call_details_response(raw)?;

    let mut calls = Vec::with_capacity(ids.len());
    for id in ids {
        let Some(call) = response.calls.iter().find(|c| &c.meta_data.id == id) else {
            bail!("Call not found: {}", id);
        };
        calls.push(call);
    }

    Ok(emit(ctx.output_mode, &calls, |calls| {
        calls
            .iter()
            .map(|c| format_call_summary(c, &ctx.tz))
            .collect::<Vec<_>>()
            .join(SECTION_SEPARATOR)
    }))
}
