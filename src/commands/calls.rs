use anyhow::Result;
use chrono::{DateTime, FixedOffset, Utc};
use log::debug;
use serde_json::{Map, Value};

use super::{emit, post_json};
use crate::api::types::{CallsExtensiveRequest, CALLS_EXTENSIVE_PATH, CALLS_PATH};
use crate::api::Transport;
use crate::cli::args::DateArgs;
use crate::cli::context::RunContext;
use crate::output::markdown::{format_call_details_table, format_calls_table};
use crate::query::dates::resolve_date_args;
use crate::query::filter::parse_filter_json;
use crate::query::normalize::{normalize_call_details_response, normalize_calls_response};
use crate::query::{validate_search_filter, SearchFilter, ValidationError};

/// Turn command-line flags (and an optional raw `--filter` object) into a
/// validated filter. Flags win over keys of the raw object.
pub fn build_filter(
    dates: &DateArgs,
    users: &[String],
    calls: &[String],
    raw_filter: Option<&str>,
    now: DateTime<Utc>,
    tz: &FixedOffset,
) -> Result<SearchFilter, ValidationError> {
    let mut obj = match raw_filter.map(parse_filter_json).transpose()? {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(obj)) => obj,
        Some(_) => return Err(ValidationError::NotAnObject),
    };

    let resolved = resolve_date_args(
        dates.from.as_deref(),
        dates.to.as_deref(),
        dates.date.as_deref(),
        now,
        tz,
    )?;

    if let Some(from) = resolved.from {
        obj.insert("fromDateTime".into(), Value::String(from));
    }
    if let Some(to) = resolved.to {
        obj.insert("toDateTime".into(), Value::String(to));
    }
    if let Some(ws) = &dates.workspace {
        obj.insert("workspaceId".into(), Value::String(ws.clone()));
    }
    if !users.is_empty() {
        obj.insert("primaryUserIds".into(), string_array(users));
    }
    if !calls.is_empty() {
        obj.insert("callIds".into(), string_array(calls));
    }
    if let Some(cursor) = &dates.cursor {
        obj.insert("cursor".into(), Value::String(cursor.clone()));
    }

    let filter = validate_search_filter(Some(&Value::Object(obj)))?;
    if filter.is_empty() {
        debug!("no filter given, Gong applies its default range");
    } else {
        debug!("validated filter: {:?}", filter);
    }
    Ok(filter)
}

fn string_array(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

/// `GET /calls`: date range, workspace and cursor only.
pub fn list(transport: &dyn Transport, filter: &SearchFilter, ctx: &RunContext) -> Result<String> {
    let raw = transport.get(CALLS_PATH, &filter.query_params())?;
    let response = normalize_calls_response(raw)?;
    Ok(emit(ctx.output_mode, &response, |r| format_calls_table(r, &ctx.tz)))
}

/// `POST /calls/extensive` with the full filter.
pub fn search(transport: &dyn Transport, filter: &SearchFilter, ctx: &RunContext) -> Result<String> {
    let raw = post_json(transport, CALLS_EXTENSIVE_PATH, &CallsExtensiveRequest::search(filter))?;
    let response = normalize_call_details_response(raw)?;
    Ok(emit(ctx.output_mode, &response, |r| format_call_details_table(r, &ctx.tz)))
}
