//! Markdown projections of the canonical types.
//!
//! The same input and timezone always render the same bytes. Missing data is
//! never an error here: it becomes a `-` cell or its section is left out.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};

use crate::models::{
    non_blank, speaker_label, CallDetails, CallDetailsResponse, CallSummary, CallTranscript,
    CallsResponse, Party, Records, UsersResponse,
};

pub const CALL_TITLE_MAX: usize = 50;
pub const USER_TITLE_MAX: usize = 30;

const PLACEHOLDER: &str = "-";
const LIST_DATE_FORMAT: &str = "%Y-%m-%d";
const DETAIL_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Make a value safe to drop into a table row or a bracketed label.
pub fn escape_markdown(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace('\n', " ")
        .replace('\r', "")
}

/// Hard cut after `max` characters (not bytes, not words).
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// One table cell. Rows are built only from cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell(String);

impl Cell {
    pub fn text(value: Option<&str>) -> Self {
        match non_blank(value) {
            Some(v) => Cell(escape_markdown(v)),
            None => Cell(PLACEHOLDER.to_string()),
        }
    }

    /// Truncation happens before escaping so an escape is never cut in half.
    pub fn truncated(value: Option<&str>, max: usize) -> Self {
        Cell::text(value.map(|v| truncate_chars(v, max)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn table_header(columns: &[&str]) -> [String; 2] {
    [
        format!("| {} |", columns.join(" | ")),
        format!("|{}", "---|".repeat(columns.len())),
    ]
}

fn table_row(cells: &[Cell]) -> String {
    let joined: Vec<&str> = cells.iter().map(Cell::as_str).collect();
    format!("| {} |", joined.join(" | "))
}

fn push_cursor_footer(lines: &mut Vec<String>, records: &Records) {
    if let Some(cursor) = &records.cursor {
        lines.push(format!("\n*More results available. Cursor:* `{}`", cursor));
    }
}

fn format_minutes(seconds: f64) -> String {
    format!("{}m", (seconds / 60.0).round() as i64)
}

fn format_timestamp(s: &str, tz: &FixedOffset, fmt: &str) -> String {
    match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => dt.with_timezone(tz).format(fmt).to_string(),
        Err(_) => truncate_chars(s, 16).to_string(),
    }
}

// ============================================================================
// Calls
// ============================================================================

const CALL_COLUMNS: [&str; 5] = ["ID", "Title", "Date", "Duration", "Scope"];

fn call_row(call: &CallSummary, tz: &FixedOffset) -> String {
    let date = call
        .started
        .as_deref()
        .map(|s| format_timestamp(s, tz, LIST_DATE_FORMAT));
    let duration = call.duration.map(format_minutes);
    table_row(&[
        Cell::text(Some(call.id.as_str())),
        Cell::truncated(call.title.as_deref(), CALL_TITLE_MAX),
        Cell::text(date.as_deref()),
        Cell::text(duration.as_deref()),
        Cell::text(call.scope.as_deref()),
    ])
}

fn render_calls(records: &Records, calls: &[CallSummary], tz: &FixedOffset) -> String {
    let mut lines = vec![format!("**Calls** ({} total)\n", records.total_records)];

    if calls.is_empty() {
        lines.push("No calls found.".to_string());
        return lines.join("\n");
    }

    lines.extend(table_header(&CALL_COLUMNS));
    for call in calls {
        lines.push(call_row(call, tz));
    }

    push_cursor_footer(&mut lines, records);
    lines.join("\n")
}

/// `GET /calls` as a table.
pub fn format_calls_table(response: &CallsResponse, tz: &FixedOffset) -> String {
    render_calls(&response.records, &response.calls, tz)
}

/// Search results (`POST /calls/extensive`) in the same table shape.
pub fn format_call_details_table(response: &CallDetailsResponse, tz: &FixedOffset) -> String {
    let calls: Vec<CallSummary> = response
        .calls
        .iter()
        .map(|c| CallSummary::from(&c.meta_data))
        .collect();
    render_calls(&response.records, &calls, tz)
}

/// Compact single-call view: heading, one metadata line, then whichever
/// sections have data.
pub fn format_call_summary(call: &CallDetails, tz: &FixedOffset) -> String {
    let meta = &call.meta_data;
    let mut lines = Vec::new();

    let title = non_blank(meta.title.as_deref()).unwrap_or("Untitled Call");
    lines.push(format!("## {}\n", escape_markdown(title)));

    let mut parts = vec![format!("**ID:** {}", escape_markdown(&meta.id))];
    if let Some(started) = non_blank(meta.started.as_deref()) {
        let date = format_timestamp(started, tz, DETAIL_DATE_FORMAT);
        parts.push(format!("**Date:** {}", escape_markdown(&date)));
    }
    if let Some(duration) = meta.duration {
        parts.push(format!("**Duration:** {}", format_minutes(duration)));
    }
    if let Some(scope) = non_blank(meta.scope.as_deref()) {
        parts.push(format!("**Scope:** {}", escape_markdown(scope)));
    }
    lines.push(parts.join(" | "));

    if let Some(url) = non_blank(meta.url.as_deref()) {
        lines.push(format!("**URL:** {}", escape_markdown(url)));
    }

    if !call.parties.is_empty() {
        lines.push("\n### Participants\n".to_string());
        let names: Vec<String> = call.parties.iter().map(participant_label).collect();
        lines.push(names.join(", "));
    }

    let Some(content) = &call.content else {
        return lines.join("\n");
    };

    if let Some(brief) = non_blank(content.brief.as_deref()) {
        lines.push("\n### Summary\n".to_string());
        lines.push(escape_markdown(brief));
    }

    if !content.key_points.is_empty() {
        lines.push("\n### Key Points\n".to_string());
        for point in &content.key_points {
            lines.push(format!("- {}", escape_markdown(&point.text)));
        }
    }

    let snippets: Vec<&str> = content
        .points_of_interest
        .iter()
        .flat_map(|poi| &poi.action_items)
        .filter_map(|item| non_blank(item.snippet.as_deref()))
        .collect();
    if !snippets.is_empty() {
        lines.push("\n### Action Items\n".to_string());
        for snippet in snippets {
            lines.push(format!("- {}", escape_markdown(snippet)));
        }
    }

    if !content.topics.is_empty() {
        lines.push("\n### Topics\n".to_string());
        let topics: Vec<String> = content
            .topics
            .iter()
            .map(|t| match t.duration {
                Some(d) => format!("{} ({})", escape_markdown(&t.name), format_minutes(d)),
                None => escape_markdown(&t.name),
            })
            .collect();
        lines.push(topics.join(", "));
    }

    lines.join("\n")
}

fn participant_label(party: &Party) -> String {
    let name = party.display_name().unwrap_or_else(|| "Unknown".to_string());
    match non_blank(party.affiliation.as_deref()) {
        Some(affiliation) => format!(
            "{} ({})",
            escape_markdown(&name),
            escape_markdown(affiliation)
        ),
        None => escape_markdown(&name),
    }
}

// ============================================================================
// Transcripts
// ============================================================================

/// Speaker id → display name, built once per transcript.
fn speaker_directory(parties: &[Party]) -> HashMap<&str, String> {
    let mut names = HashMap::new();
    for party in parties {
        let Some(speaker_id) = non_blank(party.speaker_id.as_deref()) else {
            continue;
        };
        if let Some(name) = party.display_name() {
            names.insert(speaker_id, name);
        }
    }
    names
}

/// Transcript as `[Speaker]: text` paragraphs, one per turn.
pub fn format_transcript(transcript: &CallTranscript, parties: Option<&[Party]>) -> String {
    let speakers = speaker_directory(parties.unwrap_or_default());
    let mut lines = vec![format!(
        "## Transcript (Call {})\n",
        escape_markdown(&transcript.call_id)
    )];

    if transcript.transcript.is_empty() {
        lines.push("*No transcript available*".to_string());
        return lines.join("\n");
    }

    for turn in &transcript.transcript {
        let label = speakers
            .get(turn.speaker_id.as_str())
            .cloned()
            .unwrap_or_else(|| speaker_label(&turn.speaker_id));
        let text: Vec<&str> = turn.sentences.iter().map(|s| s.text.as_str()).collect();
        lines.push(format!(
            "[{}]: {}\n",
            escape_markdown(&label),
            escape_markdown(&text.join(" "))
        ));
    }

    lines.join("\n")
}

// ============================================================================
// Users
// ============================================================================

const USER_COLUMNS: [&str; 5] = ["ID", "Name", "Email", "Title", "Active"];

pub fn format_users_table(response: &UsersResponse) -> String {
    let mut lines = vec![format!("**Users** ({} total)\n", response.records.total_records)];

    if response.users.is_empty() {
        lines.push("No users found.".to_string());
        return lines.join("\n");
    }

    lines.extend(table_header(&USER_COLUMNS));
    for user in &response.users {
        let name = user.full_name();
        let active = if user.active == Some(true) { "Yes" } else { "No" };
        lines.push(table_row(&[
            Cell::text(Some(user.id.as_str())),
            Cell::text(name.as_deref()),
            Cell::text(user.email_address.as_deref()),
            Cell::truncated(user.title.as_deref(), USER_TITLE_MAX),
            Cell::text(Some(active)),
        ]));
    }

    push_cursor_footer(&mut lines, &response.records);
    lines.join("\n")
}
