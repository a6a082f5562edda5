use std::fmt;

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::models::{
    CallDetailsResponse, CallsResponse, Records, TranscriptsResponse, UsersResponse,
};

/// Which payload failed to normalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Calls,
    CallDetails,
    Transcripts,
    Users,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PayloadKind::Calls => "calls",
            PayloadKind::CallDetails => "call details",
            PayloadKind::Transcripts => "transcripts",
            PayloadKind::Users => "users",
        };
        f.write_str(name)
    }
}

/// The API answered, but the body does not have the shape we need.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Malformed {kind} response: {source}")]
    Malformed {
        kind: PayloadKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed {kind} response: {detail}")]
    Invariant { kind: PayloadKind, detail: String },
}

impl NormalizeError {
    #[cfg(test)]
    pub fn kind(&self) -> PayloadKind {
        match self {
            NormalizeError::Malformed { kind, .. } | NormalizeError::Invariant { kind, .. } => *kind,
        }
    }
}

pub fn normalize_calls_response(raw: Value) -> Result<CallsResponse, NormalizeError> {
    let kind = PayloadKind::Calls;
    let mut response: CallsResponse = parse(kind, raw)?;
    normalize_records(&mut response.records);
    for call in &response.calls {
        check_duration(kind, &call.id, call.duration)?;
    }
    debug!("normalized {} calls (total {})", response.calls.len(), response.records.total_records);
    Ok(response)
}

pub fn normalize_call_details_response(raw: Value) -> Result<CallDetailsResponse, NormalizeError> {
    let kind = PayloadKind::CallDetails;
    let mut response: CallDetailsResponse = parse(kind, raw)?;
    normalize_records(&mut response.records);
    for call in &response.calls {
        check_duration(kind, &call.meta_data.id, call.meta_data.duration)?;
    }
    debug!("normalized {} detailed calls", response.calls.len());
    Ok(response)
}

pub fn normalize_transcripts_response(raw: Value) -> Result<TranscriptsResponse, NormalizeError> {
    let mut response: TranscriptsResponse = parse(PayloadKind::Transcripts, raw)?;
    normalize_records(&mut response.records);
    debug!("normalized {} transcripts", response.call_transcripts.len());
    Ok(response)
}

pub fn normalize_users_response(raw: Value) -> Result<UsersResponse, NormalizeError> {
    let mut response: UsersResponse = parse(PayloadKind::Users, raw)?;
    normalize_records(&mut response.records);
    debug!("normalized {} users (total {})", response.users.len(), response.records.total_records);
    Ok(response)
}

fn parse<T: DeserializeOwned>(kind: PayloadKind, raw: Value) -> Result<T, NormalizeError> {
    serde_json::from_value(raw).map_err(|source| {
        debug!("{} payload rejected: {}", kind, source);
        NormalizeError::Malformed { kind, source }
    })
}

/// An empty cursor means there is no next page.
fn normalize_records(records: &mut Records) {
    if records.cursor.as_deref().is_some_and(str::is_empty) {
        records.cursor = None;
    }
}

fn check_duration(kind: PayloadKind, id: &str, duration: Option<f64>) -> Result<(), NormalizeError> {
    match duration {
        Some(d) if d < 0.0 => Err(NormalizeError::Invariant {
            kind,
            detail: format!("call {} has negative duration {}", id, d),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Value {
        json!({"totalRecords": 1, "currentPageSize": 1, "currentPageNumber": 0})
    }

    #[test]
    fn calls_response_normalizes() {
        let raw = json!({
            "requestId": "req-1",
            "records": records(),
            "calls": [{
                "id": "7782342274025937895",
                "title": "Weekly sync",
                "started": "2024-01-15T10:00:00Z",
                "duration": 1800,
                "scope": "Internal",
                "someNewField": {"ignored": true}
            }]
        });
        let response = normalize_calls_response(raw).unwrap();
        assert_eq!(response.records.total_records, 1);
        assert_eq!(response.calls[0].id, "7782342274025937895");
        assert_eq!(response.calls[0].duration, Some(1800.0));
        assert!(response.records.cursor.is_none());
    }

    #[test]
    fn calls_default_to_empty() {
        let response = normalize_calls_response(json!({"records": {"totalRecords": 0}})).unwrap();
        assert!(response.calls.is_empty());
        assert_eq!(response.records.current_page_size, 0);
    }

    #[test]
    fn missing_call_id_is_malformed() {
        let err = normalize_calls_response(json!({
            "records": records(),
            "calls": [{"title": "no id"}]
        }))
        .unwrap_err();
        assert_eq!(err.kind(), PayloadKind::Calls);
        assert!(matches!(err, NormalizeError::Malformed { .. }));
        assert!(err.to_string().contains("id"), "{}", err);
    }

    #[test]
    fn missing_records_is_malformed() {
        let err = normalize_users_response(json!({"users": []})).unwrap_err();
        assert!(err.to_string().starts_with("Malformed users response"));
    }

    #[test]
    fn negative_duration_violates_invariant() {
        let err = normalize_calls_response(json!({
            "records": records(),
            "calls": [{"id": "1", "duration": -5}]
        }))
        .unwrap_err();
        assert!(matches!(err, NormalizeError::Invariant { .. }));
        assert!(err.to_string().contains("negative duration"));
    }

    #[test]
    fn empty_cursor_becomes_none() {
        let response = normalize_calls_response(json!({
            "records": {"totalRecords": 0, "cursor": ""},
            "calls": []
        }))
        .unwrap();
        assert!(response.records.cursor.is_none());
    }

    #[test]
    fn cursor_is_preserved() {
        let response = normalize_users_response(json!({
            "records": {"totalRecords": 200, "currentPageSize": 100, "cursor": "next-page"},
            "users": []
        }))
        .unwrap();
        assert_eq!(response.records.cursor.as_deref(), Some("next-page"));
    }

    #[test]
    fn call_details_tolerate_partial_payloads() {
        let response = normalize_call_details_response(json!({
            "records": records(),
            "calls": [{"metaData": {"id": "123", "title": "Test Call"}}]
        }))
        .unwrap();
        let call = &response.calls[0];
        assert_eq!(call.meta_data.title.as_deref(), Some("Test Call"));
        assert!(call.content.is_none());
        assert!(call.parties.is_empty());
        assert!(call.interaction.is_none());
        assert!(call.collaboration.is_none());
        assert!(call.media.is_none());
    }

    #[test]
    fn call_details_without_meta_id_is_malformed() {
        let err = normalize_call_details_response(json!({
            "records": records(),
            "calls": [{"metaData": {"title": "Nameless"}}]
        }))
        .unwrap_err();
        assert_eq!(err.kind(), PayloadKind::CallDetails);
    }

    #[test]
    fn call_details_with_full_content() {
        let response = normalize_call_details_response(json!({
            "records": records(),
            "calls": [{
                "metaData": {"id": "1"},
                "parties": [{"id": "p1", "name": "Ada", "speakerId": "s1", "affiliation": "Internal"}],
                "content": {
                    "brief": "Short brief",
                    "keyPoints": [{"text": "Point"}],
                    "topics": [{"name": "Pricing", "duration": 300}],
                    "pointsOfInterest": {"actionItems": [{"snippet": "Send deck"}, {"snippetStartTime": 1}]}
                },
                "interaction": {"interactivity": 0.5, "speakers": [{"id": "s1", "talkTime": 100}]},
                "media": {"audioUrl": "https://example.com/a.mp3"}
            }]
        }))
        .unwrap();
        let call = &response.calls[0];
        let content = call.content.as_ref().unwrap();
        assert_eq!(content.key_points.len(), 1);
        assert_eq!(content.topics[0].duration, Some(300.0));
        let items = &content.points_of_interest.as_ref().unwrap().action_items;
        assert_eq!(items.len(), 2);
        assert!(items[1].snippet.is_none());
        assert_eq!(call.parties[0].speaker_id.as_deref(), Some("s1"));
    }

    #[test]
    fn transcripts_normalize() {
        let response = normalize_transcripts_response(json!({
            "records": records(),
            "callTranscripts": [{
                "callId": "1",
                "transcript": [{
                    "speakerId": "s1",
                    "topic": null,
                    "sentences": [{"start": 0, "end": 1200, "text": "Hello."}]
                }]
            }]
        }))
        .unwrap();
        let t = &response.call_transcripts[0];
        assert_eq!(t.transcript[0].sentences[0].text, "Hello.");
        assert!(t.transcript[0].topic.is_none());
    }

    #[test]
    fn transcript_turn_without_speaker_is_malformed() {
        let err = normalize_transcripts_response(json!({
            "records": records(),
            "callTranscripts": [{"callId": "1", "transcript": [{"sentences": []}]}]
        }))
        .unwrap_err();
        assert_eq!(err.kind(), PayloadKind::Transcripts);
    }

    #[test]
    fn users_normalize_with_nulls() {
        let response = normalize_users_response(json!({
            "records": {"totalRecords": 1},
            "users": [{"id": "42", "firstName": null, "lastName": "Lovelace", "active": true}]
        }))
        .unwrap();
        let user = &response.users[0];
        assert!(user.first_name.is_none());
        assert_eq!(user.active, Some(true));
    }

    #[test]
    fn non_object_payload_is_malformed() {
        assert!(normalize_users_response(json!("oops")).is_err());
        assert!(normalize_calls_response(json!(null)).is_err());
    }
}
