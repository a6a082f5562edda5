use serde::Serialize;

use crate::query::SearchFilter;

// ============================================================================
// Endpoints
// ============================================================================

pub const CALLS_PATH: &str = "/calls";
pub const CALLS_EXTENSIVE_PATH: &str = "/calls/extensive";
pub const CALLS_TRANSCRIPT_PATH: &str = "/calls/transcript";
pub const USERS_PATH: &str = "/users";

// ============================================================================
// Extensive Call Request
// ============================================================================

/// The `filter` object of `POST /calls/extensive`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallsFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_user_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_ids: Option<Vec<String>>,
}

/// Request body for `POST /calls/extensive`
///
/// The cursor sits next to the filter, not inside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallsExtensiveRequest {
    pub filter: CallsFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_selector: Option<ContentSelector>,
}

impl CallsExtensiveRequest {
    /// Search body: metadata only.
    pub fn search(filter: &SearchFilter) -> Self {
        CallsExtensiveRequest {
            filter: CallsFilter {
                from_date_time: filter.from_date_time.clone(),
                to_date_time: filter.to_date_time.clone(),
                workspace_id: filter.workspace_id.clone(),
                primary_user_ids: filter.primary_user_ids.clone(),
                call_ids: filter.call_ids.clone(),
            },
            cursor: filter.cursor.clone(),
            content_selector: None,
        }
    }

    /// Calls with their parties and the summary content.
    pub fn call_summary(call_ids: &[String]) -> Self {
        CallsExtensiveRequest {
            filter: CallsFilter {
                call_ids: Some(call_ids.to_vec()),
                ..Default::default()
            },
            cursor: None,
            content_selector: Some(ContentSelector::summary()),
        }
    }

    /// Parties only, for naming transcript speakers.
    pub fn parties(call_ids: &[String]) -> Self {
        CallsExtensiveRequest {
            filter: CallsFilter {
                call_ids: Some(call_ids.to_vec()),
                ..Default::default()
            },
            cursor: None,
            content_selector: Some(ContentSelector {
                exposed_fields: ExposedFields {
                    parties: true,
                    content: None,
                },
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSelector {
    pub exposed_fields: ExposedFields,
}

impl ContentSelector {
    pub fn summary() -> Self {
        ContentSelector {
            exposed_fields: ExposedFields {
                parties: true,
                content: Some(ContentFields {
                    brief: true,
                    key_points: true,
                    topics: true,
                    points_of_interest: true,
                }),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposedFields {
    pub parties: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentFields>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFields {
    pub brief: bool,
    pub key_points: bool,
    pub topics: bool,
    pub points_of_interest: bool,
}

// ============================================================================
// Transcript Request
// ============================================================================

/// Request body for `POST /calls/transcript`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptRequest {
    pub filter: CallIdsFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallIdsFilter {
    pub call_ids: Vec<String>,
}

impl TranscriptRequest {
    pub fn for_calls(call_ids: &[String]) -> Self {
        TranscriptRequest {
            filter: CallIdsFilter {
                call_ids: call_ids.to_vec(),
            },
        }
    }
}

// ============================================================================
// Users Query
// ============================================================================

/// Query parameters for `GET /users`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsersQuery {
    pub cursor: Option<String>,
    pub include_avatars: Option<bool>,
}

impl UsersQuery {
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(cursor) = self.cursor.as_deref().filter(|c| !c.is_empty()) {
            params.push(("cursor", cursor.to_string()));
        }
        if let Some(include) = self.include_avatars {
            params.push(("includeAvatars", include.to_string()));
        }
        params
    }
}
