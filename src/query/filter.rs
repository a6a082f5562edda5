use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use serde_json::{Map, Value};

use super::ValidationError;

/// A validated search filter.
///
/// Holds only the fields the caller actually supplied. Empty ID lists are
/// dropped during validation, so `Some(vec)` is always non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl SearchFilter {
    /// Query parameters for `GET /calls`, which only understands the date
    /// range, workspace and cursor.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(from) = &self.from_date_time {
            params.push(("fromDateTime", from.clone()));
        }
        if let Some(to) = &self.to_date_time {
            params.push(("toDateTime", to.clone()));
        }
        if let Some(ws) = &self.workspace_id {
            params.push(("workspaceId", ws.clone()));
        }
        if let Some(cursor) = &self.cursor {
            params.push(("cursor", cursor.clone()));
        }
        params
    }

    pub fn is_empty(&self) -> bool {
        *self == SearchFilter::default()
    }
}

/// Validate a raw filter argument into a [`SearchFilter`].
///
/// `None` means the caller omitted the argument, which is the same as `{}`.
/// Field rules run first; the date-order rule runs on the whole object once
/// every field is known to be well-formed.
pub fn validate_search_filter(raw: Option<&Value>) -> Result<SearchFilter, ValidationError> {
    let empty = Map::new();
    let obj = match raw {
        None | Some(Value::Null) => &empty,
        Some(Value::Object(obj)) => obj,
        Some(_) => return Err(ValidationError::NotAnObject),
    };

    let from = optional_string(obj, "fromDateTime")?
        .map(|s| parse_timestamp("fromDateTime", s))
        .transpose()?;
    let to = optional_string(obj, "toDateTime")?
        .map(|s| parse_timestamp("toDateTime", s))
        .transpose()?;

    let workspace_id = optional_string(obj, "workspaceId")?;
    if let Some(ws) = &workspace_id {
        require_digits("workspaceId".to_string(), ws)?;
    }

    let primary_user_ids = optional_id_list(obj, "primaryUserIds")?;
    let call_ids = optional_id_list(obj, "callIds")?;
    let cursor = optional_string(obj, "cursor")?.filter(|c| !c.is_empty());

    if let (Some((_, from_dt)), Some((_, to_dt))) = (&from, &to) {
        if from_dt >= to_dt {
            return Err(ValidationError::DateOrder);
        }
    }

    Ok(SearchFilter {
        from_date_time: from.map(|(raw, _)| raw),
        to_date_time: to.map(|(raw, _)| raw),
        workspace_id,
        primary_user_ids,
        call_ids,
        cursor,
    })
}

/// Parse a filter supplied as a JSON string (CLI `--filter`).
pub fn parse_filter_json(text: &str) -> Result<Value, ValidationError> {
    serde_json::from_str(text).map_err(|e| ValidationError::Json(e.to_string()))
}

pub fn is_numeric_id(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn require_digits(field: String, value: &str) -> Result<(), ValidationError> {
    if is_numeric_id(value) {
        Ok(())
    } else {
        Err(ValidationError::NotNumeric {
            field,
            value: value.to_string(),
        })
    }
}

fn parse_timestamp(
    field: &'static str,
    value: String,
) -> Result<(String, DateTime<FixedOffset>), ValidationError> {
    match DateTime::parse_from_rfc3339(&value) {
        Ok(dt) => Ok((value, dt)),
        Err(_) => Err(ValidationError::InvalidTimestamp { field, value }),
    }
}

fn optional_string(obj: &Map<String, Value>, key: &str) -> Result<Option<String>, ValidationError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::WrongType {
            field: key.to_string(),
            expected: "a string",
        }),
    }
}

/// An array of digit-only strings. An empty array comes back as `None`.
fn optional_id_list(
    obj: &Map<String, Value>,
    key: &str,
) -> Result<Option<Vec<String>>, ValidationError> {
    let items = match obj.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ValidationError::WrongType {
                field: key.to_string(),
                expected: "an array of strings",
            });
        }
    };

    let mut ids = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let field = format!("{}[{}]", key, i);
        match item {
            Value::String(s) => {
                require_digits(field, s)?;
                ids.push(s.clone());
            }
            _ => {
                return Err(ValidationError::WrongType {
                    field,
                    expected: "a string",
                });
            }
        }
    }

    Ok(if ids.is_empty() { None } else { Some(ids) })
}
