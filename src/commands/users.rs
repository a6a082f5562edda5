use anyhow::Result;

use super::emit;
use crate::api::types::{UsersQuery, USERS_PATH};
use crate::api::Transport;
use crate::cli::context::RunContext;
use crate::output::markdown::format_users_table;
use crate::query::normalize::normalize_users_response;

pub fn list(transport: &dyn Transport, query: &UsersQuery, ctx: &RunContext) -> Result<String> {
    let raw = transport.get(USERS_PATH, &query.query_params())?;
    let response = normalize_users_response(raw)?;
    Ok(emit(ctx.output_mode, &response, format_users_table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{FakeTransport, Request};
    use crate::output::format::OutputMode;
    use chrono::FixedOffset;
    use serde_json::json;

    #[test]
    fn lists_users_and_forwards_cursor() {
        let transport = FakeTransport::new().with(
            USERS_PATH,
            json!({
                "records": {"totalRecords": 1},
                "users": [{"id": "1", "firstName": "Grace", "lastName": "Hopper", "active": false}]
            }),
        );
        let ctx = RunContext {
            output_mode: OutputMode::Markdown,
            tz: FixedOffset::east_opt(0).unwrap(),
        };
        let query = UsersQuery {
            cursor: Some("page-2".into()),
            include_avatars: None,
        };
        let output = list(&transport, &query, &ctx).unwrap();
        assert!(output.contains("| 1 | Grace Hopper | - | - | No |"));
        assert!(!output.contains("Cursor"));
        assert_eq!(
            transport.requests(),
            vec![Request::Get(
                USERS_PATH.to_string(),
                vec![("cursor".to_string(), "page-2".to_string())]
            )]
        );
    }
}
