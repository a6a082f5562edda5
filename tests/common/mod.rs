#![allow(dead_code)]

use std::path::PathBuf;

use assert_cmd::Command;
use serde_json::{json, Value};
use tempfile::TempDir;

/// A self-contained test environment with an isolated config directory and
/// a place to drop saved API payloads.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("config")).unwrap();
        TestEnv { dir }
    }

    /// Write a payload into the environment and return its path.
    pub fn write_payload(&self, name: &str, payload: &Value) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, serde_json::to_string_pretty(payload).unwrap()).unwrap();
        path
    }

    /// Write a gongmd config file under the isolated config directory.
    pub fn write_config(&self, toml: &str) -> PathBuf {
        let dir = self.dir.path().join("config").join("gongmd");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, toml).unwrap();
        path
    }

    /// Get a Command configured to run gongmd with this environment and no
    /// credentials from the outer process.
    pub fn cmd(&self) -> Command {
        let mut cmd = assert_cmd::cargo_bin_cmd!("gongmd");
        cmd.env("XDG_CONFIG_HOME", self.dir.path().join("config"));
        cmd.env("HOME", self.dir.path());
        cmd.env_remove("GONG_ACCESS_KEY");
        cmd.env_remove("GONG_ACCESS_KEY_SECRET");
        cmd.env_remove("GONG_BASE_URL");
        cmd.env_remove("GONGMD_LOG");
        cmd.arg("--utc");
        cmd
    }

    /// Get a Command with --json flag.
    pub fn cmd_json(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("--json");
        cmd
    }
}

pub fn calls_payload() -> Value {
    json!({
        "requestId": "req-calls",
        "records": {"totalRecords": 2, "currentPageSize": 2, "currentPageNumber": 0, "cursor": "eyJwYWdlIjoyfQ=="},
        "calls": [
            {
                "id": "7782342274025937895",
                "title": "Acme | Renewal\nnegotiation",
                "started": "2025-06-15T14:00:00Z",
                "duration": 2700,
                "scope": "External"
            },
            {
                "id": "7782342274025937896",
                "title": null
            }
        ]
    })
}

pub fn call_details_payload() -> Value {
    json!({
        "requestId": "req-details",
        "records": {"totalRecords": 1, "currentPageSize": 1, "currentPageNumber": 0},
        "calls": [{
            "metaData": {
                "id": "7782342274025937895",
                "title": "Acme Renewal",
                "url": "https://app.gong.io/call?id=7782342274025937895",
                "started": "2025-06-15T14:00:00Z",
                "duration": 2700,
                "scope": "External"
            },
            "parties": [
                {"id": "p1", "name": "Dana Reyes", "speakerId": "111", "affiliation": "Internal"},
                {"id": "p2", "emailAddress": "buyer@acme.test", "speakerId": "222", "affiliation": "External"}
            ],
            "content": {
                "brief": "Acme agreed to renew for two years.",
                "keyPoints": [{"text": "Two-year term"}, {"text": "Price held flat"}],
                "topics": [{"name": "Pricing", "duration": 900}],
                "pointsOfInterest": {"actionItems": [{"snippet": "Send the order form"}]}
            }
        }]
    })
}

pub fn transcripts_payload() -> Value {
    json!({
        "requestId": "req-transcripts",
        "records": {"totalRecords": 1, "currentPageSize": 1, "currentPageNumber": 0},
        "callTranscripts": [{
            "callId": "7782342274025937895",
            "transcript": [
                {"speakerId": "111", "topic": "Intro", "sentences": [{"start": 0, "end": 1500, "text": "Thanks for joining."}]},
                {"speakerId": "222", "topic": null, "sentences": [{"start": 1600, "end": 2400, "text": "Happy to be here."}]},
                {"speakerId": "333", "sentences": [{"start": 2500, "end": 2900, "text": "Hi all."}]}
            ]
        }]
    })
}

pub fn users_payload() -> Value {
    json!({
        "requestId": "req-users",
        "records": {"totalRecords": 1, "currentPageSize": 1, "currentPageNumber": 0},
        "users": [{
            "id": "234599484848423",
            "emailAddress": "dana@example.test",
            "firstName": "Dana",
            "lastName": "Reyes",
            "title": "Account Executive",
            "active": true
        }]
    })
}
