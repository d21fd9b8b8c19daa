#![allow(dead_code)]

use std::fs;
use std::process::{Command, Output};
use std::sync::Arc;

use serde_json::{Value, json};
use tempfile::TempDir;

use jyp::ServiceProvider;
use jyp::remote::MockTransport;
use jyp::storage::{MemoryCredentialStore, MemoryPreferences, PreferenceKey, Preferences};

/// Helper struct to run jyp commands against isolated config and data dirs
pub struct JypTest {
    pub temp_dir: TempDir,
}

impl JypTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        JypTest { temp_dir }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], envs: &[(&str, &str)]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_jyp"))
            .args(args)
            .envs(envs.iter().copied())
            .env("JYP_CONFIG_DIR", self.temp_dir.path().join("config"))
            .env("JYP_DATA_DIR", self.temp_dir.path().join("data"))
            // Nothing listens on the discard port.
            .env("JYP_API_URL", "http://127.0.0.1:9/")
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to execute jyp command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn write_config(&self, content: &str) {
        let dir = self.temp_dir.path().join("config");
        fs::create_dir_all(&dir).expect("Failed to create config directory");
        fs::write(dir.join("config.yaml"), content).expect("Failed to write config");
    }

    pub fn read_preferences(&self) -> Value {
        let path = self.temp_dir.path().join("data").join("preferences.json");
        let content = fs::read_to_string(path).expect("Failed to read preferences");
        serde_json::from_str(&content).expect("Preferences are not JSON")
    }
}

/// Provider over a mock transport with `user_id` signed in.
pub fn mock_provider(user_id: &str) -> (Arc<MockTransport>, ServiceProvider) {
    let transport = Arc::new(MockTransport::new());
    let preferences = Arc::new(MemoryPreferences::new());
    preferences.set(PreferenceKey::UserId, user_id);
    let provider = ServiceProvider::new(
        transport.clone(),
        Arc::new(MemoryCredentialStore::new()),
        preferences,
    );
    (transport, provider)
}

pub fn user(id: &str) -> Value {
    json!({"id": id, "nickname": id})
}

pub fn place(id: &str, name: &str, likers: &[&str]) -> Value {
    let like_by: Vec<Value> = likers.iter().map(|id| user(id)).collect();
    json!({
        "id": id,
        "name": name,
        "link": format!("https://place.example/{id}"),
        "likeBy": like_by,
    })
}

/// Journey `j1` with three candidate places and two days.
///
/// `a` and `b` have three likes each (u1 among them), `c` has one.
pub fn journey_json() -> Value {
    json!({
        "id": "j1",
        "name": "부산 먹방",
        "startDate": 1690848000.0,
        "endDate": 1690934400.0,
        "themePath": "theme/busan.png",
        "users": [user("u1"), user("u2"), user("u3")],
        "tags": [
            {"id": "t1", "text": "해산물", "type": "like"},
            {"id": "t2", "text": "등산", "type": "dislike"}
        ],
        "pikmis": [
            place("c", "광안리", &["u2"]),
            place("a", "자갈치시장", &["u1", "u2", "u3"]),
            place("b", "해운대", &["u1", "u2", "u3"])
        ],
        "pikidays": [
            {"id": "d1", "pikis": []},
            {"id": "d2", "pikis": []}
        ]
    })
}
