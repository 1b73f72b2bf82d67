#![allow(dead_code)]

pub mod fixtures;
pub mod mock_backend;

use std::process::{Command, Output};
use tempfile::TempDir;

/// Runs the folio binary against an isolated config directory
pub struct FolioTest {
    pub temp_dir: TempDir,
}

impl FolioTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        FolioTest { temp_dir }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_folio"))
            .args(args)
            .env("FOLIO_CONFIG_DIR", self.temp_dir.path())
            .env_remove("FOLIO_API_URL")
            .env_remove("FOLIO_LOG")
            .output()
            .expect("Failed to execute folio command")
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
        if output.status.success() {
            panic!(
                "Command {:?} should have failed\nstdout: {}",
                args,
                String::from_utf8_lossy(&output.stdout)
            );
        }
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    /// Write a session file as if `folio login` had succeeded
    pub fn write_session(&self, role: Option<&str>) {
        let session = serde_json::json!({
            "accessToken": "access-token",
            "refreshToken": "refresh-token",
            "user": {
                "id": 1,
                "name": "Dana",
                "email": "dana@example.com",
                "role": role,
            },
        });
        std::fs::write(
            self.temp_dir.path().join("session.json"),
            serde_json::to_string(&session).unwrap(),
        )
        .expect("Failed to write session");
    }
}
