//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for vCon JSON documents
pub struct VconBuilder {
    uuid: Option<String>,
    created_at: Option<String>,
    parties: Vec<Value>,
    dialog: Vec<Value>,
    analysis: Vec<Value>,
    attachments: Vec<Value>,
}

impl VconBuilder {
    /// Create a new record with a fixed uuid and creation time
    pub fn new() -> Self {
        Self {
            uuid: Some("0190a6b2-0000-7000-8000-000000000001".to_string()),
            created_at: Some("2024-03-01T09:30:00Z".to_string()),
            parties: Vec::new(),
            dialog: Vec::new(),
            analysis: Vec::new(),
            attachments: Vec::new(),
        }
    }

    pub fn uuid(mut self, uuid: &str) -> Self {
        self.uuid = Some(uuid.to_string());
        self
    }

    pub fn without_uuid(mut self) -> Self {
        self.uuid = None;
        self
    }

    pub fn created_at(mut self, created_at: &str) -> Self {
        self.created_at = Some(created_at.to_string());
        self
    }

    pub fn party(mut self, name: &str) -> Self {
        self.parties.push(json!({"name": name}));
        self
    }

    pub fn recording(mut self, url: &str, duration: f64) -> Self {
        self.dialog.push(json!({"type": "recording", "url": url, "duration": duration}));
        self
    }

    pub fn transcript(mut self, body: &str) -> Self {
        self.dialog.push(json!({"type": "transcript", "body": body, "duration": 0}));
        self
    }

    pub fn summary(mut self, body: &str) -> Self {
        self.analysis.push(json!({"type": "summary", "body": body, "vendor": "openai"}));
        self
    }

    pub fn attachment(mut self, attachment: Value) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn to_value(&self) -> Value {
        json!({
            "uuid": self.uuid,
            "created_at": self.created_at,
            "parties": self.parties,
            "dialog": self.dialog,
            "analysis": self.analysis,
            "attachments": self.attachments,
        })
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

impl Default for VconBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Temporary directory of vCon files
pub struct VconDir {
    temp_dir: TempDir,
}

impl VconDir {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a record to `<name>` inside the directory
    pub fn with_vcon(self, name: &str, vcon: &VconBuilder) -> Self {
        self.with_file(name, &vcon.to_json())
    }

    /// Write arbitrary content, for malformed inputs
    pub fn with_file(self, name: &str, content: &str) -> Self {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(path, content).expect("Failed to write vCon file");
        self
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

impl Default for VconDir {
    fn default() -> Self {
        Self::new()
    }
}
