//! Turn pre-commit's stdout into per-hook results.
//!
//! A JSON payload (`{"results": [...]}`) is preferred; anything that does not
//! decode as one falls back to scanning the human-readable summary lines.

use std::collections::HashMap;
use std::sync::OnceLock;

use hookbox_core::protocol::{HookResult, HookStatus};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Outcome of the structured stage.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredParse {
    /// stdout was a structured payload. Zero hooks is a valid decode.
    Decoded(Vec<HookResult>),
    /// stdout is not a payload we understand; use the text summary.
    FallbackNeeded,
}

#[derive(Debug, Deserialize)]
struct HookRecord {
    #[serde(default)]
    hook_id: Option<String>,
    #[serde(default)]
    repo: Option<String>,
    #[serde(default)]
    rev: Option<String>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    files: Option<Vec<String>>,
}

impl HookRecord {
    fn into_result(self, raw: Map<String, Value>) -> HookResult {
        let status = match &self.status {
            Some(Value::String(s)) => HookStatus::from_wire(s),
            _ => HookStatus::Unknown,
        };
        HookResult {
            id: self.hook_id,
            repo: self.repo,
            rev: self.rev,
            status,
            files: self.files.filter(|f| !f.is_empty()),
            raw: Some(raw),
        }
    }
}

/// Stage 1: decode stdout as a structured payload.
pub fn parse_structured(stdout: &str) -> StructuredParse {
    if stdout.trim().is_empty() {
        return StructuredParse::Decoded(Vec::new());
    }
    let payload = match serde_json::from_str::<Value>(stdout) {
        Ok(Value::Object(payload)) => payload,
        _ => return StructuredParse::FallbackNeeded,
    };
    let records = match payload.get("results") {
        None => return StructuredParse::Decoded(Vec::new()),
        Some(Value::Array(records)) => records,
        Some(_) => return StructuredParse::FallbackNeeded,
    };

    let mut hooks = Vec::with_capacity(records.len());
    for record in records {
        let Value::Object(raw) = record else {
            return StructuredParse::FallbackNeeded;
        };
        match HookRecord::deserialize(record) {
            Ok(decoded) => hooks.push(decoded.into_result(raw.clone())),
            Err(_) => return StructuredParse::FallbackNeeded,
        }
    }
    StructuredParse::Decoded(hooks)
}

fn summary_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:-|\s)*(\S+?)\s*\.+\s*(?:\([^)]*\)\s*)?(Passed|Failed|Skipped)$")
            .expect("summary line regex is valid")
    })
}

/// Stage 2: scan `black.......Passed` style summary lines.
///
/// Ids keep the position of their first line and the status of their last.
pub fn parse_text_summary(stdout: &str) -> Vec<HookResult> {
    let re = summary_line_re();
    let mut hooks: Vec<HookResult> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for line in stdout.lines() {
        let Some(caps) = re.captures(line.trim()) else {
            continue;
        };
        let id = &caps[1];
        let status = HookStatus::from_wire(&caps[2].to_ascii_lowercase());
        match index.get(id) {
            Some(&i) => hooks[i].status = status,
            None => {
                index.insert(id.to_string(), hooks.len());
                hooks.push(HookResult::from_summary_line(id, status));
            }
        }
    }
    hooks
}

/// Both stages: the structured decode when it applies, else the summary scan.
pub fn parse_output(stdout: &str) -> Vec<HookResult> {
    match parse_structured(stdout) {
        StructuredParse::Decoded(hooks) => hooks,
        StructuredParse::FallbackNeeded => {
            tracing::debug!("stdout is not a structured payload, scanning summary lines");
            parse_text_summary(stdout)
        }
    }
}
