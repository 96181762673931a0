//! On-disk layout of the task list.
//!
//! Current layout: `{"version": 1, "tasks": [...]}`. A bare JSON array is the
//! unversioned legacy layout (numeric millisecond ids, empty strings for unset
//! optional fields) and is migrated on read.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskboard_core::{Priority, Task, TaskId, parse_due_date};
use tracing::{debug, warn};

/// Version tag written into every envelope.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    tasks: &'a [Task],
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    #[serde(default)]
    tasks: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyTask {
    id: LegacyId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    completed: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LegacyId {
    Millis(u64),
    Text(String),
}

/// Sequence space for ids re-minted by [`dedupe_ids`], kept apart from the
/// list positions used for migrated records.
const REMINT_SEQ_BASE: u64 = 1 << 48;

fn seq_of(index: usize) -> u64 {
    u64::try_from(index).unwrap_or(u64::MAX)
}

impl LegacyId {
    /// Ids depend only on the stored value and the list position, so loading
    /// the same payload twice yields the same ids.
    fn into_task_id(self, seq: u64) -> TaskId {
        match self {
            Self::Millis(millis) => TaskId::from_unix_millis(millis, seq),
            Self::Text(text) => text.parse::<TaskId>().unwrap_or_else(|_| {
                let millis = text.trim().parse::<u64>().unwrap_or(0);
                TaskId::from_unix_millis(millis, seq)
            }),
        }
    }
}

impl LegacyTask {
    fn into_task(self, seq: u64) -> Task {
        let due_date = self
            .due_date
            .filter(|raw| !raw.trim().is_empty())
            .and_then(|raw| match parse_due_date(&raw) {
                Ok(date) => Some(date),
                Err(err) => {
                    debug!(raw = %raw, error = %err, "Dropping unparsable legacy due date");
                    None
                }
            });
        let priority = self
            .priority
            .and_then(|raw| raw.parse::<Priority>().ok())
            .unwrap_or_default();
        Task {
            id: self.id.into_task_id(seq),
            title: self.title,
            description: self.description,
            due_date,
            priority,
            category: self.category.filter(|value| !value.trim().is_empty()),
            completed: self.completed,
        }
    }
}

/// Result of decoding a stored payload.
#[derive(Debug)]
pub enum Decoded {
    /// Current envelope.
    Current(Vec<Task>),
    /// Legacy array converted to the current model.
    Migrated(Vec<Task>),
    /// Content that cannot be interpreted; carries a reason for logging.
    Malformed(String),
}

/// Serialize tasks into the current envelope.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn encode(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&EnvelopeRef {
        version: SCHEMA_VERSION,
        tasks,
    })
}

/// Interpret a stored payload without ever failing.
#[must_use]
pub fn decode(raw: &str) -> Decoded {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => return Decoded::Malformed(format!("invalid JSON: {err}")),
    };

    match value {
        Value::Array(_) => match serde_json::from_value::<Vec<LegacyTask>>(value) {
            Ok(items) => Decoded::Migrated(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| item.into_task(seq_of(index)))
                    .collect(),
            ),
            Err(err) => Decoded::Malformed(format!("invalid legacy task list: {err}")),
        },
        Value::Object(_) => decode_envelope(value),
        other => Decoded::Malformed(format!("unexpected top-level value: {}", kind_name(&other))),
    }
}

fn decode_envelope(value: Value) -> Decoded {
    let envelope: Envelope = match serde_json::from_value(value) {
        Ok(envelope) => envelope,
        Err(err) => return Decoded::Malformed(format!("invalid envelope: {err}")),
    };
    if envelope.version != SCHEMA_VERSION {
        return Decoded::Malformed(format!(
            "unsupported schema version {} (expected {SCHEMA_VERSION})",
            envelope.version
        ));
    }
    if envelope.tasks.is_null() {
        return Decoded::Current(Vec::new());
    }
    match serde_json::from_value(envelope.tasks) {
        Ok(tasks) => Decoded::Current(tasks),
        Err(err) => Decoded::Malformed(format!("invalid task record: {err}")),
    }
}

const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Re-mint ids that already appeared earlier in the list. Returns how many were replaced.
///
/// Replacements are derived from the duplicate's timestamp and its list
/// position, so the same payload always dedupes to the same ids.
pub fn dedupe_ids(tasks: &mut [Task]) -> usize {
    let mut seen = HashSet::with_capacity(tasks.len());
    let mut replaced = 0;
    for (index, task) in tasks.iter_mut().enumerate() {
        if !seen.insert(task.id) {
            let millis = task.id.unix_millis().unwrap_or(0);
            let mut seq = REMINT_SEQ_BASE.saturating_add(seq_of(index));
            let mut fresh = TaskId::from_unix_millis(millis, seq);
            while seen.contains(&fresh) {
                seq = seq.wrapping_add(1);
                fresh = TaskId::from_unix_millis(millis, seq);
            }
            warn!(duplicate = %task.id, replacement = %fresh, "Duplicate task id in stored data");
            task.id = fresh;
            seen.insert(fresh);
            replaced += 1;
        }
    }
    replaced
}
