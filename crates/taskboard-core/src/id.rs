use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use uuid::{Builder, Uuid};

/// Identifier of a task (UUID v7).
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct TaskId(pub Uuid);

impl TaskId {
    #[must_use]
    /// Generate a fresh task identifier.
    pub fn new() -> Self {
        // Version 7 keeps ids ordered by creation time.
        Self(Uuid::now_v7())
    }

    /// Identifier for a record imported without a UUID, derived only from its
    /// creation time in Unix milliseconds and a sequence number.
    ///
    /// The same inputs always give the same id, so records that are migrated on
    /// every load keep their identity until they are written back.
    #[must_use]
    pub fn from_unix_millis(millis: u64, seq: u64) -> Self {
        let mut counter = [0_u8; 10];
        counter[2..].copy_from_slice(&seq.to_be_bytes());
        Self(Builder::from_unix_timestamp_millis(millis, &counter).into_uuid())
    }

    /// Creation time in Unix milliseconds, when the id carries one.
    #[must_use]
    pub fn unix_millis(self) -> Option<u64> {
        let (seconds, nanos) = self.0.get_timestamp()?.to_unix();
        Some(seconds * 1_000 + u64::from(nanos / 1_000_000))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Serialize for TaskId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_uses_uuid_v7() {
        let id = TaskId::new();
        assert_eq!(id.0.get_version_num(), 7);
    }

    #[test]
    fn task_id_roundtrip() {
        let uuid = Uuid::now_v7();
        let parsed: TaskId = uuid
            .to_string()
            .parse()
            .unwrap_or_else(|err| panic!("must parse task id: {err}"));
        assert_eq!(parsed.0, uuid);
    }

    #[test]
    fn millis_ids_are_stable_and_keep_timestamp() {
        let first = TaskId::from_unix_millis(1_700_000_000_123, 0);
        let again = TaskId::from_unix_millis(1_700_000_000_123, 0);
        let next = TaskId::from_unix_millis(1_700_000_000_123, 1);
        assert_eq!(first.0.get_version_num(), 7);
        assert_eq!(first, again);
        assert_ne!(first, next);
        assert_eq!(first.unix_millis(), Some(1_700_000_000_123));
        assert_eq!(next.unix_millis(), Some(1_700_000_000_123));
    }

    #[test]
    fn rejects_non_uuid_input() {
        assert!("1700000000123".parse::<TaskId>().is_err());
    }
}
