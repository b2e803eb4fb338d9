use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::TiltAngles;

/// A single detection: `{ "<timestamp>": [theta_x, theta_y, theta_z] }`.
///
/// Non-finite angles are written as `null`; a `null` read back means NaN.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub timestamp: String,
    pub angles: TiltAngles,
}

impl LogEntry {
    pub fn new(timestamp: impl Into<String>, angles: TiltAngles) -> Self {
        Self {
            timestamp: timestamp.into(),
            angles,
        }
    }

    /// Compares two entries treating NaN angles on the same axis as equal.
    pub fn same_as(&self, other: &LogEntry) -> bool {
        self.timestamp == other.timestamp
            && self
                .angles
                .as_array()
                .iter()
                .zip(other.angles.as_array().iter())
                .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
    }
}

impl Serialize for LogEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // serde_json writes non-finite floats as null
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.timestamp, &self.angles.as_array())?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for LogEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LogEntryVisitor)
    }
}

struct LogEntryVisitor;

impl<'de> Visitor<'de> for LogEntryVisitor {
    type Value = LogEntry;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object with exactly one timestamp key mapped to three angles")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<LogEntry, M::Error> {
        let (timestamp, raw): (String, [Option<f64>; 3]) = map
            .next_entry()?
            .ok_or_else(|| <M::Error as de::Error>::invalid_length(0, &self))?;

        if map.next_key::<de::IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(2, &self));
        }

        let angles = raw.map(|v| v.unwrap_or(f64::NAN));
        Ok(LogEntry::new(timestamp, TiltAngles::from(angles)))
    }
}

/// Append-only record of every detection made during the run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TiltLog {
    entries: Vec<LogEntry>,
}

impl TiltLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn same_as(&self, other: &TiltLog) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|(a, b)| a.same_as(b))
    }
}
