use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
        }
    }
}

/// Hands out task ids from the wall clock in milliseconds.
///
/// Ids are strictly increasing: when the clock has not moved past the last id
/// handed out, the next one is bumped by one. Once the numeric range is used
/// up, ids carry a counter suffix instead.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
    overflow: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> String {
        self.next_at(Utc::now().timestamp_millis())
    }

    pub(crate) fn next_at(&mut self, millis: i64) -> String {
        match self.last.checked_add(1) {
            Some(next) => {
                self.last = millis.max(next);
                self.last.to_string()
            }
            None => {
                self.overflow += 1;
                format!("{}-{}", self.last, self.overflow)
            }
        }
    }

    /// Makes sure later ids sort after every numeric id already in use.
    pub fn observe<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            if let Ok(n) = id.parse::<i64>() {
                self.last = self.last.max(n);
            }
        }
    }
}
