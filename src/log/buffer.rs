use std::collections::{vec_deque, VecDeque};

use crate::types::LogLine;

/// Maximum number of log lines retained for display.
pub const MAX_LOGS: usize = 200;

/// Insertion-ordered log lines holding at most `capacity` of the most recent entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBuffer {
    lines: VecDeque<LogLine>,
    capacity: usize,
}

impl LogBuffer {
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, line: LogLine) {
        self.lines.push_back(line);
        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
    }

    /// Drops the current contents and keeps the tail of `lines`.
    pub fn replace(&mut self, lines: impl IntoIterator<Item = LogLine>) {
        let lines: Vec<LogLine> = lines.into_iter().collect();
        let skip = lines.len().saturating_sub(self.capacity);

        self.lines.clear();
        self.lines.extend(lines.into_iter().skip(skip));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, LogLine> {
        self.lines.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&LogLine> {
        self.lines.back()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<LogLine> {
        self.lines.iter().cloned().collect()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(MAX_LOGS)
    }
}

impl<'a> IntoIterator for &'a LogBuffer {
    type Item = &'a LogLine;
    type IntoIter = vec_deque::Iter<'a, LogLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
