use std::{collections::VecDeque, sync::Mutex};

use serde::{Deserialize, Serialize};

const MAX_PENDING: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A user-facing alert waiting for the front end to show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Bounded queue; the oldest notice is dropped once the front end falls behind.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    pending: Mutex<VecDeque<Notice>>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, notice: Notice) {
        let mut pending = self.pending.lock().unwrap_or_else(|err| err.into_inner());
        if pending.len() == MAX_PENDING {
            pending.pop_front();
        }
        pending.push_back(notice);
    }

    pub fn drain(&self) -> Vec<Notice> {
        let mut pending = self.pending.lock().unwrap_or_else(|err| err.into_inner());
        pending.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_the_queue_in_order() {
        let queue = NoticeQueue::new();
        queue.push(Notice::new(NoticeLevel::Info, "a", "first"));
        queue.push(Notice::new(NoticeLevel::Error, "b", "second"));
        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "first");
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn oldest_notice_is_dropped_when_full() {
        let queue = NoticeQueue::new();
        for idx in 0..(MAX_PENDING + 3) {
            queue.push(Notice::new(NoticeLevel::Info, "n", idx.to_string()));
        }
        let drained = queue.drain();
        assert_eq!(drained.len(), MAX_PENDING);
        assert_eq!(drained[0].message, "3");
    }
}
