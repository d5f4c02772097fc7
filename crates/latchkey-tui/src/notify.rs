//! Transient on-screen notifications.
//!
//! Notices stack at the top of the frame, newest first, and disappear on
//! their own once their time-to-live elapses. The render loop calls
//! [`NoticeBoard::prune`] every tick; a notice is removed exactly once.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Visual classifier for a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// A single transient message. No identity beyond its position in the
/// board; the message is displayed verbatim, empty strings included.
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
    posted_at: Instant,
}

impl Notice {
    fn expired(&self, ttl: Duration) -> bool {
        self.posted_at.elapsed() >= ttl
    }
}

/// Stack of live notices, newest at the front.
#[derive(Debug)]
pub struct NoticeBoard {
    notices: VecDeque<Notice>,
    ttl: Duration,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            notices: VecDeque::new(),
            ttl,
        }
    }

    /// Insert a notice at the top of the stack.
    pub fn post(&mut self, severity: Severity, message: impl Into<String>) {
        self.notices.push_front(Notice {
            message: message.into(),
            severity,
            posted_at: Instant::now(),
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.post(Severity::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.post(Severity::Error, message);
    }

    /// Drop every notice older than the TTL. Called once per UI tick;
    /// calling it again is a no-op until more notices expire.
    pub fn prune(&mut self) {
        let ttl = self.ttl;
        self.notices.retain(|n| !n.expired(ttl));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Long enough that nothing expires mid-test.
    const LONG_TTL: Duration = Duration::from_secs(60);

    #[test]
    fn test_post_inserts_exactly_one_notice() {
        let mut board = NoticeBoard::new(LONG_TTL);
        board.success("saved");

        assert_eq!(board.len(), 1);
        let notice = board.iter().next().expect("notice should exist");
        assert_eq!(notice.message, "saved");
        assert_eq!(notice.severity, Severity::Success);

        board.prune();
        assert_eq!(board.len(), 1, "prune must not remove live notices");
    }

    #[test]
    fn test_error_notice_carries_error_severity() {
        let mut board = NoticeBoard::new(LONG_TTL);
        board.error("connection refused");

        let notice = board.iter().next().expect("notice should exist");
        assert_eq!(notice.severity, Severity::Error);
    }

    #[test]
    fn test_notices_stack_newest_first() {
        let mut board = NoticeBoard::new(LONG_TTL);
        board.success("first");
        board.error("second");

        let messages: Vec<&str> = board.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, ["second", "first"]);
    }

    #[test]
    fn test_empty_message_is_accepted_verbatim() {
        let mut board = NoticeBoard::new(LONG_TTL);
        board.success("");
        assert_eq!(board.iter().next().map(|n| n.message.as_str()), Some(""));
    }

    #[test]
    fn test_notice_removed_after_ttl_elapses() {
        let mut board = NoticeBoard::new(Duration::from_millis(5));
        board.success("going");
        std::thread::sleep(Duration::from_millis(20));

        board.prune();
        assert!(board.is_empty(), "expired notice must be removed");

        // Removal happens exactly once; a second prune is a no-op
        board.prune();
        assert!(board.is_empty());
    }

    #[test]
    fn test_prune_keeps_younger_notices() {
        let mut board = NoticeBoard::new(Duration::from_millis(30));
        board.success("old");
        std::thread::sleep(Duration::from_millis(40));
        board.error("young");

        board.prune();
        let messages: Vec<&str> = board.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, ["young"]);
    }
}
