#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warn,
    Error,
}

impl NoticeLevel {
    fn priority(self) -> u8 {
        match self {
            NoticeLevel::Error => 3,
            NoticeLevel::Warn => 2,
            NoticeLevel::Success | NoticeLevel::Info => 1,
        }
    }

    fn can_replace(self, current: Self) -> bool {
        self.priority() >= current.priority()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// The single status row. It is cleared at the start of every event
/// iteration; within one iteration a lower-priority notice cannot hide a
/// higher-priority one.
#[derive(Debug, Default)]
pub struct StatusLine {
    current: Option<Notice>,
    dirty: bool,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        if self.current.take().is_some() {
            self.dirty = true;
        }
    }

    pub fn post(&mut self, level: NoticeLevel, text: impl Into<String>) -> bool {
        let should_replace = match self.current.as_ref() {
            None => true,
            Some(notice) => level.can_replace(notice.level),
        };
        if should_replace {
            self.current = Some(Notice {
                level,
                text: text.into(),
            });
            self.dirty = true;
        }
        should_replace
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.post(NoticeLevel::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.post(NoticeLevel::Success, text);
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.post(NoticeLevel::Warn, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.post(NoticeLevel::Error, text);
    }

    /// Reports whether the row changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_priority_orders_error_over_warn_over_info() {
        assert!(NoticeLevel::Error.can_replace(NoticeLevel::Warn));
        assert!(NoticeLevel::Warn.can_replace(NoticeLevel::Success));
        assert!(!NoticeLevel::Success.can_replace(NoticeLevel::Warn));
        assert!(NoticeLevel::Info.can_replace(NoticeLevel::Success));
    }

    #[test]
    fn post_rejects_lower_priority_notice() {
        let mut status = StatusLine::new();
        status.error("cannot list /x");

        let replaced = status.post(NoticeLevel::Info, "moved");

        assert!(!replaced);
        assert_eq!(status.current().unwrap().text, "cannot list /x");
    }

    #[test]
    fn clear_marks_dirty_only_when_something_was_shown() {
        let mut status = StatusLine::new();
        status.clear();
        assert!(!status.take_dirty());

        status.warn("already at root");
        assert!(status.take_dirty());
        status.clear();
        assert!(status.take_dirty());
        assert!(status.current().is_none());
    }

    #[test]
    fn clear_then_post_allows_lower_level_again() {
        let mut status = StatusLine::new();
        status.error("failed");
        status.clear();

        status.info("ok");

        assert_eq!(status.current().unwrap().level, NoticeLevel::Info);
    }
}
