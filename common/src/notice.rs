//! 一時表示バナー

use std::time::Duration;

/// バナーの表示時間
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success-message",
            NoticeKind::Error => "error-message",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoticeId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: NoticeId,
    pub kind: NoticeKind,
    pub message: String,
}

/// 表示中のバナー一覧（新しいものが先頭）
///
/// 同じ内容でも重複排除はしない。連続したエラーはそのまま積み重なる。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeBoard {
    next_id: u64,
    items: Vec<Notice>,
}

impl NoticeBoard {
    pub fn push(&mut self, kind: NoticeKind, message: impl Into<String>) -> NoticeId {
        let id = NoticeId(self.next_id);
        self.next_id += 1;
        self.items.insert(
            0,
            Notice {
                id,
                kind,
                message: message.into(),
            },
        );
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> NoticeId {
        self.push(NoticeKind::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> NoticeId {
        self.push(NoticeKind::Error, message)
    }

    /// 削除。既に削除済みなら false
    pub fn dismiss(&mut self, id: NoticeId) -> bool {
        match self.items.iter().position(|n| n.id == id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn items(&self) -> &[Notice] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first() {
        let mut board = NoticeBoard::default();
        board.success("first");
        board.error("second");
        assert_eq!(board.items()[0].message, "second");
        assert_eq!(board.items()[1].message, "first");
    }

    #[test]
    fn test_dismiss_once() {
        let mut board = NoticeBoard::default();
        let id = board.error("boom");
        assert!(board.dismiss(id));
        assert!(!board.dismiss(id));
        assert!(board.is_empty());
    }

    #[test]
    fn test_repeated_errors_stack() {
        let mut board = NoticeBoard::default();
        let a = board.error("same");
        let b = board.error("same");
        assert_ne!(a, b);
        assert_eq!(board.len(), 2);

        board.dismiss(a);
        assert_eq!(board.items()[0].id, b);
    }

    #[test]
    fn test_css_class() {
        assert_eq!(NoticeKind::Success.css_class(), "success-message");
        assert_eq!(NoticeKind::Error.css_class(), "error-message");
    }
}
