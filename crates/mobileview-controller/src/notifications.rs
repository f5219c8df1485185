//! 사용자 알림 목록.
//!
//! 식별자는 인스턴스별 카운터로 발급되므로 여러 컨트롤러가 서로의
//! 식별자 공간을 공유하지 않는다. 만료된 알림은 새 알림이 들어올 때
//! 정리되며, 호출자가 `prune_expired`로 직접 정리할 수도 있다.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

/// 알림 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// 표시 중인 알림
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// 알림 목록 관리자
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    next_id: u64,
    items: Vec<Notification>,
    auto_dismiss: Duration,
}

impl NotificationCenter {
    /// 자동 닫힘 시간(밀리초)으로 생성
    pub fn new(auto_dismiss_ms: u64) -> Self {
        Self {
            next_id: 0,
            items: Vec::new(),
            auto_dismiss: i64::try_from(auto_dismiss_ms)
                .ok()
                .and_then(Duration::try_milliseconds)
                .unwrap_or(Duration::MAX),
        }
    }

    /// 알림 추가, 발급된 식별자 반환
    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        self.notify_at(kind, message, Utc::now())
    }

    /// 지정된 시각으로 알림 추가
    ///
    /// 추가 전에 `now` 기준으로 만료된 알림을 먼저 제거한다.
    pub fn notify_at(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> u64 {
        self.prune_expired(now);
        let id = self.next_id;
        self.next_id += 1;
        let message = message.into();
        debug!("알림 #{id} ({kind:?}): {message}");
        self.items.push(Notification {
            id,
            kind,
            message,
            created_at: now,
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.notify(NotificationKind::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.notify(NotificationKind::Error, message)
    }

    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.notify(NotificationKind::Info, message)
    }

    /// 알림 닫기 (존재했으면 true)
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// 자동 닫힘 시간이 지난 알림 제거, 제거된 수 반환
    pub fn prune_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.items.len();
        let ttl = self.auto_dismiss;
        self.items.retain(|n| now.signed_duration_since(n.created_at) < ttl);
        before - self.items.len()
    }

    /// 표시 중인 알림 (오래된 순)
    pub fn active(&self) -> &[Notification] {
        &self.items
    }

    /// 가장 최근 알림
    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
