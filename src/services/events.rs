//! 用户文档变更广播
//!
//! 服务层在写入成功后发布事件，SSE 监听器按 uid 订阅。
//! 订阅对象被 drop 即取消订阅。

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

/// 变更事件类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    ProfileChanged { uid: String },
    LinksChanged { owner_id: String },
    PlpChanged { uid: String },
    SessionChanged { uid: String },
}

impl ChangeEvent {
    /// 事件所属用户
    pub fn uid(&self) -> &str {
        match self {
            ChangeEvent::ProfileChanged { uid }
            | ChangeEvent::PlpChanged { uid }
            | ChangeEvent::SessionChanged { uid } => uid,
            ChangeEvent::LinksChanged { owner_id } => owner_id,
        }
    }
}

/// 订阅端收到的条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedItem {
    Event(ChangeEvent),
    /// 订阅方处理过慢，丢失了若干事件，需要重新拉全量快照
    Lagged(u64),
}

#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// 没有订阅者时直接丢弃
    pub fn publish(&self, event: ChangeEvent) {
        match self.tx.send(event) {
            Ok(n) => debug!("Change event delivered to {} subscribers", n),
            Err(_) => debug!("Change event dropped: no subscribers"),
        }
    }

    pub fn subscribe(&self, uid: impl Into<String>) -> UserSubscription {
        UserSubscription {
            uid: uid.into(),
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(256)
    }
}

/// 单个用户的订阅
pub struct UserSubscription {
    uid: String,
    rx: broadcast::Receiver<ChangeEvent>,
}

impl UserSubscription {
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// 等待下一个属于该用户的事件；发送端全部关闭时返回 None
    pub async fn next(&mut self) -> Option<FeedItem> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.uid() == self.uid => return Some(FeedItem::Event(event)),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(n)) => return Some(FeedItem::Lagged(n)),
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscription_filters_by_uid() {
        let feed = ChangeFeed::new(16);
        let mut sub = feed.subscribe("alice");

        feed.publish(ChangeEvent::ProfileChanged { uid: "bob".into() });
        feed.publish(ChangeEvent::LinksChanged {
            owner_id: "alice".into(),
        });

        assert_eq!(
            sub.next().await,
            Some(FeedItem::Event(ChangeEvent::LinksChanged {
                owner_id: "alice".into()
            }))
        );
    }

    #[tokio::test]
    async fn test_drop_unsubscribes() {
        let feed = ChangeFeed::new(16);
        let sub = feed.subscribe("alice");
        assert_eq!(feed.subscriber_count(), 1);
        drop(sub);
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_lagged_subscriber_is_told() {
        let feed = ChangeFeed::new(2);
        let mut sub = feed.subscribe("alice");
        for _ in 0..5 {
            feed.publish(ChangeEvent::PlpChanged { uid: "alice".into() });
        }
        assert!(matches!(sub.next().await, Some(FeedItem::Lagged(_))));
    }

    #[tokio::test]
    async fn test_closed_feed_ends_subscription() {
        let feed = ChangeFeed::new(4);
        let mut sub = feed.subscribe("alice");
        drop(feed);
        assert_eq!(sub.next().await, None);
    }
}
