//! Customer notification dispatch.
//!
//! Order events are queued on a channel and delivered by a background
//! worker, so a slow or failing provider never blocks order handling.
//! Delivery is retried a bounded number of times and then dropped with
//! an error log; notifications are best-effort by contract.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    domain::orders::status::OrderStatus,
    ids::{OrderId, RestaurantId},
};

const MAX_DELIVERY_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// An order event a customer should hear about.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderNotification {
    Placed {
        restaurant: RestaurantId,
        order: OrderId,
        phone: String,
        email: Option<String>,
    },
    StatusChanged {
        restaurant: RestaurantId,
        order: OrderId,
        status: OrderStatus,
    },
}

impl OrderNotification {
    #[must_use]
    pub fn order(&self) -> OrderId {
        match self {
            Self::Placed { order, .. } | Self::StatusChanged { order, .. } => *order,
        }
    }
}

#[derive(Debug, Error)]
#[error("notification delivery failed: {reason}")]
pub struct NotificationError {
    pub reason: String,
}

impl NotificationError {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Delivery backend for customer notifications.
#[automock]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, notification: &OrderNotification) -> Result<(), NotificationError>;
}

/// Sink that only logs; the default until a messaging integration is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[async_trait]
impl NotificationSink for TracingSink {
    async fn deliver(&self, notification: &OrderNotification) -> Result<(), NotificationError> {
        match notification {
            OrderNotification::Placed { order, phone, .. } => {
                tracing::info!(%order, phone, "order placed");
            }
            OrderNotification::StatusChanged { order, status, .. } => {
                tracing::info!(%order, %status, "order status changed");
            }
        }

        Ok(())
    }
}

/// Handle for queueing notifications onto the background worker.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    sender: mpsc::UnboundedSender<OrderNotification>,
}

impl NotificationQueue {
    /// Starts the delivery worker and returns the queue handle.
    #[must_use]
    pub fn spawn(sink: Arc<dyn NotificationSink>) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<OrderNotification>();

        tokio::spawn(async move {
            while let Some(notification) = receiver.recv().await {
                deliver_with_retry(sink.as_ref(), &notification).await;
            }
        });

        Self { sender }
    }

    /// Queues a notification; losing one is logged, never surfaced.
    pub fn enqueue(&self, notification: OrderNotification) {
        if let Err(error) = self.sender.send(notification) {
            tracing::error!(order = %error.0.order(), "notification worker is gone");
        }
    }
}

async fn deliver_with_retry(sink: &dyn NotificationSink, notification: &OrderNotification) {
    for attempt in 1..=MAX_DELIVERY_ATTEMPTS {
        match sink.deliver(notification).await {
            Ok(()) => return,
            Err(error) if attempt < MAX_DELIVERY_ATTEMPTS => {
                tracing::warn!(
                    order = %notification.order(),
                    attempt,
                    %error,
                    "notification delivery failed, retrying"
                );

                tokio::time::sleep(RETRY_BACKOFF * attempt).await;
            }
            Err(error) => {
                tracing::error!(
                    order = %notification.order(),
                    attempts = MAX_DELIVERY_ATTEMPTS,
                    %error,
                    "notification dropped after repeated delivery failures"
                );
            }
        }
    }
}
