//! AMQP publisher. Owns the broker connection and channel and delivers one
//! report per cycle to the declared destination queue.

use lapin::options::{BasicPublishOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Broker unreachable or connection dropped. Retryable on the next cycle.
    #[error("broker connection failed: {0}")]
    Connect(#[source] lapin::Error),
    /// The destination cannot be established. Not retryable.
    #[error("queue declare failed: {0}")]
    Declare(#[source] lapin::Error),
    /// Delivery of a single report failed. Retryable on the next cycle.
    #[error("publish failed: {0}")]
    Delivery(#[source] lapin::Error),
}

impl PublishError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, PublishError::Declare(_))
    }
}

/// At most one open connection per publisher. The queue is declared before
/// first use and again after every reconnect; declaring an existing queue
/// with the same arguments is a broker no-op.
pub struct Publisher {
    uri: String,
    queue: String,
    conn: Connection,
    channel: Channel,
}

impl Publisher {
    pub async fn connect(uri: &str, queue: &str) -> Result<Self, PublishError> {
        let (conn, channel) = open(uri, queue).await?;
        info!(queue, "connected to broker");
        Ok(Self {
            uri: uri.to_string(),
            queue: queue.to_string(),
            conn,
            channel,
        })
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Deliver one payload. A closed connection or a transient delivery
    /// failure gets exactly one reconnect-and-retry before the error is
    /// returned; a report is never dropped without that attempt.
    pub async fn publish(&mut self, payload: &[u8]) -> Result<(), PublishError> {
        if !self.conn.status().connected() {
            warn!("broker connection lost, reconnecting");
            self.reconnect().await?;
            return self.try_publish(payload).await;
        }
        match self.try_publish(payload).await {
            Ok(()) => Ok(()),
            Err(err) if !err.is_fatal() => {
                warn!(error = %err, "publish failed, retrying once after reconnect");
                self.reconnect().await?;
                self.try_publish(payload).await
            }
            Err(err) => Err(err),
        }
    }

    async fn try_publish(&self, payload: &[u8]) -> Result<(), PublishError> {
        self.channel
            .basic_publish(
                "",
                &self.queue,
                BasicPublishOptions::default(),
                payload,
                BasicProperties::default(),
            )
            .await
            .map_err(PublishError::Delivery)?
            .await
            .map_err(PublishError::Delivery)?;
        Ok(())
    }

    async fn reconnect(&mut self) -> Result<(), PublishError> {
        let (conn, channel) = open(&self.uri, &self.queue).await?;
        self.conn = conn;
        self.channel = channel;
        info!("reconnected to broker");
        Ok(())
    }

    /// Release the connection on shutdown. Close errors are logged, never
    /// propagated; exit must follow regardless.
    pub async fn close(self) {
        if let Err(e) = self.conn.close(200, "procfeed agent shutting down").await {
            warn!("error closing broker connection: {e}");
        }
    }
}

async fn open(uri: &str, queue: &str) -> Result<(Connection, Channel), PublishError> {
    let conn = Connection::connect(uri, ConnectionProperties::default())
        .await
        .map_err(PublishError::Connect)?;
    let channel = conn.create_channel().await.map_err(PublishError::Connect)?;
    channel
        .queue_declare(queue, QueueDeclareOptions::default(), FieldTable::default())
        .await
        .map_err(PublishError::Declare)?;
    Ok((conn, channel))
}
