//! Redis Entry Store
//!
//! Keeps counters and payloads in a Redis server so several processes can share
//! them. Counters live under `count:{key}` and are bumped with `INCR`. Payloads
//! live in a `cached:{key}` hash whose `value` and `stored_at` fields are written
//! by a single `HSET`, so readers never see half of a payload.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{Client, Cmd, FromRedisValue, RedisError};
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::{Clock, EntryStore, Payload};
use crate::error::StoreError;

/// Default bound on establishing a connection
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// Default bound on waiting for the reply to a single command
const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_millis(500);

fn count_key(key: &str) -> String {
    format!("count:{}", key)
}

fn payload_key(key: &str) -> String {
    format!("cached:{}", key)
}

impl From<RedisError> for StoreError {
    fn from(err: RedisError) -> Self {
        if err.is_io_error() || err.is_connection_dropped() || err.is_timeout() {
            StoreError::Unavailable(err.to_string())
        } else {
            StoreError::Protocol(err.to_string())
        }
    }
}

// == Redis Store ==
/// Entry store backed by a Redis server.
///
/// The connection is opened on first use and reopened after an I/O failure, so
/// a server outage shows up as `StoreError::Unavailable` per call rather than
/// at construction. Connecting and every command are bounded by timeouts; a
/// server that stops answering is reported as unavailable, never waited on.
pub struct RedisStore {
    client: Client,
    endpoint: String,
    connection: Mutex<Option<MultiplexedConnection>>,
    connect_timeout: Duration,
    response_timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl RedisStore {
    // == Constructor ==
    /// Creates a store for `endpoint` (e.g. `redis://127.0.0.1:6379/`).
    ///
    /// Only validates the endpoint; no connection is made yet.
    pub fn new(endpoint: &str, clock: Arc<dyn Clock>) -> Result<Self, StoreError> {
        let client =
            Client::open(endpoint).map_err(|e| StoreError::InvalidEndpoint(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            connection: Mutex::new(None),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            clock,
        })
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    async fn connection(&self) -> Result<MultiplexedConnection, StoreError> {
        if let Some(conn) = self.connection.lock().await.as_ref() {
            return Ok(conn.clone());
        }

        // Connect without holding the slot so concurrent callers wait in
        // parallel, not in line
        debug!(endpoint = %self.endpoint, "Connecting to entry store");
        let conn = tokio::time::timeout(
            self.connect_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| {
            StoreError::Unavailable(format!("timed out connecting to {}", self.endpoint))
        })??;

        let mut slot = self.connection.lock().await;
        Ok(slot.get_or_insert(conn).clone())
    }

    async fn run<T: FromRedisValue>(&self, cmd: &Cmd) -> Result<T, StoreError> {
        let mut conn = self.connection().await?;
        let query = cmd.query_async(&mut conn);
        let reply = match tokio::time::timeout(self.response_timeout, query).await {
            Ok(reply) => reply.map_err(StoreError::from),
            Err(_) => Err(StoreError::Unavailable(format!(
                "no reply from {} within {:?}",
                self.endpoint, self.response_timeout
            ))),
        };

        if let Err(StoreError::Unavailable(_)) = &reply {
            // Force a reconnect on the next call
            self.connection.lock().await.take();
        }
        reply
    }
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("endpoint", &self.endpoint)
            .field("connect_timeout", &self.connect_timeout)
            .field("response_timeout", &self.response_timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl EntryStore for RedisStore {
    async fn increment_count(&self, key: &str) -> Result<u64, StoreError> {
        self.run(redis::cmd("INCR").arg(count_key(key))).await
    }

    async fn get_if_fresh(&self, key: &str, ttl: Duration) -> Result<Option<String>, StoreError> {
        let (value, stored_at): (Option<String>, Option<u64>) = self
            .run(
                redis::cmd("HMGET")
                    .arg(payload_key(key))
                    .arg("value")
                    .arg("stored_at"),
            )
            .await?;

        let payload = match (value, stored_at) {
            (Some(value), Some(stored_at)) => Payload { value, stored_at },
            (None, None) => return Ok(None),
            _ => {
                return Err(StoreError::Protocol(format!(
                    "incomplete payload under {}",
                    payload_key(key)
                )))
            }
        };

        let now = self.clock.now_ms();
        Ok(payload.is_fresh(ttl, now).then_some(payload.value))
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let now = self.clock.now_ms();
        self.run(
            redis::cmd("HSET")
                .arg(payload_key(key))
                .arg("value")
                .arg(value)
                .arg("stored_at")
                .arg(now),
        )
        .await
    }

    async fn access_count(&self, key: &str) -> Result<u64, StoreError> {
        let count: Option<u64> = self.run(redis::cmd("GET").arg(count_key(key))).await?;
        Ok(count.unwrap_or(0))
    }
}
