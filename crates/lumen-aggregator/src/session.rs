//! Lazily opened, explicitly disposed engine sessions.
//!
//! Engines that drive an expensive client (a headless browser, a language
//! server) share one session per aggregation context. The caller owns the
//! [`SharedSession`] and passes it to engines by `Arc`; nothing is global.

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Opens and closes sessions of one kind.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// The session handle engines work with.
    type Session: Send + Sync + 'static;

    /// Open a new session.
    async fn open(&self) -> Result<Self::Session>;

    /// Release a session's resources. Clones of the `Arc` still held by
    /// engines become unusable afterwards.
    async fn close(&self, session: Arc<Self::Session>) -> Result<()>;
}

/// One session opened on first use and reused until disposed.
pub struct SharedSession<F: SessionFactory> {
    factory: F,
    slot: Mutex<Option<Arc<F::Session>>>,
}

impl<F: SessionFactory> SharedSession<F> {
    /// Wrap a factory. No session is opened yet.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            slot: Mutex::new(None),
        }
    }

    /// Return the live session, opening one if there is none.
    ///
    /// Concurrent callers wait on each other, so at most one session is
    /// ever opened at a time.
    pub async fn acquire(&self) -> Result<Arc<F::Session>> {
        let mut slot = self.slot.lock().await;
        if let Some(session) = slot.as_ref() {
            return Ok(Arc::clone(session));
        }

        tracing::debug!("Opening shared session");
        let session = Arc::new(self.factory.open().await?);
        *slot = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Close the live session, if any. A later [`acquire`](Self::acquire)
    /// opens a fresh one.
    pub async fn dispose(&self) -> Result<()> {
        let session = self.slot.lock().await.take();
        match session {
            Some(session) => {
                tracing::debug!("Disposing shared session");
                self.factory.close(session).await
            }
            None => Ok(()),
        }
    }

    /// Whether a session is currently open.
    pub async fn is_active(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// The underlying factory.
    pub fn factory(&self) -> &F {
        &self.factory
    }
}
