//! Session identity supplied by the authentication collaborator.
//!
//! # Responsibility
//! - Provide the opaque user identity that scopes saved concepts.
//! - Fall back to an anonymous identity when no pre-issued one is usable.
//!
//! # Invariants
//! - A `SessionId` is never empty.
//! - The controller runs without a session until one is established.

use async_trait::async_trait;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque user/session identifier scoping persisted concepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps a non-empty identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, SessionError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptyIdentity);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Fresh random anonymous identity.
    pub fn anonymous() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authentication failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    EmptyIdentity,
    SignInFailed(String),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyIdentity => write!(f, "session identity cannot be empty"),
            Self::SignInFailed(message) => write!(f, "sign-in failed: {message}"),
        }
    }
}

impl Error for SessionError {}

/// External collaborator establishing the session identity.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn establish(&self) -> Result<SessionId, SessionError>;
}

/// Signs in with a fresh anonymous identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousSession;

#[async_trait]
impl SessionProvider for AnonymousSession {
    async fn establish(&self) -> Result<SessionId, SessionError> {
        let id = SessionId::anonymous();
        info!("event=session_establish module=session status=ok mode=anonymous");
        Ok(id)
    }
}

/// Uses a pre-issued identity when present, anonymous sign-in otherwise.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredSession {
    user_id: Option<String>,
}

impl ConfiguredSession {
    pub fn new(user_id: Option<String>) -> Self {
        Self { user_id }
    }
}

#[async_trait]
impl SessionProvider for ConfiguredSession {
    async fn establish(&self) -> Result<SessionId, SessionError> {
        match self.user_id.as_deref().map(SessionId::new) {
            Some(Ok(id)) => {
                info!("event=session_establish module=session status=ok mode=configured");
                Ok(id)
            }
            Some(Err(err)) => {
                warn!(
                    "event=session_establish module=session status=fallback mode=configured error={err}"
                );
                AnonymousSession.establish().await
            }
            None => AnonymousSession.establish().await,
        }
    }
}
