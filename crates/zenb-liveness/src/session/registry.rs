//! Handle-based access to many independent streaming sessions.

use std::collections::HashMap;
use thiserror::Error;

use crate::config::{ConfigError, LivenessConfig};
use crate::types::{ColorSample, ScanResult, SessionId};

use super::streaming::StreamingSession;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Unknown session: {0}")]
    UnknownSession(SessionId),
}

/// Owns streaming sessions keyed by opaque [`SessionId`]s.
///
/// Sessions never share state; interleaving pushes across handles gives the
/// same results as feeding each session alone.
pub struct SessionRegistry {
    config: LivenessConfig,
    sessions: HashMap<SessionId, StreamingSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            config: LivenessConfig::default(),
            sessions: HashMap::new(),
        }
    }

    pub fn with_config(config: LivenessConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            sessions: HashMap::new(),
        })
    }

    pub fn start_session(&mut self) -> SessionId {
        let id = SessionId::new();
        self.sessions
            .insert(id, StreamingSession::build(id, &self.config));
        id
    }

    pub fn push(&mut self, id: SessionId, sample: ColorSample) -> Result<ScanResult, SessionError> {
        self.session_mut(id).map(|s| s.push(sample))
    }

    pub fn reset(&mut self, id: SessionId) -> Result<(), SessionError> {
        self.session_mut(id).map(StreamingSession::reset)
    }

    /// Drop a session and all of its state, returning its last result.
    pub fn end_session(&mut self, id: SessionId) -> Result<ScanResult, SessionError> {
        let session = self
            .sessions
            .remove(&id)
            .ok_or(SessionError::UnknownSession(id))?;
        log::info!(
            "Liveness session {} ended after {} samples ({})",
            id,
            session.samples_seen(),
            session.last_result().status
        );
        Ok(*session.last_result())
    }

    pub fn get(&self, id: SessionId) -> Option<&StreamingSession> {
        self.sessions.get(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn session_mut(&mut self, id: SessionId) -> Result<&mut StreamingSession, SessionError> {
        self.sessions
            .get_mut(&id)
            .ok_or(SessionError::UnknownSession(id))
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
