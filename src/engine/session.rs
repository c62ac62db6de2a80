use tracing::info;

use crate::model::{Guest, Host};
use crate::observability;

use super::{Engine, EngineError};

/// The authenticated principal, at most one at a time. Holds the principal's
/// id, never a reference into a store; the record is looked up on demand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    None,
    Host(String),
    Guest(String),
}

impl Engine {
    /// Resolve the host by id and compare credentials as opaque strings,
    /// exact equality. No hashing, no lockout.
    pub fn login_host(&mut self, id: &str, credential: &str) -> Result<(), EngineError> {
        let Some(host) = self.hosts.find(|h| h.id == id) else {
            metrics::counter!(observability::LOGIN_FAILURES_TOTAL).increment(1);
            return Err(EngineError::NotFound(id.to_string()));
        };
        if host.credential != credential {
            metrics::counter!(observability::LOGIN_FAILURES_TOTAL).increment(1);
            return Err(EngineError::Unauthorized("wrong credential"));
        }
        self.session = Session::Host(host.id.clone());
        info!(id, "host session started");
        Ok(())
    }

    pub fn login_guest(&mut self, id: &str, credential: &str) -> Result<(), EngineError> {
        let Some(guest) = self.guests.find(|g| g.id == id) else {
            metrics::counter!(observability::LOGIN_FAILURES_TOTAL).increment(1);
            return Err(EngineError::NotFound(id.to_string()));
        };
        if guest.credential != credential {
            metrics::counter!(observability::LOGIN_FAILURES_TOTAL).increment(1);
            return Err(EngineError::Unauthorized("wrong credential"));
        }
        self.session = Session::Guest(guest.id.clone());
        info!(id, "guest session started");
        Ok(())
    }

    /// Clears any session unconditionally.
    pub fn logout(&mut self) {
        self.session = Session::None;
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(super) fn current_guest(&self) -> Result<&Guest, EngineError> {
        match &self.session {
            Session::Guest(id) => self
                .guests
                .find(|g| g.id == *id)
                .ok_or(EngineError::Unauthorized("a guest must be logged in")),
            _ => Err(EngineError::Unauthorized("a guest must be logged in")),
        }
    }

    pub(super) fn current_host(&self) -> Result<&Host, EngineError> {
        match &self.session {
            Session::Host(id) => self
                .hosts
                .find(|h| h.id == *id)
                .ok_or(EngineError::Unauthorized("a host must be logged in")),
            _ => Err(EngineError::Unauthorized("a host must be logged in")),
        }
    }
}
