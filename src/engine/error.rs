#[derive(Debug)]
pub enum EngineError {
    /// Unknown accommodation, reservation, or principal id.
    NotFound(String),
    /// The requested window collides with this active reservation.
    Conflict(String),
    /// No session, or a session without the required rights.
    Unauthorized(&'static str),
    /// A precondition on the request itself failed.
    Validation(&'static str),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NotFound(id) => write!(f, "not found: {id}"),
            EngineError::Conflict(code) => {
                write!(f, "dates collide with active reservation {code}")
            }
            EngineError::Unauthorized(msg) => write!(f, "not authorized: {msg}"),
            EngineError::Validation(msg) => write!(f, "invalid request: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
