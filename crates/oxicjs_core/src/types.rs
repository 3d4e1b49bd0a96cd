use serde::Serialize;

/// Outcome of resolving one import request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedId {
    pub id: String,
    /// True when the request is left to the host environment (for example a
    /// Node.js builtin) instead of being bundled.
    pub external: bool,
}

impl ResolvedId {
    pub fn internal(id: impl Into<String>) -> Self {
        Self { id: id.into(), external: false }
    }

    pub fn external(id: impl Into<String>) -> Self {
        Self { id: id.into(), external: true }
    }
}
