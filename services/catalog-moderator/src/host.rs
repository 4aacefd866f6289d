//! Operator identity supplied by the embedding host

/// Operator id the host reports for users it could not identify
pub const GUEST_OPERATOR: &str = "guest";

/// Read-only host context, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
    operator_id: Option<String>,
    embedded: bool,
}

impl HostContext {
    pub fn new(operator_id: Option<String>, embedded: bool) -> Self {
        let operator_id = operator_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        Self {
            operator_id,
            embedded,
        }
    }

    pub fn operator_id(&self) -> Option<&str> {
        self.operator_id.as_deref()
    }

    pub fn embedded(&self) -> bool {
        self.embedded
    }

    /// Whether the backend may be queried at all.
    ///
    /// Requires an embedded session with a known, non-guest operator.
    pub fn can_fetch(&self) -> bool {
        self.embedded && matches!(self.operator_id(), Some(id) if id != GUEST_OPERATOR)
    }
}
