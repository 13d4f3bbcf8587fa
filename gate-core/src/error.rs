/// Errors produced by the `gate-core` crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// A gate identifier was not one of the configured gates.
    #[error("unknown gate id '{raw}'")]
    UnknownGate { raw: String },
}
