use thiserror::Error;

/// Failure of the external generation function. A single attempt is made per
/// call; the normalizer recovers from every variant with a fallback map, so
/// these never reach the user as hard errors.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("generation service unavailable: {0}")]
    Unavailable(String),
    #[error("generation returned an empty response")]
    EmptyResponse,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("node id {0:?} appears more than once in the concept tree")]
    DuplicateNodeId(String),
}

/// Why a normalization produced the deterministic fallback map instead of a
/// generated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    GenerationFailed,
    NoJsonPayload,
    MalformedPayload,
    EmptyPayload,
    DuplicateNodeIds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapOrigin {
    Generated,
    Fallback(FallbackReason),
}

impl MapOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, MapOrigin::Fallback(_))
    }
}
