//! Error types for score loading and drawing.

/// Errors raised while turning a score document into notation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    /// A note string did not match `[A-Ga-g][#b]?[0-9]`.
    #[error("invalid pitch spelling: '{0}'")]
    InvalidPitchSpelling(String),
    /// Unknown duration code in a note entry.
    #[error("invalid duration code: '{0}'")]
    InvalidDuration(String),
    /// More dots than a note entry may carry.
    #[error("too many dots: {dots} (at most 2)")]
    TooManyDots { dots: u32 },
    /// The document is missing required fields or is not valid JSON.
    #[error("malformed score document: {0}")]
    MalformedScoreDocument(String),
    /// MIDI note outside the notated range 21..=108.
    #[error("unsupported MIDI note: {0}")]
    UnsupportedMidiNote(u8),
}

/// Errors raised by a [`Renderer`](crate::renderer::Renderer) backend.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// No drawing surface is attached.
    #[error("renderer unavailable")]
    RendererUnavailable,
    #[error("renderer backend error: {0}")]
    Backend(String),
}

/// Errors surfaced by the [`Engine`](crate::engine::Engine).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Render(#[from] RenderError),
    /// An event channel message that could not be decoded.
    #[error("{0}")]
    InvalidMessage(String),
}
