//! Contract with the external text-generation service.
//!
//! Panels hand their compose-box text and a persona to a `GenerationService`
//! and expect a short list of alternative texts back. The core never does I/O
//! itself; clients live with the host. Requests are tagged with a `Ticket` so
//! a reply that arrives after the user moved on can be recognised and dropped.

use thiserror::Error;

use crate::Panel;

/// One generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Panel that asked; decides which generator endpoint applies.
    pub panel: Panel,
    /// Text from the panel's compose box, NFC-normalised and trimmed.
    pub text: String,
    /// Persona id for help-reply, identity id for super-talk.
    pub persona: String,
    /// Number of alternatives wanted.
    pub count: usize,
}

/// Why a generation call produced nothing.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("service returned status {0}")]
    Status(u16),
    #[error("failed to decode service response: {0}")]
    Decode(String),
    #[error("generation service unavailable")]
    Unavailable,
}

/// Produces alternative texts for a request.
pub trait GenerationService {
    fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, GenerationError>;
}

impl<F> GenerationService for F
where
    F: Fn(&GenerationRequest) -> Result<Vec<String>, GenerationError>,
{
    fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, GenerationError> {
        self(request)
    }
}

/// Identifies one in-flight generation request.
///
/// Only the most recent ticket issued within the current panel visit is
/// accepted on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    panel: Panel,
    epoch: u64,
    seq: u64,
}

impl Ticket {
    pub(crate) fn new(panel: Panel, epoch: u64, seq: u64) -> Self {
        Self { panel, epoch, seq }
    }

    /// Panel that issued the request.
    pub fn panel(&self) -> Panel {
        self.panel
    }
}
