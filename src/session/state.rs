//! Session phase, control enablement and status banner

/// Where the session is in its upload/question cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing loaded yet
    NoDocument,
    /// An upload is being read and extracted
    Extracting,
    /// A document is loaded and no request is in flight
    DocumentLoaded,
    /// A question is waiting for its answer
    AwaitingAnswer,
}

/// Which input controls accept interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub upload: bool,
    pub question_input: bool,
    pub ask: bool,
}

impl Phase {
    /// Map the phase to control enablement
    pub fn controls(self) -> Controls {
        match self {
            Phase::NoDocument => Controls {
                upload: true,
                question_input: false,
                ask: false,
            },
            Phase::DocumentLoaded => Controls {
                upload: true,
                question_input: true,
                ask: true,
            },
            Phase::Extracting | Phase::AwaitingAnswer => Controls {
                upload: false,
                question_input: false,
                ask: false,
            },
        }
    }

    /// A request is outstanding
    pub fn is_busy(self) -> bool {
        matches!(self, Phase::Extracting | Phase::AwaitingAnswer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Loading,
    Success,
    Error,
}

/// Transient banner shown above the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn loading(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Loading,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }
}
