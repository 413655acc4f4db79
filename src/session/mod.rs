//! Q&A session: upload handling, question flow, transcript
//!
//! Every user action is split into `begin_*` (synchronous state change,
//! returns a pending token), the token's `run` (the only awaited part, owns
//! everything it needs) and `finish_*` (synchronous state change with the
//! outcome). Front ends that keep reading input while a request is pending
//! drive the three steps themselves; everyone else calls [`Session::upload`]
//! or [`Session::ask`].

mod state;
mod transcript;

pub use state::{Controls, Phase, Status, StatusKind};
pub use transcript::{Entry, EntryId, Role, Transcript};

use crate::api::{answer_backend, grounding_prompt, AnswerBackend};
use crate::config::Config;
use crate::error::{Operation, Result};
use crate::extract::{text_extractor, TextExtractor};
use crate::source::{FileContents, SelectedFile};
use std::sync::Arc;

/// Placeholder shown while an answer is pending
pub const SEARCHING: &str = "Searching document...";

/// Status while an upload is processed
pub const PROCESSING: &str = "Processing PDF...";

/// Text extracted from the most recent successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub file_name: String,
    pub text: String,
}

impl LoadedDocument {
    /// Length in characters (Unicode scalar values)
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// An accepted upload whose bytes have not been read yet
pub struct PendingUpload {
    file_name: String,
    contents: FileContents,
    extractor: Arc<dyn TextExtractor>,
}

/// Outcome of [`PendingUpload::run`], consumed by [`Session::finish_upload`]
pub struct CompletedUpload {
    file_name: String,
    result: Result<String>,
}

impl PendingUpload {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Read the file and extract its text
    pub async fn run(self) -> CompletedUpload {
        let extractor = self.extractor;
        let result = match self.contents.read().await {
            Ok(data) => extractor.extract(data).await,
            Err(e) => Err(e),
        };
        CompletedUpload {
            file_name: self.file_name,
            result,
        }
    }
}

/// A submitted question waiting for its answer request
pub struct PendingQuestion {
    placeholder: EntryId,
    prompt: String,
    answerer: Arc<dyn AnswerBackend>,
}

/// Outcome of [`PendingQuestion::run`], consumed by [`Session::finish_question`]
pub struct CompletedQuestion {
    placeholder: EntryId,
    result: Result<String>,
}

impl PendingQuestion {
    /// The grounding prompt that will be sent
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Issue the single answer request
    pub async fn run(self) -> CompletedQuestion {
        let result = self.answerer.generate(&self.prompt).await;
        CompletedQuestion {
            placeholder: self.placeholder,
            result,
        }
    }
}

/// State of one Q&A session
pub struct Session {
    extractor: Arc<dyn TextExtractor>,
    answerer: Arc<dyn AnswerBackend>,
    document: Option<LoadedDocument>,
    phase: Phase,
    status: Option<Status>,
    status_revision: u64,
    file_info: Option<String>,
    /// Info line of the loaded document, restored when a later upload fails
    loaded_file_info: Option<String>,
    transcript: Transcript,
}

impl Session {
    pub fn new(extractor: Arc<dyn TextExtractor>, answerer: Arc<dyn AnswerBackend>) -> Self {
        Self {
            extractor,
            answerer,
            document: None,
            phase: Phase::NoDocument,
            status: None,
            status_revision: 0,
            file_info: None,
            loaded_file_info: None,
            transcript: Transcript::new(),
        }
    }

    /// Session wired to the configured extractor and answer provider
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let client = config.http_client()?;
        Ok(Self::new(
            text_extractor(config, client.clone()),
            answer_backend(config, client),
        ))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Control enablement; asking needs non-empty document text
    pub fn controls(&self) -> Controls {
        let mut controls = self.phase.controls();
        if self.document_text().is_empty() {
            controls.question_input = false;
            controls.ask = false;
        }
        controls
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// Bumped every time a status is set, even to an identical one
    pub fn status_revision(&self) -> u64 {
        self.status_revision
    }

    fn set_status(&mut self, status: Status) {
        self.status = Some(status);
        self.status_revision += 1;
    }

    /// `Selected: <name> (<size>)` for the last accepted file
    pub fn file_info(&self) -> Option<&str> {
        self.file_info.as_deref()
    }

    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    /// Current document text, empty when nothing is loaded
    pub fn document_text(&self) -> &str {
        self.document.as_ref().map_or("", |d| d.text.as_str())
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Validate a selected file and start its upload.
    ///
    /// Returns `None` when the upload control is disabled or the file is
    /// not declared as a PDF; neither changes the loaded document.
    pub fn begin_upload(&mut self, file: SelectedFile) -> Option<PendingUpload> {
        if !self.controls().upload {
            tracing::debug!(file = %file.name, phase = ?self.phase, "upload ignored while busy");
            return None;
        }

        if let Err(e) = file.validate() {
            tracing::warn!(
                error = %e,
                category = ?e.category(Operation::Upload),
                file = %file.name,
                declared = %file.declared_type,
                "upload rejected"
            );
            self.set_status(Status::error(e.to_string()));
            return None;
        }

        self.set_status(Status::loading(PROCESSING));
        self.file_info = Some(file.describe());
        self.phase = Phase::Extracting;

        Some(PendingUpload {
            file_name: file.name,
            contents: file.contents,
            extractor: Arc::clone(&self.extractor),
        })
    }

    /// Apply the outcome of an upload
    pub fn finish_upload(&mut self, done: CompletedUpload) {
        match done.result {
            Ok(text) => {
                let document = LoadedDocument {
                    file_name: done.file_name,
                    text,
                };
                tracing::info!(
                    file = %document.file_name,
                    chars = document.char_count(),
                    "document loaded"
                );

                self.set_status(Status::success(format!(
                    "Successfully loaded {}",
                    document.file_name
                )));
                self.transcript.push(
                    Role::System,
                    format!(
                        "Document loaded: {} ({} characters extracted)",
                        document.file_name,
                        document.char_count()
                    ),
                );
                self.document = Some(document);
                self.loaded_file_info = self.file_info.clone();
                self.phase = Phase::DocumentLoaded;
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    category = ?e.category(Operation::Upload),
                    file = %done.file_name,
                    "PDF processing failed"
                );
                self.set_status(Status::error(format!("Error processing PDF: {}", e)));
                self.file_info = self.loaded_file_info.clone();
                self.phase = self.idle_phase();
            }
        }
    }

    /// Upload a file start to finish; returns whether a document was loaded
    pub async fn upload(&mut self, file: SelectedFile) -> bool {
        let Some(pending) = self.begin_upload(file) else {
            return false;
        };
        let done = pending.run().await;
        let loaded = done.result.is_ok();
        self.finish_upload(done);
        loaded
    }

    /// Submit a question.
    ///
    /// No-op (`None`) for blank questions, when no document text is loaded,
    /// or while another request is in flight.
    pub fn begin_question(&mut self, question: &str) -> Option<PendingQuestion> {
        let question = question.trim();
        if question.is_empty() || !self.controls().ask {
            tracing::debug!(phase = ?self.phase, "question ignored");
            return None;
        }

        let prompt = grounding_prompt(self.document_text(), question);

        self.transcript.push(Role::User, question);
        let placeholder = self.transcript.push(Role::System, SEARCHING);
        self.phase = Phase::AwaitingAnswer;

        tracing::debug!(
            backend = self.answerer.name(),
            prompt_chars = prompt.len(),
            "question submitted"
        );

        Some(PendingQuestion {
            placeholder,
            prompt,
            answerer: Arc::clone(&self.answerer),
        })
    }

    /// Apply the outcome of a question
    pub fn finish_question(&mut self, done: CompletedQuestion) {
        self.transcript.remove_placeholder(done.placeholder);

        match done.result {
            Ok(answer) => {
                tracing::info!(chars = answer.chars().count(), "answer received");
                self.transcript.push(Role::Assistant, answer);
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    category = ?e.category(Operation::Question),
                    "question failed"
                );
                self.transcript.push(Role::System, format!("Error: {}", e));
            }
        }

        self.phase = self.idle_phase();
    }

    /// Ask a question start to finish; returns whether a request was issued
    pub async fn ask(&mut self, question: &str) -> bool {
        let Some(pending) = self.begin_question(question) else {
            return false;
        };
        let done = pending.run().await;
        self.finish_question(done);
        true
    }

    fn idle_phase(&self) -> Phase {
        if self.document.is_some() {
            Phase::DocumentLoaded
        } else {
            Phase::NoDocument
        }
    }
}
