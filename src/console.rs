//! Terminal front end
//!
//! Renders the session as a status banner plus a scrolling transcript and
//! reads one line at a time. Lines typed while a request is in flight are
//! rejected, the same way the page disables its controls.

use crate::session::{EntryId, Role, Session, StatusKind};
use crate::source::SelectedFile;
use std::collections::HashSet;
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

const HELP: &str = "\
Commands:
  /upload <path>   load a PDF (alias: /open)
  /transcript      show the whole conversation
  /help            show this help
  /quit            leave (alias: /exit)
Anything else is asked as a question about the loaded document.";

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Upload(PathBuf),
    Transcript,
    Help,
    Quit,
    Question(String),
    Empty,
    Unknown(String),
}

/// Interpret a line of input
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }

    let Some(rest) = line.strip_prefix('/') else {
        return Command::Question(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "upload" | "open" if !arg.is_empty() => Command::Upload(PathBuf::from(arg)),
        "transcript" => Command::Transcript,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

fn status_tag(kind: StatusKind) -> &'static str {
    match kind {
        StatusKind::Loading => "[loading]",
        StatusKind::Success => "[ok]",
        StatusKind::Error => "[error]",
    }
}

fn role_prefix(role: Role) -> &'static str {
    match role {
        Role::User => "you>",
        Role::Assistant => "assistant>",
        Role::System => "system>",
    }
}

/// Drives a [`Session`] from line input
pub struct Console<W: Write> {
    session: Session,
    out: W,
    shown_status_revision: u64,
    shown_file_info: Option<String>,
    shown_entries: HashSet<EntryId>,
}

impl<W: Write> Console<W> {
    pub fn new(session: Session, out: W) -> Self {
        Self {
            session,
            out,
            shown_status_revision: 0,
            shown_file_info: None,
            shown_entries: HashSet::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_parts(self) -> (Session, W) {
        (self.session, self.out)
    }

    /// Upload a file before the input loop starts
    pub async fn preload(&mut self, path: PathBuf) -> std::io::Result<()> {
        self.session.upload(SelectedFile::from_path(path)).await;
        self.render()
    }

    /// Read commands until `/quit` or end of input
    pub async fn run<R>(&mut self, input: R) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        writeln!(self.out, "{}", HELP)?;
        self.prompt()?;

        while let Some(line) = lines.next_line().await? {
            match parse_command(&line) {
                Command::Quit => break,
                Command::Empty => {}
                Command::Help => writeln!(self.out, "{}", HELP)?,
                Command::Unknown(cmd) => {
                    writeln!(self.out, "Unknown command: {} (try /help)", cmd)?
                }
                Command::Transcript => self.print_transcript()?,
                Command::Upload(path) => {
                    if let Some(pending) = self.session.begin_upload(SelectedFile::from_path(path))
                    {
                        self.render()?;
                        let done = self.wait(pending.run(), &mut lines).await?;
                        self.session.finish_upload(done);
                    }
                    self.render()?;
                }
                Command::Question(question) => {
                    if let Some(pending) = self.session.begin_question(&question) {
                        self.render()?;
                        let done = self.wait(pending.run(), &mut lines).await?;
                        self.session.finish_question(done);
                        self.render()?;
                    } else if self.session.document().is_some() {
                        writeln!(self.out, "The loaded document has no text to search.")?;
                    } else {
                        writeln!(self.out, "Upload a PDF first: /upload <path>")?;
                    }
                }
            }
            self.prompt()?;
        }

        self.out.flush()
    }

    /// Await a pending operation while turning away any input
    async fn wait<F, R>(&mut self, fut: F, lines: &mut Lines<R>) -> std::io::Result<F::Output>
    where
        F: Future,
        R: AsyncBufRead + Unpin,
    {
        tokio::pin!(fut);
        loop {
            tokio::select! {
                done = &mut fut => return Ok(done),
                line = lines.next_line() => match line? {
                    Some(_) => {
                        writeln!(self.out, "(busy: wait for the current request to finish)")?;
                        self.out.flush()?;
                    }
                    // Input closed; still let the request complete
                    None => return Ok(fut.await),
                },
            }
        }
    }

    /// Print whatever changed since the last render
    fn render(&mut self) -> std::io::Result<()> {
        if let Some(info) = self.session.file_info() {
            if self.shown_file_info.as_deref() != Some(info) {
                writeln!(self.out, "{}", info)?;
                self.shown_file_info = Some(info.to_string());
            }
        }

        let revision = self.session.status_revision();
        if revision != self.shown_status_revision {
            if let Some(status) = self.session.status() {
                writeln!(self.out, "{} {}", status_tag(status.kind), status.message)?;
            }
            self.shown_status_revision = revision;
        }

        for entry in self.session.transcript().entries() {
            if self.shown_entries.insert(entry.id) {
                writeln!(self.out, "{} {}", role_prefix(entry.role), entry.text)?;
            }
        }

        self.out.flush()
    }

    fn print_transcript(&mut self) -> std::io::Result<()> {
        for entry in self.session.transcript().entries() {
            writeln!(
                self.out,
                "{} {} {}",
                entry.at.format("%H:%M:%S"),
                role_prefix(entry.role),
                entry.text
            )?;
        }
        Ok(())
    }

    fn prompt(&mut self) -> std::io::Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()
    }
}
