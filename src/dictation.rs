//! Voice input for the search box
//!
//! A recognizer is any external command that listens on the microphone and
//! prints what it heard on stdout. The first non-empty line is taken as the
//! search text.

use crate::core::traits::Dictation;
use crate::utils::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::process::{Child, Command, Stdio};
use tracing::{debug, warn};

/// Interface languages the board is offered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Te,
    Hi,
}

impl Language {
    /// BCP 47 tag handed to the recognizer
    pub fn locale_tag(&self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::Te => "te-IN",
            Language::Hi => "hi-IN",
        }
    }
}

enum Source {
    Ready(String),
    Listening(Child),
    Done,
}

/// Single-shot, lazily produced recognition result
///
/// Yields at most one string. For a running recognizer the result is only
/// awaited on the first call to `next`; `cancel` stops it instead.
pub struct Transcript {
    source: Source,
}

impl Transcript {
    pub fn ready(text: impl Into<String>) -> Self {
        Self {
            source: Source::Ready(text.into()),
        }
    }

    pub fn empty() -> Self {
        Self { source: Source::Done }
    }

    fn listening(child: Child) -> Self {
        Self {
            source: Source::Listening(child),
        }
    }

    /// Stop listening; nothing will be yielded afterwards
    pub fn cancel(&mut self) {
        if let Source::Listening(mut child) = std::mem::replace(&mut self.source, Source::Done) {
            if let Err(e) = child.kill() {
                debug!(error = %e, "Recognizer already exited");
            }
            if let Err(e) = child.wait() {
                debug!(error = %e, "Failed to reap recognizer");
            }
        }
    }
}

impl Iterator for Transcript {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.source, Source::Done) {
            Source::Ready(text) => Some(text),
            Source::Listening(child) => read_first_line(child),
            Source::Done => None,
        }
    }
}

impl Drop for Transcript {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn read_first_line(mut child: Child) -> Option<String> {
    let mut output = String::new();
    if let Some(mut stdout) = child.stdout.take()
        && let Err(e) = stdout.read_to_string(&mut output)
    {
        warn!(error = %e, "Failed to read recognizer output");
    }

    match child.wait() {
        Ok(status) if !status.success() => {
            // Recognizers exit non-zero when the user gives up
            debug!(?status, "Recognizer exited without a result");
            return None;
        }
        Err(e) => {
            warn!(error = %e, "Failed to wait for recognizer");
            return None;
        }
        Ok(_) => {}
    }

    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// Used when no recognizer is configured
pub struct UnsupportedDictation;

impl Dictation for UnsupportedDictation {
    fn start_dictation(&self, _language: Language) -> AppResult<Transcript> {
        Err(AppError::Unsupported(
            "Voice input is not configured. Set general.dictation_cmd in the config file"
                .to_string(),
        ))
    }
}

/// Runs an external speech recognizer
pub struct CommandDictation {
    command: String,
}

impl CommandDictation {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Dictation for CommandDictation {
    fn start_dictation(&self, language: Language) -> AppResult<Transcript> {
        let parts: Vec<&str> = self.command.split_whitespace().collect();
        let Some((program, args)) = parts.split_first() else {
            return Err(AppError::Unsupported(format!(
                "Invalid dictation command: {:?}",
                self.command
            )));
        };

        let child = Command::new(program)
            .args(args)
            .arg(language.locale_tag())
            .env("CHALOBUS_DICTATION_LOCALE", language.locale_tag())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                AppError::Unsupported(format!("Voice recognizer '{}' unavailable: {}", program, e))
            })?;

        debug!(program, locale = language.locale_tag(), "Started recognizer");
        Ok(Transcript::listening(child))
    }
}

/// Replays a fixed phrase; handy for demos and tests
pub struct ScriptedDictation {
    phrase: Option<String>,
}

impl ScriptedDictation {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            phrase: Some(phrase.into()),
        }
    }

    /// Recognizer that hears nothing
    pub fn silent() -> Self {
        Self { phrase: None }
    }
}

impl Dictation for ScriptedDictation {
    fn start_dictation(&self, _language: Language) -> AppResult<Transcript> {
        Ok(match &self.phrase {
            Some(phrase) => Transcript::ready(phrase.clone()),
            None => Transcript::empty(),
        })
    }
}

/// Pick the recognizer for the configured command, if any
pub fn from_command(command: Option<&str>) -> Box<dyn Dictation> {
    match command {
        Some(cmd) if !cmd.trim().is_empty() => Box::new(CommandDictation::new(cmd)),
        _ => Box::new(UnsupportedDictation),
    }
}
