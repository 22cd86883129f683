//! Error families shared across the calibration crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code, message and key/value context carried by every [`EgravError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Short stable code such as `undefined` or `empty-bound`.
    pub code: String,
    /// What went wrong.
    pub message: String,
    /// Formula step, parameter name or offending value.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// How the caller can avoid the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload with no context.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records one context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Attaches a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        let context: Vec<String> = self
            .context
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        if !context.is_empty() {
            write!(f, " ({})", context.join(", "))?;
        }
        match &self.hint {
            Some(hint) => write!(f, "; hint: {hint}"),
            None => Ok(()),
        }
    }
}

/// Every failure the calibration crates can report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum EgravError {
    /// A formula step is undefined for the supplied inputs.
    #[error("domain error {0}")]
    Domain(ErrorInfo),
    /// Invalid bounds, initial guess or solver options.
    #[error("config error {0}")]
    Config(ErrorInfo),
    /// Canonical JSON or hashing failed.
    #[error("serde error {0}")]
    Serde(ErrorInfo),
}

impl EgravError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            EgravError::Domain(info) | EgravError::Config(info) | EgravError::Serde(info) => info,
        }
    }

    /// Builds a domain error tied to the named formula step.
    pub fn domain(step: &str, message: impl Into<String>) -> Self {
        EgravError::Domain(ErrorInfo::new("undefined", message).with_context("step", step))
    }

    /// Builds a configuration error naming the offending parameter.
    pub fn config(code: &str, param: &str, message: impl Into<String>) -> Self {
        EgravError::Config(ErrorInfo::new(code, message).with_context("param", param))
    }

    /// Returns the formula step recorded on a domain error.
    pub fn step(&self) -> Option<&str> {
        match self {
            EgravError::Domain(info) => info.context.get("step").map(String::as_str),
            _ => None,
        }
    }

    /// Returns whether the error marks an undefined formula step.
    pub fn is_domain(&self) -> bool {
        matches!(self, EgravError::Domain(_))
    }
}
