use std::fmt;
use std::process::ExitCode;

use anyhow::Error;
use serde::Serialize;
use serde_json::Value;

pub const INVALID_LETTER: &str = "INVALID_LETTER";
pub const INVALID_COLOR: &str = "INVALID_COLOR";
pub const INVALID_FONT_HASH: &str = "INVALID_FONT_HASH";
pub const FONT_NOT_FOUND: &str = "FONT_NOT_FOUND";
pub const FONT_UNREADABLE: &str = "FONT_UNREADABLE";
pub const FONT_HASH_MISMATCH: &str = "FONT_HASH_MISMATCH";
pub const MANIFEST_WRITE_FAILED: &str = "MANIFEST_WRITE_FAILED";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodedErrorKind {
    /// Bad command-line input: letters, colours, hashes.
    Usage,
    /// The font could not be located, read or trusted.
    Resource,
    /// Output could not be written.
    Io,
}

impl CodedErrorKind {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Usage => ExitCode::from(2),
            Self::Resource => ExitCode::from(3),
            Self::Io => ExitCode::FAILURE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CodedError {
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
    pub kind: CodedErrorKind,
}

impl CodedError {
    pub fn usage(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(code, message, CodedErrorKind::Usage)
    }

    pub fn resource(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(code, message, CodedErrorKind::Resource)
    }

    pub fn io(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(code, message, CodedErrorKind::Io)
    }

    fn new(code: &'static str, message: impl Into<String>, kind: CodedErrorKind) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            kind,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            ok: false,
            error: ErrorEnvelopeBody {
                code: self.code.to_owned(),
                message: self.message.clone(),
                details: self.details.clone(),
            },
        }
    }
}

impl fmt::Display for CodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CodedError {}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub ok: bool,
    pub error: ErrorEnvelopeBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelopeBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

pub fn find_coded_error(error: &Error) -> Option<&CodedError> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<CodedError>())
}

/// Exit status for a fatal run error. Uncoded errors map to 1.
pub fn exit_code_for(error: &Error) -> ExitCode {
    find_coded_error(error).map_or(ExitCode::FAILURE, |coded| coded.kind.exit_code())
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Context};
    use serde_json::json;

    use super::{find_coded_error, CodedError, CodedErrorKind, INVALID_COLOR};

    #[test]
    fn coded_error_is_found_through_context_layers() {
        let error = Err::<(), _>(anyhow!(CodedError::usage(INVALID_COLOR, "bad colour")))
            .context("while parsing --text_color")
            .unwrap_err();

        let coded = find_coded_error(&error).expect("coded error should be in the chain");
        assert_eq!(coded.code, INVALID_COLOR);
        assert_eq!(coded.kind, CodedErrorKind::Usage);
    }

    #[test]
    fn envelope_serializes_details_only_when_present() {
        let bare = CodedError::io("MANIFEST_WRITE_FAILED", "disk full");
        let value = serde_json::to_value(bare.envelope()).unwrap();
        assert_eq!(value["ok"], json!(false));
        assert!(value["error"].get("details").is_none());

        let detailed = bare.with_details(json!({ "path": "out.json" }));
        let value = serde_json::to_value(detailed.envelope()).unwrap();
        assert_eq!(value["error"]["details"]["path"], json!("out.json"));
    }
}
