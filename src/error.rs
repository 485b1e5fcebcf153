use std::{error::Error, fmt, io};

/// The crate's result type.
pub type Result<T> = std::result::Result<T, SpecError>;

/// All errors that can occur while loading a model specification.
#[derive(Debug)]
pub enum SpecError {
    /// The source is not a syntactically valid JSON object. `position` is the
    /// 1-based `(line, column)` of the syntax error, when there is one.
    MalformedInput {
        position: Option<(usize, usize)>,
        msg: String,
    },
    /// The record parsed but a field is missing or out of range.
    SchemaValidation { field: String, reason: String },
    /// The source could not be read.
    Io(io::Error),
}

impl SpecError {
    pub(crate) fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(field: &str) -> Self {
        Self::schema(field, "required field is missing")
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput {
            position: None,
            msg: msg.into(),
        }
    }

    /// Returns the name of the offending field for schema errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::SchemaValidation { field, .. } => Some(field),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedInput { .. })
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, Self::SchemaValidation { .. })
    }
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedInput {
                position: Some((line, column)),
                msg,
            } => write!(f, "malformed input at line {line}, column {column}: {msg}"),
            Self::MalformedInput {
                position: None,
                msg,
            } => write!(f, "malformed input: {msg}"),
            Self::SchemaValidation { field, reason } => {
                write!(f, "invalid field `{field}`: {reason}")
            }
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for SpecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SpecError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SpecError {
    fn from(value: serde_json::Error) -> Self {
        use serde_json::error::Category;

        match value.classify() {
            Category::Io => Self::Io(value.into()),
            Category::Syntax | Category::Eof | Category::Data => {
                let (line, column) = (value.line(), value.column());
                let full = value.to_string();
                let suffix = format!(" at line {line} column {column}");
                let msg = full.strip_suffix(&suffix).unwrap_or(&full).to_string();

                Self::MalformedInput {
                    position: (line > 0).then_some((line, column)),
                    msg,
                }
            }
        }
    }
}
