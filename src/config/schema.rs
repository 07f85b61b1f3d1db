use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// A batch of edits described in TOML.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct BatchConfig {
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub edits: Vec<EditDefinition>,
}

impl BatchConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.edits.is_empty() {
            issues.push(ValidationIssue::EmptyEditList);
        }

        if let Some(language) = &self.meta.language {
            if language.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    edit: None,
                    field: "meta.language",
                });
            }
        }

        for (index, edit) in self.edits.iter().enumerate() {
            let label = edit.label(index);
            let (start, end) = edit.span.bounds();
            if start > end {
                issues.push(ValidationIssue::InvalidSpan {
                    edit: label,
                    message: format!("span start {start} is after its end {end}"),
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Metadata {
    /// Grammar name, e.g. `"lua"`. The CLI flag takes precedence.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EditDefinition {
    #[serde(default)]
    pub id: Option<String>,
    pub span: Span,
    pub replacement: String,
    /// Text the span must currently hold.
    #[serde(default)]
    pub expected: Option<String>,
    /// xxh3 digest of the text the span must currently hold, as a hex
    /// string (`"0x..."` or bare digits).
    #[serde(default, deserialize_with = "deserialize_digest")]
    pub expected_xxh3: Option<u64>,
}

fn deserialize_digest<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(&text);
    u64::from_str_radix(digits, 16)
        .map(Some)
        .map_err(|err| D::Error::custom(format!("invalid xxh3 digest {text:?}: {err}")))
}

impl EditDefinition {
    /// Name used in diagnostics: the id if set, else the position in the file.
    pub fn label(&self, index: usize) -> String {
        match &self.id {
            Some(id) => format!("'{id}'"),
            None => format!("#{index}"),
        }
    }
}

/// Where an edit applies.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Span {
    /// Absolute byte offsets `[start, end)`.
    Bytes { start: usize, end: usize },
    /// Byte columns `[start, end)` on one zero-based row.
    Columns { row: usize, start: usize, end: usize },
}

impl Span {
    fn bounds(&self) -> (usize, usize) {
        match *self {
            Span::Bytes { start, end } | Span::Columns { start, end, .. } => (start, end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Span::Bytes { start, end } => write!(f, "bytes {start}..{end}"),
            Span::Columns { row, start, end } => write!(f, "row {row} columns {start}..{end}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    EmptyEditList,
    MissingField {
        edit: Option<String>,
        field: &'static str,
    },
    InvalidSpan {
        edit: String,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyEditList => write!(f, "batch contains no edits"),
            ValidationIssue::MissingField { edit, field } => match edit {
                Some(edit) => write!(f, "edit {edit} missing required field '{field}'"),
                None => write!(f, "batch missing required field '{field}'"),
            },
            ValidationIssue::InvalidSpan { edit, message } => {
                write!(f, "edit {edit} has an invalid span: {message}")
            }
        }
    }
}
