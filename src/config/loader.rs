use crate::config::schema::{BatchConfig, ValidationError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            ConfigError::Io { .. } => self,
            ConfigError::Toml { path: None, source } => ConfigError::Toml {
                path: Some(path),
                source,
            },
            ConfigError::Validation { path: None, source } => ConfigError::Validation {
                path: Some(path),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read batch file {}: {}", path.display(), source)
            }
            ConfigError::Toml { path, source } => match path {
                Some(path) => write!(
                    f,
                    "failed to parse batch file TOML ({}): {}",
                    path.display(),
                    source
                ),
                None => write!(f, "failed to parse batch file TOML: {}", source),
            },
            ConfigError::Validation { path, source } => match path {
                Some(path) => write!(f, "invalid batch file ({}): {}", path.display(), source),
                None => write!(f, "invalid batch file: {}", source),
            },
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml { source, .. } => Some(source),
            ConfigError::Validation { source, .. } => Some(source),
        }
    }
}

pub fn load_from_str(input: &str) -> Result<BatchConfig, ConfigError> {
    let config: BatchConfig = toml_edit::de::from_str(input)
        .map_err(|source| ConfigError::Toml { path: None, source })?;
    config
        .validate()
        .map_err(|source| ConfigError::Validation { path: None, source })?;
    Ok(config)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<BatchConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("loaded batch file {}", path.display());
    load_from_str(&contents).map_err(|error| error.with_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{Span, ValidationIssue};

    #[test]
    fn loads_both_span_kinds() {
        let config = load_from_str(
            r#"
[meta]
language = "lua"

[[edits]]
id = "one"
replacement = "15"
expected = "1"
span = { type = "bytes", start = 10, end = 11 }

[[edits]]
replacement = "7"
span = { type = "columns", row = 1, start = 10, end = 11 }
"#,
        )
        .unwrap();

        assert_eq!(config.meta.language.as_deref(), Some("lua"));
        assert_eq!(config.edits.len(), 2);
        assert_eq!(config.edits[0].span, Span::Bytes { start: 10, end: 11 });
        assert_eq!(config.edits[0].expected.as_deref(), Some("1"));
        assert_eq!(
            config.edits[1].span,
            Span::Columns {
                row: 1,
                start: 10,
                end: 11
            }
        );
    }

    #[test]
    fn rejects_empty_batch() {
        let err = load_from_str("[meta]\nlanguage = \"lua\"\n").unwrap_err();
        match err {
            ConfigError::Validation { source, .. } => {
                assert!(matches!(source.issues[0], ValidationIssue::EmptyEditList));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_inverted_span() {
        let err = load_from_str(
            r#"
[[edits]]
id = "backwards"
replacement = "x"
span = { type = "bytes", start = 5, end = 2 }
"#,
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'backwards'"), "{message}");
    }

    #[test]
    fn rejects_unknown_span_type() {
        let err = load_from_str(
            r#"
[[edits]]
replacement = "x"
span = { type = "lines", start = 0, end = 1 }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }

    #[test]
    fn rejects_malformed_digest() {
        let err = load_from_str(
            r#"
[[edits]]
replacement = "x"
expected_xxh3 = "0xnothex"
span = { type = "bytes", start = 0, end = 1 }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
        assert!(err.to_string().contains("invalid xxh3 digest"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_from_path("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
