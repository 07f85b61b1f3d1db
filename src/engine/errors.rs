use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to set language for parser (grammar ABI {abi_version})")]
    LanguageSet { abi_version: usize },

    #[error("failed to parse source code")]
    ParseFailed,

    #[error("unknown language: {name}")]
    UnknownLanguage { name: String },
}
