use xxhash_rust::xxh3::xxh3_64;

/// A check on the text an edit is about to replace.
///
/// Batch files state it either as the literal text or, for spans too large
/// to inline, as the xxh3 digest of that text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditVerification {
    ExactMatch(String),
    Hash(u64),
}

impl EditVerification {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            EditVerification::ExactMatch(expected) => text == expected,
            EditVerification::Hash(digest) => Self::digest(text) == *digest,
        }
    }

    /// The xxh3 digest a batch file would give for `text`.
    pub fn digest(text: &str) -> u64 {
        xxh3_64(text.as_bytes())
    }

    pub fn describe(&self) -> String {
        match self {
            EditVerification::ExactMatch(text) => format!("{text:?}"),
            EditVerification::Hash(digest) => format!("text with xxh3 {digest:#018x}"),
        }
    }
}
