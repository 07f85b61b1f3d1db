//! Per-grammar metadata registry.
//!
//! A [`Grammar`] owns one loaded tree-sitter language together with a lazily
//! built table mapping node kind and field names to their numeric ids. The
//! table lives on the grammar value, so any number of grammars can be loaded
//! side by side without shared global state.

use crate::engine::EngineError;
use ast_grep_language::{LanguageExt, SupportLang};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tree_sitter::Language;

/// Numeric id of a node kind.
pub type KindId = u16;

/// Numeric id of a field.
pub type FieldId = u16;

/// How a node kind appears in trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Named,
    Anonymous,
    /// Never returned in trees (supertypes, internal rules).
    Hidden,
}

#[derive(Debug, Clone, Default)]
struct SymbolTable {
    kinds: Vec<(&'static str, TypeKind)>,
    named_ids: HashMap<&'static str, KindId>,
    anonymous_ids: HashMap<&'static str, KindId>,
    field_names: Vec<Option<&'static str>>,
    field_ids: HashMap<&'static str, FieldId>,
}

impl SymbolTable {
    fn build(language: &Language) -> Self {
        let mut table = SymbolTable::default();

        for id in 0..language.node_kind_count() {
            let Ok(id) = KindId::try_from(id) else { break };
            let name = language.node_kind_for_id(id).unwrap_or("");
            let kind = match (
                language.node_kind_is_visible(id),
                language.node_kind_is_named(id),
            ) {
                (true, true) => TypeKind::Named,
                (true, false) => TypeKind::Anonymous,
                (false, _) => TypeKind::Hidden,
            };
            table.kinds.push((name, kind));
            let ids = match kind {
                TypeKind::Named => &mut table.named_ids,
                TypeKind::Anonymous => &mut table.anonymous_ids,
                TypeKind::Hidden => continue,
            };
            ids.entry(name).or_insert(id);
        }

        // field ids start at 1; slot 0 stays empty
        table.field_names.push(None);
        for id in 1..=language.field_count() {
            let Ok(id) = FieldId::try_from(id) else { break };
            let name = language.field_name_for_id(id);
            table.field_names.push(name);
            if let Some(name) = name {
                table.field_ids.entry(name).or_insert(id);
            }
        }

        log::trace!(
            "built symbol table: {} kinds, {} fields",
            table.kinds.len(),
            table.field_ids.len()
        );
        table
    }
}

/// A loaded grammar and its metadata.
#[derive(Clone)]
pub struct Grammar {
    lang: SupportLang,
    language: Language,
    symbols: OnceCell<SymbolTable>,
}

impl Grammar {
    pub fn new(lang: SupportLang) -> Self {
        Self {
            lang,
            language: lang.get_ts_language(),
            symbols: OnceCell::new(),
        }
    }

    /// Load a grammar by name or alias (`"lua"`, `"rs"`, `"python"`, ...).
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        SupportLang::from_str(name)
            .map(Self::new)
            .map_err(|_| EngineError::UnknownLanguage {
                name: name.to_string(),
            })
    }

    /// Lower-case names of every grammar that can be loaded.
    pub fn available() -> Vec<String> {
        SupportLang::all_langs()
            .iter()
            .map(|lang| format!("{lang:?}").to_lowercase())
            .collect()
    }

    pub fn name(&self) -> String {
        format!("{:?}", self.lang).to_lowercase()
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn abi_version(&self) -> usize {
        self.language.abi_version()
    }

    /// Whether this grammar's ABI is one the linked tree-sitter can load.
    pub fn is_compatible(&self) -> bool {
        (tree_sitter::MIN_COMPATIBLE_LANGUAGE_VERSION..=tree_sitter::LANGUAGE_VERSION)
            .contains(&self.abi_version())
    }

    fn symbols(&self) -> &SymbolTable {
        self.symbols.get_or_init(|| SymbolTable::build(&self.language))
    }

    pub fn kind_count(&self) -> usize {
        self.symbols().kinds.len()
    }

    pub fn kind_name(&self, id: KindId) -> Option<&'static str> {
        self.symbols().kinds.get(usize::from(id)).map(|(name, _)| *name)
    }

    pub fn type_kind(&self, id: KindId) -> Option<TypeKind> {
        self.symbols().kinds.get(usize::from(id)).map(|(_, kind)| *kind)
    }

    /// Id of a visible node kind. A named rule and an anonymous token can
    /// share a name, so the caller says which one it means.
    pub fn kind_id(&self, name: &str, named: bool) -> Option<KindId> {
        let symbols = self.symbols();
        let ids = if named {
            &symbols.named_ids
        } else {
            &symbols.anonymous_ids
        };
        ids.get(name).copied()
    }

    pub fn field_count(&self) -> usize {
        self.symbols().field_ids.len()
    }

    pub fn field_name(&self, id: FieldId) -> Option<&'static str> {
        self.symbols()
            .field_names
            .get(usize::from(id))
            .copied()
            .flatten()
    }

    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.symbols().field_ids.get(name).copied()
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("lang", &self.lang)
            .field("abi_version", &self.abi_version())
            .field("symbols_loaded", &self.symbols.get().is_some())
            .finish()
    }
}
