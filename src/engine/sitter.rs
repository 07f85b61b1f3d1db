use crate::engine::{EditNotification, EngineError, ParseEngine};
use crate::grammar::Grammar;
use crate::position::Range;
use tree_sitter::{InputEdit, Node, Parser, Tree};

/// Tree-sitter parser wrapper for one grammar.
///
/// The parser is always configured with a language and never with a timeout
/// or cancellation flag, so a reparse of a correctly notified tree has no
/// documented way to fail.
pub struct TreeSitterEngine {
    parser: Parser,
    grammar: Grammar,
}

impl TreeSitterEngine {
    pub fn new(grammar: Grammar) -> Result<Self, EngineError> {
        let mut parser = Parser::new();
        parser
            .set_language(grammar.language())
            .map_err(|_| EngineError::LanguageSet {
                abi_version: grammar.abi_version(),
            })?;

        Ok(Self { parser, grammar })
    }

    /// Create an engine for a grammar name such as `"lua"`.
    pub fn for_language(name: &str) -> Result<Self, EngineError> {
        Self::new(Grammar::from_name(name)?)
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Parse source code from scratch.
    pub fn parse(&mut self, source: &str) -> Result<Tree, EngineError> {
        self.parser
            .parse(source, None)
            .ok_or(EngineError::ParseFailed)
    }
}

impl ParseEngine for TreeSitterEngine {
    type Tree = Tree;

    fn reparse(&mut self, source: &str, previous: Option<&Tree>) -> Result<Tree, EngineError> {
        self.parser
            .parse(source, previous)
            .ok_or(EngineError::ParseFailed)
    }

    fn notify_edit(&self, tree: &mut Tree, edit: &EditNotification) {
        tree.edit(&InputEdit::from(edit));
    }

    fn changed_ranges(&self, old: &Tree, new: &Tree) -> Vec<Range> {
        old.changed_ranges(new).map(Range::from).collect()
    }
}

/// Ranges of every ERROR or MISSING node under `node`.
pub fn error_ranges(node: Node<'_>) -> Vec<Range> {
    let mut errors = Vec::new();
    collect_error_ranges(node, &mut errors);
    errors
}

fn collect_error_ranges(node: Node<'_>, errors: &mut Vec<Range>) {
    if node.is_error() || node.is_missing() {
        errors.push(node.range().into());
    }

    if !node.has_error() {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_ranges(child, errors);
    }
}
