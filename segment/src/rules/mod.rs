//! Ordered lookaround rule tables, one per boundary kind.
//!
//! A rule names a left context, a right context and a verdict. The left
//! context is matched backward from the candidate position and the right
//! context forward from it; the first rule whose contexts both match decides
//! whether the position is a boundary. Every table ends with a wildcard rule
//! so that some rule always decides.
use once_cell::sync::Lazy;
use unicorn_core::{Error, Result};

use crate::inst::{Program, ProgramError};
use crate::pattern::{compile, Pattern};
use crate::pikevm::Direction;
use crate::BoundaryKind;

mod grapheme;
mod sentence;
mod word;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Rule {
    pub name: &'static str,
    /// Compiled for backward execution.
    pub left: Program,
    /// Compiled for forward execution.
    pub right: Program,
    /// Does a match mean a boundary?
    pub breaks: bool,
}

impl Rule {
    fn compile(
        name: &'static str,
        left: Pattern,
        breaks: bool,
        right: Pattern,
    ) -> std::result::Result<Self, ProgramError> {
        Ok(Self {
            name,
            left: compile(&left, Direction::Backward)?,
            right: compile(&right, Direction::Forward)?,
            breaks,
        })
    }

    /// `left ÷ right`
    pub(crate) fn split(
        name: &'static str,
        left: Pattern,
        right: Pattern,
    ) -> std::result::Result<Self, ProgramError> {
        Self::compile(name, left, true, right)
    }

    /// `left × right`
    pub(crate) fn join(
        name: &'static str,
        left: Pattern,
        right: Pattern,
    ) -> std::result::Result<Self, ProgramError> {
        Self::compile(name, left, false, right)
    }

    /// True when the rule matches at every position.
    pub fn is_wildcard(&self) -> bool {
        self.left.is_wildcard() && self.right.is_wildcard()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RuleTable {
    kind: BoundaryKind,
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Build a table, rejecting one whose last rule is not a wildcard.
    pub fn new(kind: BoundaryKind, rules: Vec<Rule>) -> std::result::Result<Self, ProgramError> {
        match rules.last() {
            Some(last) if last.is_wildcard() => Ok(Self { kind, rules }),
            Some(last) => Err(ProgramError::MissingWildcard(last.name.to_string())),
            None => Err(ProgramError::MissingWildcard("an empty table".to_string())),
        }
    }

    /// A table without the trailing wildcard check.
    #[cfg(test)]
    pub(crate) fn unchecked(kind: BoundaryKind, rules: Vec<Rule>) -> Self {
        Self { kind, rules }
    }

    /// The compiled table for `kind`, built on first use.
    pub fn for_kind(kind: BoundaryKind) -> Result<&'static RuleTable> {
        let table = match kind {
            BoundaryKind::Grapheme => &*GRAPHEME,
            BoundaryKind::Word => &*WORD,
            BoundaryKind::Sentence => &*SENTENCE,
        };
        table.as_ref().map_err(|err| {
            tracing::error!(%kind, %err, "rule table failed to compile");
            Error::from(err.clone())
        })
    }

    pub fn kind(&self) -> BoundaryKind {
        self.kind
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Longest program in the table.
    pub fn max_program_len(&self) -> usize {
        self.rules
            .iter()
            .map(|r| r.left.len().max(r.right.len()))
            .max()
            .unwrap_or(0)
    }
}

fn build(
    kind: BoundaryKind,
    rules: fn() -> std::result::Result<Vec<Rule>, ProgramError>,
) -> std::result::Result<RuleTable, ProgramError> {
    let table = RuleTable::new(kind, rules()?)?;
    tracing::debug!(
        %kind,
        rules = table.len(),
        longest = table.max_program_len(),
        "compiled rule table"
    );
    Ok(table)
}

static GRAPHEME: Lazy<std::result::Result<RuleTable, ProgramError>> =
    Lazy::new(|| build(BoundaryKind::Grapheme, grapheme::rules));

static WORD: Lazy<std::result::Result<RuleTable, ProgramError>> =
    Lazy::new(|| build(BoundaryKind::Word, word::rules));

static SENTENCE: Lazy<std::result::Result<RuleTable, ProgramError>> =
    Lazy::new(|| build(BoundaryKind::Sentence, sentence::rules));
