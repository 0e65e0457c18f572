//! unicorn-segment
//!
//! Grapheme cluster, word and sentence boundaries as defined by UAX #29.
//!
//! Each boundary kind is an ordered table of lookaround rules. A rule's
//! left and right contexts are small regular expressions over character
//! classes, compiled to automaton programs and run by a lock-step NFA
//! simulator. Scanning walks the text one code point at a time and stops at
//! the first position where the deciding rule says "break".
//!
//! Public API:
//! - `BoundaryKind` - Grapheme, word or sentence
//! - `Segmenter` - Boundary search with configuration checks
//! - `next_boundary` / `previous_boundary` - Search with the default segmenter
//! - `SegmenterConfig` - Enabled boundary kinds and encoding forms
//!
//! ```
//! use unicorn_segment::{BoundaryKind, Segmenter};
//!
//! let segmenter = Segmenter::new();
//! let words: Vec<&str> = segmenter
//!     .segments(BoundaryKind::Word, "Hello World")
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(words, ["Hello", " ", "World"]);
//! ```
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

pub use unicorn_core::{Error, Result, Text};

pub mod classify;
pub use classify::{Classifier, ClassId, TagSet, UnicodeClassifier};

pub mod config;
pub use config::SegmenterConfig;

pub mod inst;
pub use inst::{Inst, Program, ProgramError, MAX_PROGRAM_LEN};

pub mod pattern;
pub mod pikevm;
pub mod pool;
pub use pool::THREAD_POOL_CAPACITY;

pub mod rules;
pub use rules::{Rule, RuleTable};

pub mod scanner;

/// Kind of text boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryKind {
    Grapheme,
    Word,
    Sentence,
}

impl BoundaryKind {
    pub const ALL: [BoundaryKind; 3] = [
        BoundaryKind::Grapheme,
        BoundaryKind::Word,
        BoundaryKind::Sentence,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BoundaryKind::Grapheme => "grapheme",
            BoundaryKind::Word => "word",
            BoundaryKind::Sentence => "sentence",
        }
    }
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundaryKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grapheme" => Ok(BoundaryKind::Grapheme),
            "word" => Ok(BoundaryKind::Word),
            "sentence" => Ok(BoundaryKind::Sentence),
            other => Err(Error::invalid_argument(format!(
                "unknown boundary kind '{other}'"
            ))),
        }
    }
}

/// Boundary search over any supported text, subject to a configuration.
#[derive(Debug, Clone)]
pub struct Segmenter<C = UnicodeClassifier> {
    config: SegmenterConfig,
    classifier: C,
}

impl Default for Segmenter<UnicodeClassifier> {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter<UnicodeClassifier> {
    /// Segmenter with every boundary kind and encoding form enabled.
    pub fn new() -> Self {
        Self::with_config(SegmenterConfig::default())
    }

    pub fn with_config(config: SegmenterConfig) -> Self {
        Self::with_classifier(config, UnicodeClassifier::new())
    }
}

impl<C: Classifier> Segmenter<C> {
    pub fn with_classifier(config: SegmenterConfig, classifier: C) -> Self {
        Self { config, classifier }
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Nearest boundary strictly after `cursor`.
    ///
    /// Returns `Ok(None)` when `cursor` is at the end of the text.
    pub fn next_boundary(
        &self,
        kind: BoundaryKind,
        text: &Text<'_>,
        cursor: usize,
    ) -> Result<Option<usize>> {
        let table = self.prepare(kind, text, cursor)?;
        scanner::next_boundary(table, *text, &self.classifier, cursor)
    }

    /// Nearest boundary strictly before `cursor`.
    ///
    /// Returns `Ok(None)` when `cursor` is at the start of the text.
    pub fn previous_boundary(
        &self,
        kind: BoundaryKind,
        text: &Text<'_>,
        cursor: usize,
    ) -> Result<Option<usize>> {
        let table = self.prepare(kind, text, cursor)?;
        scanner::previous_boundary(table, *text, &self.classifier, cursor)
    }

    /// Every boundary of `text` in order, starting with 0 for non-empty
    /// text and ending with its length.
    pub fn boundaries<'s, 't>(
        &'s self,
        kind: BoundaryKind,
        text: Text<'t>,
    ) -> Boundaries<'s, 't, C> {
        Boundaries {
            segmenter: self,
            kind,
            text,
            table: None,
            cursor: 0,
            done: false,
        }
    }

    /// Split a string into the pieces between consecutive boundaries.
    pub fn segments<'s, 't>(&'s self, kind: BoundaryKind, s: &'t str) -> Segments<'s, 't, C> {
        Segments {
            source: s,
            inner: self.boundaries(kind, Text::from(s)),
            start: None,
        }
    }

    fn prepare(
        &self,
        kind: BoundaryKind,
        text: &Text<'_>,
        cursor: usize,
    ) -> Result<&'static RuleTable> {
        self.config.check_kind(kind)?;
        self.config.base().check_text(text)?;
        if text.is_past_end(cursor) {
            tracing::warn!(cursor, "cursor is past the end of text");
            return Err(Error::invalid_argument(format!(
                "cursor {cursor} is past the end of text"
            )));
        }
        RuleTable::for_kind(kind)
    }
}

/// Iterator returned by [`Segmenter::boundaries`].
pub struct Boundaries<'s, 't, C> {
    segmenter: &'s Segmenter<C>,
    kind: BoundaryKind,
    text: Text<'t>,
    /// Set once the configuration checks have passed.
    table: Option<&'static RuleTable>,
    cursor: usize,
    done: bool,
}

impl<C: Classifier> Iterator for Boundaries<'_, '_, C> {
    type Item = Result<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = match self.table {
            None => self
                .segmenter
                .prepare(self.kind, &self.text, 0)
                .map(|table| {
                    self.table = Some(table);
                    (!self.text.is_at_end(0)).then_some(0)
                }),
            Some(table) => scanner::next_boundary(
                table,
                self.text,
                &self.segmenter.classifier,
                self.cursor,
            ),
        };
        match result {
            Ok(Some(boundary)) => {
                self.cursor = boundary;
                Some(Ok(boundary))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Iterator returned by [`Segmenter::segments`].
pub struct Segments<'s, 't, C> {
    source: &'t str,
    inner: Boundaries<'s, 't, C>,
    start: Option<usize>,
}

impl<'t, C: Classifier> Iterator for Segments<'_, 't, C> {
    type Item = Result<&'t str>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let end = match self.inner.next()? {
                Ok(end) => end,
                Err(err) => return Some(Err(err)),
            };
            if let Some(start) = self.start.replace(end) {
                let piece = self.source.get(start..end).ok_or_else(|| {
                    Error::internal(format!("boundary {end} splits a UTF-8 sequence"))
                });
                return Some(piece);
            }
        }
    }
}

static DEFAULT_SEGMENTER: Lazy<Segmenter> = Lazy::new(Segmenter::new);

/// Nearest boundary strictly after `cursor`, using every Unicode default.
pub fn next_boundary(kind: BoundaryKind, text: &Text<'_>, cursor: usize) -> Result<Option<usize>> {
    DEFAULT_SEGMENTER.next_boundary(kind, text, cursor)
}

/// Nearest boundary strictly before `cursor`, using every Unicode default.
pub fn previous_boundary(
    kind: BoundaryKind,
    text: &Text<'_>,
    cursor: usize,
) -> Result<Option<usize>> {
    DEFAULT_SEGMENTER.previous_boundary(kind, text, cursor)
}
