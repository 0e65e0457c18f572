//! Automaton instruction set and validated programs.
use std::fmt::{self, Write as _};

use serde::Serialize;

use crate::classify::{class_name, ClassId};
use crate::BoundaryKind;

/// Longest program the simulator can run. Each thread list tracks pending
/// program counters in a `u64`, one bit per instruction.
pub const MAX_PROGRAM_LEN: usize = 64;

const _: () = assert!(MAX_PROGRAM_LEN <= u64::BITS as usize);

/// One automaton instruction.
///
/// `MatchClassRange(lo, hi)` and `MatchExcludedClassRange(lo, hi)` refer to
/// the slice `lo..hi` of the program's class pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Inst {
    /// Succeeds only at index 0 of the text.
    MatchStartOfText,
    /// Succeeds only at the end of the text.
    MatchEndOfText,
    Jump(usize),
    Fork(usize, usize),
    NoOp,
    MatchAny,
    MatchClass(ClassId),
    MatchNotClass(ClassId),
    /// Consumes a code point tagged with any class in the pool range.
    MatchClassRange(u16, u16),
    /// Consumes a code point tagged with no class in the pool range.
    MatchExcludedClassRange(u16, u16),
    /// Accept.
    Halt,
}

impl Inst {
    /// True for instructions that consume a code point.
    pub fn is_consuming(&self) -> bool {
        matches!(
            self,
            Inst::MatchAny
                | Inst::MatchClass(_)
                | Inst::MatchNotClass(_)
                | Inst::MatchClassRange(..)
                | Inst::MatchExcludedClassRange(..)
        )
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inst::MatchStartOfText => write!(f, "sot"),
            Inst::MatchEndOfText => write!(f, "eot"),
            Inst::Jump(target) => write!(f, "jump {target}"),
            Inst::Fork(a, b) => write!(f, "fork {a}, {b}"),
            Inst::NoOp => write!(f, "nop"),
            Inst::MatchAny => write!(f, "any"),
            Inst::MatchClass(id) => write!(f, "class #{}", id.0),
            Inst::MatchNotClass(id) => write!(f, "notclass #{}", id.0),
            Inst::MatchClassRange(lo, hi) => write!(f, "classes [{lo}..{hi}]"),
            Inst::MatchExcludedClassRange(lo, hi) => write!(f, "notclasses [{lo}..{hi}]"),
            Inst::Halt => write!(f, "halt"),
        }
    }
}

/// Reasons a program or rule table is rejected at compile time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgramError {
    #[error("program is empty")]
    Empty,

    #[error("program has {len} instructions but at most {max} are supported")]
    TooLong { len: usize, max: usize },

    #[error("instruction {pc} jumps to {target}, outside the program")]
    BadTarget { pc: usize, target: usize },

    #[error("instruction {pc} uses class range {lo}..{hi} but the pool holds {pool}")]
    BadClassRange {
        pc: usize,
        lo: u16,
        hi: u16,
        pool: usize,
    },

    #[error("rule table ends with '{0}', which is not a wildcard")]
    MissingWildcard(String),
}

impl From<ProgramError> for unicorn_core::Error {
    fn from(err: ProgramError) -> Self {
        unicorn_core::Error::internal(err.to_string())
    }
}

/// An immutable, validated instruction sequence plus its class pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Program {
    insts: Vec<Inst>,
    class_pool: Vec<ClassId>,
}

impl Program {
    /// Validate and wrap an instruction sequence.
    ///
    /// Rejects programs longer than [`MAX_PROGRAM_LEN`], jump and fork
    /// targets outside the program and class ranges outside the pool.
    pub fn new(insts: Vec<Inst>, class_pool: Vec<ClassId>) -> Result<Self, ProgramError> {
        if insts.is_empty() {
            return Err(ProgramError::Empty);
        }
        if insts.len() > MAX_PROGRAM_LEN {
            return Err(ProgramError::TooLong {
                len: insts.len(),
                max: MAX_PROGRAM_LEN,
            });
        }

        let len = insts.len();
        for (pc, inst) in insts.iter().enumerate() {
            match *inst {
                Inst::Jump(target) if target >= len => {
                    return Err(ProgramError::BadTarget { pc, target });
                }
                Inst::Fork(a, b) if a >= len || b >= len => {
                    let target = if a >= len { a } else { b };
                    return Err(ProgramError::BadTarget { pc, target });
                }
                Inst::MatchClassRange(lo, hi) | Inst::MatchExcludedClassRange(lo, hi)
                    if lo > hi || usize::from(hi) > class_pool.len() =>
                {
                    return Err(ProgramError::BadClassRange {
                        pc,
                        lo,
                        hi,
                        pool: class_pool.len(),
                    });
                }
                // Falling off the end would leave the simulator without an
                // instruction to dispatch.
                Inst::MatchStartOfText
                | Inst::MatchEndOfText
                | Inst::NoOp
                | Inst::MatchAny
                | Inst::MatchClass(_)
                | Inst::MatchNotClass(_)
                | Inst::MatchClassRange(..)
                | Inst::MatchExcludedClassRange(..)
                    if pc + 1 == len =>
                {
                    return Err(ProgramError::BadTarget { pc, target: len });
                }
                _ => {}
            }
        }

        Ok(Self { insts, class_pool })
    }

    /// The program that accepts at every position.
    pub fn wildcard() -> Self {
        Self {
            insts: vec![Inst::Halt],
            class_pool: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.insts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insts.is_empty()
    }

    pub fn insts(&self) -> &[Inst] {
        &self.insts
    }

    pub fn get(&self, pc: usize) -> Option<Inst> {
        self.insts.get(pc).copied()
    }

    pub fn class_pool(&self) -> &[ClassId] {
        &self.class_pool
    }

    /// Pool slice referenced by a range instruction. Ranges were checked in
    /// [`Program::new`].
    pub fn classes(&self, lo: u16, hi: u16) -> &[ClassId] {
        self.class_pool
            .get(usize::from(lo)..usize::from(hi))
            .unwrap_or(&[])
    }

    /// True when the program accepts without consuming anything.
    pub fn is_wildcard(&self) -> bool {
        self.insts.first() == Some(&Inst::Halt)
    }

    /// Human-readable listing with class names resolved for `kind`.
    pub fn disassemble(&self, kind: BoundaryKind) -> String {
        let mut out = String::new();
        for (pc, inst) in self.insts.iter().enumerate() {
            let _ = write!(out, "{pc:04}  ");
            let _ = match *inst {
                Inst::MatchClass(id) => write!(out, "class {}", class_name(kind, id)),
                Inst::MatchNotClass(id) => write!(out, "notclass {}", class_name(kind, id)),
                Inst::MatchClassRange(lo, hi) => {
                    write!(out, "classes {}", self.range_names(kind, lo, hi))
                }
                Inst::MatchExcludedClassRange(lo, hi) => {
                    write!(out, "notclasses {}", self.range_names(kind, lo, hi))
                }
                other => write!(out, "{other}"),
            };
            out.push('\n');
        }
        out
    }

    fn range_names(&self, kind: BoundaryKind, lo: u16, hi: u16) -> String {
        let names: Vec<&str> = self
            .classes(lo, hi)
            .iter()
            .map(|&id| class_name(kind, id))
            .collect();
        format!("[{}]", names.join(" "))
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pc, inst) in self.insts.iter().enumerate() {
            writeln!(f, "{pc:04}  {inst}")?;
        }
        Ok(())
    }
}
