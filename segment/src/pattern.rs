//! Pattern combinators and their Thompson-style compiler.
//!
//! Rule contexts are written left to right, the way UAX #29 states them. A
//! left context runs backward from the candidate boundary, so it is compiled
//! with [`Direction::Backward`], which reverses every concatenation.
use crate::classify::ClassId;
use crate::inst::{Inst, Program, ProgramError};
use crate::pikevm::Direction;

/// Regular expression over character classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    StartOfText,
    EndOfText,
    Any,
    Class(ClassId),
    NotClass(ClassId),
    AnyOf(Vec<ClassId>),
    NoneOf(Vec<ClassId>),
    Concat(Vec<Pattern>),
    Alt(Vec<Pattern>),
    Star(Box<Pattern>),
    Plus(Box<Pattern>),
    Optional(Box<Pattern>),
}

pub fn sot() -> Pattern {
    Pattern::StartOfText
}

pub fn eot() -> Pattern {
    Pattern::EndOfText
}

pub fn any() -> Pattern {
    Pattern::Any
}

/// Matches the empty string.
pub fn empty() -> Pattern {
    Pattern::Concat(Vec::new())
}

pub fn class(c: impl Into<ClassId>) -> Pattern {
    Pattern::Class(c.into())
}

pub fn not_class(c: impl Into<ClassId>) -> Pattern {
    Pattern::NotClass(c.into())
}

pub fn any_of<C: Into<ClassId>>(classes: impl IntoIterator<Item = C>) -> Pattern {
    Pattern::AnyOf(classes.into_iter().map(Into::into).collect())
}

pub fn none_of<C: Into<ClassId>>(classes: impl IntoIterator<Item = C>) -> Pattern {
    Pattern::NoneOf(classes.into_iter().map(Into::into).collect())
}

pub fn seq(parts: impl IntoIterator<Item = Pattern>) -> Pattern {
    Pattern::Concat(parts.into_iter().collect())
}

pub fn alt(choices: impl IntoIterator<Item = Pattern>) -> Pattern {
    Pattern::Alt(choices.into_iter().collect())
}

pub fn star(p: Pattern) -> Pattern {
    Pattern::Star(Box::new(p))
}

pub fn plus(p: Pattern) -> Pattern {
    Pattern::Plus(Box::new(p))
}

pub fn opt(p: Pattern) -> Pattern {
    Pattern::Optional(Box::new(p))
}

/// Compile a pattern for execution in `direction`, appending `Halt`.
pub fn compile(pattern: &Pattern, direction: Direction) -> Result<Program, ProgramError> {
    let mut compiler = Compiler::default();
    compiler.emit(pattern, direction);
    compiler.insts.push(Inst::Halt);
    Program::new(compiler.insts, compiler.pool)
}

#[derive(Default)]
struct Compiler {
    insts: Vec<Inst>,
    pool: Vec<ClassId>,
}

impl Compiler {
    fn pc(&self) -> usize {
        self.insts.len()
    }

    /// Reserve a slot to be patched once its target is known.
    fn hole(&mut self) -> usize {
        self.insts.push(Inst::NoOp);
        self.insts.len() - 1
    }

    fn patch(&mut self, pc: usize, inst: Inst) {
        self.insts[pc] = inst;
    }

    fn pool_range(&mut self, classes: &[ClassId]) -> (u16, u16) {
        let lo = self.pool.len();
        self.pool.extend_from_slice(classes);
        (clamp_u16(lo), clamp_u16(self.pool.len()))
    }

    fn emit(&mut self, pattern: &Pattern, direction: Direction) {
        match pattern {
            Pattern::StartOfText => self.insts.push(Inst::MatchStartOfText),
            Pattern::EndOfText => self.insts.push(Inst::MatchEndOfText),
            Pattern::Any => self.insts.push(Inst::MatchAny),
            Pattern::Class(id) => self.insts.push(Inst::MatchClass(*id)),
            Pattern::NotClass(id) => self.insts.push(Inst::MatchNotClass(*id)),
            Pattern::AnyOf(classes) => match classes.as_slice() {
                [single] => self.insts.push(Inst::MatchClass(*single)),
                many => {
                    let (lo, hi) = self.pool_range(many);
                    self.insts.push(Inst::MatchClassRange(lo, hi));
                }
            },
            Pattern::NoneOf(classes) => match classes.as_slice() {
                [single] => self.insts.push(Inst::MatchNotClass(*single)),
                many => {
                    let (lo, hi) = self.pool_range(many);
                    self.insts.push(Inst::MatchExcludedClassRange(lo, hi));
                }
            },
            Pattern::Concat(parts) => match direction {
                Direction::Forward => {
                    for part in parts {
                        self.emit(part, direction);
                    }
                }
                Direction::Backward => {
                    for part in parts.iter().rev() {
                        self.emit(part, direction);
                    }
                }
            },
            Pattern::Alt(choices) => {
                let mut exits = Vec::new();
                for (i, choice) in choices.iter().enumerate() {
                    if i + 1 == choices.len() {
                        self.emit(choice, direction);
                    } else {
                        let fork = self.hole();
                        self.emit(choice, direction);
                        exits.push(self.hole());
                        let next = self.pc();
                        self.patch(fork, Inst::Fork(fork + 1, next));
                    }
                }
                let end = self.pc();
                for exit in exits {
                    self.patch(exit, Inst::Jump(end));
                }
            }
            Pattern::Star(inner) => {
                let fork = self.hole();
                self.emit(inner, direction);
                self.insts.push(Inst::Jump(fork));
                let end = self.pc();
                self.patch(fork, Inst::Fork(fork + 1, end));
            }
            Pattern::Plus(inner) => {
                let start = self.pc();
                self.emit(inner, direction);
                let next = self.pc() + 1;
                self.insts.push(Inst::Fork(start, next));
            }
            Pattern::Optional(inner) => {
                let fork = self.hole();
                self.emit(inner, direction);
                let end = self.pc();
                self.patch(fork, Inst::Fork(fork + 1, end));
            }
        }
    }
}

// Pools that overflow u16 are far past MAX_PROGRAM_LEN anyway; saturating
// makes Program::new reject the range.
fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
