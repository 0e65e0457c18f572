//! Lock-step NFA simulation of a [`Program`] over a [`Text`].
//!
//! Two thread lists are kept: `current` holds threads waiting on the code
//! point being read and `next` collects their successors. Every program
//! counter appears at most once per list, so a list never holds more than
//! [`MAX_PROGRAM_LEN`](crate::inst::MAX_PROGRAM_LEN) threads and a step costs
//! at most one dispatch per instruction.
use unicorn_core::{Error, Result, Text};

use crate::classify::{Classifier, TagSet};
use crate::inst::{Inst, Program};
use crate::pool::{ThreadList, ThreadPool};
use crate::BoundaryKind;

/// Iteration direction of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Runs one program over one text.
pub struct Simulator<'a, C: ?Sized> {
    program: &'a Program,
    text: Text<'a>,
    classifier: &'a C,
    kind: BoundaryKind,
}

impl<'a, C: Classifier + ?Sized> Simulator<'a, C> {
    pub fn new(
        program: &'a Program,
        text: Text<'a>,
        classifier: &'a C,
        kind: BoundaryKind,
    ) -> Self {
        Self {
            program,
            text,
            classifier,
            kind,
        }
    }

    /// Does the program match starting at `position`, reading in
    /// `direction`? Acceptance happens as soon as any thread halts.
    pub fn run(&self, position: usize, direction: Direction) -> Result<bool> {
        let mut ctx = Context::default();
        let mut position = position;
        self.expand(&mut ctx.pool, &mut ctx.current, &mut ctx.stack, 0, position)?;

        while !ctx.current.is_empty() {
            let decoded = match direction {
                Direction::Forward => self.text.next(position)?,
                Direction::Backward => self.text.prev(position)?,
            };
            // `None` means input is exhausted; the step still runs so that
            // halting threads can accept.
            let tags = decoded.map(|d| {
                position = d.index;
                self.classifier.classify(d.scalar, self.kind)
            });

            if self.step(&mut ctx, tags, position)? {
                return Ok(true);
            }

            std::mem::swap(&mut ctx.current, &mut ctx.next);
            ctx.next.clear(&mut ctx.pool);
        }
        Ok(false)
    }

    /// Follow non-consuming instructions from `pc` and enqueue every
    /// consuming (or halting) instruction reached.
    fn expand(
        &self,
        pool: &mut ThreadPool,
        list: &mut ThreadList,
        stack: &mut Vec<usize>,
        pc: usize,
        position: usize,
    ) -> Result<()> {
        stack.clear();
        stack.push(pc);

        while let Some(pc) = stack.pop() {
            if !list.mark(pc) {
                continue;
            }
            let inst = self.fetch(pc)?;
            match inst {
                Inst::MatchStartOfText => {
                    if position == 0 {
                        stack.push(pc + 1);
                    }
                }
                Inst::MatchEndOfText => {
                    if self.text.is_at_end(position) {
                        stack.push(pc + 1);
                    }
                }
                Inst::Jump(target) => stack.push(target),
                Inst::Fork(a, b) => {
                    stack.push(b);
                    stack.push(a);
                }
                _ => {
                    let id = pool.alloc(pc)?;
                    list.push(pool, id);
                }
            }
        }
        Ok(())
    }

    /// Advance every thread of `current` over one code point (`None` once
    /// input is exhausted). Returns true if a thread halted.
    fn step(&self, ctx: &mut Context, tags: Option<TagSet>, position: usize) -> Result<bool> {
        while let Some(pc) = ctx.current.pop(&mut ctx.pool) {
            let inst = self.fetch(pc)?;
            let advance = match inst {
                Inst::Halt => return Ok(true),
                Inst::NoOp => false,
                Inst::MatchAny => tags.is_some(),
                Inst::MatchClass(id) => tags.is_some_and(|t| t.contains(id)),
                Inst::MatchNotClass(id) => tags.is_some_and(|t| !t.contains(id)),
                Inst::MatchClassRange(lo, hi) => tags.is_some_and(|t| self.any_in(t, lo, hi)),
                Inst::MatchExcludedClassRange(lo, hi) => {
                    tags.is_some_and(|t| !self.any_in(t, lo, hi))
                }
                Inst::MatchStartOfText | Inst::MatchEndOfText | Inst::Jump(_) | Inst::Fork(..) => {
                    tracing::error!(pc, %inst, "non-consuming instruction in a thread list");
                    return Err(Error::internal(format!(
                        "non-consuming instruction '{inst}' at {pc} reached a thread list"
                    )));
                }
            };
            if advance {
                self.expand(&mut ctx.pool, &mut ctx.next, &mut ctx.stack, pc + 1, position)?;
            }
        }
        Ok(false)
    }

    fn any_in(&self, tags: TagSet, lo: u16, hi: u16) -> bool {
        self.program
            .classes(lo, hi)
            .iter()
            .any(|&id| tags.contains(id))
    }

    fn fetch(&self, pc: usize) -> Result<Inst> {
        self.program
            .get(pc)
            .ok_or_else(|| Error::internal(format!("program counter {pc} is out of range")))
    }
}

/// Per-match state, dropped when the match ends.
#[derive(Default)]
struct Context {
    pool: ThreadPool,
    current: ThreadList,
    next: ThreadList,
    stack: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ClassId;

    /// Tags each lowercase ASCII letter with its alphabet index.
    struct Letters;

    impl Classifier for Letters {
        fn classify(&self, scalar: u32, _kind: BoundaryKind) -> TagSet {
            match char::from_u32(scalar) {
                Some(c @ 'a'..='z') => TagSet::of(ClassId(c as u8 - b'a')),
                _ => TagSet::EMPTY,
            }
        }
    }

    const A: ClassId = ClassId(0);
    const B: ClassId = ClassId(1);
    const C: ClassId = ClassId(2);

    fn program(insts: Vec<Inst>, pool: Vec<ClassId>) -> Program {
        Program::new(insts, pool).unwrap()
    }

    fn run(p: &Program, s: &str, position: usize, direction: Direction) -> Result<bool> {
        Simulator::new(p, Text::from(s), &Letters, BoundaryKind::Grapheme).run(position, direction)
    }

    #[test]
    fn test_forward_sequence() {
        let p = program(vec![Inst::MatchClass(A), Inst::MatchClass(B), Inst::Halt], vec![]);
        assert_eq!(run(&p, "abc", 0, Direction::Forward), Ok(true));
        assert_eq!(run(&p, "acb", 0, Direction::Forward), Ok(false));
        assert_eq!(run(&p, "a", 0, Direction::Forward), Ok(false));
        assert_eq!(run(&p, "cab", 1, Direction::Forward), Ok(true));
    }

    #[test]
    fn test_backward_reads_right_to_left() {
        let p = program(vec![Inst::MatchClass(B), Inst::MatchClass(A), Inst::Halt], vec![]);
        assert_eq!(run(&p, "abc", 2, Direction::Backward), Ok(true));
        assert_eq!(run(&p, "abc", 3, Direction::Backward), Ok(false));
    }

    #[test]
    fn test_text_anchors() {
        let sot = program(vec![Inst::MatchStartOfText, Inst::Halt], vec![]);
        assert_eq!(run(&sot, "ab", 0, Direction::Backward), Ok(true));
        assert_eq!(run(&sot, "ab", 1, Direction::Backward), Ok(false));

        // a+ followed by the end of text.
        let p = program(
            vec![
                Inst::MatchClass(A),
                Inst::Fork(0, 2),
                Inst::MatchEndOfText,
                Inst::Halt,
            ],
            vec![],
        );
        assert_eq!(run(&p, "aaa", 0, Direction::Forward), Ok(true));
        assert_eq!(run(&p, "aab", 0, Direction::Forward), Ok(false));
    }

    #[test]
    fn test_class_ranges() {
        let p = program(vec![Inst::MatchClassRange(0, 2), Inst::Halt], vec![A, C]);
        assert_eq!(run(&p, "c", 0, Direction::Forward), Ok(true));
        assert_eq!(run(&p, "b", 0, Direction::Forward), Ok(false));

        let p = program(vec![Inst::MatchExcludedClassRange(0, 2), Inst::Halt], vec![A, C]);
        assert_eq!(run(&p, "b", 0, Direction::Forward), Ok(true));
        assert_eq!(run(&p, "a", 0, Direction::Forward), Ok(false));
        // Nothing left to consume.
        assert_eq!(run(&p, "", 0, Direction::Forward), Ok(false));

        let p = program(vec![Inst::MatchNotClass(A), Inst::Halt], vec![]);
        assert_eq!(run(&p, "z", 0, Direction::Forward), Ok(true));
    }

    #[test]
    fn test_halt_accepts_at_end_of_input() {
        let p = Program::wildcard();
        assert_eq!(run(&p, "", 0, Direction::Forward), Ok(true));
        assert_eq!(run(&p, "", 0, Direction::Backward), Ok(true));
    }

    #[test]
    fn test_noop_threads_never_advance() {
        let p = program(vec![Inst::NoOp, Inst::Halt], vec![]);
        assert_eq!(run(&p, "a", 0, Direction::Forward), Ok(false));
    }

    #[test]
    fn test_epsilon_loops_terminate() {
        // (a*)* over "aab"
        let p = program(
            vec![
                Inst::Fork(1, 5),
                Inst::Fork(2, 4),
                Inst::MatchClass(A),
                Inst::Jump(1),
                Inst::Jump(0),
                Inst::MatchClass(B),
                Inst::Halt,
            ],
            vec![],
        );
        assert_eq!(run(&p, "aab", 0, Direction::Forward), Ok(true));
        assert_eq!(run(&p, "aac", 0, Direction::Forward), Ok(false));
    }

    #[test]
    fn test_malformed_input_propagates() {
        let p = program(vec![Inst::MatchAny, Inst::MatchAny, Inst::Halt], vec![]);
        let bytes = [b'a', 0x80];
        let text = Text::utf8(&bytes);
        let result = Simulator::new(&p, text, &Letters, BoundaryKind::Grapheme)
            .run(0, Direction::Forward);
        assert!(result.unwrap_err().is_malformed());
    }
}
