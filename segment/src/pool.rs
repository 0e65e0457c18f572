//! Thread storage for the simulator.
//!
//! Threads live in a fixed-size arena and are addressed by index. A
//! [`ThreadList`] threads a FIFO through the arena with intrusive `next`
//! links and remembers which program counters it has already seen.
use unicorn_core::{Error, Result};

use crate::inst::MAX_PROGRAM_LEN;

/// Arena capacity: two lists, each holding at most one thread per
/// instruction.
pub const THREAD_POOL_CAPACITY: usize = 2 * MAX_PROGRAM_LEN;

#[derive(Debug, Clone, Copy, Default)]
struct Thread {
    pc: usize,
    next: Option<usize>,
}

/// Index arena of threads with a free-index stack.
#[derive(Debug)]
pub struct ThreadPool {
    threads: Vec<Thread>,
    free: Vec<usize>,
}

impl Default for ThreadPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadPool {
    pub fn new() -> Self {
        Self::with_capacity(THREAD_POOL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            threads: vec![Thread::default(); capacity],
            free: (0..capacity).rev().collect(),
        }
    }

    /// Take a thread from the free stack.
    pub fn alloc(&mut self, pc: usize) -> Result<usize> {
        let id = self
            .free
            .pop()
            .ok_or_else(|| Error::internal("thread pool exhausted"))?;
        self.threads[id] = Thread { pc, next: None };
        Ok(id)
    }

    pub fn release(&mut self, id: usize) {
        self.free.push(id);
    }

    pub fn pc(&self, id: usize) -> usize {
        self.threads[id].pc
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }

    pub fn capacity(&self) -> usize {
        self.threads.len()
    }
}

/// Program counters already added to a list, one bit per instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingSet(u64);

impl PendingSet {
    pub fn contains(self, pc: usize) -> bool {
        pc < MAX_PROGRAM_LEN && self.0 & (1u64 << pc) != 0
    }

    pub fn insert(&mut self, pc: usize) {
        if pc < MAX_PROGRAM_LEN {
            self.0 |= 1u64 << pc;
        }
    }

    pub fn remove(&mut self, pc: usize) {
        if pc < MAX_PROGRAM_LEN {
            self.0 &= !(1u64 << pc);
        }
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// FIFO of thread ids linked through a [`ThreadPool`].
#[derive(Debug, Default)]
pub struct ThreadList {
    head: Option<usize>,
    tail: Option<usize>,
    pending: PendingSet,
}

impl ThreadList {
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Mark `pc` as seen. Returns false if it already was.
    pub fn mark(&mut self, pc: usize) -> bool {
        if self.pending.contains(pc) {
            false
        } else {
            self.pending.insert(pc);
            true
        }
    }

    pub fn is_pending(&self, pc: usize) -> bool {
        self.pending.contains(pc)
    }

    pub fn push(&mut self, pool: &mut ThreadPool, id: usize) {
        match self.tail {
            Some(tail) => pool.threads[tail].next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }

    /// Dequeue the oldest thread, returning it to the pool and clearing its
    /// pending bit. Yields the thread's program counter.
    pub fn pop(&mut self, pool: &mut ThreadPool) -> Option<usize> {
        let id = self.head?;
        let Thread { pc, next } = pool.threads[id];
        self.head = next;
        if next.is_none() {
            self.tail = None;
        }
        pool.release(id);
        self.pending.remove(pc);
        Some(pc)
    }

    /// Release every thread and forget all pending marks.
    pub fn clear(&mut self, pool: &mut ThreadPool) {
        while self.pop(pool).is_some() {}
        self.pending = PendingSet::default();
    }
}
