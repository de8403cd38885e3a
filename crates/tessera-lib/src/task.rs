//! Deferred parsing: each phase as an explicit step.
//!
//! A [`ParseTask`] runs compile, symbolize and evaluate one [`step`] at a
//! time; a [`Scheduler`] interleaves the phases of many tasks round-robin and
//! hands each final result to its callback. Phases never yield midway.
//!
//! [`step`]: ParseTask::step

use std::collections::VecDeque;

use crate::compile::CompiledGrammar;
use crate::engine::NoopTracer;
use crate::parser::{Parse, Parser};
use crate::symbolize::SymbolStream;
use crate::Result;

/// The phase a task will run next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Compile,
    Symbolize,
    Evaluate,
    Done,
}

enum ParseState<'p, 's, T> {
    Compile,
    Symbolize(&'p CompiledGrammar),
    Evaluate(&'p CompiledGrammar, SymbolStream<'s>),
    Done(Option<Result<Parse<'s, T>>>),
}

/// A parse call split into its three phases.
pub struct ParseTask<'p, 's, T> {
    parser: &'p Parser<T>,
    text: &'s str,
    state: ParseState<'p, 's, T>,
}

impl<'p, 's, T> ParseTask<'p, 's, T> {
    pub fn new(parser: &'p Parser<T>, text: &'s str) -> Self {
        Self {
            parser,
            text,
            state: ParseState::Compile,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            ParseState::Compile => Phase::Compile,
            ParseState::Symbolize(_) => Phase::Symbolize,
            ParseState::Evaluate(..) => Phase::Evaluate,
            ParseState::Done(_) => Phase::Done,
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase() == Phase::Done
    }

    /// Runs the current phase to completion and returns the next one.
    /// A grammar error ends the task early.
    pub fn step(&mut self) -> Phase {
        let state = std::mem::replace(&mut self.state, ParseState::Done(None));
        self.state = match state {
            ParseState::Compile => match self.parser.compile() {
                Ok(compiled) => ParseState::Symbolize(compiled),
                Err(err) => ParseState::Done(Some(Err(err))),
            },
            ParseState::Symbolize(compiled) => {
                ParseState::Evaluate(compiled, self.parser.symbolize_with(compiled, self.text))
            }
            ParseState::Evaluate(compiled, stream) => {
                ParseState::Done(Some(self.parser.evaluate_with(compiled, stream, &mut NoopTracer)))
            }
            done @ ParseState::Done(_) => done,
        };
        self.phase()
    }

    /// Takes the result once the task is done.
    pub fn take_result(&mut self) -> Option<Result<Parse<'s, T>>> {
        match &mut self.state {
            ParseState::Done(result) => result.take(),
            _ => None,
        }
    }

    /// Runs the remaining phases. `None` if the result was already taken.
    pub fn run(mut self) -> Option<Result<Parse<'s, T>>> {
        while !self.is_done() {
            self.step();
        }
        self.take_result()
    }
}

enum SymbolizeState<'p, 's> {
    Compile,
    Symbolize(&'p CompiledGrammar),
    Done(Option<Result<SymbolStream<'s>>>),
}

/// A symbolize call split into compile and symbolize phases.
pub struct SymbolizeTask<'p, 's, T> {
    parser: &'p Parser<T>,
    text: &'s str,
    state: SymbolizeState<'p, 's>,
}

impl<'p, 's, T> SymbolizeTask<'p, 's, T> {
    pub fn new(parser: &'p Parser<T>, text: &'s str) -> Self {
        Self {
            parser,
            text,
            state: SymbolizeState::Compile,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            SymbolizeState::Compile => Phase::Compile,
            SymbolizeState::Symbolize(_) => Phase::Symbolize,
            SymbolizeState::Done(_) => Phase::Done,
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase() == Phase::Done
    }

    pub fn step(&mut self) -> Phase {
        let state = std::mem::replace(&mut self.state, SymbolizeState::Done(None));
        self.state = match state {
            SymbolizeState::Compile => match self.parser.compile() {
                Ok(compiled) => SymbolizeState::Symbolize(compiled),
                Err(err) => SymbolizeState::Done(Some(Err(err))),
            },
            SymbolizeState::Symbolize(compiled) => {
                SymbolizeState::Done(Some(Ok(self.parser.symbolize_with(compiled, self.text))))
            }
            done @ SymbolizeState::Done(_) => done,
        };
        self.phase()
    }

    pub fn take_result(&mut self) -> Option<Result<SymbolStream<'s>>> {
        match &mut self.state {
            SymbolizeState::Done(result) => result.take(),
            _ => None,
        }
    }

    pub fn run(mut self) -> Option<Result<SymbolStream<'s>>> {
        while !self.is_done() {
            self.step();
        }
        self.take_result()
    }
}

/// Identifies a task submitted to a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u32);

/// One phase run by [`Scheduler::turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub task: TaskId,
    pub phase: Phase,
}

trait Job {
    fn phase(&self) -> Phase;
    /// Runs one phase; returns true once the task is done.
    fn step(&mut self) -> bool;
    fn finish(self: Box<Self>);
}

struct ParseJob<'a, T, F> {
    task: ParseTask<'a, 'a, T>,
    callback: F,
}

impl<'a, T, F> Job for ParseJob<'a, T, F>
where
    F: FnOnce(Result<Parse<'a, T>>),
{
    fn phase(&self) -> Phase {
        self.task.phase()
    }

    fn step(&mut self) -> bool {
        self.task.step() == Phase::Done
    }

    fn finish(self: Box<Self>) {
        let ParseJob { task, callback } = *self;
        if let Some(result) = task.run() {
            callback(result);
        }
    }
}

struct SymbolizeJob<'a, T, F> {
    task: SymbolizeTask<'a, 'a, T>,
    callback: F,
}

impl<'a, T, F> Job for SymbolizeJob<'a, T, F>
where
    F: FnOnce(Result<SymbolStream<'a>>),
{
    fn phase(&self) -> Phase {
        self.task.phase()
    }

    fn step(&mut self) -> bool {
        self.task.step() == Phase::Done
    }

    fn finish(self: Box<Self>) {
        let SymbolizeJob { task, callback } = *self;
        if let Some(result) = task.run() {
            callback(result);
        }
    }
}

/// Deferred-callback queue that interleaves independent parse calls between
/// phases.
#[derive(Default)]
pub struct Scheduler<'a> {
    queue: VecDeque<(TaskId, Box<dyn Job + 'a>)>,
    next_id: u32,
}

impl<'a> Scheduler<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a parse of `text`; `callback` receives the result once its last
    /// phase has run.
    pub fn submit_parse<T, F>(&mut self, parser: &'a Parser<T>, text: &'a str, callback: F) -> TaskId
    where
        T: 'a,
        F: FnOnce(Result<Parse<'a, T>>) + 'a,
    {
        let job = ParseJob {
            task: ParseTask::new(parser, text),
            callback,
        };
        self.push(Box::new(job))
    }

    /// Queues a symbolization of `text`.
    pub fn submit_symbolize<T, F>(&mut self, parser: &'a Parser<T>, text: &'a str, callback: F) -> TaskId
    where
        T: 'a,
        F: FnOnce(Result<SymbolStream<'a>>) + 'a,
    {
        let job = SymbolizeJob {
            task: SymbolizeTask::new(parser, text),
            callback,
        };
        self.push(Box::new(job))
    }

    /// Runs one phase of the front task, then requeues it, or calls its
    /// callback if that was its last phase. `None` when the queue is empty.
    pub fn turn(&mut self) -> Option<Turn> {
        let (task, mut job) = self.queue.pop_front()?;
        let phase = job.phase();
        if job.step() {
            job.finish();
        } else {
            self.queue.push_back((task, job));
        }
        Some(Turn { task, phase })
    }

    /// Runs every queued task to completion.
    pub fn run(&mut self) {
        while self.turn().is_some() {}
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    fn push(&mut self, job: Box<dyn Job + 'a>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.queue.push_back((id, job));
        id
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod task_tests;
