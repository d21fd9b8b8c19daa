use std::collections::VecDeque;
use std::fmt;
use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;

pub(super) enum Step<M> {
    Just(M),
    Effect(BoxFuture<'static, Mutations<M>>),
}

/// Lazy, ordered sequence of mutations produced by one action.
///
/// Steps are emitted strictly in order. An effect step suspends the sequence
/// until its future resolves; the mutations it yields are emitted before any
/// step that follows it.
pub struct Mutations<M> {
    steps: VecDeque<Step<M>>,
}

impl<M> Default for Mutations<M> {
    fn default() -> Self {
        Self {
            steps: VecDeque::new(),
        }
    }
}

impl<M> fmt::Debug for Mutations<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let effects = self
            .steps
            .iter()
            .filter(|s| matches!(s, Step::Effect(_)))
            .count();
        f.debug_struct("Mutations")
            .field("steps", &self.steps.len())
            .field("effects", &effects)
            .finish()
    }
}

impl<M: Send + 'static> Mutations<M> {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn just(mutation: M) -> Self {
        let mut steps = VecDeque::with_capacity(1);
        steps.push_back(Step::Just(mutation));
        Self { steps }
    }

    /// An asynchronous step; its output is spliced in where the step sits.
    pub fn effect<F>(future: F) -> Self
    where
        F: Future<Output = Mutations<M>> + Send + 'static,
    {
        let mut steps = VecDeque::with_capacity(1);
        steps.push_back(Step::Effect(future.boxed()));
        Self { steps }
    }

    /// Concatenate sequences, preserving order.
    pub fn concat(parts: impl IntoIterator<Item = Mutations<M>>) -> Self {
        parts
            .into_iter()
            .fold(Self::default(), |acc, part| acc.then(part))
    }

    /// Append `next` after this sequence.
    pub fn then(mut self, mut next: Mutations<M>) -> Self {
        self.steps.append(&mut next.steps);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn has_effects(&self) -> bool {
        self.steps.iter().any(|s| matches!(s, Step::Effect(_)))
    }

    /// Leading mutations available without awaiting anything. Everything
    /// from the first effect on is dropped.
    pub fn into_immediate(self) -> Vec<M> {
        self.steps
            .into_iter()
            .map_while(|step| match step {
                Step::Just(m) => Some(m),
                Step::Effect(_) => None,
            })
            .collect()
    }

    /// Resolve the whole sequence, awaiting effects in order.
    pub async fn collect(self) -> Vec<M> {
        let mut out = Vec::new();
        let mut pending = self;
        while let Some(step) = pending.pop_front() {
            match step {
                Step::Just(m) => out.push(m),
                Step::Effect(future) => {
                    let produced = future.await;
                    pending = produced.then(pending);
                }
            }
        }
        out
    }

    pub(super) fn pop_front(&mut self) -> Option<Step<M>> {
        self.steps.pop_front()
    }
}

impl<M: Send + 'static> From<Vec<M>> for Mutations<M> {
    fn from(mutations: Vec<M>) -> Self {
        Self {
            steps: mutations.into_iter().map(Step::Just).collect(),
        }
    }
}

impl<M: Send + 'static> FromIterator<M> for Mutations<M> {
    fn from_iter<I: IntoIterator<Item = M>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().map(Step::Just).collect(),
        }
    }
}
