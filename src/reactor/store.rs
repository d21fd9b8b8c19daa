use futures::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};

use super::mutations::Step;
use super::{MutationSource, Mutations, Reactor};
use crate::error::{JypError, Result};

/// Runs a [`Reactor`] on a single consumer task.
///
/// Mutations from actions, finished effects and external sources all go
/// through one channel and are reduced in the order they were emitted.
/// Pending mutations are always reduced before the next action is mutated,
/// so `mutate` sees every mutation emitted before the action arrived.
///
/// Dropping the store aborts the consumer task, which in turn drops every
/// in-flight effect and external subscription.
pub struct Store<R: Reactor> {
    actions: mpsc::UnboundedSender<R::Action>,
    state: watch::Receiver<R::State>,
    task: JoinHandle<()>,
}

impl<R: Reactor> Store<R> {
    /// Start the consumer task. Must be called inside a tokio runtime.
    pub fn spawn(reactor: R) -> Self {
        let initial = reactor.initial_state();
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(initial.clone());

        let task = tokio::spawn(run(reactor, initial, action_rx, state_tx));

        Self {
            actions: action_tx,
            state: state_rx,
            task,
        }
    }

    /// Queue an action. Actions sent after the store stopped are dropped.
    pub fn send(&self, action: R::Action) {
        if self.actions.send(action).is_err() {
            tracing::warn!("Store stopped, dropping action");
        }
    }

    /// Snapshot of the latest reduced state.
    pub fn current_state(&self) -> R::State {
        self.state.borrow().clone()
    }

    /// Receiver notified after every reduce.
    pub fn subscribe(&self) -> watch::Receiver<R::State> {
        self.state.clone()
    }

    /// Wait until the state satisfies `predicate` and return that state.
    pub async fn wait_for(&self, predicate: impl FnMut(&R::State) -> bool) -> Result<R::State> {
        let mut rx = self.state.clone();
        let state = rx
            .wait_for(predicate)
            .await
            .map_err(|_| JypError::Other("store stopped before reaching state".to_string()))?;
        Ok(state.clone())
    }
}

impl<R: Reactor> Drop for Store<R> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<R: Reactor>(
    reactor: R,
    mut state: R::State,
    mut actions: mpsc::UnboundedReceiver<R::Action>,
    state_tx: watch::Sender<R::State>,
) {
    let (mutation_tx, mut mutations) = mpsc::unbounded_channel::<R::Mutation>();
    let mut effects: JoinSet<()> = JoinSet::new();

    for source in reactor.transform() {
        effects.spawn(forward(source, mutation_tx.clone()));
    }

    tracing::debug!("Store started");

    loop {
        tokio::select! {
            biased;

            Some(mutation) = mutations.recv() => {
                state = R::reduce(state, mutation);
                state_tx.send_replace(state.clone());
            }
            action = actions.recv() => {
                let Some(action) = action else { break };
                let produced = reactor.mutate(&state, action);
                dispatch(produced, &mutation_tx, &mut effects);
            }
            Some(_) = effects.join_next(), if !effects.is_empty() => {}
        }
    }

    tracing::debug!("Store stopped");
}

/// Emit leading mutations now; hand the rest to a task at the first effect.
fn dispatch<M: Send + 'static>(
    mut produced: Mutations<M>,
    tx: &mpsc::UnboundedSender<M>,
    effects: &mut JoinSet<()>,
) {
    while let Some(step) = produced.pop_front() {
        match step {
            Step::Just(mutation) => {
                let _ = tx.send(mutation);
            }
            Step::Effect(future) => {
                let tx = tx.clone();
                effects.spawn(async move {
                    let mut pending = future.await.then(produced);
                    while let Some(step) = pending.pop_front() {
                        match step {
                            Step::Just(mutation) => {
                                if tx.send(mutation).is_err() {
                                    return;
                                }
                            }
                            Step::Effect(future) => {
                                pending = future.await.then(pending);
                            }
                        }
                    }
                });
                return;
            }
        }
    }
}

async fn forward<M: Send + 'static>(mut source: MutationSource<M>, tx: mpsc::UnboundedSender<M>) {
    while let Some(mutation) = source.next().await {
        if tx.send(mutation).is_err() {
            break;
        }
    }
}
