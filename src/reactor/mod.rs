//! Unidirectional state containers.
//!
//! A screen is a [`Reactor`]: it turns an `Action` into a lazy sequence of
//! `Mutation`s ([`Mutations`]) and folds each mutation into its `State` with a
//! pure `reduce`. Asynchronous work (service calls) is expressed as an
//! effect step inside the sequence; its resulting mutations are emitted when
//! the future completes. External event streams declared by
//! [`Reactor::transform`] are merged into the same mutation stream.
//!
//! [`Store`] runs a reactor: one consumer task, one mutation channel, one
//! reducer. Tests that only care about synchronous transitions can use
//! [`apply`] instead.

mod mutations;
mod store;

pub use mutations::Mutations;
pub use store::Store;

use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::broadcast;

/// External event stream mapped to mutations, merged for the store's lifetime.
pub type MutationSource<M> = BoxStream<'static, M>;

pub trait Reactor: Send + Sync + 'static {
    type Action: Send + 'static;
    type Mutation: Send + 'static;
    type State: Clone + Send + Sync + 'static;

    fn initial_state(&self) -> Self::State;

    /// Derive the mutations for one action.
    ///
    /// `state` is a read-only snapshot; the state itself only changes through
    /// [`Reactor::reduce`].
    fn mutate(&self, state: &Self::State, action: Self::Action) -> Mutations<Self::Mutation>;

    /// Pure state transition. Must handle every mutation variant.
    fn reduce(state: Self::State, mutation: Self::Mutation) -> Self::State;

    /// External event streams merged into the mutation stream.
    fn transform(&self) -> Vec<MutationSource<Self::Mutation>> {
        Vec::new()
    }
}

/// Apply one action synchronously, folding only the mutations that are
/// available without awaiting an effect.
///
/// Effects are dropped without being polled, so no service is called.
pub fn apply<R: Reactor>(reactor: &R, state: R::State, action: R::Action) -> R::State {
    let mutations = reactor.mutate(&state, action);
    mutations.into_immediate().into_iter().fold(state, R::reduce)
}

/// Adapt a broadcast receiver into a mutation source.
///
/// Lagged receivers skip the missed events with a warning; the stream ends
/// when the sender side is dropped.
pub fn broadcast_source<E, M, F>(rx: broadcast::Receiver<E>, map: F) -> MutationSource<M>
where
    E: Clone + Send + 'static,
    M: Send + 'static,
    F: Fn(E) -> Option<M> + Send + 'static,
{
    stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => return Some((event, rx)),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event subscriber lagged, skipped {skipped} events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
    .filter_map(move |event| futures::future::ready(map(event)))
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter;

    #[derive(Debug)]
    enum CounterAction {
        Increment,
        IncrementLater,
    }

    #[derive(Debug)]
    enum CounterMutation {
        Add(i32),
    }

    impl Reactor for Counter {
        type Action = CounterAction;
        type Mutation = CounterMutation;
        type State = i32;

        fn initial_state(&self) -> i32 {
            0
        }

        fn mutate(&self, _state: &i32, action: CounterAction) -> Mutations<CounterMutation> {
            match action {
                CounterAction::Increment => Mutations::just(CounterMutation::Add(1)),
                CounterAction::IncrementLater => Mutations::just(CounterMutation::Add(10))
                    .then(Mutations::effect(async { Mutations::just(CounterMutation::Add(100)) })),
            }
        }

        fn reduce(state: i32, mutation: CounterMutation) -> i32 {
            match mutation {
                CounterMutation::Add(n) => state + n,
            }
        }
    }

    #[test]
    fn test_apply_folds_immediate_mutations() {
        let state = apply(&Counter, 0, CounterAction::Increment);
        assert_eq!(state, 1);
    }

    #[test]
    fn test_apply_skips_effects() {
        let state = apply(&Counter, 0, CounterAction::IncrementLater);
        assert_eq!(state, 10);
    }

    #[tokio::test]
    async fn test_broadcast_source_maps_and_filters() {
        let (tx, rx) = broadcast::channel::<i32>(8);
        let source = broadcast_source(rx, |n| (n % 2 == 0).then_some(n * 10));

        tx.send(1).unwrap();
        tx.send(2).unwrap();
        tx.send(4).unwrap();
        drop(tx);

        let collected: Vec<i32> = source.collect().await;
        assert_eq!(collected, vec![20, 40]);
    }
}
