//! Subcommands of the `jyp` binary.
//!
//! Journey commands drive the same screen stores a UI would and print the
//! resulting sections.

mod auth;
mod config;
mod discussion;
mod personality;
mod plan;

pub use auth::{cmd_login, cmd_logout};
pub use config::cmd_config_show;
pub use discussion::{cmd_discussion, cmd_like};
pub use personality::cmd_personality;
pub use plan::cmd_plan;

use std::future::Future;
use std::time::Duration;

use crate::error::{JypError, Result};
use crate::reactor::{Reactor, Store};

/// Run `work`, giving up after `timeout`.
pub(crate) async fn within<T>(timeout: Duration, work: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::time::timeout(timeout, work)
        .await
        .map_err(|_| JypError::Other("timed out waiting for the server".to_string()))?
}

/// Wait for a store to reach a state, giving up after `timeout`.
pub(crate) async fn settle<R: Reactor>(
    store: &Store<R>,
    timeout: Duration,
    predicate: impl FnMut(&R::State) -> bool,
) -> Result<R::State> {
    within(timeout, store.wait_for(predicate)).await
}
