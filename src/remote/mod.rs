//! Client for the JYP API.
//!
//! Every response is wrapped in an [`Envelope`]. Services build
//! [`ApiRequest`]s, send them through a [`Transport`] and decode the payload;
//! each call resolves to its own result.

mod auth;
pub mod envelope;
mod journey;
mod mock;
mod transport;
mod user;

pub use auth::AuthService;
pub use envelope::{Envelope, SUCCESS_CODE};
pub use journey::{JourneyEvent, JourneyService};
pub use mock::MockTransport;
pub use transport::{ApiRequest, HttpTransport, Transport};
pub use user::{UserService, recover_user_id};
