pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod reactor;
pub mod remote;
pub mod screens;
pub mod sections;
pub mod storage;

pub use config::Config;
pub use error::{JypError, Result};
pub use model::{AuthVendor, Journey, PersonalityId, Pik, Pikiday, Tag, TagCategory, User};
pub use provider::ServiceProvider;
pub use reactor::{Mutations, Reactor, Store};
pub use remote::{HttpTransport, JourneyEvent, MockTransport, Transport};
