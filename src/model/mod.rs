//! Domain types shared by services, section builders and screens.

pub mod journey;
pub mod personality;
pub mod tag;
pub mod user;

pub use journey::{
    CreateJourneyRequest, JoinJourneyRequest, Journey, Pik, Pikiday, PlaceCategory,
    UpdatePikisRequest,
};
pub use personality::{ALL_PERSONALITIES, PersonalityId};
pub use tag::{ALL_TAG_CATEGORIES, Tag, TagCategory, default_tag_catalog};
pub use user::{AuthVendor, CreateUserRequest, UpdateUserRequest, User};
