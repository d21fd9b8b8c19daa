use owo_colors::OwoColorize;

use crate::error::Result;
use crate::model::PersonalityId;
use crate::storage::{PreferenceKey, Preferences};

/// Classify the onboarding answers and remember the result for profile
/// creation.
pub fn cmd_personality(
    preferences: &dyn Preferences,
    journey: bool,
    place: bool,
    plan: bool,
) -> Result<()> {
    let personality = PersonalityId::classify(journey, place, plan);
    preferences.set(PreferenceKey::Personality, personality.title());

    println!("{} ({})", personality.title().bold(), personality.code().cyan());
    println!("  {}", personality.default_image_path().dimmed());
    Ok(())
}
