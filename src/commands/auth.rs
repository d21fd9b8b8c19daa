use std::time::Duration;

use owo_colors::OwoColorize;

use crate::error::{JypError, Result};
use crate::model::AuthVendor;
use crate::provider::ServiceProvider;
use crate::reactor::Store;
use crate::screens::{NextScreen, OnboardingSignUp, OnboardingSignUpAction};

use super::settle;

/// Sign in with an identity provider token.
pub async fn cmd_login(
    provider: &ServiceProvider,
    vendor: AuthVendor,
    token: &str,
    timeout: Duration,
) -> Result<()> {
    let store = Store::spawn(OnboardingSignUp::new(provider));
    store.send(OnboardingSignUpAction::Login {
        vendor,
        token: token.to_string(),
        name: None,
        profile_image_path: None,
    });

    let state = settle(&store, timeout, |s| {
        !s.is_loading && (s.next_screen.is_some() || s.guide.is_some())
    })
    .await?;

    match (state.next_screen, state.guide) {
        (Some(NextScreen::TabBar), _) => println!("{} with {vendor}", "Signed in".green()),
        (Some(NextScreen::OnboardingQuestion), _) => println!(
            "{} with {vendor}; no profile yet, run `jyp personality` to continue",
            "Signed in".green()
        ),
        (None, Some(guide)) => return Err(JypError::Other(guide)),
        (None, None) => return Err(JypError::Unauthenticated),
    }
    Ok(())
}

pub fn cmd_logout(provider: &ServiceProvider) -> Result<()> {
    if !provider.auth.is_signed_in() {
        println!("{}", "Not signed in".dimmed());
        return Ok(());
    }
    provider.auth.logout()?;
    println!("{}", "Signed out".green());
    Ok(())
}
