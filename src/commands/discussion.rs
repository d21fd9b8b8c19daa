use std::time::Duration;

use owo_colors::OwoColorize;
use tokio::sync::broadcast;

use crate::error::{JypError, Result};
use crate::provider::ServiceProvider;
use crate::reactor::Store;
use crate::remote::JourneyEvent;
use crate::screens::{Discussion, DiscussionAction, DiscussionState, LoadState};
use crate::sections::{DiscussionItem, IndexPath};

use super::{settle, within};

async fn load(store: &Store<Discussion>, timeout: Duration) -> Result<DiscussionState> {
    store.send(DiscussionAction::Refresh);
    let state = settle(store, timeout, |s| {
        matches!(s.load_state, LoadState::Loaded | LoadState::Failed(_))
    })
    .await?;

    match &state.load_state {
        LoadState::Failed(message) => Err(JypError::Other(message.clone())),
        _ => Ok(state),
    }
}

/// Print a journey's tags and ranked candidate places.
pub async fn cmd_discussion(provider: &ServiceProvider, journey_id: &str, timeout: Duration) -> Result<()> {
    let store = Store::spawn(Discussion::new(journey_id, provider));
    let state = load(&store, timeout).await?;

    if let Some(journey) = &state.journey {
        println!("{}", journey.name.bold());
        println!(
            "{} ~ {}",
            journey.start_day().to_string().dimmed(),
            journey.end_day().to_string().dimmed()
        );
    }
    print_discussion(&state);
    Ok(())
}

pub(crate) fn print_discussion(state: &DiscussionState) {
    for section in &state.sections {
        for item in &section.items {
            match item {
                DiscussionItem::Tag(tag) => {
                    println!("  #{} ({})", tag.tag.text.cyan(), tag.tag.category)
                }
                DiscussionItem::EmptyTag => println!("  {}", "no tags".dimmed()),
                DiscussionItem::Pikmi(pikmi) => {
                    let heart = if pikmi.is_liked { "♥" } else { "♡" };
                    println!(
                        "  {:>2}. {} {} {} {}",
                        pikmi.rank + 1,
                        pikmi.pik.name.bold(),
                        heart.red(),
                        pikmi.like_count,
                        pikmi.pik.id.dimmed()
                    );
                }
                DiscussionItem::CreatePikmi => {
                    println!("  {}", "no candidate places yet".dimmed())
                }
            }
        }
    }
}

/// Toggle the current user's like on a candidate place.
///
/// Done once the server accepted the change; the refetch that follows is not
/// waited for.
pub async fn cmd_like(
    provider: &ServiceProvider,
    journey_id: &str,
    pikmi_id: &str,
    timeout: Duration,
) -> Result<()> {
    let store = Store::spawn(Discussion::new(journey_id, provider));
    let state = load(&store, timeout).await?;

    let (path, was_liked) = find_pikmi(&state, pikmi_id)
        .ok_or_else(|| JypError::PikmiNotFound(pikmi_id.to_string()))?;

    let mut events = provider.journeys.subscribe();
    store.send(DiscussionAction::TapPikmiLike(path));
    within(timeout, async {
        tokio::select! {
            state = store.wait_for(|s| s.guide.is_some()) => {
                Err(JypError::Other(state?.guide.unwrap_or_default()))
            }
            stored = like_stored(&mut events, journey_id, pikmi_id) => stored,
        }
    })
    .await?;

    let verb = if was_liked { "Unliked" } else { "Liked" };
    println!("{} {}", verb.green(), pikmi_id);
    Ok(())
}

/// Wait for the announcement of a like change on `pikmi_id`.
async fn like_stored(
    events: &mut broadcast::Receiver<JourneyEvent>,
    journey_id: &str,
    pikmi_id: &str,
) -> Result<()> {
    loop {
        match events.recv().await {
            Ok(
                JourneyEvent::PikmiLiked { journey_id: j, pikmi_id: p }
                | JourneyEvent::PikmiUnliked { journey_id: j, pikmi_id: p },
            ) if j == journey_id && p == pikmi_id => return Ok(()),
            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => {
                return Err(JypError::Other("journey service stopped".to_string()));
            }
        }
    }
}

/// Position and server-side like flag of a pikmi in the sections.
fn find_pikmi(state: &DiscussionState, pikmi_id: &str) -> Option<(IndexPath, bool)> {
    let user_id = state.user_id.as_deref()?;
    let journey = state.journey.as_ref()?;
    let liked = journey.find_pikmi(pikmi_id)?.is_liked_by(user_id);

    state.sections.iter().enumerate().find_map(|(s, section)| {
        section.items.iter().position(|item| {
            matches!(item, DiscussionItem::Pikmi(p) if p.pik.id == pikmi_id)
        })
        .map(|i| (IndexPath::new(s, i), liked))
    })
}
