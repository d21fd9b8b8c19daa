use std::time::Duration;

use owo_colors::OwoColorize;

use crate::error::{JypError, Result};
use crate::provider::ServiceProvider;
use crate::reactor::Store;
use crate::screens::{JourneyPlan, JourneyPlanAction, LoadState};
use crate::sections::JourneyPlanItem;

use super::settle;

/// Print a journey's itinerary day by day.
pub async fn cmd_plan(provider: &ServiceProvider, journey_id: &str, timeout: Duration) -> Result<()> {
    let store = Store::spawn(JourneyPlan::new(journey_id, provider));
    store.send(JourneyPlanAction::Fetch);

    let state = settle(&store, timeout, |s| {
        matches!(s.load_state, LoadState::Loaded | LoadState::Failed(_))
    })
    .await?;
    if let LoadState::Failed(message) = state.load_state {
        return Err(JypError::Other(message));
    }

    if state.sections.is_empty() {
        println!("{}", "no days planned".dimmed());
        return Ok(());
    }

    let mut day = 0;
    for item in state.sections.iter().flat_map(|s| &s.items) {
        match item {
            JourneyPlanItem::DayTag { .. } => {}
            JourneyPlanItem::Plan(plan) => {
                if plan.order == 0 {
                    day += 1;
                    println!("{} {}", format!("Day {day}").bold(), plan.date.dimmed());
                }
                let connector = if plan.is_last { "└" } else { "├" };
                println!("  {connector} {}", plan.pik.name);
            }
            JourneyPlanItem::EmptyPlan { date, .. } => {
                day += 1;
                println!("{} {}", format!("Day {day}").bold(), date.dimmed());
                println!("  {}", "nothing planned".dimmed());
            }
        }
    }
    Ok(())
}
