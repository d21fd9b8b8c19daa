use std::sync::Arc;

use tokio::sync::broadcast;

use crate::error::Result;
use crate::model::{CreateJourneyRequest, Journey, JoinJourneyRequest, Pik, UpdatePikisRequest};

use super::{ApiRequest, Transport};

/// Capacity of the journey announcement channel.
const EVENT_CAPACITY: usize = 64;

/// Announced after a journey changed on the server.
///
/// Carries only the id; subscribers refetch what they need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JourneyEvent {
    Created { journey_id: String },
    Joined { journey_id: String },
    PikmiLiked { journey_id: String, pikmi_id: String },
    PikmiUnliked { journey_id: String, pikmi_id: String },
    PikisUpdated { journey_id: String, pikiday_id: String },
}

impl JourneyEvent {
    pub fn journey_id(&self) -> &str {
        match self {
            JourneyEvent::Created { journey_id }
            | JourneyEvent::Joined { journey_id }
            | JourneyEvent::PikmiLiked { journey_id, .. }
            | JourneyEvent::PikmiUnliked { journey_id, .. }
            | JourneyEvent::PikisUpdated { journey_id, .. } => journey_id,
        }
    }
}

/// Journey endpoints.
#[derive(Clone)]
pub struct JourneyService {
    transport: Arc<dyn Transport>,
    events: broadcast::Sender<JourneyEvent>,
}

impl JourneyService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { transport, events }
    }

    /// Receive an event for every successful journey mutation made through
    /// this service (or a clone of it).
    pub fn subscribe(&self) -> broadcast::Receiver<JourneyEvent> {
        self.events.subscribe()
    }

    pub async fn fetch_journey(&self, id: &str) -> Result<Journey> {
        self.transport
            .send(ApiRequest::get(["journeys", id]))
            .await?
            .into_data()
    }

    pub async fn fetch_journeys(&self) -> Result<Vec<Journey>> {
        self.transport
            .send(ApiRequest::get(["journeys"]))
            .await?
            .into_data()
    }

    pub async fn create_journey(&self, request: &CreateJourneyRequest) -> Result<Journey> {
        let journey: Journey = self
            .transport
            .send(ApiRequest::post(["journeys"]).json(request)?)
            .await?
            .into_data()?;
        self.announce(JourneyEvent::Created {
            journey_id: journey.id.clone(),
        });
        Ok(journey)
    }

    pub async fn join_journey(&self, id: &str, request: &JoinJourneyRequest) -> Result<()> {
        let request = ApiRequest::post(["journeys", id, "join"]).json(request)?;
        self.transport.send(request).await?.into_unit()?;
        self.announce(JourneyEvent::Joined {
            journey_id: id.to_string(),
        });
        Ok(())
    }

    pub async fn create_pikmi_like(&self, journey_id: &str, pikmi_id: &str) -> Result<()> {
        let request = ApiRequest::post(likes_path(journey_id, pikmi_id));
        self.transport.send(request).await?.into_unit()?;
        self.announce(JourneyEvent::PikmiLiked {
            journey_id: journey_id.to_string(),
            pikmi_id: pikmi_id.to_string(),
        });
        Ok(())
    }

    pub async fn delete_pikmi_like(&self, journey_id: &str, pikmi_id: &str) -> Result<()> {
        let request = ApiRequest::delete(likes_path(journey_id, pikmi_id));
        self.transport.send(request).await?.into_unit()?;
        self.announce(JourneyEvent::PikmiUnliked {
            journey_id: journey_id.to_string(),
            pikmi_id: pikmi_id.to_string(),
        });
        Ok(())
    }

    /// Replace the places of one itinerary day.
    pub async fn update_pikis(
        &self,
        journey_id: &str,
        pikiday_id: &str,
        pikis: Vec<Pik>,
    ) -> Result<()> {
        let request = ApiRequest::put(["journeys", journey_id, "pikidays", pikiday_id, "pikis"])
            .json(&UpdatePikisRequest { pikis })?;
        self.transport.send(request).await?.into_unit()?;
        self.announce(JourneyEvent::PikisUpdated {
            journey_id: journey_id.to_string(),
            pikiday_id: pikiday_id.to_string(),
        });
        Ok(())
    }

    fn announce(&self, event: JourneyEvent) {
        tracing::debug!(journey_id = %event.journey_id(), ?event, "Journey changed");
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

fn likes_path<'a>(journey_id: &'a str, pikmi_id: &'a str) -> [&'a str; 5] {
    ["journeys", journey_id, "pikmis", pikmi_id, "likes"]
}
