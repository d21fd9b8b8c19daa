//! Sections for the day-by-day itinerary.

use jiff::civil::Date;

use crate::model::{Journey, Pik};

use super::Section;

#[derive(Debug, Clone, PartialEq)]
pub struct PlanItem {
    pub pik: Pik,
    /// Position of the place within its day
    pub order: usize,
    pub is_last: bool,
    pub date: Date,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JourneyPlanItem {
    /// 1-based day label in the day picker
    DayTag { day: usize },
    Plan(PlanItem),
    /// A day with no places yet
    EmptyPlan { day_index: usize, date: Date },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JourneyPlanSectionKind {
    Day,
    Journey { day_index: usize },
}

pub type JourneyPlanSection = Section<JourneyPlanSectionKind, JourneyPlanItem>;

/// Build the day picker section followed by one section per day.
///
/// The day picker is omitted when the journey has no days. Every day section
/// has at least one item: an `EmptyPlan` stands in for a day without places.
pub fn plan_sections(journey: &Journey) -> Vec<JourneyPlanSection> {
    let mut sections = Vec::with_capacity(journey.pikidays.len() + 1);

    if !journey.pikidays.is_empty() {
        let day_items = (1..=journey.pikidays.len())
            .map(|day| JourneyPlanItem::DayTag { day })
            .collect();
        sections.push(Section::new(JourneyPlanSectionKind::Day, day_items));
    }

    for (day_index, pikiday) in journey.pikidays.iter().enumerate() {
        let date = journey.day_date(day_index);
        let items = if pikiday.pikis.is_empty() {
            vec![JourneyPlanItem::EmptyPlan { day_index, date }]
        } else {
            let last = pikiday.pikis.len() - 1;
            pikiday
                .pikis
                .iter()
                .enumerate()
                .map(|(order, pik)| {
                    JourneyPlanItem::Plan(PlanItem {
                        pik: pik.clone(),
                        order,
                        is_last: order == last,
                        date,
                    })
                })
                .collect()
        };
        sections.push(Section::new(
            JourneyPlanSectionKind::Journey { day_index },
            items,
        ));
    }

    sections
}
