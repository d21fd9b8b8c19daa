//! Sections for editing one day's route.

use crate::model::Pik;

use super::{Section, or_placeholder};

#[derive(Debug, Clone, PartialEq)]
pub enum RouteItem {
    Route { pik: Pik, order: usize },
    /// The day has no places yet
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PikmiRouteItem {
    pub pik: Pik,
    /// Already placed on this day's route
    pub is_selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSectionKind {
    Route,
    PikmiRoute,
}

pub type RouteSection<I> = Section<RouteSectionKind, I>;

pub fn route_sections(route: &[Pik]) -> Vec<RouteSection<RouteItem>> {
    let items = route
        .iter()
        .enumerate()
        .map(|(order, pik)| RouteItem::Route {
            pik: pik.clone(),
            order,
        })
        .collect();
    vec![Section::new(
        RouteSectionKind::Route,
        or_placeholder(items, || RouteItem::Empty),
    )]
}

/// Candidate places to pick from, marking those already on the route.
pub fn pikmi_route_sections(pikmis: &[Pik], route: &[Pik]) -> Vec<RouteSection<PikmiRouteItem>> {
    let items = pikmis
        .iter()
        .map(|pik| PikmiRouteItem {
            pik: pik.clone(),
            is_selected: route.iter().any(|r| r.id == pik.id),
        })
        .collect();
    vec![Section::new(RouteSectionKind::PikmiRoute, items)]
}
