//! Like-count ranking of candidate places.

use crate::model::Pik;

/// A candidate place as displayed in a ranked list.
#[derive(Debug, Clone, PartialEq)]
pub struct PikmiItem {
    pub pik: Pik,
    pub rank: usize,
    /// Whether the current user likes this place
    pub is_liked: bool,
    /// Displayed like count; diverges from `pik.like_count()` only while an
    /// optimistic toggle is waiting for the next fetch
    pub like_count: usize,
}

impl PikmiItem {
    /// Optimistically flip the like button before the server confirms.
    pub fn toggle_like(&self) -> Self {
        let mut next = self.clone();
        if next.is_liked {
            next.like_count = next.like_count.saturating_sub(1);
        } else {
            next.like_count += 1;
        }
        next.is_liked = !next.is_liked;
        next
    }
}

/// Rank candidate places by like count, most liked first.
///
/// The sort is stable, so equal counts keep their input order. Places the
/// current user liked share a rank when their counts tie, and the rank only
/// advances when the count changes; the first liked place is rank 0. Places
/// the user did not like are numbered by their position among the unliked
/// places (0, 1, 2, ...), without sharing.
pub fn rank_pikmis(pikmis: &[Pik], user_id: Option<&str>) -> Vec<PikmiItem> {
    let mut sorted: Vec<&Pik> = pikmis.iter().collect();
    sorted.sort_by(|a, b| b.like_count().cmp(&a.like_count()));

    let mut liked_rank: Option<usize> = None;
    let mut prev_count: Option<usize> = None;
    let mut unliked_index = 0;

    sorted
        .into_iter()
        .map(|pik| {
            let count = pik.like_count();
            let is_liked = user_id.is_some_and(|id| pik.is_liked_by(id));

            let rank = if is_liked {
                if prev_count != Some(count) {
                    liked_rank = Some(liked_rank.map_or(0, |r| r + 1));
                }
                prev_count = Some(count);
                liked_rank.unwrap_or(0)
            } else {
                let rank = unliked_index;
                unliked_index += 1;
                rank
            };

            PikmiItem {
                pik: pik.clone(),
                rank,
                is_liked,
                like_count: count,
            }
        })
        .collect()
}
