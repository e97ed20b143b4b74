//! Maximum-information item selection.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use crate::quiz::error::QuizResult;
use crate::quiz::modeling::irt::information_unchecked;
use crate::quiz::types::{AbilityEstimate, CandidateItem};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate<'a> {
    pub item: &'a CandidateItem,
    pub information: f64,
}

/// Higher information first; equal information falls back to the smaller id.
fn rank_order(a: &RankedCandidate<'_>, b: &RankedCandidate<'_>) -> Ordering {
    b.information
        .total_cmp(&a.information)
        .then_with(|| a.item.id.cmp(&b.item.id))
}

fn unanswered<'a>(
    available: &'a [CandidateItem],
    ability: &'a AbilityEstimate,
    answered_ids: &'a HashSet<String>,
) -> impl Iterator<Item = QuizResult<RankedCandidate<'a>>> + 'a {
    available
        .iter()
        .filter(move |item| !answered_ids.contains(&item.id))
        .map(move |item| {
            item.params.validate()?;
            Ok(RankedCandidate {
                item,
                information: information_unchecked(ability.theta, &item.params),
            })
        })
}

/// Every unanswered candidate with its information at the current theta,
/// best first.
pub fn rank_candidates<'a>(
    available: &'a [CandidateItem],
    ability: &'a AbilityEstimate,
    answered_ids: &'a HashSet<String>,
) -> QuizResult<Vec<RankedCandidate<'a>>> {
    let mut ranked = unanswered(available, ability, answered_ids).collect::<QuizResult<Vec<_>>>()?;
    ranked.sort_by(rank_order);
    Ok(ranked)
}

/// `None` means the pool is exhausted.
pub fn select_next_question<'a>(
    available: &'a [CandidateItem],
    ability: &AbilityEstimate,
    answered_ids: &HashSet<String>,
) -> QuizResult<Option<&'a CandidateItem>> {
    let mut best: Option<RankedCandidate<'a>> = None;
    for item in available.iter().filter(|item| !answered_ids.contains(&item.id)) {
        item.params.validate()?;
        let candidate = RankedCandidate {
            item,
            information: information_unchecked(ability.theta, &item.params),
        };
        best = match best {
            Some(current) if rank_order(&current, &candidate) != Ordering::Greater => {
                Some(current)
            }
            _ => Some(candidate),
        };
    }
    Ok(best.map(|ranked| ranked.item))
}
