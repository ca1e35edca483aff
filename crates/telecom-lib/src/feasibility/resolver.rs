use std::collections::BTreeSet;

use serde::Serialize;

use crate::inventory::Technology;

use super::{Candidate, FALLBACK_TECHNOLOGY, SERVICE_RADIUS_M, TECHNOLOGY_PRIORITY};

/// Terminal state of a feasibility query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// No eligible object exists anywhere.
    NoCandidates,
    /// Eligible objects exist, but none within the service radius.
    OutOfRange,
    /// At least one eligible object lies within the service radius.
    InRange,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::NoCandidates => "no_candidates",
            Outcome::OutOfRange => "out_of_range",
            Outcome::InRange => "in_range",
        }
    }
}

/// Result of applying the radius and technology policy to ranked candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict<'a> {
    pub outcome: Outcome,
    /// Ranked candidates as supplied, nearest first.
    pub ranked: Vec<Candidate<'a>>,
    /// Candidates within [`SERVICE_RADIUS_M`], nearest first.
    pub in_range: Vec<Candidate<'a>>,
    /// Technology offered at the query point, only set when in range.
    pub technology: Option<Technology>,
}

impl<'a> Verdict<'a> {
    pub fn available(&self) -> bool {
        self.outcome == Outcome::InRange
    }

    /// Serving object when available, otherwise the nearest reference point
    /// for new cabling.
    pub fn nearest(&self) -> Option<&Candidate<'a>> {
        match self.outcome {
            Outcome::InRange => self.in_range.first(),
            Outcome::OutOfRange => self.ranked.first(),
            Outcome::NoCandidates => None,
        }
    }
}

/// Apply the service-radius and technology policy to ranked candidates.
///
/// `ranked` is expected in ascending distance order, as produced by
/// [`rank`](super::rank). The radius check is inclusive.
pub fn resolve(ranked: Vec<Candidate<'_>>) -> Verdict<'_> {
    let in_range: Vec<Candidate<'_>> = ranked
        .iter()
        .filter(|candidate| candidate.distance_m <= SERVICE_RADIUS_M)
        .copied()
        .collect();

    let outcome = if !in_range.is_empty() {
        Outcome::InRange
    } else if !ranked.is_empty() {
        Outcome::OutOfRange
    } else {
        Outcome::NoCandidates
    };

    let technology = match outcome {
        Outcome::InRange => resolve_technology(&in_range),
        _ => None,
    };

    Verdict {
        outcome,
        ranked,
        in_range,
        technology,
    }
}

/// Pick the single technology reported for a set of in-range candidates.
///
/// GPON wins over ADSL. When neither is present but some candidate carries a
/// technology (Ethernet or Hybrid), Ethernet is reported. Candidates without a
/// technology are ignored; if none carries one the result is `None`.
pub fn resolve_technology(candidates: &[Candidate<'_>]) -> Option<Technology> {
    let present: BTreeSet<Technology> = candidates
        .iter()
        .filter_map(|candidate| candidate.object.technology)
        .collect();

    if present.is_empty() {
        return None;
    }

    TECHNOLOGY_PRIORITY
        .into_iter()
        .find(|technology| present.contains(technology))
        .or(Some(FALLBACK_TECHNOLOGY))
}
