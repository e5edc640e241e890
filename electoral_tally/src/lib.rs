mod model;
use log::{debug, info, warn};

pub mod manual;

use std::collections::HashMap;

use serde_json::Value as JSValue;

pub use crate::model::*;

/// Lenient read of a vote-like count.
///
/// The upstream feeds serialize counts as JSON numbers or as numeric strings
/// depending on the state and the race. Anything else reads as absent.
pub fn read_count(x: Option<&JSValue>) -> Option<u64> {
    match x {
        Some(JSValue::Number(n)) => n.as_u64(),
        Some(JSValue::String(s)) => s.parse::<u64>().ok(),
        _ => None,
    }
}

// The leader flag is a boolean in most documents but some states publish it
// as 0/1. Absent, null or anything unrecognized is not leading.
fn is_leading(entry: &JSValue) -> bool {
    match entry.get("leader") {
        Some(JSValue::Bool(b)) => *b,
        Some(JSValue::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    }
}

/// Finds the candidate currently ahead within one reporting unit.
///
/// Scans the tallies in document order and returns the id and vote total of
/// the first entry carrying the leader flag. A missing vote total is not an
/// error: a candidate can be flagged as leading before any count is attached,
/// in which case the total is `None`. If no entry is flagged, both sides are
/// `None`. Entries missing the expected fields are treated as not leading, so
/// a malformed tally never aborts the scan.
pub fn resolve_leader(candidates: &[JSValue]) -> (Option<String>, Option<u64>) {
    for entry in candidates.iter() {
        if !is_leading(entry) {
            continue;
        }
        match entry.get("nyt_id").and_then(|v| v.as_str()) {
            Some(id) => {
                let total = read_count(entry.get("votes").and_then(|v| v.get("total")));
                return (Some(id.to_string()), total);
            }
            None => {
                debug!("resolve_leader: leading entry without an id: {:?}", entry);
            }
        }
    }
    (None, None)
}

/// Extracts the target race's outcome and per-unit digests from a document.
///
/// The first race whose (type, office) pair matches the selector exactly is
/// used and the scan stops there. No matching race yields an all-empty
/// outcome: that is a state with no data for the target office yet, not an
/// error. A matching race without a declared outcome still gets its unit
/// summaries populated, since partial results are a normal sight while
/// counting is in progress.
pub fn extract_race(document: &ResultDocument, selector: &RaceSelector) -> StateOutcome {
    for race in document.races.iter() {
        let matches = race.race_type.as_deref() == Some(selector.race_type.as_str())
            && race.office.as_deref() == Some(selector.office.as_str());
        if !matches {
            continue;
        }
        debug!(
            "extract_race: matched race office {:?} with {} reporting units",
            race.office,
            race.reporting_units.len()
        );

        let winner = race.outcome.as_ref().and_then(|o| o.won.first().cloned());
        let electoral_votes = race
            .outcome
            .as_ref()
            .and_then(|o| read_count(o.electoral_votes.as_ref()))
            .and_then(|v| u32::try_from(v).ok());

        let mut units: HashMap<String, UnitSummary> = HashMap::new();
        for unit in race.reporting_units.iter() {
            let unit_id = match &unit.id {
                Some(id) => id.clone(),
                None => {
                    debug!("extract_race: skipping reporting unit without an id");
                    continue;
                }
            };
            let (leader, leader_votes) = resolve_leader(&unit.candidates);
            // Duplicate unit ids overwrite earlier entries. The producers are
            // not expected to emit duplicates but the extraction must not
            // fail if they do.
            units.insert(
                unit_id,
                UnitSummary {
                    name: unit.name.clone(),
                    level: unit.level.clone(),
                    total_votes: read_count(unit.total_votes.as_ref()),
                    total_expected_votes: read_count(unit.total_expected_vote.as_ref()),
                    leader,
                    leader_votes,
                },
            );
        }

        return StateOutcome {
            winner,
            electoral_votes,
            units,
        };
    }
    StateOutcome::default()
}

/// Drives the pipeline across all states and folds the declared outcomes
/// into a per-candidate, per-state electoral vote table.
///
/// States are processed strictly in input order, one at a time. A fetch
/// failure, a state without a declared outcome, or a winner outside the
/// recognized candidate set each skip that state and record the reason;
/// none of them aborts the run. Every recorded value is an exact copy of the
/// document's declared electoral vote count.
pub fn aggregate<F>(
    states: &[String],
    mut fetch: F,
    selector: &RaceSelector,
    candidates: &[Candidate],
) -> AggregateResult
where
    F: FnMut(&str) -> Result<ResultDocument, FetchFailure>,
{
    info!(
        "aggregate: processing {} states for office {:?} ({:?})",
        states.len(),
        selector.office,
        selector.race_type
    );
    for c in candidates.iter() {
        info!("aggregate: candidate: {}", c.id);
    }

    let mut table: HashMap<String, HashMap<String, u32>> = candidates
        .iter()
        .map(|c| (c.id.clone(), HashMap::new()))
        .collect();
    let mut skipped: Vec<(String, SkipReason)> = Vec::new();

    for state in states.iter() {
        let document = match fetch(state) {
            Ok(d) => d,
            Err(failure) => {
                warn!("aggregate: state {}: fetch failed: {}", state, failure);
                skipped.push((state.clone(), SkipReason::FetchFailed(failure.message)));
                continue;
            }
        };

        let outcome = extract_race(&document, selector);
        debug!(
            "aggregate: state {}: winner {:?} electoral votes {:?} units {:?}",
            state,
            outcome.winner,
            outcome.electoral_votes,
            outcome.units.len()
        );

        let (winner, electoral_votes) = match (outcome.winner, outcome.electoral_votes) {
            (Some(w), Some(ev)) => (w, ev),
            _ => {
                info!("aggregate: state {}: no declared outcome yet", state);
                skipped.push((state.clone(), SkipReason::NoOutcome));
                continue;
            }
        };

        match table.get_mut(&winner) {
            Some(per_state) => {
                info!(
                    "aggregate: state {}: {} wins {} electoral votes",
                    state, winner, electoral_votes
                );
                per_state.insert(state.clone(), electoral_votes);
            }
            None => {
                warn!(
                    "aggregate: state {}: winner {:?} is not a recognized candidate, skipping",
                    state, winner
                );
                skipped.push((state.clone(), SkipReason::UnknownWinner(winner)));
            }
        }
    }

    AggregateResult { table, skipped }
}
