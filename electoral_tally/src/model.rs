// ********* Raw feed data structures ***********

use std::error::Error;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use std::collections::HashMap;

/// A statewide results document, as published by the upstream feed.
///
/// The field names mirror the wire format. Everything below the top level is
/// optional: the feeds are filled in progressively over an election night and
/// a document with most fields missing is a normal sight, not an error.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ResultDocument {
    #[serde(default)]
    pub races: Vec<Race>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Race {
    #[serde(rename = "type")]
    pub race_type: Option<String>,
    pub office: Option<String>,
    pub outcome: Option<Outcome>,
    #[serde(default)]
    pub reporting_units: Vec<ReportingUnit>,
}

/// The race-level declaration of a winner, once officially determined.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(default)]
    pub won: Vec<String>,
    // The feeds are not consistent about numeric types (numbers and numeric
    // strings both occur), so the count is kept as a raw value and read
    // leniently with read_count.
    pub electoral_votes: Option<JSValue>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ReportingUnit {
    #[serde(rename = "nyt_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub level: Option<String>,
    pub total_votes: Option<JSValue>,
    pub total_expected_vote: Option<JSValue>,
    // Candidate tallies are kept untyped: a malformed entry in one unit must
    // not abort the parse of the whole document.
    #[serde(default)]
    pub candidates: Vec<JSValue>,
}

// ******** Derived data structures *********

/// The per-reporting-unit digest assembled during race extraction.
///
/// leader is only present if some tally in the unit carries the leader flag;
/// leader_votes mirrors that tally's total, which may itself be missing
/// (a candidate can be flagged as leading before any count is attached).
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct UnitSummary {
    pub name: Option<String>,
    pub level: Option<String>,
    pub total_votes: Option<u64>,
    pub total_expected_votes: Option<u64>,
    pub leader: Option<String>,
    pub leader_votes: Option<u64>,
}

/// What one state's document says about the target race.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct StateOutcome {
    pub winner: Option<String>,
    pub electoral_votes: Option<u32>,
    pub units: HashMap<String, UnitSummary>,
}

/// A recognized target candidate. The set of candidates is configuration,
/// never derived from the documents.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Candidate {
    pub id: String,
    pub name: Option<String>,
}

/// The (office, race type) pair that selects the race of interest within a
/// document. Matching is exact and case-sensitive.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RaceSelector {
    pub office: String,
    pub race_type: String,
}

/// A failed document retrieval, carried as a value rather than raised.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FetchFailure {
    pub message: String,
}

impl FetchFailure {
    pub fn new<S: Into<String>>(message: S) -> FetchFailure {
        FetchFailure {
            message: message.into(),
        }
    }
}

impl Error for FetchFailure {}

impl Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Why a state contributed nothing to the table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SkipReason {
    /// The document could not be retrieved or parsed.
    FetchFailed(String),
    /// No declared winner or electoral vote count yet.
    NoOutcome,
    /// The declared winner is not among the recognized candidates.
    UnknownWinner(String),
}

/// The aggregation artifact: electoral votes per candidate per state, plus
/// the ledger of states that were skipped and why.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AggregateResult {
    pub table: HashMap<String, HashMap<String, u32>>,
    pub skipped: Vec<(String, SkipReason)>,
}
