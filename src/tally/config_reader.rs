use crate::tally::*;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "tableFileName")]
    pub table_file_name: Option<String>,
    #[serde(rename = "chartFileName")]
    pub chart_file_name: Option<String>,
}

impl OutputSettings {
    pub fn table_path(&self) -> String {
        self.join(self.table_file_name.as_deref().unwrap_or("election_results.csv"))
    }

    pub fn chart_path(&self) -> String {
        self.join(self.chart_file_name.as_deref().unwrap_or("election_results.png"))
    }

    fn join(&self, file_name: &str) -> String {
        match &self.output_directory {
            Some(dir) => {
                let p: PathBuf = [dir.as_str(), file_name].iter().collect();
                p.as_path().display().to_string()
            }
            None => file_name.to_string(),
        }
    }
}

/// Where the per-state documents come from: the live feed over HTTP, or a
/// directory of previously downloaded documents.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FeedSource {
    pub provider: String,
    #[serde(rename = "baseUrl")]
    pub base_url: Option<String>,
    #[serde(rename = "rootPath")]
    pub root_path: Option<String>,
    #[serde(rename = "timeoutSeconds")]
    pub timeout_seconds: Option<u64>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSpec {
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub color: Option<String>,
}

impl CandidateSpec {
    pub fn label(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| self.candidate_id.clone())
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TargetRace {
    pub office: String,
    #[serde(rename = "raceType")]
    pub race_type: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TallyConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "feedSource")]
    pub feed_source: FeedSource,
    #[serde(rename = "targetRace")]
    pub target_race: TargetRace,
    pub candidates: Vec<CandidateSpec>,
    pub states: Vec<String>,
}

impl TallyConfig {
    pub fn selector(&self) -> RaceSelector {
        RaceSelector {
            office: self.target_race.office.clone(),
            race_type: self.target_race.race_type.clone(),
        }
    }

    pub fn target_candidates(&self) -> Vec<Candidate> {
        self.candidates
            .iter()
            .map(|c| Candidate {
                id: c.candidate_id.clone(),
                name: c.display_name.clone(),
            })
            .collect()
    }
}

/// Rejects configurations the pipeline cannot do anything useful with.
pub fn check_config(config: &TallyConfig) -> TallyResult<()> {
    if config.candidates.is_empty() {
        whatever!("no recognized candidates in the configuration");
    }
    if config.states.is_empty() {
        whatever!("no states in the configuration");
    }
    Ok(())
}

pub fn read_config(path: String) -> BTallyResult<TallyConfig> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let config: TallyConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: String) -> BTallyResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// The built-in configuration: the 2024 presidential general election over
/// the public statewide feeds.
pub fn default_config() -> TallyConfig {
    let states = [
        "alabama",
        "alaska",
        "arizona",
        "arkansas",
        "california",
        "colorado",
        "connecticut",
        "delaware",
        "florida",
        "georgia",
        "hawaii",
        "idaho",
        "illinois",
        "indiana",
        "iowa",
        "kansas",
        "kentucky",
        "louisiana",
        "maine",
        "maryland",
        "massachusetts",
        "michigan",
        "minnesota",
        "mississippi",
        "missouri",
        "montana",
        "nebraska",
        "nevada",
        "new-hampshire",
        "new-jersey",
        "new-mexico",
        "new-york",
        "north-carolina",
        "north-dakota",
        "ohio",
        "oklahoma",
        "oregon",
        "pennsylvania",
        "rhode-island",
        "south-carolina",
        "south-dakota",
        "tennessee",
        "texas",
        "utah",
        "vermont",
        "virginia",
        "washington",
        "west-virginia",
        "wisconsin",
        "wyoming",
    ];
    TallyConfig {
        output_settings: OutputSettings {
            contest_name: "2024 presidential general election".to_string(),
            output_directory: None,
            table_file_name: None,
            chart_file_name: None,
        },
        feed_source: FeedSource {
            provider: "http".to_string(),
            base_url: Some(
                "https://static01.nyt.com/elections-assets/pages/data/2024-11-05/results-"
                    .to_string(),
            ),
            root_path: None,
            timeout_seconds: None,
        },
        target_race: TargetRace {
            office: "President".to_string(),
            race_type: "General".to_string(),
        },
        candidates: vec![
            CandidateSpec {
                candidate_id: "trump-d".to_string(),
                display_name: Some("Trump".to_string()),
                color: Some("red".to_string()),
            },
            CandidateSpec {
                candidate_id: "harris-k".to_string(),
                display_name: Some("Harris".to_string()),
                color: Some("blue".to_string()),
            },
        ],
        states: states.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_complete() {
        let config = default_config();
        assert_eq!(config.states.len(), 50);
        assert_eq!(config.states.first().map(|s| s.as_str()), Some("alabama"));
        assert_eq!(config.states.last().map(|s| s.as_str()), Some("wyoming"));
        assert_eq!(config.candidates.len(), 2);
        assert_eq!(config.selector().office, "President");
        assert!(check_config(&config).is_ok());
    }

    #[test]
    fn output_paths_honor_the_output_directory() {
        let mut config = default_config();
        assert_eq!(config.output_settings.table_path(), "election_results.csv");
        config.output_settings.output_directory = Some("out".to_string());
        assert_eq!(
            config.output_settings.table_path(),
            "out/election_results.csv"
        );
        assert_eq!(
            config.output_settings.chart_path(),
            "out/election_results.png"
        );
    }

    #[test]
    fn empty_candidate_list_is_rejected() {
        let mut config = default_config();
        config.candidates.clear();
        assert!(check_config(&config).is_err());
    }
}
