use log::{debug, info, warn};

use electoral_tally::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::tally::config_reader::*;
use crate::tally::fetch::DocumentSource;

pub mod config_reader;
pub mod fetch;
pub mod report;

#[derive(Debug, Snafu)]
pub enum TallyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error building the HTTP client"))]
    HttpClient { source: reqwest::Error },
    #[snafu(display("Error requesting the document for state {state}: {source}"))]
    HttpRequest {
        source: reqwest::Error,
        state: String,
    },
    #[snafu(display("Server returned status {status} for state {state}"))]
    HttpStatus { state: String, status: u16 },
    #[snafu(display("Error decoding the document for state {state}: {source}"))]
    HttpBody {
        source: reqwest::Error,
        state: String,
    },
    #[snafu(display("Error opening table file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display(""))]
    CsvWrite { source: csv::Error },
    #[snafu(display(""))]
    CsvFlush { source: std::io::Error },
    #[snafu(display("Error rendering chart {path}: {message}"))]
    Chart { path: String, message: String },
    #[snafu(display("Invalid feed source configuration: {message}"))]
    FeedSourceConfig { message: String },
    #[snafu(display("Difference detected between the tabulated summary and the reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type TallyResult<T> = Result<T, TallyError>;
pub type BTallyResult<T> = Result<T, Box<TallyError>>;

fn build_summary_js(config: &TallyConfig, result: &AggregateResult) -> JSValue {
    let mut tables: JSMap<String, JSValue> = JSMap::new();
    for cand in config.candidates.iter() {
        let mut states: JSMap<String, JSValue> = JSMap::new();
        if let Some(per_state) = result.table.get(&cand.candidate_id) {
            for state in config.states.iter() {
                if let Some(ev) = per_state.get(state) {
                    states.insert(state.clone(), json!(ev));
                }
            }
        }
        tables.insert(cand.candidate_id.clone(), JSValue::Object(states));
    }

    let skipped: Vec<JSValue> = result
        .skipped
        .iter()
        .map(|(state, reason)| {
            let (kind, detail) = match reason {
                SkipReason::FetchFailed(m) => ("fetchFailed", json!(m)),
                SkipReason::NoOutcome => ("noOutcome", JSValue::Null),
                SkipReason::UnknownWinner(w) => ("unknownWinner", json!(w)),
            };
            json!({"state": state, "reason": kind, "detail": detail})
        })
        .collect();

    json!({
        "config": {
            "contest": config.output_settings.contest_name,
            "office": config.target_race.office,
            "raceType": config.target_race.race_type,
        },
        "results": {
            "electoralVotes": tables,
            "skipped": skipped,
        }
    })
}

pub fn run_tally(args: &Args) -> BTallyResult<()> {
    let config = match args.config.clone() {
        Some(path) => read_config(path)?,
        None => default_config(),
    };
    debug!("run_tally: config: {:?}", config);
    check_config(&config)?;

    // A local directory of documents overrides the configured feed source.
    let feed_source = match args.input.clone() {
        Some(dir) => FeedSource {
            provider: "dir".to_string(),
            base_url: None,
            root_path: Some(dir),
            timeout_seconds: None,
        },
        None => config.feed_source.clone(),
    };
    let source = DocumentSource::from_config(&feed_source)?;

    let candidates = config.target_candidates();
    let selector = config.selector();
    let result = aggregate(
        &config.states,
        |state| source.fetch(state),
        &selector,
        &candidates,
    );
    info!(
        "run_tally: {} states contributed, {} skipped",
        config.states.len() - result.skipped.len(),
        result.skipped.len()
    );

    let rows = report::table_rows(&config.states, &config.candidates, &result.table);
    let table_path = config.output_settings.table_path();
    report::write_table(table_path.as_str(), &config.candidates, &rows)?;
    println!("Data saved to {}", table_path);
    println!("{}", report::table_header(&config.candidates).join(","));
    for row in rows.iter().take(20) {
        println!("{}", row.join(","));
    }

    let chart_path = config.output_settings.chart_path();
    report::render_chart(
        chart_path.as_str(),
        config.output_settings.contest_name.as_str(),
        &config.candidates,
        &config.states,
        &result.table,
    )?;

    // Assemble the final json
    let summary_js = build_summary_js(&config, &result);
    let pretty_js_stats = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;
    match args.out.as_deref() {
        Some("stdout") => println!("{}", pretty_js_stats),
        Some(path) => {
            fs::write(path, pretty_js_stats.as_bytes()).context(WritingFileSnafu { path })?;
            info!("Wrote summary to {:?}", path);
        }
        None => {}
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = args.reference.clone() {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            return Err(Box::new(TallyError::ReferenceMismatch {}));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tally::fetch::DocumentSource;

    fn test_config() -> TallyConfig {
        read_config("test_data/test_config.json".to_string()).unwrap()
    }

    fn run_fixture_aggregation(config: &TallyConfig) -> AggregateResult {
        let source = DocumentSource::from_config(&config.feed_source).unwrap();
        aggregate(
            &config.states,
            |state| source.fetch(state),
            &config.selector(),
            &config.target_candidates(),
        )
    }

    #[test]
    fn fixture_aggregation_matches_reference_summary() {
        let config = test_config();
        let result = run_fixture_aggregation(&config);
        let summary = build_summary_js(&config, &result);
        let reference =
            read_summary("test_data/test_expected_summary.json".to_string()).unwrap();
        assert_eq!(summary, reference);
    }

    #[test]
    fn fixture_aggregation_table() {
        let config = test_config();
        let result = run_fixture_aggregation(&config);
        assert_eq!(result.table.get("trump-d").unwrap().get("alpha"), Some(&11));
        assert_eq!(
            result.table.get("harris-k").unwrap().get("bravo"),
            Some(&19)
        );
        assert_eq!(
            result.skipped,
            vec![
                ("charlie".to_string(), SkipReason::NoOutcome),
                (
                    "delta".to_string(),
                    SkipReason::UnknownWinner("kennedy-r".to_string())
                ),
            ]
        );
    }

    #[test]
    fn fixture_aggregation_unit_summaries() {
        let source = DocumentSource::Dir {
            root: "test_data".to_string(),
        };
        let document = source.fetch("alpha").unwrap();
        let config = test_config();
        let outcome = extract_race(&document, &config.selector());
        assert_eq!(outcome.winner, Some("trump-d".to_string()));
        assert_eq!(outcome.electoral_votes, Some(11));

        let statewide = outcome.units.get("alpha-state").unwrap();
        assert_eq!(statewide.level, Some("state".to_string()));
        assert_eq!(statewide.leader, Some("trump-d".to_string()));
        assert_eq!(statewide.leader_votes, Some(83412));

        // Flagged as leading before any count was attached.
        let early = outcome.units.get("alpha-early-county").unwrap();
        assert_eq!(early.leader, Some("harris-k".to_string()));
        assert_eq!(early.leader_votes, None);
    }

    #[test]
    fn missing_and_malformed_documents_are_recorded_not_fatal() {
        let config = test_config();
        let source = DocumentSource::Dir {
            root: "test_data".to_string(),
        };
        let states: Vec<String> = ["alpha", "no-such-state", "broken", "bravo"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let result = aggregate(
            &states,
            |state| source.fetch(state),
            &config.selector(),
            &config.target_candidates(),
        );

        assert_eq!(result.table.get("trump-d").unwrap().get("alpha"), Some(&11));
        assert_eq!(
            result.table.get("harris-k").unwrap().get("bravo"),
            Some(&19)
        );
        assert_eq!(result.skipped.len(), 2);
        assert!(matches!(result.skipped[0].1, SkipReason::FetchFailed(_)));
        assert!(matches!(result.skipped[1].1, SkipReason::FetchFailed(_)));
    }

    #[test]
    fn exported_table_outer_joins_on_state() {
        let config = test_config();
        let result = run_fixture_aggregation(&config);
        let rows = report::table_rows(&config.states, &config.candidates, &result.table);
        assert_eq!(
            rows,
            vec![
                vec!["alpha".to_string(), "11".to_string(), "".to_string()],
                vec!["bravo".to_string(), "".to_string(), "19".to_string()],
            ]
        );

        let path = std::env::temp_dir().join("evtally_test_table.csv");
        let path_s = path.as_path().display().to_string();
        report::write_table(path_s.as_str(), &config.candidates, &rows).unwrap();
        let written = fs::read_to_string(path_s).unwrap();
        assert_eq!(
            written,
            "State,Trump Votes,Harris Votes\nalpha,11,\nbravo,,19\n"
        );
    }
}
