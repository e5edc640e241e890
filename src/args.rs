use clap::Parser;

/// This program aggregates statewide presidential results feeds into
/// per-candidate electoral vote totals.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON configuration describing the feed source, the list of states
    /// and the recognized candidates. If not provided, the built-in configuration for the 2024
    /// presidential general election is used.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the summary of an aggregation in JSON format. If
    /// provided, evtally will check that the aggregated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the aggregation will be written
    /// in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (directory path or empty) If specified, the per-state documents are read from this
    /// directory (one results-{state}.json file per state) instead of the configured feed source.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
