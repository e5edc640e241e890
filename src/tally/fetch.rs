use crate::tally::*;

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// A provider of per-state result documents.
pub enum DocumentSource {
    Http {
        client: reqwest::blocking::Client,
        base_url: String,
    },
    Dir {
        root: String,
    },
}

impl DocumentSource {
    pub fn from_config(source: &FeedSource) -> BTallyResult<DocumentSource> {
        match source.provider.as_str() {
            "http" => {
                let base_url = source.base_url.clone().context(FeedSourceConfigSnafu {
                    message: "the http provider requires baseUrl",
                })?;
                let timeout = source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS);
                let client = reqwest::blocking::Client::builder()
                    .timeout(Duration::from_secs(timeout))
                    .build()
                    .context(HttpClientSnafu {})?;
                Ok(DocumentSource::Http { client, base_url })
            }
            "dir" => {
                let root = source.root_path.clone().context(FeedSourceConfigSnafu {
                    message: "the dir provider requires rootPath",
                })?;
                Ok(DocumentSource::Dir { root })
            }
            x => Err(Box::new(TallyError::FeedSourceConfig {
                message: format!("provider not implemented: {:?}", x),
            })),
        }
    }

    /// Retrieves one state's document. Failures come back as values, never
    /// as panics or aborts: the aggregation loop turns them into skip
    /// decisions.
    pub fn fetch(&self, state: &str) -> Result<ResultDocument, FetchFailure> {
        let res = match self {
            DocumentSource::Http { client, base_url } => fetch_http(client, base_url, state),
            DocumentSource::Dir { root } => fetch_dir(root, state),
        };
        res.map_err(|e| FetchFailure::new(e.to_string()))
    }
}

fn fetch_http(
    client: &reqwest::blocking::Client,
    base_url: &str,
    state: &str,
) -> BTallyResult<ResultDocument> {
    let url = format!("{}{}.json", base_url, state);
    info!("Fetching results for {:?} from {:?}", state, url);
    let response = client.get(&url).send().context(HttpRequestSnafu { state })?;
    let status = response.status();
    if !status.is_success() {
        return Err(Box::new(TallyError::HttpStatus {
            state: state.to_string(),
            status: status.as_u16(),
        }));
    }
    let document: ResultDocument = response.json().context(HttpBodySnafu { state })?;
    Ok(document)
}

fn fetch_dir(root: &str, state: &str) -> BTallyResult<ResultDocument> {
    let file_name = format!("results-{}.json", state);
    let p: PathBuf = [root, file_name.as_str()].iter().collect();
    let path = p.as_path().display().to_string();
    info!("Reading results for {:?} from {:?}", state, path);
    let contents = fs::read_to_string(path.clone()).context(OpeningJsonSnafu { path })?;
    let document: ResultDocument =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(document)
}
