pub mod loader;
pub mod paginate;
pub mod profile;
pub mod query;
pub mod record;
pub mod session;

use thiserror::Error;

pub use loader::{Loader, LoaderOptions, Source};
pub use paginate::{paginate, Page};
pub use profile::{CatalogueKind, CatalogueProfile, RankField, RankOrder, SearchField, SortKey};
pub use query::{query, QueryState};
pub use record::{normalize, CatalogueRecord, RawRecord, Tokenomics};
pub use session::{LoadOutcome, LoadState, LoadTicket, Session, View};

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("invalid catalogue source '{source_ref}': {message}")]
    InvalidSource { source_ref: String, message: String },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalogue from {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },
}

impl CatalogueError {
    /// Network and status failures are worth a manual reload; parse errors
    /// are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Status { .. })
    }
}

/// A loaded, normalized catalogue. Records keep their load order for the
/// lifetime of the value.
#[derive(Clone, Debug)]
pub struct Catalogue {
    profile: CatalogueProfile,
    records: Vec<CatalogueRecord>,
}

impl Catalogue {
    pub fn from_raw(profile: CatalogueProfile, raw: Vec<RawRecord>) -> Self {
        let records = raw
            .into_iter()
            .enumerate()
            .map(|(i, r)| normalize(r, i, &profile))
            .collect();
        Self { profile, records }
    }

    pub fn empty(profile: CatalogueProfile) -> Self {
        Self {
            profile,
            records: Vec::new(),
        }
    }

    pub fn profile(&self) -> &CatalogueProfile {
        &self.profile
    }

    pub fn records(&self) -> &[CatalogueRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn query(&self, state: &QueryState) -> Vec<&CatalogueRecord> {
        query::query(&self.records, state, &self.profile)
    }

    pub fn categories(&self) -> Vec<&str> {
        query::categories(&self.records, &self.profile)
    }
}
