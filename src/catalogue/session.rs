use tracing::{debug, warn};

use super::paginate::{paginate, Page};
use super::profile::{CatalogueProfile, SortKey};
use super::query::QueryState;
use super::record::{CatalogueRecord, RawRecord};
use super::{Catalogue, CatalogueError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Identifies one load request. Only the most recently issued ticket may
/// replace the catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { records: usize },
    Failed,
    Stale,
}

/// What the render cycle draws: the current page plus the state it was
/// computed from.
#[derive(Clone, Debug)]
pub struct View<'a> {
    pub page: Page<&'a CatalogueRecord>,
    pub state: QueryState,
    pub load: LoadState,
    pub page_size: usize,
}

/// Owns a catalogue and the query state driving it. All state changes go
/// through here so that filter changes always land back on page 1.
#[derive(Debug)]
pub struct Session {
    catalogue: Catalogue,
    state: QueryState,
    load: LoadState,
    generation: u64,
}

impl Session {
    pub fn new(profile: CatalogueProfile) -> Self {
        let state = QueryState::for_profile(&profile);
        Self {
            catalogue: Catalogue::empty(profile),
            state,
            load: LoadState::Loading,
            generation: 0,
        }
    }

    pub fn with_catalogue(catalogue: Catalogue) -> Self {
        let state = QueryState::for_profile(catalogue.profile());
        Self {
            catalogue,
            state,
            load: LoadState::Ready,
            generation: 0,
        }
    }

    pub fn profile(&self) -> &CatalogueProfile {
        self.catalogue.profile()
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.load = LoadState::Loading;
        LoadTicket(self.generation)
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<RawRecord>, CatalogueError>,
    ) -> LoadOutcome {
        if ticket.0 != self.generation {
            debug!(
                "dropping stale load result (ticket {}, current {})",
                ticket.0, self.generation
            );
            return LoadOutcome::Stale;
        }
        match result {
            Ok(raw) => {
                let profile = self.catalogue.profile().clone();
                self.catalogue = Catalogue::from_raw(profile, raw);
                self.load = LoadState::Ready;
                LoadOutcome::Applied {
                    records: self.catalogue.len(),
                }
            }
            Err(e) => {
                if e.is_transient() {
                    warn!("catalogue load failed, a reload may succeed: {}", e);
                } else {
                    warn!("catalogue load failed: {}", e);
                }
                self.load = LoadState::Failed(e.to_string());
                LoadOutcome::Failed
            }
        }
    }

    pub fn set_text(&mut self, text: &str) {
        self.state.text = text.to_string();
        self.state.page = 1;
    }

    pub fn set_category(&mut self, category: Option<&str>) {
        self.state.category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        self.state.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.state.sort = sort;
        self.state.page = 1;
    }

    pub fn reset(&mut self) {
        self.state = QueryState::for_profile(self.catalogue.profile());
    }

    pub fn select_page(&mut self, page: usize) {
        self.state.page = page.clamp(1, self.total_pages());
    }

    pub fn next_page(&mut self) {
        self.select_page(self.state.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.select_page(self.state.page.saturating_sub(1));
    }

    pub fn total_pages(&self) -> usize {
        let filtered = self.catalogue.query(&self.state).len();
        super::paginate::total_pages(filtered, self.profile().page_size)
    }

    pub fn view(&self) -> View<'_> {
        let filtered = self.catalogue.query(&self.state);
        let page_size = self.profile().page_size;
        let page = paginate(&filtered, page_size, self.state.page);
        let mut state = self.state.clone();
        state.page = page.page;
        View {
            page,
            state,
            load: self.load.clone(),
            page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_named(names: &[&str]) -> Vec<RawRecord> {
        names
            .iter()
            .map(|n| RawRecord {
                name: Some(n.to_string()),
                ..RawRecord::default()
            })
            .collect()
    }

    #[test]
    fn new_session_starts_loading() {
        let session = Session::new(CatalogueProfile::projects());
        assert_eq!(session.load_state(), &LoadState::Loading);
        assert!(session.view().page.is_empty());
    }

    #[test]
    fn page_navigation_stays_in_range() {
        let mut profile = CatalogueProfile::projects();
        profile.page_size = 2;
        let mut session = Session::new(profile);
        let ticket = session.begin_load();
        session.finish_load(ticket, Ok(raw_named(&["a", "b", "c"])));
        session.prev_page();
        assert_eq!(session.state().page, 1);
        session.next_page();
        session.next_page();
        assert_eq!(session.state().page, 2);
    }

    #[test]
    fn reset_restores_profile_sort() {
        let mut session = Session::new(CatalogueProfile::coins());
        session.set_sort(SortKey::Alphabetical);
        session.set_text("btc");
        session.reset();
        assert_eq!(session.state().sort, SortKey::Rank);
        assert!(session.state().text.is_empty());
    }
}
