use crate::omdb::{FetchError, MovieRecord};
use crate::scroll::{ScrollObserver, Viewport};
use crate::search::{SearchOutcome, normalize_term};
use crate::tasks::AppEvent;
use crate::view::{GenreFilter, GenreMatch, available_genres, effective_list, filtered_indices};

/// Which view is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,
    Detail,
}

/// Input mode for the search bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// User-visible problem reported by the last operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The startup catalog could not be fetched.
    LoadFailure,
    /// A search request failed at the network or decoding level.
    SearchFailure,
    /// The search went through but matched nothing.
    NoResults,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::LoadFailure => "Errore durante il caricamento dei film.",
            Notice::SearchFailure => "Errore durante la ricerca.",
            Notice::NoResults => "Nessun risultato trovato.",
        }
    }

    pub fn is_failure(self) -> bool {
        !matches!(self, Notice::NoResults)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Catalog,
    Search,
}

/// Identifies one request. Results carrying an outdated ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub kind: RequestKind,
    pub epoch: u64,
}

#[derive(Debug, Default)]
struct Epochs {
    catalog: u64,
    search: u64,
}

impl Epochs {
    fn next(&mut self, kind: RequestKind) -> Ticket {
        let epoch = match kind {
            RequestKind::Catalog => &mut self.catalog,
            RequestKind::Search => &mut self.search,
        };
        *epoch += 1;
        Ticket { kind, epoch: *epoch }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        let current = match ticket.kind {
            RequestKind::Catalog => self.catalog,
            RequestKind::Search => self.search,
        };
        current == ticket.epoch
    }
}

/// Main application state.
pub struct App {
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub show_help: bool,
    pub show_genre_picker: bool,

    catalog: Vec<MovieRecord>,
    search_results: Vec<MovieRecord>,
    pub search_term: String,
    genre_filter: GenreFilter,
    genre_match: GenreMatch,

    error: Option<Notice>,
    in_flight: usize,
    epochs: Epochs,

    // Derived from the collections and the filter on every change
    revision: u64,
    filtered_indices: Vec<usize>,
    genres: Vec<String>,

    // List view state
    pub selected: usize,
    pub genre_cursor: usize,
    pub list_height: usize,
    viewport: Viewport,
    scroll: ScrollObserver,

    // Detail view state
    pub detail_scroll: u16,
}

impl App {
    pub fn new(genre_match: GenreMatch, scroll_threshold_px: u32) -> Self {
        let viewport = Viewport::new();
        let scroll = viewport.subscribe(scroll_threshold_px);
        let mut app = Self {
            should_quit: false,
            screen: Screen::List,
            input_mode: InputMode::Normal,
            show_help: false,
            show_genre_picker: false,

            catalog: Vec::new(),
            search_results: Vec::new(),
            search_term: String::new(),
            genre_filter: GenreFilter::default(),
            genre_match,

            error: None,
            in_flight: 0,
            epochs: Epochs::default(),

            revision: 0,
            filtered_indices: Vec::new(),
            genres: Vec::new(),

            selected: 0,
            genre_cursor: 0,
            list_height: 20,
            viewport,
            scroll,

            detail_scroll: 0,
        };
        app.touch();
        app
    }

    // ── Derived state ──

    /// Record a state change and rebuild the derived lists.
    fn touch(&mut self) {
        self.revision += 1;
        let effective = effective_list(&self.catalog, &self.search_results);
        self.filtered_indices = filtered_indices(effective, &self.genre_filter, self.genre_match);
        self.genres = available_genres(effective)
            .into_iter()
            .map(str::to_string)
            .collect();
        self.clamp_selection();
    }

    /// Bumped on every observable change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn effective(&self) -> &[MovieRecord] {
        effective_list(&self.catalog, &self.search_results)
    }

    pub fn catalog(&self) -> &[MovieRecord] {
        &self.catalog
    }

    pub fn search_results(&self) -> &[MovieRecord] {
        &self.search_results
    }

    pub fn is_search_active(&self) -> bool {
        !self.search_results.is_empty()
    }

    pub fn effective_len(&self) -> usize {
        self.effective().len()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered_indices.len()
    }

    pub fn filtered_movies(&self) -> impl Iterator<Item = &MovieRecord> {
        let effective = self.effective();
        self.filtered_indices.iter().map(move |&i| &effective[i])
    }

    pub fn selected_movie(&self) -> Option<&MovieRecord> {
        let idx = *self.filtered_indices.get(self.selected)?;
        self.effective().get(idx)
    }

    /// Sentinel first, then genres of the shown list in first-seen order.
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn genre_filter(&self) -> &GenreFilter {
        &self.genre_filter
    }

    pub fn genre_match(&self) -> GenreMatch {
        self.genre_match
    }

    // ── Status ──

    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn error(&self) -> Option<Notice> {
        self.error
    }

    pub fn show_scroll_top(&self) -> bool {
        self.scroll.show_scroll_top()
    }

    pub fn scroll_offset_rows(&self) -> usize {
        self.viewport.offset_rows()
    }

    pub fn is_scrolling(&self) -> bool {
        self.viewport.is_animating()
    }

    // ── Catalog ──

    pub fn begin_catalog_load(&mut self) -> Ticket {
        let ticket = self.epochs.next(RequestKind::Catalog);
        self.in_flight += 1;
        self.revision += 1;
        tracing::info!(epoch = ticket.epoch, "catalog load started");
        ticket
    }

    /// Apply a finished catalog load. Returns false if the result was stale.
    pub fn finish_catalog_load(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<MovieRecord>, FetchError>,
    ) -> bool {
        if !self.epochs.is_current(ticket) {
            tracing::debug!(epoch = ticket.epoch, "discarding stale catalog load");
            return false;
        }
        match result {
            Ok(records) => {
                self.catalog = records;
                self.error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "catalog load failed");
                self.error = Some(Notice::LoadFailure);
            }
        }
        self.touch();
        true
    }

    // ── Search ──

    /// Start a search for the current term.
    ///
    /// Returns `None` and leaves every field untouched when the term is blank.
    pub fn begin_search(&mut self) -> Option<(Ticket, String)> {
        let term = normalize_term(&self.search_term)?.to_string();
        let ticket = self.epochs.next(RequestKind::Search);
        self.in_flight += 1;
        self.error = None;
        self.revision += 1;
        tracing::info!(epoch = ticket.epoch, term = %term, "search started");
        Some((ticket, term))
    }

    /// Apply a finished search. Returns false if the result was stale.
    pub fn finish_search(
        &mut self,
        ticket: Ticket,
        result: Result<SearchOutcome, FetchError>,
    ) -> bool {
        if !self.epochs.is_current(ticket) {
            tracing::debug!(epoch = ticket.epoch, "discarding stale search");
            return false;
        }
        match result {
            Ok(SearchOutcome::NoResults) => {
                self.search_results.clear();
                self.error = Some(Notice::NoResults);
                self.reset_list_position();
            }
            Ok(SearchOutcome::Found(records)) => {
                self.search_results = records;
                self.reset_list_position();
            }
            Err(e) => {
                tracing::error!(error = %e, term = %self.search_term, "search failed");
                self.error = Some(Notice::SearchFailure);
            }
        }
        self.touch();
        true
    }

    /// A request task ended, successfully or not.
    pub fn settle(&mut self, ticket: Ticket) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.revision += 1;
        tracing::trace!(?ticket, in_flight = self.in_flight, "request settled");
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::CatalogLoaded { ticket, result } => {
                self.finish_catalog_load(ticket, result);
            }
            AppEvent::SearchFinished { ticket, result } => {
                self.finish_search(ticket, result);
            }
            AppEvent::Settled(ticket) => self.settle(ticket),
        }
    }

    // ── Navigation ──

    /// Back to the startup catalog with no search and no filter.
    pub fn go_home(&mut self) {
        self.search_term.clear();
        self.search_results.clear();
        self.genre_filter = GenreFilter::default();
        self.error = None;
        // a search still in flight must not repopulate the list
        self.epochs.next(RequestKind::Search);
        self.input_mode = InputMode::Normal;
        self.screen = Screen::List;
        self.show_genre_picker = false;
        self.genre_cursor = 0;
        self.touch();
        self.scroll_to_top();
    }

    /// Smooth-scroll the list back to the first movie.
    pub fn scroll_to_top(&mut self) {
        self.selected = 0;
        self.viewport.scroll_to_top();
        self.revision += 1;
    }

    /// Advance animations and pick up scroll changes.
    pub fn tick(&mut self) {
        let animating = self.viewport.is_animating();
        self.viewport.tick();
        if self.scroll.refresh() || animating {
            self.revision += 1;
        }
    }

    pub fn set_genre_filter(&mut self, genre: GenreFilter) {
        tracing::debug!(genre = %genre, "genre filter changed");
        self.genre_filter = genre;
        self.selected = 0;
        self.viewport.scroll_to(0);
        self.touch();
    }

    /// Step through the available genres, wrapping around.
    pub fn cycle_genre(&mut self, delta: isize) {
        let len = self.genres.len() as isize;
        if len == 0 {
            return;
        }
        let current = self
            .genres
            .iter()
            .position(|g| g == self.genre_filter.as_str())
            .unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.set_genre_filter(GenreFilter::new(self.genres[next].clone()));
    }

    pub fn open_genre_picker(&mut self) {
        self.genre_cursor = self
            .genres
            .iter()
            .position(|g| g == self.genre_filter.as_str())
            .unwrap_or(0);
        self.show_genre_picker = true;
        self.revision += 1;
    }

    pub fn genre_picker_move(&mut self, delta: isize) {
        let len = self.genres.len();
        if len == 0 {
            return;
        }
        self.genre_cursor = (self.genre_cursor as isize + delta).clamp(0, len as isize - 1) as usize;
        self.revision += 1;
    }

    pub fn genre_picker_confirm(&mut self) {
        self.show_genre_picker = false;
        if let Some(genre) = self.genres.get(self.genre_cursor).cloned() {
            self.set_genre_filter(GenreFilter::new(genre));
        }
    }

    pub fn list_next(&mut self) {
        if self.selected + 1 < self.filtered_indices.len() {
            self.selected += 1;
            self.follow_selection();
        }
    }

    pub fn list_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.follow_selection();
        }
    }

    pub fn list_page_down(&mut self) {
        let last = self.filtered_indices.len().saturating_sub(1);
        self.selected = (self.selected + self.list_height.max(1)).min(last);
        self.follow_selection();
    }

    pub fn list_page_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.list_height.max(1));
        self.follow_selection();
    }

    pub fn list_last(&mut self) {
        self.selected = self.filtered_indices.len().saturating_sub(1);
        self.follow_selection();
    }

    /// Update the number of visible list rows after a resize.
    pub fn update_list_height(&mut self, rows: usize) {
        self.list_height = rows.max(1);
        self.follow_selection();
    }

    fn follow_selection(&mut self) {
        self.viewport.follow_row(self.selected, self.list_height);
        self.scroll.refresh();
        self.revision += 1;
    }

    fn reset_list_position(&mut self) {
        self.selected = 0;
        self.viewport.scroll_to(0);
        self.scroll.refresh();
    }

    fn clamp_selection(&mut self) {
        let len = self.filtered_indices.len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn open_detail(&mut self) {
        if self.selected_movie().is_some() {
            self.screen = Screen::Detail;
            self.detail_scroll = 0;
            self.revision += 1;
        }
    }

    pub fn close_detail(&mut self) {
        self.screen = Screen::List;
        self.revision += 1;
    }

    pub fn scroll_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }
}
