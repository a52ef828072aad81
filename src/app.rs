//! App state and core application logic
//!
//! Manages the route history, per-section carousels, the detail overlay,
//! and coordinates between terminal input and catalog fetches.
//!
//! The app never awaits anything itself: data needs are queued as `Effect`s,
//! the event loop runs them on tokio tasks, and results come back as
//! `AppEvent`s.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::api::{Catalog, CatalogQuery, TmdbError};
use crate::carousel::{Breakpoints, CarouselController, DragGesture, Motion, Transition};
use crate::models::{CatalogItem, CatalogPage, ItemDetail, MediaType, MovieList, RelatedKind, TvList};
use crate::routes::{DetailRef, History, Route, Section};

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
}

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for async operations
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadingState {
    /// Idle - nothing requested yet, or data present
    #[default]
    Idle,
    /// Loading with optional message
    Loading(Option<String>),
    /// The record does not exist upstream
    NotFound,
    /// Error with message
    Error(String),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadingState::Error(_) | LoadingState::NotFound)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadingState::Loading(Some(msg)) => Some(msg),
            LoadingState::Error(msg) => Some(msg),
            LoadingState::NotFound => Some("Not found"),
            _ => None,
        }
    }
}

impl From<&FetchFailure> for LoadingState {
    fn from(failure: &FetchFailure) -> Self {
        match failure {
            FetchFailure::NotFound => LoadingState::NotFound,
            FetchFailure::Failed(msg) => LoadingState::Error(msg.clone()),
        }
    }
}

// =============================================================================
// Effects and Events
// =============================================================================

/// Why a fetch did not produce data
#[derive(Debug, Clone, PartialEq)]
pub enum FetchFailure {
    NotFound,
    Failed(String),
}

impl FetchFailure {
    pub fn from_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<TmdbError>() {
            Some(e) if e.is_not_found() => FetchFailure::NotFound,
            _ => FetchFailure::Failed(err.to_string()),
        }
    }
}

/// Work the event loop must perform on the app's behalf
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch a catalog page; `refresh` drops any cached copy first
    FetchPage { query: CatalogQuery, refresh: bool },
    /// Fetch a detail record
    FetchDetail {
        media: MediaType,
        id: String,
        refresh: bool,
    },
}

/// Results delivered back to the app
#[derive(Debug, Clone)]
pub enum AppEvent {
    PageLoaded {
        query: CatalogQuery,
        result: Result<CatalogPage, FetchFailure>,
    },
    DetailLoaded {
        media: MediaType,
        id: String,
        result: Result<ItemDetail, FetchFailure>,
    },
}

/// Perform one effect against the catalog and describe the outcome
pub async fn run_effect(catalog: &Catalog, effect: Effect) -> AppEvent {
    match effect {
        Effect::FetchPage { query, refresh } => {
            if refresh {
                catalog.invalidate(&query);
            }
            let result = catalog
                .page(&query)
                .await
                .map_err(|e| FetchFailure::from_error(&e));
            AppEvent::PageLoaded { query, result }
        }
        Effect::FetchDetail { media, id, refresh } => {
            if refresh {
                catalog.invalidate_detail(media, &id);
            }
            let result = catalog
                .detail(media, &id)
                .await
                .map_err(|e| FetchFailure::from_error(&e));
            AppEvent::DetailLoaded { media, id, result }
        }
    }
}

// =============================================================================
// Carousel State
// =============================================================================

/// One paged carousel: data, paging controller, strip animation and pointer state
#[derive(Debug, Clone)]
pub struct CarouselState {
    /// Stable id used as the `list` route parameter
    pub id: String,
    pub title: String,
    pub query: CatalogQuery,
    pub items: Vec<CatalogItem>,
    pub loading: LoadingState,
    pub controller: CarouselController,
    pub motion: Motion,
    pub gesture: DragGesture,
    /// Absolute index of the highlighted item
    pub selected: usize,
}

impl CarouselState {
    pub fn new(id: impl Into<String>, title: impl Into<String>, query: CatalogQuery) -> Self {
        let breakpoints = Breakpoints::CELLS;
        Self {
            id: id.into(),
            title: title.into(),
            query,
            items: Vec::new(),
            loading: LoadingState::Idle,
            controller: CarouselController::new(0, breakpoints),
            motion: Motion::at_rest(0.0, Instant::now()),
            gesture: DragGesture::new(breakpoints.drag_threshold),
            selected: 0,
        }
    }

    /// Install fetched items and re-snap to a valid page
    pub fn set_items(&mut self, items: Vec<CatalogItem>) {
        self.items = items;
        self.loading = LoadingState::Idle;
        let t = self.controller.set_total_items(self.items.len());
        self.apply(t);
    }

    pub fn selected_item(&self) -> Option<&CatalogItem> {
        self.items.get(self.selected)
    }

    pub fn current_page(&self) -> usize {
        self.controller.current_page()
    }

    /// Strip offset to draw right now
    pub fn strip_offset(&self) -> f64 {
        self.motion.offset_at(Instant::now())
    }

    pub fn is_animating(&self) -> bool {
        !self.motion.is_settled(Instant::now())
    }

    pub fn advance(&mut self) {
        let t = self.controller.advance();
        self.apply(t);
    }

    pub fn retreat(&mut self) {
        let t = self.controller.retreat();
        self.apply(t);
    }

    pub fn jump_to(&mut self, page: usize) -> bool {
        match self.controller.jump_to(page) {
            Some(t) => {
                self.apply(t);
                true
            }
            None => false,
        }
    }

    /// Feed a measured width; only real changes reach the controller
    pub fn observe_width(&mut self, width: f64) {
        if (width - self.controller.page_width()).abs() > f64::EPSILON {
            debug!(carousel = %self.id, width, "carousel resized");
            let t = self.controller.on_resize(width);
            self.apply(t);
        }
    }

    /// Move the highlight right, advancing the page at its edge
    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let range = self.controller.page_range(self.current_page());
        if self.selected + 1 < range.end {
            self.selected += 1;
        } else {
            self.advance();
            self.selected = self.controller.page_range(self.current_page()).start;
        }
    }

    /// Move the highlight left, retreating the page at its edge
    pub fn select_prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let range = self.controller.page_range(self.current_page());
        if self.selected > range.start {
            self.selected -= 1;
        } else {
            self.retreat();
            let range = self.controller.page_range(self.current_page());
            self.selected = range.end.saturating_sub(1).max(range.start);
        }
    }

    pub fn pointer_down(&mut self, x: f64) {
        self.gesture.pointer_down(x);
    }

    /// Let the strip follow the pointer while pressed
    pub fn pointer_drag(&mut self, x: f64) {
        if let Some(delta) = self.gesture.pointer_move(x) {
            let offset = self.controller.resting_offset() + delta;
            self.motion.follow(offset, Instant::now());
        }
    }

    /// Release: classify the drag. Returns true when the press counts as a click.
    pub fn pointer_up(&mut self, x: f64) -> bool {
        match self.gesture.pointer_up(x) {
            Some(delta) => {
                let t = self.controller.on_drag_end(delta);
                self.apply(t);
                self.gesture.should_open_item()
            }
            None => false,
        }
    }

    fn apply(&mut self, t: Transition) {
        self.motion.start(&t, Instant::now());
        let range = self.controller.page_range(t.page);
        if !range.contains(&self.selected) {
            self.selected = range.start;
        }
    }
}

// =============================================================================
// Section State
// =============================================================================

/// A stack of carousels shown together
#[derive(Debug, Clone, Default)]
pub struct SectionState {
    pub carousels: Vec<CarouselState>,
    /// Index of the carousel receiving keyboard navigation
    pub focused: usize,
    /// Whether fetches were issued for this section
    pub requested: bool,
}

impl SectionState {
    /// Home: the four movie collections
    pub fn home() -> Self {
        Self::from_carousels(
            MovieList::ALL
                .iter()
                .map(|list| {
                    CarouselState::new(list.endpoint(), list.title(), CatalogQuery::movies(*list))
                })
                .collect(),
        )
    }

    /// TV shows: the four TV collections
    pub fn tv_shows() -> Self {
        Self::from_carousels(
            TvList::ALL
                .iter()
                .map(|list| CarouselState::new(list.endpoint(), list.title(), CatalogQuery::tv(*list)))
                .collect(),
        )
    }

    /// Search results: one carousel per media type
    pub fn search(query: &str) -> Self {
        Self::from_carousels(vec![
            CarouselState::new(
                "search-movies",
                "Movies",
                CatalogQuery::search(MediaType::Movie, query),
            ),
            CarouselState::new(
                "search-tv-shows",
                "TV Shows",
                CatalogQuery::search(MediaType::Tv, query),
            ),
        ])
    }

    /// Similar and recommended titles for a detail record
    pub fn related(media: MediaType, id: &str) -> Self {
        Self::from_carousels(
            [RelatedKind::Similar, RelatedKind::Recommended]
                .iter()
                .map(|kind| {
                    CarouselState::new(
                        kind.endpoint(),
                        kind.title(),
                        CatalogQuery::related(media, id, *kind),
                    )
                })
                .collect(),
        )
    }

    pub fn from_carousels(carousels: Vec<CarouselState>) -> Self {
        Self {
            carousels,
            focused: 0,
            requested: false,
        }
    }

    pub fn focused_carousel_mut(&mut self) -> Option<&mut CarouselState> {
        self.carousels.get_mut(self.focused)
    }

    pub fn focus_up(&mut self) {
        self.focused = self.focused.saturating_sub(1);
    }

    pub fn focus_down(&mut self) {
        if self.focused + 1 < self.carousels.len() {
            self.focused += 1;
        }
    }

    /// Issue fetches once; later calls are no-ops
    pub fn request(&mut self) -> Vec<Effect> {
        if self.requested {
            return Vec::new();
        }
        self.requested = true;
        self.carousels
            .iter_mut()
            .map(|c| {
                c.loading = LoadingState::Loading(None);
                Effect::FetchPage {
                    query: c.query.clone(),
                    refresh: false,
                }
            })
            .collect()
    }

    /// Re-issue fetches for failed carousels
    pub fn refresh_failed(&mut self) -> Vec<Effect> {
        self.carousels
            .iter_mut()
            .filter(|c| c.loading.is_error())
            .map(|c| {
                c.loading = LoadingState::Loading(None);
                Effect::FetchPage {
                    query: c.query.clone(),
                    refresh: true,
                }
            })
            .collect()
    }

    /// Deliver a page to every carousel showing `query`
    pub fn apply_page(&mut self, query: &CatalogQuery, result: &Result<CatalogPage, FetchFailure>) -> bool {
        let mut matched = false;
        for carousel in self.carousels.iter_mut().filter(|c| &c.query == query) {
            matched = true;
            match result {
                Ok(page) => carousel.set_items(page.results.clone()),
                Err(failure) => carousel.loading = failure.into(),
            }
        }
        matched
    }

    /// Banner item: first entry of the first carousel
    pub fn featured(&self) -> Option<&CatalogItem> {
        self.carousels.first().and_then(|c| c.items.first())
    }

    pub fn is_loading(&self) -> bool {
        self.carousels.iter().any(|c| c.loading.is_loading())
    }

    /// All carousels settled and none has items
    pub fn is_empty(&self) -> bool {
        self.carousels
            .iter()
            .all(|c| !c.loading.is_loading() && c.items.is_empty())
    }

    pub fn find_item(&self, detail: &DetailRef) -> Option<&CatalogItem> {
        let listed = detail
            .list
            .as_deref()
            .and_then(|list| self.carousels.iter().find(|c| c.id == list));
        listed
            .and_then(|c| detail.find_in(&c.items))
            .or_else(|| self.carousels.iter().find_map(|c| detail.find_in(&c.items)))
    }
}

// =============================================================================
// Detail State
// =============================================================================

/// Modal detail overlay state
#[derive(Debug, Clone)]
pub struct DetailState {
    pub target: DetailRef,
    pub detail: Option<ItemDetail>,
    pub loading: LoadingState,
    pub related: SectionState,
}

impl DetailState {
    pub fn new(target: DetailRef) -> Self {
        let related = SectionState::related(target.media, &target.id);
        Self {
            target,
            detail: None,
            loading: LoadingState::Idle,
            related,
        }
    }

    fn request(&mut self) -> Vec<Effect> {
        self.loading = LoadingState::Loading(None);
        let mut effects = vec![Effect::FetchDetail {
            media: self.target.media,
            id: self.target.id.clone(),
            refresh: false,
        }];
        effects.extend(self.related.request());
        effects
    }
}

// =============================================================================
// Hit Testing
// =============================================================================

/// Address of a carousel on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselSlot {
    /// Carousel of the section under the overlay
    Section(usize),
    /// Carousel inside the detail overlay
    Related(usize),
}

/// Screen areas recorded by the last render, for mouse routing
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    pub carousels: Vec<(CarouselSlot, Rect)>,
    pub cards: Vec<(CarouselSlot, usize, Rect)>,
    /// Modal area while the detail overlay is open
    pub overlay: Option<Rect>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.carousels.clear();
        self.cards.clear();
        self.overlay = None;
    }

    /// Press landed on the dimmed area around the modal
    pub fn is_backdrop(&self, col: u16, row: u16) -> bool {
        self.overlay
            .map(|r| !contains(&r, col, row))
            .unwrap_or(false)
    }

    pub fn carousel_at(&self, col: u16, row: u16) -> Option<CarouselSlot> {
        // Later entries are drawn on top (overlay)
        self.carousels
            .iter()
            .rev()
            .find(|(_, r)| contains(r, col, row))
            .map(|(slot, _)| *slot)
    }

    pub fn card_at(&self, col: u16, row: u16) -> Option<(CarouselSlot, usize)> {
        self.cards
            .iter()
            .rev()
            .find(|(_, _, r)| contains(r, col, row))
            .map(|(slot, idx, _)| (*slot, *idx))
    }
}

fn contains(rect: &Rect, col: u16, row: u16) -> bool {
    col >= rect.x
        && row >= rect.y
        && col < rect.x.saturating_add(rect.width)
        && row < rect.y.saturating_add(rect.height)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Home,
    TvShows,
    Search,
}

// =============================================================================
// Search Input
// =============================================================================

/// Search box state
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    /// Search query
    pub query: String,
    /// Cursor position in query (char index)
    pub cursor: usize,
}

impl SearchInput {
    fn byte_index(&self, char_idx: usize) -> usize {
        self.query
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.query.len())
    }

    fn char_len(&self) -> usize {
        self.query.chars().count()
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.query.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.query.remove(at);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.query.remove(at);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
    }

    pub fn set(&mut self, query: &str) {
        self.query = query.to_string();
        self.cursor = self.char_len();
    }

    /// Query split around the cursor, for rendering
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.query.split_at(self.byte_index(self.cursor))
    }
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Whether the app is running
    pub running: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Route history; the last entry is the current screen
    pub history: History,
    /// Path prefix for rendered routes
    pub base_path: String,
    pub search: SearchInput,

    // Section states
    pub home: SectionState,
    pub tv_shows: SectionState,
    pub results: SectionState,
    results_query: String,
    pub detail: Option<DetailState>,

    /// Areas from the last render
    pub hits: HitMap,
    /// Carousel holding the active pointer press
    pressed: Option<CarouselSlot>,
    /// Frame counter for the loading spinner
    pub tick: u64,
    effects: Vec<Effect>,
}

impl Default for App {
    fn default() -> Self {
        Self::with_route("/", Route::home())
    }
}

impl App {
    /// Create a new App on the home screen
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an App opened at `route` (deep link)
    pub fn with_route(base_path: &str, route: Route) -> Self {
        let mut app = Self {
            running: true,
            input_mode: InputMode::Normal,
            history: History::new(route),
            base_path: base_path.to_string(),
            search: SearchInput::default(),
            home: SectionState::home(),
            tv_shows: SectionState::tv_shows(),
            results: SectionState::default(),
            results_query: String::new(),
            detail: None,
            hits: HitMap::default(),
            pressed: None,
            tick: 0,
            effects: Vec::new(),
        };
        app.sync_route();
        app
    }

    pub fn route(&self) -> &Route {
        self.history.current()
    }

    /// Current route rendered as a path
    pub fn path(&self) -> String {
        self.route().to_path(&self.base_path)
    }

    /// Drain queued work for the event loop
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    /// Navigate to a new route, pushing it on the history
    pub fn navigate(&mut self, route: Route) {
        if self.history.push(route) {
            info!(path = %self.path(), "navigate");
            self.sync_route();
        }
        // Reset input mode when navigating
        self.input_mode = InputMode::Normal;
    }

    /// Go back to previous route
    pub fn back(&mut self) -> bool {
        // If in editing mode, exit editing first
        if self.input_mode == InputMode::Editing {
            self.input_mode = InputMode::Normal;
            return true;
        }

        if self.history.back() {
            info!(path = %self.path(), "back");
            self.sync_route();
            true
        } else {
            false
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Focus search input
    pub fn focus_search(&mut self) {
        self.input_mode = InputMode::Editing;
        self.search.cursor_end();
    }

    /// Submit the search box
    pub fn submit_search(&mut self) {
        self.input_mode = InputMode::Normal;
        let query = self.search.query.trim().to_string();
        if !query.is_empty() {
            self.navigate(Route::search(&query));
        }
    }

    /// Advance the spinner
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Whether any strip is mid-transition (drives redraw rate)
    pub fn is_animating(&self) -> bool {
        let section = self.section().into_iter();
        let related = self.detail.as_ref().map(|d| &d.related).into_iter();
        section
            .chain(related)
            .flat_map(|s| s.carousels.iter())
            .any(|c| c.is_animating())
    }

    fn section_kind(&self) -> Option<SectionKind> {
        match self.route().section {
            Section::Home => Some(SectionKind::Home),
            Section::TvShows => Some(SectionKind::TvShows),
            Section::Search { .. } => Some(SectionKind::Search),
            Section::NotFound { .. } => None,
        }
    }

    fn section_by_kind_mut(&mut self, kind: SectionKind) -> &mut SectionState {
        match kind {
            SectionKind::Home => &mut self.home,
            SectionKind::TvShows => &mut self.tv_shows,
            SectionKind::Search => &mut self.results,
        }
    }

    /// Section under the current route
    pub fn section(&self) -> Option<&SectionState> {
        self.section_kind().map(|kind| match kind {
            SectionKind::Home => &self.home,
            SectionKind::TvShows => &self.tv_shows,
            SectionKind::Search => &self.results,
        })
    }

    pub fn section_mut(&mut self) -> Option<&mut SectionState> {
        let kind = self.section_kind()?;
        Some(self.section_by_kind_mut(kind))
    }

    /// Carousels that take keyboard input: the overlay's when open
    fn nav_section_mut(&mut self) -> Option<&mut SectionState> {
        if self.detail.is_some() {
            return self.detail.as_mut().map(|d| &mut d.related);
        }
        self.section_mut()
    }

    pub fn carousel_mut(&mut self, slot: CarouselSlot) -> Option<&mut CarouselState> {
        match slot {
            CarouselSlot::Section(i) => self.section_mut()?.carousels.get_mut(i),
            CarouselSlot::Related(i) => self.detail.as_mut()?.related.carousels.get_mut(i),
        }
    }

    /// Item referenced by the detail route, resolved against loaded carousels
    pub fn selected_item(&self) -> Option<&CatalogItem> {
        let target = &self.detail.as_ref()?.target;
        self.section()
            .and_then(|s| s.find_item(target))
            .or_else(|| self.detail.as_ref()?.related.find_item(target))
    }

    /// Bring section, search results and overlay in line with the route
    fn sync_route(&mut self) {
        let route = self.route().clone();

        if let Section::Search { query } = &route.section {
            if self.results_query != *query {
                self.results = SectionState::search(query);
                self.results_query = query.clone();
            }
            self.search.set(query);
        }

        if let Some(kind) = self.section_kind() {
            let effects = self.section_by_kind_mut(kind).request();
            self.effects.extend(effects);
        }

        match route.detail {
            Some(target) => {
                let same = self
                    .detail
                    .as_ref()
                    .map(|d| d.target.media == target.media && d.target.id == target.id)
                    .unwrap_or(false);
                if same {
                    if let Some(d) = self.detail.as_mut() {
                        d.target = target;
                    }
                } else {
                    let mut detail = DetailState::new(target);
                    self.effects.extend(detail.request());
                    self.detail = Some(detail);
                }
            }
            None => self.detail = None,
        }
    }

    /// Open the highlighted item of the focused carousel
    pub fn open_selected(&mut self) -> bool {
        let in_overlay = self.detail.is_some();
        let Some(carousel) = self.nav_section_mut().and_then(|s| s.focused_carousel_mut()) else {
            return false;
        };
        let Some(item) = carousel.selected_item() else {
            return false;
        };
        let target = DetailRef::new(item.media_type, item.id.clone()).from_list(carousel.id.clone());
        debug!(item = %item, in_overlay, "open item");
        let route = self.route().without_detail().with_detail(target);
        self.navigate(route);
        true
    }

    /// Open item `index` of the carousel at `slot`
    pub fn open_item(&mut self, slot: CarouselSlot, index: usize) -> bool {
        let Some(carousel) = self.carousel_mut(slot) else {
            return false;
        };
        let Some(item) = carousel.items.get(index) else {
            return false;
        };
        let target = DetailRef::new(item.media_type, item.id.clone()).from_list(carousel.id.clone());
        carousel.selected = index;
        let route = self.route().without_detail().with_detail(target);
        self.navigate(route);
        true
    }

    /// Retry everything visible that failed (manual refresh)
    pub fn refresh(&mut self) {
        let mut effects = self.section_mut().map(|s| s.refresh_failed()).unwrap_or_default();
        if let Some(detail) = self.detail.as_mut() {
            if detail.loading.is_error() {
                detail.loading = LoadingState::Loading(None);
                effects.push(Effect::FetchDetail {
                    media: detail.target.media,
                    id: detail.target.id.clone(),
                    refresh: true,
                });
            }
            effects.extend(detail.related.refresh_failed());
        }
        if !effects.is_empty() {
            info!(count = effects.len(), "refresh requested");
        }
        self.effects.extend(effects);
    }

    // -------------------------------------------------------------------------
    // Fetch Results
    // -------------------------------------------------------------------------

    /// Apply a completed fetch
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::PageLoaded { query, result } => {
                if let Err(failure) = &result {
                    debug!(%query, ?failure, "page failed");
                }
                let mut matched = false;
                for section in [&mut self.home, &mut self.tv_shows, &mut self.results] {
                    matched |= section.apply_page(&query, &result);
                }
                if let Some(detail) = self.detail.as_mut() {
                    matched |= detail.related.apply_page(&query, &result);
                }
                if !matched {
                    debug!(%query, "page arrived for a carousel no longer shown");
                }
            }
            AppEvent::DetailLoaded { media, id, result } => {
                let Some(detail) = self.detail.as_mut() else {
                    return;
                };
                if detail.target.media != media || detail.target.id != id {
                    return;
                }
                match result {
                    Ok(record) => {
                        detail.detail = Some(record);
                        detail.loading = LoadingState::Idle;
                    }
                    Err(failure) => detail.loading = (&failure).into(),
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Global quit shortcut (Ctrl+C)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        // Route to appropriate handler based on mode
        if self.input_mode == InputMode::Editing {
            self.handle_editing_key(key)
        } else {
            self.handle_normal_key(key)
        }
    }

    /// Handle keys in editing (text input) mode
    fn handle_editing_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                true
            }
            KeyCode::Enter => {
                self.submit_search();
                true
            }
            KeyCode::Char(c) => {
                self.search.insert(c);
                true
            }
            KeyCode::Backspace => {
                self.search.backspace();
                true
            }
            KeyCode::Delete => {
                self.search.delete();
                true
            }
            KeyCode::Left => {
                self.search.cursor_left();
                true
            }
            KeyCode::Right => {
                self.search.cursor_right();
                true
            }
            KeyCode::Home => {
                self.search.cursor_home();
                true
            }
            KeyCode::End => {
                self.search.cursor_end();
                true
            }
            _ => false,
        }
    }

    /// Handle keys in normal navigation mode
    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        // Global shortcuts
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return true;
            }
            KeyCode::Char('/') | KeyCode::Char('s') => {
                self.focus_search();
                return true;
            }
            KeyCode::Esc | KeyCode::Backspace => {
                return self.back();
            }
            KeyCode::Tab | KeyCode::BackTab => {
                let next = match self.route().section {
                    Section::Home => Route::tv_shows(),
                    _ => Route::home(),
                };
                self.navigate(next);
                return true;
            }
            KeyCode::Char('r') => {
                self.refresh();
                return true;
            }
            _ => {}
        }

        self.handle_carousel_key(key)
    }

    fn handle_carousel_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Enter {
            return self.open_selected();
        }

        let Some(section) = self.nav_section_mut() else {
            return false;
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                section.focus_up();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                section.focus_down();
                true
            }
            code => {
                let Some(carousel) = section.focused_carousel_mut() else {
                    return false;
                };
                match code {
                    KeyCode::Left | KeyCode::Char('h') => carousel.select_prev(),
                    KeyCode::Right | KeyCode::Char('l') => carousel.select_next(),
                    KeyCode::Char('[') | KeyCode::PageUp => carousel.retreat(),
                    KeyCode::Char(']') | KeyCode::PageDown => carousel.advance(),
                    KeyCode::Char(c @ '1'..='9') => {
                        let page = (c as usize) - ('1' as usize);
                        carousel.jump_to(page);
                    }
                    _ => return false,
                }
                true
            }
        }
    }

    // -------------------------------------------------------------------------
    // Mouse Event Handling
    // -------------------------------------------------------------------------

    /// Route pointer press/drag/release to the carousel under the pointer
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        let x = f64::from(mouse.column);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.detail.is_some() && self.hits.is_backdrop(mouse.column, mouse.row) {
                    return self.back();
                }
                let Some(slot) = self.hits.carousel_at(mouse.column, mouse.row) else {
                    return false;
                };
                self.focus_slot(slot);
                if let Some(carousel) = self.carousel_mut(slot) {
                    carousel.pointer_down(x);
                }
                self.pressed = Some(slot);
                true
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(slot) = self.pressed else {
                    return false;
                };
                if let Some(carousel) = self.carousel_mut(slot) {
                    carousel.pointer_drag(x);
                }
                true
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(slot) = self.pressed.take() else {
                    return false;
                };
                let is_click = self
                    .carousel_mut(slot)
                    .map(|c| c.pointer_up(x))
                    .unwrap_or(false);
                if is_click {
                    if let Some((card_slot, index)) = self.hits.card_at(mouse.column, mouse.row) {
                        if card_slot == slot {
                            self.open_item(slot, index);
                        }
                    }
                }
                true
            }
            _ => false,
        }
    }

    fn focus_slot(&mut self, slot: CarouselSlot) {
        match slot {
            CarouselSlot::Section(i) => {
                if let Some(section) = self.section_mut() {
                    section.focused = i;
                }
            }
            CarouselSlot::Related(i) => {
                if let Some(detail) = self.detail.as_mut() {
                    detail.related.focused = i;
                }
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize, media: MediaType) -> Vec<CatalogItem> {
        (0..n)
            .map(|i| CatalogItem {
                id: (100 + i).to_string(),
                media_type: media,
                title: format!("Title {}", i),
                overview: String::new(),
                poster_path: None,
                backdrop_path: None,
                release_date: None,
                vote_average: 7.0,
                vote_count: 1,
                popularity: 1.0,
                genre_ids: vec![],
            })
            .collect()
    }

    fn page(n: usize, media: MediaType) -> CatalogPage {
        CatalogPage {
            page: 1,
            total_pages: 1,
            total_results: n as u32,
            results: items(n, media),
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    // -------------------------------------------------------------------------
    // SearchInput Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_search_input_editing() {
        let mut search = SearchInput::default();
        for c in "hello".chars() {
            search.insert(c);
        }
        assert_eq!(search.query, "hello");
        assert_eq!(search.cursor, 5);

        search.cursor_left();
        search.cursor_left();
        search.insert('X');
        assert_eq!(search.query, "helXlo");

        search.backspace();
        assert_eq!(search.query, "hello");

        search.cursor_home();
        search.delete();
        assert_eq!(search.query, "ello");
    }

    #[test]
    fn test_search_input_multibyte() {
        let mut search = SearchInput::default();
        search.set("기생충");
        assert_eq!(search.cursor, 3);
        search.backspace();
        assert_eq!(search.query, "기생");
        assert_eq!(search.split_at_cursor(), ("기생", ""));
    }

    // -------------------------------------------------------------------------
    // Startup and Routing
    // -------------------------------------------------------------------------

    #[test]
    fn test_startup_requests_home_carousels() {
        let mut app = App::new();
        let effects = app.take_effects();
        assert_eq!(effects.len(), 4);
        assert!(effects.contains(&Effect::FetchPage {
            query: CatalogQuery::movies(MovieList::NowPlaying),
            refresh: false,
        }));
        assert!(app.home.carousels.iter().all(|c| c.loading.is_loading()));

        // Returning home does not refetch
        app.navigate(Route::tv_shows());
        assert_eq!(app.take_effects().len(), 4);
        app.back();
        assert!(app.take_effects().is_empty());
    }

    #[test]
    fn test_tab_switches_sections() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(*app.route(), Route::tv_shows());
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(*app.route(), Route::home());
    }

    #[test]
    fn test_search_submit_navigates() {
        let mut app = App::new();
        app.take_effects();
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Editing);
        for c in "heat".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(*app.route(), Route::search("heat"));
        assert_eq!(app.take_effects().len(), 2);
        assert_eq!(app.path(), "/search?query=heat");
    }

    #[test]
    fn test_blank_search_stays_put() {
        let mut app = App::new();
        app.focus_search();
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(*app.route(), Route::home());
    }

    // -------------------------------------------------------------------------
    // Carousel Navigation
    // -------------------------------------------------------------------------

    #[test]
    fn test_page_loaded_fills_carousel() {
        let mut app = App::new();
        app.handle_event(AppEvent::PageLoaded {
            query: CatalogQuery::movies(MovieList::NowPlaying),
            result: Ok(page(23, MediaType::Movie)),
        });
        let carousel = &app.home.carousels[0];
        assert_eq!(carousel.items.len(), 23);
        assert_eq!(carousel.loading, LoadingState::Idle);
        assert_eq!(carousel.controller.max_page_index(), 4);
        assert_eq!(app.home.featured().map(|i| i.id.as_str()), Some("100"));
    }

    #[test]
    fn test_selection_crosses_pages() {
        let mut app = App::new();
        app.handle_event(AppEvent::PageLoaded {
            query: CatalogQuery::movies(MovieList::NowPlaying),
            result: Ok(page(7, MediaType::Movie)),
        });

        for _ in 0..5 {
            app.handle_key(key(KeyCode::Right));
        }
        let carousel = &app.home.carousels[0];
        assert_eq!(carousel.current_page(), 1);
        assert_eq!(carousel.selected, 5);

        app.handle_key(key(KeyCode::Left));
        let carousel = &app.home.carousels[0];
        assert_eq!(carousel.current_page(), 0);
        assert_eq!(carousel.selected, 4);

        // Left from the first item wraps to the last page
        for _ in 0..5 {
            app.handle_key(key(KeyCode::Left));
        }
        let carousel = &app.home.carousels[0];
        assert_eq!(carousel.current_page(), 1);
        assert_eq!(carousel.selected, 6);
    }

    #[test]
    fn test_page_keys() {
        let mut app = App::new();
        app.handle_event(AppEvent::PageLoaded {
            query: CatalogQuery::movies(MovieList::NowPlaying),
            result: Ok(page(23, MediaType::Movie)),
        });
        app.handle_key(key(KeyCode::Char(']')));
        assert_eq!(app.home.carousels[0].current_page(), 1);
        assert_eq!(app.home.carousels[0].selected, 5);

        app.handle_key(key(KeyCode::Char('5')));
        assert_eq!(app.home.carousels[0].current_page(), 4);

        // Out-of-range jump is ignored
        app.handle_key(key(KeyCode::Char('9')));
        assert_eq!(app.home.carousels[0].current_page(), 4);

        app.handle_key(key(KeyCode::Char('[')));
        assert_eq!(app.home.carousels[0].current_page(), 3);
    }

    fn measured_carousel(n: usize, width: f64) -> CarouselState {
        let mut carousel = CarouselState::new(
            "now_playing",
            "Now Playing",
            CatalogQuery::movies(MovieList::NowPlaying),
        );
        carousel.set_items(items(n, MediaType::Movie));
        carousel.observe_width(width);
        carousel
    }

    #[test]
    fn test_resize_mid_transition_snaps_to_committed_page() {
        let mut carousel = measured_carousel(23, 120.0);
        carousel.advance();
        assert!(carousel.is_animating());
        assert_eq!(carousel.current_page(), 1);

        carousel.observe_width(150.0);
        assert!(!carousel.is_animating());
        assert_eq!(carousel.current_page(), 1);
        assert_eq!(carousel.strip_offset(), carousel.controller.offset_for(1));
        assert_eq!(carousel.strip_offset(), -152.0);
    }

    #[test]
    fn test_resize_mid_drag_resnaps_then_release_still_pages() {
        let mut carousel = measured_carousel(23, 120.0);
        carousel.pointer_down(60.0);
        carousel.pointer_drag(40.0);
        assert_eq!(carousel.strip_offset(), -20.0);

        carousel.observe_width(90.0);
        assert!(!carousel.is_animating());
        assert_eq!(carousel.strip_offset(), carousel.controller.offset_for(0));

        // The drag still counts on release, and is not a click
        assert!(!carousel.pointer_up(40.0));
        assert_eq!(carousel.current_page(), 1);
    }

    #[test]
    fn test_focus_moves_between_carousels() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.home.focused, 2);
        for _ in 0..5 {
            app.handle_key(key(KeyCode::Down));
        }
        assert_eq!(app.home.focused, 3);
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.home.focused, 2);
    }

    // -------------------------------------------------------------------------
    // Detail Overlay
    // -------------------------------------------------------------------------

    #[test]
    fn test_enter_opens_detail_route() {
        let mut app = App::new();
        app.take_effects();
        app.handle_event(AppEvent::PageLoaded {
            query: CatalogQuery::movies(MovieList::NowPlaying),
            result: Ok(page(10, MediaType::Movie)),
        });
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.path(), "/movies/101?list=now_playing");
        let effects = app.take_effects();
        assert!(effects.contains(&Effect::FetchDetail {
            media: MediaType::Movie,
            id: "101".into(),
            refresh: false,
        }));
        assert_eq!(effects.len(), 3);
        assert_eq!(app.selected_item().map(|i| i.title.as_str()), Some("Title 1"));

        // Esc closes the overlay
        app.handle_key(key(KeyCode::Esc));
        assert!(app.detail.is_none());
        assert_eq!(*app.route(), Route::home());
    }

    #[test]
    fn test_detail_not_found() {
        let mut app = App::with_route("/", Route::parse("/", "/movies/999999"));
        app.handle_event(AppEvent::DetailLoaded {
            media: MediaType::Movie,
            id: "999999".into(),
            result: Err(FetchFailure::NotFound),
        });
        assert_eq!(app.detail.as_ref().unwrap().loading, LoadingState::NotFound);
    }

    #[test]
    fn test_stale_detail_result_ignored() {
        let mut app = App::with_route("/", Route::parse("/", "/movies/1"));
        app.handle_event(AppEvent::DetailLoaded {
            media: MediaType::Movie,
            id: "2".into(),
            result: Err(FetchFailure::Failed("boom".into())),
        });
        assert!(app.detail.as_ref().unwrap().loading.is_loading());
    }

    // -------------------------------------------------------------------------
    // Refresh
    // -------------------------------------------------------------------------

    #[test]
    fn test_refresh_only_refetches_failures() {
        let mut app = App::new();
        app.take_effects();
        app.handle_event(AppEvent::PageLoaded {
            query: CatalogQuery::movies(MovieList::Popular),
            result: Err(FetchFailure::Failed("timeout".into())),
        });
        assert!(app.home.carousels[1].loading.is_error());

        app.handle_key(key(KeyCode::Char('r')));
        let effects = app.take_effects();
        assert_eq!(
            effects,
            vec![Effect::FetchPage {
                query: CatalogQuery::movies(MovieList::Popular),
                refresh: true,
            }]
        );
        assert!(app.home.carousels[1].loading.is_loading());
    }

    // -------------------------------------------------------------------------
    // Mouse
    // -------------------------------------------------------------------------

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::empty(),
        }
    }

    fn app_with_strip() -> App {
        let mut app = App::new();
        app.take_effects();
        app.handle_event(AppEvent::PageLoaded {
            query: CatalogQuery::movies(MovieList::NowPlaying),
            result: Ok(page(12, MediaType::Movie)),
        });
        app.home.carousels[0].observe_width(120.0);
        app.hits.carousels.push((CarouselSlot::Section(0), Rect::new(0, 5, 120, 8)));
        app.hits.cards.push((CarouselSlot::Section(0), 0, Rect::new(0, 6, 22, 6)));
        app
    }

    #[test]
    fn test_mouse_swipe_left_advances() {
        let mut app = app_with_strip();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 60, 7));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 40, 7));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 30, 7));
        assert_eq!(app.home.carousels[0].current_page(), 1);
        assert!(app.detail.is_none());
    }

    #[test]
    fn test_mouse_click_opens_card() {
        let mut app = app_with_strip();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 8));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 11, 8));
        assert_eq!(app.path(), "/movies/100?list=now_playing");
    }

    #[test]
    fn test_backdrop_click_closes_detail() {
        let mut app = app_with_strip();
        app.open_item(CarouselSlot::Section(0), 2);
        assert!(app.detail.is_some());
        app.hits.overlay = Some(Rect::new(10, 2, 100, 30));

        // Inside the modal: nothing to hit, overlay stays
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 50, 10));
        assert!(app.detail.is_some());

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 2, 1));
        assert!(app.detail.is_none());
    }

    #[test]
    fn test_mouse_drag_back_does_not_open() {
        let mut app = app_with_strip();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 8));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 30, 8));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 12, 8));
        assert!(app.detail.is_none());
        assert_eq!(app.home.carousels[0].current_page(), 0);
    }
}
