//! Shared crawl frontier
//!
//! The frontier holds every page discovered during a crawl, its depth, its
//! state and the links found on it. All reads and writes go through a single
//! mutex covering the whole structure:
//!
//! - `claim_next` finds the first pending page and marks it claimed in the
//!   same critical section, so two workers can never claim the same page
//! - `register` deduplicates, filters and inserts the links found on a
//!   claimed page, then marks that page scanned
//!
//! The network fetch happens between those two calls with the lock released.
//! Pages live in an arena indexed by [`PageId`]; the tree is formed by
//! [`Link::Child`] edges and traversed with an explicit stack. Claiming costs
//! O(pages) per call, which is acceptable for single-site crawls.

use crate::state::{PageState, SkipReason};
use crate::url::{is_fetchable_scheme, normalize_link, same_host};
use crate::CrawlError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

/// Index of a page inside the frontier arena
pub type PageId = usize;

/// The seed page always occupies the first arena slot
pub const ROOT: PageId = 0;

/// A link found on a page, in discovery order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// This page was the first to discover the target; the target is a tree child
    Child(PageId),

    /// The target was already known when this link was found
    Reference(PageId),
}

impl Link {
    /// Returns the page this link points to
    pub fn target(&self) -> PageId {
        match self {
            Self::Child(id) | Self::Reference(id) => *id,
        }
    }

    /// Returns true for tree edges
    pub fn is_child(&self) -> bool {
        matches!(self, Self::Child(_))
    }
}

/// A page known to the frontier
#[derive(Debug, Clone)]
pub struct Page {
    /// Canonical absolute URL (no fragment)
    pub url: Url,

    /// Hops from the seed
    pub depth: u32,

    /// Current lifecycle state
    pub state: PageState,

    /// Set when the page was made non-claimable at discovery time
    pub skip: Option<SkipReason>,

    /// Links found on this page, in discovery order
    pub links: Vec<Link>,
}

impl Page {
    fn new(url: Url, depth: u32, skip: Option<SkipReason>) -> Self {
        let state = if skip.is_some() {
            PageState::Scanned
        } else {
            PageState::Pending
        };

        Self {
            url,
            depth,
            state,
            skip,
            links: Vec::new(),
        }
    }

    /// Returns true if a worker scanned this page, whether or not the fetch succeeded
    pub fn was_fetched(&self) -> bool {
        self.state == PageState::Scanned && self.skip.is_none()
    }

    /// Iterates over the tree children of this page
    pub fn children(&self) -> impl DoubleEndedIterator<Item = PageId> + '_ {
        self.links.iter().filter_map(|link| match link {
            Link::Child(id) => Some(*id),
            Link::Reference(_) => None,
        })
    }
}

/// A page handed to a worker by [`Frontier::claim_next`]
///
/// Owns copies of everything the worker needs, so no reference into the
/// frontier outlives the critical section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedPage {
    pub id: PageId,
    pub url: Url,
    pub depth: u32,
}

/// What a single [`Frontier::register`] call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterSummary {
    /// New pages created
    pub created: usize,

    /// New pages that are claimable
    pub claimable: usize,

    /// Links that pointed at an already known page
    pub duplicates: usize,

    /// Links that could not be parsed and were dropped
    pub malformed: usize,
}

impl RegisterSummary {
    /// Total number of links recorded on the parent page
    pub fn recorded(&self) -> usize {
        self.created + self.duplicates
    }
}

/// Mutable state guarded by the frontier lock
#[derive(Debug)]
struct FrontierState {
    pages: Vec<Page>,
    index: HashMap<String, PageId>,
    pending: usize,
    malformed: usize,
    closed: bool,
}

impl FrontierState {
    fn insert(&mut self, page: Page) -> PageId {
        let id = self.pages.len();
        if page.state == PageState::Pending {
            self.pending += 1;
        }
        self.index.insert(page.url.as_str().to_string(), id);
        self.pages.push(page);
        id
    }

    /// Depth-first, pre-order search for the first claimable page
    fn find_claimable(&self, max_depth: u32) -> Option<PageId> {
        let mut stack = vec![ROOT];

        while let Some(id) = stack.pop() {
            let page = &self.pages[id];
            if page.state.is_claimable() && page.depth < max_depth {
                return Some(id);
            }
            // Reverse so the first-discovered child is popped first
            stack.extend(page.children().rev());
        }

        None
    }
}

/// The shared crawl frontier
///
/// Wrap it in an `Arc` and hand clones to every worker.
#[derive(Debug)]
pub struct Frontier {
    seed: Url,
    max_depth: u32,
    scan_foreign: bool,
    inner: Mutex<FrontierState>,
}

impl Frontier {
    /// Creates a frontier holding only the seed page at depth 0
    ///
    /// # Arguments
    ///
    /// * `seed` - The seed URL (already parsed and canonical)
    /// * `max_depth` - Pages at this depth or deeper are recorded but never claimed
    /// * `scan_foreign` - Whether pages on other hosts may be claimed
    pub fn new(mut seed: Url, max_depth: u32, scan_foreign: bool) -> Self {
        seed.set_fragment(None);

        let frontier = Self {
            seed: seed.clone(),
            max_depth,
            scan_foreign,
            inner: Mutex::new(FrontierState {
                pages: Vec::new(),
                index: HashMap::new(),
                pending: 0,
                malformed: 0,
                closed: false,
            }),
        };

        let skip = frontier.skip_reason(&seed, 0);
        frontier.lock().insert(Page::new(seed, 0, skip));

        frontier
    }

    /// Returns the seed URL
    pub fn seed(&self) -> &Url {
        &self.seed
    }

    /// Returns the configured maximum depth
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Claims the next pending page for scanning
    ///
    /// Performs a depth-first traversal from the seed and marks the first
    /// page that is `Pending` and shallower than the depth bound as
    /// `Claimed`, all under one lock acquisition.
    ///
    /// # Returns
    ///
    /// * `Some(ClaimedPage)` - The caller now owns the scan of this page
    /// * `None` - Nothing is claimable right now, or the frontier is closed
    pub fn claim_next(&self) -> Option<ClaimedPage> {
        let mut state = self.lock();

        if state.closed || state.pending == 0 {
            return None;
        }

        let id = state.find_claimable(self.max_depth)?;
        state.pending -= 1;

        let page = &mut state.pages[id];
        page.state = PageState::Claimed;

        tracing::debug!("Claimed {} (depth {})", page.url, page.depth);

        Some(ClaimedPage {
            id,
            url: page.url.clone(),
            depth: page.depth,
        })
    }

    /// Records the links found on a claimed page and marks it scanned
    ///
    /// Each raw link is resolved against the parent's URL:
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Cannot be parsed | Dropped, counted as malformed |
    /// | URL already known | Reference edge only, no new page |
    /// | Depth would reach the bound | New page, `Scanned` (`DepthLimit`) |
    /// | Not HTTP(S) | New page, `Scanned` (`UnsupportedScheme`) |
    /// | Other host, foreign scanning off | New page, `Scanned` (`OffHost`) |
    /// | Otherwise | New page, `Pending` |
    ///
    /// # Arguments
    ///
    /// * `parent` - The id of the claimed page the links were found on
    /// * `raw_links` - Raw `href` values in document order
    ///
    /// # Returns
    ///
    /// * `Ok(RegisterSummary)` - Links recorded and parent marked scanned
    /// * `Err(CrawlError::UnknownPage)` - No page with that id
    /// * `Err(CrawlError::InvalidTransition)` - The parent is not `Claimed`;
    ///   nothing was recorded
    pub fn register<I, S>(&self, parent: PageId, raw_links: I) -> Result<RegisterSummary, CrawlError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = self.lock();

        let (base, parent_depth, parent_state) = {
            let page = state
                .pages
                .get(parent)
                .ok_or(CrawlError::UnknownPage(parent))?;
            (page.url.clone(), page.depth, page.state)
        };

        if !parent_state.can_transition_to(PageState::Scanned) {
            return Err(CrawlError::InvalidTransition {
                from: parent_state,
                to: PageState::Scanned,
            });
        }

        let mut summary = RegisterSummary::default();
        let depth = parent_depth + 1;

        for raw in raw_links {
            let raw = raw.as_ref();

            let url = match normalize_link(raw, &base) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Dropping link on {}: {}", base, e);
                    summary.malformed += 1;
                    continue;
                }
            };

            let known = state.index.get(url.as_str()).copied();
            if let Some(existing) = known {
                tracing::trace!("Already known: {}", url);
                state.pages[parent].links.push(Link::Reference(existing));
                summary.duplicates += 1;
                continue;
            }

            let skip = self.skip_reason(&url, depth);
            match skip {
                Some(reason) => tracing::trace!("Discovered {} ({})", url, reason),
                None => {
                    tracing::trace!("Discovered {}", url);
                    summary.claimable += 1;
                }
            }

            let id = state.insert(Page::new(url, depth, skip));
            state.pages[parent].links.push(Link::Child(id));
            summary.created += 1;
        }

        state.pages[parent].state = PageState::Scanned;
        state.malformed += summary.malformed;

        tracing::debug!(
            "Registered {} links on {} ({} new, {} claimable, {} known, {} malformed)",
            summary.recorded(),
            base,
            summary.created,
            summary.claimable,
            summary.duplicates,
            summary.malformed
        );

        Ok(summary)
    }

    /// Stops handing out work
    ///
    /// Every later `claim_next` returns `None`, so workers finish their
    /// current page and exit through the normal exhaustion path.
    pub fn close(&self) {
        let mut state = self.lock();
        if !state.closed {
            state.closed = true;
            tracing::info!("Frontier closed, no further pages will be claimed");
        }
    }

    /// Returns true once `close` has been called
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Finds the page with the given canonical URL
    pub fn lookup(&self, url: &str) -> Option<PageId> {
        self.lock().index.get(url).copied()
    }

    /// Returns the number of pages known to the frontier
    pub fn len(&self) -> usize {
        self.lock().pages.len()
    }

    /// Always false: the seed page exists from construction
    pub fn is_empty(&self) -> bool {
        self.lock().pages.is_empty()
    }

    /// Returns the number of pages waiting to be claimed
    pub fn pending_count(&self) -> usize {
        self.lock().pending
    }

    /// Returns a consistent copy of the whole frontier
    pub fn snapshot(&self) -> FrontierSnapshot {
        let state = self.lock();
        FrontierSnapshot {
            pages: state.pages.clone(),
            malformed_links: state.malformed,
            pending: state.pending,
            closed: state.closed,
        }
    }

    /// Consumes the frontier and returns its final contents
    pub fn into_snapshot(self) -> FrontierSnapshot {
        let state = self
            .inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        FrontierSnapshot {
            pages: state.pages,
            malformed_links: state.malformed,
            pending: state.pending,
            closed: state.closed,
        }
    }

    /// Decides whether a newly discovered page must be created non-claimable
    fn skip_reason(&self, url: &Url, depth: u32) -> Option<SkipReason> {
        if depth >= self.max_depth {
            Some(SkipReason::DepthLimit)
        } else if !is_fetchable_scheme(url) {
            Some(SkipReason::UnsupportedScheme)
        } else if !self.scan_foreign && !same_host(url, &self.seed) {
            Some(SkipReason::OffHost)
        } else {
            None
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        // Every mutation completes before the guard drops, so a poisoned
        // lock still guards a consistent structure
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Immutable copy of the frontier, used for output and statistics
#[derive(Debug, Clone)]
pub struct FrontierSnapshot {
    pages: Vec<Page>,
    malformed_links: usize,
    pending: usize,
    closed: bool,
}

impl FrontierSnapshot {
    /// Returns the seed page
    pub fn root(&self) -> &Page {
        &self.pages[ROOT]
    }

    /// Returns the page with the given id
    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.get(id)
    }

    /// Returns every page in discovery order
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Finds a page by canonical URL
    pub fn find(&self, url: &str) -> Option<&Page> {
        self.pages.iter().find(|page| page.url.as_str() == url)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of links dropped because they could not be parsed
    pub fn malformed_links(&self) -> usize {
        self.malformed_links
    }

    /// True if `Frontier::close` was called, at any point
    pub fn was_closed(&self) -> bool {
        self.closed
    }

    /// True if the frontier was closed while pages were still waiting
    ///
    /// A close that lands after the last page was scanned cut nothing short
    /// and does not count.
    pub fn was_interrupted(&self) -> bool {
        self.closed && self.pending > 0
    }
}
