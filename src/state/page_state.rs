/// Page state definitions for tracking crawl progress
///
/// Every page in the frontier moves through `Pending -> Claimed -> Scanned`.
/// Pages that fail a filter at discovery time are created directly in
/// `Scanned` and carry a [`SkipReason`].
use std::fmt;

/// Represents the current state of a page in the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// Page is known and waiting for a worker to claim it
    Pending,

    /// Page has been claimed by a worker and is being fetched
    Claimed,

    /// Page is done: fetched (successfully or not) or filtered out at creation
    Scanned,
}

impl PageState {
    /// Returns true if a worker may claim a page in this state
    pub fn is_claimable(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Scanned)
    }

    /// Returns true if the state machine allows moving from `self` to `next`
    ///
    /// Only the two forward steps are legal; states never move backwards.
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Claimed) | (Self::Claimed, Self::Scanned)
        )
    }

    /// Short lowercase label used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Claimed => "claimed",
            Self::Scanned => "scanned",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> [Self; 3] {
        [Self::Pending, Self::Claimed, Self::Scanned]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a page was created directly in `Scanned` instead of `Pending`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Page sits at or beyond the maximum crawl depth
    DepthLimit,

    /// Page lives on a different host than the seed and foreign scanning is off
    OffHost,

    /// Page uses a scheme the fetcher cannot retrieve (mailto:, javascript:, ...)
    UnsupportedScheme,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DepthLimit => "depth_limit",
            Self::OffHost => "off_host",
            Self::UnsupportedScheme => "unsupported_scheme",
        }
    }

    pub fn all_reasons() -> [Self; 3] {
        [Self::DepthLimit, Self::OffHost, Self::UnsupportedScheme]
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
