/// Non-fatal conditions surfaced next to a rendered page.
///
/// The engine never lets a fetch-layer error escape; the worst outcome is an
/// empty product list accompanied by one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadNotice {
    /// Upstream kept timing out; retrying shortly is likely to succeed.
    Transient,
    /// Upstream failed outright; the page renders its empty state.
    Failed,
    /// Buffered aggregation hit its fetch cap before collecting the whole
    /// category, so the filtered totals understate the true counts.
    ResultsMayBeIncomplete,
}

impl std::fmt::Display for LoadNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadNotice::Transient => write!(f, "the catalog is responding slowly — try again"),
            LoadNotice::Failed => write!(f, "failed to load products"),
            LoadNotice::ResultsMayBeIncomplete => write!(f, "results may be incomplete"),
        }
    }
}
