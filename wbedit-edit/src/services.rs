use crate::policies::{AllowAllPolicy, NoopWatchlist, PlainSummaryFormatter};
use crate::{
    EditConfig, EditFilterHookRunner, EditTokenChecker, EntityRevisionLookup, EntityStore,
    PermissionChecker, RateLimiter, SummaryFormatter, WatchlistUpdater,
};
use std::sync::Arc;

/// The collaborators an edit runs against, built once and shared.
///
/// Only the store and the lookup are required. Everything else defaults to
/// [`AllowAllPolicy`], [`PlainSummaryFormatter`] and [`NoopWatchlist`].
#[derive(Clone)]
pub struct EditServices {
    pub(crate) store: Arc<dyn EntityStore>,
    pub(crate) lookup: Arc<dyn EntityRevisionLookup>,
    pub(crate) permissions: Arc<dyn PermissionChecker>,
    pub(crate) rate_limiter: Arc<dyn RateLimiter>,
    pub(crate) tokens: Arc<dyn EditTokenChecker>,
    pub(crate) filters: Arc<dyn EditFilterHookRunner>,
    pub(crate) summaries: Arc<dyn SummaryFormatter>,
    pub(crate) watchlist: Arc<dyn WatchlistUpdater>,
    pub(crate) config: EditConfig,
}

impl EditServices {
    pub fn new(store: Arc<dyn EntityStore>, lookup: Arc<dyn EntityRevisionLookup>) -> Self {
        Self {
            store,
            lookup,
            permissions: Arc::new(AllowAllPolicy),
            rate_limiter: Arc::new(AllowAllPolicy),
            tokens: Arc::new(AllowAllPolicy),
            filters: Arc::new(AllowAllPolicy),
            summaries: Arc::new(PlainSummaryFormatter),
            watchlist: Arc::new(NoopWatchlist),
            config: EditConfig::default(),
        }
    }

    #[must_use]
    pub fn with_permissions(mut self, permissions: Arc<dyn PermissionChecker>) -> Self {
        self.permissions = permissions;
        self
    }

    #[must_use]
    pub fn with_rate_limiter(mut self, rate_limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    #[must_use]
    pub fn with_tokens(mut self, tokens: Arc<dyn EditTokenChecker>) -> Self {
        self.tokens = tokens;
        self
    }

    #[must_use]
    pub fn with_filters(mut self, filters: Arc<dyn EditFilterHookRunner>) -> Self {
        self.filters = filters;
        self
    }

    #[must_use]
    pub fn with_summary_formatter(mut self, summaries: Arc<dyn SummaryFormatter>) -> Self {
        self.summaries = summaries;
        self
    }

    #[must_use]
    pub fn with_watchlist(mut self, watchlist: Arc<dyn WatchlistUpdater>) -> Self {
        self.watchlist = watchlist;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: EditConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EditConfig {
        &self.config
    }

    pub fn lookup(&self) -> &dyn EntityRevisionLookup {
        self.lookup.as_ref()
    }
}
