//! Latest-search-wins sequencing.
//!
//! Each search takes a ticket from a monotonically increasing counter. When a
//! search completes after a newer one was issued, its result is discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

use dharti_core::LocateError;

use crate::resolver::{LocateQuery, Resolution, Resolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

impl SearchTicket {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct SearchSequencer {
    latest: AtomicU64,
}

impl SearchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

#[derive(Debug)]
pub enum SearchOutcome {
    Current(Result<Resolution, LocateError>),
    /// A newer search was issued while this one was in flight.
    Stale(SearchTicket),
}

impl SearchOutcome {
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale(_))
    }
}

/// A resolver plus the bookkeeping that keeps stale results off the view.
pub struct LocatorSession {
    resolver: Resolver,
    sequencer: SearchSequencer,
    latest: Mutex<Option<Resolution>>,
}

impl LocatorSession {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver, sequencer: SearchSequencer::new(), latest: Mutex::new(None) }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub async fn search(&self, query: &LocateQuery) -> SearchOutcome {
        let ticket = self.sequencer.begin();
        let result = self.resolver.resolve(query).await;
        self.commit(ticket, result)
    }

    /// Check and store under one lock so a newer search that finished first
    /// is never replaced by an older result.
    fn commit(
        &self,
        ticket: SearchTicket,
        result: Result<Resolution, LocateError>,
    ) -> SearchOutcome {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.sequencer.is_current(ticket) {
            debug!(ticket = ticket.get(), "discarding stale search result");
            return SearchOutcome::Stale(ticket);
        }
        if let Ok(resolution) = &result {
            *latest = Some(resolution.clone());
        }
        SearchOutcome::Current(result)
    }

    /// Result of the most recent search that completed while still current.
    pub fn latest(&self) -> Option<Resolution> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::resolver::ResolutionSource;
    use dharti_core::LatLng;
    use dharti_index::ParcelIndex;
    use std::sync::Arc;

    #[test]
    fn only_the_newest_ticket_is_current() {
        let seq = SearchSequencer::new();
        let first = seq.begin();
        assert!(seq.is_current(first));
        let second = seq.begin();
        assert!(second > first);
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }

    #[test]
    fn older_commit_after_newer_one_is_stale() {
        let index = Arc::new(ParcelIndex::new(Vec::new()).expect("index"));
        let session = LocatorSession::new(Resolver::new(index));
        let older = session.sequencer.begin();
        let newer = session.sequencer.begin();
        let at = |lat| Resolution {
            parcel_id: None,
            point: LatLng::new(lat, 0.0),
            source: ResolutionSource::Place,
        };

        assert!(!session.commit(newer, Ok(at(2.0))).is_stale());
        assert!(session.commit(older, Ok(at(1.0))).is_stale());
        assert_eq!(session.latest().map(|r| r.point), Some(LatLng::new(2.0, 0.0)));
    }
}
