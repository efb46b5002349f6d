//! Stale-response guard for interactive searches.
//!
//! Filter changes fire a new search without cancelling the previous one, so
//! a slow early request can resolve after a fast later one. The session
//! numbers each search when it starts; only the newest may be shown.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use careers_common::{JobPost, JobSearchParams, Paginated};

use crate::{CmsClient, CmsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Fresh(T),
    /// A newer search started before this one finished; drop the result.
    Superseded,
}

impl<T> Outcome<T> {
    pub fn into_fresh(self) -> Option<T> {
        match self {
            Outcome::Fresh(value) => Some(value),
            Outcome::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Outcome::Superseded)
    }
}

#[derive(Debug, Default)]
pub struct SearchSession {
    latest: AtomicU64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the start of a new search; every earlier ticket goes stale.
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Takes a ticket now, when the call is made rather than when the
    /// returned future is first polled.
    pub fn run<'a, F>(&'a self, fut: F) -> impl Future<Output = Outcome<F::Output>> + 'a
    where
        F: Future + 'a,
    {
        let ticket = self.begin();
        async move {
            let output = fut.await;
            if self.is_current(ticket) {
                Outcome::Fresh(output)
            } else {
                Outcome::Superseded
            }
        }
    }

    pub fn search<'a>(
        &'a self,
        client: &'a CmsClient,
        params: &'a JobSearchParams,
    ) -> impl Future<Output = Outcome<Result<Paginated<JobPost>, CmsError>>> + 'a {
        self.run(client.search_jobs(params))
    }
}
