//! Interactive browsing state: criteria, shared selection and request tracking.
//!
//! Only the event loop thread owns a `Session`. Fetches run elsewhere and come
//! back as `(Ticket, result)`; `deliver` decides whether the result still
//! belongs to what the user is looking at.

use crate::catalog::CatalogError;
use crate::domain::models::{Amenity, Cafe, FilterCriteria};
use crate::services::orchestrator::{QueryOutcome, QueryPlan};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub seq: u64,
    pub key: String,
    pub plan: QueryPlan,
    pub criteria: FilterCriteria,
    pub refresh: bool,
}

/// Last-request-wins by criteria key, not by arrival order.
#[derive(Debug, Default)]
pub struct RequestTracker {
    next_seq: u64,
    current: Option<String>,
    applied_seq: u64,
}

impl RequestTracker {
    pub fn begin(&mut self, criteria: &FilterCriteria, refresh: bool) -> Ticket {
        self.next_seq += 1;
        let key = criteria.key();
        self.current = Some(key.clone());
        Ticket {
            seq: self.next_seq,
            key,
            plan: QueryPlan::for_criteria(criteria),
            criteria: criteria.clone(),
            refresh,
        }
    }

    /// Accept a response if it answers the current criteria and is not older
    /// than one already applied.
    pub fn accept(&mut self, ticket: &Ticket) -> bool {
        if self.current.as_deref() != Some(ticket.key.as_str()) || ticket.seq < self.applied_seq {
            return false;
        }
        self.applied_seq = ticket.seq;
        true
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SelectionError {
    #[error("cafe {0} is not in the current results")]
    NotVisible(i64),
}

/// The one cafe highlighted in both list and map.
#[derive(Debug, Default, Clone)]
pub struct Selection {
    selected: Option<Cafe>,
}

impl Selection {
    pub fn get(&self) -> Option<&Cafe> {
        self.selected.as_ref()
    }

    pub fn id(&self) -> Option<i64> {
        self.selected.as_ref().map(|c| c.id)
    }

    pub fn select(&mut self, id: i64, visible: &[Cafe]) -> Result<&Cafe, SelectionError> {
        let cafe = visible
            .iter()
            .find(|c| c.id == id)
            .ok_or(SelectionError::NotVisible(id))?;
        Ok(self.selected.insert(cafe.clone()))
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Drop the selection when its cafe left the visible collection. Returns true if cleared.
    pub fn reconcile(&mut self, visible: &[Cafe]) -> bool {
        match self.id() {
            Some(id) if !visible.iter().any(|c| c.id == id) => {
                self.selected = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Location(Option<String>),
    Toggle(Amenity),
    Clear,
}

#[derive(Debug, Default)]
pub struct Session {
    criteria: FilterCriteria,
    selection: Selection,
    tracker: RequestTracker,
    outcome: QueryOutcome,
}

impl Session {
    pub fn new(criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            ..Self::default()
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn outcome(&self) -> &QueryOutcome {
        &self.outcome
    }

    pub fn is_loading(&self) -> bool {
        self.outcome.loading
    }

    /// Begin a request for the current criteria; the view shows loading until it lands.
    pub fn start(&mut self, refresh: bool) -> Ticket {
        self.outcome = QueryOutcome::loading();
        self.tracker.begin(&self.criteria, refresh)
    }

    pub fn apply_edit(&mut self, edit: Edit) -> Ticket {
        match edit {
            Edit::Location(loc) => self.criteria.location = loc.filter(|l| !l.is_empty()),
            Edit::Toggle(amenity) => {
                self.criteria.toggle(amenity);
            }
            Edit::Clear => self.criteria = FilterCriteria::default(),
        }
        debug!(criteria = %self.criteria.key(), "criteria edited");
        self.start(false)
    }

    /// Settle a response. Returns false when the response was superseded.
    pub fn deliver(&mut self, ticket: &Ticket, result: Result<Vec<Cafe>, CatalogError>) -> bool {
        if !self.tracker.accept(ticket) {
            debug!(seq = ticket.seq, key = %ticket.key, "discarding superseded response");
            return false;
        }
        let result = result.map(|raw| ticket.plan.resolve(&ticket.criteria, raw));
        self.outcome = QueryOutcome::settled(result);
        if self.selection.reconcile(&self.outcome.cafes) {
            info!("selected cafe no longer shown; selection cleared");
        }
        true
    }

    pub fn select(&mut self, id: i64) -> Result<&Cafe, SelectionError> {
        self.selection.select(id, &self.outcome.cafes)
    }

    pub fn deselect(&mut self) {
        self.selection.clear();
    }
}
