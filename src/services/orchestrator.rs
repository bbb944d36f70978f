use crate::catalog::{AddOutcome, CatalogApi, CatalogError};
use crate::domain::models::{Cafe, FilterCriteria, NewCafe};
use crate::services::cache::{now_secs, QueryCache};
use crate::services::filter::filter_cafes;
use tracing::{debug, info, warn};

/// Which catalog query a set of criteria needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    All,
    Search(String),
}

impl QueryPlan {
    /// Server-side search only for a bare location; anything with an
    /// amenity requirement fetches everything and filters locally.
    pub fn for_criteria(criteria: &FilterCriteria) -> Self {
        match criteria.location() {
            Some(loc) if !criteria.has_amenity_filters() => QueryPlan::Search(loc.to_string()),
            _ => QueryPlan::All,
        }
    }

    pub fn cache_key(&self) -> String {
        match self {
            QueryPlan::All => "all".to_string(),
            QueryPlan::Search(loc) => format!("search:{}", loc),
        }
    }

    /// Search results are used as returned; full lists go through the client-side filter.
    pub fn resolve(&self, criteria: &FilterCriteria, raw: Vec<Cafe>) -> Vec<Cafe> {
        match self {
            QueryPlan::Search(_) => raw,
            QueryPlan::All => filter_cafes(&raw, criteria),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutcome {
    pub cafes: Vec<Cafe>,
    pub loading: bool,
    pub error: Option<String>,
}

impl QueryOutcome {
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn settled(result: Result<Vec<Cafe>, CatalogError>) -> Self {
        match result {
            Ok(cafes) => Self {
                cafes,
                loading: false,
                error: None,
            },
            Err(e) => Self::failed(&e),
        }
    }

    pub fn failed(error: &CatalogError) -> Self {
        Self {
            cafes: Vec::new(),
            loading: false,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct Orchestrator<A> {
    api: A,
    cache: Option<QueryCache>,
}

impl<A: CatalogApi> Orchestrator<A> {
    pub fn new(api: A, cache: Option<QueryCache>) -> Self {
        Self { api, cache }
    }

    pub fn cached(&self, plan: &QueryPlan) -> Option<Vec<Cafe>> {
        self.cache
            .as_ref()
            .and_then(|c| c.get(&plan.cache_key(), now_secs()))
    }

    /// Raw result of `plan`, from cache while fresh unless `refresh` is set.
    pub fn fetch(&self, plan: &QueryPlan, refresh: bool) -> Result<Vec<Cafe>, CatalogError> {
        if !refresh {
            if let Some(hit) = self.cached(plan) {
                return Ok(hit);
            }
        }
        let cafes = match plan {
            QueryPlan::All => self.api.fetch_all()?,
            QueryPlan::Search(loc) => self.api.search(loc)?,
        };
        debug!(key = %plan.cache_key(), count = cafes.len(), "fetched from catalog");
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(&plan.cache_key(), &cafes, now_secs()) {
                warn!(error = %e, "failed to write query cache");
            }
        }
        Ok(cafes)
    }

    pub fn filtered(
        &self,
        criteria: &FilterCriteria,
        refresh: bool,
    ) -> Result<Vec<Cafe>, CatalogError> {
        let plan = QueryPlan::for_criteria(criteria);
        let raw = self.fetch(&plan, refresh)?;
        Ok(plan.resolve(criteria, raw))
    }

    /// Never served from cache.
    pub fn random(&self) -> Result<Cafe, CatalogError> {
        self.api.random()
    }

    pub fn add(&self, cafe: &NewCafe) -> Result<AddOutcome, CatalogError> {
        let out = self.api.add(cafe)?;
        if let Some(cache) = &self.cache {
            match cache.invalidate_all() {
                Ok(n) => info!(removed = n, "invalidated cached queries after add"),
                Err(e) => warn!(error = %e, "failed to invalidate query cache"),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::RefCell;

    /// In-memory catalog that records every call it receives.
    #[derive(Default)]
    pub struct FakeCatalog {
        pub all: Vec<Cafe>,
        pub search_result: Vec<Cafe>,
        pub fail: bool,
        pub calls: RefCell<Vec<String>>,
    }

    impl FakeCatalog {
        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn check(&self) -> Result<(), CatalogError> {
            if self.fail {
                return Err(CatalogError::Status {
                    status: 503,
                    detail: "catalog down".to_string(),
                });
            }
            Ok(())
        }
    }

    impl CatalogApi for &FakeCatalog {
        fn fetch_all(&self) -> Result<Vec<Cafe>, CatalogError> {
            self.calls.borrow_mut().push("all".to_string());
            self.check()?;
            Ok(self.all.clone())
        }

        fn search(&self, location: &str) -> Result<Vec<Cafe>, CatalogError> {
            self.calls.borrow_mut().push(format!("search?loc={}", location));
            self.check()?;
            Ok(self.search_result.clone())
        }

        fn random(&self) -> Result<Cafe, CatalogError> {
            self.calls.borrow_mut().push("random".to_string());
            self.check()?;
            Ok(self.all[0].clone())
        }

        fn add(&self, cafe: &NewCafe) -> Result<AddOutcome, CatalogError> {
            self.calls.borrow_mut().push(format!("add:{}", cafe.name));
            self.check()?;
            Ok(AddOutcome {
                success: "added".to_string(),
                cafe: None,
            })
        }
    }
}
