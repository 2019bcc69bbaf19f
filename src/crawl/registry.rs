// src/crawl/registry.rs
// =============================================================================
// The set of domains the crawler has already seen.
//
// This is shared by every crawl task running in a level, so it lives behind
// a mutex. The important operation is insert_if_absent(): the "is it new?"
// check and the insert happen under ONE lock acquisition, so two tasks that
// find the same domain at the same moment can never both admit it.
//
// Rust concepts:
// - parking_lot::Mutex: like std::sync::Mutex, but lock() can't be poisoned
//   so there is no Result to unwrap
// - Interior mutability: &self methods that still modify the set
// =============================================================================

use parking_lot::Mutex;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct DomainRegistry {
    domains: Mutex<HashSet<String>>,
}

impl DomainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.lock().contains(domain)
    }

    // Admits a domain if it has not been seen yet
    //
    // Returns: true if this call added the domain, false if it was already there
    pub fn insert_if_absent(&self, domain: &str) -> bool {
        let mut domains = self.domains.lock();
        if domains.contains(domain) {
            return false;
        }
        domains.insert(domain.to_string())
    }

    pub fn len(&self) -> usize {
        self.domains.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.lock().is_empty()
    }

    // Sorted snapshot of every admitted domain.
    pub fn domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = self.domains.lock().iter().cloned().collect();
        domains.sort();
        domains
    }
}
