//! Monthly report caching using Moka.
//!
//! Entries are keyed by owner, month and effective display currency, and
//! are dropped whenever that owner's data changes. Each owner also has a
//! write generation: a report computed across a write is never cached.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use moka::sync::Cache;

use daybook_shared::config::ReportsConfig;
use daybook_shared::types::{Currency, UserId};

use super::types::MonthlyReport;
use crate::calendar::MonthRef;

/// Default cache capacity (number of entries).
const DEFAULT_CACHE_CAPACITY: u64 = 1000;

/// Default time-to-live for cache entries (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

/// Identifies one cached report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportKey {
    /// Owner of the data.
    pub owner: UserId,
    /// Month covered.
    pub month: MonthRef,
    /// Effective display currency after rate resolution.
    pub currency: Currency,
}

impl ReportKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(owner: UserId, month: MonthRef, currency: Currency) -> Self {
        Self {
            owner,
            month,
            currency,
        }
    }
}

/// An owner's write generation, read before loading data for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// Cache of monthly reports in display units.
#[derive(Clone)]
pub struct ReportCache {
    cache: Cache<ReportKey, Arc<MonthlyReport>>,
    generations: Arc<Mutex<HashMap<UserId, u64>>>,
}

impl ReportCache {
    /// Creates a cache with default settings.
    ///
    /// Default: 1000 entries max, 5 minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a cache with custom configuration.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .support_invalidation_closures()
            .build();

        Self {
            cache,
            generations: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Creates a cache from the `reports` config section.
    #[must_use]
    pub fn from_config(config: &ReportsConfig) -> Self {
        Self::with_config(config.cache_capacity, config.cache_ttl_secs)
    }

    /// Returns a cached report.
    #[must_use]
    pub fn get(&self, key: &ReportKey) -> Option<Arc<MonthlyReport>> {
        self.cache.get(key)
    }

    /// Stores a report and returns the shared handle.
    pub fn insert(&self, key: ReportKey, report: MonthlyReport) -> Arc<MonthlyReport> {
        let report = Arc::new(report);
        self.cache.insert(key, Arc::clone(&report));
        report
    }

    /// Returns the owner's current write generation.
    #[must_use]
    pub fn generation(&self, owner: UserId) -> Generation {
        Generation(self.generations().get(&owner).copied().unwrap_or(0))
    }

    /// Stores a report only if the owner has not written since `seen` was read.
    ///
    /// The report is returned either way; a stale one is simply not cached.
    pub fn insert_if_current(
        &self,
        key: ReportKey,
        report: MonthlyReport,
        seen: Generation,
    ) -> Arc<MonthlyReport> {
        let report = Arc::new(report);
        let generations = self.generations();
        if generations.get(&key.owner).copied().unwrap_or(0) == seen.0 {
            self.cache.insert(key, Arc::clone(&report));
        } else {
            tracing::debug!(owner = %key.owner, month = %key.month, "Skipping cache insert after concurrent write");
        }
        report
    }

    /// Drops every currency variant of one owner's month.
    pub fn invalidate_month(&self, owner: UserId, month: MonthRef) {
        let mut generations = self.generations();
        *generations.entry(owner).or_insert(0) += 1;
        for currency in Currency::ALL {
            self.cache.invalidate(&ReportKey::new(owner, month, currency));
        }
    }

    /// Drops every report of one owner.
    pub fn invalidate_owner(&self, owner: UserId) {
        let mut generations = self.generations();
        *generations.entry(owner).or_insert(0) += 1;
        if let Err(err) = self.cache.invalidate_entries_if(move |key, _| key.owner == owner) {
            tracing::warn!(error = %err, %owner, "Predicate invalidation failed, clearing report cache");
            self.cache.invalidate_all();
        }
    }

    fn generations(&self) -> MutexGuard<'_, HashMap<UserId, u64>> {
        self.generations.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the approximate number of cached reports.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs pending maintenance so `entry_count` is accurate.
    pub fn sync(&self) {
        self.cache.run_pending_tasks();
    }
}

impl Default for ReportCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::reports::MonthlySummary;

    fn report(income: rust_decimal::Decimal) -> MonthlyReport {
        MonthlyReport {
            daily: Vec::new(),
            summary: MonthlySummary {
                total_income: income,
                profit: income,
                ..MonthlySummary::default()
            },
        }
    }

    fn october() -> MonthRef {
        MonthRef::new(2025, 10).unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let cache = ReportCache::new();
        let key = ReportKey::new(UserId::new(), october(), Currency::Usd);

        assert!(cache.get(&key).is_none());
        cache.insert(key, report(dec!(5000)));
        assert_eq!(cache.get(&key).unwrap().summary.total_income, dec!(5000));
    }

    #[test]
    fn test_keys_are_distinct_per_currency_and_month() {
        let cache = ReportCache::new();
        let owner = UserId::new();
        cache.insert(ReportKey::new(owner, october(), Currency::Usd), report(dec!(1)));

        assert!(cache.get(&ReportKey::new(owner, october(), Currency::Php)).is_none());
        let november = october().next().unwrap();
        assert!(cache.get(&ReportKey::new(owner, november, Currency::Usd)).is_none());
    }

    #[test]
    fn test_invalidate_month_drops_all_currencies_of_that_month_only() {
        let cache = ReportCache::new();
        let owner = UserId::new();
        let november = october().next().unwrap();
        for currency in Currency::ALL {
            cache.insert(ReportKey::new(owner, october(), currency), report(dec!(1)));
        }
        cache.insert(ReportKey::new(owner, november, Currency::Usd), report(dec!(2)));

        cache.invalidate_month(owner, october());

        for currency in Currency::ALL {
            assert!(cache.get(&ReportKey::new(owner, october(), currency)).is_none());
        }
        assert!(cache.get(&ReportKey::new(owner, november, Currency::Usd)).is_some());
    }

    #[test]
    fn test_report_computed_across_a_write_is_not_cached() {
        let cache = ReportCache::new();
        let owner = UserId::new();
        let key = ReportKey::new(owner, october(), Currency::Usd);

        let seen = cache.generation(owner);
        cache.invalidate_month(owner, october());
        let served = cache.insert_if_current(key, report(dec!(1)), seen);

        assert_eq!(served.summary.total_income, dec!(1));
        assert!(cache.get(&key).is_none());

        let seen = cache.generation(owner);
        cache.insert_if_current(key, report(dec!(2)), seen);
        assert_eq!(cache.get(&key).unwrap().summary.total_income, dec!(2));
    }

    #[test]
    fn test_generations_are_per_owner() {
        let cache = ReportCache::new();
        let alice = UserId::new();
        let bob = UserId::new();
        let key = ReportKey::new(alice, october(), Currency::Usd);

        let seen = cache.generation(alice);
        cache.invalidate_owner(bob);
        cache.insert_if_current(key, report(dec!(1)), seen);

        assert!(cache.get(&key).is_some());
        assert_ne!(cache.generation(bob), seen);
    }

    #[test]
    fn test_invalidate_owner_keeps_other_owners() {
        let cache = ReportCache::new();
        let alice = UserId::new();
        let bob = UserId::new();
        cache.insert(ReportKey::new(alice, october(), Currency::Usd), report(dec!(1)));
        cache.insert(ReportKey::new(bob, october(), Currency::Usd), report(dec!(2)));

        cache.invalidate_owner(alice);

        assert!(cache.get(&ReportKey::new(alice, october(), Currency::Usd)).is_none());
        assert!(cache.get(&ReportKey::new(bob, october(), Currency::Usd)).is_some());
    }
}
