//! Ledger service: request-scoped orchestration of store, rates and reports.
//!
//! Every operation takes the caller's identity explicitly. Nothing here holds
//! per-user state beyond the shared rate and report caches.

use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;

use daybook_shared::types::{Currency, TransactionId, UserId};

use super::error::LedgerError;
use super::store::{TransactionStore, fetch_month};
use super::transaction::{NewTransaction, Transaction};
use crate::calendar::{CalendarGrid, LocalDateKey, MonthRef, to_local_key_in};
use crate::currency::{DisplayContext, RateService};
use crate::export::{CSV_CONTENT_TYPE, export_filename, render_csv};
use crate::reports::{MonthlyReport, ReportCache, ReportKey, ReportService};

/// A month's report in the effective display currency.
#[derive(Debug, Clone)]
pub struct MonthView {
    /// Month covered.
    pub month: MonthRef,
    /// Display currency, rate and advisory used.
    pub context: DisplayContext,
    /// Rollups and summary in display units.
    pub report: Arc<MonthlyReport>,
}

/// A month laid out as a calendar.
#[derive(Debug, Clone)]
pub struct CalendarView {
    /// Report the grid was built from.
    pub view: MonthView,
    /// Sunday-first grid.
    pub grid: CalendarGrid,
}

/// A rendered CSV download.
#[derive(Debug, Clone)]
pub struct ExportDocument {
    /// Suggested file name.
    pub filename: String,
    /// MIME type.
    pub content_type: &'static str,
    /// CSV text.
    pub body: String,
    /// Display context the amounts were rendered in.
    pub context: DisplayContext,
}

/// Orchestrates entry, reporting and export for one caller at a time.
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn TransactionStore>,
    rates: RateService,
    reports: ReportCache,
    timezone: Tz,
}

impl LedgerService {
    /// Creates a new ledger service.
    #[must_use]
    pub fn new(
        store: Arc<dyn TransactionStore>,
        rates: RateService,
        reports: ReportCache,
        timezone: Tz,
    ) -> Self {
        Self {
            store,
            rates,
            reports,
            timezone,
        }
    }

    /// Time zone used for "today" and export timestamps.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    /// The current local day.
    #[must_use]
    pub fn today(&self) -> LocalDateKey {
        to_local_key_in(Utc::now(), self.timezone)
    }

    /// Resolves the display context for `requested`. Never fails.
    pub async fn display_context(&self, requested: Currency) -> DisplayContext {
        self.rates.resolve(requested).await
    }

    /// Lists the owner's entries for a month in base currency, date ordered.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::StoreUnavailable` if the store fails.
    pub async fn list_month(
        &self,
        owner: UserId,
        month: MonthRef,
    ) -> Result<Vec<Transaction>, LedgerError> {
        fetch_month(self.store.as_ref(), owner, month).await
    }

    /// Lists one day's entries in creation order.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::StoreUnavailable` if the store fails.
    pub async fn list_day(
        &self,
        owner: UserId,
        day: LocalDateKey,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let month = self.list_month(owner, day.month()).await?;
        Ok(ReportService::entries_on(&month, day))
    }

    /// Records a new entry whose amount was typed in `entered_in`.
    ///
    /// Non-base amounts are converted with the current rate before storage.
    /// Base-currency entry never depends on the rate source.
    ///
    /// # Errors
    ///
    /// - Validation errors for bad input
    /// - `LedgerError::Conversion` if the rate is unavailable or the converted
    ///   amount rounds to zero
    /// - `LedgerError::StoreUnavailable` if the store fails
    pub async fn record(
        &self,
        owner: UserId,
        input: NewTransaction,
        entered_in: Currency,
    ) -> Result<Transaction, LedgerError> {
        let amount = if entered_in.is_base() {
            input.amount
        } else {
            let rate = self.rates.fetch_rate(entered_in).await?;
            DisplayContext::converted(rate).to_base(input.amount)?
        };

        let saved = self
            .store
            .insert(owner, NewTransaction { amount, ..input })
            .await?;
        self.reports.invalidate_month(owner, saved.date.month());

        tracing::info!(
            transaction_id = %saved.id,
            %owner,
            date = %saved.date,
            kind = %saved.kind,
            "Transaction recorded"
        );
        Ok(saved)
    }

    /// Removes an entry. A missing or foreign id is a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::StoreUnavailable` if the store fails.
    pub async fn remove(&self, owner: UserId, id: TransactionId) -> Result<(), LedgerError> {
        self.store.delete_by_id(owner, id).await?;
        self.reports.invalidate_owner(owner);

        tracing::info!(transaction_id = %id, %owner, "Transaction removed");
        Ok(())
    }

    /// Builds (or reuses) the month report in the requested currency.
    ///
    /// # Errors
    ///
    /// - `LedgerError::StoreUnavailable` if the store fails; the caller must
    ///   surface that as an error state, never as an empty month
    /// - `LedgerError::Report` if a total does not fit a `Decimal`
    pub async fn month_report(
        &self,
        owner: UserId,
        month: MonthRef,
        requested: Currency,
    ) -> Result<MonthView, LedgerError> {
        let context = self.rates.resolve(requested).await;
        let key = ReportKey::new(owner, month, context.display());

        let report = if let Some(cached) = self.reports.get(&key) {
            tracing::debug!(%owner, %month, currency = %context.display(), "Report cache hit");
            cached
        } else {
            let generation = self.reports.generation(owner);
            let transactions = self.list_month(owner, month).await?;
            let report = ReportService::aggregate(&transactions)?.in_display(&context)?;
            self.reports.insert_if_current(key, report, generation)
        };

        Ok(MonthView {
            month,
            context,
            report,
        })
    }

    /// Builds the month calendar with each day's rollup.
    ///
    /// # Errors
    ///
    /// See [`LedgerService::month_report`].
    pub async fn calendar(
        &self,
        owner: UserId,
        month: MonthRef,
        requested: Currency,
    ) -> Result<CalendarView, LedgerError> {
        let view = self.month_report(owner, month, requested).await?;
        let grid = CalendarGrid::build(month, &view.report.daily, self.today());
        Ok(CalendarView { view, grid })
    }

    /// Renders the month as a CSV download.
    ///
    /// # Errors
    ///
    /// - `LedgerError::StoreUnavailable` if the store fails
    /// - `LedgerError::Conversion` if an amount overflows in display units
    pub async fn export(
        &self,
        owner: UserId,
        month: MonthRef,
        requested: Currency,
    ) -> Result<ExportDocument, LedgerError> {
        let context = self.rates.resolve(requested).await;
        let transactions = self.list_month(owner, month).await?;

        tracing::info!(
            %owner,
            %month,
            currency = %context.display(),
            rows = transactions.len(),
            "Exporting transactions"
        );

        Ok(ExportDocument {
            filename: export_filename(month, context.display()),
            content_type: CSV_CONTENT_TYPE,
            body: render_csv(&transactions, &context, self.timezone)?,
            context,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::source::MockRateSource;
    use crate::currency::{CurrencyError, ExchangeRate, RATE_UNAVAILABLE_ADVISORY};
    use crate::ledger::memory::InMemoryTransactionStore;
    use crate::ledger::store::MockTransactionStore;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Notify;

    /// Store whose first listing pauses after reading, until released.
    struct GatedStore {
        inner: InMemoryTransactionStore,
        armed: AtomicBool,
        entered: Notify,
        release: Notify,
    }

    impl GatedStore {
        fn new() -> Self {
            Self {
                inner: InMemoryTransactionStore::new(),
                armed: AtomicBool::new(false),
                entered: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl TransactionStore for GatedStore {
        async fn list_by_owner_and_range(
            &self,
            owner: UserId,
            start: LocalDateKey,
            end: LocalDateKey,
        ) -> Result<Vec<Transaction>, LedgerError> {
            let rows = self.inner.list_by_owner_and_range(owner, start, end).await;
            if self.armed.swap(false, Ordering::SeqCst) {
                self.entered.notify_one();
                self.release.notified().await;
            }
            rows
        }

        async fn insert(
            &self,
            owner: UserId,
            input: NewTransaction,
        ) -> Result<Transaction, LedgerError> {
            self.inner.insert(owner, input).await
        }

        async fn delete_by_id(&self, owner: UserId, id: TransactionId) -> Result<(), LedgerError> {
            self.inner.delete_by_id(owner, id).await
        }
    }

    fn rates_at(rate: rust_decimal::Decimal) -> RateService {
        let mut source = MockRateSource::new();
        source.expect_fetch().returning(move |base, target| {
            ExchangeRate::new(base, target, rate, None)
        });
        RateService::new(Arc::new(source))
    }

    fn offline_rates() -> RateService {
        let mut source = MockRateSource::new();
        source
            .expect_fetch()
            .returning(|_, _| Err(CurrencyError::RateUnavailable("offline".into())));
        RateService::new(Arc::new(source))
    }

    fn service_with(store: Arc<dyn TransactionStore>, rates: RateService) -> LedgerService {
        LedgerService::new(store, rates, ReportCache::new(), Tz::UTC)
    }

    fn entry(date: &str, kind: &str, amount: &str) -> NewTransaction {
        NewTransaction::parse(date, kind, amount, None).unwrap()
    }

    fn october() -> MonthRef {
        MonthRef::new(2025, 10).unwrap()
    }

    async fn seeded(service: &LedgerService, owner: UserId) {
        for (date, kind, amount) in [
            ("2025-10-02", "income", "1800"),
            ("2025-10-02", "expense", "450"),
            ("2025-10-06", "income", "3200"),
        ] {
            service
                .record(owner, entry(date, kind, amount), Currency::Usd)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_month_report_in_base_currency() {
        let service = service_with(Arc::new(InMemoryTransactionStore::new()), offline_rates());
        let owner = UserId::new();
        seeded(&service, owner).await;

        let view = service.month_report(owner, october(), Currency::Usd).await.unwrap();
        assert_eq!(view.report.summary.total_income, dec!(5000));
        assert_eq!(view.report.summary.profit, dec!(4550));
        assert_eq!(view.context.display(), Currency::Usd);
        assert!(view.context.advisory().is_none());
    }

    #[tokio::test]
    async fn test_month_report_degrades_when_rate_unavailable() {
        let service = service_with(Arc::new(InMemoryTransactionStore::new()), offline_rates());
        let owner = UserId::new();
        seeded(&service, owner).await;

        let view = service.month_report(owner, october(), Currency::Php).await.unwrap();
        assert_eq!(view.context.display(), Currency::Usd);
        assert_eq!(view.context.advisory(), Some(RATE_UNAVAILABLE_ADVISORY));
        assert_eq!(view.report.summary.total_income, dec!(5000));
    }

    #[tokio::test]
    async fn test_month_report_converts_to_display_currency() {
        let service = service_with(Arc::new(InMemoryTransactionStore::new()), rates_at(dec!(56)));
        let owner = UserId::new();
        seeded(&service, owner).await;

        let view = service.month_report(owner, october(), Currency::Php).await.unwrap();
        assert_eq!(view.context.display(), Currency::Php);
        assert_eq!(view.report.summary.total_income, dec!(280000));
        assert_eq!(view.report.summary.total_expense, dec!(25200));
    }

    #[tokio::test]
    async fn test_record_invalidates_cached_month() {
        let service = service_with(Arc::new(InMemoryTransactionStore::new()), offline_rates());
        let owner = UserId::new();
        seeded(&service, owner).await;

        let before = service.month_report(owner, october(), Currency::Usd).await.unwrap();
        assert_eq!(before.report.summary.transaction_count, 3);

        service
            .record(owner, entry("2025-10-20", "expense", "50"), Currency::Usd)
            .await
            .unwrap();

        let after = service.month_report(owner, october(), Currency::Usd).await.unwrap();
        assert_eq!(after.report.summary.transaction_count, 4);
        assert_eq!(after.report.summary.profit, dec!(4500));
    }

    #[tokio::test]
    async fn test_report_read_before_a_write_is_not_cached() {
        let store = Arc::new(GatedStore::new());
        let service = service_with(store.clone(), offline_rates());
        let owner = UserId::new();
        service
            .record(owner, entry("2025-10-02", "income", "1800"), Currency::Usd)
            .await
            .unwrap();

        store.armed.store(true, Ordering::SeqCst);
        let pending = tokio::spawn({
            let service = service.clone();
            async move { service.month_report(owner, october(), Currency::Usd).await }
        });
        store.entered.notified().await;
        service
            .record(owner, entry("2025-10-20", "expense", "50"), Currency::Usd)
            .await
            .unwrap();
        store.release.notify_one();

        let raced = pending.await.unwrap().unwrap();
        assert_eq!(raced.report.summary.transaction_count, 1);

        let fresh = service.month_report(owner, october(), Currency::Usd).await.unwrap();
        assert_eq!(fresh.report.summary.transaction_count, 2);
        assert_eq!(fresh.report.summary.profit, dec!(1750));
    }

    #[tokio::test]
    async fn test_record_rejects_conversion_beyond_storage_limit() {
        let service = service_with(Arc::new(InMemoryTransactionStore::new()), rates_at(dec!(0.5)));
        let err = service
            .record(
                UserId::new(),
                entry("2025-10-02", "income", "999999999999.99"),
                Currency::Php,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Conversion(CurrencyError::InvalidAmount(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_invalidates_and_is_owner_scoped() {
        let service = service_with(Arc::new(InMemoryTransactionStore::new()), offline_rates());
        let alice = UserId::new();
        let bob = UserId::new();
        let theirs = service
            .record(alice, entry("2025-10-02", "income", "1800"), Currency::Usd)
            .await
            .unwrap();
        service.month_report(alice, october(), Currency::Usd).await.unwrap();

        service.remove(bob, theirs.id).await.unwrap();
        let still = service.month_report(alice, october(), Currency::Usd).await.unwrap();
        assert_eq!(still.report.summary.transaction_count, 1);

        service.remove(alice, theirs.id).await.unwrap();
        let gone = service.month_report(alice, october(), Currency::Usd).await.unwrap();
        assert!(gone.report.is_empty());
    }

    #[tokio::test]
    async fn test_record_converts_display_amount_to_base() {
        let service = service_with(Arc::new(InMemoryTransactionStore::new()), rates_at(dec!(56)));
        let saved = service
            .record(UserId::new(), entry("2025-10-02", "expense", "560"), Currency::Php)
            .await
            .unwrap();
        assert_eq!(saved.amount, dec!(10));
    }

    #[tokio::test]
    async fn test_record_in_foreign_currency_fails_without_rate() {
        let service = service_with(Arc::new(InMemoryTransactionStore::new()), offline_rates());
        let err = service
            .record(UserId::new(), entry("2025-10-02", "expense", "560"), Currency::Php)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Conversion(CurrencyError::RateUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_record_rejects_amount_that_converts_to_zero() {
        let service = service_with(Arc::new(InMemoryTransactionStore::new()), rates_at(dec!(56)));
        let err = service
            .record(UserId::new(), entry("2025-10-02", "expense", "0.2"), Currency::Php)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Conversion(CurrencyError::InvalidAmount(_))
        ));
    }

    #[tokio::test]
    async fn test_store_failure_propagates_instead_of_empty_month() {
        let mut store = MockTransactionStore::new();
        store
            .expect_list_by_owner_and_range()
            .returning(|_, _, _| Err(LedgerError::StoreUnavailable("db down".into())));
        let service = service_with(Arc::new(store), offline_rates());

        let err = service
            .month_report(UserId::new(), october(), Currency::Usd)
            .await
            .unwrap_err();
        assert_eq!(err, LedgerError::StoreUnavailable("db down".into()));
    }

    #[tokio::test]
    async fn test_list_day_and_calendar() {
        let service = service_with(Arc::new(InMemoryTransactionStore::new()), offline_rates());
        let owner = UserId::new();
        seeded(&service, owner).await;

        let day = service
            .list_day(owner, "2025-10-02".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(day.len(), 2);

        let calendar = service.calendar(owner, october(), Currency::Usd).await.unwrap();
        assert_eq!(calendar.grid.cells.len(), 35);
        assert_eq!(
            calendar.grid.cells.iter().filter(|c| c.rollup.is_some()).count(),
            2
        );
    }

    #[tokio::test]
    async fn test_export_document() {
        let service = service_with(Arc::new(InMemoryTransactionStore::new()), offline_rates());
        let owner = UserId::new();
        seeded(&service, owner).await;

        let doc = service.export(owner, october(), Currency::Php).await.unwrap();
        assert_eq!(doc.filename, "income-tracker-October-2025-usd.csv");
        assert_eq!(doc.content_type, CSV_CONTENT_TYPE);
        assert_eq!(doc.body.lines().count(), 4);
        assert!(doc.body.starts_with("Date,Type,Amount (USD),Note,Timestamp\n2025-10-02,income,1800.00"));
        assert!(doc.context.advisory().is_some());
    }
}
