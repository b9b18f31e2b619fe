//! selection.rs
//!
//! Движок выбора мест на схеме зала.
//!
//! Ключевые моменты:
//! 1.  **Выбор**: множество `SeatId`, меняется только через `toggle`. Каждый клик
//!     синхронно пересчитывает сводку, уведомляет отрисовку и сохраняет сводку
//!     в сессионное хранилище до возврата управления.
//! 2.  **Сводка**: строки отсортированы по ряду и месту (числами), количество
//!     билетов всегда равно числу строк. Места, пропавшие из каталога, вычищаются
//!     из выбора перед расчетом.
//! 3.  **Оформление**: `finalize` забирает сохраненную сводку вместе с данными
//!     покупателя, очищает слот и возвращает движок в `Idle`.

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::SeatCatalog;
use crate::models::{
    BuyerDetails, OrderRecord, OrderSummary, OrderSummaryLine, PersistedSelection, Seat, SeatId,
};
use crate::services::notify::{NoopObserver, SelectionEvent, SelectionObserver};
use crate::storage::{MemoryStore, SessionStore, StorageError};

/// Ключ слота по умолчанию, совпадает с тем, что читает страница оформления
pub const DEFAULT_SELECTION_KEY: &str = "selectedSeats";

/// Состояние движка.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    /// Ничего не выбрано, слот пуст.
    Idle,
    /// Пользователь кликает по схеме (выбрано ноль или больше мест).
    Selecting,
}

pub struct SeatSelectionEngine<S = MemoryStore, O = NoopObserver> {
    catalog: SeatCatalog,
    selected: HashSet<SeatId>,
    store: S,
    observer: O,
    storage_key: String,
    phase: EnginePhase,
}

impl<S: SessionStore> SeatSelectionEngine<S, NoopObserver> {
    pub fn new(catalog: SeatCatalog, store: S) -> Self {
        Self::with_observer(catalog, store, NoopObserver)
    }
}

impl<S: SessionStore, O: SelectionObserver> SeatSelectionEngine<S, O> {
    pub fn with_observer(catalog: SeatCatalog, store: S, observer: O) -> Self {
        Self {
            catalog,
            selected: HashSet::new(),
            store,
            observer,
            storage_key: DEFAULT_SELECTION_KEY.to_string(),
            phase: EnginePhase::Idle,
        }
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Выбрать место или снять выбор. Возвращает `true`, если место осталось выбранным.
    ///
    /// Неизвестный каталогу id попадает в выбор, но тут же вычищается при пересчете.
    pub fn toggle(&mut self, id: SeatId) -> bool {
        self.phase = EnginePhase::Selecting;

        if self.selected.remove(&id) {
            self.observer.notify(&SelectionEvent::SeatDeselected(id));
        } else {
            self.selected.insert(id);
            self.observer.notify(&SelectionEvent::SeatSelected(id));
        }

        self.recompute();
        self.selected.contains(&id)
    }

    /// Сводка по текущему выбору. Не меняет состояние.
    pub fn compute_summary(&self) -> OrderSummary {
        let mut lines: Vec<OrderSummaryLine> = self
            .selected
            .iter()
            .filter_map(|&id| self.resolve(id))
            .collect();

        lines.sort_unstable_by_key(|line| (line.row, line.seat_number));

        let total_price = lines.iter().map(|line| u64::from(line.price)).sum();

        OrderSummary {
            ticket_count: lines.len(),
            lines,
            total_price,
            created_at: Utc::now(),
        }
    }

    /// Перезаписать слот сводкой целиком.
    pub fn persist(&mut self, summary: &OrderSummary) -> Result<(), StorageError> {
        let data = serde_json::to_string(&PersistedSelection::from(summary))?;
        self.store.set(&self.storage_key, data)
    }

    /// Прочитать сохраненный выбор. Пустой, битый или недоступный слот - `None`.
    pub fn load_persisted(&self) -> Option<PersistedSelection> {
        let raw = match self.store.get(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read '{}' from session storage: {}", self.storage_key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(persisted) => Some(persisted),
            Err(e) => {
                warn!("Ignoring malformed '{}' in session storage: {}", self.storage_key, e);
                None
            }
        }
    }

    /// Оформить заказ из плоской формы покупателя.
    pub fn finalize(&mut self, fields: &HashMap<String, String>) -> OrderRecord {
        self.finalize_with(BuyerDetails::from_form(fields))
    }

    /// Забирает сохраненный выбор, очищает слот и возвращает движок в `Idle`.
    /// Данные покупателя здесь не проверяются.
    pub fn finalize_with(&mut self, buyer: BuyerDetails) -> OrderRecord {
        let persisted = self.load_persisted();

        if let Err(e) = self.store.remove(&self.storage_key) {
            warn!("Failed to clear '{}' in session storage: {}", self.storage_key, e);
        }
        self.reset();

        let (seats, total_price, selected_at) = match persisted {
            Some(p) => (p.seats, p.total_price, DateTime::<Utc>::from_timestamp_millis(p.timestamp)),
            None => (Vec::new(), 0, None),
        };

        let record = OrderRecord {
            id: Uuid::new_v4(),
            buyer,
            seats,
            total_price,
            selected_at,
            created_at: Utc::now(),
        };

        info!(
            "Order {} finalized: {} seats, total {}",
            record.id,
            record.ticket_count(),
            record.total_price
        );
        record
    }

    /// Добавить или обновить место в каталоге. Если оно выбрано - пересчитать сводку.
    pub fn upsert_seat(&mut self, seat: Seat) {
        let id = seat.id();
        self.catalog.insert(seat);
        if self.selected.contains(&id) {
            self.recompute();
        }
    }

    /// Убрать место из каталога. Выбранное место вычищается из выбора.
    pub fn remove_seat(&mut self, id: SeatId) -> bool {
        let removed = self.catalog.remove(id);
        if removed && self.selected.contains(&id) {
            self.recompute();
        }
        removed
    }

    pub fn is_selected(&self, id: SeatId) -> bool {
        self.selected.contains(&id)
    }

    /// Выбранные места по порядку
    pub fn selected_ids(&self) -> Vec<SeatId> {
        let mut ids: Vec<SeatId> = self.selected.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn catalog(&self) -> &SeatCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    // === Внутреннее ===

    fn recompute(&mut self) -> OrderSummary {
        self.prune_stale();

        let summary = self.compute_summary();
        self.observer.notify(&SelectionEvent::SummaryChanged(summary.clone()));

        if let Err(e) = self.persist(&summary) {
            warn!("Failed to persist seat selection: {}", e);
        }
        summary
    }

    fn prune_stale(&mut self) {
        let stale: Vec<SeatId> = self
            .selected
            .iter()
            .copied()
            .filter(|&id| !self.catalog.contains(id))
            .collect();

        for id in stale {
            warn!("Seat {} is not in the catalog, dropping it from selection", id);
            self.selected.remove(&id);
            self.observer.notify(&SelectionEvent::SeatDeselected(id));
        }
    }

    fn resolve(&self, id: SeatId) -> Option<OrderSummaryLine> {
        let Some(price) = self.catalog.price(id) else {
            debug!("Seat {} did not resolve, skipping", id);
            return None;
        };

        let price = price.unwrap_or_else(|| {
            warn!("Seat {} has no price, counting it as 0", id);
            0
        });

        Some(OrderSummaryLine {
            row: id.row,
            seat_number: id.seat,
            price,
        })
    }

    fn reset(&mut self) {
        let mut cleared: Vec<SeatId> = self.selected.drain().collect();
        cleared.sort_unstable();
        for id in cleared {
            self.observer.notify(&SelectionEvent::SeatDeselected(id));
        }
        self.observer.notify(&SelectionEvent::SummaryChanged(OrderSummary::empty()));
        self.phase = EnginePhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notify::RecordingObserver;

    fn catalog() -> SeatCatalog {
        vec![
            Seat::new(1, 1, 100),
            Seat::new(1, 3, 200),
            Seat::new(2, 5, 150),
            Seat::new(10, 2, 90),
        ]
        .into_iter()
        .collect()
    }

    fn engine() -> SeatSelectionEngine<MemoryStore, RecordingObserver> {
        SeatSelectionEngine::with_observer(catalog(), MemoryStore::new(), RecordingObserver::default())
    }

    #[test]
    fn starts_idle_and_empty() {
        let engine = engine();
        assert_eq!(engine.phase(), EnginePhase::Idle);
        assert!(engine.compute_summary().is_empty());
        assert!(engine.load_persisted().is_none());
    }

    #[test]
    fn toggle_selects_then_deselects() {
        let mut engine = engine();
        let id = SeatId::new(1, 1);

        assert!(engine.toggle(id));
        assert!(engine.is_selected(id));
        assert_eq!(engine.phase(), EnginePhase::Selecting);

        assert!(!engine.toggle(id));
        assert!(!engine.is_selected(id));
        assert_eq!(engine.phase(), EnginePhase::Selecting);
    }

    #[test]
    fn rows_sort_numerically_not_lexically() {
        let mut engine = engine();
        engine.toggle(SeatId::new(10, 2));
        engine.toggle(SeatId::new(2, 5));
        engine.toggle(SeatId::new(1, 3));

        let rows: Vec<u32> = engine.compute_summary().lines.iter().map(|l| l.row).collect();
        assert_eq!(rows, vec![1, 2, 10]);
    }

    #[test]
    fn every_toggle_persists_and_notifies() {
        let mut engine = engine();
        engine.toggle(SeatId::new(2, 5));
        engine.toggle(SeatId::new(2, 5));

        // пустая сводка тоже пишется, слот повторяет выбор
        let persisted = engine.load_persisted().unwrap();
        assert!(persisted.seats.is_empty());
        assert_eq!(persisted.total_price, 0);

        let events = engine.observer_mut().take();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], SelectionEvent::SeatSelected(SeatId::new(2, 5)));
        assert_eq!(events[2], SelectionEvent::SeatDeselected(SeatId::new(2, 5)));
        assert!(matches!(&events[3], SelectionEvent::SummaryChanged(s) if s.is_empty()));
    }

    #[test]
    fn unknown_seat_is_pruned_immediately() {
        let mut engine = engine();
        engine.toggle(SeatId::new(1, 1));

        assert!(!engine.toggle(SeatId::new(42, 42)));
        assert_eq!(engine.selected_ids(), vec![SeatId::new(1, 1)]);

        let summary = engine.observer().last_summary().unwrap().clone();
        assert_eq!(summary.ticket_count, 1);
        assert_eq!(summary.total_price, 100);
    }

    #[test]
    fn removed_seat_leaves_selection_and_totals() {
        let mut engine = engine();
        engine.toggle(SeatId::new(1, 3));
        engine.toggle(SeatId::new(2, 5));

        assert!(engine.remove_seat(SeatId::new(1, 3)));

        assert_eq!(engine.selected_ids(), vec![SeatId::new(2, 5)]);
        let persisted = engine.load_persisted().unwrap();
        assert_eq!(persisted.seats.len(), 1);
        assert_eq!(persisted.total_price, 150);
        assert!(engine
            .observer()
            .events
            .contains(&SelectionEvent::SeatDeselected(SeatId::new(1, 3))));
    }

    #[test]
    fn price_update_on_selected_seat_recomputes() {
        let mut engine = engine();
        engine.toggle(SeatId::new(2, 5));
        engine.upsert_seat(Seat::new(2, 5, 175));

        assert_eq!(engine.load_persisted().unwrap().total_price, 175);
    }

    #[test]
    fn missing_price_counts_as_zero() {
        let mut engine = engine();
        engine.upsert_seat(Seat { row: 3, number: 1, price: None });
        engine.toggle(SeatId::new(3, 1));
        engine.toggle(SeatId::new(1, 1));

        let summary = engine.compute_summary();
        assert_eq!(summary.ticket_count, 2);
        assert_eq!(summary.total_price, 100);
        assert_eq!(summary.lines[1].price, 0);
    }

    #[test]
    fn persist_failure_does_not_break_toggle() {
        let mut engine = SeatSelectionEngine::new(catalog(), MemoryStore::with_quota(8));

        assert!(engine.toggle(SeatId::new(1, 1)));
        assert_eq!(engine.compute_summary().ticket_count, 1);
        assert!(engine.load_persisted().is_none());

        let summary = engine.compute_summary();
        let err = engine.persist(&summary).unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
    }

    #[test]
    fn custom_storage_key() {
        let mut engine = SeatSelectionEngine::new(catalog(), MemoryStore::new())
            .with_storage_key("hall-7");
        engine.toggle(SeatId::new(1, 1));

        assert!(engine.store().get("hall-7").unwrap().is_some());
        assert!(engine.store().get(DEFAULT_SELECTION_KEY).unwrap().is_none());
    }

    #[test]
    fn finalize_resets_to_idle() {
        let mut engine = engine();
        engine.toggle(SeatId::new(1, 3));
        engine.toggle(SeatId::new(2, 5));

        let record = engine.finalize(&HashMap::new());
        assert_eq!(record.ticket_count(), 2);
        assert_eq!(record.total_price, 350);
        assert!(record.selected_at.is_some());

        assert_eq!(engine.phase(), EnginePhase::Idle);
        assert!(engine.selected_ids().is_empty());
        assert!(engine.store().get(DEFAULT_SELECTION_KEY).unwrap().is_none());
        assert!(engine.observer().last_summary().unwrap().is_empty());
    }

    #[test]
    fn finalize_treats_malformed_slot_as_empty() {
        let mut store = MemoryStore::new();
        store.set(DEFAULT_SELECTION_KEY, "{not json".to_string()).unwrap();
        let mut engine = SeatSelectionEngine::new(catalog(), store);

        let record = engine.finalize(&HashMap::new());
        assert!(record.seats.is_empty());
        assert_eq!(record.total_price, 0);
        assert!(record.selected_at.is_none());
        assert!(engine.store().get(DEFAULT_SELECTION_KEY).unwrap().is_none());
    }

    #[test]
    fn finalize_survives_unavailable_store() {
        let mut engine = SeatSelectionEngine::new(catalog(), MemoryStore::disabled());
        engine.toggle(SeatId::new(1, 1));

        let record = engine.finalize(&HashMap::new());
        assert!(record.seats.is_empty());
        assert_eq!(engine.phase(), EnginePhase::Idle);
    }
}
