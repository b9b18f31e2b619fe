use tracing::debug;

use crate::models::{OrderSummary, SeatId};

/// События для слоя отрисовки: подсветка мест и обновление сводки.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    SeatSelected(SeatId),
    SeatDeselected(SeatId),
    SummaryChanged(OrderSummary),
}

pub trait SelectionObserver {
    fn notify(&mut self, event: &SelectionEvent);
}

/// Никого не уведомляет
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SelectionObserver for NoopObserver {
    fn notify(&mut self, _event: &SelectionEvent) {}
}

/// Пишет события в tracing
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl SelectionObserver for LoggingObserver {
    fn notify(&mut self, event: &SelectionEvent) {
        match event {
            SelectionEvent::SeatSelected(id) => debug!("Seat {} selected", id),
            SelectionEvent::SeatDeselected(id) => debug!("Seat {} deselected", id),
            SelectionEvent::SummaryChanged(summary) => debug!(
                "Summary: {} tickets, {}, checkout {}",
                summary.ticket_count,
                summary.total_label(),
                if summary.checkout_available() { "shown" } else { "hidden" }
            ),
        }
    }
}

/// Копит события, удобно для встраивания и тестов
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub events: Vec<SelectionEvent>,
}

impl RecordingObserver {
    pub fn last_summary(&self) -> Option<&OrderSummary> {
        self.events.iter().rev().find_map(|event| match event {
            SelectionEvent::SummaryChanged(summary) => Some(summary),
            _ => None,
        })
    }

    pub fn take(&mut self) -> Vec<SelectionEvent> {
        std::mem::take(&mut self.events)
    }
}

impl SelectionObserver for RecordingObserver {
    fn notify(&mut self, event: &SelectionEvent) {
        self.events.push(event.clone());
    }
}
