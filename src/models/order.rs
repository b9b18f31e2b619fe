use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::models::{BuyerDetails, SeatId};

/// Строка сводки заказа: одно выбранное место с ценой из каталога.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummaryLine {
    pub row: u32,
    #[serde(rename = "seat")]
    pub seat_number: u32,
    pub price: u32,
}

impl OrderSummaryLine {
    pub fn seat_id(&self) -> SeatId {
        SeatId { row: self.row, seat: self.seat_number }
    }
}

impl fmt::Display for OrderSummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ряд {}, Місце {} - {}",
            self.row,
            self.seat_number,
            format_price(u64::from(self.price))
        )
    }
}

/// Производная сводка по текущему выбору, пересчитывается после каждого клика.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Отсортированы по ряду, затем по месту
    pub lines: Vec<OrderSummaryLine>,
    pub ticket_count: usize,
    pub total_price: u64,
    pub created_at: DateTime<Utc>,
}

impl OrderSummary {
    /// Текст для пустой сводки
    pub const PLACEHOLDER: &'static str = "Оберіть місця на схемі";

    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            ticket_count: 0,
            total_price: 0,
            created_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ticket_count == 0
    }

    /// Кнопка покупки показывается только при непустом выборе
    pub fn checkout_available(&self) -> bool {
        self.ticket_count > 0
    }

    pub fn total_label(&self) -> String {
        format_price(self.total_price)
    }

    /// Сравнение без учета времени расчета
    pub fn same_contents(&self, other: &OrderSummary) -> bool {
        self.lines == other.lines
            && self.ticket_count == other.ticket_count
            && self.total_price == other.total_price
    }
}

/// Запись в сессионном хранилище: `{seats: [{row,seat,price}], totalPrice, timestamp}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSelection {
    pub seats: Vec<OrderSummaryLine>,
    pub total_price: u64,
    /// Unix time в миллисекундах
    pub timestamp: i64,
}

impl From<&OrderSummary> for PersistedSelection {
    fn from(summary: &OrderSummary) -> Self {
        Self {
            seats: summary.lines.clone(),
            total_price: summary.total_price,
            timestamp: summary.created_at.timestamp_millis(),
        }
    }
}

/// Итоговый заказ, который уходит на экран подтверждения.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub buyer: BuyerDetails,
    pub seats: Vec<OrderSummaryLine>,
    pub total_price: u64,
    /// Когда был сохранен выбор мест, если он был
    pub selected_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl OrderRecord {
    pub fn ticket_count(&self) -> usize {
        self.seats.len()
    }

    pub fn confirmation_text(&self) -> String {
        format!(
            "Замовлення оформлено!\nПІБ: {}\nEmail: {}\nТелефон: {}\nСпосіб оплати: {}",
            self.buyer.fullname,
            self.buyer.email,
            self.buyer.phone,
            self.buyer.payment_method.display_name(),
        )
    }
}

/// `1200` -> `"1200 грн"`, как в списке мест и итоговой сумме
pub fn format_price(amount: u64) -> String {
    format!("{amount} грн")
}
