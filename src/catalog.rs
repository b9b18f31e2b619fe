use std::collections::HashMap;
use tracing::info;

use crate::config::{ConfigError, HallConfig};
use crate::models::{Seat, SeatId};

/// Каталог мест зала: SeatId -> цена.
///
/// Рендеринг держит его в синхронизации со схемой, движок только читает.
#[derive(Debug, Clone, Default)]
pub struct SeatCatalog {
    seats: HashMap<SeatId, Option<u32>>,
}

impl SeatCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    // Схема зала из конфига: передние ряды дороже
    pub fn from_hall(hall: &HallConfig) -> Result<Self, ConfigError> {
        let mut catalog = Self::new();
        for row in 1..=hall.rows {
            let price = (hall.rows - row)
                .checked_mul(hall.row_price_step)
                .and_then(|extra| extra.checked_add(hall.base_price))
                .ok_or(ConfigError::PriceOverflow { row })?;
            for number in 1..=hall.seats_per_row {
                catalog.insert(Seat::new(row, number, price));
            }
        }
        info!("Generated hall with {} seats", catalog.len());
        Ok(catalog)
    }

    /// Добавить или обновить место. Возвращает предыдущую цену, если место уже было.
    pub fn insert(&mut self, seat: Seat) -> Option<Option<u32>> {
        self.seats.insert(seat.id(), seat.price)
    }

    pub fn remove(&mut self, id: SeatId) -> bool {
        self.seats.remove(&id).is_some()
    }

    pub fn contains(&self, id: SeatId) -> bool {
        self.seats.contains_key(&id)
    }

    /// `None` - места нет в каталоге, `Some(None)` - место есть, но без цены
    pub fn price(&self, id: SeatId) -> Option<Option<u32>> {
        self.seats.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn seats(&self) -> impl Iterator<Item = Seat> + '_ {
        self.seats.iter().map(|(id, price)| Seat {
            row: id.row,
            number: id.seat,
            price: *price,
        })
    }
}

impl FromIterator<Seat> for SeatCatalog {
    fn from_iter<I: IntoIterator<Item = Seat>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for seat in iter {
            catalog.insert(seat);
        }
        catalog
    }
}
