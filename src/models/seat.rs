use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Идентификатор места: ряд + номер. Порядок сравнения - сначала ряд, потом место.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatId {
    pub row: u32,
    pub seat: u32,
}

impl SeatId {
    /// Ряд и место нумеруются с единицы.
    pub fn new(row: u32, seat: u32) -> Self {
        debug_assert!(row > 0 && seat > 0, "seat id {row}-{seat} must be positive");
        Self { row, seat }
    }

    /// `None`, если ряд или место равны нулю
    pub fn try_new(row: u32, seat: u32) -> Option<Self> {
        (row > 0 && seat > 0).then_some(Self { row, seat })
    }
}

// "3-14" - тот же формат, что и в data-атрибутах схемы зала
impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.seat)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid seat id {0:?}, expected \"<row>-<seat>\" with positive numbers")]
pub struct ParseSeatIdError(pub String);

impl FromStr for SeatId {
    type Err = ParseSeatIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeatIdError(s.to_string());
        // только цифры: u32::from_str пропускает ведущий "+"
        let number = |part: &str| -> Result<u32, ParseSeatIdError> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(err());
            }
            part.parse().map_err(|_| err())
        };

        let (row, seat) = s.split_once('-').ok_or_else(err)?;
        SeatId::try_new(number(row)?, number(seat)?).ok_or_else(err)
    }
}

/// Место в каталоге зала. Справочные данные, движок их не меняет.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub row: u32,
    pub number: u32,
    /// `None` - на схеме не указана цена
    pub price: Option<u32>,
}

impl Seat {
    pub fn new(row: u32, number: u32, price: u32) -> Self {
        debug_assert!(row > 0 && number > 0, "seat {row}-{number} must be positive");
        Self { row, number, price: Some(price) }
    }

    pub fn id(&self) -> SeatId {
        SeatId { row: self.row, seat: self.number }
    }
}
