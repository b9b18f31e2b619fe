use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

use crate::models::{BuyerDetails, OrderRecord};
use crate::services::notify::SelectionObserver;
use crate::services::selection::SeatSelectionEngine;
use crate::storage::SessionStore;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("failed to decode checkout form: {0}")]
    Form(#[from] serde_urlencoded::de::Error),
    #[error("invalid buyer details: {0}")]
    Validation(#[from] ValidationErrors),
}

impl CheckoutError {
    /// Поле -> сообщения для подсветки формы
    pub fn field_messages(&self) -> Vec<(String, String)> {
        let CheckoutError::Validation(errors) = self else {
            return Vec::new();
        };

        let mut messages: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    (field.to_string(), message)
                })
            })
            .collect();
        messages.sort();
        messages
    }
}

/// Разобрать тело формы `application/x-www-form-urlencoded` в плоский словарь.
pub fn parse_form(body: &str) -> Result<HashMap<String, String>, CheckoutError> {
    Ok(serde_urlencoded::from_str(body)?)
}

/// Проверка полей покупателя. Движок сам не валидирует, это делает форма.
pub fn validate_buyer(buyer: &BuyerDetails) -> Result<(), CheckoutError> {
    buyer.validate()?;
    Ok(())
}

/// Обработать отправку формы оформления.
///
/// Заказ оформляется и слот очищается даже при невалидных полях; результат проверки
/// возвращается рядом с заказом, чтобы форма могла подсветить ошибки.
pub fn submit_checkout<S, O>(
    engine: &mut SeatSelectionEngine<S, O>,
    body: &str,
) -> Result<(OrderRecord, Result<(), CheckoutError>), CheckoutError>
where
    S: SessionStore,
    O: SelectionObserver,
{
    let fields = parse_form(body)?;
    let buyer = BuyerDetails::from_form(&fields);

    let validation = validate_buyer(&buyer);
    if let Err(e) = &validation {
        warn!("Checkout submitted with invalid buyer details: {}", e);
    }

    let record = engine.finalize_with(buyer);
    info!("Checkout completed for order {}", record.id);

    Ok((record, validation))
}
