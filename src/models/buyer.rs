use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use validator::{Validate, ValidationError};

/// Способ оплаты из формы оформления заказа.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PaymentMethod {
    Card,
    GooglePay,
    ApplePay,
    /// Неизвестное значение из формы, хранится как есть
    Other(String),
}

impl PaymentMethod {
    pub fn display_name(&self) -> &str {
        match self {
            PaymentMethod::Card => "Банківська картка",
            PaymentMethod::GooglePay => "Google Pay",
            PaymentMethod::ApplePay => "Apple Pay",
            PaymentMethod::Other(raw) => raw,
        }
    }

    pub fn form_value(&self) -> &str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::GooglePay => "google-pay",
            PaymentMethod::ApplePay => "apple-pay",
            PaymentMethod::Other(raw) => raw,
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(value: String) -> Self {
        match value.as_str() {
            "card" => PaymentMethod::Card,
            "google-pay" => PaymentMethod::GooglePay,
            "apple-pay" => PaymentMethod::ApplePay,
            _ => PaymentMethod::Other(value),
        }
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        method.form_value().to_string()
    }
}

/// Данные покупателя из формы checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BuyerDetails {
    #[validate(length(min = 1, message = "Це поле обов'язкове для заповнення"))]
    pub fullname: String,
    #[validate(
        length(min = 1, message = "Це поле обов'язкове для заповнення"),
        custom(function = "validate_email")
    )]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    pub comments: Option<String>,
    pub payment_method: PaymentMethod,
}

impl BuyerDetails {
    /// Собирает данные из плоской формы (`fullname`, `email`, `phone`, `comments`, `payment`).
    /// Отсутствующие поля становятся пустыми строками.
    pub fn from_form(fields: &HashMap<String, String>) -> Self {
        let field = |name: &str| {
            fields
                .get(name)
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };
        let comments = field("comments");

        Self {
            fullname: field("fullname"),
            email: field("email"),
            phone: field("phone"),
            comments: (!comments.is_empty()).then_some(comments),
            payment_method: PaymentMethod::from(field("payment")),
        }
    }
}

// local@domain.tld: одна "@", без пробелов, в домене точка не с краю.
// Пустое значение ловит правило length.
fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Ok(());
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            let clean = |part: &str| {
                !part.is_empty() && !part.contains(|c: char| c == '@' || c.is_whitespace())
            };
            clean(local)
                && clean(domain)
                && domain
                    .char_indices()
                    .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("email")
            .with_message(Cow::Borrowed("Введіть коректну email адресу")))
    }
}

// Необязательный "+", дальше не меньше 10 символов из цифр, пробелов, "-", "(", ")"
fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.is_empty() {
        return Err(ValidationError::new("required")
            .with_message(Cow::Borrowed("Це поле обов'язкове для заповнення")));
    }

    let body = phone.strip_prefix('+').unwrap_or(phone);
    let allowed = body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'));

    if allowed && body.chars().count() >= 10 {
        Ok(())
    } else {
        Err(ValidationError::new("phone")
            .with_message(Cow::Borrowed("Введіть коректний номер телефону")))
    }
}
