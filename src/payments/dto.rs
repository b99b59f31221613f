use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::method::Method;
use super::repo::Payment;
use super::summary::Summary;

/// Amounts arrive as whatever the register sends: the numeric keypad
/// submits strings, other clients send plain numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    /// `None` for NaN, infinities, and strings that are not plain decimal
    /// numbers.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Amount::Number(n) => Decimal::from_f64_retain(*n),
            Amount::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub method: String,
    pub amount: Amount,
    pub date: String,
    pub branch_id: String,
    pub user: String,
    #[serde(default)]
    pub shift: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: String,
    pub branch: String,
}

/// Engine summary rounded to two places for display.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsResponse {
    pub per_method: BTreeMap<Method, Decimal>,
    pub grand_total: Decimal,
    pub ignored_rows: usize,
}

impl From<Summary> for TotalsResponse {
    fn from(summary: Summary) -> Self {
        Self {
            per_method: summary
                .per_method
                .into_iter()
                .map(|(method, total)| (method, total.round_dp(2)))
                .collect(),
            grand_total: summary.grand_total.round_dp(2),
            ignored_rows: summary.ignored_rows,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListPaymentsResponse {
    pub data: Vec<Payment>,
    pub totals: TotalsResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_accepts_strings_and_numbers() {
        let from_text = Amount::Text(" 1250.50 ".into());
        assert_eq!(from_text.as_decimal(), Some("1250.50".parse().unwrap()));

        let from_number = Amount::Number(99.9);
        assert!(from_number.as_decimal().is_some());
    }

    #[test]
    fn amount_rejects_garbage() {
        assert_eq!(Amount::Text("12,50".into()).as_decimal(), None);
        assert_eq!(Amount::Text("".into()).as_decimal(), None);
        assert_eq!(Amount::Number(f64::NAN).as_decimal(), None);
        assert_eq!(Amount::Number(f64::INFINITY).as_decimal(), None);
    }

    #[test]
    fn create_request_deserializes_both_amount_shapes() {
        let body = r#"{"method":"cash","amount":"100","date":"2024-05-01T10:00:00Z","branchId":"01","user":"cpaz"}"#;
        let req: CreatePaymentRequest = serde_json::from_str(body).expect("string amount");
        assert!(matches!(req.amount, Amount::Text(_)));
        assert!(req.shift.is_none());

        let body = r#"{"method":"qr","amount":50,"date":"2024-05-01T10:00:00Z","branchId":"01","user":"cpaz","shift":"afternoon"}"#;
        let req: CreatePaymentRequest = serde_json::from_str(body).expect("numeric amount");
        assert!(matches!(req.amount, Amount::Number(_)));
        assert_eq!(req.shift.as_deref(), Some("afternoon"));
    }
}
