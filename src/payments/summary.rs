use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::warn;

use super::method::Method;
use super::repo::Payment;

/// Per-method and grand totals for one date/branch scope.
///
/// Amounts accumulate exactly; rounding belongs to whoever renders the
/// summary. `grand_total` leaves adjustments out: they correct counting
/// discrepancies and must not inflate the reported take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub per_method: BTreeMap<Method, Decimal>,
    pub grand_total: Decimal,
    /// Rows whose method label matched nothing in the fixed set. They are
    /// skipped rather than failing the whole reconciliation.
    pub ignored_rows: usize,
}

pub fn summarize(payments: &[Payment]) -> Summary {
    let mut per_method: BTreeMap<Method, Decimal> =
        Method::ALL.iter().map(|m| (*m, Decimal::ZERO)).collect();
    let mut ignored_rows = 0;

    for payment in payments {
        let Some(method) = Method::parse(&payment.method) else {
            warn!(id = payment.id, method = %payment.method, "unrecognized payment method ignored");
            ignored_rows += 1;
            continue;
        };
        let amount = Decimal::from_f64_retain(payment.amount).unwrap_or_default();
        *per_method.entry(method).or_insert(Decimal::ZERO) += amount;
    }

    let grand_total = per_method
        .iter()
        .filter(|(method, _)| **method != Method::Adjustment)
        .map(|(_, total)| *total)
        .sum();

    Summary {
        per_method,
        grand_total,
        ignored_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn payment(method: &str, amount: f64) -> Payment {
        Payment {
            id: 0,
            method: method.to_string(),
            amount,
            date: "2024-05-01T10:00:00Z".to_string(),
            branch_id: "01".to_string(),
            user: "cpaz".to_string(),
            shift: "morning".to_string(),
            deleted: false,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn buckets_by_method_and_excludes_adjustments_from_grand_total() {
        let payments = vec![
            payment("cash", 100.0),
            payment("qr", 50.0),
            payment("adjustment", -10.0),
            payment("cash", 25.0),
        ];

        let summary = summarize(&payments);
        assert_eq!(summary.per_method[&Method::Cash], dec("125"));
        assert_eq!(summary.per_method[&Method::Qr], dec("50"));
        assert_eq!(summary.per_method[&Method::Adjustment], dec("-10"));
        assert_eq!(summary.grand_total, dec("175"));
        assert_eq!(summary.ignored_rows, 0);
    }

    #[test]
    fn every_bucket_is_present_even_when_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.per_method.len(), Method::ALL.len());
        assert!(summary.per_method.values().all(|t| *t == Decimal::ZERO));
        assert_eq!(summary.grand_total, Decimal::ZERO);
    }

    #[test]
    fn unrecognized_labels_are_counted_not_fatal() {
        let payments = vec![
            payment("cash", 100.0),
            payment("cheque", 500.0),
            payment("", 1.0),
        ];

        let summary = summarize(&payments);
        assert_eq!(summary.ignored_rows, 2);
        assert_eq!(summary.grand_total, dec("100"));
    }

    #[test]
    fn legacy_spanish_labels_aggregate() {
        let payments = vec![payment("efectivo", 10.0), payment("tarjeta", 5.0)];

        let summary = summarize(&payments);
        assert_eq!(summary.per_method[&Method::Cash], dec("10"));
        assert_eq!(summary.per_method[&Method::Card], dec("5"));
        assert_eq!(summary.grand_total, dec("15"));
    }

    #[test]
    fn accumulation_has_no_float_drift() {
        // 0.1 + 0.2 style sums stay exact in decimal space
        let payments: Vec<Payment> = (0..100).map(|_| payment("cash", 0.1)).collect();
        let summary = summarize(&payments);
        assert_eq!(summary.per_method[&Method::Cash].round_dp(2), dec("10.00"));
    }
}
