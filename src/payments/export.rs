use anyhow::Context;

use super::repo::Payment;

/// Flat CSV of a day's rows for the download endpoint.
pub fn to_csv(payments: &[Payment]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["id", "method", "amount", "date", "branch", "user", "shift"])
        .context("write csv header")?;
    for payment in payments {
        writer
            .write_record([
                payment.id.to_string(),
                payment.method.clone(),
                format!("{:.2}", payment.amount),
                payment.date.clone(),
                payment.branch_id.clone(),
                payment.user.clone(),
                payment.shift.clone(),
            ])
            .context("write csv row")?;
    }
    writer.flush().context("flush csv")?;
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("finish csv: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn exports_header_and_rows() {
        let payments = vec![Payment {
            id: 7,
            method: "cash".into(),
            amount: 1250.5,
            date: "2024-05-01T10:00:00Z".into(),
            branch_id: "01".into(),
            user: "cpaz".into(),
            shift: "morning".into(),
            deleted: false,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }];

        let bytes = to_csv(&payments).expect("csv");
        let text = String::from_utf8(bytes).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("id,method,amount,date,branch,user,shift")
        );
        assert_eq!(
            lines.next(),
            Some("7,cash,1250.50,2024-05-01T10:00:00Z,01,cpaz,morning")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_ledger_exports_header_only() {
        let bytes = to_csv(&[]).expect("csv");
        let text = String::from_utf8(bytes).expect("utf8");
        assert_eq!(text.trim_end(), "id,method,amount,date,branch,user,shift");
    }
}
