//! Payment history export. Uses the `csv` crate for safe serialization.
//!
//! Format: `Month;Amount;Method;Paid At;Recorded By;Notes` (semicolon-delimited, header row).

use crate::domain::Payment;

pub fn payments_to_csv(payments: &[Payment]) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_writer(Vec::new());

    wtr.write_record(["Month", "Amount", "Method", "Paid At", "Recorded By", "Notes"])?;

    for p in payments {
        let amount = p.amount.map(|a| format!("{:.2}", a)).unwrap_or_default();
        let paid_at = p.paid_at.format("%Y-%m-%d %H:%M").to_string();
        // Notes are free text; keep one record per line.
        let notes = p
            .notes
            .as_deref()
            .unwrap_or_default()
            .replace('\n', " ")
            .replace('\r', "");
        wtr.write_record([
            p.month.to_string().as_str(),
            amount.as_str(),
            p.payment_method.to_string().as_str(),
            paid_at.as_str(),
            p.recorded_by.as_deref().unwrap_or_default(),
            notes.as_str(),
        ])?;
    }

    wtr.flush()?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;

    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PaymentMethod;
    use chrono::{TimeZone, Utc};

    fn payment(notes: Option<&str>, amount: Option<f64>) -> Payment {
        Payment {
            id: "p1".into(),
            member_id: "m1".into(),
            month: "2024-06".parse().unwrap(),
            amount,
            payment_method: PaymentMethod::BankTransfer,
            paid_at: Utc.with_ymd_and_hms(2024, 6, 4, 8, 30, 0).unwrap(),
            recorded_by: Some("Front desk".into()),
            notes: notes.map(String::from),
        }
    }

    #[test]
    fn test_payments_to_csv() {
        let csv = payments_to_csv(&[payment(None, Some(50.0))]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Month;Amount;Method;Paid At;Recorded By;Notes"));
        assert_eq!(
            lines.next(),
            Some("2024-06;50.00;Bank Transfer;2024-06-04 08:30;Front desk;")
        );
    }

    #[test]
    fn test_notes_stay_on_one_line() {
        let csv = payments_to_csv(&[payment(Some("paid late;\nwaived fee"), None)]).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("\"paid late; waived fee\""));
    }
}
