use crate::core::engine::BillingEngine;
use crate::domain::model::CustomerClass;
use crate::domain::ports::ScheduleProvider;
use crate::utils::error::{BillError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// One row of a readings file: `account,consumption,customer_class`.
#[derive(Debug, Clone, Deserialize)]
pub struct MeterReading {
    pub account: String,
    pub consumption: String,
    pub customer_class: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Billed,
    Rejected,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchRow {
    pub account: String,
    pub consumption: String,
    pub customer_class: String,
    pub subtotal: Option<Decimal>,
    pub surcharge: Option<Decimal>,
    pub total_due: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
    pub status: RowStatus,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub billed: usize,
    pub rejected: usize,
    pub total_billed: Decimal,
}

/// Bills a file of meter readings against one clock.
///
/// Rejected rows are written out with their reason and never stop the run;
/// only an unreadable CSV aborts it.
pub struct BatchRunner<P: ScheduleProvider> {
    engine: BillingEngine<P>,
    now: DateTime<Utc>,
}

impl<P: ScheduleProvider> BatchRunner<P> {
    pub fn new(engine: BillingEngine<P>, now: DateTime<Utc>) -> Self {
        Self { engine, now }
    }

    pub fn run<R: Read, W: Write>(&self, input: R, output: W) -> Result<BatchSummary> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(input);
        let mut writer = csv::Writer::from_writer(output);
        let mut summary = BatchSummary::default();

        for record in reader.deserialize::<MeterReading>() {
            let reading = record?;
            let row = self.bill_reading(reading);

            summary.processed += 1;
            match row.status {
                RowStatus::Billed => {
                    summary.billed += 1;
                    summary.total_billed += row.total_due.unwrap_or_default();
                }
                RowStatus::Rejected => {
                    summary.rejected += 1;
                    tracing::warn!(
                        account = %row.account,
                        reason = row.error.as_deref().unwrap_or_default(),
                        "Reading rejected"
                    );
                }
            }
            writer.serialize(&row)?;
        }

        writer.flush()?;

        tracing::info!(
            processed = summary.processed,
            billed = summary.billed,
            rejected = summary.rejected,
            total_billed = %summary.total_billed,
            "Batch billing finished"
        );

        Ok(summary)
    }

    fn bill_reading(&self, reading: MeterReading) -> BatchRow {
        let outcome = reading
            .customer_class
            .parse::<CustomerClass>()
            .and_then(|class| {
                self.engine
                    .compute_bill_at(reading.consumption.as_str(), class, self.now)
                    .map_err(BillError::from)
            });

        match outcome {
            Ok(bill) => BatchRow {
                account: reading.account,
                consumption: reading.consumption,
                customer_class: bill.customer_class().to_string(),
                subtotal: Some(bill.subtotal()),
                surcharge: Some(bill.surcharge()),
                total_due: Some(bill.total_due()),
                due_date: Some(bill.due_date()),
                status: RowStatus::Billed,
                error: None,
            },
            Err(e) => BatchRow {
                account: reading.account,
                consumption: reading.consumption,
                customer_class: reading.customer_class,
                subtotal: None,
                surcharge: None,
                total_due: None,
                due_date: None,
                status: RowStatus::Rejected,
                error: Some(e.user_friendly_message()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn runner() -> BatchRunner<&'static crate::core::registry::RateRegistry> {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        BatchRunner::new(BillingEngine::builtin(), now)
    }

    #[test]
    fn test_bills_valid_rows_and_reports_rejections() {
        let input = "account,consumption,customer_class\n\
                     A-001,5,residential\n\
                     A-002,abc,residential\n\
                     B-001,50,Commercial\n\
                     C-001,12,industrial\n";
        let mut output = Vec::new();

        let summary = runner().run(input.as_bytes(), &mut output).unwrap();

        assert_eq!(summary.processed, 4);
        assert_eq!(summary.billed, 2);
        assert_eq!(summary.rejected, 2);
        assert_eq!(summary.total_billed, dec!(2499.00));

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "account,consumption,customer_class,subtotal,surcharge,total_due,due_date,status,error"
        );
        assert_eq!(lines[1], "A-001,5,residential,300.00,15.00,315.00,2026-03-16,billed,");
        assert!(lines[2].starts_with("A-002,abc,residential,,,,,rejected,"));
        assert_eq!(lines[3], "B-001,50,commercial,1950.00,234.00,2184.00,2026-03-16,billed,");
        assert!(lines[4].contains("industrial"));
    }

    #[test]
    fn test_missing_column_aborts() {
        let input = "account,consumption\nA-001,5\n";
        let err = runner().run(input.as_bytes(), Vec::new()).unwrap_err();
        assert!(matches!(err, BillError::CsvError(_)));
    }
}
