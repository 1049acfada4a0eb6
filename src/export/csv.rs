//! CSV export of year summaries

use std::io::Write;

use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::Money;
use crate::reports::{MonthSummary, YearReport};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryRow {
    year: i32,
    month: String,
    food: String,
    going_out: String,
    fixed_actual: String,
    variable: String,
    misc: String,
    grand_total: String,
    income: String,
}

impl SummaryRow {
    fn new(year: i32, month: String, summary: &MonthSummary) -> Self {
        let amount = |m: Money| m.to_string();
        Self {
            year,
            month,
            food: amount(summary.food_total),
            going_out: amount(summary.going_out_total),
            fixed_actual: amount(summary.fixed_actual_total),
            variable: amount(summary.variable_total),
            misc: amount(summary.misc_total),
            grand_total: amount(summary.grand_total),
            income: amount(summary.income_total),
        }
    }
}

/// Write the twelve monthly rows of a year report plus a total row
pub fn export_year_summary_csv<W: Write>(report: &YearReport, writer: W) -> LedgerResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let rows = report
        .months
        .iter()
        .map(|(month, summary)| SummaryRow::new(report.year, format!("{:02}", month), summary))
        .chain(std::iter::once(SummaryRow::new(
            report.year,
            "total".to_string(),
            &report.total,
        )));

    for row in rows {
        csv_writer
            .serialize(row)
            .map_err(|e| LedgerError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| LedgerError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::factory::create_year;
    use crate::models::{ExpenseEntry, FixedCostTemplate};

    #[test]
    fn test_export_year_summary() {
        let rent = FixedCostTemplate::new("Miete", Money::from_cents(90000));
        let mut year = create_year(2026, &[rent], "").unwrap();
        year.month_mut(2)
            .unwrap()
            .misc_costs
            .push(ExpenseEntry::new("Kaffee, Kuchen", Money::from_cents(1250)));

        let mut output = Vec::new();
        export_year_summary_csv(&YearReport::generate(&year), &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 1 + 12 + 1);
        assert_eq!(
            lines[0],
            "year,month,food,goingOut,fixedActual,variable,misc,grandTotal,income"
        );
        assert_eq!(lines[2], "2026,02,0.00,0.00,900.00,0.00,12.50,912.50,0.00");
        assert_eq!(lines[13], "2026,total,0.00,0.00,10800.00,0.00,12.50,10812.50,0.00");
    }
}
