//! Console rendering for the mortgage program.

use super::model::RestructureOption;
use std::fmt;

pub const RULE_WIDTH: usize = 60;

/// Dollar amount with thousands separators and two decimals, e.g. `$12,345.60`.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((&fixed, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("${sign}{grouped}.{cents}")
}

/// Every restructuring option from the data file, numbered from 1.
pub struct OptionsListing<'a>(pub &'a [RestructureOption]);

impl fmt::Display for OptionsListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f, "\n📋 ALL RESTRUCTURING OPTIONS FROM FILE:")?;
        writeln!(f, "{rule}")?;

        if self.0.is_empty() {
            return writeln!(f, "❌ No restructuring options found in the data");
        }

        for (i, option) in self.0.iter().enumerate() {
            let term = option
                .term_months
                .map(|t| t.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            let years = option.term_months.unwrap_or(0.0) / 12.0;

            writeln!(
                f,
                "\n{}. {} - {}",
                i + 1,
                option.option_id.as_deref().unwrap_or("N/A"),
                option.loan_type.as_deref().unwrap_or("N/A")
            )?;
            writeln!(
                f,
                "   📝 Description: {}",
                option
                    .description
                    .as_deref()
                    .unwrap_or("No description available")
            )?;
            writeln!(f, "   ⏱️  Term: {term} months ({years:.1} years)")?;
            if let Some(balance) = option.balance {
                writeln!(f, "   💰 Balance: {}", format_currency(balance))?;
            }
            if let Some(rate) = option.rate {
                writeln!(f, "   📊 Rate: {rate}%")?;
            }
        }

        writeln!(f, "\n{rule}")
    }
}

pub fn options_listing(options: &[RestructureOption]) -> String {
    OptionsListing(options).to_string()
}
