use super::model::{DataError, Loan, MarketConditions};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Rate types priced by the restructure calculation, in pricing order.
pub const RATE_TYPES: [&str; 10] = [
    "floating",
    "flexi",
    "offset",
    "6_months_fixed",
    "12_months_fixed",
    "18_months_fixed",
    "24_months_fixed",
    "36_months_fixed",
    "48_months_fixed",
    "60_months_fixed",
];

/// Amortisation term assumed for every new loan (25 years).
pub const TERM_MONTHS: u32 = 300;

/// Combinations kept in a [`RestructurePlan`].
pub const TOP_COMBINATIONS: usize = 15;

pub const RESTRUCTURE_STRATEGY: &str = "Split into 2 equal loans with different rate combinations";

/// Summary of the existing loans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanAnalysis {
    #[serde(default)]
    pub total_balance: f64,
    #[serde(
        default,
        alias = "total_monthly_payments",
        alias = "current_monthly_payment"
    )]
    pub total_monthly_payment: f64,
    #[serde(default)]
    pub weighted_average_rate: f64,
    #[serde(default)]
    pub loan_count: usize,
    #[serde(default)]
    pub loans: Vec<Loan>,
}

pub fn analyze_loans(loans: &[Loan]) -> Result<LoanAnalysis, DataError> {
    if loans.is_empty() {
        return Err(DataError::NoLoans);
    }

    let total_balance: f64 = loans.iter().map(|l| l.balance).sum();
    let total_monthly_payment = loans.iter().map(|l| l.monthly_payment).sum();
    let weighted_average_rate = if total_balance > 0.0 {
        loans.iter().map(|l| l.balance * l.rate).sum::<f64>() / total_balance
    } else {
        0.0
    };

    Ok(LoanAnalysis {
        total_balance,
        total_monthly_payment,
        weighted_average_rate,
        loan_count: loans.len(),
        loans: loans.to_vec(),
    })
}

/// Level monthly repayment for an amortised loan. A zero or negative rate
/// spreads the principal evenly.
pub fn monthly_payment(principal: f64, annual_rate: f64, term_months: u32) -> f64 {
    let r = annual_rate / 100.0 / 12.0;
    if r > 0.0 {
        let growth = (1.0 + r).powi(term_months as i32);
        principal * r * growth / (growth - 1.0)
    } else {
        principal / f64::from(term_months)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPart {
    pub amount: f64,
    pub rate_type: String,
    pub rate: f64,
    pub monthly_payment: f64,
}

impl LoanPart {
    fn priced(amount: f64, rate_type: &str, rate: f64) -> Self {
        Self {
            amount,
            rate_type: rate_type.to_string(),
            rate,
            monthly_payment: monthly_payment(amount, rate, TERM_MONTHS),
        }
    }
}

/// Two half-size loans on (possibly) different rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateCombination {
    pub loan1: LoanPart,
    pub loan2: LoanPart,
    pub total_monthly_payment: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    pub weighted_average_rate: f64,
    pub combination_name: String,
}

impl RateCombination {
    fn new(loan1: LoanPart, loan2: LoanPart, current_payment: f64) -> Self {
        let total_monthly_payment = loan1.monthly_payment + loan2.monthly_payment;
        let monthly_savings = current_payment - total_monthly_payment;
        Self {
            total_monthly_payment,
            monthly_savings,
            annual_savings: monthly_savings * 12.0,
            weighted_average_rate: (loan1.rate + loan2.rate) / 2.0,
            combination_name: format!("{} + {}", loan1.rate_type, loan2.rate_type),
            loan1,
            loan2,
        }
    }

    fn rate_pair(&self) -> (String, String) {
        let (a, b) = (&self.loan1.rate_type, &self.loan2.rate_type);
        if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentSituation {
    pub total_balance: f64,
    pub current_monthly_payment: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanStructure {
    pub loan1_amount: f64,
    pub loan2_amount: f64,
    pub total_amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestructurePlan {
    pub current_situation: CurrentSituation,
    pub restructure_strategy: String,
    pub loan_structure: LoanStructure,
    pub top_combinations: Vec<RateCombination>,
    pub user_goals: Value,
}

/// Price every pairing of the available market rates for a balance split
/// into two equal loans.
///
/// Combinations are ranked by monthly savings (ties keep pricing order) and
/// a pair of rate types is only listed once, in its best-ranked order.
pub fn calculate_restructure_options(
    analysis: &LoanAnalysis,
    market: &MarketConditions,
    user_goals: Value,
) -> RestructurePlan {
    let current_balance = analysis.total_balance;
    let current_payment = analysis.total_monthly_payment;
    let loan_amount = current_balance / 2.0;

    let available: Vec<(&str, f64)> = RATE_TYPES
        .iter()
        .filter_map(|&rate_type| market.rate(rate_type).map(|rate| (rate_type, rate)))
        .collect();

    let mut combinations = Vec::with_capacity(available.len() * available.len());
    for &(type1, rate1) in &available {
        for &(type2, rate2) in &available {
            combinations.push(RateCombination::new(
                LoanPart::priced(loan_amount, type1, rate1),
                LoanPart::priced(loan_amount, type2, rate2),
                current_payment,
            ));
        }
    }

    // sort_by is stable
    combinations.sort_by(|a, b| b.monthly_savings.total_cmp(&a.monthly_savings));

    let mut seen = HashSet::new();
    let top_combinations = combinations
        .into_iter()
        .filter(|combo| seen.insert(combo.rate_pair()))
        .take(TOP_COMBINATIONS)
        .collect();

    RestructurePlan {
        current_situation: CurrentSituation {
            total_balance: current_balance,
            current_monthly_payment: current_payment,
        },
        restructure_strategy: RESTRUCTURE_STRATEGY.to_string(),
        loan_structure: LoanStructure {
            loan1_amount: loan_amount,
            loan2_amount: loan_amount,
            total_amount: current_balance,
        },
        top_combinations,
        user_goals,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Savings {
    pub monthly: f64,
    pub annual: f64,
}

/// The best restructure against what is paid today.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub current_monthly_payment: f64,
    pub best_combination: Option<RateCombination>,
    pub savings: Savings,
}

pub fn compare_scenarios(plan: &RestructurePlan) -> ScenarioComparison {
    let best = plan.top_combinations.first().cloned();
    let savings = best
        .as_ref()
        .map(|combo| Savings {
            monthly: combo.monthly_savings,
            annual: combo.annual_savings,
        })
        .unwrap_or_default();

    ScenarioComparison {
        current_monthly_payment: plan.current_situation.current_monthly_payment,
        best_combination: best,
        savings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_analyze_loans_totals_and_weighted_rate() {
        let loans = vec![
            Loan::new(300_000.0, 6.0, 1_900.0),
            Loan::new(100_000.0, 4.0, 600.0),
        ];
        let analysis = analyze_loans(&loans).unwrap();

        assert_eq!(analysis.total_balance, 400_000.0);
        assert_eq!(analysis.total_monthly_payment, 2_500.0);
        assert!(close(analysis.weighted_average_rate, 5.5));
        assert_eq!(analysis.loan_count, 2);
        assert_eq!(analysis.loans, loans);
    }

    #[test]
    fn test_analyze_loans_zero_balance_and_empty() {
        let analysis = analyze_loans(&[Loan::new(0.0, 7.0, 0.0)]).unwrap();
        assert_eq!(analysis.weighted_average_rate, 0.0);

        let err = analyze_loans(&[]).unwrap_err();
        assert_eq!(err.to_string(), "No existing loans found in data");
    }

    #[test]
    fn test_analysis_accepts_payment_aliases() {
        let analysis: LoanAnalysis =
            serde_json::from_value(json!({"total_balance": 10.0, "total_monthly_payments": 2.0}))
                .unwrap();
        assert_eq!(analysis.total_monthly_payment, 2.0);
    }

    #[test]
    fn test_monthly_payment() {
        // 200k over 25 years at 6%
        assert!((monthly_payment(200_000.0, 6.0, TERM_MONTHS) - 1288.60).abs() < 0.01);
        assert!(close(monthly_payment(30_000.0, 0.0, TERM_MONTHS), 100.0));
    }

    #[test]
    fn test_restructure_ranks_and_dedupes_pairs() {
        let analysis = LoanAnalysis {
            total_balance: 400_000.0,
            total_monthly_payment: 3_000.0,
            ..Default::default()
        };
        let market = MarketConditions::from_rates([("floating", 6.5), ("offset", 5.0), ("flexi", 6.0)]);
        let plan = calculate_restructure_options(&analysis, &market, json!({"primary_goal": "x"}));

        assert_eq!(plan.loan_structure.loan1_amount, 200_000.0);
        assert_eq!(plan.restructure_strategy, RESTRUCTURE_STRATEGY);
        assert_eq!(plan.user_goals["primary_goal"], "x");

        // 3 rates give 6 unordered pairs
        let names: Vec<&str> = plan
            .top_combinations
            .iter()
            .map(|c| c.combination_name.as_str())
            .collect();
        assert_eq!(names.len(), 6);
        assert_eq!(names[0], "offset + offset");
        assert_eq!(names[1], "flexi + offset");
        assert_eq!(*names.last().unwrap(), "floating + floating");

        let savings: Vec<f64> = plan.top_combinations.iter().map(|c| c.monthly_savings).collect();
        assert!(savings.windows(2).all(|w| w[0] >= w[1]));

        let best = &plan.top_combinations[0];
        assert!(close(best.annual_savings, best.monthly_savings * 12.0));
        assert!(close(best.weighted_average_rate, 5.0));
        assert!(close(
            best.total_monthly_payment,
            best.loan1.monthly_payment + best.loan2.monthly_payment
        ));
    }

    #[test]
    fn test_restructure_caps_at_fifteen_and_reads_flat_rates() {
        let market: MarketConditions = serde_json::from_value(json!({
            "floating": 6.4, "flexi": 6.5, "offset": 6.3,
            "6_months_fixed": 5.9, "12_months_fixed": 5.6, "18_months_fixed": 5.5,
            "24_months_fixed": 5.4, "36_months_fixed": 5.6, "48_months_fixed": 5.8,
            "60_months_fixed": 5.9, "unknown_product": 1.0
        }))
        .unwrap();
        let analysis = LoanAnalysis {
            total_balance: 500_000.0,
            total_monthly_payment: 3_400.0,
            ..Default::default()
        };
        let plan = calculate_restructure_options(&analysis, &market, Value::Null);

        assert_eq!(plan.top_combinations.len(), TOP_COMBINATIONS);
        assert_eq!(plan.top_combinations[0].combination_name, "24_months_fixed + 24_months_fixed");
        assert!(plan
            .top_combinations
            .iter()
            .all(|c| c.loan1.rate_type != "unknown_product"));
    }

    #[test]
    fn test_compare_scenarios() {
        let analysis = LoanAnalysis {
            total_balance: 100_000.0,
            total_monthly_payment: 700.0,
            ..Default::default()
        };
        let market = MarketConditions::from_rates([("floating", 6.0)]);
        let plan = calculate_restructure_options(&analysis, &market, Value::Null);
        let comparison = compare_scenarios(&plan);

        assert_eq!(comparison.current_monthly_payment, 700.0);
        let best = comparison.best_combination.unwrap();
        assert!(close(comparison.savings.monthly, best.monthly_savings));
        assert!(close(comparison.savings.annual, best.annual_savings));

        let empty = compare_scenarios(&RestructurePlan::default());
        assert!(empty.best_combination.is_none());
        assert_eq!(empty.savings, Savings::default());
    }
}
