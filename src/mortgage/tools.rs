use super::analysis::{analyze_loans, calculate_restructure_options, LoanAnalysis};
use super::model::{Loan, MarketConditions};
use agentkit_core::{tools, ToolBox};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Each argument may be JSON text or an already nested JSON value.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LoanDataParams {
    /// JSON string containing existing loan information
    pub loan_data: Value,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RestructureParams {
    /// JSON string with current loan analysis
    pub current_analysis: Value,
    /// JSON string with current market rates
    pub market_rates: Value,
    /// JSON string with user's financial goals and preferences
    pub user_goals: Value,
}

#[derive(Deserialize)]
struct LoanData {
    #[serde(default)]
    existing_loans: Vec<Loan>,
}

fn decode<T: DeserializeOwned>(arg: &Value) -> serde_json::Result<T> {
    match arg {
        Value::String(text) => serde_json::from_str(text),
        nested => T::deserialize(nested),
    }
}

fn error_json(message: String) -> String {
    json!({ "error": message }).to_string()
}

fn to_json<T: Serialize>(value: &T, context: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| error_json(format!("{context}: {e}")))
}

/// Loan analysis as JSON text. Failures are reported as `{"error": ...}`.
pub fn analyze_loan_json(loan_data: &Value) -> String {
    let data: LoanData = match decode(loan_data) {
        Ok(data) => data,
        Err(e) => return error_json(format!("Error analyzing loan data: {e}")),
    };

    match analyze_loans(&data.existing_loans) {
        Ok(analysis) => to_json(&analysis, "Error analyzing loan data"),
        Err(e) => error_json(e.to_string()),
    }
}

/// Restructure plan as JSON text. Failures are reported as `{"error": ...}`.
pub fn restructure_json(
    current_analysis: &Value,
    market_rates: &Value,
    user_goals: &Value,
) -> String {
    const CONTEXT: &str = "Error calculating restructure options";

    let parsed = decode::<LoanAnalysis>(current_analysis).and_then(|analysis| {
        let market = decode::<MarketConditions>(market_rates)?;
        let goals = decode::<Value>(user_goals)?;
        Ok((analysis, market, goals))
    });

    match parsed {
        Ok((analysis, market, goals)) => to_json(
            &calculate_restructure_options(&analysis, &market, goals),
            CONTEXT,
        ),
        Err(e) => error_json(format!("{CONTEXT}: {e}")),
    }
}

#[derive(Debug, Clone, Default)]
pub struct MortgageTools;

#[tools(
    analyze_loan_data = "Analyze existing mortgage loans and calculate current payment obligations",
    calculate_restructure_options = "Calculate potential restructuring options by dividing the total loan into 2 equal loans and comparing combinations of different rates for each loan"
)]
impl MortgageTools {
    pub async fn analyze_loan_data(&self, params: LoanDataParams) -> String {
        analyze_loan_json(&params.loan_data)
    }

    pub async fn calculate_restructure_options(&self, params: RestructureParams) -> String {
        restructure_json(
            &params.current_analysis,
            &params.market_rates,
            &params.user_goals,
        )
    }
}

pub fn mortgage_toolbox() -> ToolBox {
    ToolBox::new()
        .with_tool(MortgageToolsAnalyzeLoanData(MortgageTools))
        .with_tool(MortgageToolsCalculateRestructureOptions(MortgageTools))
}
