//! Mortgage restructuring analysis: loan data, the split-loan rate
//! arithmetic, the analysis workflow graph and a tool-using agent.

mod agent;
mod analysis;
mod model;
mod report;
mod tools;
mod workflow;

pub use agent::{
    extract_analysis, numeric_value, AgentLoanReport, MortgageAgent, RateLimiter, MAX_ATTEMPTS,
    MAX_STEPS, MIN_REQUEST_INTERVAL, RETRY_BACKOFF,
};
pub use analysis::{
    analyze_loans, calculate_restructure_options, compare_scenarios, monthly_payment,
    CurrentSituation, LoanAnalysis, LoanPart, LoanStructure, RateCombination, RestructurePlan,
    Savings, ScenarioComparison, RATE_TYPES, RESTRUCTURE_STRATEGY, TERM_MONTHS, TOP_COMBINATIONS,
};
pub use model::{
    load_mortgage_data, DataError, Loan, MarketConditions, MortgageData, RestructureOption,
    UserGoals, DEFAULT_DATA_FILE,
};
pub use report::{format_currency, options_listing, OptionsListing, RULE_WIDTH};
pub use tools::{
    analyze_loan_json, mortgage_toolbox, restructure_json, LoanDataParams, MortgageTools,
    MortgageToolsAnalyzeLoanData, MortgageToolsCalculateRestructureOptions, RestructureParams,
};
pub use workflow::{
    analyze_current_loans, analyze_restructure_options, compare_current_scenarios,
    comparison_prompt, AnalysisResults, Comparisons, GenerateComparisonsNode, MortgageState,
    MortgageStateUpdate, MortgageWorkflow, ANALYZE_CURRENT_LOANS, ANALYZE_RESTRUCTURE_OPTIONS,
    COMPARE_SCENARIOS, COMPARISONS_SUCCESS, FALLBACK_ANALYSIS, FALLBACK_PROMPT,
    GENERATE_COMPARISONS, MISSING_KEY_MESSAGE, SYSTEM_MESSAGE,
};
