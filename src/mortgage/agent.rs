//! Tool-using mortgage agent: a reason/act loop over the mortgage tools with
//! request pacing and rate-limit retries.

use super::analysis::{analyze_loans, LoanAnalysis};
use super::model::{DataError, MortgageData};
use super::tools::mortgage_toolbox;
use super::workflow::Comparisons;
use agentkit_core::{AgentError, ChatClient, ReactAgent, ReactConfig};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

pub const MAX_STEPS: usize = 8;
pub const MAX_ATTEMPTS: u32 = 3;
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(2);
pub const RETRY_BACKOFF: Duration = Duration::from_secs(5);

/// Keeps consecutive requests at least `min_interval` apart.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::info!(wait_secs = wait.as_secs_f64(), "rate limiting before next request");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Loan analysis produced through the agent, with the agent's own words.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentLoanReport {
    pub analysis: LoanAnalysis,
    pub agent_response: String,
}

#[derive(Debug)]
pub struct MortgageAgent {
    agent: ReactAgent,
    limiter: RateLimiter,
}

impl MortgageAgent {
    pub fn new(client: Arc<dyn ChatClient>) -> Result<Self, AgentError> {
        let config = ReactConfig::default().with_max_iterations(MAX_STEPS);
        Ok(Self {
            agent: ReactAgent::new(client, mortgage_toolbox(), config)?,
            limiter: RateLimiter::new(MIN_REQUEST_INTERVAL),
        })
    }

    /// Run one task through the agent. Failures come back as text.
    pub async fn run_with_retry(&self, prompt: &str) -> String {
        for attempt in 1..=MAX_ATTEMPTS {
            self.limiter.wait().await;

            match self.agent.run(prompt).await {
                Ok(answer) => return answer,
                Err(e) if e.is_rate_limited() => {
                    tracing::warn!(attempt, max_attempts = MAX_ATTEMPTS, "rate limit hit");
                    if attempt < MAX_ATTEMPTS {
                        let wait = RETRY_BACKOFF * attempt;
                        tracing::info!("waiting {} seconds before retrying", wait.as_secs());
                        tokio::time::sleep(wait).await;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "agent execution failed");
                    return format!("Error: {e}");
                }
            }
        }

        format!("Rate limit exceeded after {MAX_ATTEMPTS} attempts. Please try again later.")
    }

    /// Ask the agent to summarise the existing loans. When its reply holds no
    /// usable JSON summary the analysis is computed directly.
    pub async fn analyze_current_loans(
        &self,
        data: &MortgageData,
    ) -> Result<AgentLoanReport, DataError> {
        let loan_data = serde_json::to_string(data)?;
        let prompt = format!(
            "Analyze the mortgage loan data using the analyze_loan_data tool:\n\
             \n\
             {loan_data}\n\
             \n\
             Provide insights about:\n\
             1. Total balance across all loans\n\
             2. Total monthly payments\n\
             3. Weighted average interest rate\n\
             4. Number of loans\n\
             5. Effective remaining term\n\
             \n\
             Return structured results."
        );

        let agent_response = self.run_with_retry(&prompt).await;
        let analysis = match extract_analysis(&agent_response) {
            Some(analysis) => analysis,
            None => {
                tracing::debug!("no JSON summary in agent reply, analysing directly");
                analyze_loans(&data.existing_loans)?
            }
        };

        Ok(AgentLoanReport {
            analysis,
            agent_response,
        })
    }

    pub async fn generate_comparisons(
        &self,
        data: &MortgageData,
        analysis: Option<&LoanAnalysis>,
    ) -> Result<Comparisons, DataError> {
        let Some(analysis) = analysis else {
            tracing::warn!("no valid current loans analysis found");
            return Err(DataError::NoValidAnalysis);
        };

        let rates = data.market_conditions.current_rates_json();
        let goal = data
            .user_goals
            .as_ref()
            .map(|g| g.primary_goal.as_str())
            .unwrap_or("savings");
        let prompt = format!(
            "Analyze mortgage restructuring options for this client:\n\
             \n\
             Current Analysis: {}\n\
             Market Rates: {rates}\n\
             User Goal: {goal}\n\
             \n\
             Use calculate_restructure_options tool to analyze 2-loan combinations.\n\
             \n\
             Provide:\n\
             1. Current Situation Summary\n\
             2. Top 3 Loan Combinations\n\
             3. Monthly Savings for each\n\
             4. Rate Strategy Analysis\n\
             5. Final Recommendation\n\
             \n\
             Be concise and specific.",
            serde_json::to_string(analysis)?
        );

        let response = self.run_with_retry(&prompt).await;
        tracing::info!("personalized comparisons generated");

        Ok(Comparisons {
            analysis: response,
            context: json!({
                "current_loans": analysis,
                "market_conditions": data.market_conditions,
                "user_goals": data.user_goals,
            }),
            error: None,
        })
    }
}

const HUMAN_KEYS: [(&str, &str); 4] = [
    ("total_balance", "Total balance across all loans"),
    ("total_monthly_payment", "Total monthly payments"),
    ("weighted_average_rate", "Weighted average interest rate"),
    ("loan_count", "Number of loans"),
];

/// The first `{...}` span of an agent reply read as a loan summary, either
/// with the tool's field names or with the headings the prompt asked about.
pub fn extract_analysis(reply: &str) -> Option<LoanAnalysis> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }

    let object: Map<String, Value> = serde_json::from_str(&reply[start..=end]).ok()?;
    if object.contains_key(HUMAN_KEYS[0].1) {
        let number = |key: &str| object.get(key).map(numeric_value).unwrap_or(0.0);
        return Some(LoanAnalysis {
            total_balance: number(HUMAN_KEYS[0].1),
            total_monthly_payment: number(HUMAN_KEYS[1].1),
            weighted_average_rate: number(HUMAN_KEYS[2].1),
            loan_count: number(HUMAN_KEYS[3].1).max(0.0) as usize,
            loans: Vec::new(),
        });
    }

    if object.contains_key(HUMAN_KEYS[0].0) {
        return serde_json::from_value(Value::Object(object)).ok();
    }
    None
}

/// Numbers pass through; strings like `$40,000` or `4.5%` are cleaned and
/// parsed. Anything else counts as zero.
pub fn numeric_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s
            .chars()
            .filter(|c| !matches!(c, '$' | ',' | '%'))
            .collect::<String>()
            .trim()
            .parse()
            .unwrap_or(0.0),
        _ => 0.0,
    }
}
