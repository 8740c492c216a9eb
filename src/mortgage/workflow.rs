//! The four-step mortgage analysis run as a state graph:
//! `analyze_current_loans → analyze_restructure_options → compare_scenarios →
//! generate_comparisons`.

use super::analysis::{
    analyze_loans, calculate_restructure_options, compare_scenarios, LoanAnalysis,
    RestructurePlan, ScenarioComparison,
};
use super::model::{Loan, MarketConditions, MortgageData, RestructureOption, UserGoals};
use super::report::format_currency;
use agentkit_core::{
    async_trait, Built, ChatClient, ChatCompletionCallOptions, ChatRequest, Context,
    FunctionNode, Graph, GraphResult, Message, Node, NodeOutput, NodeResult, State, END, START,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

pub const ANALYZE_CURRENT_LOANS: &str = "analyze_current_loans";
pub const ANALYZE_RESTRUCTURE_OPTIONS: &str = "analyze_restructure_options";
pub const COMPARE_SCENARIOS: &str = "compare_scenarios";
pub const GENERATE_COMPARISONS: &str = "generate_comparisons";

pub const SYSTEM_MESSAGE: &str = "Home owner analyzing loan data.";
pub const MISSING_KEY_MESSAGE: &str = "Error: ANTHROPIC_API_KEY not configured";
pub const COMPARISONS_SUCCESS: &str =
    "✅ Personalized comparisons generated successfully! Analysis complete with detailed recommendations.";
pub const FALLBACK_ANALYSIS: &str =
    "Unable to generate AI comparisons due to technical error. Please check your API configuration.";
pub const FALLBACK_PROMPT: &str =
    "Based on the mortgage analysis data, provide personalized comparisons and recommendations.";

/// Results accumulated by the analysis steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_loans: Option<LoanAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restructure_options: Option<RestructurePlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ScenarioComparison>,
}

/// Output of the model-written comparison step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparisons {
    pub analysis: String,
    pub context: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(State, Debug, Clone, Default, Serialize)]
pub struct MortgageState {
    #[update(append)]
    pub messages: Vec<Message>,
    pub current_loans: Vec<Loan>,
    pub restructure_options: Vec<RestructureOption>,
    pub market_conditions: MarketConditions,
    pub user_goals: UserGoals,
    pub analysis_results: AnalysisResults,
    pub comparisons: Option<Comparisons>,
}

impl MortgageState {
    pub fn from_data(data: MortgageData) -> Self {
        Self {
            messages: vec![Message::system(SYSTEM_MESSAGE)],
            current_loans: data.existing_loans,
            restructure_options: data.restructure_options,
            market_conditions: data.market_conditions,
            user_goals: data.user_goals.unwrap_or_default(),
            ..Default::default()
        }
    }

    fn context(&self) -> Value {
        json!({
            "current_loans": self.current_loans,
            "market_conditions": self.market_conditions,
            "user_goals": self.user_goals,
        })
    }
}

pub fn analyze_current_loans(state: &MortgageState) -> Vec<MortgageStateUpdate> {
    match analyze_loans(&state.current_loans) {
        Ok(analysis) => {
            let message = format!(
                "Current loan analysis completed. Total balance: {}",
                format_currency(analysis.total_balance)
            );
            let results = AnalysisResults {
                current_loans: Some(analysis),
                ..state.analysis_results.clone()
            };
            vec![
                MortgageStateUpdate::AnalysisResults(results),
                MortgageStateUpdate::Messages(vec![Message::ai(message)]),
            ]
        }
        Err(e) => {
            tracing::warn!(error = %e, "loan analysis failed");
            vec![MortgageStateUpdate::Messages(vec![Message::ai(format!(
                "Error analyzing current loans: {e}"
            ))])]
        }
    }
}

pub fn analyze_restructure_options(state: &MortgageState) -> Vec<MortgageStateUpdate> {
    let Some(analysis) = &state.analysis_results.current_loans else {
        return vec![];
    };

    let goals = serde_json::to_value(&state.user_goals).unwrap_or(Value::Null);
    let plan = calculate_restructure_options(analysis, &state.market_conditions, goals);
    let message = format!(
        "Restructure analysis completed. {} rate combinations ranked.",
        plan.top_combinations.len()
    );

    vec![
        MortgageStateUpdate::AnalysisResults(AnalysisResults {
            restructure_options: Some(plan),
            ..state.analysis_results.clone()
        }),
        MortgageStateUpdate::Messages(vec![Message::ai(message)]),
    ]
}

pub fn compare_current_scenarios(state: &MortgageState) -> Vec<MortgageStateUpdate> {
    let Some(plan) = &state.analysis_results.restructure_options else {
        return vec![];
    };

    let comparison = compare_scenarios(plan);
    let message = format!(
        "Scenario comparison completed. Best monthly savings: {}",
        format_currency(comparison.savings.monthly)
    );

    vec![
        MortgageStateUpdate::AnalysisResults(AnalysisResults {
            comparison: Some(comparison),
            ..state.analysis_results.clone()
        }),
        MortgageStateUpdate::Messages(vec![Message::ai(message)]),
    ]
}

const PROMPT_RATES: [(&str, &str); 10] = [
    ("Current Rates", "floating"),
    ("6-Month Fixed Rates", "6_months_fixed"),
    ("12-Month Fixed Rates", "12_months_fixed"),
    ("18-Month Fixed Rates", "18_months_fixed"),
    ("24-Month Fixed Rates", "24_months_fixed"),
    ("36-Month Fixed Rates", "36_months_fixed"),
    ("48-Month Fixed Rates", "48_months_fixed"),
    ("60-Month Fixed Rates", "60_months_fixed"),
    ("Flexi Rate", "flexi"),
    ("Offset Rate", "offset"),
];

/// Prompt asking the model to compare rate combinations. `None` when the
/// market data lacks one of the rates the prompt lists.
pub fn comparison_prompt(
    analysis: &LoanAnalysis,
    market: &MarketConditions,
    goals: &UserGoals,
) -> Option<String> {
    let mut rates = String::new();
    for (label, rate_type) in PROMPT_RATES {
        let rate = market.rate(rate_type)?;
        rates.push_str(&format!("- {label}: {rate}%\n"));
    }

    Some(format!(
        "Based on the following mortgage analysis, provide comparisons of combinations of two different rates and terms:\n\
         \n\
         Current Situation:\n\
         - Total Balance: {}\n\
         - Monthly Payment: {}\n\
         \n\
         Market Conditions:\n\
         {rates}\
         \n\
         Considering the following user goals: {}\n\
         \n\
         Please provide:\n\
         1. Break-even analysis considerations\n\
         2. Risk factors to consider\n\
         3. Final comparison with reasoning",
        format_currency(analysis.total_balance),
        format_currency(analysis.total_monthly_payment),
        goals.primary_goal,
    ))
}

/// Asks the model for a written comparison of the restructure options.
pub struct GenerateComparisonsNode {
    client: Option<Arc<dyn ChatClient>>,
}

impl GenerateComparisonsNode {
    pub fn new(client: Option<Arc<dyn ChatClient>>) -> Self {
        Self { client }
    }
}

impl fmt::Debug for GenerateComparisonsNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerateComparisonsNode")
            .field("configured", &self.client.is_some())
            .finish()
    }
}

#[async_trait]
impl Node<MortgageState> for GenerateComparisonsNode {
    async fn process(&self, ctx: &Context, state: MortgageState) -> NodeResult<MortgageState> {
        let Some(analysis) = &state.analysis_results.current_loans else {
            tracing::warn!("no current loan analysis, skipping comparisons");
            return Ok(NodeOutput::unchanged());
        };

        let Some(client) = &self.client else {
            tracing::warn!("ANTHROPIC_API_KEY not found in environment variables");
            return Ok(NodeOutput::update(MortgageStateUpdate::Messages(vec![
                Message::ai(MISSING_KEY_MESSAGE),
            ])));
        };

        let context = state.context();
        let prompt =
            comparison_prompt(analysis, &state.market_conditions, &state.user_goals)
                .unwrap_or_else(|| {
                    tracing::warn!("market rates incomplete, using the generic comparison prompt");
                    FALLBACK_PROMPT.to_string()
                });
        tracing::debug!(%prompt, "comparison prompt");

        let call_ctx = ctx.child();
        let call_options =
            ChatCompletionCallOptions::new(Some(call_ctx.trace_id), call_ctx.parent_trace_id);
        let (comparisons, message) =
            match client.complete(ChatRequest::prompt(prompt), Some(call_options)).await {
                Ok(response) => (
                    Comparisons {
                        analysis: response.content,
                        context,
                        error: None,
                    },
                    COMPARISONS_SUCCESS.to_string(),
                ),
                Err(e) => {
                    tracing::error!(error = %e, "comparison request failed");
                    (
                        Comparisons {
                            analysis: FALLBACK_ANALYSIS.to_string(),
                            context,
                            error: Some(e.to_string()),
                        },
                        format!("Error calling LLM for comparisons: {e}"),
                    )
                }
            };

        Ok(NodeOutput::Updates(vec![
            MortgageStateUpdate::Comparisons(Some(comparisons)),
            MortgageStateUpdate::Messages(vec![Message::ai(message)]),
        ]))
    }

    fn name(&self) -> &str {
        GENERATE_COMPARISONS
    }
}

fn after_loan_analysis(state: &MortgageState) -> String {
    if state.analysis_results.current_loans.is_some() {
        ANALYZE_RESTRUCTURE_OPTIONS.to_string()
    } else {
        END.to_string()
    }
}

fn step<F>(name: &'static str, f: F) -> impl Node<MortgageState>
where
    F: Fn(&MortgageState) -> Vec<MortgageStateUpdate> + Copy + Send + Sync + 'static,
{
    FunctionNode::new(name, move |_ctx: &Context, state: MortgageState| async move {
        Ok(NodeOutput::Updates(f(&state)))
    })
}

/// The mortgage analysis graph. Without a chat client the final step records
/// that no API key was configured.
#[derive(Debug)]
pub struct MortgageWorkflow {
    graph: Graph<MortgageState, Built>,
}

impl MortgageWorkflow {
    pub fn new(client: Option<Arc<dyn ChatClient>>) -> GraphResult<Self> {
        let mut graph = Graph::new("mortgage_workflow");
        graph
            .add_node(step(ANALYZE_CURRENT_LOANS, analyze_current_loans))
            .add_node(step(ANALYZE_RESTRUCTURE_OPTIONS, analyze_restructure_options))
            .add_node(step(COMPARE_SCENARIOS, compare_current_scenarios))
            .add_node(GenerateComparisonsNode::new(client))
            .add_edge(START, ANALYZE_CURRENT_LOANS)
            .add_conditional_edge(ANALYZE_CURRENT_LOANS, after_loan_analysis)
            .add_edge(ANALYZE_RESTRUCTURE_OPTIONS, COMPARE_SCENARIOS)
            .add_edge(COMPARE_SCENARIOS, GENERATE_COMPARISONS)
            .add_edge(GENERATE_COMPARISONS, END);

        Ok(Self {
            graph: graph.build()?,
        })
    }

    pub async fn run(&self, state: MortgageState) -> GraphResult<MortgageState> {
        self.run_with_context(&Context::default(), state).await
    }

    pub async fn run_with_context(
        &self,
        ctx: &Context,
        state: MortgageState,
    ) -> GraphResult<MortgageState> {
        tracing::info!(trace_id = %ctx.trace_id, loans = state.current_loans.len(), "running mortgage workflow");
        self.graph.run(ctx, state).await
    }
}
