use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_DATA_FILE: &str = "mortgage_data.json";

#[derive(Error, Debug)]
pub enum DataError {
    #[error("File {path} not found")]
    NotFound { path: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("Failed to encode mortgage data: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("No existing loans found in data")]
    NoLoans,

    #[error("No valid loan analysis available")]
    NoValidAnalysis,
}

/// An existing loan. Fields other than the three used in the arithmetic are
/// kept as they were read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    #[serde(default)]
    pub balance: f64,
    /// Annual interest rate in percent
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub monthly_payment: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Loan {
    pub fn new(balance: f64, rate: f64, monthly_payment: f64) -> Self {
        Self {
            balance,
            rate,
            monthly_payment,
            extra: Map::new(),
        }
    }
}

/// A restructuring offer as listed in the data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestructureOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_months: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Market data as found in the file. Rates live either under
/// `current_rates` or directly at the top level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketConditions(pub Map<String, Value>);

impl MarketConditions {
    pub fn from_rates<'a>(rates: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let rates: Map<String, Value> = rates
            .into_iter()
            .map(|(name, rate)| (name.to_string(), Value::from(rate)))
            .collect();
        let mut map = Map::new();
        map.insert("current_rates".to_string(), Value::Object(rates));
        Self(map)
    }

    fn rate_table(&self) -> &Map<String, Value> {
        match self.0.get("current_rates") {
            Some(Value::Object(rates)) => rates,
            _ => &self.0,
        }
    }

    pub fn rate(&self, rate_type: &str) -> Option<f64> {
        self.rate_table().get(rate_type).and_then(Value::as_f64)
    }

    /// Every numeric rate, keyed by rate type.
    pub fn rates(&self) -> BTreeMap<String, f64> {
        self.rate_table()
            .iter()
            .filter_map(|(name, value)| value.as_f64().map(|rate| (name.clone(), rate)))
            .collect()
    }

    /// The rate table as JSON, the way it is handed to the agent tools.
    pub fn current_rates_json(&self) -> Value {
        Value::Object(self.rate_table().clone())
    }
}

/// What the home owner is optimising for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGoals {
    #[serde(default = "default_primary_goal")]
    pub primary_goal: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_primary_goal() -> String {
    "monthly_savings".to_string()
}

impl Default for UserGoals {
    fn default() -> Self {
        Self::new(default_primary_goal())
    }
}

impl UserGoals {
    pub fn new(primary_goal: impl Into<String>) -> Self {
        Self {
            primary_goal: primary_goal.into(),
            extra: Map::new(),
        }
    }
}

/// Contents of a mortgage data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MortgageData {
    #[serde(default)]
    pub existing_loans: Vec<Loan>,
    #[serde(default)]
    pub restructure_options: Vec<RestructureOption>,
    #[serde(default)]
    pub market_conditions: MarketConditions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_goals: Option<UserGoals>,
}

pub fn load_mortgage_data(path: impl AsRef<Path>) -> Result<MortgageData, DataError> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => DataError::NotFound {
            path: shown.clone(),
        },
        _ => DataError::Io {
            path: shown.clone(),
            source,
        },
    })?;

    let data = serde_json::from_str(&raw).map_err(|source| DataError::Json {
        path: shown.clone(),
        source,
    })?;
    tracing::debug!(path = %shown, "loaded mortgage data");
    Ok(data)
}
