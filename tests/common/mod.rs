#![allow(dead_code)]

use agentkit::mortgage::{Loan, MarketConditions, MortgageData, RestructureOption, UserGoals};
use agentkit_core::*;
use mockall::{mock, Sequence};

mock! {
    pub Client {}

    #[async_trait]
    impl ChatClient for Client {
        async fn complete(
            &self,
            request: ChatRequest,
            options: Option<ChatCompletionCallOptions>,
        ) -> Result<ChatResponse, CompletionError>;
    }
}

/// A client that answers with `replies` in order, once each.
pub fn scripted(replies: &[&'static str]) -> MockClient {
    let mut client = MockClient::new();
    let mut seq = Sequence::new();
    for reply in replies {
        let reply = *reply;
        client
            .expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, _| Ok(ChatResponse::text(reply)));
    }
    client
}

pub fn market_rates() -> MarketConditions {
    MarketConditions::from_rates([
        ("floating", 6.2),
        ("flexi", 6.3),
        ("offset", 6.1),
        ("6_months_fixed", 5.6),
        ("12_months_fixed", 5.4),
        ("18_months_fixed", 5.5),
        ("24_months_fixed", 5.3),
        ("36_months_fixed", 5.5),
        ("48_months_fixed", 5.7),
        ("60_months_fixed", 5.8),
    ])
}

pub fn sample_data() -> MortgageData {
    MortgageData {
        existing_loans: vec![
            Loan::new(300_000.0, 6.5, 2_100.0),
            Loan::new(150_000.0, 7.0, 1_100.0),
        ],
        restructure_options: vec![RestructureOption {
            option_id: Some("A".into()),
            loan_type: Some("fixed".into()),
            term_months: Some(24.0),
            ..Default::default()
        }],
        market_conditions: market_rates(),
        user_goals: Some(UserGoals::default()),
    }
}
