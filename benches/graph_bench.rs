use agentkit::mortgage::{
    analyze_loans, calculate_restructure_options, Loan, MarketConditions, MortgageData,
    MortgageState, MortgageWorkflow, RATE_TYPES,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::Value;

fn market() -> MarketConditions {
    MarketConditions::from_rates(
        RATE_TYPES
            .iter()
            .enumerate()
            .map(|(i, &rate_type)| (rate_type, 5.0 + i as f64 * 0.1)),
    )
}

fn data() -> MortgageData {
    MortgageData {
        existing_loans: vec![
            Loan::new(320_000.0, 6.4, 2_150.0),
            Loan::new(180_000.0, 6.9, 1_260.0),
        ],
        market_conditions: market(),
        ..Default::default()
    }
}

fn restructure(c: &mut Criterion) {
    let analysis = analyze_loans(&data().existing_loans).expect("sample loans");
    let market = market();

    c.bench_function("restructure_ten_rates", |b| {
        b.iter(|| calculate_restructure_options(black_box(&analysis), black_box(&market), Value::Null))
    });
}

fn workflow(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let workflow = MortgageWorkflow::new(None).expect("workflow graph");

    c.bench_function("mortgage_workflow_offline", |b| {
        b.to_async(&runtime)
            .iter(|| workflow.run(MortgageState::from_data(data())))
    });
}

criterion_group!(benches, restructure, workflow);
criterion_main!(benches);
