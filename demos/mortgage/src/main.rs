use agentkit::clients::anthropic_client;
use agentkit::console::read_line;
use agentkit::mortgage::{
    format_currency, load_mortgage_data, options_listing, MortgageAgent, MortgageData,
    MortgageState, MortgageWorkflow, DEFAULT_DATA_FILE,
};
use agentkit::telemetry::init_tracing;
use agentkit_core::{load_dotenv, ChatClient};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Mortgage restructuring analysis over a JSON file of existing loans and
/// market rates.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Show progress logs
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the four workflow steps and print each result
    Demo {
        #[arg(default_value = DEFAULT_DATA_FILE)]
        file: PathBuf,
    },
    /// Run the tool-using mortgage agent
    Agent {
        #[arg(default_value = DEFAULT_DATA_FILE)]
        file: PathBuf,
    },
    /// List the restructuring options in the data file
    Options {
        #[arg(default_value = DEFAULT_DATA_FILE)]
        file: PathBuf,
    },
}

fn load(path: &Path) -> Option<MortgageData> {
    match load_mortgage_data(path) {
        Ok(data) => {
            println!(" File {} loaded successfully", path.display());
            Some(data)
        }
        Err(e) => {
            println!("❌ {e}");
            None
        }
    }
}

async fn run_demo(data: MortgageData) -> anyhow::Result<()> {
    let client: Option<Arc<dyn ChatClient>> = match anthropic_client() {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            println!("❌ {e}");
            None
        }
    };

    let workflow = MortgageWorkflow::new(client)?;
    let state = workflow.run(MortgageState::from_data(data)).await?;
    let results = &state.analysis_results;

    println!("\n Step 1️⃣: Analyzing Current Loans");
    match &results.current_loans {
        Some(current) => {
            println!("   ✅ Total Balance: {}", format_currency(current.total_balance));
            println!(
                "   ✅ Monthly Payment: {}",
                format_currency(current.total_monthly_payment)
            );
        }
        None => {
            println!("❌ No current loans found");
            if let Some(last) = state.messages.last() {
                println!("   {}", last.content);
            }
            return Ok(());
        }
    }

    println!("\nStep 2️⃣ : Analyzing Restructuring Options");
    print!("{}", options_listing(&state.restructure_options));

    println!("\nStep 3️⃣ : Comparing Scenarios");
    if let Some(comparison) = &results.comparison {
        println!(
            "   ✅ Monthly Savings: {}",
            format_currency(comparison.savings.monthly)
        );
        if let Some(best) = &comparison.best_combination {
            println!("   ✅ Best Combination: {}", best.combination_name);
        }
    }

    println!("\n Step 4️⃣ : Generating comparisons");
    match &state.comparisons {
        Some(comparisons) => {
            println!("\n📝 Comparisons Analysis:");
            println!("{}", serde_json::to_string_pretty(comparisons)?);
        }
        None => {
            println!("❌ No comparisons analysis found.");
            if let Some(last) = state.messages.last() {
                println!("   {}", last.content);
            }
        }
    }

    println!("\n✅ Demo completed! You can now run the interactive agent with:");
    println!("mortgage agent");
    Ok(())
}

async fn run_agent(data: MortgageData) -> anyhow::Result<()> {
    let client = match anthropic_client() {
        Ok(client) => client,
        Err(e) => {
            println!("❌ Error initializing interactive agent: {e}");
            return Ok(());
        }
    };

    let agent = MortgageAgent::new(Arc::new(client))?;
    println!("✅ Mortgage Agent initialized with rate limiting!");
    println!("🏠 Welcome to the Mortgage Restructuring Agent!");

    println!("\n🔍 Analyzing current loans...");
    let report = match agent.analyze_current_loans(&data).await {
        Ok(report) => report,
        Err(e) => {
            println!("❌ Error analyzing loans: {e}");
            return Ok(());
        }
    };
    println!("{}", serde_json::to_string_pretty(&report.analysis)?);
    println!("\n🤖 Agent response:\n{}", report.agent_response);

    println!("\n📊 Generating comparisons...");
    match agent
        .generate_comparisons(&data, Some(&report.analysis))
        .await
    {
        Ok(comparisons) => println!("\n📝 Recommendation:\n{}", comparisons.analysis),
        Err(e) => println!("❌ Error generating comparisons: {e}"),
    }
    Ok(())
}

async fn interactive() -> anyhow::Result<()> {
    println!("🏠 Mortgage Agent Demo");
    println!("{}", "=".repeat(40));
    println!("Choose an option:");
    println!("1. Run automated demos");
    println!("2. Start interactive agent");
    println!("3. Run demos + interactive agent");

    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    let Some(choice) = read_line(&mut input, "\nEnter your choice (1, 2 or 3): ")? else {
        return Ok(());
    };
    let filename = read_line(
        &mut input,
        &format!(
            "Enter the filename of the mortgage data (or press Enter for default '{DEFAULT_DATA_FILE}'): "
        ),
    )?
    .map(|name| name.trim().to_string())
    .filter(|name| !name.is_empty())
    .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());

    let choice = choice.trim();
    if !matches!(choice, "1" | "2" | "3") {
        println!("❌ Invalid choice. Showing options...");
        if let Some(data) = load(Path::new(DEFAULT_DATA_FILE)) {
            print!("{}", options_listing(&data.restructure_options));
        }
        return Ok(());
    }

    let Some(data) = load(Path::new(&filename)) else {
        return Ok(());
    };
    if matches!(choice, "1" | "3") {
        run_demo(data.clone()).await?;
    }
    if matches!(choice, "2" | "3") {
        println!("\n🚀 Starting Interactive Mortgage Agent...");
        run_agent(data).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Command::Demo { file }) => {
            if let Some(data) = load(&file) {
                run_demo(data).await?;
            }
        }
        Some(Command::Agent { file }) => {
            if let Some(data) = load(&file) {
                run_agent(data).await?;
            }
        }
        Some(Command::Options { file }) => {
            if let Some(data) = load(&file) {
                print!("{}", options_listing(&data.restructure_options));
            }
        }
        None => interactive().await?,
    }

    Ok(())
}
