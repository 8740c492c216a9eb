use agentkit::clients::huggingface_client;
use agentkit::console::read_line;
use agentkit::cooking::{cooking_toolbox, is_quit, CURRY_BANNER};
use agentkit::telemetry::init_tracing;
use agentkit_core::{load_dotenv, ReactAgent, ReactConfig};
use clap::Parser;
use std::sync::Arc;

const GOODBYE: &str = "👋 Goodbye! Happy cooking!";

/// Cooking agent that reasons over recipe, ingredient and technique tools.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Model driving the agent instead of the configured one
    #[arg(long)]
    model: Option<String>,

    /// Reasoning steps allowed per question
    #[arg(long, default_value_t = 5)]
    max_iterations: usize,

    /// Hide the agent's intermediate thoughts and tool results
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    let args = Args::parse();
    init_tracing(!args.quiet);

    let client = match huggingface_client(args.model.as_deref()) {
        Ok(client) => client,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };
    println!("Hugging Face client initialized successfully.");

    let config = ReactConfig::default()
        .with_max_iterations(args.max_iterations)
        .with_verbose(!args.quiet);
    let agent = ReactAgent::new(Arc::new(client), cooking_toolbox(), config)?;

    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n{GOODBYE}");
            std::process::exit(0);
        }
    });

    let rule = "-".repeat(60);
    println!("{CURRY_BANNER}");
    println!("{rule}");

    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    loop {
        let Some(line) = read_line(&mut input, "You: ")? else {
            println!("\n{GOODBYE}");
            break;
        };
        let line = line.trim();
        if is_quit(line) {
            println!("{GOODBYE}");
            break;
        }
        if line.is_empty() {
            continue;
        }

        println!("🤖 Agent is thinking...");
        match agent.run(line).await {
            Ok(answer) => println!("Assistant: {answer}"),
            Err(e) => {
                println!("❌ Error: {e}");
                println!("Please try again with a different question.");
            }
        }
        println!("{rule}");
    }

    Ok(())
}
