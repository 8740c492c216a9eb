use agentkit::clients::huggingface_client;
use agentkit::console::read_line;
use agentkit::cooking::{clarification_prompt, is_quit, is_vague_input, Conversation};
use agentkit::telemetry::init_tracing;
use agentkit_core::{load_dotenv, ChatClient};
use clap::Parser;

const RULE: &str = "--------------------------------------------------";

/// Multi-turn cooking chat held in memory for one session.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Model to chat with instead of the configured one
    #[arg(long)]
    model: Option<String>,

    /// Show progress logs
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    let args = Args::parse();
    init_tracing(args.verbose);

    let client = match huggingface_client(args.model.as_deref()) {
        Ok(client) => client,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };
    println!("Hugging Face client initialized successfully.");

    let mut conversation = Conversation::default();
    println!("Chat initialized! Type 'quit' to exit.");
    println!("{RULE}");

    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    while let Some(line) = read_line(&mut input, "You: ")? {
        let line = line.trim();
        if is_quit(line) {
            println!("Goodbye!");
            break;
        }
        if line.is_empty() {
            continue;
        }

        if is_vague_input(line) {
            println!("Assistant: {}", clarification_prompt(line));
            println!("{RULE}");
            continue;
        }

        let request = conversation.ask(line);
        match client.complete(request, None).await {
            Ok(response) => {
                println!("Assistant: {}", response.content);
                conversation.push_ai(response.content);
            }
            Err(e) => println!("Error getting response: {e}"),
        }
        println!("{RULE}");
    }

    Ok(())
}
