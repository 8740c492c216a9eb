use agentkit::clients::huggingface_client;
use agentkit::cooking::BREAD_PROMPT;
use agentkit::telemetry::init_tracing;
use agentkit_core::{load_dotenv, ChatClient, ChatRequest};
use clap::Parser;
use futures::StreamExt;
use std::io::Write;

/// Ask a hosted model how to make bread and print the answer.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Print the answer as it is generated
    #[arg(long)]
    stream: bool,

    /// Model to query instead of the configured one
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

    let request = ChatRequest::prompt(BREAD_PROMPT);

    if args.stream {
        let mut stream = match client.complete_stream(request, None).await {
            Ok(stream) => stream,
            Err(e) => {
                println!("Error invoking llm: {e}");
                return Ok(());
            }
        };

        print!("Response: ");
        let mut stdout = std::io::stdout();
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(delta) => {
                    print!("{delta}");
                    stdout.flush()?;
                }
                Err(e) => {
                    println!("\nError invoking llm: {e}");
                    return Ok(());
                }
            }
        }
        println!();
    } else {
        match client.complete(request, None).await {
            Ok(response) => println!("Response: {}", response.content),
            Err(e) => println!("Error invoking llm: {e}"),
        }
    }

    Ok(())
}
