pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "boutique",
    about = "Boutique filter pipeline CLI",
    long_about = "Inspect the extraction, reply planning, and query compilation pipeline from the command line.",
    after_help = "Examples:\n  boutique extract \"wedding guest dress under $150\"\n  boutique reply \"pastel-pink in summer\" --filters '{\"occasion\":[\"wedding\"]}'\n  boutique compile --filters '{\"q\":\"dress\",\"sort\":\"price_asc\"}'\n  boutique config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Extract filters and intent flags from an utterance")]
    Extract {
        text: String,
        #[arg(long, value_delimiter = ',', help = "Known brand names to match as whole words")]
        brands: Vec<String>,
    },
    #[command(about = "Plan the assistant reply for one conversation turn")]
    Reply {
        text: String,
        #[arg(long, help = "Prior filters as a JSON object")]
        filters: Option<String>,
        #[arg(long, value_delimiter = ',', help = "Known brand names to match as whole words")]
        brands: Vec<String>,
    },
    #[command(about = "Compile a filter payload into an ordered query plan")]
    Compile {
        #[arg(long, default_value = "{}", help = "Filter payload as a JSON object")]
        filters: String,
        #[arg(long, value_delimiter = ',', help = "Fields to project in the final stage")]
        fields: Vec<String>,
    },
    #[command(about = "Inspect the effective configuration")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Extract { text, brands } => commands::extract::run(&text, &brands),
        Command::Reply { text, filters, brands } => {
            commands::reply::run(&text, filters.as_deref(), &brands)
        }
        Command::Compile { filters, fields } => commands::compile::run(&filters, &fields),
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
