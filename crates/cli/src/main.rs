mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Warrant value document toolchain.
#[derive(Parser)]
#[command(name = "warrant", version, about = "Warrant value document toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a value document and report whether it is well-formed
    Check {
        /// Path to the JSON document
        file: PathBuf,
        /// Treat the file as an entities document (array of containers)
        #[arg(long)]
        entities: bool,
    },

    /// Decode a document and re-encode it in canonical form
    Canon {
        /// Path to the JSON document
        file: PathBuf,
        /// Treat the file as an entities document (array of containers)
        #[arg(long)]
        entities: bool,
    },

    /// Decode a value document and print its policy-literal expression
    Expr {
        /// Path to the JSON document
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    let output = cli.output;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Check { file, entities } => commands::check::cmd_check(&file, entities, output, quiet),
        Commands::Canon { file, entities } => commands::canon::cmd_canon(&file, entities, output, quiet),
        Commands::Expr { file } => commands::expr::cmd_expr(&file, output, quiet),
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{{\"error\": \"{}\"}}", msg.replace('"', "\\\""));
        }
    }
}
