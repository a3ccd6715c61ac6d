use clap::Parser;

mod commands;
mod host;
mod protocol;
mod server;

use host::EditorOptions;

#[derive(Parser)]
#[command(name = "sparrow-keys", about = "Syntax-aware duplicate and debug-log editor commands")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Start the command server (JSON-RPC over stdio)
    Serve {
        /// Indentation width used when a request carries no options
        #[arg(long, default_value_t = 4)]
        tab_size: u8,

        /// Indent with tabs instead of spaces
        #[arg(long)]
        insert_tabs: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // All logging goes to stderr so stdout is reserved for JSON-RPC.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            tab_size,
            insert_tabs,
        } => {
            let defaults = EditorOptions {
                tab_size,
                insert_spaces: !insert_tabs,
            };
            tracing::info!(?defaults, "Starting sparrow-keys server");
            server::run(defaults).await?;
        }
    }

    Ok(())
}
