//! pagefetch MCP server entry point.

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use pagefetch::OutputFormat;

use pagefetch_mcp::config::{ConfigOverrides, ServerConfig};
use pagefetch_mcp::protocol::ProtocolHandler;
use pagefetch_mcp::tools::process_data::transform_file;
use pagefetch_mcp::tools::ToolRegistry;
use pagefetch_mcp::transport::StdioTransport;

#[derive(Parser)]
#[command(
    name = "pagefetch-mcp",
    about = "MCP server for pagefetch: HTTP requests and embedded page-data extraction",
    version
)]
struct Cli {
    #[command(flatten)]
    extraction: ExtractionArgs,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ExtractionArgs {
    /// Substring that marks a payload as carrying an embedded script block.
    /// Also reads PAGEFETCH_MARKER.
    #[arg(long, global = true)]
    marker: Option<String>,

    /// `id` of the embedded JSON script element.
    /// Also reads PAGEFETCH_SCRIPT_ID.
    #[arg(long, global = true)]
    script_id: Option<String>,

    /// Dotted path to the record inside the script JSON.
    /// Also reads PAGEFETCH_RECORD_PATH.
    #[arg(long, global = true)]
    record_path: Option<String>,

    /// Overall HTTP request timeout in seconds (0 = transport default).
    /// Also reads PAGEFETCH_TIMEOUT_SECS.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

impl ExtractionArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            marker: self.marker.clone(),
            script_id: self.script_id.clone(),
            record_path: self.record_path.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve,

    /// Start MCP server over HTTP.
    #[cfg(feature = "sse")]
    ServeHttp {
        /// Listen address (host:port).
        #[arg(long, default_value = "127.0.0.1:3100")]
        addr: String,

        /// Bearer token for authentication.
        /// Also reads PAGEFETCH_TOKEN.
        #[arg(long)]
        token: Option<String>,
    },

    /// Run the transform on a local file and print the result.
    Extract {
        /// HTML or JSON file to process.
        file: PathBuf,

        /// Output shape (compact or detailed).
        #[arg(long, default_value = "detailed")]
        format: OutputFormat,

        /// Comma-separated list of fields to keep, in order.
        #[arg(long, value_delimiter = ',')]
        fields: Option<Vec<String>>,
    },

    /// Print server capabilities as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   pagefetch-mcp completions bash > ~/.local/share/bash-completion/completions/pagefetch-mcp
    ///   pagefetch-mcp completions zsh > ~/.zfunc/_pagefetch-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ServerConfig::resolve(&cli.extraction.overrides());
    tracing::debug!("Resolved configuration: {config:?}");

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            tracing::info!("pagefetch MCP server v{} starting", env!("CARGO_PKG_VERSION"));
            let handler = ProtocolHandler::new(config.build_context()?);
            let transport = StdioTransport::new(handler);
            transport.run().await?;
        }

        #[cfg(feature = "sse")]
        Commands::ServeHttp { addr, token } => {
            use pagefetch_mcp::config::ENV_TOKEN;
            use pagefetch_mcp::transport::SseTransport;

            // Resolve token: CLI flag > env var
            let effective_token = token.or_else(|| std::env::var(ENV_TOKEN).ok());

            tracing::info!("pagefetch MCP server v{} starting", env!("CARGO_PKG_VERSION"));
            if effective_token.is_some() {
                tracing::info!("Auth: bearer token required");
            }

            let handler = ProtocolHandler::new(config.build_context()?);
            let transport = SseTransport::new(handler, effective_token);
            transport.run(&addr).await?;
        }

        Commands::Extract {
            file,
            format,
            fields,
        } => {
            let extractor = config.extractor()?;
            let result = transform_file(&file, format, fields.as_deref(), &extractor)?;
            println!("{}", result.to_pretty_string());
            if result.is_failure() {
                std::process::exit(2);
            }
        }

        Commands::Info => {
            let capabilities = pagefetch_mcp::types::InitializeResult::current();
            let tools = ToolRegistry::list_tools();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "capabilities": capabilities.capabilities,
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
                "extraction": {
                    "marker": config.marker,
                    "script_id": config.script_id,
                    "record_path": config.record_path,
                },
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "pagefetch-mcp", &mut std::io::stdout());
        }
    }

    Ok(())
}
