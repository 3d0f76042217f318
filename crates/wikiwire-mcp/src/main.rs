use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wikiwire::http::WikiConfig;

#[derive(Parser, Debug)]
#[command(name = "wikiwire")]
#[command(about = "Wikipedia lookups over MCP stdio", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as an MCP stdio server (for MCP clients).
    #[cfg(feature = "stdio")]
    McpStdio,
    /// Invoke one tool through the MCP dispatcher and print the result envelope (json).
    #[cfg(feature = "stdio")]
    Call(CallCmd),
    /// Diagnose configuration/launch issues (json).
    Doctor(DoctorCmd),
    /// Print version info.
    Version(VersionCmd),
}

#[derive(clap::Args, Debug)]
struct CallCmd {
    /// Tool name: search, get_summary, get_content, get_page_info
    tool: String,
    /// Tool arguments as a JSON object, e.g. '{"title":"Archimedes"}'
    #[arg(long, default_value = "{}")]
    args: String,
}

#[derive(clap::Args, Debug)]
struct DoctorCmd {
    /// Attempt a local stdio MCP handshake (list_tools) to prove a client can start the server.
    ///
    /// This spawns a child `wikiwire mcp-stdio` process and calls `list_tools`. It does not
    /// contact Wikipedia.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    check_stdio: bool,
    /// Timeout for the stdio handshake (ms).
    #[arg(long, default_value_t = 3000)]
    timeout_ms: u64,
}

#[derive(clap::Args, Debug)]
struct VersionCmd {
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
}

/// Opt-in `KEY=VALUE` env file (`WIKIWIRE_ENV_FILE`). MCP hosts rarely launch servers from
/// an interactive shell, so this gives one place to keep overrides. Never overrides
/// variables already present in the process environment.
fn load_env_file() {
    let Ok(p) = std::env::var("WIKIWIRE_ENV_FILE") else {
        return;
    };
    let p = p.trim();
    if p.is_empty() {
        return;
    }
    let Ok(txt) = std::fs::read_to_string(p) else {
        return;
    };
    for raw in txt.lines() {
        let s = raw.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        let Some((k, v)) = s.split_once('=') else {
            continue;
        };
        let k = k.trim();
        if k.is_empty() {
            continue;
        }
        if std::env::var_os(k).is_none() {
            std::env::set_var(k, v.trim());
        }
    }
}

/// Logs go to stderr: stdout is the MCP channel.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wikiwire=info,wikiwire_http=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config() -> Result<WikiConfig> {
    WikiConfig::from_env().context("failed to load configuration")
}

#[cfg(feature = "stdio")]
async fn serve_stdio() -> Result<()> {
    use wikiwire::mcp::{lifecycle::McpServer, WikiMcp};

    let config = load_config()?;
    tracing::info!(
        api_url = %config.api_url,
        search_url = %config.search_url,
        lang = %config.lang,
        "starting wikiwire MCP server on stdio"
    );
    let handler = WikiMcp::new(&config).context("failed to create server handler")?;
    let running = McpServer::new(handler).start().await?;

    let stop = running.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, shutting down");
            stop.stop();
        }
    });

    running.wait().await?;
    tracing::info!("server shutdown complete");
    Ok(())
}

#[cfg(feature = "stdio")]
async fn call_once(args: CallCmd) -> Result<()> {
    let arguments: serde_json::Value =
        serde_json::from_str(&args.args).context("--args must be valid JSON")?;
    let Some(arguments) = arguments.as_object().cloned() else {
        anyhow::bail!("--args must be a JSON object");
    };
    let handler = wikiwire::mcp::WikiMcp::new(&load_config()?)?;
    let result = handler.call_tool_by_name(&args.tool, Some(arguments)).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[cfg(feature = "stdio")]
async fn probe_stdio(timeout_ms: u64) -> serde_json::Value {
    use rmcp::service::ServiceExt;
    use rmcp::transport::{ConfigureCommandExt, TokioChildProcess};
    use tokio::process::Command;

    let exe = std::env::current_exe().unwrap_or_else(|_| std::path::PathBuf::from("wikiwire"));
    let child = match TokioChildProcess::new(Command::new(exe).configure(|cmd| {
        cmd.args(["mcp-stdio"]);
        cmd.env("RUST_LOG", "error");
    })) {
        Ok(c) => c,
        Err(e) => {
            return serde_json::json!({"name": "mcp_stdio_handshake", "ok": false, "message": e.to_string()})
        }
    };
    let service = match ().serve(child).await {
        Ok(s) => s,
        Err(e) => {
            return serde_json::json!({"name": "mcp_stdio_handshake", "ok": false, "message": e.to_string()})
        }
    };
    let res = tokio::time::timeout(
        std::time::Duration::from_millis(timeout_ms),
        service.list_tools(Default::default()),
    )
    .await;
    let check = match res {
        Ok(Ok(tools)) => serde_json::json!({
            "name": "mcp_stdio_handshake",
            "ok": true,
            "tool_count": tools.tools.len(),
        }),
        Ok(Err(e)) => serde_json::json!({
            "name": "mcp_stdio_handshake",
            "ok": false,
            "message": e.to_string(),
        }),
        Err(_elapsed) => serde_json::json!({
            "name": "mcp_stdio_handshake",
            "ok": false,
            "message": format!("stdio handshake timed out after {timeout_ms}ms"),
        }),
    };
    let _ = service.cancel().await;
    check
}

async fn doctor(args: DoctorCmd) -> Result<()> {
    let mut checks: Vec<serde_json::Value> = Vec::new();
    let config = match WikiConfig::from_env() {
        Ok(c) => {
            checks.push(serde_json::json!({"name": "config", "ok": true}));
            Some(c)
        }
        Err(e) => {
            checks.push(serde_json::json!({"name": "config", "ok": false, "message": e.to_string()}));
            None
        }
    };

    #[cfg(feature = "stdio")]
    if args.check_stdio {
        checks.push(probe_stdio(args.timeout_ms).await);
    }
    #[cfg(not(feature = "stdio"))]
    let _ = &args;

    let ok = checks.iter().all(|c| c["ok"].as_bool() == Some(true));
    let v = serde_json::json!({
        "kind": "doctor",
        "ok": ok,
        "name": "wikiwire",
        "version": env!("CARGO_PKG_VERSION"),
        "config": config,
        "checks": checks,
    });
    println!("{}", serde_json::to_string_pretty(&v)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env_file();
    init_tracing();

    let cli = Cli::parse();

    let res = match cli.command {
        #[cfg(feature = "stdio")]
        Commands::McpStdio => serve_stdio().await,
        #[cfg(feature = "stdio")]
        Commands::Call(args) => call_once(args).await,
        Commands::Doctor(args) => doctor(args).await,
        Commands::Version(args) => {
            match args.output.to_ascii_lowercase().as_str() {
                "text" => println!("wikiwire {}", env!("CARGO_PKG_VERSION")),
                _ => println!(
                    "{}",
                    serde_json::json!({
                        "kind": "version",
                        "name": "wikiwire",
                        "version": env!("CARGO_PKG_VERSION"),
                    })
                ),
            }
            Ok(())
        }
    };
    if let Err(e) = &res {
        tracing::error!("{e:#}");
    }
    res
}
