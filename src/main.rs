use anyhow::{Context as _, Result};
use clap::{CommandFactory as _, Parser, Subcommand};
use raclient_config::{Config, LogConfig};
use raclient_core::{RaClient, parse_line, parse_tokens};
use raclient_store::ManifestCredentialStore;
use raclient_types::{
    CredentialStore, DecodePolicy, EmptyCredentialStore, ParameterSet, RaError,
};
use std::io::{self, BufRead, IsTerminal as _, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "raclient", about = "Token personalization console")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// JSON manifest of the token's certificates and private keys.
    #[arg(long, value_name = "FILE", global = true)]
    credentials: Option<PathBuf>,
    /// Accept malformed hex and decimal values instead of rejecting them.
    #[arg(long, global = true)]
    lenient: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read commands from stdin until EOF or `op=exit`.
    Shell,
    /// Run a single command, e.g. `exec op=token_set cuid=a0b1`.
    Exec {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },
    /// Replay commands from a file, one per line.
    Script {
        file: PathBuf,
        /// Abort at the first failing command.
        #[arg(long)]
        stop_on_error: bool,
    },
    /// Print shell completions.
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "raclient", &mut io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("config error: {e}"))?;
    let _log_guard = init_tracing(&config.log)?;
    let mut client = build_client(&cli, &config)?;

    match cli.command {
        Commands::Shell => cmd_shell(&mut client),
        Commands::Exec { tokens } => Ok(cmd_exec(&mut client, &tokens)),
        Commands::Script {
            file,
            stop_on_error,
        } => cmd_script(&mut client, &file, stop_on_error),
        Commands::Completions { .. } => Ok(ExitCode::SUCCESS),
    }
}

fn init_tracing(log: &LogConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let Some(path) = &log.file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .with_context(|| format!("log file {} has no file name", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

fn build_client(cli: &Cli, config: &Config) -> Result<RaClient> {
    let store: Arc<dyn CredentialStore> =
        match cli.credentials.as_ref().or(config.credentials.as_ref()) {
            Some(path) => Arc::new(ManifestCredentialStore::from_file(path)?),
            None => Arc::new(EmptyCredentialStore),
        };
    let policy = if cli.lenient {
        DecodePolicy::Lenient
    } else {
        config.decode_policy
    };

    let mut client = RaClient::stdout(store).with_policy(policy);
    for (name, value) in &config.variables {
        client.vars_mut().set(name.clone(), value.clone());
    }
    if !config.token.is_empty() {
        client
            .dispatch("token_set", &config.token.to_params())
            .context("applying token values from config")?;
    }
    if let Some(path) = &config.debug_log {
        let params = ParameterSet::new().with("filename", path.to_string_lossy());
        client
            .dispatch("debug", &params)
            .context("opening debug log from config")?;
    }
    tracing::debug!(policy = ?policy, "client ready");
    Ok(client)
}

fn is_exit(line: &str) -> bool {
    matches!(line.trim(), "op=exit" | "exit" | "quit")
}

/// Parses and runs one line; returns `false` if it failed.
fn run_line<W: Write>(client: &mut RaClient<W>, line: &str) -> bool {
    match parse_line(line) {
        Ok(Some(command)) => client.execute(&command).is_ok(),
        Ok(None) => true,
        Err(e) => {
            client.report_error(&e);
            false
        }
    }
}

fn cmd_shell(client: &mut RaClient) -> Result<ExitCode> {
    let stdin = io::stdin();
    let prompt = stdin.is_terminal();
    run_shell(client, stdin.lock(), prompt)?;
    Ok(ExitCode::SUCCESS)
}

/// Runs commands from `input` until EOF or an exit command. A line that is
/// not UTF-8 is reported and skipped; only read failures end the loop.
fn run_shell<W: Write, R: BufRead>(
    client: &mut RaClient<W>,
    mut input: R,
    prompt: bool,
) -> Result<()> {
    let mut buf = Vec::new();
    loop {
        if prompt {
            print!("Command> ");
            io::stdout().flush()?;
        }
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let Ok(line) = std::str::from_utf8(&buf) else {
            tracing::warn!(bytes = buf.len(), "skipping input line that is not UTF-8");
            client.report_error(&RaError::malformed("command", "line is not valid UTF-8"));
            continue;
        };
        if is_exit(line) {
            return Ok(());
        }
        run_line(client, line);
    }
}

fn cmd_exec(client: &mut RaClient, tokens: &[String]) -> ExitCode {
    let ok = match parse_tokens(tokens.iter().map(String::as_str)) {
        Ok(command) => client.execute(&command).is_ok(),
        Err(e) => {
            client.report_error(&e);
            false
        }
    };
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn cmd_script(client: &mut RaClient, file: &Path, stop_on_error: bool) -> Result<ExitCode> {
    let script = std::fs::read_to_string(file)
        .with_context(|| format!("cannot read script {}", file.display()))?;
    let mut failures = 0usize;
    for (number, line) in script.lines().enumerate() {
        if is_exit(line) {
            break;
        }
        if !run_line(client, line) {
            failures += 1;
            tracing::warn!(line = number + 1, "script command failed");
            if stop_on_error {
                break;
            }
        }
    }
    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
