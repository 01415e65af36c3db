//! Parlance CLI entry point.

use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use parlance_runtime::{Repl, ScriptedEditor, demo_session};
use tracing_subscriber::EnvFilter;

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    batch_mode: bool,
    show_banner: bool,
    show_help: bool,
    show_version: bool,
    log_filter: Option<String>,
    save_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig {
        show_banner: true,
        ..CliConfig::default()
    };

    let mut args = args.into_iter().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "-b" | "--batch" => config.batch_mode = true,
            "--no-banner" => config.show_banner = false,
            "--log" => {
                let filter = args.next().ok_or("--log requires a filter, such as 'debug'")?;
                config.log_filter = Some(filter);
            }
            "--save-dir" => {
                let dir = args.next().ok_or("--save-dir requires a directory")?;
                config.save_dir = Some(PathBuf::from(dir));
            }
            other => return Err(format!("unknown option: {other}").into()),
        }
    }

    Ok(config)
}

/// Logs go to stderr so they never mix with game text.
fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("parlance {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_tracing(config.log_filter.as_deref());

    let (session, renderer, _) = demo_session()?;
    let save_dir = config.save_dir.unwrap_or_else(|| PathBuf::from("."));

    if config.batch_mode {
        let editor = ScriptedEditor::from_reader(io::stdin().lock())?.echoing();
        let mut repl = Repl::with_editor(editor, session, renderer)
            .with_save_dir(save_dir)
            .without_banner();
        repl.run()?;
        return Ok(());
    }

    let mut repl = Repl::new(session, renderer)?.with_save_dir(save_dir);
    if !config.show_banner {
        repl = repl.without_banner();
    }
    repl.run()?;
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mParlance\x1b[0m - A parser-driven interactive fiction runtime

\x1b[1mUSAGE:\x1b[0m
    parlance [OPTIONS]

\x1b[1mOPTIONS:\x1b[0m
    -h, --help           Print help information
    -V, --version        Print version information
    -b, --batch          Read commands from stdin, one per line, and exit
        --no-banner      Skip the welcome banner
        --log FILTER     Log filter for stderr, such as 'debug' or
                         'parlance_engine=trace' (default: RUST_LOG, else warn)
        --save-dir DIR   Where 'save' and 'restore' keep quicksave.psave

\x1b[1mEXAMPLES:\x1b[0m
    parlance                          Play the demo story
    parlance --log debug              Play with scoring and parse logs
    echo 'take lamp' | parlance -b    Run one command and exit

\x1b[1mIN GAME:\x1b[0m
    look, take, drop, put ... in/on, open, close, lock, unlock,
    switch on/off, go <direction>, examine, inventory, wait, sleep
    undo, again (g), save, restore, restart, quit"
    );
}
