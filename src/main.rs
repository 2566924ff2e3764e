use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hump::index::stats::write_stats;
use hump::index::vocabulary::{ScanOptions, Symbol, load_word_list, scan_codebase};
use hump::index::SuffixTree;
use hump::output::{print_json, print_matches};
use hump::query::{PatternMatcher, compile, lexer};
use hump::utils::{AppConfig, get_config_path};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Instant;
use termcolor::{ColorChoice, StandardStream};

#[derive(Parser)]
#[command(name = "hump", version)]
#[command(about = "CamelCase and wildcard pattern matching over identifier vocabularies")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Pattern to match (when no subcommand is given)
    pattern: Option<String>,

    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    display: DisplayArgs,
}

#[derive(Args, Clone)]
struct SourceArgs {
    /// Word list file, one entry per line (`-` reads stdin)
    #[arg(short, long, conflicts_with_all = ["path", "glob"])]
    words: Option<PathBuf>,

    /// Directory to scan for identifiers
    #[arg(short, long, default_value = ".")]
    path: PathBuf,

    /// Only scan files matching this glob (repeatable)
    #[arg(short, long)]
    glob: Vec<String>,
}

#[derive(Args, Clone)]
struct DisplayArgs {
    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Maximum number of results to show (0 = unlimited)
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// When to highlight matches
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    color: ColorMode,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand)]
enum Commands {
    /// Match a pattern once and print the results
    Find {
        pattern: String,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Read patterns interactively, one per line (`:q` to quit)
    Repl {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Show suffix tree statistics for a vocabulary
    Stats {
        #[command(flatten)]
        source: SourceArgs,

        /// Also print the whole tree
        #[arg(long)]
        dump: bool,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how a pattern is split into lexemes and directives
    Explain { pattern: String },
    /// Show the configuration
    Config {
        /// Write the default configuration if none exists
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("HUMP_LOG", "warn")).init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command {
        Some(Commands::Find {
            pattern,
            source,
            display,
        }) => find(&pattern, &source, &display, &config)?,
        Some(Commands::Repl { source, display }) => repl(&source, &display, &config)?,
        Some(Commands::Stats { source, dump, json }) => stats(&source, dump, json, &config)?,
        Some(Commands::Explain { pattern }) => explain(&pattern)?,
        Some(Commands::Config { init }) => show_config(init, &config)?,
        None => match cli.pattern {
            Some(pattern) => find(&pattern, &cli.source, &cli.display, &config)?,
            None => repl(&cli.source, &cli.display, &config)?,
        },
    }

    Ok(())
}

fn load_vocabulary(source: &SourceArgs, config: &AppConfig) -> Result<Vec<Symbol>> {
    match &source.words {
        Some(path) => load_word_list(path),
        None => {
            let options = ScanOptions {
                globs: source.glob.clone(),
                show_progress: io::stderr().is_terminal(),
                ..ScanOptions::from_config(config)
            };
            scan_codebase(&source.path, &options)
        }
    }
}

fn color_choice(mode: ColorMode, config: &AppConfig) -> ColorChoice {
    match mode {
        ColorMode::Always => ColorChoice::Always,
        ColorMode::Never => ColorChoice::Never,
        ColorMode::Auto if config.color && io::stdout().is_terminal() => ColorChoice::Auto,
        ColorMode::Auto => ColorChoice::Never,
    }
}

fn result_limit(display: &DisplayArgs, config: &AppConfig) -> Option<usize> {
    match display.limit {
        Some(0) => None,
        Some(limit) => Some(limit),
        None => config.result_limit(),
    }
}

fn find(pattern: &str, source: &SourceArgs, display: &DisplayArgs, config: &AppConfig) -> Result<()> {
    let matcher = PatternMatcher::new(load_vocabulary(source, config)?);
    let limit = result_limit(display, config);

    let start = Instant::now();
    let results = matcher.match_pattern(pattern)?;
    let elapsed = start.elapsed();

    if display.json {
        print_json(&mut io::stdout().lock(), &results, limit)?;
    } else {
        let mut stdout = StandardStream::stdout(color_choice(display.color, config));
        print_matches(&mut stdout, &results, limit, elapsed)?;
    }
    Ok(())
}

fn repl(source: &SourceArgs, display: &DisplayArgs, config: &AppConfig) -> Result<()> {
    let matcher = PatternMatcher::new(load_vocabulary(source, config)?);
    let limit = result_limit(display, config);
    let mut stdout = StandardStream::stdout(color_choice(display.color, config));

    eprintln!("{} words indexed", matcher.index().word_count());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read pattern")?;
        let pattern = line.trim();
        if pattern == ":q" {
            break;
        }
        if pattern.is_empty() {
            continue;
        }

        let start = Instant::now();
        match matcher.match_pattern(pattern) {
            Ok(results) if display.json => print_json(&mut stdout, &results, limit)?,
            Ok(results) => print_matches(&mut stdout, &results, limit, start.elapsed())?,
            Err(e) => eprintln!("error: {}", e),
        }
    }

    Ok(())
}

fn stats(source: &SourceArgs, dump: bool, json: bool, config: &AppConfig) -> Result<()> {
    let tree = SuffixTree::new(load_vocabulary(source, config)?);
    let mut stdout = io::stdout().lock();

    write_stats(&mut stdout, &tree.stats(), json)?;
    if dump {
        writeln!(stdout)?;
        tree.dump(&mut stdout)?;
    }
    Ok(())
}

fn explain(pattern: &str) -> Result<()> {
    let lexemes: Vec<String> = lexer::scan(pattern)?
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("Lexemes:    {}", lexemes.join(" "));

    println!("Directives:");
    for command in compile(pattern)? {
        println!("  {}", command);
    }
    Ok(())
}

fn show_config(init: bool, config: &AppConfig) -> Result<()> {
    let path = get_config_path()?;

    if init {
        if path.exists() {
            println!("Config already exists: {}", path.display());
        } else {
            let written = AppConfig::default().save()?;
            println!("Wrote default config: {}", written.display());
        }
        return Ok(());
    }

    println!("Config file: {}", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
