//! trophy-atlas CLI
//!
//! Command-line interface for reconciling a PSN account's playtime and
//! trophy feeds into a single library snapshot.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use trophy_atlas_core::{
    LogEntry, PipelineOptions, PlaytimeRegistry, ReconciliationEngine, RunLog, assemble_snapshot,
};
use trophy_atlas_psn::{Credentials, PsnClient};

#[derive(Parser)]
#[command(name = "trophy-atlas")]
#[command(about = "Reconcile PSN playtime and trophy feeds into a library snapshot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch both feeds and write the reconciled snapshot
    Extract {
        /// Output file (default: psn_library_<user>.json)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Skip the playtime stage and produce a trophies-only snapshot
        #[arg(long)]
        skip_playtime: bool,

        /// Ghost playtime threshold in hours
        #[arg(long, default_value_t = 15.0)]
        ghost_threshold_hours: f64,

        /// Disable the run log file
        #[arg(long)]
        no_log: bool,

        /// NPSSO token (overrides PSN_NPSSO and the config file)
        #[arg(long)]
        npsso: Option<String>,
    },

    /// Manage the NPSSO credential configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the current credential and its source
    Show,

    /// Interactively set the NPSSO token
    Setup,

    /// Print the config file path
    Path,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            out,
            skip_playtime,
            ghost_threshold_hours,
            no_log,
            npsso,
        } => {
            run_extract(out, skip_playtime, ghost_threshold_hours, no_log, npsso);
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => run_config_show(),
            ConfigAction::Setup => run_config_setup(),
            ConfigAction::Path => run_config_path(),
        },
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("/-\\|"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Run the extract command.
fn run_extract(
    out: Option<PathBuf>,
    skip_playtime: bool,
    ghost_threshold_hours: f64,
    no_log: bool,
    npsso: Option<String>,
) {
    // Resolve credentials before touching the network or the filesystem.
    let creds = match npsso {
        Some(token) => Credentials { npsso: token },
        None => match Credentials::load() {
            Ok(c) => c,
            Err(e) => {
                eprintln!(
                    "{} {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    e,
                );
                eprintln!();
                eprintln!("Set the PSN_NPSSO environment variable, or run:");
                eprintln!("  trophy-atlas config setup");
                std::process::exit(1);
            }
        },
    };

    let options = PipelineOptions {
        ghost_threshold_seconds: ghost_threshold_hours * 3600.0,
    };

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

    rt.block_on(async {
        // Authentication failure is fatal: abort before any file I/O.
        let pb = spinner("Authenticating with PSN...");
        let (client, online_id) = match PsnClient::connect(creds).await {
            Ok(result) => result,
            Err(e) => {
                pb.finish_and_clear();
                eprintln!(
                    "{} Authentication failed: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    e,
                );
                std::process::exit(1);
            }
        };
        pb.finish_and_clear();

        println!(
            "{} Authenticated as {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            online_id.if_supports_color(Stdout, |t| t.cyan()),
        );

        let mut run_log = RunLog::new();

        // Playtime stage. A fetch failure here is recoverable: the run
        // continues trophies-only with an empty registry.
        let registry = if skip_playtime {
            println!(
                "{}",
                "Playtime stage skipped".if_supports_color(Stdout, |t| t.dimmed()),
            );
            PlaytimeRegistry::default()
        } else {
            let pb = spinner("Fetching playtime statistics...");
            match client.title_stats().await {
                Ok(stats) => {
                    pb.finish_and_clear();
                    let registry = PlaytimeRegistry::build(
                        stats.into_iter().map(|s| s.into_playtime_record()),
                    );
                    println!(
                        "{} {} titles with playtime ({})",
                        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                        registry.len(),
                        trophy_atlas_core::format_duration(registry.lifetime_seconds()),
                    );
                    registry
                }
                Err(e) if e.is_fatal() => {
                    pb.finish_and_clear();
                    eprintln!(
                        "{} {}",
                        "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                        e,
                    );
                    std::process::exit(1);
                }
                Err(e) => {
                    pb.finish_and_clear();
                    log::warn!("playtime stage failed: {e}");
                    eprintln!(
                        "{} Playtime stage failed, continuing with trophies only: {}",
                        "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                        e,
                    );
                    run_log.add(LogEntry::PlaytimeStageFailed {
                        message: e.to_string(),
                    });
                    PlaytimeRegistry::default()
                }
            }
        };

        // Trophy stage. This feed is the backbone of the snapshot; failure
        // here aborts the run.
        let pb = spinner("Fetching trophy titles...");
        let trophy_titles = match client.trophy_titles().await {
            Ok(titles) => {
                pb.finish_and_clear();
                titles
            }
            Err(e) => {
                pb.finish_and_clear();
                eprintln!(
                    "{} Failed to fetch trophy titles: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    e,
                );
                std::process::exit(1);
            }
        };
        println!(
            "{} {} trophy titles fetched",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            trophy_titles.len(),
        );

        // Reconcile and assemble.
        let mut engine = ReconciliationEngine::new(&registry, options);
        for title in trophy_titles {
            match title.into_trophy_record() {
                Ok(record) => engine.ingest(record, &mut run_log),
                Err(reason) => {
                    log::warn!("skipping malformed trophy record: {reason}");
                    run_log.add(LogEntry::MalformedRecord { message: reason });
                }
            }
        }

        let snapshot = assemble_snapshot(&online_id, registry.lifetime_seconds(), engine.finish());

        let out_path = out.unwrap_or_else(|| PathBuf::from(format!("psn_library_{online_id}.json")));
        let json = match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                eprintln!(
                    "{} Failed to serialize snapshot: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    e,
                );
                std::process::exit(1);
            }
        };
        if let Err(e) = fs::write(&out_path, json) {
            eprintln!(
                "{} Failed to write {}: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                out_path.display(),
                e,
            );
            std::process::exit(1);
        }

        if !no_log {
            let log_path = out_path.with_file_name(format!(
                "extract-log-{}.txt",
                chrono::Local::now().format("%Y%m%d-%H%M%S"),
            ));
            if let Err(e) = run_log.write_to_file(&log_path) {
                eprintln!("Warning: could not write run log: {}", e);
            }
        }

        // Print overall summary.
        let summary = run_log.summary();
        println!();
        println!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
        println!(
            "  {} {} unique games, {} platinums",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            snapshot.metadata.total_games_unique,
            snapshot.metadata.total_platinums,
        );
        println!(
            "  Lifetime playtime: {}",
            snapshot.metadata.total_playtime_formatted,
        );
        if summary.ghosts_zeroed > 0 {
            println!(
                "  {} {} ghost playtime entries zeroed",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                summary.ghosts_zeroed,
            );
        }
        if summary.duplicates_replaced + summary.duplicates_dropped > 0 {
            println!(
                "  {} duplicates resolved",
                summary.duplicates_replaced + summary.duplicates_dropped,
            );
        }
        if summary.malformed_records > 0 {
            println!(
                "  {} {} malformed records skipped",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                summary.malformed_records,
            );
        }
        println!(
            "  Snapshot: {}",
            out_path.display().if_supports_color(Stdout, |t| t.cyan()),
        );
    });
}

// -- Config subcommands --

/// Mask a token, showing only the first 4 characters.
fn mask_value(s: &str) -> String {
    if s.len() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", &s[..4])
    }
}

/// Show the current credential and where it comes from.
fn run_config_show() {
    let path = trophy_atlas_psn::config_path();
    let source = trophy_atlas_psn::credential_source();

    println!(
        "{}",
        "PSN Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    println!();

    match &path {
        Some(p) if p.exists() => {
            println!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            println!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            println!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }

    let source_str = format!("({})", source);
    match Credentials::load() {
        Ok(creds) => {
            println!(
                "  {} {} {}",
                "npsso:".if_supports_color(Stdout, |t| t.cyan()),
                mask_value(&creds.npsso),
                source_str.if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        Err(_) => {
            println!(
                "  {} {} {}",
                "npsso:".if_supports_color(Stdout, |t| t.cyan()),
                "not set".if_supports_color(Stdout, |t| t.yellow()),
                source_str.if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
    }
}

/// Interactively set the NPSSO token.
fn run_config_setup() {
    println!(
        "{}",
        "PSN Credential Setup".if_supports_color(Stdout, |t| t.bold()),
    );
    println!();
    println!("  Log in to playstation.com in a browser, then visit");
    println!("  https://ca.account.sony.com/api/v1/ssocookie to read the npsso value.");
    println!();

    print!("  npsso: ");
    std::io::stdout().flush().unwrap();

    let mut input = String::new();
    std::io::stdin().read_line(&mut input).unwrap();
    let npsso = input.trim().to_string();

    if npsso.is_empty() {
        eprintln!(
            "{}",
            "No token entered; nothing saved.".if_supports_color(Stdout, |t| t.yellow()),
        );
        return;
    }

    match trophy_atlas_psn::save_to_file(&Credentials { npsso }) {
        Ok(path) => {
            println!();
            println!(
                "{} Credentials saved to {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                path.display().if_supports_color(Stdout, |t| t.cyan()),
            );
        }
        Err(e) => {
            eprintln!();
            eprintln!(
                "{} Failed to save credentials: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
        }
    }
}

/// Print the config file path.
fn run_config_path() {
    match trophy_atlas_psn::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Could not determine config directory");
            std::process::exit(1);
        }
    }
}
