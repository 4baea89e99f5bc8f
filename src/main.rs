use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use tidypc::browsers::{self, DataCategory};
use tidypc::cleaner::TempCleaner;
use tidypc::cli::args::{
    BrowsersAction, Cli, Commands, ConfigAction, FileKind, KeepChoice, OutputFormat, TempAction,
};
use tidypc::cli::output;
use tidypc::common::config::Config;
use tidypc::common::errors::CleanupError;
use tidypc::common::format;
use tidypc::duplicates::{self, KeepPolicy, ScanEvent, ScanOptions};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("tidypc=debug")
            .init();
    }

    match cli.command {
        Commands::Dup {
            ref path,
            min_size,
            ref ext,
            kind,
            keep,
            detailed,
            delete,
            yes,
        } => cmd_dup(&cli, path, min_size, ext.clone(), kind, keep, detailed, delete, yes),

        Commands::Browsers { ref action } => cmd_browsers(&cli, action),

        Commands::Temp { ref action } => cmd_temp(&cli, action),

        Commands::Config { ref action } => cmd_config(action),

        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                tidypc::cli::args::CompletionShell::Bash => clap_complete::Shell::Bash,
                tidypc::cli::args::CompletionShell::Zsh => clap_complete::Shell::Zsh,
                tidypc::cli::args::CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "tidypc", &mut std::io::stdout());
            Ok(())
        }
    }
}

// ─── Duplicates ───────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn cmd_dup(
    cli: &Cli,
    path: &str,
    min_size: Option<u64>,
    ext: Option<Vec<String>>,
    kind: Option<FileKind>,
    keep: Option<KeepChoice>,
    detailed: bool,
    delete: bool,
    yes: bool,
) -> Result<()> {
    let config = Config::load()?;
    let root = expand_home(path);
    if !root.exists() {
        anyhow::bail!("path does not exist: {}", root.display());
    }

    let keep_policy = match keep {
        Some(KeepChoice::Newest) => KeepPolicy::NewestFirst,
        Some(KeepChoice::Oldest) => KeepPolicy::OldestFirst,
        Some(KeepChoice::ShortestPath) => KeepPolicy::ShortestPath,
        None => config.keep_policy,
    };

    let mut options = ScanOptions {
        min_size: min_size.unwrap_or(config.duplicate_min_size),
        keep_policy,
        exclude_paths: config.exclude_paths.clone(),
        ..Default::default()
    };
    if let Some(ext) = ext {
        options = options.with_extensions(ext);
    } else if let Some(kind) = kind {
        options.extensions = duplicates::walker::preset_extensions(kind.as_str());
    }

    let show_progress = !cli.quiet && matches!(cli.format, OutputFormat::Human);
    let pb = if show_progress {
        let pb = ProgressBar::new(100);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}% {msg}")
                .unwrap()
                .progress_chars("━━░"),
        );
        Some(pb)
    } else {
        None
    };

    // The walk and hashing run on a worker thread; this thread only
    // renders progress events from the channel.
    let handle = duplicates::spawn_scan(root, options);
    let mut report = None;
    for event in handle.events() {
        match event {
            ScanEvent::Progress { percent, path } => {
                if let Some(ref pb) = pb {
                    pb.set_position(percent as u64);
                    pb.set_message(format::truncate(&format::format_path(&path), 40));
                }
            }
            ScanEvent::Done(r) => report = Some(r),
        }
    }
    if let Some(ref pb) = pb {
        pb.finish_and_clear();
    }
    let report = report.ok_or_else(|| anyhow::anyhow!("scan worker terminated unexpectedly"))?;

    match cli.format {
        OutputFormat::Human => output::print_dup_results(&report, detailed),
        OutputFormat::Json => output::print_dup_json(&report),
        OutputFormat::Quiet => {
            let summary = report.summary();
            println!(
                "{} groups, {} duplicates, {:.1} MB reclaimable",
                summary.duplicate_groups, summary.total_duplicates, summary.potential_savings_mb
            );
        }
    }

    if !delete {
        return Ok(());
    }

    // Only the non-keeper members are ever offered for deletion
    let doomed: Vec<PathBuf> = report
        .groups
        .iter()
        .flat_map(|g| g.duplicates().iter().map(|m| m.path.clone()))
        .collect();

    if doomed.is_empty() {
        println!("{}", "Nothing to delete.".green());
        return Ok(());
    }

    if !yes {
        let prompt = format!(
            "Delete {} ({})?",
            format::format_count(doomed.len()),
            format::format_size(report.duplicate_bytes)
        );
        if !output::confirm(&prompt) {
            println!("Aborted.");
            return Ok(());
        }
    }

    let delete_report = duplicates::delete_files(&doomed);
    match cli.format {
        OutputFormat::Json => output::print_json(&delete_report),
        _ => output::print_delete_report(&delete_report),
    }

    Ok(())
}

// ─── Browsers ─────────────────────────────────────────────────────────────────

fn cmd_browsers(cli: &Cli, action: &BrowsersAction) -> Result<()> {
    match action {
        BrowsersAction::List => {
            let profiles = browsers::discover_browsers();
            match cli.format {
                OutputFormat::Json => {
                    let names: Vec<String> =
                        profiles.iter().map(|p| p.browser.to_string()).collect();
                    output::print_json(&names);
                }
                _ => output::print_browser_list(&profiles),
            }
            Ok(())
        }

        BrowsersAction::Sizes { browser } => {
            let mut profiles = browsers::discover_browsers();
            if let Some(name) = browser {
                let kind = name.parse::<browsers::BrowserKind>().map_err(anyhow::Error::msg)?;
                profiles.retain(|p| p.browser == kind);
                if profiles.is_empty() {
                    return Err(CleanupError::BrowserNotFound(name.clone()).into());
                }
            }
            let sizes = browsers::locator::all_sizes(&profiles);
            match cli.format {
                OutputFormat::Json => {
                    let rows: Vec<serde_json::Value> = sizes
                        .iter()
                        .map(|(browser, by_category, total)| {
                            serde_json::json!({
                                "browser": browser.to_string(),
                                "categories": by_category
                                    .iter()
                                    .map(|(c, s)| (c.to_string(), *s))
                                    .collect::<std::collections::HashMap<_, _>>(),
                                "total_bytes": total,
                            })
                        })
                        .collect();
                    output::print_json(&rows);
                }
                _ => output::print_browser_sizes(&sizes),
            }
            Ok(())
        }

        BrowsersAction::Clean {
            browser,
            categories,
            yes,
        } => {
            let categories: Vec<DataCategory> = categories
                .iter()
                .map(|c| c.parse::<DataCategory>().map_err(anyhow::Error::msg))
                .collect::<Result<_>>()?;

            let profiles = browsers::discover_browsers();

            if browser.eq_ignore_ascii_case("all") {
                if profiles.is_empty() {
                    anyhow::bail!("no browsers detected");
                }
                if !confirm_browser_clean(*yes, "all detected browsers", &categories) {
                    return Ok(());
                }
                let report = browsers::clean_all_browsers(&profiles, &categories);
                match cli.format {
                    OutputFormat::Json => output::print_json(&report),
                    _ => output::print_all_browsers_clean(&report),
                }
            } else {
                let kind = browser.parse::<browsers::BrowserKind>().map_err(anyhow::Error::msg)?;
                let profile = profiles
                    .iter()
                    .find(|p| p.browser == kind)
                    .ok_or_else(|| CleanupError::BrowserNotFound(browser.clone()))?;
                if !confirm_browser_clean(*yes, &kind.to_string(), &categories) {
                    return Ok(());
                }
                let report = browsers::clean_browser(profile, &categories);
                match cli.format {
                    OutputFormat::Json => output::print_json(&report),
                    _ => output::print_browser_clean(&report),
                }
            }
            Ok(())
        }
    }
}

fn confirm_browser_clean(yes: bool, target: &str, categories: &[DataCategory]) -> bool {
    if yes {
        return true;
    }
    let names: Vec<String> = categories.iter().map(|c| c.to_string()).collect();
    let confirmed = output::confirm(&format!(
        "Clean {} from {}? Close the browser first.",
        names.join(", "),
        target
    ));
    if !confirmed {
        println!("Aborted.");
    }
    confirmed
}

// ─── Temp ─────────────────────────────────────────────────────────────────────

fn cmd_temp(cli: &Cli, action: &TempAction) -> Result<()> {
    let config = Config::load()?;

    match action {
        TempAction::Scan => {
            let cleaner = TempCleaner::new(config.temp_min_age());
            let report = cleaner.scan();
            match cli.format {
                OutputFormat::Json => output::print_json(&report),
                _ => output::print_temp_scan(&report),
            }
            Ok(())
        }

        TempAction::Clean { min_age_hours, yes } => {
            let min_age = match min_age_hours {
                Some(hours) => std::time::Duration::from_secs_f64(hours * 3600.0),
                None => config.temp_min_age(),
            };
            let cleaner = TempCleaner::new(min_age);

            if !yes {
                let roots: Vec<String> = cleaner
                    .roots()
                    .iter()
                    .map(|r| format::format_path(r))
                    .collect();
                let confirmed = output::confirm(&format!(
                    "Clean temp files older than {:.1}h under: {}?",
                    min_age.as_secs_f64() / 3600.0,
                    roots.join(", ")
                ));
                if !confirmed {
                    println!("Aborted.");
                    return Ok(());
                }
            }

            let report = cleaner.clean();
            match cli.format {
                OutputFormat::Json => output::print_json(&report),
                OutputFormat::Quiet => println!("{}", report.summary()),
                OutputFormat::Human => output::print_temp_clean(&report),
            }
            Ok(())
        }
    }
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("Wrote defaults to {}", Config::config_path().display());
            Ok(())
        }
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            let rest = rest.trim_start_matches(['/', '\\']);
            return if rest.is_empty() { home } else { home.join(rest) };
        }
    }
    PathBuf::from(path)
}
