use clap::{Parser, Subcommand, ValueEnum};

/// tidypc — a privacy-first disposable-state inventory and cleanup utility
#[derive(Parser, Debug)]
#[command(
    name = "tidypc",
    version,
    about = "Inventory and clean duplicate files, browser data, and temp files",
    long_about = "tidypc finds duplicate files by content, inventories browser\n\
                   caches, cookies and history, and cleans OS temp directories\n\
                   with age and safety filters.",
    after_help = "EXAMPLES:\n  \
        tidypc dup ~/Downloads                 Find duplicates by content\n  \
        tidypc dup ~/Pictures --kind images    Restrict to image files\n  \
        tidypc dup ~/Music --delete --yes      Delete non-keeper duplicates\n  \
        tidypc browsers list                   Show detected browsers\n  \
        tidypc browsers sizes                  Per-category data sizes\n  \
        tidypc browsers clean chrome --categories cache,cookies\n  \
        tidypc temp scan                       Inventory temp files\n  \
        tidypc temp clean --yes                Clean temp files older than 1h"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode — minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find duplicate files by content
    Dup {
        /// Directory to scan for duplicates
        #[arg(default_value = "~")]
        path: String,

        /// Minimum file size in bytes (default from config, 1024)
        #[arg(long)]
        min_size: Option<u64>,

        /// Restrict to specific extensions (comma separated, e.g. jpg,png)
        #[arg(long, value_delimiter = ',')]
        ext: Option<Vec<String>>,

        /// Restrict to a named extension preset
        #[arg(long, conflicts_with = "ext")]
        kind: Option<FileKind>,

        /// Which file in each group to suggest keeping (default from config)
        #[arg(long)]
        keep: Option<KeepChoice>,

        /// Show individual files in each group
        #[arg(long)]
        detailed: bool,

        /// Delete all non-keeper members after the scan
        #[arg(long)]
        delete: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Inspect and clean browser data
    Browsers {
        #[command(subcommand)]
        action: BrowsersAction,
    },

    /// Inventory and clean OS temp directories
    Temp {
        #[command(subcommand)]
        action: TempAction,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum BrowsersAction {
    /// List detected browsers
    List,

    /// Show per-category data sizes
    Sizes {
        /// Limit to one browser (chrome, edge, firefox)
        browser: Option<String>,
    },

    /// Clean selected data categories
    Clean {
        /// Browser to clean, or "all"
        browser: String,

        /// Categories to clean (cache, cookies, history, downloads, local_storage)
        #[arg(long, value_delimiter = ',', required = true)]
        categories: Vec<String>,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TempAction {
    /// Tally temp files without deleting
    Scan,

    /// Delete old temp files
    Clean {
        /// Minimum file age in hours (default from config, 1.0)
        #[arg(long)]
        min_age_hours: Option<f64>,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,
    /// Write the default configuration
    Reset,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum FileKind {
    Images,
    Videos,
    Audio,
    Documents,
    Archives,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Images => "images",
            FileKind::Videos => "videos",
            FileKind::Audio => "audio",
            FileKind::Documents => "documents",
            FileKind::Archives => "archives",
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum KeepChoice {
    Newest,
    Oldest,
    ShortestPath,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
