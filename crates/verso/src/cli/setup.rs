use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use versoapp::model::ModuleType;
use versoapp::search::{SearchMode, SearchScope};

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.0"
/// Format for dev builds: "v0.3.0\ndev: abc1234 2024-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "verso",
    bin_name = "verso",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Look up, browse and search scripture modules", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory of module files (overrides config and VERSO_MODULE_DIR)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub module_dir: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModuleKind {
    Bible,
    #[value(alias = "dictionary")]
    Dict,
    Commentary,
}

impl From<ModuleKind> for ModuleType {
    fn from(kind: ModuleKind) -> Self {
        match kind {
            ModuleKind::Bible => ModuleType::Bible,
            ModuleKind::Dict => ModuleType::Dictionary,
            ModuleKind::Commentary => ModuleType::Commentary,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Phrase,
    MultiWord,
    Strongs,
}

impl From<ModeArg> for SearchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Phrase => SearchMode::Phrase,
            ModeArg::MultiWord => SearchMode::MultiWord,
            ModeArg::Strongs => SearchMode::StrongsNumber,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    Module,
    Ot,
    Nt,
}

impl From<ScopeArg> for SearchScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Module => SearchScope::Module,
            ScopeArg::Ot => SearchScope::OldTestament,
            ScopeArg::Nt => SearchScope::NewTestament,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List installed modules
    #[command(alias = "ls", display_order = 1)]
    Modules {
        /// Only modules of this type
        #[arg(long = "type", short = 't', value_enum)]
        kind: Option<ModuleKind>,
    },

    /// List the books of a module with chapter and verse counts
    #[command(display_order = 2)]
    Books { module: String },

    /// Print the verses of a reference expression (e.g. "John 3:16-18; Rom 8")
    #[command(alias = "t", display_order = 3)]
    Text {
        module: String,

        /// Reference words (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        reference: Vec<String>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search a module
    #[command(alias = "s", display_order = 4)]
    Search {
        module: String,

        /// Search term words (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,

        #[arg(long, short, value_enum, default_value = "phrase")]
        mode: ModeArg,

        #[arg(long, value_enum, default_value = "module")]
        scope: ScopeArg,

        /// Match case exactly (default comes from config)
        #[arg(long)]
        case_sensitive: bool,

        /// Include the verses around each match, within its chapter
        #[arg(long, short = 'x')]
        extended: bool,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a Strong's lexicon entry (e.g. G26, H430)
    #[command(display_order = 5)]
    Strongs {
        key: String,

        /// Print the entry as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    #[command(display_order = 10)]
    Config,
}
