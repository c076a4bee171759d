use super::render::{self, ProgressLine};
use super::setup::{parse_cli, Cli, Commands};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use versoapp::api::VersoApi;
use versoapp::config::{default_config_path, VersoConfig};
use versoapp::search::{ProgressCallback, SearchOutcome, SearchQuery};
use versoapp::store::fs::FileStore;

pub fn run() -> Result<()> {
    let cli = parse_cli();
    init_tracing(cli.verbose);

    let config = VersoConfig::load(None).context("loading configuration")?;
    if let Commands::Config = cli.command {
        print!("{}", render::config(&config, default_config_path().as_deref()));
        return Ok(());
    }

    let api = open_api(&cli, &config)?;
    dispatch(&api, cli.command, &config)
}

/// `RUST_LOG` wins; otherwise warnings only, or debug output with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "versoapp=debug,verso=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn open_api(cli: &Cli, config: &VersoConfig) -> Result<VersoApi<FileStore>> {
    let module_dir: PathBuf = cli
        .module_dir
        .clone()
        .unwrap_or_else(|| config.module_dir());
    tracing::debug!(dir = %module_dir.display(), "opening module store");
    let store = FileStore::open(&module_dir)
        .with_context(|| format!("opening module directory {}", module_dir.display()))?;
    Ok(VersoApi::new(store).with_progress_step(config.progress_step()))
}

fn dispatch(api: &VersoApi<FileStore>, command: Commands, config: &VersoConfig) -> Result<()> {
    match command {
        Commands::Modules { kind } => {
            let listed: Vec<_> = api
                .modules(kind.map(Into::into))?
                .into_iter()
                .map(|m| {
                    let readable = api.is_module_readable(&m.code);
                    (m, readable)
                })
                .collect();
            print!("{}", render::modules(&listed));
        }
        Commands::Books { module } => {
            print!("{}", render::books(&api.all_chapter_verse_counts(&module)?));
        }
        Commands::Text {
            module,
            reference,
            json,
        } => {
            let records = api.verses_from_references(&module, &reference.join(" "))?;
            if json {
                println!("{}", render::json(&records)?);
            } else {
                print!("{}", render::verses(&records));
            }
        }
        Commands::Search {
            module,
            term,
            mode,
            scope,
            case_sensitive,
            extended,
            json,
        } => {
            let query = SearchQuery::new(term.join(" "), mode.into())
                .with_scope(scope.into())
                .case_sensitive(case_sensitive || config.case_sensitive)
                .extended(extended);
            search(api, &module, query, json)?;
        }
        Commands::Strongs { key, json } => {
            let entry = api.strongs_entry(&key)?;
            if json {
                println!("{}", render::json(&entry)?);
            } else {
                print!("{}", render::strongs(&entry));
            }
        }
        Commands::Config => {}
    }
    Ok(())
}

fn search(api: &VersoApi<FileStore>, module: &str, query: SearchQuery, json: bool) -> Result<()> {
    let line = if json {
        None
    } else {
        ProgressLine::new(format!("Searching {}...", module))
    };
    let progress: Option<ProgressCallback> = line.clone().map(|line| {
        let callback: ProgressCallback = Box::new(move |percent| line.draw(percent));
        callback
    });

    let term = query.term.clone();
    let outcome = api.start_search(module, query, progress)?.wait();
    if let Some(line) = &line {
        line.clear();
    }
    match outcome {
        SearchOutcome::Completed(records) => {
            if json {
                println!("{}", render::json(&records)?);
            } else {
                print!("{}", render::verses(&records));
                print!("{}", render::search_summary(&term, records.len()));
            }
        }
        SearchOutcome::Cancelled => {
            eprintln!("Search cancelled.");
        }
        SearchOutcome::Failed(e) => bail!("search of {} failed: {}", module, e),
    }
    Ok(())
}
