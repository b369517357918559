// colprefs CLI - inspect and edit per-user grid column preferences

mod exit_codes;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colprefs_config::{FileStorage, SchemaFile, Settings};
use colprefs_core::{ColumnPreferenceStore, Update};

use exit_codes::{EXIT_ERROR, EXIT_IGNORED, EXIT_NOT_SAVED, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "colprefs")]
#[command(about = "Inspect and edit per-user grid column preferences")]
#[command(version)]
struct Cli {
    /// Column schema file (TOML)
    #[arg(long, short = 's', global = true, env = "COLPREFS_SCHEMA")]
    schema: Option<PathBuf>,

    /// User whose preferences to read or change
    #[arg(long, short = 'u', global = true, env = "COLPREFS_USER")]
    user: Option<String>,

    /// Directory holding stored preferences (overrides settings)
    #[arg(long, global = true, env = "COLPREFS_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// Settings file (default: ~/.config/colprefs/settings.toml)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Debug logging to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List columns in display order
    #[command(after_help = "\
Examples:
  colprefs -s sales.toml -u alice list
  colprefs -s sales.toml -u alice list --all --json")]
    List {
        /// Include hidden columns
        #[arg(long)]
        all: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Flip a column between visible and hidden
    Toggle {
        /// Column id
        id: String,
    },

    /// Hide a column
    Hide {
        /// Column id
        id: String,
    },

    /// Show a hidden column
    Show {
        /// Column id
        id: String,
    },

    /// Move the column at position FROM to position TO (0-based, locked columns count)
    #[command(after_help = "\
Examples:
  colprefs -s sales.toml -u alice move 3 1")]
    Move { from: usize, to: usize },

    /// Forget this user's customizations
    Reset,

    /// Print where this user's preferences are stored
    Path,
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

/// Everything a command needs: schema, user, and a storage-backed store.
struct Context {
    schema: SchemaFile,
    user: String,
    store: ColumnPreferenceStore<FileStorage>,
}

fn open_context(cli: &Cli) -> Result<Context, CliError> {
    let schema_path = cli.schema.as_ref().ok_or_else(|| {
        CliError::usage("no schema file given")
            .with_hint("pass --schema <file> or set COLPREFS_SCHEMA")
    })?;
    let user = cli.user.clone().ok_or_else(|| {
        CliError::usage("no user given").with_hint("pass --user <key> or set COLPREFS_USER")
    })?;
    let schema = SchemaFile::load(schema_path).map_err(|e| CliError::usage(e.to_string()))?;

    let settings = match &cli.settings {
        Some(path) => Settings::read(path)
            .map_err(|e| CliError::usage(e.to_string()))?
            .ok_or_else(|| {
                CliError::usage(format!("settings file not found: {}", path.display()))
            })?,
        None => Settings::load(),
    };

    let mut storage = settings.file_storage();
    if let Some(dir) = &cli.storage_dir {
        storage = FileStorage::new(dir).with_quota(settings.max_value_bytes);
    }
    log::debug!("Preference storage: {}", storage.root().display());

    let store = ColumnPreferenceStore::with_options(
        storage,
        schema.resource.clone(),
        settings.store_options(),
    );
    Ok(Context { schema, user, store })
}

fn cmd_list(ctx: &mut Context, all: bool, json: bool) -> Result<(), CliError> {
    let resolved = ctx.store.load(&ctx.schema.columns, &ctx.user);
    if json {
        let text = render::json_report(&ctx.schema.resource, &ctx.user, resolved, all)
            .map_err(|e| CliError::general(e.to_string()))?;
        println!("{}", text);
    } else {
        print!("{}", render::table(&render::select(resolved, all)));
    }
    Ok(())
}

fn cmd_path(ctx: &Context) -> Result<(), CliError> {
    let key = colprefs_core::storage_key(&ctx.schema.resource, &ctx.user);
    println!("{}", ctx.store.storage().path_for(&key).display());
    Ok(())
}

/// Load, apply one mutation, print the resulting grid, map the outcome.
fn cmd_update<F>(ctx: &mut Context, op: F) -> Result<(), CliError>
where
    F: FnOnce(&mut ColumnPreferenceStore<FileStorage>) -> Update,
{
    ctx.store.load(&ctx.schema.columns, &ctx.user);
    let update = op(&mut ctx.store);

    print!("{}", render::table(&update.resolved.visible_columns()));

    if let Some(reason) = update.rejected {
        return Err(CliError {
            code: EXIT_IGNORED,
            message: format!("ignored: {reason}"),
            hint: Some("run `colprefs list --all` to see column ids and positions".to_string()),
        });
    }
    if let Some(err) = update.storage_error {
        return Err(CliError {
            code: EXIT_NOT_SAVED,
            message: format!("preferences not saved: {err}"),
            hint: None,
        });
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = open_context(&cli).and_then(|mut ctx| match &cli.command {
        Commands::List { all, json } => cmd_list(&mut ctx, *all, *json),
        Commands::Toggle { id } => cmd_update(&mut ctx, |store| store.toggle(id)),
        Commands::Hide { id } => cmd_update(&mut ctx, |store| store.set_visible(id, false)),
        Commands::Show { id } => cmd_update(&mut ctx, |store| store.set_visible(id, true)),
        Commands::Move { from, to } => cmd_update(&mut ctx, |store| store.reorder(*from, *to)),
        Commands::Reset => cmd_update(&mut ctx, |store| store.reset()),
        Commands::Path => cmd_path(&ctx),
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
