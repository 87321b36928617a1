// curio - command-line client for the items API.
// View composition layer: chooses pages, drives the store, renders
// through the grid.

mod render;
mod session;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use curio_api_client::{delete_credentials, save_credentials, ApiClient, ApiError, Credentials};
use curio_model::{ItemDraft, ItemId, ItemPatch, RegisterRequest, UserId};
use curio_grid::DataGrid;
use curio_store::StoreError;

use render::{item_columns, print_item, print_table, ItemRow};
use session::{make_client, make_store, resolve_api_base};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE: u8 = 2;
pub const EXIT_AUTH: u8 = 3;

#[derive(Parser)]
#[command(name = "curio")]
#[command(about = "Browse and manage items from the command line")]
#[command(version)]
struct Cli {
    /// API base URL (falls back to the saved login)
    #[arg(long, global = true, env = "CURIO_API_BASE")]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and save the token locally
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },

    /// Remove the saved token
    Logout,

    /// Register a new account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        full_name: Option<String>,
    },

    /// Show the authenticated user
    Whoami,

    /// List one page of items as a table
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Items per page
        #[arg(long, default_value_t = 10)]
        limit: u32,
        /// Only items owned by this user
        #[arg(long, conflicts_with = "mine")]
        owner: Option<UserId>,
        /// Only your own items
        #[arg(long)]
        mine: bool,
        /// Sort the page by this column (id, title, owner_id, created_at)
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending instead of ascending
        #[arg(long, requires = "sort")]
        desc: bool,
        /// Emit the raw page as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show a single item
    Get {
        id: ItemId,
        #[arg(long)]
        json: bool,
    },

    /// Create an item
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// Update an item's fields
    Update {
        id: ItemId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete one or more items (several ids use one bulk request)
    Delete {
        #[arg(required = true)]
        ids: Vec<ItemId>,
    },
}

/// CLI failure with its exit code.
enum CliError {
    Usage(String),
    Auth(String),
    Other(String),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage(_) => EXIT_USAGE,
            CliError::Auth(_) => EXIT_AUTH,
            CliError::Other(_) => EXIT_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            CliError::Usage(msg) | CliError::Auth(msg) | CliError::Other(msg) => msg,
        }
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AuthorizationRequired => CliError::Auth(err.to_string()),
            StoreError::InvalidPage => CliError::Usage(err.to_string()),
            other => CliError::Other(other.to_string()),
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotAuthenticated => CliError::Auth(err.to_string()),
            other => CliError::Other(other.to_string()),
        }
    }
}

impl From<String> for CliError {
    fn from(msg: String) -> Self {
        CliError::Other(msg)
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("error: {}", err.message());
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Login { username, password } => login(cli.api_base, &username, &password).await,
        Commands::Logout => {
            delete_credentials().map_err(CliError::Other)?;
            println!("Logged out.");
            Ok(())
        }
        Commands::Register { email, username, password, full_name } => {
            let api_base = cli
                .api_base
                .ok_or_else(|| CliError::Usage("--api-base is required for register".into()))?;
            let client = ApiClient::new(api_base);
            let req = RegisterRequest { email, username, password, full_name };
            let user = client.register(&req).await?;
            println!("Registered {} ({}).", user.username, user.email);
            Ok(())
        }
        Commands::Whoami => {
            let client = make_client(cli.api_base)?;
            let user = client.me().await?;
            println!("{} ({}) — user id {}", user.username, user.email, user.id);
            Ok(())
        }
        Commands::List { page, limit, owner, mine, sort, desc, json } => {
            list(cli.api_base, page, limit, owner, mine, sort, desc, json).await
        }
        Commands::Get { id, json } => {
            let store = make_store(cli.api_base)?;
            let item = store.get_one(id).await?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&item)
                        .map_err(|e| CliError::Other(e.to_string()))?
                );
            } else {
                print_item(&item);
            }
            Ok(())
        }
        Commands::Create { title, description } => {
            let store = make_store(cli.api_base)?;
            let mut draft = ItemDraft::new(title);
            if let Some(description) = description {
                draft = draft.with_description(description);
            }
            let item = store.create(&draft).await?;
            println!("Created item {}.", item.id);
            Ok(())
        }
        Commands::Update { id, title, description } => {
            if title.is_none() && description.is_none() {
                return Err(CliError::Usage("nothing to update — pass --title or --description".into()));
            }
            let store = make_store(cli.api_base)?;
            let patch = ItemPatch { title, description };
            let item = store.update(id, &patch).await?;
            println!("Updated item {}.", item.id);
            Ok(())
        }
        Commands::Delete { ids } => delete(cli.api_base, &ids).await,
    }
}

async fn login(api_base: Option<String>, username: &str, password: &str) -> Result<(), CliError> {
    // For a first login the base must come from the flag/env; later
    // logins can reuse the saved one.
    let api_base = resolve_api_base(api_base).map_err(CliError::Usage)?;

    let client = ApiClient::new(api_base.clone());
    let token = client.login(username, password).await?;

    // Fetch the profile with the fresh token so the session knows who
    // owns "mine".
    let authed = ApiClient::with_token(api_base.clone(), token.access_token.clone());
    let user = authed.me().await?;

    let creds = Credentials {
        token: token.access_token,
        api_base,
        user_id: Some(user.id),
        email: Some(user.email.clone()),
    };
    save_credentials(&creds).map_err(CliError::Other)?;

    info!(user_id = user.id, "login succeeded");
    println!("Logged in as {} ({}).", user.username, user.email);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn list(
    api_base: Option<String>,
    page: u32,
    limit: u32,
    owner: Option<UserId>,
    mine: bool,
    sort: Option<String>,
    desc: bool,
    json: bool,
) -> Result<(), CliError> {
    let store = make_store(api_base)?;

    let owner = if mine {
        use curio_store::SessionProvider;
        match session::FileSession.current_user_id() {
            Some(me) => Some(me),
            None => {
                return Err(CliError::Auth("Not logged in — cannot filter by your items".into()))
            }
        }
    } else {
        owner
    };

    let fetched = store.fetch_page(page, limit, owner).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&fetched).map_err(|e| CliError::Other(e.to_string()))?
        );
        return Ok(());
    }

    // The grid re-sorts the fetched page client-side; its page size
    // matches the fetch limit so the whole page is one grid view.
    let mut grid = DataGrid::new(item_columns(), limit as usize);
    grid.set_rows(store.items().into_iter().map(ItemRow).collect());
    if let Some(key) = sort {
        grid.sort_on(&key);
        if desc {
            grid.sort_on(&key);
        }
    }

    print_table(&grid);

    let meta = store.meta();
    if meta.pages > 1 {
        println!("Server page {} of {} ({} items total)", meta.page, meta.pages, meta.total);
    }
    Ok(())
}

async fn delete(api_base: Option<String>, ids: &[ItemId]) -> Result<(), CliError> {
    let store = make_store(api_base)?;

    if let [id] = ids {
        store.delete(*id).await?;
        println!("Deleted item {}.", id);
        return Ok(());
    }

    let outcome = store.delete_many(ids).await?;
    if !outcome.deleted_ids.is_empty() {
        println!("Deleted {} items.", outcome.deleted_ids.len());
    }
    if !outcome.failed_ids.is_empty() {
        let failed: Vec<String> = outcome.failed_ids.iter().map(|id| id.to_string()).collect();
        eprintln!("Failed to delete: {}", failed.join(", "));
        // Partial success is a warning; a total failure is an error
        if outcome.deleted_ids.is_empty() {
            return Err(CliError::Other(
                store.error().unwrap_or_else(|| "Bulk delete failed".to_string()),
            ));
        }
    }
    Ok(())
}
