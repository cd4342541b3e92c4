mod auth;
mod categories;
mod products;
mod shelf;

use std::sync::Arc;

use bakery_client::{ApiClient, ClientError, FileStore, Session};
use bakery_storefront::{DataTable, TableRow};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use categories::CategoryCommands;
use products::ProductCommands;
use shelf::ShelfCommands;

#[derive(Debug, Parser)]
#[command(name = "bakery")]
#[command(about = "Bakery storefront and admin command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BAKERY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session token
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Browse and manage categories
    Categories {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Show a discovery shelf
    Shelf {
        #[command(subcommand)]
        command: ShelfCommands,
    },
    /// Show admin dashboard totals
    Dashboard,
    /// Print a WhatsApp order link for a product
    OrderLink {
        /// Product id
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = bakery_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        println!("bakery: no command given, see `bakery --help`");
        return Ok(());
    };

    let session = Arc::new(Session::new(FileStore::new(config.session_path.clone())));
    let client = Arc::new(ApiClient::from_config(&config, session)?);
    tracing::debug!(env = %config.env, base_url = %client.base_url(), "client ready");

    match command {
        Commands::Login { email, password } => auth::run_login(&client, &email, &password).await,
        Commands::Logout => {
            auth::run_logout(&client);
            Ok(())
        }
        Commands::Whoami => auth::run_whoami(&client).await,
        Commands::Products { command } => products::dispatch(&client, &config, command).await,
        Commands::Categories { command } => categories::dispatch(&client, command).await,
        Commands::Shelf { command } => shelf::run_shelf(&client, command).await,
        Commands::Dashboard => shelf::run_dashboard(&client).await,
        Commands::OrderLink { id } => products::run_order_link(&client, &config, &id).await,
    }
}

/// Wraps a client error so the user-facing message leads and the cause
/// chain stays available to `{:#}` / `{:?}`.
fn explain(err: ClientError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

/// Widest a printed table column may grow before values are clipped.
const MAX_COLUMN_WIDTH: usize = 40;

/// Prints a loaded admin table with an `ID` column first.
fn print_table<T: TableRow>(table: &DataTable<T>) {
    let mut headers = vec!["ID".to_string()];
    headers.extend(table.headers().iter().map(|h| h.to_uppercase()));
    let rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .zip(table.cells())
        .map(|(row, cells)| {
            let mut line = vec![row.row_id().to_string()];
            line.extend(cells.iter().map(|c| clip(c, MAX_COLUMN_WIDTH)));
            line
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or_default()
                + 2
        })
        .collect();

    let render = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<String>()
            .trim_end()
            .to_string()
    };
    println!("{}", render(&headers));
    for row in &rows {
        println!("{}", render(row));
    }
}

/// Truncates `text` to `max` characters, appending `...` when cut.
fn clip(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}
