//! Discovery shelves and the admin dashboard.

use bakery_client::ApiClient;
use bakery_core::format_price;
use bakery_storefront::{load_summary, Facet, FacetShelf};
use clap::Subcommand;

/// Facet values shown per carousel window.
const VALUES_PER_VIEW: usize = 5;

/// Sub-commands available under `shelf`.
#[derive(Debug, Subcommand)]
pub enum ShelfCommands {
    /// Shop by flavour
    Flavour {
        /// Flavour to show; defaults to the first one found
        #[arg(long)]
        value: Option<String>,
    },
    /// Shop by occasion (product tags)
    Occasion {
        /// Occasion to show; defaults to the first one found
        #[arg(long)]
        value: Option<String>,
    },
}

/// Prints the facet values and the products for the selected one.
///
/// # Errors
///
/// Returns an error when the products cannot be fetched or `value` is not
/// one of the shelf's values.
pub(crate) async fn run_shelf(client: &ApiClient, command: ShelfCommands) -> anyhow::Result<()> {
    let (facet, value) = match command {
        ShelfCommands::Flavour { value } => (Facet::Flavour, value),
        ShelfCommands::Occasion { value } => (Facet::Occasion, value),
    };
    let mut shelf = FacetShelf::load(client, facet, VALUES_PER_VIEW)
        .await
        .map_err(super::explain)?;

    if shelf.values().is_empty() {
        println!("nothing on this shelf yet");
        return Ok(());
    }
    if let Some(value) = value.as_deref() {
        if !shelf.select(value) {
            anyhow::bail!(
                "'{value}' is not on this shelf; choose one of: {}",
                shelf.values().join(", ")
            );
        }
    }

    let selected = shelf.selected().unwrap_or_default();
    let values: Vec<String> = shelf
        .values()
        .iter()
        .map(|v| {
            if v == selected {
                format!("[{v}]")
            } else {
                v.clone()
            }
        })
        .collect();
    println!("{}", values.join("  "));
    println!();

    for product in shelf.shown() {
        println!(
            "{:<30}{:>12}",
            super::clip(&product.name, 28),
            format_price(product.effective_price())
        );
    }
    if shelf.has_view_all() {
        println!("...more available, see `bakery products browse`");
    }
    Ok(())
}

/// Prints product and category totals.
///
/// # Errors
///
/// Returns an error when either count request fails.
pub(crate) async fn run_dashboard(client: &ApiClient) -> anyhow::Result<()> {
    let summary = load_summary(client).await.map_err(super::explain)?;
    println!("{:<18}{}", "PRODUCTS", summary.total_products);
    println!("{:<18}{}", "CATEGORIES", summary.total_categories);
    Ok(())
}
