//! Product command handlers for the CLI.
//!
//! Read commands work signed out. `create`, `update` and `delete` need a
//! session from `bakery login`; the client refuses them before any request
//! is made otherwise.

use std::path::PathBuf;
use std::sync::Arc;

use bakery_client::{ApiClient, ImageSource};
use bakery_core::{format_price, whatsapp_order_link, AppConfig, Product, ProductForm};
use bakery_storefront::{product_columns, CategoryFilter, DataTable, Listing, Mode};
use clap::{Args, Subcommand};

/// Sub-commands available under `products`.
#[derive(Debug, Subcommand)]
pub enum ProductCommands {
    /// List one page of products
    List {
        /// 1-based page number
        #[arg(long, default_value = "1")]
        page: u32,
        /// Rows per page (5, 10, 25 or 50)
        #[arg(long, default_value = "10")]
        limit: u32,
        /// Only products in this category (by name)
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one product
    Get { id: String },
    /// Create a product
    Create {
        #[command(flatten)]
        fields: ProductFields,
        /// Create the product as unavailable
        #[arg(long)]
        unavailable: bool,
    },
    /// Update the given fields of a product
    Update {
        id: String,
        #[command(flatten)]
        fields: ProductFields,
        #[arg(long)]
        available: Option<bool>,
    },
    /// Delete a product
    Delete { id: String },
    /// Scroll through the catalogue page by page
    Browse {
        #[arg(long)]
        category: Option<String>,
        /// Only show products whose name contains this text
        #[arg(long)]
        search: Option<String>,
        /// Stop after this many pages even if more remain
        #[arg(long)]
        max_pages: Option<u32>,
    },
}

/// Editable product fields shared by `create` and `update`.
#[derive(Debug, Default, Args)]
pub struct ProductFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub price: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    /// Whole percentage, 0 to 100
    #[arg(long)]
    pub discount: Option<String>,
    /// Comma-separated
    #[arg(long)]
    pub tags: Option<String>,
    #[arg(long)]
    pub theme: Option<String>,
    #[arg(long)]
    pub flavour: Option<String>,
    /// Image file (jpeg, png or webp, at most 5 MiB)
    #[arg(long)]
    pub image: Option<PathBuf>,
}

impl ProductFields {
    /// Overwrites the form fields that were given on the command line.
    fn apply(&self, form: &mut ProductForm) {
        let pairs = [
            (&self.name, &mut form.name),
            (&self.description, &mut form.description),
            (&self.price, &mut form.price),
            (&self.category, &mut form.category),
            (&self.discount, &mut form.discount),
            (&self.tags, &mut form.tags),
            (&self.theme, &mut form.theme),
            (&self.flavour, &mut form.flavour),
        ];
        for (given, field) in pairs {
            if let Some(value) = given {
                field.clone_from(value);
            }
        }
    }

    fn image(&self) -> Option<ImageSource> {
        self.image.clone().map(ImageSource::File)
    }
}

pub(crate) async fn dispatch(
    client: &Arc<ApiClient>,
    config: &AppConfig,
    command: ProductCommands,
) -> anyhow::Result<()> {
    match command {
        ProductCommands::List {
            page,
            limit,
            category,
        } => run_products_list(client, page, limit, category.as_deref()).await,
        ProductCommands::Get { id } => run_products_get(client, config, &id).await,
        ProductCommands::Create {
            fields,
            unavailable,
        } => run_products_create(client, &fields, !unavailable).await,
        ProductCommands::Update {
            id,
            fields,
            available,
        } => run_products_update(client, &id, &fields, available).await,
        ProductCommands::Delete { id } => {
            client.delete_product(&id).await.map_err(super::explain)?;
            println!("deleted product {id}");
            Ok(())
        }
        ProductCommands::Browse {
            category,
            search,
            max_pages,
        } => {
            run_products_browse(
                client,
                config.page_size,
                category.as_deref(),
                search.as_deref(),
                max_pages,
            )
            .await
        }
    }
}

/// Prints one page of the admin products table.
///
/// # Errors
///
/// Returns an error for an unsupported `limit` or a failed request.
pub(crate) async fn run_products_list(
    client: &ApiClient,
    page: u32,
    limit: u32,
    category: Option<&str>,
) -> anyhow::Result<()> {
    let mut table = DataTable::new(product_columns());
    table.state_mut().set_rows_per_page(limit)?;
    table.state_mut().set_page_index(page.saturating_sub(1));

    let state = table.state();
    let result = client
        .list_products(state.fetch_page(), state.rows_per_page(), category)
        .await
        .map_err(super::explain)?;
    table.load(result);

    if table.rows().is_empty() {
        println!("no products found");
        return Ok(());
    }
    super::print_table(&table);
    let state = table.state();
    println!(
        "page {} ({} products in total)",
        state.fetch_page(),
        state.total_items()
    );
    Ok(())
}

async fn run_products_get(client: &ApiClient, config: &AppConfig, id: &str) -> anyhow::Result<()> {
    let product = client.get_product(id).await.map_err(super::explain)?;
    print_product(&product);
    if let Some(number) = config.whatsapp_number.as_deref() {
        println!("{:<13}{}", "ORDER", whatsapp_order_link(number, &product));
    }
    Ok(())
}

/// Validates the fields locally, then creates the product.
///
/// # Errors
///
/// Returns every invalid field at once, or the backend's rejection.
pub(crate) async fn run_products_create(
    client: &ApiClient,
    fields: &ProductFields,
    available: bool,
) -> anyhow::Result<()> {
    let mut form = ProductForm {
        available,
        ..ProductForm::default()
    };
    fields.apply(&mut form);
    let draft = form.validate()?;

    let product = client
        .create_product(&draft, fields.image())
        .await
        .map_err(super::explain)?;
    println!("created product {} ({})", product.id, product.name);
    Ok(())
}

/// Sends only the fields that differ from the stored product.
///
/// # Errors
///
/// Returns an error when the product cannot be loaded, the merged form is
/// invalid, or the backend rejects the update.
pub(crate) async fn run_products_update(
    client: &ApiClient,
    id: &str,
    fields: &ProductFields,
    available: Option<bool>,
) -> anyhow::Result<()> {
    let original = client.get_product(id).await.map_err(super::explain)?;
    let mut form = ProductForm::from_product(&original);
    fields.apply(&mut form);
    if let Some(available) = available {
        form.available = available;
    }
    let patch = form.to_patch(&original)?;

    let image = fields.image();
    if patch.is_empty() && image.is_none() {
        println!("nothing to change for product {id}");
        return Ok(());
    }
    let updated = client
        .update_product(id, &patch, image)
        .await
        .map_err(super::explain)?;
    println!("updated product {} ({})", updated.id, updated.name);
    Ok(())
}

/// Loads pages through the infinite listing until it runs out or
/// `max_pages` is reached, then prints what was loaded.
///
/// # Errors
///
/// Returns the listing's error when the first page fails. A later page
/// failure keeps what was already loaded and is reported after the table.
pub(crate) async fn run_products_browse(
    client: &Arc<ApiClient>,
    page_size: u32,
    category: Option<&str>,
    search: Option<&str>,
    max_pages: Option<u32>,
) -> anyhow::Result<()> {
    let filter = category.map_or(CategoryFilter::All, CategoryFilter::from_label);
    let listing = Listing::new(Arc::clone(client), filter, page_size, Mode::Infinite);

    listing.initial_load().await;
    if listing.items().is_empty() {
        if let Some(error) = listing.error() {
            anyhow::bail!(error.message);
        }
    }

    let mut pages = 1;
    while listing.has_more() && max_pages.is_none_or(|max| pages < max) {
        listing.load_more().await;
        pages += 1;
    }

    let shown = match search {
        Some(query) => listing.search(query),
        None => listing.items(),
    };
    if shown.is_empty() {
        println!("no products found");
    } else {
        println!("{:<26}{:<30}{:<16}{:>12}", "ID", "NAME", "CATEGORY", "PRICE");
        for product in &shown {
            println!(
                "{:<26}{:<30}{:<16}{:>12}",
                super::clip(&product.id, 24),
                super::clip(&product.name, 28),
                super::clip(&product.category, 14),
                format_price(product.effective_price())
            );
        }
    }

    let total = listing.items().len();
    println!("{} of {total} loaded products shown", shown.len());
    if let Some(error) = listing.error() {
        eprintln!("warning: stopped early: {}", error.message);
    } else if listing.has_more() {
        println!("more products available; raise --max-pages to load them");
    }
    Ok(())
}

/// Prints the WhatsApp order link for one product.
///
/// # Errors
///
/// Returns an error when no WhatsApp number is configured or the product
/// cannot be loaded.
pub(crate) async fn run_order_link(
    client: &ApiClient,
    config: &AppConfig,
    id: &str,
) -> anyhow::Result<()> {
    let number = config
        .whatsapp_number
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("BAKERY_WHATSAPP_NUMBER is not set"))?;
    let product = client.get_product(id).await.map_err(super::explain)?;
    println!("{}", whatsapp_order_link(number, &product));
    Ok(())
}

fn print_product(product: &Product) {
    println!("{:<13}{}", "ID", product.id);
    println!("{:<13}{}", "NAME", product.name);
    println!("{:<13}{}", "CATEGORY", product.category);
    if product.has_discount() {
        println!(
            "{:<13}NRs. {} (was {}, {}% off)",
            "PRICE",
            format_price(product.effective_price()),
            format_price(product.price),
            product.discount.percent()
        );
    } else {
        println!("{:<13}NRs. {}", "PRICE", format_price(product.price));
    }
    println!("{:<13}{}", "AVAILABLE", if product.available { "yes" } else { "no" });
    for (label, value) in [
        ("FLAVOUR", &product.flavour),
        ("THEME", &product.theme),
        ("DESCRIPTION", &product.description),
    ] {
        if !value.is_empty() {
            println!("{label:<13}{value}");
        }
    }
    if !product.tags.is_empty() {
        println!("{:<13}{}", "TAGS", product.tags.join(", "));
    }
    for (i, image) in product.images.iter().enumerate() {
        let label = if i == 0 { "IMAGES" } else { "" };
        println!("{label:<13}{image}");
    }
}
