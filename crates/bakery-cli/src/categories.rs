//! Category command handlers for the CLI.

use std::path::PathBuf;

use bakery_client::{ApiClient, ImageSource};
use bakery_core::CategoryForm;
use bakery_storefront::{category_columns, DataTable};
use clap::Subcommand;

/// Sub-commands available under `categories`.
#[derive(Debug, Subcommand)]
pub enum CategoryCommands {
    /// List one page of categories
    List {
        #[arg(long, default_value = "1")]
        page: u32,
        /// Rows per page (5, 10, 25 or 50)
        #[arg(long, default_value = "10")]
        limit: u32,
    },
    /// Show one category
    Get { id: String },
    /// Create a category; the slug is derived from the name unless given
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Update the given fields of a category
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete a category
    Delete { id: String },
}

pub(crate) async fn dispatch(client: &ApiClient, command: CategoryCommands) -> anyhow::Result<()> {
    match command {
        CategoryCommands::List { page, limit } => run_categories_list(client, page, limit).await,
        CategoryCommands::Get { id } => {
            let category = client.get_category(&id).await.map_err(super::explain)?;
            println!("{:<13}{}", "ID", category.id);
            println!("{:<13}{}", "NAME", category.name);
            println!("{:<13}{}", "SLUG", category.slug);
            println!("{:<13}{}", "DESCRIPTION", category.description);
            if let Some(image) = category.cover_image() {
                println!("{:<13}{image}", "IMAGE");
            }
            Ok(())
        }
        CategoryCommands::Create {
            name,
            description,
            slug,
            image,
        } => {
            let mut form = CategoryForm::new();
            form.set_name(&name);
            form.description = description;
            if let Some(slug) = slug {
                form.set_slug(&slug);
            }
            let draft = form.validate()?;
            let created = client
                .create_category(&draft, image.map(ImageSource::File))
                .await
                .map_err(super::explain)?;
            println!("created category {} ({})", created.id, created.slug);
            Ok(())
        }
        CategoryCommands::Update {
            id,
            name,
            description,
            slug,
            image,
        } => {
            let original = client.get_category(&id).await.map_err(super::explain)?;
            let mut form = CategoryForm::from_category(&original);
            if let Some(name) = name {
                form.set_name(&name);
            }
            if let Some(description) = description {
                form.description = description;
            }
            if let Some(slug) = slug {
                form.set_slug(&slug);
            }
            let patch = form.to_patch(&original)?;
            if patch.is_empty() && image.is_none() {
                println!("nothing to change for category {id}");
                return Ok(());
            }
            let updated = client
                .update_category(&id, &patch, image.map(ImageSource::File))
                .await
                .map_err(super::explain)?;
            println!("updated category {} ({})", updated.id, updated.name);
            Ok(())
        }
        CategoryCommands::Delete { id } => {
            client.delete_category(&id).await.map_err(super::explain)?;
            println!("deleted category {id}");
            Ok(())
        }
    }
}

/// Prints one page of the admin categories table.
///
/// # Errors
///
/// Returns an error for an unsupported `limit` or a failed request.
pub(crate) async fn run_categories_list(
    client: &ApiClient,
    page: u32,
    limit: u32,
) -> anyhow::Result<()> {
    let mut table = DataTable::new(category_columns());
    table.state_mut().set_rows_per_page(limit)?;
    table.state_mut().set_page_index(page.saturating_sub(1));

    let result = client
        .list_categories(table.state().fetch_page(), table.state().rows_per_page())
        .await
        .map_err(super::explain)?;
    table.load(result);

    if table.rows().is_empty() {
        println!("no categories found");
        return Ok(());
    }
    super::print_table(&table);
    println!(
        "page {} ({} categories in total)",
        table.state().fetch_page(),
        table.state().total_items()
    );
    Ok(())
}
