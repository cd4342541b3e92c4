use bakery_client::{ApiClient, ClientError};

/// Headline counts for the admin landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_products: u64,
    pub total_categories: u64,
}

/// Reads both totals from single-item list requests.
///
/// # Errors
///
/// Returns the first [`ClientError`] from either request.
pub async fn load_summary(client: &ApiClient) -> Result<DashboardSummary, ClientError> {
    let (products, categories) = tokio::try_join!(
        client.list_products(1, 1, None),
        client.list_categories(1, 1)
    )?;
    Ok(DashboardSummary {
        total_products: products.pagination.total_items,
        total_categories: categories.pagination.total_items,
    })
}
