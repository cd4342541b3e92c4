//! Storefront and admin behaviour on top of the bakery API client.
//!
//! - [`listing`]: infinite-scroll (or paged) product listing with stale
//!   response protection.
//! - [`discovery`]: flavour and occasion shelves.
//! - [`admin`]: CRUD tables, forms and the dashboard summary.
//! - [`guard`]: route protection for admin pages.

pub mod admin;
pub mod discovery;
pub mod guard;
pub mod listing;

pub use admin::{
    category_columns, load_summary, product_columns, AdminConsole, DataTable, TableRow,
};
pub use discovery::{facet_values, Facet, FacetShelf, SHELF_LIMIT};
pub use guard::{Access, AuthGate, GateDecision};
pub use listing::{CategoryFilter, Completion, Listing, ListingState, LoadError, Mode, ProductSource};
