pub mod console;
pub mod dashboard;
pub mod table;

pub use console::{
    AdminConsole, CategoryAdmin, CrudResource, Editor, EditorMode, ProductAdmin, SubmitOutcome,
};
pub use dashboard::{load_summary, DashboardSummary};
pub use table::{
    category_columns, product_columns, Column, DataTable, TableError, TableRow, TableState,
    ROWS_PER_PAGE_OPTIONS,
};
