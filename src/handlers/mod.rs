//! Command Handlers module
//!
//! CQRS Command handlers that orchestrate business operations.
//! Each handler loads the product, lets the aggregate decide, and appends
//! the resulting event to the event store.

mod commands;
mod forecast_handler;
mod product_handler;
mod retry;


pub use commands::*;
pub use forecast_handler::{RecordActualHandler, RemoveActualHandler, ReplaceProjectionsHandler};
pub use product_handler::{CreateProductHandler, RenameProductHandler};
pub(crate) use retry::load_product;
