pub mod app;
pub mod edit;
pub mod reorder;

pub use app::{App, Intent, Outcome};
