pub mod collection;
pub mod filter;
