pub mod filter;
pub mod import;
pub mod ordering;
pub mod stats;
pub mod store;
