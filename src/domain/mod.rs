pub mod collection;
pub mod filter;
pub mod import;
pub mod lead;
pub mod paginate;
pub mod quality;
pub mod sort;
pub mod stats;
