pub mod fallback;
pub mod product;
pub mod sale;
