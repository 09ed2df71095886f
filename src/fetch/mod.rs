mod error;
mod n2yo;
mod source;

pub use error::FetchError;
pub use n2yo::{N2yoClient, DEFAULT_BASE_URL};
pub use source::{CategoryFilter, FetchSource, ObjectPosition, RegionRecord};
