pub mod error;
pub mod filter;
pub mod store;

pub use error::WatermarkError;
pub use filter::WatermarkFilter;
pub use store::WatermarkStore;
