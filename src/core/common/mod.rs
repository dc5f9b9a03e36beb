pub mod error;
pub use error::CbirError;
