pub mod config;
pub mod conversion;
pub mod definition;
pub mod snapshot;

pub use config::*;
pub use conversion::*;
pub use definition::*;
pub use snapshot::*;
