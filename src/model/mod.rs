pub mod config;
pub mod conversion;
pub mod line_map;
pub mod signature;
pub mod token;

pub use config::*;
pub use conversion::*;
pub use line_map::*;
pub use signature::*;
pub use token::*;
