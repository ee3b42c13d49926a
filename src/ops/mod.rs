pub mod assemble;
pub mod convert;

pub use convert::{convert, scan};
