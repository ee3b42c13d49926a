pub mod depth;
pub mod error;
pub mod extract;
pub mod mask;
pub mod span;
pub mod tokenizer;

pub use depth::annotate;
pub use error::{BraceFault, ConvertError, LiteralKind};
pub use extract::{Extraction, declared_names, extract};
pub use mask::{MaskedText, mask};
pub use span::SourceSpan;
