use std::collections::BTreeSet;

use serde::Serialize;

use super::line_map::LineMap;
use super::signature::FunctionSignature;

/// Inputs to a conversion besides the sketch text itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Functions the target dialect already declares (`setup`, `loop`)
    pub entry_points: BTreeSet<String>,
    /// Names declared elsewhere, e.g. in a shared library header
    pub known_prototypes: BTreeSet<String>,
    /// When set, a `#line <n> "<label>"` directive follows injected prototypes
    pub line_directive: Option<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            entry_points: ["setup", "loop"].into_iter().map(String::from).collect(),
            known_prototypes: BTreeSet::new(),
            line_directive: None,
        }
    }
}

impl ConvertOptions {
    /// Every name that must not receive an injected prototype.
    pub fn predeclared(&self) -> BTreeSet<String> {
        self.entry_points
            .union(&self.known_prototypes)
            .cloned()
            .collect()
    }
}

/// The translation unit produced from one sketch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    pub output: String,
    pub line_map: LineMap,
    /// Signatures whose prototypes were injected, in output order
    pub injected: Vec<FunctionSignature>,
    /// 1-indexed input line the prototypes were placed before
    pub insertion_line: Option<usize>,
}
