use serde::{Deserialize, Serialize};

/// Configuration from sketchpp.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SketchConfig {
    /// Functions the dialect declares for you
    #[serde(default = "default_entry_points")]
    pub entry_points: Vec<String>,
    /// Function names to treat as already declared
    #[serde(default)]
    pub known_prototypes: Vec<String>,
    /// Headers whose prototypes count as declared. Relative paths resolve
    /// against the directory holding sketchpp.toml.
    #[serde(default)]
    pub headers: Vec<String>,
    /// Emit a `#line` directive after injected prototypes
    #[serde(default)]
    pub line_directives: bool,
}

impl Default for SketchConfig {
    fn default() -> Self {
        SketchConfig {
            entry_points: default_entry_points(),
            known_prototypes: Vec::new(),
            headers: Vec::new(),
            line_directives: false,
        }
    }
}

/// Default: see src/cli/handlers/init.rs
fn default_entry_points() -> Vec<String> {
    vec!["setup".to_string(), "loop".to_string()]
}
