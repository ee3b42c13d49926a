use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::io::sketch_io::{self, SketchIoError};
use crate::model::config::SketchConfig;
use crate::model::conversion::ConvertOptions;
use crate::parse::extract::declared_names;

/// Name of the configuration file looked up next to sketches.
pub const CONFIG_FILE: &str = "sketchpp.toml";

/// Find sketchpp.toml by walking up from `start`.
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Read and parse a config file.
pub fn load_config(path: &Path) -> Result<SketchConfig, SketchIoError> {
    let text = sketch_io::read_sketch(path)?;
    toml::from_str(&text).map_err(|e| SketchIoError::ConfigParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Collect the names prototyped in each header. Missing headers are skipped
/// with a warning; headers that fail to scan are errors.
pub fn harvest_headers(headers: &[PathBuf]) -> Result<BTreeSet<String>, SketchIoError> {
    let mut names = BTreeSet::new();
    for path in headers {
        if !path.is_file() {
            log::warn!("header {} not found, skipping", path.display());
            continue;
        }
        let text = sketch_io::read_sketch(path)?;
        let declared = declared_names(&text).map_err(|e| SketchIoError::HeaderError {
            path: path.clone(),
            source: e,
        })?;
        log::info!(
            "{} prototype(s) declared in {}",
            declared.len(),
            path.display()
        );
        names.extend(declared);
    }
    Ok(names)
}

/// Build conversion options from a config. `base_dir` is the directory the
/// config was loaded from; `extra_headers` come from the command line and are
/// used as given.
pub fn build_options(
    config: &SketchConfig,
    base_dir: &Path,
    extra_headers: &[PathBuf],
    line_label: Option<String>,
) -> Result<ConvertOptions, SketchIoError> {
    let mut headers: Vec<PathBuf> = config.headers.iter().map(|h| base_dir.join(h)).collect();
    headers.extend(extra_headers.iter().cloned());

    let mut known_prototypes: BTreeSet<String> = config.known_prototypes.iter().cloned().collect();
    known_prototypes.extend(harvest_headers(&headers)?);

    Ok(ConvertOptions {
        entry_points: config.entry_points.iter().cloned().collect(),
        known_prototypes,
        line_directive: if config.line_directives { line_label } else { None },
    })
}
