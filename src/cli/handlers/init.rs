use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io::{self, CONFIG_FILE};
use crate::io::sketch_io;

const CONFIG_TEMPLATE: &str = r##"# sketchpp configuration
# Applies to every sketch in this directory and below.

# Functions the board core already declares. These never get a prototype.
entry_points = ["setup", "loop"]

# Functions declared somewhere the converter cannot see.
known_prototypes = []

# Headers whose prototypes count as declared.
# Paths are relative to this file.
headers = []

# Follow injected prototypes with `#line <n> "<sketch>"` so compiler
# diagnostics point at the sketch instead of the translation unit.
line_directives = false
"##;

/// Write the default config into `dir`, refusing to clobber unless `force`.
fn write_default_config(dir: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() && !force {
        return Err(format!("{} already exists (use --force to overwrite)", CONFIG_FILE).into());
    }

    // Note a config further up that this one will shadow
    if let Some(parent) = dir.parent()
        && let Some(existing) = config_io::discover_config(parent)
    {
        eprintln!("Note: {} will shadow {}", CONFIG_FILE, existing.display());
    }

    sketch_io::write_output(&path, CONFIG_TEMPLATE)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

pub fn cmd_init(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    write_default_config(&cwd, args.force)?;
    println!("Created {}", CONFIG_FILE);
    Ok(())
}
