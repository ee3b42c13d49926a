mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::sketch_io;
use crate::model::config::SketchConfig;
use crate::model::conversion::ConvertOptions;
use crate::ops::convert;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    match cli.command {
        Commands::Convert(args) => cmd_convert(args, json),
        Commands::Prototypes(args) => cmd_prototypes(args, json),
        Commands::Resolve(args) => cmd_resolve(args, json),
        Commands::Init(args) => cmd_init(args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A sketch read from disk together with the options that apply to it
struct LoadedSketch {
    label: String,
    source: String,
    options: ConvertOptions,
}

/// Read the sketch and resolve its config: explicit `--config`, else the
/// nearest sketchpp.toml above the sketch, else defaults.
fn load_sketch(args: &SketchArgs) -> Result<LoadedSketch, Box<dyn std::error::Error>> {
    let source = sketch_io::read_sketch(&args.input)?;
    log::info!("read {} ({} bytes)", args.input.display(), source.len());

    let config_path = if args.no_config {
        None
    } else if let Some(path) = &args.config {
        Some(path.clone())
    } else {
        config_io::discover_config(&sketch_dir(&args.input))
    };

    let (mut config, base_dir) = match config_path {
        Some(path) => {
            log::info!("using config {}", path.display());
            let config = config_io::load_config(&path)?;
            let base = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            (config, base)
        }
        None => (SketchConfig::default(), PathBuf::from(".")),
    };
    if args.line_directives {
        config.line_directives = true;
    }

    let label = args.input.display().to_string();
    let options = config_io::build_options(
        &config,
        &base_dir,
        &args.headers,
        Some(line_label(&args.input)),
    )?;

    Ok(LoadedSketch {
        label,
        source,
        options,
    })
}

/// File name used in `#line` directives, falling back to the path as given.
fn line_label(input: &Path) -> String {
    input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string())
}

/// Absolute directory holding `input`, for config discovery.
fn sketch_dir(input: &Path) -> PathBuf {
    let dir = match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::canonicalize(&dir).unwrap_or(dir)
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_convert(args: ConvertArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let sketch = load_sketch(&args.sketch)?;
    let result = convert::convert(&sketch.source, &sketch.options)
        .map_err(|e| format_convert_error(&sketch.label, &sketch.source, &e))?;

    log::info!(
        "{}: {} prototype(s) injected",
        sketch.label,
        result.injected.len()
    );

    if let Some(path) = &args.output {
        sketch_io::write_output(path, &result.output)?;
        log::info!("wrote {}", path.display());
    }
    if let Some(path) = &args.map {
        sketch_io::write_line_map(path, &result.line_map)?;
        log::info!("wrote line map {}", path.display());
    }

    if json {
        let output_path = args.output.as_ref().map(|p| p.display().to_string());
        let out = conversion_to_json(&result, output_path, args.output.is_none());
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if args.output.is_none() {
        print!("{}", result.output);
    }
    Ok(())
}

fn cmd_prototypes(args: PrototypesArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let sketch = load_sketch(&args.sketch)?;
    let extraction = convert::scan(&sketch.source, &sketch.options)
        .map_err(|e| format_convert_error(&sketch.label, &sketch.source, &e))?;

    let signatures: Vec<_> = extraction
        .definitions
        .iter()
        .filter(|sig| !args.missing || !sig.declared)
        .collect();

    if json {
        let out: Vec<SignatureJson> = signatures.iter().map(|sig| signature_to_json(sig)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for sig in signatures {
            println!("{}", format_signature_line(sig));
        }
    }
    Ok(())
}

fn cmd_resolve(args: ResolveArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let map = sketch_io::read_line_map(&args.map)?;
    let origin = map.resolve(args.line).ok_or_else(|| {
        format!(
            "line {} is outside the translation unit (1-{})",
            args.line, map.output_lines
        )
    })?;

    if json {
        let out = ResolveJson {
            output_line: args.line,
            origin,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", format_origin(args.line, origin));
    }
    Ok(())
}
