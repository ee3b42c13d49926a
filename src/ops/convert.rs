use crate::model::conversion::{ConversionResult, ConvertOptions};
use crate::ops::assemble::assemble;
use crate::parse::depth::annotate;
use crate::parse::error::ConvertError;
use crate::parse::extract::{Extraction, extract};
use crate::parse::mask::mask;

/// Convert one sketch into a translation unit.
///
/// Runs masking, tokenizing, brace tracking, extraction and assembly in
/// order. Any error aborts the whole conversion; there is no partial output.
pub fn convert(source: &str, options: &ConvertOptions) -> Result<ConversionResult, ConvertError> {
    let text = mask(source)?;
    let tokens = annotate(&text)?;
    let extraction = extract(&text, &tokens, &options.predeclared());
    let result = assemble(
        &text,
        extraction.to_inject(),
        options.line_directive.as_deref(),
    );
    log::debug!(
        "converted {} line(s) into {}, {} prototype(s) injected",
        result.line_map.input_lines,
        result.line_map.output_lines,
        result.injected.len()
    );
    Ok(result)
}

/// Discover definitions and prototypes without assembling any output.
pub fn scan(source: &str, options: &ConvertOptions) -> Result<Extraction, ConvertError> {
    let text = mask(source)?;
    let tokens = annotate(&text)?;
    Ok(extract(&text, &tokens, &options.predeclared()))
}
