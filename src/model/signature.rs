use serde::Serialize;

use crate::parse::span::SourceSpan;

/// A top-level function definition found in a sketch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSignature {
    /// Everything before the name, e.g. `static unsigned long`
    pub return_type: String,
    pub name: String,
    /// Text between the parentheses, without the parentheses or any default
    /// arguments
    pub params: String,
    /// Whatever follows the parameter list, e.g. `noexcept`
    pub qualifiers: String,
    /// From the first return-type token through the opening brace
    pub span: SourceSpan,
    /// A prototype for this name exists, or none is needed
    pub declared: bool,
}

impl FunctionSignature {
    /// The forward declaration for this function, without a line ending.
    pub fn prototype(&self) -> String {
        if self.qualifiers.is_empty() {
            format!("{} {}({});", self.return_type, self.name, self.params)
        } else {
            format!(
                "{} {}({}) {};",
                self.return_type, self.name, self.params, self.qualifiers
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prototype_text() {
        let sig = FunctionSignature {
            return_type: "static int".into(),
            name: "scale".into(),
            params: "int raw, float k".into(),
            qualifiers: String::new(),
            span: SourceSpan::new(0, 10, 1, 1),
            declared: false,
        };
        assert_eq!(sig.prototype(), "static int scale(int raw, float k);");
    }

    #[test]
    fn test_prototype_without_params() {
        let sig = FunctionSignature {
            return_type: "void".into(),
            name: "blink".into(),
            params: String::new(),
            qualifiers: String::new(),
            span: SourceSpan::new(0, 10, 1, 1),
            declared: false,
        };
        assert_eq!(sig.prototype(), "void blink();");
    }

    #[test]
    fn test_prototype_keeps_exception_specification() {
        let sig = FunctionSignature {
            return_type: "unsigned long".into(),
            name: "tick".into(),
            params: String::new(),
            qualifiers: "noexcept(true)".into(),
            span: SourceSpan::new(0, 10, 1, 1),
            declared: false,
        };
        assert_eq!(sig.prototype(), "unsigned long tick() noexcept(true);");
    }
}
