use serde::{Deserialize, Serialize};

/// Where an output line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineOrigin {
    /// Copied verbatim from this 1-indexed input line
    Input(usize),
    /// Inserted by the converter, directly after input line `after` (0 = before line 1)
    Synthetic { after: usize },
}

/// One run of output lines starting at `output_line`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub output_line: usize,
    pub origin: LineOrigin,
}

/// Maps every output line back to the input line it was copied from.
///
/// Stored as breakpoints: a run starting at an `Input` breakpoint advances one
/// input line per output line, a run starting at a `Synthetic` breakpoint maps
/// every line to the same marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMap {
    pub input_lines: usize,
    pub output_lines: usize,
    pub breakpoints: Vec<Breakpoint>,
}

impl LineMap {
    /// One-to-one map for an output that equals its input.
    pub fn identity(lines: usize) -> Self {
        let breakpoints = if lines == 0 {
            Vec::new()
        } else {
            vec![Breakpoint {
                output_line: 1,
                origin: LineOrigin::Input(1),
            }]
        };
        LineMap {
            input_lines: lines,
            output_lines: lines,
            breakpoints,
        }
    }

    /// Map for `inserted` synthetic lines placed before 1-indexed input line `before`.
    pub fn with_insertion(input_lines: usize, before: usize, inserted: usize) -> Self {
        if inserted == 0 {
            return LineMap::identity(input_lines);
        }
        let after = before.saturating_sub(1);
        let mut breakpoints = Vec::with_capacity(3);
        if after > 0 {
            breakpoints.push(Breakpoint {
                output_line: 1,
                origin: LineOrigin::Input(1),
            });
        }
        breakpoints.push(Breakpoint {
            output_line: after + 1,
            origin: LineOrigin::Synthetic { after },
        });
        if before <= input_lines {
            breakpoints.push(Breakpoint {
                output_line: before + inserted,
                origin: LineOrigin::Input(before),
            });
        }
        LineMap {
            input_lines,
            output_lines: input_lines + inserted,
            breakpoints,
        }
    }

    /// Origin of the 1-indexed `output_line`, or `None` past the end of the output.
    pub fn resolve(&self, output_line: usize) -> Option<LineOrigin> {
        if output_line == 0 || output_line > self.output_lines {
            return None;
        }
        let idx = self
            .breakpoints
            .partition_point(|bp| bp.output_line <= output_line);
        let bp = self.breakpoints.get(idx.checked_sub(1)?)?;
        Some(match bp.origin {
            LineOrigin::Input(line) => LineOrigin::Input(line + (output_line - bp.output_line)),
            synthetic => synthetic,
        })
    }

    /// Output lines inserted by the converter.
    pub fn synthetic_lines(&self) -> usize {
        self.output_lines - self.input_lines
    }
}
