//! Turning an SVG file into the intermediate canvas markup.

use std::path::Path;
use std::process::Command;

use log::{debug, warn};

use crate::error::Error;

/// Something that renders `svg` into canvas drawing calls written to `output`.
pub trait Converter {
    fn convert(&self, svg: &Path, output: &Path) -> Result<(), Error>;
}

/// Runs `inkscape <svg> -o <output>`, which picks the HTML5 canvas exporter
/// from the output file extension.
#[derive(Debug, Clone, PartialEq)]
pub struct Inkscape {
    program: String,
}

impl Inkscape {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for Inkscape {
    fn default() -> Self {
        Self::new("inkscape")
    }
}

impl Converter for Inkscape {
    fn convert(&self, svg: &Path, output: &Path) -> Result<(), Error> {
        debug!(
            "convert: {} {} -o {}",
            self.program(),
            svg.display(),
            output.display()
        );
        let status = Command::new(self.program())
            .arg(svg)
            .arg("-o")
            .arg(output)
            .status()
            .map_err(|source| Error::Converter {
                program: self.program().to_string(),
                source,
            })?;

        // Whatever the converter managed to write is still parsed.
        if !status.success() {
            warn!(
                "{} exited with {} while converting {}",
                self.program(),
                status,
                svg.display()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_program() {
        assert_eq!(Inkscape::default().program(), "inkscape");
    }

    #[test]
    fn test_missing_program() {
        let inkscape = Inkscape::new("svg2luapath-no-such-converter");
        let result = inkscape.convert(Path::new("a.svg"), Path::new("a.html"));
        match result {
            Err(Error::Converter { program, .. }) => {
                assert_eq!(program, "svg2luapath-no-such-converter")
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}
