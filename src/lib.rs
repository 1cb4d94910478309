//! Convert SVG icons into path strings for an mpv on-screen-controller skin.
//!
//! Every icon `icons/<name>.svg` is exported by Inkscape to an HTML5 canvas
//! file. The `ctx.moveTo`, `ctx.lineTo` and `ctx.bezierCurveTo` calls in
//! that file are rewritten to the ASS drawing commands `m`, `l` and `b`
//! and printed as one entry of a Lua table:
//!
//! ```text
//! local icons = {
//!     play = "{\\p1}m 0 0 m 24 24 m 8 5 l 19 12 l 8 19{\\p0}",
//! }
//! ```
//!
//! **Note: Only absolute, untransformed paths are supported. Groups with a
//! transform must be flattened in the SVG before exporting.**
//!
//! You can optionally get serde 1 support by enabling the `serde` feature.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

use std::env;
use std::fmt;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use log::{debug, trace, warn};
use regex::{Captures, Regex};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod convert;
mod error;

pub use crate::convert::{Converter, Inkscape};
pub use crate::error::Error;

/// Icons converted when no names are given on the command line.
pub const DEFAULT_ICONS: &[&str] = &[
    "play",
    "pause",
    "close",
    "minimize",
    "maximize",
    "maximize_exit",
    "fs_enter",
    "fs_exit",
    "info",
    "cy_audio",
    "cy_sub",
    "pl_prev",
    "pl_next",
    "skipback",
    "skipfrwd",
    "volume_low",
    "volume_medium",
    "volume_high",
    "volume_over",
    "volume_mute",
];

const ICONS_DIR_VAR: &str = "SVG2LUAPATH_ICONS_DIR";
const CONVERTER_VAR: &str = "SVG2LUAPATH_INKSCAPE";

/// Where icons live and how they are converted.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding `<name>.svg` files. The intermediate files are
    /// written next to them.
    pub icons_dir: PathBuf,
    /// Program invoked as `<converter> <svg> -o <intermediate>`.
    pub converter: String,
    /// Extension of the intermediate file, which also selects the
    /// converter's export format.
    pub extension: String,
    pub default_icons: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            icons_dir: PathBuf::from("icons"),
            converter: "inkscape".into(),
            extension: "html".into(),
            default_icons: DEFAULT_ICONS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl Config {
    /// Defaults, with the icons directory and converter program taken from
    /// `SVG2LUAPATH_ICONS_DIR` and `SVG2LUAPATH_INKSCAPE` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = env::var_os(ICONS_DIR_VAR) {
            config.icons_dir = PathBuf::from(dir);
        }
        match env::var(CONVERTER_VAR) {
            Ok(program) => config.converter = program,
            Err(env::VarError::NotUnicode(value)) => {
                warn!("Ignoring {}: {:?} is not valid UTF-8", CONVERTER_VAR, value);
            }
            Err(env::VarError::NotPresent) => {}
        }
        trace!("Config::from_env: {:?}", config);
        config
    }

    /// Icon names to process: the given arguments if there are any,
    /// otherwise the default list.
    pub fn resolve_icons<I>(&self, args: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let icons: Vec<String> = args.into_iter().collect();
        if icons.is_empty() {
            self.default_icons.clone()
        } else {
            icons
        }
    }

    pub fn svg_path(&self, name: &str) -> PathBuf {
        self.icons_dir.join(format!("{}.svg", name))
    }

    pub fn intermediate_path(&self, name: &str) -> PathBuf {
        self.icons_dir.join(format!("{}.{}", name, self.extension))
    }
}

/// Render a number the way the path strings expect it: shortest decimal
/// form, no exponent and no trailing `.0`.
pub fn format_num(value: f64) -> String {
    let s = value.to_string();
    match s.strip_suffix(".0") {
        Some(stripped) => stripped.to_string(),
        None => s,
    }
}

/// Parse a numeric literal and render it with [`format_num`].
pub fn clean_num(literal: &str) -> Result<String, Error> {
    parse_num(literal).map(format_num)
}

fn parse_num(literal: &str) -> Result<f64, Error> {
    literal
        .parse::<f64>()
        .map_err(|_| Error::InvalidNumber(literal.to_string()))
}

/// A single drawing command of the ASS path language.
#[derive(Debug, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PathCommand {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    CurveTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PathCommand::MoveTo { x, y } => write!(f, "m {} {}", format_num(x), format_num(y)),
            PathCommand::LineTo { x, y } => write!(f, "l {} {}", format_num(x), format_num(y)),
            PathCommand::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => write!(
                f,
                "b {} {} {} {} {} {}",
                format_num(x1),
                format_num(y1),
                format_num(x2),
                format_num(y2),
                format_num(x),
                format_num(y)
            ),
        }
    }
}

/// A recognized line of the intermediate canvas file.
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum Line {
    CanvasSize { width: f64, height: f64 },
    Transform,
    Draw(PathCommand),
}

/// Classifies intermediate file lines. The first matching shape wins, in
/// the order canvas size, transform, move, line, curve.
#[derive(Debug)]
pub struct LineMatcher {
    canvas_size: Regex,
    transform: Regex,
    move_to: Regex,
    line_to: Regex,
    curve_to: Regex,
}

// Any number, and a number with a mandatory decimal point. ASCII digits
// only, so every capture parses as `f64`.
const N: &str = r"(-?[0-9]+(?:\.[0-9]+)?)";
const F: &str = r"(-?[0-9]+\.[0-9]+)";

impl LineMatcher {
    pub fn new() -> Self {
        let compile = |pattern: String| Regex::new(&pattern).expect("line pattern is valid");
        Self {
            canvas_size: compile(format!(
                r"^    <canvas id='canvas' width='{n}' height='{n}'></canvas>",
                n = N
            )),
            transform: compile(r"^\tctx\.transform\(.+".to_string()),
            move_to: compile(format!(r"^\tctx\.moveTo\({f}, {f}\);", f = F)),
            line_to: compile(format!(r"^\tctx\.lineTo\({f}, {f}\);", f = F)),
            curve_to: compile(format!(
                r"^\tctx\.bezierCurveTo\({f}, {f}, {f}, {f}, {f}, {f}\);",
                f = F
            )),
        }
    }

    /// Classify one line (without its line terminator). Unrecognized lines
    /// yield `None`.
    pub fn classify(&self, line: &str) -> Result<Option<Line>, Error> {
        let line = line.trim_end();

        if let Some(caps) = self.canvas_size.captures(line) {
            return Ok(Some(Line::CanvasSize {
                width: group(&caps, 1)?,
                height: group(&caps, 2)?,
            }));
        }
        if self.transform.is_match(line) {
            return Ok(Some(Line::Transform));
        }
        if let Some(caps) = self.move_to.captures(line) {
            return Ok(Some(Line::Draw(PathCommand::MoveTo {
                x: group(&caps, 1)?,
                y: group(&caps, 2)?,
            })));
        }
        if let Some(caps) = self.line_to.captures(line) {
            return Ok(Some(Line::Draw(PathCommand::LineTo {
                x: group(&caps, 1)?,
                y: group(&caps, 2)?,
            })));
        }
        if let Some(caps) = self.curve_to.captures(line) {
            return Ok(Some(Line::Draw(PathCommand::CurveTo {
                x1: group(&caps, 1)?,
                y1: group(&caps, 2)?,
                x2: group(&caps, 3)?,
                y2: group(&caps, 4)?,
                x: group(&caps, 5)?,
                y: group(&caps, 6)?,
            })));
        }
        Ok(None)
    }
}

impl Default for LineMatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn group(caps: &Captures<'_>, index: usize) -> Result<f64, Error> {
    let literal = caps.get(index).map_or("", |m| m.as_str());
    parse_num(literal)
}

/// The path of one icon.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct IconPath {
    /// Canvas sizes, in declaration order.
    canvas: Vec<(f64, f64)>,
    commands: Vec<PathCommand>,
}

impl IconPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a canvas size.
    ///
    /// mpv's ASS alignment crops the drawing to its bounding box, so every
    /// canvas size becomes a move to the top left and bottom right corner,
    /// ahead of all drawing commands.
    pub fn add_canvas(&mut self, width: f64, height: f64) {
        self.canvas.push((width, height));
    }

    pub fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    /// All commands in output order.
    pub fn commands(&self) -> impl Iterator<Item = PathCommand> + '_ {
        self.canvas
            .iter()
            .flat_map(|&(width, height)| {
                vec![
                    PathCommand::MoveTo { x: 0.0, y: 0.0 },
                    PathCommand::MoveTo {
                        x: width,
                        y: height,
                    },
                ]
            })
            .chain(self.commands.iter().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.canvas.is_empty() && self.commands.is_empty()
    }
}

impl fmt::Display for IconPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, command) in self.commands().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", command)?;
        }
        Ok(())
    }
}

/// Extract the path from an intermediate canvas file.
///
/// `source` is only used to name the file in errors.
pub fn extract<R: BufRead>(reader: R, source: &Path) -> Result<IconPath, Error> {
    trace!("extract: {}", source.display());
    let matcher = LineMatcher::new();
    let mut path = IconPath::new();

    for line in reader.lines() {
        let line = line?;
        match matcher.classify(&line)? {
            Some(Line::CanvasSize { width, height }) => {
                trace!("extract: canvas {}x{}", width, height);
                path.add_canvas(width, height);
            }
            Some(Line::Transform) => {
                return Err(Error::UnresolvedTransform(source.to_path_buf()));
            }
            Some(Line::Draw(command)) => {
                trace!("extract: {:?}", command);
                path.push(command);
            }
            None => {}
        }
    }

    Ok(path)
}

/// One entry of the icons table.
pub fn format_entry(name: &str, path: &IconPath) -> String {
    format!(r#"    {} = "{{\\p1}}{}{{\\p0}}","#, name, path)
}

/// Convert a single icon and write its table entry to `out`.
///
/// The intermediate file is removed once the entry has been written.
pub fn process_icon<C, W>(
    config: &Config,
    converter: &C,
    name: &str,
    out: &mut W,
) -> Result<(), Error>
where
    C: Converter + ?Sized,
    W: Write + ?Sized,
{
    let svg = config.svg_path(name);
    if !svg.exists() {
        return Err(Error::MissingSource(svg));
    }

    let intermediate = config.intermediate_path(name);
    converter.convert(&svg, &intermediate)?;

    let path = {
        let file = fs::File::open(&intermediate)?;
        extract(BufReader::new(file), &intermediate)?
    };
    if path.is_empty() {
        debug!("process_icon: {} has an empty path", name);
    } else {
        debug!("process_icon: {} has {} commands", name, path.commands().count());
    }

    writeln!(out, "{}", format_entry(name, &path))?;
    out.flush()?;

    fs::remove_file(&intermediate)?;
    Ok(())
}

/// Convert all `icons` in order and write the complete Lua table to `out`.
///
/// Output is flushed line by line. On the first error the run stops and
/// the table is left unterminated.
pub fn run<C, W>(
    config: &Config,
    converter: &C,
    icons: &[String],
    out: &mut W,
) -> Result<(), Error>
where
    C: Converter + ?Sized,
    W: Write + ?Sized,
{
    debug!("run: {} icons", icons.len());
    writeln!(out, "local icons = {{")?;
    out.flush()?;

    for name in icons {
        process_icon(config, converter, name, out)?;
    }

    writeln!(out, "}}")?;
    out.flush()?;
    Ok(())
}
