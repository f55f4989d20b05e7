//! Gamut boundary file parser.
//!
//! The format is line oriented and whitespace delimited:
//!
//! ```text
//! DESCRIPTOR "sRGB gamut"          header keywords, optional
//! GAMUT_WHITE 100 0 0
//! BEGIN_DATA
//! <label> <L> <a> <b>              one vertex per line
//! END_DATA
//! BEGIN_DATA
//! <i0> <i1> <i2>                   one triangle per line, 0-based
//! END_DATA
//! ```
//!
//! Parsing is a four-state machine driven by [`Section::next`]:
//!
//! ```text
//! Header --BEGIN_DATA--> Vertices --END_DATA--> TriangleHeader --BEGIN_DATA--> Triangles
//! ```
//!
//! Blank lines are skipped everywhere and unknown lines are ignored. In
//! [`ParseMode::Lenient`] (default) a vertex token that is not a number
//! becomes NaN and a triangle row that is not three indices is skipped;
//! [`ParseMode::Strict`] rejects both. Triangle indices are always checked
//! against the vertex count.

use crate::error::{ParseError, Result};
use colorviz_math::Vec3;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace};

/// How forgiving the parser is with malformed data rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Non-numeric vertex tokens become NaN, rows with the wrong token
    /// count are skipped.
    #[default]
    Lenient,
    /// Non-numeric vertex tokens and wrong token counts are errors.
    Strict,
}

/// Header keywords captured from the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamutHeader {
    /// `DESCRIPTOR` text.
    pub descriptor: Option<String>,
    /// `ORIGINATOR` text.
    pub originator: Option<String>,
    /// `CREATED` text.
    pub created: Option<String>,
    /// `COLOR_REP` token, e.g. `LAB`.
    pub color_rep: Option<String>,
    /// `GAMUT_CENTER` Lab point.
    pub gamut_center: Option<Vec3>,
    /// `CSPACE_WHITE` Lab point.
    pub cspace_white: Option<Vec3>,
    /// `GAMUT_WHITE` Lab point.
    pub gamut_white: Option<Vec3>,
    /// `CSPACE_BLACK` Lab point.
    pub cspace_black: Option<Vec3>,
    /// `GAMUT_BLACK` Lab point.
    pub gamut_black: Option<Vec3>,
    /// `CUSP_*` points in file order, keyed by the full keyword.
    pub cusps: Vec<(String, Vec3)>,
}

impl GamutHeader {
    /// True when no keyword was captured.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Raw content of a gamut file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamutData {
    /// Header keywords.
    pub header: GamutHeader,
    /// Lab vertices.
    pub vertices: Vec<Vec3>,
    /// Vertex index triples.
    pub triangles: Vec<[u32; 3]>,
}

/// Parser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    /// Before the first `BEGIN_DATA`.
    #[default]
    Header,
    /// Inside the vertex block.
    Vertices,
    /// Between the vertex and triangle blocks.
    TriangleHeader,
    /// Inside the triangle block.
    Triangles,
}

/// Classified input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace only.
    Blank,
    /// First token is `BEGIN_DATA`.
    BeginData,
    /// First token is `END_DATA`.
    EndData,
    /// Anything else.
    Tokens,
}

impl LineKind {
    fn classify(tokens: &[&str]) -> Self {
        match tokens.first() {
            None => Self::Blank,
            Some(&"BEGIN_DATA") => Self::BeginData,
            Some(&"END_DATA") => Self::EndData,
            Some(_) => Self::Tokens,
        }
    }
}

impl Section {
    /// Transition table. Returns the state after a line of `kind`.
    pub const fn next(self, kind: LineKind) -> Self {
        match (self, kind) {
            (Self::Header, LineKind::BeginData) => Self::Vertices,
            (Self::Vertices, LineKind::EndData) => Self::TriangleHeader,
            (Self::TriangleHeader, LineKind::BeginData) => Self::Triangles,
            (state, _) => state,
        }
    }
}

/// Line-by-line gamut parser.
///
/// # Example
///
/// ```rust
/// use colorviz_gamut::{GamutParser, ParseMode};
///
/// let mut parser = GamutParser::new(ParseMode::Lenient);
/// for line in ["BEGIN_DATA", "0 50 0 0", "1 60 10 0", "2 70 0 10", "END_DATA",
///              "BEGIN_DATA", "0 1 2", "END_DATA"] {
///     parser.feed_line(line).unwrap();
/// }
/// let data = parser.finish();
/// assert_eq!(data.vertices.len(), 3);
/// assert_eq!(data.triangles, vec![[0, 1, 2]]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GamutParser {
    mode: ParseMode,
    section: Section,
    line: usize,
    data: GamutData,
}

impl GamutParser {
    /// Creates a parser in the header state.
    pub fn new(mode: ParseMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Current state.
    pub fn section(&self) -> Section {
        self.section
    }

    /// Consumes one line (without its terminator).
    pub fn feed_line(&mut self, text: &str) -> Result<()> {
        self.line += 1;
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let kind = LineKind::classify(&tokens);

        match (self.section, kind) {
            (Section::Header, LineKind::Tokens) => self.header_line(&tokens),
            (Section::Vertices, LineKind::Tokens) => self.vertex_line(&tokens)?,
            (Section::Triangles, LineKind::Tokens) => self.triangle_line(&tokens)?,
            _ => {}
        }

        let next = self.section.next(kind);
        if next != self.section {
            trace!(line = self.line, from = ?self.section, to = ?next, "section");
            self.section = next;
        }
        Ok(())
    }

    /// Returns the parsed data.
    pub fn finish(self) -> GamutData {
        self.data
    }

    fn header_line(&mut self, tokens: &[&str]) {
        let keyword = tokens[0];
        let rest = || unquote(&tokens[1..].join(" "));
        let header = &mut self.data.header;
        match keyword {
            "DESCRIPTOR" => header.descriptor = Some(rest()),
            "ORIGINATOR" => header.originator = Some(rest()),
            "CREATED" => header.created = Some(rest()),
            "COLOR_REP" => header.color_rep = tokens.get(1).map(|s| unquote(s)),
            "GAMUT_CENTER" => header.gamut_center = lab_triple(tokens),
            "CSPACE_WHITE" => header.cspace_white = lab_triple(tokens),
            "GAMUT_WHITE" => header.gamut_white = lab_triple(tokens),
            "CSPACE_BLACK" => header.cspace_black = lab_triple(tokens),
            "GAMUT_BLACK" => header.gamut_black = lab_triple(tokens),
            k if k.starts_with("CUSP_") => {
                if let Some(lab) = lab_triple(tokens) {
                    header.cusps.push((k.to_string(), lab));
                }
            }
            _ => {}
        }
    }

    fn vertex_line(&mut self, tokens: &[&str]) -> Result<()> {
        if tokens.len() != 4 {
            return match self.mode {
                ParseMode::Lenient => Ok(()),
                ParseMode::Strict => Err(ParseError::MalformedLine {
                    line: self.line,
                    expected: 4,
                    found: tokens.len(),
                }),
            };
        }
        let mut lab = [0.0f32; 3];
        for (dst, token) in lab.iter_mut().zip(&tokens[1..]) {
            *dst = match token.parse::<f32>() {
                Ok(v) => v,
                Err(_) if self.mode == ParseMode::Lenient => f32::NAN,
                Err(_) => {
                    return Err(ParseError::InvalidNumber {
                        line: self.line,
                        token: token.to_string(),
                    });
                }
            };
        }
        self.data.vertices.push(Vec3::from_array(lab));
        Ok(())
    }

    fn triangle_line(&mut self, tokens: &[&str]) -> Result<()> {
        if tokens.len() != 3 {
            return match self.mode {
                ParseMode::Lenient => Ok(()),
                ParseMode::Strict => Err(ParseError::MalformedLine {
                    line: self.line,
                    expected: 3,
                    found: tokens.len(),
                }),
            };
        }
        let vertex_count = self.data.vertices.len();
        let mut tri = [0u32; 3];
        for (dst, token) in tri.iter_mut().zip(tokens) {
            let index = match token.parse::<u32>() {
                Ok(index) => index,
                Err(_) if self.mode == ParseMode::Lenient => {
                    trace!(line = self.line, token = %token, "skipping non-index triangle row");
                    return Ok(());
                }
                Err(_) => {
                    return Err(ParseError::InvalidIndex {
                        line: self.line,
                        token: token.to_string(),
                    });
                }
            };
            if index as usize >= vertex_count {
                return Err(ParseError::IndexOutOfRange {
                    line: self.line,
                    index,
                    vertex_count,
                });
            }
            *dst = index;
        }
        self.data.triangles.push(tri);
        Ok(())
    }
}

fn unquote(s: &str) -> String {
    s.trim_matches('"').to_string()
}

fn lab_triple(tokens: &[&str]) -> Option<Vec3> {
    if tokens.len() < 4 {
        return None;
    }
    let mut lab = [0.0f32; 3];
    for (dst, token) in lab.iter_mut().zip(&tokens[1..4]) {
        *dst = token.parse().ok()?;
    }
    Some(Vec3::from_array(lab))
}

/// Parses gamut data from any buffered reader.
pub fn parse_reader<R: BufRead>(reader: R, mode: ParseMode) -> Result<GamutData> {
    let mut parser = GamutParser::new(mode);
    for line in reader.lines() {
        let line = line.map_err(|source| ParseError::Read {
            line: parser.line + 1,
            source,
        })?;
        parser.feed_line(&line)?;
    }
    Ok(parser.finish())
}

/// Parses a gamut file.
///
/// A file without `BEGIN_DATA` yields empty vertex and triangle lists.
pub fn parse_gamut(path: impl AsRef<Path>, mode: ParseMode) -> Result<GamutData> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let data = parse_reader(BufReader::new(file), mode)?;
    debug!(
        path = %path.display(),
        vertices = data.vertices.len(),
        triangles = data.triangles.len(),
        "parsed gamut"
    );
    Ok(data)
}
