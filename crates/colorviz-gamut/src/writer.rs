//! Gamut boundary file writer.
//!
//! Emits the format read by [`parse_gamut`](crate::parse_gamut): captured
//! header keywords, the vertex block with each vertex labelled by its index,
//! then the triangle block.

use crate::error::{ParseError, Result};
use crate::parser::GamutData;
use colorviz_math::Vec3;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

fn write_lab<W: Write>(w: &mut W, keyword: &str, lab: Option<Vec3>) -> io::Result<()> {
    match lab {
        Some(v) => writeln!(w, "{keyword} {} {} {}", v.x, v.y, v.z),
        None => Ok(()),
    }
}

/// Writes gamut data to `w`.
pub fn write_gamut<W: Write>(w: &mut W, data: &GamutData) -> io::Result<()> {
    let h = &data.header;
    if let Some(s) = &h.descriptor {
        writeln!(w, "DESCRIPTOR \"{s}\"")?;
    }
    if let Some(s) = &h.originator {
        writeln!(w, "ORIGINATOR \"{s}\"")?;
    }
    if let Some(s) = &h.created {
        writeln!(w, "CREATED \"{s}\"")?;
    }
    if let Some(s) = &h.color_rep {
        writeln!(w, "COLOR_REP {s}")?;
    }
    write_lab(w, "GAMUT_CENTER", h.gamut_center)?;
    write_lab(w, "CSPACE_WHITE", h.cspace_white)?;
    write_lab(w, "GAMUT_WHITE", h.gamut_white)?;
    write_lab(w, "CSPACE_BLACK", h.cspace_black)?;
    write_lab(w, "GAMUT_BLACK", h.gamut_black)?;
    for (keyword, lab) in &h.cusps {
        write_lab(w, keyword, Some(*lab))?;
    }

    writeln!(w, "BEGIN_DATA")?;
    for (i, v) in data.vertices.iter().enumerate() {
        writeln!(w, "{i} {} {} {}", v.x, v.y, v.z)?;
    }
    writeln!(w, "END_DATA")?;
    writeln!(w, "BEGIN_DATA")?;
    for [a, b, c] in &data.triangles {
        writeln!(w, "{a} {b} {c}")?;
    }
    writeln!(w, "END_DATA")?;
    Ok(())
}

/// Writes gamut data to a file.
pub fn save_gamut(path: impl AsRef<Path>, data: &GamutData) -> Result<()> {
    let path = path.as_ref();
    let io_err = |source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut w = BufWriter::new(File::create(path).map_err(io_err)?);
    write_gamut(&mut w, data).map_err(io_err)?;
    w.flush().map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParseMode, parse_reader};

    #[test]
    fn test_written_file_parses_back() {
        let mut data = GamutData::default();
        data.header.descriptor = Some("two words".into());
        data.header.gamut_white = Some(Vec3::new(100.0, 0.0, 0.0));
        data.header.cusps.push(("CUSP_RED".into(), Vec3::new(54.0, 80.5, 67.25)));
        data.vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(50.5, -20.0, 10.125),
            Vec3::new(100.0, 0.0, 0.0),
        ];
        data.triangles = vec![[0, 1, 2], [2, 1, 0]];

        let mut buf = Vec::new();
        write_gamut(&mut buf, &data).unwrap();
        let back = parse_reader(buf.as_slice(), ParseMode::Strict).unwrap();
        assert_eq!(back, data);
    }
}
