//! The OCP document format: both walls plus a fiducial polyline.
//!
//! An OCP file is a sequence of blocks. A point block is a count line
//! followed by that many `x y` or `x y z` lines. Numbers are the shortest
//! text that round-trips the f32 ([`format_ocp_number`]): positional for
//! magnitudes in `[1e-4, 1e16)`, otherwise an exponent with a sign and at
//! least two digits (`1e-07`, `2.5e+16`). The 3D block is followed by a connectivity block, a count line
//! `n - 1` and the segment pairs `0 1`, `1 2`, ... .
//!
//! Blocks are written in the order inner wall, outer wall, fiducial. Empty
//! 2D lists and single-point 3D lists are not written at all, so a reader
//! assigns 2D blocks to the inner and then outer wall in the order found.

use std::io::{BufRead, Write};
use std::path::Path;

use cupline_math::{Point2D, Point3D};
use tracing::{debug, info};

use crate::atomic::write_atomic;
use crate::{OutlineError, Result};

/// Contents of an OCP file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OcpDocument {
    /// Inner wall, `(axial, radius)`.
    pub inner: Vec<Point2D>,
    /// Outer wall, `(axial, radius)`.
    pub outer: Vec<Point2D>,
    /// Fiducial polyline.
    pub fiducial: Vec<Point3D>,
}

/// Shortest round-trip text for `value`, with the exponent (when there is
/// one) written as a sign and at least two digits.
pub fn format_ocp_number(value: f32) -> String {
    if value.is_nan() {
        return "nan".into();
    }
    let raw = format!("{value:?}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => raw,
    }
}

/// Write a 2D point block. An empty list writes nothing.
pub fn write_points2d<W: Write + ?Sized>(w: &mut W, points: &[Point2D]) -> std::io::Result<()> {
    if points.is_empty() {
        return Ok(());
    }
    writeln!(w, "{}", points.len())?;
    for p in points {
        writeln!(w, "{} {}", format_ocp_number(p.x), format_ocp_number(p.y))?;
    }
    Ok(())
}

/// Write a 3D point block and its connectivity.
///
/// A single point writes nothing. An empty list writes a bare `0` count.
pub fn write_points3d<W: Write + ?Sized>(w: &mut W, points: &[Point3D]) -> std::io::Result<()> {
    if points.len() == 1 {
        debug!("dropping single-point 3D list");
        return Ok(());
    }
    writeln!(w, "{}", points.len())?;
    for p in points {
        writeln!(
            w,
            "{} {} {}",
            format_ocp_number(p.x),
            format_ocp_number(p.y),
            format_ocp_number(p.z)
        )?;
    }
    write_connectivity(w, points.len())
}

/// Write the segment block joining `n` consecutive points. Nothing for
/// `n <= 1`.
pub fn write_connectivity<W: Write + ?Sized>(w: &mut W, n: usize) -> std::io::Result<()> {
    if n <= 1 {
        return Ok(());
    }
    writeln!(w, "{}", n - 1)?;
    for k in 0..n - 1 {
        writeln!(w, "{} {}", k, k + 1)?;
    }
    Ok(())
}

/// Write `doc` in OCP layout.
pub fn write_ocp<W: Write + ?Sized>(w: &mut W, doc: &OcpDocument) -> std::io::Result<()> {
    write_points2d(w, &doc.inner)?;
    write_points2d(w, &doc.outer)?;
    write_points3d(w, &doc.fiducial)
}

/// Write `doc` to `path` atomically.
pub fn write_ocp_file(path: &Path, doc: &OcpDocument) -> Result<()> {
    write_atomic(path, |w| write_ocp(w, doc))?;
    info!(
        path = %path.display(),
        inner = doc.inner.len(),
        outer = doc.outer.len(),
        fiducial = doc.fiducial.len(),
        "wrote OCP"
    );
    Ok(())
}

// =============================================================================
// Reading
// =============================================================================

enum Block {
    Flat(Vec<Point2D>),
    Space(Vec<Point3D>),
    Empty,
}

struct BlockReader<'a> {
    lines: &'a [(usize, String)],
    pos: usize,
}

impl<'a> BlockReader<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }

    fn take(&mut self) -> Result<&'a (usize, String)> {
        let last_line = self.lines.last().map_or(0, |(n, _)| *n);
        let line = self
            .lines
            .get(self.pos)
            .ok_or_else(|| OutlineError::parse(last_line + 1, "unexpected end of file"))?;
        self.pos += 1;
        Ok(line)
    }

    fn count(&mut self) -> Result<usize> {
        let (n, text) = self.take()?;
        text.parse()
            .map_err(|_| OutlineError::parse(*n, format!("expected a count, got '{text}'")))
    }

    fn numbers<T: std::str::FromStr>(line: usize, text: &str) -> Result<Vec<T>> {
        text.split_whitespace()
            .map(|f| {
                f.parse()
                    .map_err(|_| OutlineError::parse(line, format!("bad number '{f}'")))
            })
            .collect()
    }

    fn points(&mut self) -> Result<Block> {
        let n = self.count()?;
        if n == 0 {
            return Ok(Block::Empty);
        }
        let mut rows = Vec::with_capacity(n);
        let mut dim = 0;
        for _ in 0..n {
            let (line, text) = self.take()?;
            let row: Vec<f32> = Self::numbers(*line, text)?;
            if dim == 0 {
                dim = row.len();
            }
            if row.len() != dim || !(dim == 2 || dim == 3) {
                return Err(OutlineError::parse(
                    *line,
                    format!("expected {} coordinates, got {}", dim.max(2), row.len()),
                ));
            }
            rows.push(row);
        }
        Ok(if dim == 2 {
            Block::Flat(rows.iter().map(|r| Point2D::new(r[0], r[1])).collect())
        } else {
            Block::Space(rows.iter().map(|r| Point3D::new(r[0], r[1], r[2])).collect())
        })
    }

    fn connectivity(&mut self, points: usize) -> Result<()> {
        let n = self.count()?;
        if n + 1 != points {
            let line = self.lines[self.pos - 1].0;
            return Err(OutlineError::parse(
                line,
                format!("{n} segments for {points} points"),
            ));
        }
        for k in 0..n {
            let (line, text) = self.take()?;
            let pair: Vec<usize> = Self::numbers(*line, text)?;
            if pair != [k, k + 1] {
                return Err(OutlineError::parse(
                    *line,
                    format!("expected segment '{} {}', got '{text}'", k, k + 1),
                ));
            }
        }
        Ok(())
    }
}

/// Parse an OCP file.
///
/// The dimension of each point block is taken from its first point line.
pub fn read_ocp<R: BufRead>(reader: R) -> Result<OcpDocument> {
    let mut lines = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if !text.is_empty() {
            lines.push((i + 1, text.to_string()));
        }
    }

    let mut blocks = BlockReader {
        lines: &lines,
        pos: 0,
    };
    let mut doc = OcpDocument::default();
    let mut walls = 0;
    while !blocks.at_end() {
        let start = lines[blocks.pos].0;
        match blocks.points()? {
            Block::Flat(pts) => {
                match walls {
                    0 => doc.inner = pts,
                    1 => doc.outer = pts,
                    _ => return Err(OutlineError::parse(start, "more than two 2D blocks")),
                }
                walls += 1;
            }
            Block::Space(pts) => {
                if !doc.fiducial.is_empty() {
                    return Err(OutlineError::parse(start, "more than one 3D block"));
                }
                blocks.connectivity(pts.len())?;
                doc.fiducial = pts;
            }
            Block::Empty => {}
        }
    }
    Ok(doc)
}

/// Parse the OCP file at `path`.
pub fn read_ocp_file(path: &Path) -> Result<OcpDocument> {
    let file = std::fs::File::open(path)?;
    read_ocp(std::io::BufReader::new(file))
}
