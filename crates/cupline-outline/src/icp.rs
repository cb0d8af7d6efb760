//! The ICP simple wall format.
//!
//! ```text
//! 8                          identifier
//! 1                          outer cup label
//! G01                        inner cup label
//! 2                          inner wall count
//! -1.010000e+02  0.000000e+00
//! -1.000000e+02  1.250000e+01
//! 2                          outer wall count
//! ...
//! ```
//!
//! Each point line is two `%13.6e` fields (C exponent style, at least two
//! exponent digits) separated by one space: axial position, then radius.

use std::io::{BufRead, Write};
use std::path::Path;

use cupline_math::Point2D;
use tracing::{debug, info};

use crate::atomic::write_atomic;
use crate::{OutlineError, Result};

/// Field width of each ICP number.
pub const ICP_FIELD_WIDTH: usize = 13;

/// Digits after the decimal point in each ICP number.
pub const ICP_PRECISION: usize = 6;

/// The three header lines of an ICP file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IcpHeader {
    /// Identifier token.
    pub id: String,
    /// Outer cup label.
    pub outer_cup: String,
    /// Inner cup label.
    pub inner_cup: String,
}

/// Contents of an ICP file.
///
/// Walls hold `(x = axial, y = radius)` exactly as stored in the file,
/// after the reference offset has been applied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IcpDocument {
    /// Header lines.
    pub header: IcpHeader,
    /// Inner wall.
    pub inner: Vec<Point2D>,
    /// Outer wall.
    pub outer: Vec<Point2D>,
}

/// What [`write_icp_file`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was written.
    Written,
    /// A required input was missing; nothing was touched.
    Skipped,
}

impl IcpDocument {
    /// Assemble a document from built walls.
    ///
    /// Every wall point `(axial, radius)` is stored as
    /// `(offset - axial, radius)`. Returns `None` when the offset or either
    /// wall is missing, or when a wall is empty.
    pub fn from_parts(
        header: IcpHeader,
        offset: Option<f32>,
        inner: Option<&[Point2D]>,
        outer: Option<&[Point2D]>,
    ) -> Option<Self> {
        let (offset, inner, outer) = match (offset, inner, outer) {
            (Some(o), Some(i), Some(w)) if !i.is_empty() && !w.is_empty() => (o, i, w),
            _ => {
                debug!("ICP input incomplete");
                return None;
            }
        };
        let shift = |pts: &[Point2D]| -> Vec<Point2D> {
            pts.iter()
                .map(|p| Point2D::new(offset - p.x, p.y))
                .collect()
        };
        Some(Self {
            header,
            inner: shift(inner),
            outer: shift(outer),
        })
    }
}

/// Format `value` like C's `%13.6e`: `-1.010000e+02`, right-aligned.
pub fn format_icp_number(value: f32) -> String {
    let raw = format!("{:.*e}", ICP_PRECISION, value);
    let text = match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        // NaN and infinities carry no exponent
        None => raw.to_lowercase(),
    };
    format!("{text:>width$}", width = ICP_FIELD_WIDTH)
}

/// Write `doc` in ICP layout.
pub fn write_icp<W: Write + ?Sized>(w: &mut W, doc: &IcpDocument) -> std::io::Result<()> {
    writeln!(w, "{}", doc.header.id)?;
    writeln!(w, "{}", doc.header.outer_cup)?;
    writeln!(w, "{}", doc.header.inner_cup)?;
    for wall in [&doc.inner, &doc.outer] {
        writeln!(w, "{}", wall.len())?;
        for p in wall {
            writeln!(w, "{} {}", format_icp_number(p.x), format_icp_number(p.y))?;
        }
    }
    Ok(())
}

/// Write `doc` to `path` atomically, or do nothing when `doc` is `None`.
pub fn write_icp_file(path: &Path, doc: Option<&IcpDocument>) -> Result<WriteOutcome> {
    let Some(doc) = doc else {
        info!(path = %path.display(), "ICP input incomplete, skipping");
        return Ok(WriteOutcome::Skipped);
    };
    write_atomic(path, |w| write_icp(w, doc))?;
    info!(
        path = %path.display(),
        inner = doc.inner.len(),
        outer = doc.outer.len(),
        "wrote ICP"
    );
    Ok(WriteOutcome::Written)
}

// =============================================================================
// Reading
// =============================================================================

struct Lines<R> {
    inner: std::io::Lines<R>,
    line: usize,
}

impl<R: BufRead> Lines<R> {
    fn next_line(&mut self, what: &str) -> Result<String> {
        self.line += 1;
        match self.inner.next() {
            Some(line) => Ok(line?.trim_end().to_string()),
            None => Err(OutlineError::parse(
                self.line,
                format!("unexpected end of file, expected {what}"),
            )),
        }
    }

    fn count(&mut self, what: &str) -> Result<usize> {
        let text = self.next_line(what)?;
        text.trim()
            .parse()
            .map_err(|_| OutlineError::parse(self.line, format!("bad {what} '{text}'")))
    }

    fn wall(&mut self, name: &str) -> Result<Vec<Point2D>> {
        let n = self.count(&format!("{name} wall count"))?;
        let mut pts = Vec::with_capacity(n);
        for _ in 0..n {
            let text = self.next_line(&format!("{name} wall point"))?;
            let mut fields = text.split_whitespace().map(str::parse::<f32>);
            match (fields.next(), fields.next()) {
                (Some(Ok(axial)), Some(Ok(radius))) => pts.push(Point2D::new(axial, radius)),
                _ => {
                    return Err(OutlineError::parse(
                        self.line,
                        format!("expected 'axial radius', got '{text}'"),
                    ))
                }
            }
        }
        Ok(pts)
    }
}

/// Parse an ICP file.
pub fn read_icp<R: BufRead>(reader: R) -> Result<IcpDocument> {
    let mut lines = Lines {
        inner: reader.lines(),
        line: 0,
    };
    let header = IcpHeader {
        id: lines.next_line("identifier")?,
        outer_cup: lines.next_line("outer cup label")?,
        inner_cup: lines.next_line("inner cup label")?,
    };
    let inner = lines.wall("inner")?;
    let outer = lines.wall("outer")?;
    Ok(IcpDocument {
        header,
        inner,
        outer,
    })
}

/// Parse the ICP file at `path`.
pub fn read_icp_file(path: &Path) -> Result<IcpDocument> {
    let file = std::fs::File::open(path)?;
    read_icp(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> IcpHeader {
        IcpHeader {
            id: "8".into(),
            outer_cup: "1".into(),
            inner_cup: "G01".into(),
        }
    }

    #[test]
    fn test_number_format() {
        assert_eq!(format_icp_number(87.0), " 8.700000e+01");
        assert_eq!(format_icp_number(-101.0), "-1.010000e+02");
        assert_eq!(format_icp_number(0.0), " 0.000000e+00");
        assert_eq!(format_icp_number(0.00125), " 1.250000e-03");
        assert_eq!(format_icp_number(1.0e20), " 1.000000e+20");
        assert_eq!(format_icp_number(f32::NAN), "          nan");
        for v in [1.0, -2.5, 87.95, 1.0e-30] {
            assert_eq!(format_icp_number(v).len(), ICP_FIELD_WIDTH);
        }
    }

    #[test]
    fn test_from_parts_applies_offset() {
        let inner = [Point2D::new(0.0, 0.0), Point2D::new(10.0, 20.0)];
        let outer = [Point2D::new(1.0, 2.0)];
        let doc = IcpDocument::from_parts(header(), Some(-101.0), Some(&inner), Some(&outer))
            .unwrap();
        assert_eq!(doc.inner, vec![Point2D::new(-101.0, 0.0), Point2D::new(-111.0, 20.0)]);
        assert_eq!(doc.outer, vec![Point2D::new(-102.0, 2.0)]);
    }

    #[test]
    fn test_from_parts_missing_input() {
        let wall = [Point2D::new(1.0, 2.0)];
        assert!(IcpDocument::from_parts(header(), None, Some(&wall), Some(&wall)).is_none());
        assert!(IcpDocument::from_parts(header(), Some(0.0), None, Some(&wall)).is_none());
        assert!(IcpDocument::from_parts(header(), Some(0.0), Some(&wall), None).is_none());
        assert!(IcpDocument::from_parts(header(), Some(0.0), Some(&[]), Some(&wall)).is_none());
    }

    #[test]
    fn test_layout() {
        let doc = IcpDocument {
            header: header(),
            inner: vec![Point2D::new(-101.0, 0.0)],
            outer: vec![Point2D::new(-100.0, 87.0), Point2D::new(0.0, 87.95)],
        };
        let mut buf = Vec::new();
        write_icp(&mut buf, &doc).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3 + 1 + 1 + 1 + 2);
        assert_eq!(&lines[..4], &["8", "1", "G01", "1"]);
        assert_eq!(lines[4], "-1.010000e+02  0.000000e+00");
        assert_eq!(lines[5], "2");
        assert_eq!(lines[6], "-1.000000e+02  8.700000e+01");
    }

    #[test]
    fn test_round_trip_six_digits() {
        let inner: Vec<Point2D> = (0..25)
            .map(|k| Point2D::new(k as f32 * 1.37, (k as f32 * 0.31).sin() * 40.0 + 0.5))
            .collect();
        let outer: Vec<Point2D> = (0..30)
            .map(|k| Point2D::new(k as f32 * 2.01, 45.0 + k as f32 / 7.0))
            .collect();
        let doc = IcpDocument::from_parts(header(), Some(-101.0), Some(&inner), Some(&outer))
            .unwrap();

        let mut buf = Vec::new();
        write_icp(&mut buf, &doc).unwrap();
        let back = read_icp(buf.as_slice()).unwrap();

        assert_eq!(back.header, doc.header);
        assert_eq!(back.inner.len(), inner.len());
        assert_eq!(back.outer.len(), outer.len());
        for (a, b) in back.inner.iter().chain(&back.outer).zip(doc.inner.iter().chain(&doc.outer)) {
            for (x, y) in [(a.x, b.x), (a.y, b.y)] {
                let scale = y.abs().max(f32::MIN_POSITIVE);
                assert!((x - y).abs() / scale <= 1e-6, "{x} vs {y}");
            }
        }
    }

    /// Write `inner`/`outer` with `offset`, read them back, and check that
    /// `offset - x` recovers each source axial value. Written values carry
    /// seven significant digits, so the bound scales with the larger of
    /// the offset and the axial value.
    fn assert_axial_recovered(offset: f32, inner: &[Point2D], outer: &[Point2D]) {
        let doc = IcpDocument::from_parts(header(), Some(offset), Some(inner), Some(outer))
            .unwrap();
        let mut buf = Vec::new();
        write_icp(&mut buf, &doc).unwrap();
        let back = read_icp(buf.as_slice()).unwrap();

        assert_eq!(back.inner.len(), inner.len());
        assert_eq!(back.outer.len(), outer.len());
        let read = back.inner.iter().chain(&back.outer);
        for (r, src) in read.zip(inner.iter().chain(outer)) {
            let axial = offset - r.x;
            let scale = offset.abs().max(src.x.abs()).max(1.0);
            assert!(
                (axial - src.x).abs() <= 2e-6 * scale,
                "axial {} recovered as {axial} (offset {offset})",
                src.x
            );
            assert!((r.y - src.y).abs() <= 1e-6 * src.y.abs().max(1.0));
        }
    }

    #[test]
    fn test_offset_recovers_wall_axial() {
        let inner: Vec<Point2D> = (0..25)
            .map(|k| Point2D::new(k as f32 * 1.37, (k as f32 * 0.31).sin() * 40.0 + 0.5))
            .collect();
        let outer: Vec<Point2D> = (0..30)
            .map(|k| Point2D::new(k as f32 * 2.01, 45.0 + k as f32 / 7.0))
            .collect();
        assert_axial_recovered(-101.0, &inner, &outer);
    }

    #[test]
    fn test_positive_offset_with_negative_axial() {
        let inner: Vec<Point2D> = (0..20)
            .map(|k| Point2D::new(-0.25 - k as f32 * 1.7, 10.0 + k as f32))
            .collect();
        let outer: Vec<Point2D> = (0..20)
            .map(|k| Point2D::new(-3.125 - k as f32 * 0.9, 42.0 + k as f32 * 0.5))
            .collect();
        assert_axial_recovered(37.5, &inner, &outer);

        // axial -0.25 below an offset of 37.5 lands at +37.75
        let doc = IcpDocument::from_parts(header(), Some(37.5), Some(&inner), Some(&outer))
            .unwrap();
        assert_eq!(doc.inner[0].x, 37.75);
        let mut buf = Vec::new();
        write_icp(&mut buf, &doc).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().nth(4), Some(" 3.775000e+01  1.000000e+01"));
    }

    #[test]
    fn test_read_reports_line_numbers() {
        let text = "8\n1\nG01\n2\n 1.0e+00 2.0e+00\nnot a point\n";
        match read_icp(text.as_bytes()) {
            Err(OutlineError::Parse { line, .. }) => assert_eq!(line, 6),
            other => panic!("expected parse error, got {other:?}"),
        }

        let truncated = "8\n1\nG01\n1\n 1.0e+00 2.0e+00\n";
        match read_icp(truncated.as_bytes()) {
            Err(OutlineError::Parse { line, message }) => {
                assert_eq!(line, 6);
                assert!(message.contains("outer wall count"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_skipped_write_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cup.icp");
        assert_eq!(write_icp_file(&path, None).unwrap(), WriteOutcome::Skipped);
        assert!(!path.exists());

        let doc = IcpDocument {
            header: header(),
            inner: vec![Point2D::new(1.0, 2.0)],
            outer: vec![Point2D::new(3.0, 4.0)],
        };
        assert_eq!(write_icp_file(&path, Some(&doc)).unwrap(), WriteOutcome::Written);
        assert_eq!(read_icp_file(&path).unwrap(), doc);
    }
}
