//! Gnuplot `splot` dumps of sample grids, for eyeballing surfaces.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::SampleGrid;

/// Write `grid` as gnuplot data blocks: one `x y z` line per sample, a
/// blank line after each row.
pub fn write_gnuplot_grid<W: Write>(writer: &mut W, grid: &SampleGrid) -> io::Result<()> {
    for row in &grid.points {
        for p in row {
            writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// File name used for the dump of face `index`: `{label}_{index}.dat`.
pub fn gnuplot_file_name(label: &str, index: usize) -> String {
    format!("{label}_{index}.dat")
}

/// Write `grid` to `dir/{label}_{index}.dat` and return the path.
pub fn save_gnuplot_grid(
    dir: &Path,
    label: &str,
    index: usize,
    grid: &SampleGrid,
) -> io::Result<PathBuf> {
    let path = dir.join(gnuplot_file_name(label, index));
    let mut w = BufWriter::new(File::create(&path)?);
    write_gnuplot_grid(&mut w, grid)?;
    w.flush()?;
    Ok(path)
}
