//! Text rendering for any map source.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::grid::MapSource;
use crate::tile::TileType;

/// Write the map as text, row-major, one line per row and one glyph per
/// cell. Works over any generator through [`MapSource`].
pub fn write_text<S, W, F>(source: &S, out: &mut W, mut glyph: F) -> io::Result<()>
where
    S: MapSource,
    W: Write,
    F: FnMut(TileType) -> char,
{
    for y in 0..source.height() {
        let mut line = String::with_capacity(source.width() as usize + 1);
        for x in 0..source.width() {
            line.push(glyph(source.tile(x, y)));
        }
        line.push('\n');
        out.write_all(line.as_bytes())?;
    }
    Ok(())
}

/// Render the map into a text file, creating or truncating it.
pub fn to_text_file<S, F>(source: &S, path: impl AsRef<Path>, glyph: F) -> io::Result<()>
where
    S: MapSource,
    F: FnMut(TileType) -> char,
{
    let mut out = BufWriter::new(File::create(path)?);
    write_text(source, &mut out, glyph)?;
    out.flush()
}
