use std::error::Error;
use std::io;

use grid_mapgen::{export, Bsp};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut map = Bsp::default();
    map.create_map()?;
    export::write_text(&map, &mut io::stdout().lock(), |tile| tile.glyph())?;
    Ok(())
}
