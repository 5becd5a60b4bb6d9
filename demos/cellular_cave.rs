use std::io;

use grid_mapgen::{export, CellularAutomata};

fn main() -> io::Result<()> {
    env_logger::init();

    let mut map = CellularAutomata::new(50, 50, 5, 0.45, 5);
    map.create_map();
    export::write_text(&map, &mut io::stdout().lock(), |tile| tile.glyph())
}
