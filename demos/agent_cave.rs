use std::io;

use grid_mapgen::{export, Agent};

fn main() -> io::Result<()> {
    env_logger::init();

    let mut map = Agent::new(50, 50, 80, 30, 0.05, 0.05);
    map.create_map();
    export::write_text(&map, &mut io::stdout().lock(), |tile| tile.glyph())
}
