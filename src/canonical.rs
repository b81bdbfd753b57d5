use fxhash::FxHashSet;

use crate::grid::Grid;
use crate::tile::{Cell, Identity};

/// Rename every monster and obstacle group by the order it first appears
/// (scanning rows top to bottom, left to right).
///
/// Monsters and obstacles are counted separately, both starting at zero. Each
/// connected fragment gets its own label, even if two fragments started out
/// with the same letter. Stools, tools and arrows are left as they are.
pub fn canonicalize(grid: &Grid) -> Grid {
    let mut canonical = grid.clone();
    let mut labeled = FxHashSet::default();

    let mut monsters = 0;
    let mut obstacles = 0;

    for (point, cell) in grid.cells() {
        if labeled.contains(&point) {
            continue;
        }

        let label = match cell {
            Cell::Monster(_) => {
                monsters += 1;
                Cell::Monster(Identity(monsters - 1))
            }
            Cell::Obstacle(_) => {
                obstacles += 1;
                Cell::Obstacle(Identity(obstacles - 1))
            }
            _ => continue,
        };

        for member in grid.fragment(point) {
            labeled.insert(member);
            canonical.set(member, label);
        }
    }

    canonical
}
