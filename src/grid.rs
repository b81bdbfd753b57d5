use std::fmt::Display;

use fxhash::FxHashSet;
use im::Vector;

use crate::direction::Direction;
use crate::point::Point;
use crate::tile::Cell;

/// A fixed size map of tiles, stored row-major.
///
/// Cells live in an `im::Vector`, so cloning a grid is cheap and a state's
/// children only copy the chunks they actually change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vector<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize, cells: Vec<Cell>) -> Grid {
        debug_assert_eq!(width * height, cells.len());

        Grid {
            width,
            height,
            cells: Vector::from(cells),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width
            && (point.y as usize) < self.height
    }

    fn index(&self, point: Point) -> Option<usize> {
        if self.in_bounds(point) {
            Some(point.y as usize * self.width + point.x as usize)
        } else {
            None
        }
    }

    // Anything off the map is None rather than a wall so callers decide
    pub fn get(&self, point: Point) -> Option<Cell> {
        self.index(point).map(|index| self.cells[index])
    }

    pub fn set(&mut self, point: Point, cell: Cell) {
        if let Some(index) = self.index(point) {
            if self.cells[index] != cell {
                self.cells.set(index, cell);
            }
        }
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| Point {
                x: x as isize,
                y: y as isize,
            })
        })
    }

    pub fn cells(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        self.points().zip(self.cells.iter().copied())
    }

    pub fn no_monsters(&self) -> bool {
        !self.cells.iter().any(|cell| cell.is_monster())
    }

    pub fn no_arrow(&self) -> bool {
        self.arrows() == 0
    }

    pub fn arrows(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_arrow()).count()
    }

    /// The group that acting on `origin` affects.
    ///
    /// Monsters and obstacles spread to every orthogonal neighbor with the
    /// same identity (and from there onwards). Everything else is a group of
    /// one, even if an identical tile is right next to it.
    pub fn fragment(&self, origin: Point) -> Vec<Point> {
        let cell = match self.get(origin) {
            Some(cell) => cell,
            None => return Vec::new(),
        };

        if cell.identity().is_none() {
            return vec![origin];
        }

        let mut visited = FxHashSet::default();
        visited.insert(origin);

        let mut to_check = vec![origin];
        let mut fragment = Vec::new();

        while let Some(point) = to_check.pop() {
            fragment.push(point);

            for direction in Direction::all() {
                let next = point + direction;
                if self.get(next) == Some(cell) && visited.insert(next) {
                    to_check.push(next);
                }
            }
        }

        fragment
    }

    // Remove the whole group at origin, returning what was removed
    pub fn clear_fragment(&mut self, origin: Point) -> Vec<Point> {
        let fragment = self.fragment(origin);
        for point in fragment.iter() {
            self.set(*point, Cell::Empty);
        }
        fragment
    }

    /// Move the group at `origin` one tile in `direction`.
    ///
    /// Either the whole group moves or nothing changes. Each tile must land on
    /// empty floor or on a tile of its own group; monsters may also land on
    /// spikes, which kills the whole group. Nothing may land on `occupied`
    /// (where the player is standing).
    pub fn try_shift(&mut self, origin: Point, direction: Direction, occupied: Point) -> bool {
        let cell = match self.get(origin) {
            Some(cell) if cell.is_pushable() => cell,
            _ => return false,
        };

        let group = self.fragment(origin);
        let mut dies = false;

        for point in group.iter() {
            let target = *point + direction;
            if target == occupied {
                return false;
            }

            match self.get(target) {
                Some(Cell::Empty) => {}
                Some(other) if other == cell && cell.identity().is_some() => {}
                Some(Cell::Spike) if cell.is_monster() => dies = true,
                _ => return false,
            }
        }

        for point in group.iter() {
            self.set(*point, Cell::Empty);
        }

        if dies {
            log::debug!("group at {origin:?} pushed onto spikes");
        } else {
            for point in group.iter() {
                self.set(*point + direction, cell);
            }
        }

        true
    }
}

#[cfg(test)]
impl Grid {
    pub(crate) fn from_rows(rows: &[&str]) -> Grid {
        let cells = rows
            .iter()
            .flat_map(|row| row.chars().map(|c| Cell::try_from(c).unwrap()))
            .collect::<Vec<_>>();
        Grid::new(rows[0].len(), rows.len(), cells)
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (point, cell) in self.cells() {
            write!(f, "{}", char::from(cell))?;
            if point.x as usize == self.width - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
