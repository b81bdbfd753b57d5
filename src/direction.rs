use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::point::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl From<Direction> for Point {
    fn from(direction: Direction) -> Point {
        match direction {
            Direction::Up => Point { x: 0, y: -1 },
            Direction::Right => Point { x: 1, y: 0 },
            Direction::Down => Point { x: 0, y: 1 },
            Direction::Left => Point { x: -1, y: 0 },
        }
    }
}

impl TryFrom<char> for Direction {
    type Error = anyhow::Error;

    fn try_from(value: char) -> Result<Self> {
        match value {
            'U' | 'u' | 'N' | 'n' => Ok(Direction::Up),
            'R' | 'r' | 'E' | 'e' => Ok(Direction::Right),
            'D' | 'd' | 'S' | 's' => Ok(Direction::Down),
            'L' | 'l' | 'W' | 'w' => Ok(Direction::Left),
            _ => Err(anyhow!("Invalid direction: {value}")),
        }
    }
}

impl From<Direction> for char {
    fn from(direction: Direction) -> char {
        match direction {
            Direction::Up => 'U',
            Direction::Right => 'R',
            Direction::Down => 'D',
            Direction::Left => 'L',
        }
    }
}

impl Direction {
    // Clockwise from up, which is also the order moves are generated in
    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
        ]
    }

    pub fn flip(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_cancels_out() {
        for direction in Direction::all() {
            let there = Point::new(3, 3) + direction;
            assert_eq!(there + direction.flip(), Point::new(3, 3));
        }
    }

    #[test]
    fn test_letters() {
        let letters = Direction::all()
            .iter()
            .map(|d| char::from(*d))
            .collect::<String>();
        assert_eq!(letters, "URDL");

        assert_eq!(Direction::try_from('r').unwrap(), Direction::Right);
        assert!(Direction::try_from('x').is_err());
    }
}
