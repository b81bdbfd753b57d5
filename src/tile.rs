use anyhow::{anyhow, Result};
use serde::Serialize;

/// Tools the player can carry. The discriminant is the digit used for the
/// pickup tile and for printed moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Tool {
    /// Walk until something stops you
    Boots = 1,
    /// Kill an adjacent monster
    Sword = 2,
    /// Shoot along a line of empty tiles
    Bow = 3,
    /// Push the first thing in front of you
    Shield = 4,
    /// Drag the thing behind you along
    Glove = 5,
}

impl Tool {
    pub fn digit(&self) -> char {
        char::from(b'0' + *self as u8)
    }
}

impl TryFrom<char> for Tool {
    type Error = anyhow::Error;

    fn try_from(value: char) -> Result<Self> {
        match value {
            '1' => Ok(Tool::Boots),
            '2' => Ok(Tool::Sword),
            '3' => Ok(Tool::Bow),
            '4' => Ok(Tool::Shield),
            '5' => Ok(Tool::Glove),
            _ => Err(anyhow!("Invalid tool: {value}")),
        }
    }
}

/// Label shared by every tile of one monster or obstacle group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cell {
    Empty,
    Wall,
    Exit,
    Spike,
    Stool,
    Arrow,
    Tool(Tool),
    Monster(Identity),
    Obstacle(Identity),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        *self == Cell::Empty
    }

    pub fn is_wall(&self) -> bool {
        *self == Cell::Wall
    }

    pub fn is_exit(&self) -> bool {
        *self == Cell::Exit
    }

    pub fn is_spike(&self) -> bool {
        *self == Cell::Spike
    }

    pub fn is_stool(&self) -> bool {
        *self == Cell::Stool
    }

    pub fn is_arrow(&self) -> bool {
        *self == Cell::Arrow
    }

    pub fn is_tool(&self) -> bool {
        matches!(self, Cell::Tool(_))
    }

    pub fn is_monster(&self) -> bool {
        matches!(self, Cell::Monster(_))
    }

    pub fn is_obstacle(&self) -> bool {
        matches!(self, Cell::Obstacle(_))
    }

    // Anything the shield or glove can move
    pub fn is_pushable(&self) -> bool {
        matches!(
            self,
            Cell::Monster(_) | Cell::Obstacle(_) | Cell::Stool | Cell::Tool(_) | Cell::Arrow
        )
    }

    pub fn identity(&self) -> Option<Identity> {
        match self {
            Cell::Monster(id) | Cell::Obstacle(id) => Some(*id),
            _ => None,
        }
    }
}

impl TryFrom<char> for Cell {
    type Error = anyhow::Error;

    fn try_from(value: char) -> Result<Self> {
        match value {
            '.' => Ok(Cell::Empty),
            '#' => Ok(Cell::Wall),
            '>' => Ok(Cell::Exit),
            '^' => Ok(Cell::Spike),
            '*' => Ok(Cell::Stool),
            '-' => Ok(Cell::Arrow),
            '2'..='5' => Ok(Cell::Tool(Tool::try_from(value)?)),
            'A'..='Z' => Ok(Cell::Monster(Identity((value as u8 - b'A') as u16))),
            'a'..='z' => Ok(Cell::Obstacle(Identity((value as u8 - b'a') as u16))),
            _ => Err(anyhow!("Invalid tile: {value}")),
        }
    }
}

impl From<Cell> for char {
    fn from(cell: Cell) -> char {
        // Past 26 groups of one kind there are no letters left
        fn letter(base: u8, id: Identity) -> char {
            if id.0 < 26 {
                char::from(base + id.0 as u8)
            } else {
                '?'
            }
        }

        match cell {
            Cell::Empty => '.',
            Cell::Wall => '#',
            Cell::Exit => '>',
            Cell::Spike => '^',
            Cell::Stool => '*',
            Cell::Arrow => '-',
            Cell::Tool(tool) => tool.digit(),
            Cell::Monster(id) => letter(b'A', id),
            Cell::Obstacle(id) => letter(b'a', id),
        }
    }
}
