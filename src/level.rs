use std::io::{BufRead, Read};

use anyhow::{anyhow, bail, Context, Result};

use crate::direction::Direction;
use crate::dungeon::{Local, Step};
use crate::grid::Grid;
use crate::point::Point;
use crate::tile::{Cell, Tool};

/// The parts of a level that never change while playing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub width: usize,
    pub height: usize,
    pub start: Point,
}

impl Level {
    // Read a global + local from a Readable
    pub fn read<R: Read + BufRead>(reader: &mut R) -> Result<(Level, Local)> {
        let mut input = String::new();
        reader
            .read_to_string(&mut input)
            .context("Failed to read level")?;

        Level::parse(&input)
    }

    /// Parse whitespace separated rows of tiles, with `!` marking the start.
    pub fn parse(input: &str) -> Result<(Level, Local)> {
        let mut width = 0;
        let mut height = 0;
        let mut cells = Vec::new();
        let mut start = None;

        for (y, row) in input.split_whitespace().enumerate() {
            let row_width = row.chars().count();

            if y == 0 {
                width = row_width;
            } else if row_width != width {
                bail!("Row {y} has {row_width} tiles, expected {width}");
            }
            height += 1;

            for (x, c) in row.chars().enumerate() {
                let point = Point {
                    x: x as isize,
                    y: y as isize,
                };

                if c == '!' {
                    if let Some(previous) = start {
                        bail!("Multiple starts at {previous:?} and {point:?}");
                    }
                    start = Some(point);
                    cells.push(Cell::Empty);
                    continue;
                }

                let cell = Cell::try_from(c).with_context(|| format!("At {point:?}"))?;
                cells.push(cell);
            }
        }

        if height == 0 {
            bail!("Empty level");
        }
        let start = start.ok_or_else(|| anyhow!("Level has no start"))?;

        let grid = Grid::new(width, height, cells);
        log::debug!("Loaded {width}x{height} level, start at {start:?}");

        Ok((
            Level {
                width,
                height,
                start,
            },
            Local::new(grid, start),
        ))
    }
}

/// Parse steps written as tool digit + direction letter, e.g. `1R 2U` or `1R2U`
pub fn parse_steps(input: &str) -> Result<Vec<Step>> {
    let chars = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<Vec<_>>();

    if chars.len() % 2 != 0 {
        bail!("Incomplete step in {input:?}");
    }

    chars
        .chunks(2)
        .map(|pair| -> Result<Step> {
            Ok(Step {
                tool: Tool::try_from(pair[0])?,
                direction: Direction::try_from(pair[1])?,
            })
        })
        .collect()
}

/// The move count followed by one numbered line per step
pub fn stringify_solution(path: &[Step]) -> String {
    let mut output = format!("{}\n", path.len());
    for (index, step) in path.iter().enumerate() {
        output.push_str(&format!("{}: {step}\n", index + 1));
    }
    output
}
