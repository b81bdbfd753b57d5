use std::fmt::Display;

use serde::Serialize;

use crate::canonical::canonicalize;
use crate::direction::Direction;
use crate::grid::Grid;
use crate::level::Level;
use crate::point::Point;
use crate::tile::{Cell, Tool};
use crate::{Solver, State};

/// One move: use a tool in a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Step {
    pub tool: Tool,
    pub direction: Direction,
}

impl Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.tool.digit(), char::from(self.direction))
    }
}

/// Everything that can change while playing a level
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Local {
    pub player: Point,
    pub grid: Grid,
    pub tools: Vec<Tool>,
}

impl Local {
    pub fn new(grid: Grid, player: Point) -> Local {
        let mut local = Local {
            player,
            grid,
            tools: vec![Tool::Boots],
        };
        local.canonicalize();
        local
    }

    pub fn canonicalize(&mut self) {
        self.grid = canonicalize(&self.grid);
    }

    pub fn has_tool(&self, tool: Tool) -> bool {
        self.tools.binary_search(&tool).is_ok()
    }

    // Keep the tools sorted so the same set always hashes the same
    fn pick_up(&mut self, tool: Tool) {
        if let Err(index) = self.tools.binary_search(&tool) {
            self.tools.insert(index, tool);
        }
    }

    /// Apply a single step in place.
    ///
    /// Returns false if the tool isn't held, if nothing would change, or if
    /// the player would die; the state should be thrown away in that case.
    pub fn try_step(&mut self, step: Step) -> bool {
        if !self.has_tool(step.tool) {
            return false;
        }

        let success = match step.tool {
            Tool::Boots => self.try_walk(step.direction),
            Tool::Sword => self.try_strike(step.direction),
            Tool::Bow => self.try_shoot(step.direction),
            Tool::Shield => self.try_push(step.direction),
            Tool::Glove => self.try_pull(step.direction),
        };

        if success {
            self.canonicalize();
        }
        success
    }

    // Walk until something stops us: a wall, a tool, a stool, an arrow or death
    fn try_walk(&mut self, direction: Direction) -> bool {
        let exit_open = self.grid.no_monsters();
        let mut moved = false;

        loop {
            let next = self.player + direction;
            let cell = match self.grid.get(next) {
                Some(cell) => cell,
                None => break,
            };

            let enterable = match cell {
                Cell::Empty | Cell::Tool(_) | Cell::Spike | Cell::Stool | Cell::Arrow => true,
                Cell::Exit => exit_open,
                _ => false,
            };
            if !enterable {
                break;
            }

            moved = true;
            self.player = next;

            match cell {
                Cell::Tool(tool) => {
                    log::debug!("picked up {tool:?} at {next:?}");
                    self.pick_up(tool);
                    self.grid.set(next, Cell::Empty);
                    break;
                }
                Cell::Spike => {
                    log::debug!("walked {direction:?} onto spikes at {next:?}");
                    return false;
                }
                Cell::Stool => break,
                Cell::Arrow => {
                    self.grid.set(next, Cell::Empty);
                    break;
                }
                _ => {}
            }
        }

        moved
    }

    fn try_strike(&mut self, direction: Direction) -> bool {
        let target = self.player + direction;

        match self.grid.get(target) {
            Some(cell) if cell.is_monster() => {
                let killed = self.grid.clear_fragment(target);
                log::debug!("struck {direction:?}, killed {}", killed.len());
                true
            }
            _ => false,
        }
    }

    // Only one arrow can be out at a time; it's picked up again by walking over it
    fn try_shoot(&mut self, direction: Direction) -> bool {
        if !self.grid.no_arrow() {
            return false;
        }

        let mut arrow = self.player;
        loop {
            let next = arrow + direction;
            match self.grid.get(next) {
                Some(Cell::Empty) => arrow = next,
                Some(Cell::Monster(_)) => {
                    let killed = self.grid.clear_fragment(next);
                    log::debug!("shot {direction:?}, killed {}", killed.len());
                    arrow = next;
                    break;
                }
                _ => break,
            }
        }

        if arrow == self.player {
            return false;
        }

        self.grid.set(arrow, Cell::Arrow);
        true
    }

    // Advance over empty floor and shove the first thing we run into
    fn try_push(&mut self, direction: Direction) -> bool {
        let mut at = self.player;

        loop {
            let next = at + direction;
            match self.grid.get(next) {
                Some(Cell::Empty) => at = next,
                Some(cell) if cell.is_pushable() => {
                    if !self.grid.try_shift(next, direction, at) {
                        return false;
                    }

                    self.player = at;
                    return true;
                }
                _ => return false,
            }
        }
    }

    // Step forward, dragging whatever is directly behind us along
    fn try_pull(&mut self, direction: Direction) -> bool {
        let behind = self.player + direction.flip();
        let ahead = self.player + direction;

        match self.grid.get(ahead) {
            Some(Cell::Empty) | Some(Cell::Stool) => {}
            _ => return false,
        }

        match self.grid.get(behind) {
            Some(cell) if cell.is_pushable() => {}
            _ => return false,
        }

        if !self.grid.try_shift(behind, direction, ahead) {
            return false;
        }

        self.player = ahead;
        true
    }
}

impl State<Level, Step> for Local {
    fn is_valid(&self, _level: &Level) -> bool {
        matches!(
            self.grid.get(self.player),
            Some(Cell::Empty) | Some(Cell::Exit) | Some(Cell::Stool)
        )
    }

    fn is_solved(&self, _level: &Level) -> bool {
        self.grid.get(self.player) == Some(Cell::Exit)
    }

    fn next_states(&self, _level: &Level) -> Vec<(Step, Local)> {
        let mut next_states = Vec::new();

        for tool in self.tools.iter() {
            for direction in Direction::all() {
                let step = Step {
                    tool: *tool,
                    direction,
                };

                let mut next_local = self.clone();
                if next_local.try_step(step) {
                    next_states.push((step, next_local));
                }
            }
        }

        next_states
    }

    fn stringify(&self, _level: &Level) -> String {
        let mut output = String::from("Tools:");
        for tool in self.tools.iter() {
            output.push(' ');
            output.push(tool.digit());
        }
        output.push('\n');

        for (point, cell) in self.grid.cells() {
            output.push(if point == self.player {
                '!'
            } else {
                char::from(cell)
            });

            if point.x as usize == self.grid.width() - 1 {
                output.push('\n');
            }
        }

        output
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Solved(Vec<Step>),
    NoSolution,
    GaveUp,
}

/// Find a shortest list of steps from `initial` to an exit
pub fn solve(level: &Level, initial: &Local, max_states: Option<usize>) -> Outcome {
    let mut solver = Solver::new(level.clone(), initial.clone());
    solver.set_max_states(max_states);

    let solution = solver.solve();

    match solution.and_then(|solved| solver.path(&solved)) {
        Some(path) => {
            log::info!("Solved in {} steps: {solver}", path.len());
            Outcome::Solved(path)
        }
        None if solver.gave_up() => {
            log::warn!("Gave up: {solver}");
            Outcome::GaveUp
        }
        None => {
            log::info!("No solution: {solver}");
            Outcome::NoSolution
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(input: &str) -> (Level, Local) {
        Level::parse(input).unwrap()
    }

    fn with_tools(mut local: Local, tools: &[Tool]) -> Local {
        for tool in tools {
            local.pick_up(*tool);
        }
        local
    }

    fn step(tool: Tool, direction: Direction) -> Step {
        Step { tool, direction }
    }

    // Apply a step and compare against a level drawn with the player as '!'
    fn assert_step(local: &Local, step: Step, expected: &str) {
        let mut next = local.clone();
        assert!(next.try_step(step), "{step} should be legal");

        let (_, expected) = load(expected);
        assert_eq!(next.player, expected.player);
        assert_eq!(next.grid, expected.grid);
    }

    fn assert_no_step(local: &Local, step: Step) {
        let mut next = local.clone();
        assert!(!next.try_step(step), "{step} should not be legal");
    }

    #[test]
    fn test_walk_until_wall() {
        let (_, local) = load("!...#");
        assert_step(&local, step(Tool::Boots, Direction::Right), "...!#");
        assert_no_step(&local, step(Tool::Boots, Direction::Left));
    }

    #[test]
    fn test_walk_picks_up_tool() {
        let (_, local) = load("!.2..");

        let mut next = local.clone();
        assert!(next.try_step(step(Tool::Boots, Direction::Right)));
        assert_eq!(next.player, Point::new(2, 0));
        assert_eq!(next.tools, vec![Tool::Boots, Tool::Sword]);
        assert_eq!(next.grid.get(Point::new(2, 0)), Some(Cell::Empty));
    }

    #[test]
    fn test_walk_into_spike_is_never_a_move() {
        let (level, local) = load("!..^.");

        assert_no_step(&local, step(Tool::Boots, Direction::Right));
        assert!(local.next_states(&level).is_empty());
    }

    #[test]
    fn test_walk_stops_on_stool() {
        let (_, local) = load("!.*..");

        let mut next = local.clone();
        assert!(next.try_step(step(Tool::Boots, Direction::Right)));
        assert_eq!(next.player, Point::new(2, 0));
        assert_eq!(next.grid.get(Point::new(2, 0)), Some(Cell::Stool));
    }

    #[test]
    fn test_walk_picks_up_arrow() {
        let (_, local) = load("!.-..");
        assert_step(&local, step(Tool::Boots, Direction::Right), "..!..");
    }

    #[test]
    fn test_exit_locked_by_monsters() {
        let (_, local) = load("!.>. A###");
        assert_step(&local, step(Tool::Boots, Direction::Right), ".!>. A###");

        let (_, local) = load("!.>.");
        assert_step(&local, step(Tool::Boots, Direction::Right), "..>!");
    }

    #[test]
    fn test_strike_kills_connected_group() {
        let (_, local) = load("!AA. ..A. A...");
        let local = with_tools(local, &[Tool::Sword]);

        assert_step(&local, step(Tool::Sword, Direction::Right), "!... .... A...");
        assert_no_step(&local, step(Tool::Sword, Direction::Down));
    }

    #[test]
    fn test_strike_needs_sword() {
        let (_, local) = load("!A");
        assert_no_step(&local, step(Tool::Sword, Direction::Right));
    }

    #[test]
    fn test_shoot_monster() {
        let (_, local) = load("!..AA.");
        let local = with_tools(local, &[Tool::Bow]);

        let mut next = local.clone();
        assert!(next.try_step(step(Tool::Bow, Direction::Right)));
        assert!(next.grid.no_monsters());
        assert_eq!(next.grid.get(Point::new(3, 0)), Some(Cell::Arrow));
        assert_eq!(next.grid.arrows(), 1);
    }

    #[test]
    fn test_shoot_into_wall() {
        let (_, local) = load("!..#");
        let local = with_tools(local, &[Tool::Bow]);

        assert_step(&local, step(Tool::Bow, Direction::Right), "!.-#");
        assert_no_step(&local, step(Tool::Bow, Direction::Left));
    }

    #[test]
    fn test_one_arrow_at_a_time() {
        let (level, local) = load("!..- .... ....");
        let local = with_tools(local, &[Tool::Bow]);

        assert_no_step(&local, step(Tool::Bow, Direction::Down));
        assert!(local
            .next_states(&level)
            .iter()
            .all(|(step, _)| step.tool != Tool::Bow));
    }

    #[test]
    fn test_shots_leave_one_arrow() {
        let (level, local) = load("..... .!.B. ..... A....");
        let local = with_tools(local, &[Tool::Bow]);

        let shots = local
            .next_states(&level)
            .into_iter()
            .filter(|(step, _)| step.tool == Tool::Bow)
            .collect::<Vec<_>>();

        assert_eq!(shots.len(), 4);
        assert!(shots.iter().all(|(_, next)| next.grid.arrows() == 1));
    }

    #[test]
    fn test_push_obstacle() {
        let (_, local) = load("!.a..");
        let local = with_tools(local, &[Tool::Shield]);

        assert_step(&local, step(Tool::Shield, Direction::Right), ".!.a.");
    }

    #[test]
    fn test_push_whole_group() {
        let (_, local) = load("!a. .a.");
        let local = with_tools(local, &[Tool::Shield]);

        assert_step(&local, step(Tool::Shield, Direction::Right), "!.a ..a");
    }

    #[test]
    fn test_push_blocked_group() {
        let (level, local) = load("!a. .a#");
        let local = with_tools(local, &[Tool::Shield]);

        assert_no_step(&local, step(Tool::Shield, Direction::Right));
        assert!(local
            .next_states(&level)
            .iter()
            .all(|(step, _)| step.tool != Tool::Shield));
    }

    #[test]
    fn test_push_monster_onto_spike() {
        let (_, local) = load("!.A^");
        let local = with_tools(local, &[Tool::Shield]);

        assert_step(&local, step(Tool::Shield, Direction::Right), ".!.^");
    }

    #[test]
    fn test_push_without_target() {
        let (_, local) = load("!..# ^...");
        let local = with_tools(local, &[Tool::Shield]);

        assert_no_step(&local, step(Tool::Shield, Direction::Right));
        assert_no_step(&local, step(Tool::Shield, Direction::Down));
        assert_no_step(&local, step(Tool::Shield, Direction::Left));
    }

    #[test]
    fn test_push_stool_and_tool() {
        let (_, local) = load("!*. 3.. ...");
        let local = with_tools(local, &[Tool::Shield]);

        assert_step(&local, step(Tool::Shield, Direction::Right), "!.* 3.. ...");
        assert_step(&local, step(Tool::Shield, Direction::Down), "!*. ... 3..");
    }

    #[test]
    fn test_pull_obstacle() {
        let (_, local) = load("a!..");
        let local = with_tools(local, &[Tool::Glove]);

        assert_step(&local, step(Tool::Glove, Direction::Right), ".a!.");
    }

    #[test]
    fn test_pull_onto_stool() {
        let (_, local) = load("a!*");
        let local = with_tools(local, &[Tool::Glove]);

        let mut next = local.clone();
        assert!(next.try_step(step(Tool::Glove, Direction::Right)));
        assert_eq!(next.player, Point::new(2, 0));
        assert!(next.grid.get(Point::new(1, 0)).unwrap().is_obstacle());
    }

    #[test]
    fn test_pull_preconditions() {
        // Nothing behind
        let (_, local) = load(".!..");
        let local = with_tools(local, &[Tool::Glove]);
        assert_no_step(&local, step(Tool::Glove, Direction::Right));

        // Nowhere to go
        let (_, local) = load("a!#");
        let local = with_tools(local, &[Tool::Glove]);
        assert_no_step(&local, step(Tool::Glove, Direction::Right));

        // Group snagged on a wall
        let (_, local) = load("a!. a#.");
        let local = with_tools(local, &[Tool::Glove]);
        assert_no_step(&local, step(Tool::Glove, Direction::Right));
    }

    #[test]
    fn test_next_states_are_canonical() {
        let (level, local) = load("B!A");
        let local = with_tools(local, &[Tool::Sword]);

        for (_, next) in local.next_states(&level) {
            assert_eq!(canonicalize(&next.grid), next.grid);
        }
    }

    #[test]
    fn test_relabeled_levels_are_equal() {
        let (_, first) = load("!BA. c..d");
        let (_, second) = load("!AB. z..y");

        assert_eq!(first, second);
    }
}
