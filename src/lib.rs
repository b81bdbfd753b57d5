use std::collections::VecDeque;
use std::fmt::Display;
use std::hash::Hash;
use std::time::Instant;

use fxhash::FxHashMap;

pub mod canonical;
pub mod direction;
pub mod dungeon;
pub mod grid;
pub mod level;
pub mod point;
pub mod tile;

pub use direction::Direction;
pub use point::Point;

pub trait State<G, Step>: Clone + Eq + Hash {
    fn is_valid(&self, global: &G) -> bool;
    fn is_solved(&self, global: &G) -> bool;

    // Every state reachable in one step, along with the step that got there
    fn next_states(&self, global: &G) -> Vec<(Step, Self)>
    where
        Self: Sized;

    fn stringify(&self, global: &G) -> String;
}

/// Breadth first search over states.
///
/// Every state is recorded the first time it's seen along with the state and
/// step it came from, so the first solved state popped off the queue has a
/// shortest path back to the start.
#[derive(Debug)]
pub struct Solver<G, S, Step>
where
    S: State<G, Step>,
{
    global_state: G,
    to_check: VecDeque<S>,
    parents: FxHashMap<S, Option<(S, Step)>>,
    max_states: Option<usize>,
    states_checked: usize,
    states_invalidated: usize,
    solution: Option<S>,
    gave_up: bool,
    time_spent: f32,
}

impl<G, S, Step> Solver<G, S, Step>
where
    S: State<G, Step>,
    Step: Copy,
{
    pub fn new(global_state: G, initial_state: S) -> Solver<G, S, Step> {
        let mut parents = FxHashMap::default();
        parents.insert(initial_state.clone(), None);

        Solver {
            global_state,
            to_check: VecDeque::from([initial_state]),
            parents,
            max_states: None,
            states_checked: 0,
            states_invalidated: 0,
            solution: None,
            gave_up: false,
            time_spent: 0 as f32,
        }
    }

    // Stop searching once this many states have been discovered
    pub fn set_max_states(&mut self, max_states: Option<usize>) -> &mut Self {
        self.max_states = max_states;
        self
    }

    pub fn states_checked(&self) -> usize {
        self.states_checked
    }

    pub fn states_discovered(&self) -> usize {
        self.parents.len()
    }

    pub fn states_invalidated(&self) -> usize {
        self.states_invalidated
    }

    pub fn in_queue(&self) -> usize {
        self.to_check.len()
    }

    pub fn time_spent(&self) -> f32 {
        self.time_spent
    }

    pub fn gave_up(&self) -> bool {
        self.gave_up
    }

    pub fn get_solution(&self) -> Option<S> {
        self.solution.clone()
    }

    pub fn stringify(&self, state: &S) -> String {
        state.stringify(&self.global_state)
    }

    /// Run until solved or out of states
    pub fn solve(&mut self) -> Option<S> {
        while let Some(state) = self.next() {
            if self.states_checked % 100000 != 0 {
                continue;
            }
            log::info!("{}, state:\n{}", self, self.stringify(&state));
        }

        self.get_solution()
    }

    /// The steps from the initial state to `solved`, or None if `solved` was
    /// never discovered by this solver.
    pub fn path(&self, solved: &S) -> Option<Vec<Step>> {
        let mut steps = Vec::new();
        let mut current = solved;

        loop {
            match self.parents.get(current)? {
                Some((parent, step)) => {
                    steps.push(*step);
                    current = parent;
                }
                None => break,
            }
        }

        steps.reverse();
        Some(steps)
    }
}

// Iterate through checked states until we find a solution or run out
impl<G, S, Step> Iterator for Solver<G, S, Step>
where
    S: State<G, Step>,
    Step: Copy,
{
    type Item = S;

    fn next(&mut self) -> Option<Self::Item> {
        if self.solution.is_some() || self.gave_up {
            return None;
        }

        let start = Instant::now();

        if let Some(max_states) = self.max_states {
            if self.parents.len() > max_states {
                log::warn!("Giving up after discovering {} states", self.parents.len());
                self.gave_up = true;
                self.time_spent += start.elapsed().as_secs_f32();
                return None;
            }
        }

        let current_state = self.to_check.pop_front()?;
        self.states_checked += 1;

        if current_state.is_solved(&self.global_state) {
            self.solution = Some(current_state.clone());
            self.time_spent += start.elapsed().as_secs_f32();
            return Some(current_state);
        }

        for (step, next_state) in current_state.next_states(&self.global_state) {
            if self.parents.contains_key(&next_state) {
                continue;
            }

            if !next_state.is_valid(&self.global_state) {
                self.states_invalidated += 1;
                continue;
            }

            self.parents
                .insert(next_state.clone(), Some((current_state.clone(), step)));
            self.to_check.push_back(next_state);
        }

        self.time_spent += start.elapsed().as_secs_f32();
        Some(current_state)
    }
}

impl<G, S, Step> Display for Solver<G, S, Step>
where
    S: State<G, Step>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} states checked, {} discovered, {} in queue, {} invalidated, {} seconds",
            self.states_checked,
            self.parents.len(),
            self.to_check.len(),
            self.states_invalidated,
            self.time_spent
        )
    }
}
