use anyhow::{anyhow, bail, Context, Result};

use solver::dungeon::{solve, Local, Outcome, Step};
use solver::level::{parse_steps, stringify_solution, Level};
use solver::State;

// Play the given steps from the initial state, failing on the first illegal one
fn replay(level: &Level, local: &Local, steps: &[Step]) -> Result<Local> {
    let mut local = local.clone();

    for (index, step) in steps.iter().enumerate() {
        if !local.try_step(*step) {
            bail!("Step {}: {step} is not a legal move", index + 1);
        }
        log::info!("After {step}:\n{}", local.stringify(level));
    }

    Ok(local)
}

fn max_states() -> Result<Option<usize>> {
    match std::env::var("DUNGEON_MAX_STATES") {
        Ok(value) => {
            let max_states = value
                .parse()
                .with_context(|| format!("Invalid DUNGEON_MAX_STATES: {value}"))?;
            Ok(Some(max_states))
        }
        Err(_) => Ok(None),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let stdin = std::io::stdin();
    let mut reader = stdin.lock();

    let (level, local) = Level::read(&mut reader)?;
    log::info!("Initial state:\n{}", local.stringify(&level));

    let mut json = false;
    let mut instructions = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
        } else {
            instructions.push(arg);
        }
    }

    // If there are steps given, play them instead of solving
    if !instructions.is_empty() {
        let steps = parse_steps(&instructions.join(" "))?;
        let last = replay(&level, &local, &steps)?;

        println!("{}", last.stringify(&level));
        println!("Is solved? {}", last.is_solved(&level));
        return Ok(());
    }

    match solve(&level, &local, max_states()?) {
        Outcome::Solved(path) => {
            if json {
                println!("{}", serde_json::to_string(&path)?);
            } else {
                print!("{}", stringify_solution(&path));
            }
            Ok(())
        }
        Outcome::NoSolution => {
            println!("No solution found");
            Err(anyhow!("No solution found"))
        }
        Outcome::GaveUp => Err(anyhow!("Gave up before finding a solution")),
    }
}
