mod report;
mod scenario;

use std::error::Error;
use std::fs;
use std::process::ExitCode;

use log::info;
use report::{render_failure, render_solution};
use scenario::build_reference_truss;
use truss_statics::TrussInput;

fn main() -> Result<ExitCode, Box<dyn Error>> {
    env_logger::init();

    // A JSON truss description may be passed as the only argument. Without one
    // we fall back to the loaded triangle from the crate documentation.
    let result = match std::env::args().nth(1) {
        Some(path) => {
            info!("reading truss description from {path}");
            let input: TrussInput = serde_json::from_str(&fs::read_to_string(&path)?)?;
            input.solve()
        }
        None => {
            let mut truss = build_reference_truss()?;
            truss.evaluate().cloned()
        }
    };

    // Print the reactions and member forces, or a notice that separates an
    // unfinished model from one that statics alone cannot solve. The notice is
    // the only report of a failed solve.
    match result {
        Ok(solution) => {
            println!("{}", render_solution(&solution));
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            eprintln!("{}", render_failure(&error));
            Ok(ExitCode::FAILURE)
        }
    }
}
