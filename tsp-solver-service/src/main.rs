//! Entry point for the `tsp-solver` command.
#![forbid(unsafe_code)]

use env_logger::Env;
use tsp_solver_service::ServiceError;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(err) = tsp_solver_service::run() {
        if let ServiceError::ArgumentParsing(parse_error) = &err {
            parse_error.exit();
        }
        eprintln!("tsp-solver: {err}");
        std::process::exit(1);
    }
}
