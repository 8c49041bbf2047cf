//! Shared test harness modules for the tsp-solver CLI.

use super::*;

mod helpers;
