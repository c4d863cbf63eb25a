//! Finite automata: Thompson NFAs and their powerset DFAs.

pub mod dfa;
pub mod nfa;
#[cfg(feature = "backend-nfa")]
pub mod nfa_backend;
mod util;
