use crate::automata::dfa::Dfa;
use crate::exec::DfaExecutor;
use crate::parse;
use core::str::FromStr;
use log::debug;

pub use parse::Error;

/// Flags used to control regex compilation.
/// The default flags cache epsilon closures and place no limit on the number
/// of DFA states.
#[derive(Debug, Copy, Clone, Default)]
pub struct Flags {
    /// If set, recompute epsilon closures instead of memoizing them.
    /// The compiled regex is the same either way.
    pub no_cache: bool,

    /// If set, fail compilation once the DFA would have more than this many
    /// states, counting the dead state.
    pub max_dfa_states: Option<usize>,
}

/// A Regex is the compiled version of a pattern: a DFA over the literal
/// chars of the pattern.
///
/// A Regex is immutable, so it may be shared between threads and matched
/// against concurrently.
#[derive(Debug, Clone)]
pub struct Regex {
    dfa: Dfa,
}

impl From<Dfa> for Regex {
    fn from(dfa: Dfa) -> Self {
        Self { dfa }
    }
}

/// Compile `pattern` using the default flags.
/// This is the same as [`Regex::new`].
#[inline]
pub fn compile(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern)
}

impl Regex {
    /// Construct a regex by parsing `pattern` using the default flags.
    /// An Error may be returned if the syntax is invalid.
    /// Note that this is rather expensive; prefer to cache a Regex which is
    /// intended to be used more than once.
    #[inline]
    pub fn new(pattern: &str) -> Result<Regex, Error> {
        Self::with_flags(pattern, Flags::default())
    }

    /// Construct a regex by parsing `pattern` with `flags`.
    /// An Error may be returned if the syntax is invalid, or if the DFA
    /// exceeds the state limit given in `flags`.
    pub fn with_flags(pattern: &str, flags: Flags) -> Result<Regex, Error> {
        let nfa = parse::try_parse(pattern)?;
        let dfa = Dfa::try_from(&nfa, flags)?;
        debug!(
            "compiled {:?}: {} NFA states, {} symbols, {} DFA states, {} accepting",
            pattern,
            nfa.len(),
            nfa.alphabet().len(),
            dfa.state_count(),
            dfa.final_states().count()
        );
        Ok(Regex { dfa })
    }

    /// Test whether the whole of `text` matches.
    #[inline]
    pub fn matches(&self, text: &str) -> bool {
        DfaExecutor::new(&self.dfa).is_match(text)
    }

    /// \return the length in chars of the shortest prefix of `text` which
    /// matches, or 0 if there is none.
    ///
    /// ```rust
    /// let re = regdfa::Regex::new("a|b").unwrap();
    /// assert_eq!(re.partial("ba"), 1);
    /// ```
    #[inline]
    pub fn partial(&self, text: &str) -> usize {
        self.shortest_match(text).unwrap_or(0)
    }

    /// \return the length in chars of the longest prefix of `text` which
    /// matches, or 0 if there is none.
    ///
    /// ```rust
    /// let re = regdfa::Regex::new("ab*c").unwrap();
    /// assert_eq!(re.greedy("abbbcx"), 5);
    /// ```
    #[inline]
    pub fn greedy(&self, text: &str) -> usize {
        self.longest_match(text).unwrap_or(0)
    }

    /// Like [`Regex::partial`], but distinguishes an empty match, `Some(0)`,
    /// from no match at all, `None`.
    #[inline]
    pub fn shortest_match(&self, text: &str) -> Option<usize> {
        DfaExecutor::new(&self.dfa).shortest_match(text)
    }

    /// Like [`Regex::greedy`], but distinguishes an empty match, `Some(0)`,
    /// from no match at all, `None`.
    #[inline]
    pub fn longest_match(&self, text: &str) -> Option<usize> {
        DfaExecutor::new(&self.dfa).longest_match(text)
    }

    /// The literal chars of the pattern, in order of first appearance.
    #[inline]
    pub fn alphabet(&self) -> &[char] {
        self.dfa.alphabet()
    }

    /// The number of DFA states, the dead state included.
    #[inline]
    pub fn state_count(&self) -> usize {
        self.dfa.state_count()
    }

    /// Access the underlying DFA.
    #[inline]
    pub fn dfa(&self) -> &Dfa {
        &self.dfa
    }
}

impl FromStr for Regex {
    type Err = Error;

    /// Attempts to parse a string into a regular expression
    #[inline]
    fn from_str(s: &str) -> Result<Self, Error> {
        Self::new(s)
    }
}

// Access to the individual compilation stages, for tools and tests.
#[doc(hidden)]
pub mod backends {
    pub use crate::automata::dfa::{Dfa, DfaStateID, DEAD_STATE, START_STATE};
    pub use crate::automata::nfa::{Nfa, Operator, StateHandle, StateSet, Symbol};
    #[cfg(feature = "backend-nfa")]
    pub use crate::automata::nfa_backend::{execute_nfa, longest_prefix_nfa};
    pub use crate::exec::{DfaExecutor, Walk};
    pub use crate::parse::{try_parse, try_parse_postfix};
}
