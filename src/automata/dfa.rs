//! Conversion of NFAs to deterministic finite automata via the powerset
//! construction.

use crate::api::Flags;
use crate::automata::nfa::{Nfa, StateSet};
use crate::automata::util::format_char;
use crate::parse::Error;
use core::fmt;
use core::hash::BuildHasherDefault;
use indexmap::IndexSet;
use log::trace;
use rustc_hash::{FxHashMap, FxHasher};

/// Index of a DFA state.
pub type DfaStateID = u32;

/// The dead state: no outgoing transitions, never accepting.
pub const DEAD_STATE: DfaStateID = 0;

/// The start state, the epsilon closure of the NFA start state.
pub const START_STATE: DfaStateID = 1;

// Descriptors by DFA state index.
type DescriptorSet = IndexSet<StateSet, BuildHasherDefault<FxHasher>>;

/// Memoizes epsilon closures by their (canonical) input set.
/// Owned by a single construction and dropped with it.
struct ClosureCache<'n> {
    nfa: &'n Nfa,
    memo: Option<FxHashMap<StateSet, StateSet>>,
    hits: usize,
    misses: usize,
}

impl<'n> ClosureCache<'n> {
    fn new(nfa: &'n Nfa, enabled: bool) -> Self {
        ClosureCache {
            nfa,
            memo: enabled.then(FxHashMap::default),
            hits: 0,
            misses: 0,
        }
    }

    fn closure(&mut self, states: StateSet) -> StateSet {
        let Some(memo) = self.memo.as_mut() else {
            return self.nfa.epsilon_closure(&states);
        };
        if let Some(closure) = memo.get(&states) {
            self.hits += 1;
            return closure.clone();
        }
        self.misses += 1;
        let closure = self.nfa.epsilon_closure(&states);
        memo.insert(states, closure.clone());
        closure
    }
}

/// A deterministic finite automaton.
/// State 0 is dead and state 1 is the start. A (state, char) pair with no
/// entry in the table goes to the dead state.
#[derive(Debug, Clone)]
pub struct Dfa {
    /// Transitions: (source, char) -> destination.
    transitions: FxHashMap<(DfaStateID, char), DfaStateID>,

    /// Whether each state is accepting, by index.
    accepting: Box<[bool]>,

    /// The NFA states aggregated by each DFA state, by index.
    descriptors: Box<[StateSet]>,

    /// The chars transitions were computed for.
    alphabet: Box<[char]>,
}

impl Dfa {
    /// Build a DFA from \p nfa. This only fails if \p flags set a state limit
    /// and the DFA outgrows it.
    pub fn try_from(nfa: &Nfa, flags: Flags) -> Result<Self, Error> {
        let check_limit = |len: usize| match flags.max_dfa_states {
            Some(limit) if len > limit => Err(Error::StateLimitExceeded { limit }),
            _ => Ok(()),
        };
        let is_final = |set: &StateSet| set.contains(nfa.accept());

        let mut cache = ClosureCache::new(nfa, !flags.no_cache);
        let mut descriptors = DescriptorSet::default();
        let mut accepting = Vec::new();
        let mut transitions = FxHashMap::default();

        descriptors.insert(StateSet::default());
        accepting.push(false);
        let start = cache.closure(StateSet::singleton(nfa.start()));
        accepting.push(is_final(&start));
        descriptors.insert(start);
        check_limit(descriptors.len())?;

        // Descriptors below `next` have been expanded on every char.
        let mut next = START_STATE as usize;
        while next < descriptors.len() {
            for &c in nfa.alphabet() {
                let moved = nfa.step(&descriptors[next], c);
                if moved.is_empty() {
                    // Dead; left out of the table.
                    continue;
                }
                let (idx, inserted) = descriptors.insert_full(cache.closure(moved));
                if inserted {
                    check_limit(descriptors.len())?;
                    accepting.push(is_final(&descriptors[idx]));
                    trace!(
                        "DFA state {} = {}{}",
                        idx,
                        descriptors[idx],
                        if accepting[idx] { " (accepting)" } else { "" }
                    );
                }
                transitions.insert((next as DfaStateID, c), idx as DfaStateID);
            }
            next += 1;
        }

        trace!(
            "closure cache: {} hits, {} misses",
            cache.hits,
            cache.misses
        );
        debug_assert_eq!(accepting.len(), descriptors.len());
        Ok(Dfa {
            transitions,
            accepting: accepting.into_boxed_slice(),
            descriptors: descriptors.into_iter().collect(),
            alphabet: nfa.alphabet().into(),
        })
    }

    #[inline]
    pub fn start(&self) -> DfaStateID {
        START_STATE
    }

    /// Number of states, the dead state included.
    #[inline]
    pub fn state_count(&self) -> usize {
        self.descriptors.len()
    }

    /// The state reached from \p state on \p c.
    #[inline]
    pub fn next(&self, state: DfaStateID, c: char) -> DfaStateID {
        self.transitions
            .get(&(state, c))
            .copied()
            .unwrap_or(DEAD_STATE)
    }

    #[inline]
    pub fn is_accepting(&self, state: DfaStateID) -> bool {
        self.accepting.get(state as usize).copied().unwrap_or(false)
    }

    /// The accepting states, in increasing order.
    pub fn final_states(&self) -> impl Iterator<Item = DfaStateID> + '_ {
        self.accepting
            .iter()
            .enumerate()
            .filter(|(_, accepting)| **accepting)
            .map(|(idx, _)| idx as DfaStateID)
    }

    /// The NFA states aggregated by \p state.
    pub fn descriptor(&self, state: DfaStateID) -> Option<&StateSet> {
        self.descriptors.get(state as usize)
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// All recorded transitions as (source, char, destination), ordered by
    /// source and then by alphabet order.
    pub fn transitions(&self) -> impl Iterator<Item = (DfaStateID, char, DfaStateID)> + '_ {
        (0..self.state_count() as DfaStateID).flat_map(move |src| {
            self.alphabet.iter().filter_map(move |&c| {
                self.transitions
                    .get(&(src, c))
                    .map(|&dst| (src, c, dst))
            })
        })
    }

    /// Generate a human-readable representation of the DFA
    pub fn to_readable_string(&self) -> String {
        let mut result = String::new();
        result.push_str("DFA States:\n");
        result.push_str("===========\n\n");

        for (idx, descriptor) in self.descriptors.iter().enumerate() {
            let state = idx as DfaStateID;
            let mut markers = Vec::new();
            match state {
                DEAD_STATE => markers.push("DEAD"),
                START_STATE => markers.push("START"),
                _ => {}
            }
            if self.is_accepting(state) {
                markers.push("ACCEPT");
            }
            if markers.is_empty() {
                result.push_str(&format!("State {}\n", state));
            } else {
                result.push_str(&format!("State {} ({})\n", state, markers.join(", ")));
            }
            result.push_str(&format!("  NFA states: {}\n", descriptor));

            for &c in self.alphabet.iter() {
                if let Some(dst) = self.transitions.get(&(state, c)) {
                    result.push_str(&format!("    {} ──> {}\n", format_char(c), dst));
                }
            }
            result.push('\n');
        }

        result
    }
}

impl fmt::Display for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DFA({} states)", self.state_count())?;
        for idx in 0..self.state_count() {
            let state = idx as DfaStateID;
            let marker = match state {
                DEAD_STATE => "D",
                _ if self.is_accepting(state) => "A",
                START_STATE => "S",
                _ => " ",
            };
            write!(f, "\n[{}{}]", marker, state)?;
            for &c in self.alphabet.iter() {
                if let Some(dst) = self.transitions.get(&(state, c)) {
                    write!(f, " {}→{}", format_char(c), dst)?;
                }
            }
        }
        Ok(())
    }
}
