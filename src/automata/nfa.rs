//! Thompson construction of non-deterministic finite automata.

use crate::automata::util::format_symbol;
use crate::parse::Error;
use core::fmt;
use smallvec::{smallvec, SmallVec};

// A handle to a State in the NFA.
// Handles are assigned in order of allocation, starting at 0.
pub type StateHandle = u32;

/// The label of an NFA transition.
/// Epsilon is its own variant, so it can never collide with an input char.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Epsilon,
    Char(char),
}

/// The operators which combine NFA fragments.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operator {
    /// Implicit concatenation, as in `ab`.
    Concat,
    /// Alternation, as in `a|b`.
    Union,
    /// Zero or more repetitions, as in `a*`.
    Star,
}

impl Operator {
    /// Binding strength; higher binds tighter.
    #[inline]
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Star => 3,
            Operator::Concat => 2,
            Operator::Union => 1,
        }
    }

    /// Number of operands consumed.
    #[inline]
    pub fn arity(self) -> usize {
        match self {
            Operator::Star => 1,
            Operator::Concat | Operator::Union => 2,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operator::Concat => f.write_str("concatenation"),
            Operator::Union => f.write_str("'|'"),
            Operator::Star => f.write_str("'*'"),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct State {
    // Epsilon transitions to other states.
    pub eps: Vec<StateHandle>,

    // Transitions to other states on a char. A char may appear more than once.
    pub transitions: Vec<(char, StateHandle)>,
}

impl State {
    // Add an epsilon transition to another state.
    pub fn add_eps(&mut self, target: StateHandle) {
        self.eps.push(target);
    }

    // Add a char transition to another state.
    pub fn add_transition(&mut self, c: char, dest: StateHandle) {
        self.transitions.push((c, dest));
    }
}

/// A set of NFA states, kept sorted and free of duplicates so that equal sets
/// compare and hash equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StateSet(SmallVec<[StateHandle; 8]>);

impl StateSet {
    #[inline]
    pub fn singleton(state: StateHandle) -> Self {
        StateSet(smallvec![state])
    }

    #[inline]
    pub fn contains(&self, state: StateHandle) -> bool {
        self.0.binary_search(&state).is_ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = StateHandle> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<StateHandle> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateHandle>>(iter: I) -> Self {
        let mut states: SmallVec<[StateHandle; 8]> = iter.into_iter().collect();
        states.sort_unstable();
        states.dedup();
        StateSet(states)
    }
}

impl fmt::Display for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (idx, state) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", state)?;
        }
        f.write_str("}")
    }
}

// A piece of an NFA under construction.
// The first state is the entry and the last is the exit; the states between
// are carried along so the fragment still lists everything it owns.
#[derive(Debug)]
struct Fragment {
    states: SmallVec<[StateHandle; 4]>,
}

impl Fragment {
    #[inline]
    fn entry(&self) -> StateHandle {
        self.states[0]
    }

    #[inline]
    fn exit(&self) -> StateHandle {
        self.states[self.states.len() - 1]
    }
}

/// Builds an NFA from literals and operator reductions.
/// Fragments live on an operand stack; operators pop their operands from it
/// and push the combined fragment back.
pub(crate) struct Builder {
    // States indexed by handle.
    states: Vec<State>,

    // Fragments not yet consumed by an operator.
    operands: Vec<Fragment>,

    // Literal chars, in order of first appearance.
    alphabet: Vec<char>,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Builder {
            states: Vec::new(),
            operands: Vec::new(),
            alphabet: Vec::new(),
        }
    }

    /// Add a new state, returning its handle.
    fn make(&mut self) -> StateHandle {
        self.states.push(State::default());
        self.states.len() as StateHandle - 1
    }

    /// Access a state by handle.
    fn get(&mut self, idx: StateHandle) -> &mut State {
        &mut self.states[idx as usize]
    }

    /// Number of fragments on the operand stack.
    pub(crate) fn depth(&self) -> usize {
        self.operands.len()
    }

    /// Pop an operand for \p op, failing if there is none.
    fn pop(&mut self, op: Operator) -> Result<Fragment, Error> {
        self.operands
            .pop()
            .ok_or(Error::MissingOperand { operator: op })
    }

    /// Push [s0, s1] with s0 --c--> s1.
    pub(crate) fn literal(&mut self, c: char) {
        let s0 = self.make();
        let s1 = self.make();
        self.get(s0).add_transition(c, s1);
        self.operands.push(Fragment {
            states: smallvec![s0, s1],
        });
        if !self.alphabet.contains(&c) {
            self.alphabet.push(c);
        }
    }

    /// Reduce the operand stack with \p op.
    pub(crate) fn apply(&mut self, op: Operator) -> Result<(), Error> {
        match op {
            Operator::Concat => self.concat(),
            Operator::Union => self.union(),
            Operator::Star => self.star(),
        }
    }

    /// a, b -> a --ε--> b
    fn concat(&mut self) -> Result<(), Error> {
        let b = self.pop(Operator::Concat)?;
        let mut a = self.pop(Operator::Concat)?;
        self.get(a.exit()).add_eps(b.entry());
        a.states.extend(b.states);
        self.operands.push(a);
        Ok(())
    }

    /// a, b -> start --ε--> a|b --ε--> end
    fn union(&mut self) -> Result<(), Error> {
        let b = self.pop(Operator::Union)?;
        let a = self.pop(Operator::Union)?;
        let start = self.make();
        let end = self.make();
        self.get(start).add_eps(a.entry());
        self.get(start).add_eps(b.entry());
        self.get(a.exit()).add_eps(end);
        self.get(b.exit()).add_eps(end);

        let mut states = SmallVec::with_capacity(a.states.len() + b.states.len() + 2);
        states.push(start);
        states.extend(a.states);
        states.extend(b.states);
        states.push(end);
        self.operands.push(Fragment { states });
        Ok(())
    }

    /// a -> start --ε--> a --ε--> end, with a bypass and a loop back.
    fn star(&mut self) -> Result<(), Error> {
        let a = self.pop(Operator::Star)?;
        let start = self.make();
        let end = self.make();
        // Zero repetitions.
        self.get(start).add_eps(end);
        self.get(start).add_eps(a.entry());
        self.get(a.exit()).add_eps(end);
        self.get(a.exit()).add_eps(a.entry());

        let mut states = SmallVec::with_capacity(a.states.len() + 2);
        states.push(start);
        states.extend(a.states);
        states.push(end);
        self.operands.push(Fragment { states });
        Ok(())
    }

    /// Take the single remaining fragment as the automaton.
    pub(crate) fn finish(mut self) -> Result<Nfa, Error> {
        let fragment = self.operands.pop().ok_or(Error::EmptyPattern)?;
        if !self.operands.is_empty() {
            // Every adjacent pair of operands is joined by a concatenation,
            // so leftovers mean a concatenation went missing.
            return Err(Error::MissingOperand {
                operator: Operator::Concat,
            });
        }
        Ok(Nfa {
            start: fragment.entry(),
            accept: fragment.exit(),
            states: self.states.into_boxed_slice(),
            alphabet: self.alphabet.into_boxed_slice(),
        })
    }
}

/// A non-deterministic finite automaton with epsilon transitions, a single
/// start state and a single accept state. Immutable once built.
#[derive(Debug, Clone)]
pub struct Nfa {
    start: StateHandle,
    accept: StateHandle,
    states: Box<[State]>,
    alphabet: Box<[char]>,
}

impl Nfa {
    pub fn start(&self) -> StateHandle {
        self.start
    }

    pub fn accept(&self) -> StateHandle {
        self.accept
    }

    pub fn at(&self, idx: StateHandle) -> &State {
        &self.states[idx as usize]
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The literal chars of the pattern, in order of first appearance.
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// The states directly reachable from \p state on \p symbol.
    pub fn edge(&self, state: StateHandle, symbol: Symbol) -> impl Iterator<Item = StateHandle> + '_ {
        let state = self.at(state);
        let eps = state
            .eps
            .iter()
            .copied()
            .filter(move |_| symbol == Symbol::Epsilon);
        let chars = state
            .transitions
            .iter()
            .filter(move |&&(c, _)| symbol == Symbol::Char(c))
            .map(|&(_, target)| target);
        eps.chain(chars)
    }

    /// The states reachable from any of \p states on \p c, without closing
    /// over epsilon transitions.
    pub fn step(&self, states: &StateSet, c: char) -> StateSet {
        states
            .iter()
            .flat_map(|s| self.edge(s, Symbol::Char(c)))
            .collect()
    }

    /// The smallest superset of \p states closed under epsilon transitions.
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        let mut seen = vec![false; self.states.len()];
        let mut stack: Vec<StateHandle> = states.iter().collect();
        let mut closure = Vec::with_capacity(stack.len());
        while let Some(s) = stack.pop() {
            if core::mem::replace(&mut seen[s as usize], true) {
                continue;
            }
            closure.push(s);
            stack.extend(self.edge(s, Symbol::Epsilon));
        }
        closure.into_iter().collect()
    }

    /// All transitions as (source, symbol, destination).
    pub fn transitions(&self) -> impl Iterator<Item = (StateHandle, Symbol, StateHandle)> + '_ {
        self.states.iter().enumerate().flat_map(|(idx, state)| {
            let src = idx as StateHandle;
            let eps = state.eps.iter().map(move |&dst| (src, Symbol::Epsilon, dst));
            let chars = state
                .transitions
                .iter()
                .map(move |&(c, dst)| (src, Symbol::Char(c), dst));
            eps.chain(chars)
        })
    }

    /// Generate a human-readable representation of the NFA
    pub fn to_readable_string(&self) -> String {
        let mut result = String::new();
        result.push_str("NFA States:\n");
        result.push_str("===========\n\n");

        for (idx, state) in self.states.iter().enumerate() {
            let state_idx = idx as StateHandle;

            // Add special state markers
            let marker = match state_idx {
                idx if idx == self.start => " (START)",
                idx if idx == self.accept => " (ACCEPT)",
                _ => "",
            };

            result.push_str(&format!("State {}{}\n", state_idx, marker));

            if !state.eps.is_empty() {
                result.push_str("  ε-transitions:\n");
                for &target in &state.eps {
                    result.push_str(&format!("    ε ──> {}\n", target));
                }
            }

            if !state.transitions.is_empty() {
                result.push_str("  Char transitions:\n");
                for &(c, target) in &state.transitions {
                    result.push_str(&format!(
                        "    {} ──> {}\n",
                        format_symbol(Symbol::Char(c)),
                        target
                    ));
                }
            }

            if state.eps.is_empty() && state.transitions.is_empty() && state_idx != self.accept {
                result.push_str("  (no transitions)\n");
            }

            result.push('\n');
        }

        result
    }
}

impl fmt::Display for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "NFA({} states)", self.states.len())?;
        for (idx, state) in self.states.iter().enumerate() {
            let handle = idx as StateHandle;
            let marker = match handle {
                idx if idx == self.start => "S",
                idx if idx == self.accept => "A",
                _ => " ",
            };

            write!(f, "[{}{}]", marker, handle)?;

            for &target in &state.eps {
                write!(f, " ε→{}", target)?;
            }

            for &(c, target) in &state.transitions {
                write!(f, " {}→{}", format_symbol(Symbol::Char(c)), target)?;
            }

            if idx < self.states.len() - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::try_parse;

    fn edges(nfa: &Nfa, state: StateHandle, symbol: Symbol) -> Vec<StateHandle> {
        let mut result: Vec<_> = nfa.edge(state, symbol).collect();
        result.sort_unstable();
        result
    }

    #[test]
    fn test_literal() {
        let nfa = try_parse("a").unwrap();
        assert_eq!(nfa.len(), 2);
        assert_eq!(nfa.start(), 0);
        assert_eq!(nfa.accept(), 1);
        assert_eq!(edges(&nfa, 0, Symbol::Char('a')), vec![1]);
        assert!(edges(&nfa, 0, Symbol::Epsilon).is_empty());
        assert!(edges(&nfa, 0, Symbol::Char('b')).is_empty());
        assert_eq!(nfa.alphabet(), &['a']);
    }

    #[test]
    fn test_concat() {
        // [0 -a-> 1] ε [2 -b-> 3]
        let nfa = try_parse("ab").unwrap();
        assert_eq!(nfa.len(), 4);
        assert_eq!(nfa.start(), 0);
        assert_eq!(nfa.accept(), 3);
        assert_eq!(edges(&nfa, 1, Symbol::Epsilon), vec![2]);
        assert_eq!(nfa.alphabet(), &['a', 'b']);
    }

    #[test]
    fn test_union() {
        // [0 -a-> 1], [2 -b-> 3], start 4, end 5.
        let nfa = try_parse("a|b").unwrap();
        assert_eq!(nfa.len(), 6);
        assert_eq!(nfa.start(), 4);
        assert_eq!(nfa.accept(), 5);
        assert_eq!(edges(&nfa, 4, Symbol::Epsilon), vec![0, 2]);
        assert_eq!(edges(&nfa, 1, Symbol::Epsilon), vec![5]);
        assert_eq!(edges(&nfa, 3, Symbol::Epsilon), vec![5]);
    }

    #[test]
    fn test_star() {
        // [0 -a-> 1], start 2, end 3.
        let nfa = try_parse("a*").unwrap();
        assert_eq!(nfa.len(), 4);
        assert_eq!(nfa.start(), 2);
        assert_eq!(nfa.accept(), 3);
        assert_eq!(edges(&nfa, 2, Symbol::Epsilon), vec![0, 3]);
        assert_eq!(edges(&nfa, 1, Symbol::Epsilon), vec![0, 3]);
    }

    #[test]
    fn test_alphabet_deduplicated() {
        let nfa = try_parse("abab|ba").unwrap();
        assert_eq!(nfa.alphabet(), &['a', 'b']);
    }

    #[test]
    fn test_epsilon_closure() {
        let nfa = try_parse("ab*c").unwrap();
        // a: 0->1, b: 2->3, star: 4..5, c: 6->7
        let closure = nfa.epsilon_closure(&StateSet::singleton(1));
        assert_eq!(closure, [1, 2, 4, 5, 6].iter().copied().collect::<StateSet>());
        let closure = nfa.epsilon_closure(&StateSet::singleton(0));
        assert_eq!(closure, StateSet::singleton(0));
    }

    #[test]
    fn test_state_set_canonical() {
        let a: StateSet = vec![3, 1, 2, 3, 1].into_iter().collect();
        let b: StateSet = vec![1, 2, 3].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert!(a.contains(2));
        assert!(!a.contains(4));
        assert_eq!(a.to_string(), "{1, 2, 3}");
    }

    #[test]
    fn test_transitions_listing() {
        let nfa = try_parse("a*").unwrap();
        let mut all: Vec<_> = nfa.transitions().collect();
        all.sort_unstable();
        assert_eq!(
            all,
            vec![
                (0, Symbol::Char('a'), 1),
                (1, Symbol::Epsilon, 0),
                (1, Symbol::Epsilon, 3),
                (2, Symbol::Epsilon, 0),
                (2, Symbol::Epsilon, 3),
            ]
        );
        assert!(nfa.to_readable_string().contains("State 2 (START)"));
        assert!(nfa.to_string().starts_with("NFA(4 states)"));
    }
}
