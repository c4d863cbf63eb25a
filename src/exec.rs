//! Execution engine bits: table-driven walks over a DFA.

use crate::automata::dfa::{Dfa, DfaStateID, DEAD_STATE};
use core::str::Chars;

/// An iterator over the DFA states visited while consuming some text, one
/// per char. The walk yields the dead state at most once and then stops,
/// since no further input can leave it.
#[derive(Debug, Clone)]
pub struct Walk<'r, 't> {
    dfa: &'r Dfa,
    input: Chars<'t>,
    state: DfaStateID,
}

impl<'r, 't> Walk<'r, 't> {
    pub fn new(dfa: &'r Dfa, text: &'t str) -> Self {
        Walk {
            dfa,
            input: text.chars(),
            state: dfa.start(),
        }
    }
}

impl Iterator for Walk<'_, '_> {
    type Item = DfaStateID;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.state == DEAD_STATE {
            return None;
        }
        let c = self.input.next()?;
        self.state = self.dfa.next(self.state, c);
        Some(self.state)
    }
}

/// Runs the three matching policies over a DFA.
/// Lengths are counted in chars.
#[derive(Debug, Copy, Clone)]
pub struct DfaExecutor<'r> {
    dfa: &'r Dfa,
}

impl<'r> DfaExecutor<'r> {
    pub fn new(dfa: &'r Dfa) -> Self {
        DfaExecutor { dfa }
    }

    /// \return whether the whole of \p text is accepted.
    pub fn is_match(&self, text: &str) -> bool {
        let last = Walk::new(self.dfa, text).last();
        self.dfa.is_accepting(last.unwrap_or_else(|| self.dfa.start()))
    }

    /// \return the length of the shortest accepted prefix of \p text, stopping
    /// at the first accepting state the walk touches.
    pub fn shortest_match(&self, text: &str) -> Option<usize> {
        if self.dfa.is_accepting(self.dfa.start()) {
            return Some(0);
        }
        Walk::new(self.dfa, text)
            .position(|state| self.dfa.is_accepting(state))
            .map(|pos| pos + 1)
    }

    /// \return the length of the longest accepted prefix of \p text.
    /// This is a single forward walk remembering the last accepting offset.
    pub fn longest_match(&self, text: &str) -> Option<usize> {
        let mut last = self.dfa.is_accepting(self.dfa.start()).then_some(0);
        for (pos, state) in Walk::new(self.dfa, text).enumerate() {
            if self.dfa.is_accepting(state) {
                last = Some(pos + 1);
            }
        }
        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Flags;
    use crate::parse::try_parse;

    fn dfa(pattern: &str) -> Dfa {
        Dfa::try_from(&try_parse(pattern).unwrap(), Flags::default()).unwrap()
    }

    #[test]
    fn test_walk_stops_at_dead() {
        let dfa = dfa("ab");
        let states: Vec<_> = Walk::new(&dfa, "axxxx").collect();
        assert_eq!(states.len(), 2);
        assert_eq!(states[1], DEAD_STATE);
        assert_eq!(Walk::new(&dfa, "").count(), 0);
    }

    #[test]
    fn test_is_match() {
        let dfa = dfa("ab*c");
        let exec = DfaExecutor::new(&dfa);
        assert!(exec.is_match("ac"));
        assert!(exec.is_match("abbbc"));
        assert!(!exec.is_match("ab"));
        assert!(!exec.is_match("acc"));
        assert!(!exec.is_match(""));
    }

    #[test]
    fn test_shortest_match() {
        let dfa = dfa("a|b");
        let exec = DfaExecutor::new(&dfa);
        assert_eq!(exec.shortest_match("ba"), Some(1));
        assert_eq!(exec.shortest_match("c"), None);
        assert_eq!(exec.shortest_match(""), None);

        let dfa = self::dfa("a*");
        let exec = DfaExecutor::new(&dfa);
        assert_eq!(exec.shortest_match("aaa"), Some(0));
    }

    #[test]
    fn test_longest_match() {
        let dfa = dfa("ab*c");
        let exec = DfaExecutor::new(&dfa);
        assert_eq!(exec.longest_match("abbbcx"), Some(5));
        assert_eq!(exec.longest_match("abbb"), None);

        let dfa = self::dfa("a*");
        let exec = DfaExecutor::new(&dfa);
        assert_eq!(exec.longest_match("aaab"), Some(3));
        assert_eq!(exec.longest_match("b"), Some(0));
    }

    #[test]
    fn test_lengths_count_chars() {
        let dfa = dfa("é∞*");
        let exec = DfaExecutor::new(&dfa);
        assert_eq!(exec.longest_match("é∞∞x"), Some(3));
        assert_eq!(exec.shortest_match("é∞∞x"), Some(1));
    }
}
