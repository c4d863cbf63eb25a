//! NFA execution backend: simulates the NFA directly on sets of states,
//! without building a DFA.

use crate::automata::nfa::{Nfa, StateSet};

/// Execute the NFA against \p text.
/// \return whether the whole of the text is accepted.
pub fn execute_nfa(nfa: &Nfa, text: &str) -> bool {
    let mut current = nfa.epsilon_closure(&StateSet::singleton(nfa.start()));
    for c in text.chars() {
        let next = nfa.step(&current, c);
        if next.is_empty() {
            return false;
        }
        current = nfa.epsilon_closure(&next);
    }
    current.contains(nfa.accept())
}

/// Execute the NFA against \p text.
/// \return the length in chars of the longest accepted prefix, if any.
pub fn longest_prefix_nfa(nfa: &Nfa, text: &str) -> Option<usize> {
    let mut current = nfa.epsilon_closure(&StateSet::singleton(nfa.start()));
    let mut longest = current.contains(nfa.accept()).then_some(0);
    for (pos, c) in text.chars().enumerate() {
        let next = nfa.step(&current, c);
        if next.is_empty() {
            break;
        }
        current = nfa.epsilon_closure(&next);
        if current.contains(nfa.accept()) {
            longest = Some(pos + 1);
        }
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::try_parse;

    #[test]
    fn test_simple_match() {
        let nfa = try_parse("abc").unwrap();
        assert!(execute_nfa(&nfa, "abc"));
        assert!(!execute_nfa(&nfa, "def"));
        assert!(!execute_nfa(&nfa, "ab"));
        assert!(!execute_nfa(&nfa, "abcd"));
    }

    #[test]
    fn test_alternation() {
        let nfa = try_parse("abc|def").unwrap();
        assert!(execute_nfa(&nfa, "abc"));
        assert!(execute_nfa(&nfa, "def"));
        assert!(!execute_nfa(&nfa, "ghi"));
    }

    #[test]
    fn test_longest_prefix() {
        let nfa = try_parse("ab*c").unwrap();
        assert_eq!(longest_prefix_nfa(&nfa, "abbbcx"), Some(5));
        assert_eq!(longest_prefix_nfa(&nfa, "x"), None);
        let nfa = try_parse("(a|b)*").unwrap();
        assert_eq!(longest_prefix_nfa(&nfa, ""), Some(0));
    }
}
