//! Formatting helpers shared by the automaton dumps.

use crate::automata::nfa::Symbol;

/// Format a single char in a readable way
pub(super) fn format_char(c: char) -> String {
    match c {
        ' ' => "'\\s'".to_string(),
        '\t' => "'\\t'".to_string(),
        '\n' => "'\\n'".to_string(),
        '\r' => "'\\r'".to_string(),
        '\\' => "'\\\\'".to_string(),
        '\'' => "'\\''".to_string(),
        c if c.is_control() => format!("U+{:04X}", c as u32),
        c => format!("'{}'", c),
    }
}

/// Format a transition label, epsilon included.
pub(super) fn format_symbol(symbol: Symbol) -> String {
    match symbol {
        Symbol::Epsilon => "ε".to_string(),
        Symbol::Char(c) => format_char(c),
    }
}
