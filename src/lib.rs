/*!

# regdfa - regular expressions compiled to DFAs

This crate compiles a small regular expression language into a deterministic
finite automaton, and matches strings against it.

# Example: test if a string matches

```rust
use regdfa::Regex;
let re = Regex::new("ab*c(d|ef)*").unwrap();
assert!(re.matches("abbcefd"));
assert!(!re.matches("abbcf"));
```

# Example: matching a prefix

`greedy` returns the length of the longest matching prefix, and `partial` the
length of the shortest. Both count chars, and return 0 if no prefix matches.

```rust
use regdfa::Regex;
let re = Regex::new("(a|b)(a|b)*").unwrap();
assert_eq!(re.greedy("abba cab"), 4);
assert_eq!(re.partial("abba cab"), 1);
```

# Supported Syntax

- Any char other than `|`, `*`, `(` and `)` matches itself.
- `xy` matches `x` followed by `y`.
- `x|y` matches either `x` or `y`.
- `x*` matches zero or more repetitions of `x`.
- `(x)` groups.

`*` binds tighter than concatenation, which binds tighter than `|`.
There are no escapes, character classes, anchors or backreferences.

# Architecture

The pattern is parsed with a shunting-yard over an explicit operator stack.
Each reduction applies one step of Thompson's construction, producing an NFA
with epsilon transitions. The powerset construction turns the NFA into a DFA,
which is then walked a char at a time by the matchers.

Set `RUST_LOG=regdfa=trace` with a `log` implementation installed to watch
the DFA being constructed.

*/

#![warn(clippy::all)]

pub use crate::api::*;

mod api;
mod automata;
mod exec;
mod parse;
