//! Parser from regex patterns to NFAs
//!
//! The pattern is tokenized, explicit concatenation operators are inserted
//! between implicitly concatenated constructs, and the token stream is then
//! reduced with a two stack shunting-yard. Each reduction invokes one of the
//! Thompson construction primitives on the NFA builder.

use crate::automata::nfa::{Builder, Nfa, Operator};
use core::fmt;
use log::trace;

/// Represents an error encountered during regex compilation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A `)` without an opening `(`, or a `(` which is never closed.
    /// The offset is in chars, pointing at the offending parenthesis.
    #[error("Unbalanced parenthesis at offset {offset}")]
    UnbalancedParenthesis { offset: usize },

    /// An operator was reduced with fewer operands than it consumes.
    #[error("Missing operand for {operator}")]
    MissingOperand { operator: Operator },

    /// The pattern describes no automaton at all, for example `()`.
    #[error("Empty pattern")]
    EmptyPattern,

    /// Powerset construction produced more DFA states than allowed.
    #[error("DFA state limit of {limit} exceeded")]
    StateLimitExceeded { limit: usize },
}

/// A lexical element of a pattern, after concatenation has been made explicit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(char),
    Operator(Operator),
    Open,
    Close,
}

impl Token {
    fn from_char(c: char) -> Token {
        match c {
            '|' => Token::Operator(Operator::Union),
            '*' => Token::Operator(Operator::Star),
            '(' => Token::Open,
            ')' => Token::Close,
            c => Token::Literal(c),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Literal(c) => write!(f, "{}", c),
            Token::Operator(Operator::Concat) => f.write_str("·"),
            Token::Operator(Operator::Union) => f.write_str("|"),
            Token::Operator(Operator::Star) => f.write_str("*"),
            Token::Open => f.write_str("("),
            Token::Close => f.write_str(")"),
        }
    }
}

/// \return whether an explicit concatenation belongs between \p prev and \p next.
/// That is the case for ab, a(, )a, *a, *( and )(.
fn needs_concat(prev: Token, next: Token) -> bool {
    matches!(
        (prev, next),
        (
            Token::Literal(_) | Token::Close | Token::Operator(Operator::Star),
            Token::Literal(_) | Token::Open
        )
    )
}

/// Split \p pattern into tokens, paired with their char offsets.
/// Inserted concatenations take the offset of the token that follows them.
fn tokenize(pattern: &str) -> Vec<(usize, Token)> {
    let mut result: Vec<(usize, Token)> = Vec::with_capacity(pattern.len() * 2);
    for (offset, c) in pattern.chars().enumerate() {
        let token = Token::from_char(c);
        if let Some(&(_, prev)) = result.last() {
            if needs_concat(prev, token) {
                result.push((offset, Token::Operator(Operator::Concat)));
            }
        }
        result.push((offset, token));
    }
    result
}

/// An entry on the operator stack.
#[derive(Debug, Copy, Clone)]
enum Pending {
    Operator(Operator),
    /// An open parenthesis: its offset, for error reporting, and the operand
    /// depth when it was seen. Operators inside the group may not reach
    /// below that depth.
    Open { offset: usize, depth: usize },
}

/// Represents the state used to parse a regex.
struct Parser {
    /// Receives literals and operator reductions; owns the operand stack.
    builder: Builder,

    /// Operators and open parentheses not yet reduced.
    operators: Vec<Pending>,

    /// Literals and operators in the order they were reduced.
    postfix: Vec<Token>,
}

impl Parser {
    fn new() -> Self {
        Parser {
            builder: Builder::new(),
            operators: Vec::new(),
            postfix: Vec::new(),
        }
    }

    fn literal(&mut self, c: char) {
        self.builder.literal(c);
        self.postfix.push(Token::Literal(c));
    }

    fn reduce(&mut self, op: Operator) -> Result<(), Error> {
        let floor = self
            .operators
            .iter()
            .rev()
            .find_map(|pending| match *pending {
                Pending::Open { depth, .. } => Some(depth),
                Pending::Operator(_) => None,
            })
            .unwrap_or(0);
        if self.builder.depth() < floor + op.arity() {
            return Err(Error::MissingOperand { operator: op });
        }
        self.builder.apply(op)?;
        self.postfix.push(Token::Operator(op));
        Ok(())
    }

    /// Reduce every stacked operator binding at least as tightly as \p op,
    /// then stack \p op itself.
    fn operator(&mut self, op: Operator) -> Result<(), Error> {
        while let Some(&Pending::Operator(top)) = self.operators.last() {
            if top.precedence() < op.precedence() {
                break;
            }
            self.operators.pop();
            self.reduce(top)?;
        }
        self.operators.push(Pending::Operator(op));
        Ok(())
    }

    /// Reduce back to the matching open parenthesis, which is discarded.
    fn close(&mut self, offset: usize) -> Result<(), Error> {
        loop {
            match self.operators.pop() {
                Some(Pending::Open { .. }) => return Ok(()),
                Some(Pending::Operator(op)) => self.reduce(op)?,
                None => return Err(Error::UnbalancedParenthesis { offset }),
            }
        }
    }

    fn run(mut self, pattern: &str) -> Result<(Nfa, Vec<Token>), Error> {
        let tokens = tokenize(pattern);
        trace!(
            "tokens for {:?}: {}",
            pattern,
            tokens.iter().map(|(_, t)| t.to_string()).collect::<String>()
        );
        for (offset, token) in tokens {
            match token {
                Token::Literal(c) => self.literal(c),
                Token::Operator(op) => self.operator(op)?,
                Token::Open => self.operators.push(Pending::Open {
                    offset,
                    depth: self.builder.depth(),
                }),
                Token::Close => self.close(offset)?,
            }
        }
        while let Some(pending) = self.operators.pop() {
            match pending {
                Pending::Operator(op) => self.reduce(op)?,
                Pending::Open { offset, .. } => {
                    return Err(Error::UnbalancedParenthesis { offset })
                }
            }
        }
        let nfa = self.builder.finish()?;
        Ok((nfa, self.postfix))
    }
}

/// Try parsing a given pattern into an NFA.
/// Return the NFA, or an Error if the pattern is malformed.
pub fn try_parse(pattern: &str) -> Result<Nfa, Error> {
    Parser::new().run(pattern).map(|(nfa, _)| nfa)
}

/// Try parsing a given pattern, returning its literals and operators in
/// postfix (reduction) order. Concatenation is rendered as `·`.
pub fn try_parse_postfix(pattern: &str) -> Result<String, Error> {
    let (_, postfix) = Parser::new().run(pattern)?;
    Ok(postfix.iter().map(Token::to_string).collect())
}
