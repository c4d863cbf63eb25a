#![allow(clippy::uninlined_format_args)]

/// Test that \p pattern fails to compile with default flags.
pub fn test_parse_fails(pattern: &str) {
    let res = regdfa::Regex::new(pattern);
    assert!(res.is_err(), "Pattern should not have parsed: {}", pattern);
}

/// A compiled regex which remembers a TestConfig.
#[derive(Debug, Clone)]
pub struct TestCompiledRegex {
    re: regdfa::Regex,
    pattern: String,
    tc: TestConfig,
}

impl TestCompiledRegex {
    /// Access the compiled regex.
    pub fn regex(&self) -> &regdfa::Regex {
        &self.re
    }

    /// Test that \p input matches as a whole.
    #[track_caller]
    pub fn test_succeeds(&self, input: &str) {
        assert!(
            self.re.matches(input),
            "{} should have matched {:?} ({:?})",
            self.pattern,
            input,
            self.tc
        )
    }

    /// Test that \p input does not match as a whole.
    #[track_caller]
    pub fn test_fails(&self, input: &str) {
        assert!(
            !self.re.matches(input),
            "{} should not have matched {:?} ({:?})",
            self.pattern,
            input,
            self.tc
        )
    }

    /// \return the matching prefix of \p input found by `partial`.
    pub fn partial_str<'b>(&self, input: &'b str) -> &'b str {
        prefix(input, self.re.partial(input))
    }

    /// \return the matching prefix of \p input found by `greedy`.
    pub fn greedy_str<'b>(&self, input: &'b str) -> &'b str {
        prefix(input, self.re.greedy(input))
    }
}

/// \return the first \p len chars of \p input.
pub fn prefix(input: &str, len: usize) -> &str {
    match input.char_indices().nth(len) {
        Some((end, _)) => &input[..end],
        None => input,
    }
}

/// Description of how to test a regex.
#[derive(Debug, Copy, Clone)]
pub struct TestConfig {
    // Whether to memoize epsilon closures.
    cache: bool,

    // Whether to set a (generous) DFA state limit.
    limited: bool,
}

impl TestConfig {
    fn flags(&self) -> regdfa::Flags {
        regdfa::Flags {
            no_cache: !self.cache,
            max_dfa_states: if self.limited { Some(4096) } else { None },
        }
    }

    /// Compile a pattern to a regex.
    #[track_caller]
    pub fn compile(&self, pattern: &str) -> TestCompiledRegex {
        let re = regdfa::Regex::with_flags(pattern, self.flags());
        assert!(
            re.is_ok(),
            "Failed to parse! pattern: {}, config: {:?}, error: {}",
            pattern,
            self,
            re.as_ref().unwrap_err()
        );
        TestCompiledRegex {
            re: re.unwrap(),
            pattern: pattern.to_string(),
            tc: *self,
        }
    }

    /// Test that \p pattern successfully parses, and matches \p input.
    #[track_caller]
    pub fn test_match_succeeds(&self, pattern: &str, input: &str) {
        self.compile(pattern).test_succeeds(input)
    }

    /// Test that \p pattern successfully parses, and does not match \p input.
    #[track_caller]
    pub fn test_match_fails(&self, pattern: &str, input: &str) {
        self.compile(pattern).test_fails(input)
    }
}

/// Invoke \p F with each test config, in turn.
pub fn test_with_configs<F>(func: F)
where
    F: Fn(TestConfig),
{
    func(TestConfig {
        cache: true,
        limited: false,
    });
    func(TestConfig {
        cache: false,
        limited: false,
    });
    func(TestConfig {
        cache: true,
        limited: true,
    });
}
