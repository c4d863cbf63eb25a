#![allow(clippy::uninlined_format_args)]

use log::info;
use regdfa::backends::Dfa;
#[cfg(feature = "nfa")]
use regdfa::backends::Nfa;
use regdfa::{backends, Error, Flags, Regex};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "regdfa-tool")]
struct Opt {
    /// The regular expression.
    pattern: String,

    /// Report the shortest matching prefix instead of a whole-string match.
    #[structopt(long, conflicts_with = "greedy")]
    partial: bool,

    /// Report the longest matching prefix instead of a whole-string match.
    #[structopt(long, conflicts_with = "partial")]
    greedy: bool,

    /// Do not cache epsilon closures while building the DFA.
    #[structopt(long)]
    no_cache: bool,

    /// Fail if the DFA would have more than this many states.
    #[structopt(long)]
    max_dfa_states: Option<usize>,

    /// Dump the postfix form of the pattern to stdout.
    #[structopt(long)]
    dump_postfix: bool,

    /// Dump the NFA to stdout.
    #[structopt(long)]
    dump_nfa: bool,

    /// Dump the DFA to stdout.
    #[structopt(long)]
    dump_dfa: bool,

    /// Dump all regular expression compilation phases to stdout.
    #[structopt(long)]
    dump_phases: bool,

    /// Simulate the NFA instead of running the DFA. Only whole-string matches
    /// and --greedy are supported.
    #[structopt(long, conflicts_with = "partial")]
    nfa: bool,

    /// The input values to match against.
    #[structopt(conflicts_with_all = &["bench", "file"])]
    inputs: Vec<String>,

    /// Match against the contents of a specified file.
    #[structopt(long, conflicts_with_all = &["bench", "inputs"])]
    file: Option<PathBuf>,

    /// Benchmark matching each line of the specified file.
    #[structopt(long, conflicts_with_all = &["file", "inputs"])]
    bench: Option<PathBuf>,
}

/// Which of the three matching policies to run.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Mode {
    Exact,
    Partial,
    Greedy,
}

impl Mode {
    fn from_opt(args: &Opt) -> Self {
        if args.partial {
            Mode::Partial
        } else if args.greedy {
            Mode::Greedy
        } else {
            Mode::Exact
        }
    }
}

fn format_prefix(input: &str, len: Option<usize>) -> String {
    match len {
        Some(len) => {
            let prefix: String = input.chars().take(len).collect();
            format!("Match: \"{}\" (0..{})", prefix, len)
        }
        None => "No match".to_string(),
    }
}

fn exec_re_on_string(re: &Regex, mode: Mode, input: &str) {
    match mode {
        Mode::Exact => {
            if re.matches(input) {
                println!("Match: \"{}\"", input);
            } else {
                println!("No match");
            }
        }
        Mode::Partial => println!("{}", format_prefix(input, re.shortest_match(input))),
        Mode::Greedy => println!("{}", format_prefix(input, re.longest_match(input))),
    }
}

#[cfg(feature = "nfa")]
fn exec_nfa_on_string(nfa: &Nfa, mode: Mode, input: &str) {
    match mode {
        Mode::Greedy => println!(
            "{}",
            format_prefix(input, backends::longest_prefix_nfa(nfa, input))
        ),
        _ => {
            if backends::execute_nfa(nfa, input) {
                println!("Match: \"{}\"", input);
            } else {
                println!("No match");
            }
        }
    }
}

fn bench_re_on_path(re: &Regex, mode: Mode, path: &Path) {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            println!("{}: {}", err, path.display());
            return;
        }
    };
    let run = || -> usize {
        contents
            .lines()
            .map(|line| match mode {
                Mode::Exact => re.matches(line) as usize,
                Mode::Partial => re.partial(line),
                Mode::Greedy => re.greedy(line),
            })
            .sum()
    };
    // Warmup
    run();
    let start = Instant::now();
    for _ in 0..25 {
        run();
    }
    let duration = start.elapsed();
    println!("{} ms", duration.as_millis());
}

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = Opt::from_args();
    let mode = Mode::from_opt(&args);
    let flags = Flags {
        no_cache: args.no_cache,
        max_dfa_states: args.max_dfa_states,
    };

    if args.dump_phases || args.dump_postfix {
        println!("Postfix:\n{}", backends::try_parse_postfix(&args.pattern)?);
    }

    let nfa = backends::try_parse(&args.pattern)?;
    if args.dump_phases || args.dump_nfa {
        println!("NFA:\n{}", nfa.to_readable_string());
    }

    if args.nfa && !cfg!(feature = "nfa") {
        println!("NFA backend not available. Compile with --features nfa");
        std::process::exit(1);
    }

    #[cfg(feature = "nfa")]
    if args.nfa {
        if let Some(ref path) = args.file {
            match fs::read_to_string(path) {
                Ok(contents) => exec_nfa_on_string(&nfa, mode, contents.as_str()),
                Err(err) => println!("{}: {}", err, path.display()),
            };
        } else {
            for input in &args.inputs {
                exec_nfa_on_string(&nfa, mode, input);
            }
        }
        return Ok(());
    }

    let dfa = Dfa::try_from(&nfa, flags)?;
    info!(
        "{} NFA states, {} DFA states",
        nfa.len(),
        dfa.state_count()
    );
    if args.dump_phases || args.dump_dfa {
        println!("DFA:\n{}", dfa.to_readable_string());
    }
    let re = Regex::from(dfa);

    if let Some(ref path) = args.file {
        match fs::read_to_string(path) {
            Ok(contents) => exec_re_on_string(&re, mode, contents.as_str()),
            Err(err) => println!("{}: {}", err, path.display()),
        };
    } else if let Some(ref path) = args.bench {
        bench_re_on_path(&re, mode, path);
    } else {
        for input in &args.inputs {
            exec_re_on_string(&re, mode, input);
        }
    }
    Ok(())
}
