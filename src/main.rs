use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};

use gatemark::config::Config;
use gatemark::language::{Document, GateKind, GateRef};
use gatemark::parsing;
use gatemark::progress::{storage_key, FileStorage, Outcome, Session};
use gatemark::templating::{self, Fragment, Page};

mod problem;

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let filename = || {
        Arg::new("filename")
            .required(true)
            .help("The gatemark document.")
    };

    let matches = Command::new("gatemark")
        .version(VERSION)
        .propagate_version(true)
        .author("Andrew Cowie")
        .about("Quiz documents with gated problems, compiled to HTML.")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .default_value("gatemark.toml")
                .help("Configuration file with labels, messages, and defaults."),
        )
        .arg(
            Arg::new("state-dir")
                .long("state-dir")
                .global(true)
                .default_value(".gatemark")
                .help("Directory where learner progress is saved."),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log what is going on to stderr."),
        )
        .subcommand(
            Command::new("check")
                .about("Compile the given document and report any problems found")
                .arg(filename()),
        )
        .subcommand(
            Command::new("render")
                .about("Compile the given document to HTML")
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Write to this file instead of stdout."),
                )
                .arg(
                    Arg::new("standalone")
                        .long("standalone")
                        .action(ArgAction::SetTrue)
                        .help("Emit a complete page rather than just the document body."),
                )
                .arg(
                    Arg::new("progress")
                        .long("progress")
                        .action(ArgAction::SetTrue)
                        .help("Render only what the learner can currently see, with their answers filled in."),
                )
                .arg(
                    Arg::new("stylesheet")
                        .long("stylesheet")
                        .help("Link this stylesheet from the standalone page."),
                )
                .arg(filename()),
        )
        .subcommand(
            Command::new("answer")
                .about("Check an answer to a problem or the password of a wait gate")
                .arg(
                    Arg::new("problem")
                        .long("problem")
                        .value_parser(clap::value_parser!(u32))
                        .help("Number of the problem being answered."),
                )
                .arg(
                    Arg::new("wait")
                        .long("wait")
                        .value_parser(clap::value_parser!(u32))
                        .help("Number of the wait gate being unlocked."),
                )
                .group(
                    ArgGroup::new("gate")
                        .args(["problem", "wait"])
                        .required(true),
                )
                .arg(filename())
                .arg(
                    Arg::new("input")
                        .default_value("")
                        .help("The answer or password."),
                ),
        )
        .subcommand(
            Command::new("skip")
                .about("Give up on a problem and have its answer filled in; further skips wait out the cooldown")
                .arg(
                    Arg::new("yes")
                        .short('y')
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Don't ask for confirmation."),
                )
                .arg(filename())
                .arg(
                    Arg::new("number")
                        .required(true)
                        .value_parser(clap::value_parser!(u32))
                        .help("Number of the problem to skip."),
                ),
        )
        .subcommand(
            Command::new("progress")
                .about("Show the score and solved answers for the given document")
                .arg(
                    Arg::new("reset")
                        .long("reset")
                        .action(ArgAction::SetTrue)
                        .help("Forget all saved progress for the document."),
                )
                .arg(filename()),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let config = match matches.get_one::<String>("config") {
        Some(path) => match Config::load(Path::new(path)) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("{}", problem::concise_config_error(&error));
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    let state = matches
        .get_one::<String>("state-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".gatemark"));

    match matches.subcommand() {
        Some(("check", submatches)) => {
            let filename = required_filename(submatches);
            let content = read(&filename);
            let document = parsing::compile(&content, &config);

            if document
                .diagnostics
                .is_empty()
            {
                info!("No problems found in {}", filename.display());
                return;
            }

            for diagnostic in &document.diagnostics {
                eprintln!(
                    "{}\n",
                    problem::full_diagnostic(diagnostic, &filename, &content)
                );
            }
            std::process::exit(1);
        }
        Some(("render", submatches)) => {
            let filename = required_filename(submatches);
            let content = read(&filename);
            let document = parsing::compile(&content, &config);

            for diagnostic in &document.diagnostics {
                eprintln!(
                    "{}",
                    problem::concise_diagnostic(diagnostic, &filename, &content)
                );
            }

            let session = open_session(&document, &config, &state, &filename);

            let body = if submatches.get_flag("progress") {
                session.render()
            } else {
                document.html()
            };

            let result = if submatches.get_flag("standalone") {
                let title = title_of(&filename);
                let mut page = Page::new(&title);
                page.stylesheet = submatches
                    .get_one::<String>("stylesheet")
                    .map(String::as_str);
                page.correct = session
                    .snapshot()
                    .correct_problems_count;
                page.sidebar = session
                    .snapshot()
                    .is_sidebar_visible;
                templating::fill(&page, &document, &body)
            } else {
                templating::fill(&Fragment, &document, &body)
            };

            let html = match result {
                Ok(html) => html,
                Err(error) => {
                    eprintln!("{}: {}", "error".bright_red(), error);
                    std::process::exit(1);
                }
            };

            match submatches.get_one::<String>("output") {
                Some(output) => {
                    if let Err(error) = std::fs::write(output, html) {
                        eprintln!("{}: {}: {}", "error".bright_red(), output, error);
                        std::process::exit(1);
                    }
                    debug!("Wrote {}", output);
                }
                None => print!("{}", html),
            }
        }
        Some(("answer", submatches)) => {
            let filename = required_filename(submatches);
            let content = read(&filename);
            let document = parsing::compile(&content, &config);
            let mut session = open_session(&document, &config, &state, &filename);

            let input = submatches
                .get_one::<String>("input")
                .map(String::as_str)
                .unwrap_or("");

            let (reference, outcome) = match submatches.get_one::<u32>("wait") {
                Some(id) => (GateRef::wait(*id), session.check_wait_condition(*id, input)),
                None => {
                    let id = submatches
                        .get_one::<u32>("problem")
                        .copied()
                        .unwrap_or(0);
                    (GateRef::problem(id), session.check_problem_answer(id, input))
                }
            };

            report(&session, reference, &outcome);
        }
        Some(("skip", submatches)) => {
            let filename = required_filename(submatches);
            let content = read(&filename);
            let document = parsing::compile(&content, &config);
            let mut session = open_session(&document, &config, &state, &filename);

            let id = submatches
                .get_one::<u32>("number")
                .copied()
                .unwrap_or(0);
            let assume = submatches.get_flag("yes");

            let outcome = session.skip_problem(id, |question| assume || confirm(question));

            report(&session, GateRef::problem(id), &outcome);
        }
        Some(("progress", submatches)) => {
            let filename = required_filename(submatches);
            let content = read(&filename);
            let document = parsing::compile(&content, &config);
            let mut session = open_session(&document, &config, &state, &filename);

            if submatches.get_flag("reset") {
                session.clear();
                println!("Progress for {} cleared.", filename.display());
                return;
            }

            let snapshot = session.snapshot();
            println!(
                "Score: {} / {}",
                snapshot.correct_problems_count, snapshot.total_problems_count
            );
            println!("Skipped: {}", snapshot.skip_count);

            for solved in session.solved_answers() {
                println!("{}: {}", solved.gate, solved.answers.join(", "));
            }
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: gatemark [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn required_filename(submatches: &ArgMatches) -> PathBuf {
    match submatches.get_one::<String>("filename") {
        Some(filename) => PathBuf::from(filename),
        None => {
            eprintln!("{}: a filename is required", "error".bright_red());
            std::process::exit(1);
        }
    }
}

fn read(filename: &Path) -> String {
    match parsing::load(filename) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("{}", problem::concise_loading_error(&error));
            std::process::exit(1);
        }
    }
}

fn title_of(filename: &Path) -> String {
    filename
        .file_stem()
        .map(|stem| {
            stem.to_string_lossy()
                .to_string()
        })
        .unwrap_or_else(|| "gatemark".to_string())
}

fn open_session<'d>(
    document: &'d Document,
    config: &'d Config,
    state: &Path,
    filename: &Path,
) -> Session<'d, FileStorage> {
    let location = filename.to_string_lossy();
    let key = storage_key(&location, &config.defaults.storage_prefix);
    debug!(key = %key, "Progress key");

    Session::load(document, &config.messages, FileStorage::new(state), &key)
}

fn confirm(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if io::stdout()
        .flush()
        .is_err()
    {
        return false;
    }

    let mut line = String::new();
    match io::stdin()
        .lock()
        .read_line(&mut line)
    {
        Ok(_) => matches!(
            line.trim()
                .to_lowercase()
                .as_str(),
            "y" | "yes"
        ),
        Err(_) => false,
    }
}

fn report(session: &Session<'_, FileStorage>, reference: GateRef, outcome: &Outcome) {
    let snapshot = session.snapshot();

    let result = match reference.kind {
        GateKind::Problem => snapshot
            .problem_states
            .get(&reference.id)
            .map(|state| state.result_text.as_str()),
        GateKind::Wait => snapshot
            .wait_states
            .get(&reference.id)
            .map(|state| state.result_text.as_str()),
    };

    match outcome {
        Outcome::Correct | Outcome::Unlocked => {
            println!("{}", result.unwrap_or("").bright_green())
        }
        Outcome::Incorrect | Outcome::WrongPassword => {
            println!("{}", result.unwrap_or("").bright_red())
        }
        Outcome::Empty | Outcome::EmptyPassword => {
            println!("{}", result.unwrap_or("").yellow())
        }
        Outcome::Skipped { answer, cooldown } => {
            println!("{}", result.unwrap_or(""));
            println!("Answer: {}", answer.bold());
            debug!(?cooldown, "Skipping locked");
        }
        Outcome::AlreadySolved => println!("{} is already solved.", reference),
        Outcome::CoolingDown => println!("Skipping is cooling down; try again shortly."),
        Outcome::Declined => println!("Not skipped."),
        Outcome::UnknownGate(reference) => {
            eprintln!("{}: no {} in this document", "error".bright_red(), reference);
            std::process::exit(1);
        }
        Outcome::CooldownOver | Outcome::SidebarToggled(_) => {}
    }
}
