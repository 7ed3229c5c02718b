use std::io::Write;

use dotenv::dotenv;
use log::debug;
use paw_quiz::config::Config;
use paw_quiz::quiz::{questions, AnimationState, Phase, QuizController, QuizSession};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinHandle;

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Select(usize),
    Next,
    Prev,
    Restart,
    Quit,
}

impl Command {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "n" | "next" => Some(Command::Next),
            "p" | "prev" => Some(Command::Prev),
            "r" | "restart" => Some(Command::Restart),
            "q" | "quit" => Some(Command::Quit),
            other => match other.parse::<usize>() {
                // options are shown 1-based
                Ok(n) if n > 0 => Some(Command::Select(n - 1)),
                _ => None,
            },
        }
    }
}

#[tokio::main]
async fn main() -> HandlerResult {
    dotenv().ok();
    pretty_env_logger::init();
    log::info!("Starting quiz...");

    let config = Config::from_env()?;
    debug!("Loaded config: {:?}", config);

    let controller = QuizController::new(questions::built_in()?)?;
    let mut session = QuizSession::new(controller, config.animation);
    let mut reveal: Option<JoinHandle<()>> = None;

    render_question(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = Command::parse(&line) else {
            println!("{}", UNKNOWN_COMMAND_TEXT);
            continue;
        };
        if command == Command::Quit {
            break;
        }

        step(&mut session, &mut reveal, command, &std::io::stdout);
    }

    stop_reveal(&mut reveal);
    log::info!("Bye!");
    Ok(())
}

/// Applies one command and redraws whatever it changed. `output` opens the
/// writer the score reveal prints to.
fn step<W, F>(
    session: &mut QuizSession,
    reveal: &mut Option<JoinHandle<()>>,
    command: Command,
    output: &F,
) where
    W: Write + Send + 'static,
    F: Fn() -> W,
{
    if command == Command::Restart {
        // the reset publishes a zero frame, the reveal must not print it
        stop_reveal(reveal);
    }

    let was_results = session.phase() == Phase::Results;
    handle_command(session, command);

    match (was_results, session.phase()) {
        (false, Phase::Results) => *reveal = Some(spawn_reveal(session.subscribe(), output())),
        (true, Phase::InProgress { .. }) => {
            stop_reveal(reveal);
            println!();
            render_question(session);
        }
        (false, Phase::InProgress { .. }) => render_question(session),
        (true, Phase::Results) if session.animation().is_finished() => {
            println!("\n{}", RESTART_HINT_TEXT)
        }
        // still counting, the reveal task owns the screen
        (true, Phase::Results) => {}
    }
}

fn stop_reveal(reveal: &mut Option<JoinHandle<()>>) {
    if let Some(task) = reveal.take() {
        task.abort();
    }
}

fn handle_command(session: &mut QuizSession, command: Command) {
    match command {
        Command::Select(option) => session.select_option(option),
        Command::Next => session.advance(),
        Command::Prev => session.retreat(),
        Command::Restart => session.restart(),
        // handled by the input loop
        Command::Quit => {}
    }
}

const TITLE_TEXT: &str = "Test Your Knowledge";
const SUBTITLE_TEXT: &str = "Answer all questions to see your results";
const MASCOT_TEXT: &str = "Best of Luck!";
const BADGE_TEXT: &str = "Keep Learning!";
const SCORE_TITLE_TEXT: &str = "Your Final score is";
const RESTART_HINT_TEXT: &str = "Start Again? Type 'r' to restart or 'q' to quit.";
const UNKNOWN_COMMAND_TEXT: &str =
    "Type an option number, 'n' for next, 'p' for previous, 'r' to restart or 'q' to quit.";

fn render_question(session: &QuizSession) {
    let quiz = session.controller();
    let question = quiz.current_question();

    let progress = quiz
        .progress()
        .iter()
        .map(|active| if *active { "■" } else { "□" })
        .collect::<Vec<_>>()
        .join(" ");

    println!("\n{}\n{}\n", TITLE_TEXT, SUBTITLE_TEXT);
    println!("{}\n", progress);
    println!("{}.  {}", quiz.current_index() + 1, question.prompt);
    for (i, option) in question.options.iter().enumerate() {
        let marker = if quiz.selection() == Some(i) { "(•)" } else { "( )" };
        println!("  {} {}. {}", marker, i + 1, option);
    }

    let prev = if quiz.can_retreat() { "[p] <" } else { "    " };
    let next = if quiz.can_advance() { "> [n]" } else { "" };
    println!("\n{}  {}", prev, next);
    println!("🐾 {}", MASCOT_TEXT);
}

/// Prints the counting score until the animation finishes.
fn spawn_reveal<W>(frames: watch::Receiver<AnimationState>, mut out: W) -> JoinHandle<()>
where
    W: Write + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(err) = print_reveal(frames, &mut out).await {
            debug!("Score reveal stopped: {}", err);
        }
    })
}

async fn print_reveal<W: Write>(
    mut frames: watch::Receiver<AnimationState>,
    out: &mut W,
) -> std::io::Result<()> {
    writeln!(out, "\n{}\n\n{}", BADGE_TEXT, SCORE_TITLE_TEXT)?;
    loop {
        let state = *frames.borrow_and_update();
        write!(out, "\r{:>3}%", state.displayed)?;
        out.flush()?;
        if state.is_finished() {
            writeln!(out, "\n\n{}", RESTART_HINT_TEXT)?;
            return Ok(());
        }
        if frames.changed().await.is_err() {
            return Ok(());
        }
    }
}
