mod args;
mod logging;
mod vm;

use std::sync::{Arc, Mutex};

use services::{Clock, Countdown, QuizLoopService, SessionError, SharedSession};
use storage::{BuiltinQuestionBank, JsonQuestionBank, QuestionBankRepository};
use tokio::io::{AsyncBufReadExt, BufReader};

use args::{Args, Command, print_usage};
use logging::{LogConfig, init_logging};
use vm::{QuestionView, QuizIntent, QuizVm, StepOutcome, format_remaining};

/// Remaining-time marks at which the host prints a reminder.
const TIME_WARNINGS: [u32; 2] = [60, 10];

fn print_question(session: &SharedSession) -> Result<(), SessionError> {
    let guard = session.lock().map_err(|_| SessionError::Lock)?;
    if let Some(view) = QuestionView::from_session(&guard) {
        println!();
        println!("{}", view.render());
    }
    Ok(())
}

fn print_finished(session: &SharedSession) -> Result<(), SessionError> {
    let guard = session.lock().map_err(|_| SessionError::Lock)?;
    let progress = guard.progress();
    println!();
    println!(
        "Quiz finished. Answered {} of {} questions with {} left on the clock.",
        progress.answered,
        progress.total,
        format_remaining(progress.remaining_seconds)
    );
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = match Args::parse() {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            return Err(e.into());
        }
    };

    init_logging(&LogConfig::from_verbosity(args.verbosity));

    let bank: Arc<dyn QuestionBankRepository> = match &args.bank_path {
        Some(path) => Arc::new(JsonQuestionBank::new(path)),
        None => Arc::new(BuiltinQuestionBank::new()),
    };
    let service = QuizLoopService::new(Clock::system(), bank);

    let session = match service.start_quiz(args.config()).await {
        Ok(session) => session,
        Err(SessionError::EmptyBank) => {
            println!("No questions available.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    if let Some(config) = session.configuration() {
        println!(
            "Starting quiz: {} questions, {}{}.",
            session.total_questions(),
            config.time_limit(),
            if config.randomize() { ", shuffled" } else { "" }
        );
    }

    let session: SharedSession = Arc::new(Mutex::new(session));
    let mut countdown = Countdown::new().spawn(Arc::clone(&session))?;
    let mut remaining = countdown.subscribe();
    let mut timer_open = true;
    let vm = QuizVm::new(args.strict);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_question(&session)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    println!("Quiz abandoned.");
                    return Ok(());
                };
                let outcome = {
                    let mut guard = session.lock().map_err(|_| SessionError::Lock)?;
                    let intent = QuizIntent::parse(&line, guard.current_question());
                    vm.apply(&mut guard, intent)
                };
                match outcome {
                    StepOutcome::Answered | StepOutcome::NextQuestion => print_question(&session)?,
                    StepOutcome::Finished => break,
                    StepOutcome::AlreadyAnswered => {
                        println!("Answer already locked. Press Enter for the next question.");
                    }
                    StepOutcome::NotAnswered => println!("Pick an answer first."),
                    StepOutcome::InvalidOption(key) => println!("{key} is not one of the options."),
                    StepOutcome::Help => print_usage(),
                    StepOutcome::Quit => {
                        println!("Quiz abandoned.");
                        countdown.cancel();
                        return Ok(());
                    }
                }
            }
            changed = remaining.changed(), if timer_open => {
                if changed.is_err() {
                    timer_open = false;
                    continue;
                }
                let seconds = *remaining.borrow_and_update();
                if TIME_WARNINGS.contains(&seconds) {
                    println!("\n{} left.", format_remaining(seconds));
                }
            }
            end = countdown.wait() => {
                let end = end?;
                tracing::debug!(?end, "countdown stopped");
                break;
            }
        }
    }

    countdown.cancel();
    print_finished(&session)?;
    Ok(())
}

fn main() {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let result = runtime.block_on(run());
    // The stdin reader may still be parked in a blocking read.
    runtime.shutdown_background();

    if let Err(err) = result {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
