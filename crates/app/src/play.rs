use std::io::{self, Write};
use std::sync::Arc;

use services::{
    QuestionPhase, QuestionSource, QuizController, QuizSession, QuizSettings, QuizSummary,
    SessionSnapshot, SessionStatus,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;
use trivia_core::model::{Category, CategoryCatalog, Difficulty};

use crate::prompt::{self, Pick, QuizInput};
use crate::render::{self, Redraw};

/// Line-oriented terminal: one async reader for input, one writer for output.
pub struct Terminal<R, W> {
    lines: Lines<R>,
    out: W,
}

impl Terminal<BufReader<Stdin>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), io::stdout())
    }
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: input.lines(),
            out,
        }
    }

    /// `None` once input is closed.
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        self.lines.next_line().await
    }

    fn show(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }

    #[cfg(test)]
    fn output(&self) -> &W {
        &self.out
    }
}

/// Selection given on the command line; each field is asked for when missing.
#[derive(Debug, Default, Clone)]
pub struct Preset {
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundEnd {
    Finished(QuizSummary),
    Abandoned,
    LoadFailed,
    InputClosed,
}

/// Play quizzes until the user declines another round or closes input.
///
/// Every round shares `source`, so repeating a selection is served from its cache.
pub async fn run<R, W>(
    source: Arc<QuestionSource>,
    catalog: &CategoryCatalog,
    settings: QuizSettings,
    mut preset: Preset,
    term: &mut Terminal<R, W>,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        let category = match preset.category.take() {
            Some(category) => category,
            None => match choose_category(term, catalog).await? {
                Some(category) => category,
                None => return Ok(()),
            },
        };
        let difficulty = match preset.difficulty.take() {
            Some(difficulty) => difficulty,
            None => match choose_difficulty(term).await? {
                Some(difficulty) => difficulty,
                None => return Ok(()),
            },
        };

        let session = QuizSession::new(category, difficulty, settings);
        let controller = QuizController::start(Arc::clone(&source), session);
        let end = run_round(&controller, term).await?;
        drop(controller);
        debug!(?end, "round ended");

        match end {
            RoundEnd::LoadFailed => continue,
            RoundEnd::InputClosed => return Ok(()),
            RoundEnd::Finished(_) | RoundEnd::Abandoned => {
                term.show("\nPlay again? [y/N]: ")?;
                match term.read_line().await? {
                    Some(line) if prompt::yes(&line) => {}
                    _ => return Ok(()),
                }
            }
        }
    }
}

async fn choose_category<R, W>(
    term: &mut Terminal<R, W>,
    catalog: &CategoryCatalog,
) -> io::Result<Option<Category>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    term.show(&render::categories(catalog))?;
    loop {
        term.show("Category (number or name, q to quit): ")?;
        let Some(line) = term.read_line().await? else {
            return Ok(None);
        };
        match prompt::category(catalog, &line) {
            Pick::Value(category) => return Ok(Some(category.clone())),
            Pick::Quit => return Ok(None),
            Pick::Retry(hint) => term.show(&format!("{hint}\n"))?,
        }
    }
}

async fn choose_difficulty<R, W>(term: &mut Terminal<R, W>) -> io::Result<Option<Difficulty>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    term.show(&render::difficulties())?;
    loop {
        term.show("Difficulty (number or name, q to quit): ")?;
        let Some(line) = term.read_line().await? else {
            return Ok(None);
        };
        match prompt::difficulty(&line) {
            Pick::Value(difficulty) => return Ok(Some(difficulty)),
            Pick::Quit => return Ok(None),
            Pick::Retry(hint) => term.show(&format!("{hint}\n"))?,
        }
    }
}

async fn run_round<R, W>(
    controller: &QuizController,
    term: &mut Terminal<R, W>,
) -> io::Result<RoundEnd>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut updates = controller.subscribe();
    let loading = render::snapshot(&updates.borrow_and_update());
    term.show(&loading)?;
    controller.loaded().await;
    let mut shown: Option<SessionSnapshot> = None;

    loop {
        let snapshot = updates.borrow_and_update().clone();
        match render::redraw(shown.as_ref(), &snapshot) {
            Redraw::Full => term.show(&render::snapshot(&snapshot))?,
            Redraw::Timer => {
                if let Some(view) = &snapshot.question {
                    term.show(&render::timer(view))?;
                }
            }
            Redraw::Nothing => {}
        }

        match snapshot.status {
            SessionStatus::Finished => {
                let summary = snapshot
                    .outcome
                    .and_then(|outcome| outcome.summary())
                    .unwrap_or(QuizSummary { score: 0, total: 0 });
                return Ok(RoundEnd::Finished(summary));
            }
            SessionStatus::Abandoned => return Ok(RoundEnd::Abandoned),
            SessionStatus::LoadFailed => {
                term.show("Press Enter to return to selection.")?;
                return Ok(match term.read_line().await? {
                    Some(_) => RoundEnd::LoadFailed,
                    None => RoundEnd::InputClosed,
                });
            }
            SessionStatus::Loading | SessionStatus::Ready => {}
        }
        shown = Some(snapshot);

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    return Ok(RoundEnd::Abandoned);
                }
            }
            line = term.read_line() => {
                let Some(line) = line? else {
                    controller.abandon();
                    return Ok(RoundEnd::InputClosed);
                };
                handle_input(controller, shown.as_ref(), &line, term)?;
            }
        }
    }
}

fn handle_input<R, W>(
    controller: &QuizController,
    shown: Option<&SessionSnapshot>,
    line: &str,
    term: &mut Terminal<R, W>,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let phase = shown
        .and_then(|snapshot| snapshot.question.as_ref())
        .map(|view| (view.phase, view.choices.len()));

    match (prompt::quiz_input(line), phase) {
        (QuizInput::Quit, _) => {
            controller.abandon();
        }
        (QuizInput::Choice(number), Some((QuestionPhase::Answering, count))) => {
            if controller.select_answer(number - 1).is_none() {
                term.show(&format!("Pick a number between 1 and {count}.\n"))?;
            }
        }
        (QuizInput::Next | QuizInput::Blank, Some((QuestionPhase::Feedback, _))) => {
            controller.next();
        }
        (_, Some((QuestionPhase::Answering, count))) => {
            term.show(&format!("Type a number between 1 and {count}, or q to quit.\n"))?;
        }
        (_, Some((QuestionPhase::Feedback, _))) => {
            term.show("Type n to continue, or q to quit.\n")?;
        }
        (_, None) => {
            term.show("Type q to quit.\n")?;
        }
    }
    Ok(())
}
