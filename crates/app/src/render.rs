use std::fmt::Write as _;

use services::{
    ChoiceState, QuestionPhase, QuestionView, QuizSummary, SessionSnapshot, SessionStatus,
};
use trivia_core::model::{CategoryCatalog, Difficulty};

/// How much of the screen a new snapshot needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    Full,
    /// Only the countdown moved.
    Timer,
    Nothing,
}

#[must_use]
pub fn redraw(previous: Option<&SessionSnapshot>, next: &SessionSnapshot) -> Redraw {
    let Some(previous) = previous else {
        return Redraw::Full;
    };
    if previous.status != next.status {
        return Redraw::Full;
    }

    match (&previous.question, &next.question) {
        (Some(a), Some(b)) if a.index == b.index && a.phase == b.phase => {
            if a.remaining_secs == b.remaining_secs {
                Redraw::Nothing
            } else {
                Redraw::Timer
            }
        }
        (None, None) => Redraw::Nothing,
        _ => Redraw::Full,
    }
}

#[must_use]
pub fn categories(catalog: &CategoryCatalog) -> String {
    let mut out = String::from("Categories:\n");
    for (number, category) in catalog.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}) {}", number + 1, category.name());
    }
    out
}

#[must_use]
pub fn difficulties() -> String {
    let mut out = String::from("Difficulty:\n");
    for (number, difficulty) in Difficulty::ALL.iter().enumerate() {
        let _ = writeln!(out, "  {}) {difficulty}", number + 1);
    }
    out
}

#[must_use]
pub fn snapshot(snapshot: &SessionSnapshot) -> String {
    match snapshot.status {
        SessionStatus::Loading => format!(
            "Loading {} questions about {}...\n",
            snapshot.difficulty, snapshot.category
        ),
        SessionStatus::LoadFailed => {
            let message = snapshot
                .failure
                .as_ref()
                .map_or("Failed to load questions", |(message, _)| message.as_str());
            format!("\n{message}\n")
        }
        SessionStatus::Ready => snapshot
            .question
            .as_ref()
            .map(|view| question(view, snapshot.score))
            .unwrap_or_default(),
        SessionStatus::Finished => snapshot
            .outcome
            .and_then(|outcome| outcome.summary())
            .map(summary)
            .unwrap_or_default(),
        SessionStatus::Abandoned => String::from("\nQuiz abandoned.\n"),
    }
}

#[must_use]
pub fn question(view: &QuestionView, score: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nQuestion {}/{} | {} | {} | score {score}",
        view.index + 1,
        view.total,
        view.category,
        view.difficulty,
    );
    let _ = writeln!(out, "{}\n", view.prompt);

    for (number, choice) in view.choices.iter().enumerate() {
        let mark = match choice.state {
            ChoiceState::Neutral => "",
            ChoiceState::Correct => "  <- correct",
            ChoiceState::Incorrect => "  <- your answer",
        };
        let _ = writeln!(out, "  {}) {}{mark}", number + 1, choice.text);
    }

    match view.phase {
        QuestionPhase::Answering => {
            out.push('\n');
            out.push_str(&timer(view));
        }
        QuestionPhase::Feedback => {
            out.push('\n');
            out.push_str(&verdict(view));
            out.push('\n');
            out.push_str(if view.is_last() {
                "Press n to see your score (q to quit): "
            } else {
                "Press n for the next question (q to quit): "
            });
        }
    }
    out
}

/// Prompt line carrying the countdown; starts with `\r` so it overwrites itself.
#[must_use]
pub fn timer(view: &QuestionView) -> String {
    format!(
        "\r[{:>2}s] Answer 1-{} (q to quit): ",
        view.remaining_secs,
        view.choices.len()
    )
}

fn verdict(view: &QuestionView) -> String {
    let answer = view
        .correct_position
        .and_then(|position| view.choices.get(position))
        .map_or("", |choice| choice.text.as_str());

    if view.timed_out() {
        format!("Time's up! The answer was: {answer}")
    } else if view.selected == view.correct_position {
        String::from("Correct!")
    } else {
        format!("Wrong. The answer was: {answer}")
    }
}

#[must_use]
pub fn summary(summary: QuizSummary) -> String {
    format!(
        "\nQuiz complete: {}/{} correct ({}%)\n",
        summary.score,
        summary.total,
        summary.percent()
    )
}
