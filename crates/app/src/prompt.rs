use trivia_core::model::{Category, CategoryCatalog, Difficulty};

/// Result of interpreting one line typed at a selection prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pick<T> {
    Value(T),
    Quit,
    Retry(String),
}

/// A line typed while a quiz is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizInput {
    /// 1-based choice number.
    Choice(usize),
    Next,
    Quit,
    Blank,
    Unknown,
}

fn is_quit(input: &str) -> bool {
    input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit")
}

/// Accepts a 1-based list number or a category name.
pub fn category<'a>(catalog: &'a CategoryCatalog, line: &str) -> Pick<&'a Category> {
    let input = line.trim();
    if is_quit(input) {
        return Pick::Quit;
    }

    if let Ok(number) = input.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|index| catalog.get(index))
            .map_or_else(
                || Pick::Retry(format!("Pick a number between 1 and {}.", catalog.len())),
                Pick::Value,
            );
    }

    match catalog.find(input) {
        Ok(category) => Pick::Value(category),
        Err(err) => Pick::Retry(format!("{err}.")),
    }
}

/// Accepts 1-3 or a difficulty name.
pub fn difficulty(line: &str) -> Pick<Difficulty> {
    let input = line.trim();
    if is_quit(input) {
        return Pick::Quit;
    }

    if let Ok(number) = input.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|index| Difficulty::ALL.get(index).copied())
            .map_or_else(
                || Pick::Retry(format!("Pick a number between 1 and {}.", Difficulty::ALL.len())),
                Pick::Value,
            );
    }

    match input.parse() {
        Ok(difficulty) => Pick::Value(difficulty),
        Err(err) => Pick::Retry(format!("{err}.")),
    }
}

pub fn quiz_input(line: &str) -> QuizInput {
    let input = line.trim();
    if input.is_empty() {
        return QuizInput::Blank;
    }
    if is_quit(input) {
        return QuizInput::Quit;
    }
    if input.eq_ignore_ascii_case("n") || input.eq_ignore_ascii_case("next") {
        return QuizInput::Next;
    }
    match input.parse::<usize>() {
        Ok(number) if number > 0 => QuizInput::Choice(number),
        _ => QuizInput::Unknown,
    }
}

pub fn yes(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
