#![allow(dead_code)]

use std::sync::Arc;

use services::{QuestionSource, ScriptedProvider, ScriptedResponse};
use trivia_core::model::{Category, CategoryCatalog, Difficulty, Question};

pub fn category(name: &str) -> Category {
    CategoryCatalog::reference().find(name).unwrap().clone()
}

pub fn question(n: usize) -> Question {
    Question::new(
        "History",
        Difficulty::Hard,
        format!("Question {n}"),
        format!("Right {n}"),
        vec![format!("Wrong {n}a"), format!("Wrong {n}b"), format!("Wrong {n}c")],
    )
    .unwrap()
}

pub fn questions(n: usize) -> Vec<Question> {
    (0..n).map(question).collect()
}

pub fn scripted(responses: impl IntoIterator<Item = ScriptedResponse>) -> Arc<ScriptedProvider> {
    Arc::new(ScriptedProvider::new(responses))
}

pub fn source_for(provider: &Arc<ScriptedProvider>) -> Arc<QuestionSource> {
    Arc::new(QuestionSource::new(provider.clone()))
}
