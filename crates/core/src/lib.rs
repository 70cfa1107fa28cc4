#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod text;

pub use error::Error;
pub use model::{
    AnswerChoice, AnswerChoices, Category, CategoryCatalog, CategoryError, Difficulty,
    DifficultyError, Question, QuestionError,
};
