mod category;
mod choices;
mod difficulty;
mod question;

pub use category::{Category, CategoryCatalog, CategoryError};
pub use choices::{AnswerChoice, AnswerChoices};
pub use difficulty::{Difficulty, DifficultyError};
pub use question::{Question, QuestionError};
