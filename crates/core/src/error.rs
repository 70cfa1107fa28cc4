use thiserror::Error;

use crate::model::{CategoryError, DifficultyError, QuestionError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Category(#[from] CategoryError),
    #[error(transparent)]
    Difficulty(#[from] DifficultyError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryCatalog, Difficulty};

    fn lookup(name: &str, difficulty: &str) -> Result<(u32, Difficulty), Error> {
        let category = CategoryCatalog::reference().find(name)?.provider_id();
        Ok((category, difficulty.parse()?))
    }

    #[test]
    fn layer_errors_convert_with_question_mark() {
        assert_eq!(lookup("Sports", "easy").unwrap(), (21, Difficulty::Easy));
        assert!(matches!(lookup("Cooking", "easy"), Err(Error::Category(_))));
        assert!(matches!(lookup("Sports", "extreme"), Err(Error::Difficulty(_))));
        assert_eq!(
            lookup("Sports", "extreme").unwrap_err().to_string(),
            "unknown difficulty: extreme (expected easy, medium or hard)"
        );
    }
}
