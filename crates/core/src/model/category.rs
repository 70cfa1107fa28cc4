use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CategoryError {
    #[error("unknown category: {0}")]
    Unknown(String),
    #[error("category name must not be empty")]
    EmptyName,
    #[error("duplicate category: {0}")]
    Duplicate(String),
}

/// A named question category and the provider's numeric id for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    name: String,
    provider_id: u32,
}

impl Category {
    /// # Errors
    ///
    /// Returns `CategoryError::EmptyName` if `name` is blank.
    pub fn new(name: impl Into<String>, provider_id: u32) -> Result<Self, CategoryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CategoryError::EmptyName);
        }
        Ok(Self { name, provider_id })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn provider_id(&self) -> u32 {
        self.provider_id
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Ordered, injectable set of categories offered for selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCatalog {
    entries: Vec<Category>,
}

impl CategoryCatalog {
    const REFERENCE: [(&'static str, u32); 8] = [
        ("General Knowledge", 9),
        ("Science & Nature", 17),
        ("Computers", 18),
        ("Mathematics", 19),
        ("Sports", 21),
        ("Geography", 22),
        ("History", 23),
        ("Animals", 27),
    ];

    /// Build a catalog from `(name, provider_id)` pairs, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::EmptyName` for a blank name and
    /// `CategoryError::Duplicate` when two entries share a name (ignoring case).
    pub fn new<I, S>(entries: I) -> Result<Self, CategoryError>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut built: Vec<Category> = Vec::new();
        for (name, id) in entries {
            let category = Category::new(name, id)?;
            if built
                .iter()
                .any(|c| c.name.eq_ignore_ascii_case(&category.name))
            {
                return Err(CategoryError::Duplicate(category.name));
            }
            built.push(category);
        }
        Ok(Self { entries: built })
    }

    /// The eight Open Trivia DB categories offered by the reference deployment.
    #[must_use]
    pub fn reference() -> Self {
        Self {
            entries: Self::REFERENCE
                .iter()
                .map(|(name, id)| Category {
                    name: (*name).to_owned(),
                    provider_id: *id,
                })
                .collect(),
        }
    }

    /// Look a category up by name, ignoring ASCII case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::Unknown` if no entry matches.
    pub fn find(&self, name: &str) -> Result<&Category, CategoryError> {
        let needle = name.trim();
        self.entries
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(needle))
            .ok_or_else(|| CategoryError::Unknown(name.to_owned()))
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Category> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::reference()
    }
}
