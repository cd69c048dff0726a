//! 📝 The insert form. Four boxes, all required.

use crate::error::ValidationFailure;
use crate::records::MovieRecord;

/// 📝 Raw, untrusted form input for a new movie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMovie {
    pub name: String,
    pub company: String,
    pub director: String,
    pub genre: String,
}

impl NewMovie {
    pub fn new(
        name: impl Into<String>,
        company: impl Into<String>,
        director: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            company: company.into(),
            director: director.into(),
            genre: genre.into(),
        }
    }

    /// ✅ Trim every field and insist none of them is empty afterwards.
    ///
    /// The trimmed text is what gets stored, so `" Legendary "` lands as `"Legendary"`.
    pub fn validate(&self) -> Result<MovieRecord, ValidationFailure> {
        let trimmed = [
            ("name", self.name.trim()),
            ("company", self.company.trim()),
            ("director", self.director.trim()),
            ("genre", self.genre.trim()),
        ];
        let missing_fields: Vec<&'static str> = trimmed
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| *field)
            .collect();
        if !missing_fields.is_empty() {
            return Err(ValidationFailure { missing_fields });
        }
        let [name, company, director, genre] = trimmed.map(|(_, value)| value);
        Ok(MovieRecord::new(name, company, director, genre))
    }
}
