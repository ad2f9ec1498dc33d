// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::srs::ReviewState;
use crate::types::timestamp::Timestamp;

/// Maximum length of a word or phrase, in characters.
const MAX_WORD_LENGTH: usize = 255;

/// Database identifier of a vocabulary item.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
#[serde(transparent)]
pub struct VocabularyId(i64);

impl VocabularyId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl Display for VocabularyId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for VocabularyId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for VocabularyId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let id: i64 = FromSql::column_result(value)?;
        Ok(VocabularyId(id))
    }
}

/// A vocabulary item as submitted by the learner, before it is stored.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewVocabulary {
    pub word_phrase: String,
    #[serde(default)]
    pub classification: String,
    #[serde(default)]
    pub pronunciation: String,
    #[serde(default)]
    pub meaning: String,
    pub example: String,
    #[serde(default)]
    pub feedback: String,
}

impl NewVocabulary {
    /// Trims surrounding whitespace and checks the length constraints.
    pub fn validate(self) -> Fallible<Self> {
        let word_phrase = self.word_phrase.trim().to_string();
        if word_phrase.is_empty() {
            return Err(ErrorReport::invalid_argument(
                "word or phrase must not be empty",
            ));
        }
        if word_phrase.chars().count() > MAX_WORD_LENGTH {
            return Err(ErrorReport::invalid_argument(format!(
                "word or phrase must be at most {MAX_WORD_LENGTH} characters"
            )));
        }
        let example = self.example.trim().to_string();
        if example.is_empty() {
            return Err(ErrorReport::invalid_argument(
                "example sentence must not be empty",
            ));
        }
        Ok(Self {
            word_phrase,
            classification: self.classification.trim().to_string(),
            pronunciation: self.pronunciation.trim().to_string(),
            meaning: self.meaning.trim().to_string(),
            example,
            feedback: self.feedback.trim().to_string(),
        })
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    pub sentence: String,
    pub feedback: String,
    pub created_at: Timestamp,
}

/// A stored vocabulary item together with its examples.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vocabulary {
    pub id: VocabularyId,
    pub word_phrase: String,
    pub classification: String,
    pub pronunciation: String,
    pub meaning: String,
    pub created_at: Timestamp,
    pub examples: Vec<Example>,
}

/// A vocabulary item joined with the learner's review state.
#[derive(Clone, Debug)]
pub struct VocabularyEntry {
    pub vocabulary: Vocabulary,
    pub state: ReviewState,
}
