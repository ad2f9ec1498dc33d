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

use clap::ValueEnum;

use crate::types::vocabulary::VocabularyEntry;

pub mod add;
pub mod delete;
pub mod drill;
pub mod due;
pub mod export;
pub mod import;
pub mod list;
pub mod progress;
pub mod review;
pub mod stats;

#[derive(ValueEnum, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Text,
    /// JSON output.
    Json,
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// One line per item: id, word, proficiency, and when it is next due.
pub fn format_entry(entry: &VocabularyEntry) -> String {
    format!(
        "{:>5}  {:<24} {:<9} next {}",
        entry.vocabulary.id.to_string(),
        entry.vocabulary.word_phrase,
        entry.state.proficiency().as_str(),
        entry.state.next_review_date
    )
}
