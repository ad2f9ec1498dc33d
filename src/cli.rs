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

use std::path::Path;

use clap::Args;
use clap::Parser;

use crate::cmd::OutputFormat;
use crate::cmd::add::add_vocabulary;
use crate::cmd::delete::delete_vocabulary;
use crate::cmd::drill::drill;
use crate::cmd::due::list_due;
use crate::cmd::export::export_collection;
use crate::cmd::import::import_word_lists;
use crate::cmd::list::list_vocabulary;
use crate::cmd::progress::print_progress;
use crate::cmd::review::review_item;
use crate::cmd::stats::print_stats;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::proficiency::Proficiency;
use crate::types::vocabulary::NewVocabulary;
use crate::types::vocabulary::VocabularyId;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Save a new word or phrase.
    Add {
        #[command(flatten)]
        target: Target,
        /// The word or phrase.
        word: String,
        /// An example sentence using it.
        #[arg(long)]
        example: String,
        /// Definition or meaning.
        #[arg(long, default_value = "")]
        meaning: String,
        /// Part of speech.
        #[arg(long, default_value = "")]
        classification: String,
        /// Phonetic pronunciation.
        #[arg(long, default_value = "")]
        pronunciation: String,
        /// Notes on the example sentence.
        #[arg(long, default_value = "")]
        feedback: String,
    },
    /// Save every word from the TOML word lists in a directory.
    Import {
        #[command(flatten)]
        target: Target,
        /// Directory to search for `.toml` word lists.
        path: String,
    },
    /// Drill the words due for review.
    Drill {
        #[command(flatten)]
        target: Target,
    },
    /// Record a single review.
    Review {
        #[command(flatten)]
        target: Target,
        /// The item id.
        item: i64,
        /// 0 = again, 1 = hard, 2 = good, 3 = easy.
        #[arg(allow_negative_numbers = true)]
        score: i64,
        /// Time spent on the review, in seconds.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        time: i64,
        #[arg(long, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List the words due for review.
    Due {
        #[command(flatten)]
        target: Target,
    },
    /// Print vocabulary statistics.
    Stats {
        #[command(flatten)]
        target: Target,
        #[arg(long, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print daily review activity.
    Progress {
        #[command(flatten)]
        target: Target,
        /// How many days to look back. Defaults to the configured value.
        #[arg(long)]
        days: Option<u32>,
        #[arg(long, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List the vocabulary.
    List {
        #[command(flatten)]
        target: Target,
        /// Number of items to skip.
        #[arg(long, default_value_t = 0)]
        skip: usize,
        /// Maximum number of items. Defaults to the configured value.
        #[arg(long)]
        limit: Option<usize>,
        /// Only show items at this level (new, learning, familiar, mastered).
        #[arg(long)]
        proficiency: Option<Proficiency>,
    },
    /// Delete an item and its review history.
    Delete {
        #[command(flatten)]
        target: Target,
        /// The item id.
        item: i64,
    },
    /// Export the vocabulary and review history as JSON.
    Export {
        #[command(flatten)]
        target: Target,
    },
}

/// Which collection, and whose vocabulary in it.
#[derive(Args)]
struct Target {
    /// Path to the collection directory. Defaults to the current directory.
    #[arg(long)]
    directory: Option<String>,
    /// Learner name. Defaults to the configured learner.
    #[arg(long)]
    learner: Option<String>,
}

impl Target {
    fn open(self) -> Fallible<Collection> {
        Collection::new(self.directory, self.learner)
    }
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Add {
            target,
            word,
            example,
            meaning,
            classification,
            pronunciation,
            feedback,
        } => {
            let mut coll = target.open()?;
            let item = NewVocabulary {
                word_phrase: word,
                classification,
                pronunciation,
                meaning,
                example,
                feedback,
            };
            add_vocabulary(&mut coll, item)
        }
        Command::Import { target, path } => {
            let mut coll = target.open()?;
            import_word_lists(&mut coll, Path::new(&path))
        }
        Command::Drill { target } => {
            let mut coll = target.open()?;
            drill(&mut coll)
        }
        Command::Review {
            target,
            item,
            score,
            time,
            format,
        } => {
            let mut coll = target.open()?;
            review_item(&mut coll, VocabularyId::new(item), score, time, format)
        }
        Command::Due { target } => {
            let coll = target.open()?;
            list_due(&coll)
        }
        Command::Stats { target, format } => {
            let coll = target.open()?;
            print_stats(&coll, format)
        }
        Command::Progress {
            target,
            days,
            format,
        } => {
            let coll = target.open()?;
            let days = days.unwrap_or(coll.config.progress_days);
            print_progress(&coll, days, format)
        }
        Command::List {
            target,
            skip,
            limit,
            proficiency,
        } => {
            let coll = target.open()?;
            let limit = limit.unwrap_or(coll.config.list_limit);
            list_vocabulary(&coll, skip, limit, proficiency)
        }
        Command::Delete { target, item } => {
            let mut coll = target.open()?;
            delete_vocabulary(&mut coll, VocabularyId::new(item))
        }
        Command::Export { target } => {
            let coll = target.open()?;
            export_collection(&coll)
        }
    }
}
