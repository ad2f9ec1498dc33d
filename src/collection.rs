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

use std::env::current_dir;
use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::CONFIG_FILE;
use crate::config::Config;
use crate::config::MAX_LIST_LIMIT;
use crate::db::Database;
use crate::error::ErrorKind;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::progress::DailyProgress;
use crate::progress::Statistics;
use crate::progress::aggregate_statistics;
use crate::progress::learning_progress;
use crate::srs::ReviewSession;
use crate::srs::due_items;
use crate::srs::initialize;
use crate::srs::record_review;
use crate::types::proficiency::Proficiency;
use crate::types::timestamp::Timestamp;
use crate::types::vocabulary::NewVocabulary;
use crate::types::vocabulary::VocabularyEntry;
use crate::types::vocabulary::VocabularyId;

/// Name of the database file inside a collection directory.
const DATABASE_FILE: &str = "lexicards.db";

/// A learner's view of a collection directory: the database, the
/// configuration, and whose vocabulary we are looking at.
pub struct Collection {
    pub directory: PathBuf,
    pub config: Config,
    learner: String,
    db: Database,
}

/// What the learner sees after submitting a review.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    pub proficiency_level: Proficiency,
    pub next_review_date: Timestamp,
    pub review_count: usize,
    pub ease_factor: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_vocabulary: usize,
    #[serde(flatten)]
    pub statistics: Statistics,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
}

/// The contents of a word list file.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WordList {
    #[serde(default, rename = "word")]
    words: Vec<NewVocabulary>,
}

impl Collection {
    pub fn new(directory: Option<String>, learner: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let config = Config::load(&directory)?;
        let learner = match learner {
            Some(learner) => learner.trim().to_string(),
            None => config.learner.clone(),
        };
        if learner.is_empty() {
            return Err(ErrorReport::invalid_argument("learner must not be empty"));
        }

        let db_path: PathBuf = directory.join(DATABASE_FILE);
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        let db: Database = Database::new(db_path)?;

        log::debug!("Opened collection {} as {learner}.", directory.display());
        Ok(Self {
            directory,
            config,
            learner,
            db,
        })
    }

    pub fn learner(&self) -> &str {
        &self.learner
    }

    /// Save a new item with its example, and schedule its first review.
    pub fn save_vocabulary(&mut self, item: NewVocabulary, now: Timestamp) -> Fallible<VocabularyId> {
        let item = item.validate()?;
        let state = initialize(now)?;
        let id = self.db.insert_vocabulary(&self.learner, &item, &state, now)?;
        log::debug!(
            "Saved '{}' as item {id}, first review {}.",
            item.word_phrase,
            state.next_review_date
        );
        Ok(id)
    }

    /// Record a review of an item and persist the new schedule.
    pub fn submit_review(
        &mut self,
        id: VocabularyId,
        performance_score: i64,
        time_spent_secs: i64,
        now: Timestamp,
    ) -> Fallible<ReviewOutcome> {
        let (state, version) = self.db.get_review_state(&self.learner, id)?;
        let review = record_review(&state, performance_score, time_spent_secs, now)?;
        log::debug!(
            "{id} {} EF={:.2} n={} interval={}d due={}",
            review.session.grade.as_str(),
            review.state.ease_factor,
            review.state.review_count,
            review.interval_days,
            review.state.next_review_date
        );
        self.db.save_review(&self.learner, id, version, &review)?;
        Ok(ReviewOutcome {
            proficiency_level: review.state.proficiency(),
            next_review_date: review.state.next_review_date,
            review_count: review.state.review_count,
            ease_factor: review.state.ease_factor,
        })
    }

    /// Items due at `now`, earliest first.
    pub fn due_reviews(&self, now: Timestamp) -> Fallible<Vec<VocabularyEntry>> {
        let entries = self.db.entries(&self.learner)?;
        let due = due_items(
            entries.iter().map(|entry| (entry.vocabulary.id, &entry.state)),
            now,
        );
        let mut entries: Vec<VocabularyEntry> = entries
            .into_iter()
            .filter(|entry| due.contains(&entry.vocabulary.id))
            .collect();
        entries.sort_by_key(|entry| (entry.state.next_review_date, entry.vocabulary.id));
        Ok(entries)
    }

    pub fn dashboard(&self, now: Timestamp) -> Fallible<Dashboard> {
        let states = self.db.review_states(&self.learner)?;
        let statistics = aggregate_statistics(states.iter().map(|(_, state)| state), now);
        Ok(Dashboard {
            total_vocabulary: self.db.vocabulary_count(&self.learner)?,
            statistics,
        })
    }

    /// Daily review activity over the last `days` days.
    pub fn progress(&self, days: u32, now: Timestamp) -> Fallible<Vec<DailyProgress>> {
        let since = now.minus_days(i64::from(days))?;
        let sessions = self.sessions()?;
        Ok(learning_progress(
            sessions.iter().map(|(_, session)| session),
            since,
        ))
    }

    /// A page of the learner's items, optionally restricted to one
    /// proficiency level.
    pub fn list_vocabulary(
        &self,
        skip: usize,
        limit: usize,
        proficiency: Option<Proficiency>,
    ) -> Fallible<Vec<VocabularyEntry>> {
        if limit == 0 || limit > MAX_LIST_LIMIT {
            return Err(ErrorReport::invalid_argument(format!(
                "limit must be between 1 and {MAX_LIST_LIMIT}"
            )));
        }
        let entries = self
            .db
            .entries(&self.learner)?
            .into_iter()
            .filter(|entry| proficiency.is_none_or(|p| entry.state.proficiency() == p))
            .skip(skip)
            .take(limit)
            .collect();
        Ok(entries)
    }

    pub fn entries(&self) -> Fallible<Vec<VocabularyEntry>> {
        self.db.entries(&self.learner)
    }

    pub fn sessions(&self) -> Fallible<Vec<(VocabularyId, ReviewSession)>> {
        self.db.sessions(&self.learner)
    }

    pub fn delete_vocabulary(&mut self, id: VocabularyId) -> Fallible<()> {
        self.db.delete_vocabulary(&self.learner, id)
    }

    /// Save every word from the `.toml` word lists under `path`.
    ///
    /// All files are parsed and validated before anything is saved. Words the
    /// learner already has are skipped.
    pub fn import_directory(&mut self, path: &Path, now: Timestamp) -> Fallible<ImportSummary> {
        if !path.exists() {
            return fail("import directory does not exist.");
        }
        let mut items: Vec<NewVocabulary> = Vec::new();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            let file = entry.path();
            if !file.is_file() || file.extension().is_none_or(|ext| ext != "toml") {
                continue;
            }
            if file.file_name().is_some_and(|name| name == CONFIG_FILE) {
                continue;
            }
            let content = read_to_string(file)?;
            let list: WordList = toml::from_str(&content).map_err(|e| {
                ErrorReport::new(format!("failed to parse {}: {e}", file.display()))
            })?;
            log::debug!("Read {} words from {}.", list.words.len(), file.display());
            for word in list.words {
                items.push(word.validate()?);
            }
        }

        let mut summary = ImportSummary::default();
        for item in items {
            let word_phrase = item.word_phrase.clone();
            match self.save_vocabulary(item, now) {
                Ok(_) => summary.added += 1,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    log::warn!("Skipping '{word_phrase}': already in the vocabulary.");
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::fs::create_dir_all;
    use std::fs::write;

    use chrono::TimeZone;
    use chrono::Utc;
    use tempfile::tempdir;

    use super::*;
    use crate::helper::sample_word;
    use crate::helper::tmp_collection;

    fn ts(day: u32) -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap())
    }

    #[test]
    fn test_non_existent_directory() {
        let result = Collection::new(Some("./derpherp".to_string()), None);
        let err = result.err().unwrap();
        assert_eq!(err.to_string(), "error: directory does not exist.");
    }

    #[test]
    fn test_learner_from_config_and_flag() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join(CONFIG_FILE), "learner = \"ana\"\n")?;
        let path = dir.path().display().to_string();
        let coll = Collection::new(Some(path.clone()), None)?;
        assert_eq!(coll.learner(), "ana");
        let coll = Collection::new(Some(path), Some("ben".to_string()))?;
        assert_eq!(coll.learner(), "ben");
        Ok(())
    }

    #[test]
    fn test_review_workflow() -> Fallible<()> {
        let (_dir, mut coll) = tmp_collection()?;
        let id = coll.save_vocabulary(sample_word("ephemeral"), ts(1))?;

        let outcome = coll.submit_review(id, 2, 30, ts(2))?;
        assert_eq!(outcome.review_count, 1);
        assert_eq!(outcome.ease_factor, 2.5);
        assert_eq!(outcome.next_review_date, ts(3));
        assert_eq!(outcome.proficiency_level, Proficiency::Learning);

        let outcome = coll.submit_review(id, 2, 30, ts(3))?;
        assert_eq!(outcome.next_review_date, ts(9));

        let outcome = coll.submit_review(id, 3, 30, ts(9))?;
        assert_eq!(outcome.review_count, 3);
        assert_eq!(outcome.next_review_date, ts(14));

        let outcome = coll.submit_review(id, 0, 30, ts(14))?;
        assert_eq!(outcome.review_count, 0);
        assert_eq!(outcome.ease_factor, 2.5);
        assert_eq!(outcome.proficiency_level, Proficiency::New);
        assert_eq!(outcome.next_review_date, ts(15));

        assert_eq!(coll.sessions()?.len(), 4);
        Ok(())
    }

    #[test]
    fn test_submit_review_errors() -> Fallible<()> {
        let (_dir, mut coll) = tmp_collection()?;
        let err = coll
            .submit_review(VocabularyId::new(42), 2, 0, ts(1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let id = coll.save_vocabulary(sample_word("ephemeral"), ts(1))?;
        let err = coll.submit_review(id, 5, 0, ts(2)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = coll.submit_review(id, 2, -3, ts(2)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        // Nothing was recorded for the rejected reviews.
        assert!(coll.sessions()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_duplicate_save() -> Fallible<()> {
        let (_dir, mut coll) = tmp_collection()?;
        coll.save_vocabulary(sample_word("ephemeral"), ts(1))?;
        let err = coll
            .save_vocabulary(sample_word(" ephemeral "), ts(1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        Ok(())
    }

    #[test]
    fn test_due_and_dashboard() -> Fallible<()> {
        let (_dir, mut coll) = tmp_collection()?;
        let a = coll.save_vocabulary(sample_word("alpha"), ts(1))?;
        let b = coll.save_vocabulary(sample_word("beta"), ts(2))?;
        coll.save_vocabulary(sample_word("gamma"), ts(5))?;

        let due: Vec<VocabularyId> = coll
            .due_reviews(ts(3))?
            .iter()
            .map(|entry| entry.vocabulary.id)
            .collect();
        assert_eq!(due, vec![a, b]);

        coll.submit_review(a, 2, 10, ts(3))?;
        let dashboard = coll.dashboard(ts(3))?;
        assert_eq!(dashboard.total_vocabulary, 3);
        assert_eq!(dashboard.statistics.proficiency_levels.new, 2);
        assert_eq!(dashboard.statistics.proficiency_levels.learning, 1);
        assert_eq!(dashboard.statistics.due_count, 1);
        assert_eq!(coll.dashboard(ts(3))?, dashboard);
        Ok(())
    }

    #[test]
    fn test_progress() -> Fallible<()> {
        let (_dir, mut coll) = tmp_collection()?;
        let id = coll.save_vocabulary(sample_word("alpha"), ts(1))?;
        coll.submit_review(id, 2, 10, ts(2))?;
        coll.submit_review(id, 0, 20, ts(3))?;
        coll.submit_review(id, 3, 5, ts(4))?;

        let progress = coll.progress(30, ts(4))?;
        assert_eq!(progress.len(), 3);
        assert_eq!(progress[0].date, ts(2).date());
        assert_eq!(progress[1].correct_answers, 0);
        assert_eq!(progress[1].time_spent_secs, 20);

        let recent = coll.progress(1, ts(4))?;
        assert_eq!(recent.len(), 2);
        Ok(())
    }

    #[test]
    fn test_progress_window_out_of_range() -> Fallible<()> {
        let (_dir, coll) = tmp_collection()?;
        for days in [100_000_000, u32::MAX] {
            let err = coll.progress(days, Timestamp::now()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }
        Ok(())
    }

    #[test]
    fn test_list_filters_and_pages() -> Fallible<()> {
        let (_dir, mut coll) = tmp_collection()?;
        let a = coll.save_vocabulary(sample_word("alpha"), ts(1))?;
        coll.save_vocabulary(sample_word("beta"), ts(1))?;
        coll.save_vocabulary(sample_word("gamma"), ts(1))?;
        coll.submit_review(a, 2, 0, ts(2))?;

        assert_eq!(coll.list_vocabulary(0, 100, None)?.len(), 3);
        assert_eq!(coll.list_vocabulary(1, 1, None)?[0].vocabulary.word_phrase, "beta");
        let learning = coll.list_vocabulary(0, 100, Some(Proficiency::Learning))?;
        assert_eq!(learning.len(), 1);
        assert_eq!(learning[0].vocabulary.id, a);
        assert_eq!(coll.list_vocabulary(0, 100, Some(Proficiency::New))?.len(), 2);

        let err = coll.list_vocabulary(0, 0, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        Ok(())
    }

    #[test]
    fn test_delete() -> Fallible<()> {
        let (_dir, mut coll) = tmp_collection()?;
        let id = coll.save_vocabulary(sample_word("alpha"), ts(1))?;
        coll.delete_vocabulary(id)?;
        assert!(coll.entries()?.is_empty());
        let err = coll.delete_vocabulary(id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[test]
    fn test_import_directory() -> Fallible<()> {
        let (dir, mut coll) = tmp_collection()?;
        coll.save_vocabulary(sample_word("alpha"), ts(1))?;

        let lists = dir.path().join("lists");
        create_dir_all(lists.join("nested"))?;
        write(
            lists.join("greek.toml"),
            r#"
[[word]]
word_phrase = "alpha"
example = "Alpha comes first."

[[word]]
word_phrase = "beta"
meaning = "the second letter"
example = "Beta comes second."
"#,
        )?;
        write(
            lists.join("nested").join("more.toml"),
            r#"
[[word]]
word_phrase = "gamma"
example = "Gamma comes third."
"#,
        )?;
        write(lists.join("notes.txt"), "not a word list")?;

        let summary = coll.import_directory(&lists, ts(2))?;
        assert_eq!(summary, ImportSummary { added: 2, skipped: 1 });
        let words: Vec<String> = coll
            .entries()?
            .into_iter()
            .map(|entry| entry.vocabulary.word_phrase)
            .collect();
        assert_eq!(words, vec!["alpha", "beta", "gamma"]);
        Ok(())
    }

    #[test]
    fn test_import_rejects_invalid_file_before_saving() -> Fallible<()> {
        let (dir, mut coll) = tmp_collection()?;
        let lists = dir.path().join("lists");
        create_dir_all(&lists)?;
        write(
            lists.join("a.toml"),
            "[[word]]\nword_phrase = \"alpha\"\nexample = \"Alpha.\"\n",
        )?;
        write(
            lists.join("b.toml"),
            "[[word]]\nword_phrase = \"\"\nexample = \"Nothing.\"\n",
        )?;
        let err = coll.import_directory(&lists, ts(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(coll.entries()?.is_empty());
        Ok(())
    }
}
