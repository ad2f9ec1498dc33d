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

use std::collections::HashMap;

use rusqlite::Connection;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::ErrorKind;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::srs::Review;
use crate::srs::ReviewSession;
use crate::srs::ReviewState;
use crate::types::timestamp::Timestamp;
use crate::types::vocabulary::Example;
use crate::types::vocabulary::NewVocabulary;
use crate::types::vocabulary::Vocabulary;
use crate::types::vocabulary::VocabularyEntry;
use crate::types::vocabulary::VocabularyId;

/// Optimistic concurrency token of a review state row.
pub type Version = i64;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }

    /// Insert a vocabulary item together with its first example and its
    /// initial review state.
    ///
    /// If the learner already has an item with the same word, returns an
    /// `AlreadyExists` error and writes nothing.
    pub fn insert_vocabulary(
        &mut self,
        learner: &str,
        item: &NewVocabulary,
        state: &ReviewState,
        now: Timestamp,
    ) -> Fallible<VocabularyId> {
        log::debug!("Adding vocabulary item: {}", item.word_phrase);
        let tx = self.conn.transaction()?;
        if vocabulary_exists(&tx, learner, &item.word_phrase)? {
            return Err(ErrorReport::with_kind(
                ErrorKind::AlreadyExists,
                format!("'{}' is already in the vocabulary.", item.word_phrase),
            ));
        }
        let id = insert_vocabulary(&tx, learner, item, now)?;
        insert_example(&tx, id, &item.example, &item.feedback, now)?;
        insert_review_state(&tx, id, state)?;
        tx.commit()?;
        Ok(id)
    }

    /// Number of vocabulary items the learner has.
    pub fn vocabulary_count(&self, learner: &str) -> Fallible<usize> {
        let sql = "select count(*) from vocabulary where learner = ?;";
        let count: i64 = self.conn.query_row(sql, [learner], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get the review state of an item, and its current version.
    ///
    /// If the learner has no such item, returns a `NotFound` error.
    pub fn get_review_state(
        &self,
        learner: &str,
        id: VocabularyId,
    ) -> Fallible<(ReviewState, Version)> {
        let sql = "select s.ease_factor, s.review_count, s.next_review_date, s.version from review_states s join vocabulary v on v.vocabulary_id = s.vocabulary_id where v.learner = ? and s.vocabulary_id = ?;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query((learner, id))?;
        if let Some(row) = rows.next()? {
            let state = read_review_state(row, 0)?;
            let version: Version = row.get(3)?;
            Ok((state, version))
        } else {
            Err(ErrorReport::not_found(format!(
                "no review state for vocabulary item {id}."
            )))
        }
    }

    /// Return the review states of all of the learner's items.
    pub fn review_states(&self, learner: &str) -> Fallible<Vec<(VocabularyId, ReviewState)>> {
        let sql = "select s.vocabulary_id, s.ease_factor, s.review_count, s.next_review_date from review_states s join vocabulary v on v.vocabulary_id = s.vocabulary_id where v.learner = ? order by s.vocabulary_id;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([learner])?;
        let mut states = Vec::new();
        while let Some(row) = rows.next()? {
            let id: VocabularyId = row.get(0)?;
            let state = read_review_state(row, 1)?;
            states.push((id, state));
        }
        Ok(states)
    }

    /// Persist the outcome of a review: the new state and its audit record.
    ///
    /// The state is only written if its version still matches `version`.
    /// Otherwise returns a `Conflict` error and writes nothing.
    pub fn save_review(
        &mut self,
        learner: &str,
        id: VocabularyId,
        version: Version,
        review: &Review,
    ) -> Fallible<()> {
        let tx = self.conn.transaction()?;
        let sql = "update review_states set ease_factor = ?, review_count = ?, next_review_date = ?, version = version + 1 where vocabulary_id = ? and version = ? and vocabulary_id in (select vocabulary_id from vocabulary where learner = ?);";
        let updated = tx.execute(
            sql,
            (
                review.state.ease_factor,
                review.state.review_count as i64,
                review.state.next_review_date,
                id,
                version,
                learner,
            ),
        )?;
        if updated == 0 {
            return Err(ErrorReport::with_kind(
                ErrorKind::Conflict,
                format!("review state of vocabulary item {id} was modified concurrently."),
            ));
        }
        insert_session(&tx, id, &review.session)?;
        tx.commit()?;
        Ok(())
    }

    /// Return every review session of the learner, oldest first.
    pub fn sessions(&self, learner: &str) -> Fallible<Vec<(VocabularyId, ReviewSession)>> {
        let sql = "select r.vocabulary_id, r.grade, r.time_spent, r.reviewed_at from review_sessions r join vocabulary v on v.vocabulary_id = r.vocabulary_id where v.learner = ? order by r.session_id;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([learner])?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next()? {
            let id: VocabularyId = row.get(0)?;
            let time_spent: i64 = row.get(2)?;
            let session = ReviewSession {
                grade: row.get(1)?,
                time_spent_secs: u64::try_from(time_spent)
                    .map_err(|_| ErrorReport::new("negative time spent in database"))?,
                reviewed_at: row.get(3)?,
            };
            sessions.push((id, session));
        }
        Ok(sessions)
    }

    /// Return all of the learner's items with their examples and review
    /// states, ordered by id.
    pub fn entries(&self, learner: &str) -> Fallible<Vec<VocabularyEntry>> {
        let mut examples = self.examples(learner)?;
        let sql = "select v.vocabulary_id, v.word_phrase, v.classification, v.pronunciation, v.meaning, v.created_at, s.ease_factor, s.review_count, s.next_review_date from vocabulary v join review_states s on s.vocabulary_id = v.vocabulary_id where v.learner = ? order by v.vocabulary_id;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([learner])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            let id: VocabularyId = row.get(0)?;
            let vocabulary = Vocabulary {
                id,
                word_phrase: row.get(1)?,
                classification: row.get(2)?,
                pronunciation: row.get(3)?,
                meaning: row.get(4)?,
                created_at: row.get(5)?,
                examples: examples.remove(&id).unwrap_or_default(),
            };
            let state = read_review_state(row, 6)?;
            entries.push(VocabularyEntry { vocabulary, state });
        }
        Ok(entries)
    }

    /// Delete an item. Its examples, review state, and sessions go with it.
    ///
    /// If the learner has no such item, returns a `NotFound` error.
    pub fn delete_vocabulary(&mut self, learner: &str, id: VocabularyId) -> Fallible<()> {
        log::debug!("Deleting vocabulary item: {id}");
        let tx = self.conn.transaction()?;
        let sql = "delete from vocabulary where vocabulary_id = ? and learner = ?;";
        let deleted = tx.execute(sql, (id, learner))?;
        if deleted == 0 {
            return Err(ErrorReport::not_found(format!(
                "vocabulary item {id} not found."
            )));
        }
        tx.commit()?;
        Ok(())
    }

    fn examples(&self, learner: &str) -> Fallible<HashMap<VocabularyId, Vec<Example>>> {
        let sql = "select e.vocabulary_id, e.sentence, e.feedback, e.created_at from examples e join vocabulary v on v.vocabulary_id = e.vocabulary_id where v.learner = ? order by e.example_id;";
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([learner])?;
        let mut examples: HashMap<VocabularyId, Vec<Example>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let id: VocabularyId = row.get(0)?;
            let example = Example {
                sentence: row.get(1)?,
                feedback: row.get(2)?,
                created_at: row.get(3)?,
            };
            examples.entry(id).or_default().push(example);
        }
        Ok(examples)
    }
}

/// Reads the three review state columns starting at `offset`.
fn read_review_state(row: &Row, offset: usize) -> Fallible<ReviewState> {
    let review_count: i64 = row.get(offset + 1)?;
    let review_count = usize::try_from(review_count)
        .map_err(|_| ErrorReport::new("negative review count in database"))?;
    Ok(ReviewState {
        ease_factor: row.get(offset)?,
        review_count,
        next_review_date: row.get(offset + 2)?,
    })
}

fn vocabulary_exists(tx: &Transaction, learner: &str, word_phrase: &str) -> Fallible<bool> {
    let sql = "select count(*) from vocabulary where learner = ? and word_phrase = ?;";
    let count: i64 = tx.query_row(sql, (learner, word_phrase), |row| row.get(0))?;
    Ok(count > 0)
}

fn insert_vocabulary(
    tx: &Transaction,
    learner: &str,
    item: &NewVocabulary,
    now: Timestamp,
) -> Fallible<VocabularyId> {
    let sql = "insert into vocabulary (learner, word_phrase, classification, pronunciation, meaning, created_at) values (?, ?, ?, ?, ?, ?) returning vocabulary_id;";
    let id: VocabularyId = tx.query_row(
        sql,
        (
            learner,
            &item.word_phrase,
            &item.classification,
            &item.pronunciation,
            &item.meaning,
            now,
        ),
        |row| row.get(0),
    )?;
    Ok(id)
}

fn insert_example(
    tx: &Transaction,
    id: VocabularyId,
    sentence: &str,
    feedback: &str,
    now: Timestamp,
) -> Fallible<()> {
    let sql = "insert into examples (vocabulary_id, sentence, feedback, created_at) values (?, ?, ?, ?);";
    tx.execute(sql, (id, sentence, feedback, now))?;
    Ok(())
}

fn insert_review_state(tx: &Transaction, id: VocabularyId, state: &ReviewState) -> Fallible<()> {
    let sql = "insert into review_states (vocabulary_id, ease_factor, review_count, next_review_date) values (?, ?, ?, ?);";
    tx.execute(
        sql,
        (
            id,
            state.ease_factor,
            state.review_count as i64,
            state.next_review_date,
        ),
    )?;
    Ok(())
}

fn insert_session(tx: &Transaction, id: VocabularyId, session: &ReviewSession) -> Fallible<()> {
    let sql = "insert into review_sessions (vocabulary_id, grade, time_spent, reviewed_at) values (?, ?, ?, ?);";
    tx.execute(
        sql,
        (
            id,
            session.grade,
            session.time_spent_secs as i64,
            session.reviewed_at,
        ),
    )?;
    Ok(())
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["vocabulary"], |row| row.get(0))?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;
    use tempfile::TempDir;
    use tempfile::tempdir;

    use super::*;
    use crate::srs::initialize;
    use crate::srs::record_review;

    fn open() -> Fallible<(TempDir, Database)> {
        let dir = tempdir()?;
        let path = dir.path().join("test.db");
        let db = Database::new(path.to_str().unwrap())?;
        Ok((dir, db))
    }

    fn now() -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2024, 1, 1, 8, 30, 0).unwrap())
    }

    fn word(word_phrase: &str) -> NewVocabulary {
        NewVocabulary {
            word_phrase: word_phrase.to_string(),
            classification: "noun".to_string(),
            pronunciation: "/wɜːd/".to_string(),
            meaning: "a unit of language".to_string(),
            example: format!("The {word_phrase} was spoken."),
            feedback: "Fine.".to_string(),
        }
    }

    #[test]
    fn test_reopen_keeps_data() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("test.db");
        let path = path.to_str().unwrap();
        {
            let mut db = Database::new(path)?;
            db.insert_vocabulary("ana", &word("apple"), &initialize(now())?, now())?;
        }
        let db = Database::new(path)?;
        assert_eq!(db.vocabulary_count("ana")?, 1);
        Ok(())
    }

    #[test]
    fn test_insert_and_read_back() -> Fallible<()> {
        let (_dir, mut db) = open()?;
        let state = initialize(now())?;
        let id = db.insert_vocabulary("ana", &word("apple"), &state, now())?;
        let (stored, version) = db.get_review_state("ana", id)?;
        assert_eq!(stored, state);
        assert_eq!(version, 0);

        let entries = db.entries("ana")?;
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.vocabulary.id, id);
        assert_eq!(entry.vocabulary.word_phrase, "apple");
        assert_eq!(entry.vocabulary.created_at, now());
        assert_eq!(entry.vocabulary.examples.len(), 1);
        assert_eq!(entry.vocabulary.examples[0].sentence, "The apple was spoken.");
        assert_eq!(entry.state, state);
        Ok(())
    }

    #[test]
    fn test_duplicate_word() -> Fallible<()> {
        let (_dir, mut db) = open()?;
        let state = initialize(now())?;
        db.insert_vocabulary("ana", &word("apple"), &state, now())?;
        let err = db
            .insert_vocabulary("ana", &word("apple"), &state, now())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        // Another learner may save the same word.
        db.insert_vocabulary("ben", &word("apple"), &state, now())?;
        assert_eq!(db.vocabulary_count("ana")?, 1);
        assert_eq!(db.vocabulary_count("ben")?, 1);
        Ok(())
    }

    #[test]
    fn test_missing_state() -> Fallible<()> {
        let (_dir, mut db) = open()?;
        let id = db.insert_vocabulary("ana", &word("apple"), &initialize(now())?, now())?;
        let err = db.get_review_state("ben", id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = db
            .get_review_state("ana", VocabularyId::new(999))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[test]
    fn test_save_review_bumps_version() -> Fallible<()> {
        let (_dir, mut db) = open()?;
        let id = db.insert_vocabulary("ana", &word("apple"), &initialize(now())?, now())?;
        let (state, version) = db.get_review_state("ana", id)?;
        let review = record_review(&state, 2, 12, now().plus_days(1)?)?;
        db.save_review("ana", id, version, &review)?;

        let (stored, new_version) = db.get_review_state("ana", id)?;
        assert_eq!(stored, review.state);
        assert_eq!(new_version, version + 1);

        let sessions = db.sessions("ana")?;
        assert_eq!(sessions, vec![(id, review.session)]);
        Ok(())
    }

    #[test]
    fn test_stale_version_conflicts() -> Fallible<()> {
        let (_dir, mut db) = open()?;
        let id = db.insert_vocabulary("ana", &word("apple"), &initialize(now())?, now())?;
        let (state, version) = db.get_review_state("ana", id)?;
        let first = record_review(&state, 2, 0, now())?;
        let second = record_review(&state, 0, 0, now())?;
        db.save_review("ana", id, version, &first)?;
        let err = db.save_review("ana", id, version, &second).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        // The losing write left no trace.
        assert_eq!(db.get_review_state("ana", id)?.0, first.state);
        assert_eq!(db.sessions("ana")?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_delete_cascades() -> Fallible<()> {
        let (_dir, mut db) = open()?;
        let id = db.insert_vocabulary("ana", &word("apple"), &initialize(now())?, now())?;
        let other = db.insert_vocabulary("ana", &word("pear"), &initialize(now())?, now())?;
        let (state, version) = db.get_review_state("ana", id)?;
        db.save_review("ana", id, version, &record_review(&state, 3, 5, now())?)?;

        let err = db.delete_vocabulary("ben", id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        db.delete_vocabulary("ana", id)?;
        assert_eq!(db.vocabulary_count("ana")?, 1);
        assert!(db.sessions("ana")?.is_empty());
        let states = db.review_states("ana")?;
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].0, other);
        Ok(())
    }
}
