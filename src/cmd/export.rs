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

use serde::Serialize;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::srs::ReviewSession;
use crate::srs::ReviewState;
use crate::types::grade::Grade;
use crate::types::proficiency::Proficiency;
use crate::types::timestamp::Timestamp;
use crate::types::vocabulary::Vocabulary;
use crate::types::vocabulary::VocabularyId;

pub fn export_collection(coll: &Collection) -> Fallible<()> {
    let export: Export = get_export(coll)?;
    let json: String = serde_json::to_string_pretty(&export)?;
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Export {
    learner: String,
    vocabulary: Vec<VocabularyExport>,
    sessions: Vec<SessionExport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VocabularyExport {
    #[serde(flatten)]
    vocabulary: Vocabulary,
    review_state: ReviewStateExport,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewStateExport {
    ease_factor: f64,
    review_count: usize,
    proficiency_level: Proficiency,
    next_review_date: Timestamp,
}

impl From<&ReviewState> for ReviewStateExport {
    fn from(state: &ReviewState) -> Self {
        Self {
            ease_factor: state.ease_factor,
            review_count: state.review_count,
            proficiency_level: state.proficiency(),
            next_review_date: state.next_review_date,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionExport {
    vocabulary_id: VocabularyId,
    grade: Grade,
    time_spent_secs: u64,
    reviewed_at: Timestamp,
}

fn get_export(coll: &Collection) -> Fallible<Export> {
    let vocabulary: Vec<VocabularyExport> = coll
        .entries()?
        .into_iter()
        .map(|entry| VocabularyExport {
            review_state: ReviewStateExport::from(&entry.state),
            vocabulary: entry.vocabulary,
        })
        .collect();
    let sessions: Vec<SessionExport> = coll
        .sessions()?
        .into_iter()
        .map(|(vocabulary_id, session): (VocabularyId, ReviewSession)| SessionExport {
            vocabulary_id,
            grade: session.grade,
            time_spent_secs: session.time_spent_secs,
            reviewed_at: session.reviewed_at,
        })
        .collect();
    Ok(Export {
        learner: coll.learner().to_string(),
        vocabulary,
        sessions,
    })
}
