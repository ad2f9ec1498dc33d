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

use std::collections::BTreeMap;

use serde::Serialize;

use crate::srs::ReviewSession;
use crate::srs::ReviewState;
use crate::types::date::Date;
use crate::types::proficiency::Proficiency;
use crate::types::timestamp::Timestamp;

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Serialize)]
pub struct ProficiencyCounts {
    pub new: usize,
    pub learning: usize,
    pub familiar: usize,
    pub mastered: usize,
}

impl ProficiencyCounts {
    fn increment(&mut self, proficiency: Proficiency) {
        match proficiency {
            Proficiency::New => self.new += 1,
            Proficiency::Learning => self.learning += 1,
            Proficiency::Familiar => self.familiar += 1,
            Proficiency::Mastered => self.mastered += 1,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub proficiency_levels: ProficiencyCounts,
    pub due_count: usize,
}

/// Counts states per proficiency level, and how many are due as of `now`.
pub fn aggregate_statistics<'a>(
    states: impl IntoIterator<Item = &'a ReviewState>,
    now: Timestamp,
) -> Statistics {
    let mut stats = Statistics::default();
    for state in states {
        stats.proficiency_levels.increment(state.proficiency());
        if state.is_due(now) {
            stats.due_count += 1;
        }
    }
    stats
}

/// Review activity on a single calendar day.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    pub date: Date,
    pub total_reviews: usize,
    /// Reviews graded good or easy.
    pub correct_answers: usize,
    pub time_spent_secs: u64,
}

/// Groups review sessions from `since` onwards by UTC date, in ascending date
/// order.
pub fn learning_progress<'a>(
    sessions: impl IntoIterator<Item = &'a ReviewSession>,
    since: Timestamp,
) -> Vec<DailyProgress> {
    let mut days: BTreeMap<Date, DailyProgress> = BTreeMap::new();
    for session in sessions {
        if session.reviewed_at < since {
            continue;
        }
        let date = session.reviewed_at.date();
        let day = days.entry(date).or_insert(DailyProgress {
            date,
            total_reviews: 0,
            correct_answers: 0,
            time_spent_secs: 0,
        });
        day.total_reviews += 1;
        if session.grade.is_correct() {
            day.correct_answers += 1;
        }
        day.time_spent_secs += session.time_spent_secs;
    }
    days.into_values().collect()
}
