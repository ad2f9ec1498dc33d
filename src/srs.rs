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

//! A simplified SM-2 scheduler.
//!
//! Everything here is a pure function of its arguments: the state of an item
//! lives in the caller's `ReviewState`, and persisting it is the caller's
//! business.

use std::collections::HashSet;
use std::hash::Hash;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::grade::Grade;
use crate::types::proficiency::Proficiency;
use crate::types::timestamp::Timestamp;

/// The ease factor of a freshly saved item.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// The lower bound of the ease factor.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// The upper bound of the ease factor.
pub const MAX_EASE_FACTOR: f64 = 2.5;

/// Subtracted from the ease factor on a hard answer.
const HARD_PENALTY: f64 = 0.2;

/// Added to the ease factor on an easy answer.
const EASY_BONUS: f64 = 0.15;

/// Interval in days after a failure, for new items, and after the first pass.
const FIRST_INTERVAL: i64 = 1;

/// Interval in days after the second consecutive pass.
const SECOND_INTERVAL: i64 = 6;

/// Scheduling state of one item for one learner.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ReviewState {
    /// Multiplier governing how fast intervals grow. In `[1.3, 2.5]`.
    pub ease_factor: f64,
    /// Consecutive non-"again" reviews since the last reset.
    pub review_count: usize,
    /// The earliest time the item should be shown again.
    pub next_review_date: Timestamp,
}

impl ReviewState {
    pub fn proficiency(&self) -> Proficiency {
        Proficiency::from_review_count(self.review_count)
    }

    pub fn is_due(&self, as_of: Timestamp) -> bool {
        self.next_review_date <= as_of
    }
}

/// Audit record of a single review. Never modified once created.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ReviewSession {
    pub grade: Grade,
    pub time_spent_secs: u64,
    pub reviewed_at: Timestamp,
}

/// The result of recording a review.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Review {
    pub state: ReviewState,
    pub session: ReviewSession,
    /// Days between the review and the new due date.
    pub interval_days: i64,
}

/// The state of an item the learner has just saved.
pub fn initialize(now: Timestamp) -> Fallible<ReviewState> {
    Ok(ReviewState {
        ease_factor: INITIAL_EASE_FACTOR,
        review_count: 0,
        next_review_date: now.plus_days(FIRST_INTERVAL)?,
    })
}

/// Computes the state following a review with the given score (0 = again,
/// 1 = hard, 2 = good, 3 = easy).
///
/// An "again" resets the review count but leaves the ease factor as it was:
/// failing a mature item costs its streak, not its accumulated ease.
pub fn record_review(
    state: &ReviewState,
    performance_score: i64,
    time_spent_secs: i64,
    now: Timestamp,
) -> Fallible<Review> {
    let grade = Grade::try_from(performance_score)?;
    let time_spent_secs = u64::try_from(time_spent_secs).map_err(|_| {
        ErrorReport::invalid_argument(format!(
            "time spent must not be negative: {time_spent_secs}"
        ))
    })?;
    let (ease_factor, review_count, interval_days) = match grade {
        Grade::Again => (state.ease_factor, 0, FIRST_INTERVAL),
        Grade::Hard | Grade::Good | Grade::Easy => {
            let ease_factor = adjust_ease_factor(state.ease_factor, grade);
            let interval_days = interval(state.review_count, ease_factor);
            (ease_factor, state.review_count + 1, interval_days)
        }
    };
    let state = ReviewState {
        ease_factor,
        review_count,
        next_review_date: now.plus_days(interval_days)?,
    };
    let session = ReviewSession {
        grade,
        time_spent_secs,
        reviewed_at: now,
    };
    Ok(Review {
        state,
        session,
        interval_days,
    })
}

fn adjust_ease_factor(ease_factor: f64, grade: Grade) -> f64 {
    let adjusted = match grade {
        Grade::Hard => ease_factor - HARD_PENALTY,
        Grade::Easy => ease_factor + EASY_BONUS,
        Grade::Again | Grade::Good => ease_factor,
    };
    adjusted.clamp(MIN_EASE_FACTOR, MAX_EASE_FACTOR)
}

/// Interval for a passing review, from the review count before the update.
fn interval(review_count: usize, ease_factor: f64) -> i64 {
    match review_count {
        0 => FIRST_INTERVAL,
        1 => SECOND_INTERVAL,
        n => (n as f64 * ease_factor).floor() as i64,
    }
}

/// The identifiers of every item due at or before `as_of`.
pub fn due_items<'a, K, I>(states: I, as_of: Timestamp) -> HashSet<K>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, &'a ReviewState)>,
{
    states
        .into_iter()
        .filter(|(_, state)| state.is_due(as_of))
        .map(|(key, _)| key)
        .collect()
}
