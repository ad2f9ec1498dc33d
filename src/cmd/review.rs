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

use crate::cmd::OutputFormat;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::timestamp::Timestamp;
use crate::types::vocabulary::VocabularyId;

/// Submits a single review without the interactive drill.
pub fn review_item(
    coll: &mut Collection,
    id: VocabularyId,
    score: i64,
    time_spent_secs: i64,
    format: OutputFormat,
) -> Fallible<()> {
    let outcome = coll.submit_review(id, score, time_spent_secs, Timestamp::now())?;
    match format {
        OutputFormat::Text => {
            println!("Proficiency: {}", outcome.proficiency_level);
            println!("Review count: {}", outcome.review_count);
            println!("Ease factor: {:.2}", outcome.ease_factor);
            println!("Next review: {}", outcome.next_review_date);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::helper::sample_word;
    use crate::helper::tmp_collection;

    #[test]
    fn test_review_item() -> Fallible<()> {
        let (_dir, mut coll) = tmp_collection()?;
        let id = coll.save_vocabulary(sample_word("laconic"), Timestamp::now())?;
        review_item(&mut coll, id, 3, 4, OutputFormat::Json)?;
        let entries = coll.entries()?;
        assert_eq!(entries[0].state.review_count, 1);
        Ok(())
    }

    #[test]
    fn test_review_unknown_item() -> Fallible<()> {
        let (_dir, mut coll) = tmp_collection()?;
        let err = review_item(&mut coll, VocabularyId::new(7), 2, 0, OutputFormat::Text)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        Ok(())
    }
}
