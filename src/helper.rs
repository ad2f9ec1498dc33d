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

use tempfile::TempDir;
use tempfile::tempdir;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::vocabulary::NewVocabulary;

/// Opens a collection in a fresh temporary directory. The directory is
/// removed when the returned guard is dropped.
pub fn tmp_collection() -> Fallible<(TempDir, Collection)> {
    let dir = tempdir()?;
    let path = dir.path().canonicalize()?.display().to_string();
    let coll = Collection::new(Some(path), None)?;
    Ok((dir, coll))
}

pub fn sample_word(word_phrase: &str) -> NewVocabulary {
    NewVocabulary {
        word_phrase: word_phrase.to_string(),
        classification: "adjective".to_string(),
        pronunciation: String::new(),
        meaning: format!("the meaning of {}", word_phrase.trim()),
        example: format!("A sentence using {}.", word_phrase.trim()),
        feedback: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmp_collection() -> Fallible<()> {
        let (dir, coll) = tmp_collection()?;
        assert!(dir.path().join("lexicards.db").exists());
        assert_eq!(coll.learner(), "default");
        Ok(())
    }
}
