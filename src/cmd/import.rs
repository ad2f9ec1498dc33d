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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::timestamp::Timestamp;

pub fn import_word_lists(coll: &mut Collection, path: &Path) -> Fallible<()> {
    let summary = coll.import_directory(path, Timestamp::now())?;
    println!(
        "Imported {} words ({} already present).",
        summary.added, summary.skipped
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;
    use crate::helper::tmp_collection;

    #[test]
    fn test_non_existent_directory() -> Fallible<()> {
        let (_dir, mut coll) = tmp_collection()?;
        assert!(import_word_lists(&mut coll, Path::new("./derpherp")).is_err());
        Ok(())
    }

    #[test]
    fn test_import_from_path() -> Fallible<()> {
        let (_dir, mut coll) = tmp_collection()?;
        let lists = tempdir()?;
        write(
            lists.path().join("words.toml"),
            "[[word]]\nword_phrase = \"laconic\"\nexample = \"A laconic reply.\"\n",
        )?;
        import_word_lists(&mut coll, lists.path())?;
        assert_eq!(coll.entries()?.len(), 1);
        Ok(())
    }
}
