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

use crate::cmd::format_entry;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::proficiency::Proficiency;

pub fn list_vocabulary(
    coll: &Collection,
    skip: usize,
    limit: usize,
    proficiency: Option<Proficiency>,
) -> Fallible<()> {
    let entries = coll.list_vocabulary(skip, limit, proficiency)?;
    for entry in &entries {
        println!("{}", format_entry(entry));
        if !entry.vocabulary.meaning.is_empty() {
            println!("       {}", entry.vocabulary.meaning);
        }
    }
    Ok(())
}
