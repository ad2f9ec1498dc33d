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

pub fn print_stats(coll: &Collection, format: OutputFormat) -> Fallible<()> {
    let dashboard = coll.dashboard(Timestamp::now())?;
    match format {
        OutputFormat::Text => {
            let levels = dashboard.statistics.proficiency_levels;
            println!("Collection: {}", coll.directory.display());
            println!("Learner: {}", coll.learner());
            println!("Vocabulary: {}", dashboard.total_vocabulary);
            println!("  new:      {}", levels.new);
            println!("  learning: {}", levels.learning);
            println!("  familiar: {}", levels.familiar);
            println!("  mastered: {}", levels.mastered);
            println!("Due now: {}", dashboard.statistics.due_count);
        }
        OutputFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&dashboard)?;
            println!("{}", stats_json);
        }
    }
    Ok(())
}
