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

pub fn print_progress(coll: &Collection, days: u32, format: OutputFormat) -> Fallible<()> {
    let progress = coll.progress(days, Timestamp::now())?;
    match format {
        OutputFormat::Text => {
            if progress.is_empty() {
                println!("No reviews in the last {days} days.");
                return Ok(());
            }
            println!("{:<10}  {:>7}  {:>7}  {:>8}", "date", "reviews", "correct", "time (s)");
            for day in &progress {
                println!(
                    "{:<10}  {:>7}  {:>7}  {:>8}",
                    day.date.to_string(),
                    day.total_reviews,
                    day.correct_answers,
                    day.time_spent_secs
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
    }
    Ok(())
}
