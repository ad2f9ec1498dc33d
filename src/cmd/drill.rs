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

use std::io::BufRead;
use std::io::Write;
use std::io::stdin;
use std::io::stdout;
use std::time::Instant;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::grade::Grade;
use crate::types::timestamp::Timestamp;

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct DrillSummary {
    pub reviewed: usize,
    pub correct: usize,
}

/// Drill the words due today in the terminal.
pub fn drill(coll: &mut Collection) -> Fallible<()> {
    let stdin = stdin();
    let mut input = stdin.lock();
    let mut output = stdout();
    run_drill(coll, &mut input, &mut output)?;
    Ok(())
}

pub fn run_drill<R: BufRead, W: Write>(
    coll: &mut Collection,
    input: &mut R,
    output: &mut W,
) -> Fallible<DrillSummary> {
    let mut summary = DrillSummary::default();
    let entries = coll.due_reviews(Timestamp::now())?;
    if entries.is_empty() {
        writeln!(output, "No words due for review.")?;
        return Ok(summary);
    }
    let total = entries.len();
    log::debug!("Drilling {total} words.");
    for (index, entry) in entries.iter().enumerate() {
        let vocabulary = &entry.vocabulary;
        writeln!(output)?;
        writeln!(
            output,
            "[{}/{}] {}",
            index + 1,
            total,
            vocabulary.word_phrase
        )?;
        writeln!(output, "[press Enter to reveal, q to quit]")?;
        let started = Instant::now();
        match read_line(input)? {
            None => break,
            Some(line) if line == "q" => break,
            Some(_) => {}
        }

        if !vocabulary.pronunciation.is_empty() {
            writeln!(output, "Pronunciation: {}", vocabulary.pronunciation)?;
        }
        if !vocabulary.classification.is_empty() {
            writeln!(output, "Class: {}", vocabulary.classification)?;
        }
        if !vocabulary.meaning.is_empty() {
            writeln!(output, "Meaning: {}", vocabulary.meaning)?;
        }
        for example in &vocabulary.examples {
            writeln!(output, "Example: {}", example.sentence)?;
        }

        let grade = match read_grade(input, output)? {
            Some(grade) => grade,
            None => break,
        };
        let time_spent_secs = i64::try_from(started.elapsed().as_secs()).unwrap_or(i64::MAX);
        let outcome =
            coll.submit_review(vocabulary.id, grade.score(), time_spent_secs, Timestamp::now())?;
        writeln!(
            output,
            "Next review: {} ({})",
            outcome.next_review_date, outcome.proficiency_level
        )?;
        summary.reviewed += 1;
        if grade.is_correct() {
            summary.correct += 1;
        }
    }
    writeln!(output)?;
    writeln!(
        output,
        "Session completed: {} reviewed, {} correct.",
        summary.reviewed, summary.correct
    )?;
    Ok(summary)
}

/// Reads a trimmed line. Returns `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Fallible<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prompts until the learner enters a valid score. Returns `None` if they
/// quit or the input ends.
fn read_grade<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Fallible<Option<Grade>> {
    loop {
        writeln!(
            output,
            "Score: (0 = Again, 1 = Hard, 2 = Good, 3 = Easy, q = quit)"
        )?;
        let line = match read_line(input)? {
            Some(line) => line,
            None => return Ok(None),
        };
        if line == "q" {
            return Ok(None);
        }
        match line.parse::<i64>().ok().map(Grade::try_from) {
            Some(Ok(grade)) => return Ok(Some(grade)),
            _ => writeln!(
                output,
                "Invalid input. Please enter a number between 0 and 3."
            )?,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::helper::sample_word;
    use crate::helper::tmp_collection;
    use crate::types::proficiency::Proficiency;

    fn run(coll: &mut Collection, input: &str) -> Fallible<(DrillSummary, String)> {
        let mut input = Cursor::new(input.as_bytes().to_vec());
        let mut output: Vec<u8> = Vec::new();
        let summary = run_drill(coll, &mut input, &mut output)?;
        Ok((summary, String::from_utf8(output).unwrap()))
    }

    #[test]
    fn test_nothing_due() -> Fallible<()> {
        let (_dir, mut coll) = tmp_collection()?;
        coll.save_vocabulary(sample_word("laconic"), Timestamp::now())?;
        let (summary, output) = run(&mut coll, "")?;
        assert_eq!(summary, DrillSummary::default());
        assert!(output.contains("No words due for review."));
        Ok(())
    }

    #[test]
    fn test_drill_reviews_due_words() -> Fallible<()> {
        let (_dir, mut coll) = tmp_collection()?;
        let saved_at = Timestamp::now().minus_days(2)?;
        coll.save_vocabulary(sample_word("laconic"), saved_at)?;
        coll.save_vocabulary(sample_word("verbose"), saved_at)?;

        let (summary, output) = run(&mut coll, "\n2\n\n9\n0\n")?;
        assert_eq!(summary, DrillSummary { reviewed: 2, correct: 1 });
        assert!(output.contains("Meaning: the meaning of laconic"));
        assert!(output.contains("Example: A sentence using verbose."));
        assert!(output.contains("Invalid input."));
        assert!(output.contains("Session completed: 2 reviewed, 1 correct."));

        let entries = coll.entries()?;
        assert_eq!(entries[0].state.proficiency(), Proficiency::Learning);
        assert_eq!(entries[1].state.proficiency(), Proficiency::New);
        assert_eq!(coll.sessions()?.len(), 2);
        assert!(coll.due_reviews(Timestamp::now())?.is_empty());
        Ok(())
    }

    #[test]
    fn test_quit_early() -> Fallible<()> {
        let (_dir, mut coll) = tmp_collection()?;
        let saved_at = Timestamp::now().minus_days(2)?;
        coll.save_vocabulary(sample_word("laconic"), saved_at)?;
        coll.save_vocabulary(sample_word("verbose"), saved_at)?;

        let (summary, _) = run(&mut coll, "\n3\nq\n")?;
        assert_eq!(summary, DrillSummary { reviewed: 1, correct: 1 });
        assert_eq!(coll.due_reviews(Timestamp::now())?.len(), 1);
        Ok(())
    }
}
