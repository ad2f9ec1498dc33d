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

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ErrorReport;

/// Coarse learning stage of an item. Always derived from the review count.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Proficiency {
    New,
    Learning,
    Familiar,
    Mastered,
}

impl Proficiency {
    pub fn from_review_count(review_count: usize) -> Self {
        match review_count {
            0 => Proficiency::New,
            1..=4 => Proficiency::Learning,
            5..=9 => Proficiency::Familiar,
            _ => Proficiency::Mastered,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Proficiency::New => "new",
            Proficiency::Learning => "learning",
            Proficiency::Familiar => "familiar",
            Proficiency::Mastered => "mastered",
        }
    }
}

impl Display for Proficiency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Accepts either the name or the numeric level.
impl FromStr for Proficiency {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" | "0" => Ok(Proficiency::New),
            "learning" | "1" => Ok(Proficiency::Learning),
            "familiar" | "2" => Ok(Proficiency::Familiar),
            "mastered" | "3" => Ok(Proficiency::Mastered),
            _ => Err(ErrorReport::invalid_argument(format!(
                "invalid proficiency level: {s}"
            ))),
        }
    }
}

impl Serialize for Proficiency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
