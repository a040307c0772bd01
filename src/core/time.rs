use crate::error::{BotError, BotResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// HH:MM:SS.mmm, hours are not capped, fractional part is 1 to 3 digits.
static REGEX_RUN_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{2}):([0-5][0-9]):([0-5][0-9])\.([0-9]{1,3})$").unwrap());

/// A validated run time. The canonical text is kept verbatim for display,
/// the total number of milliseconds is the only comparison key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RunTime {
    text: String,
    millis: i64,
}

impl RunTime {
    pub fn parse(input: &str) -> BotResult<Self> {
        let text = input.trim();
        let caps = REGEX_RUN_TIME
            .captures(text)
            .ok_or_else(|| BotError::InvalidTimeFormat(input.to_string()))?;

        // The pattern guarantees ascii digits in every group.
        let field = |i: usize| caps[i].parse::<i64>().unwrap_or_default();
        let fraction = &caps[4];
        // ".5" is half a second, not 5 milliseconds
        let millis_part = field(4) * 10_i64.pow(3 - fraction.len() as u32);

        let millis = ((field(1) * 60 + field(2)) * 60 + field(3)) * 1000 + millis_part;

        Ok(RunTime {
            text: text.to_string(),
            millis,
        })
    }

    pub fn is_valid(input: &str) -> bool {
        RunTime::parse(input).is_ok()
    }

    pub fn to_millis(&self) -> i64 {
        self.millis
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for RunTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl TryFrom<String> for RunTime {
    type Error = BotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RunTime::parse(&value)
    }
}

impl From<RunTime> for String {
    fn from(time: RunTime) -> Self {
        time.text
    }
}

// Equality follows the elapsed time, "00:00:01.5" and "00:00:01.500" are the same run time.
impl PartialEq for RunTime {
    fn eq(&self, other: &Self) -> bool {
        self.millis == other.millis
    }
}

impl Eq for RunTime {}

impl PartialOrd for RunTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RunTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.millis.cmp(&other.millis)
    }
}
