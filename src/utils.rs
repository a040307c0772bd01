use crate::core::run::Contributor;
use chrono::Duration;

pub fn suffix(num: usize) -> &'static str {
    let s = num.to_string();
    if s.ends_with('1') && !s.ends_with("11") {
        "st"
    } else if s.ends_with('2') && !s.ends_with("12") {
        "nd"
    } else if s.ends_with('3') && !s.ends_with("13") {
        "rd"
    } else {
        "th"
    }
}

pub fn format_rank(rank: usize) -> String {
    format!("{}{}", rank, suffix(rank))
}

/// Coarse human readable duration, e.g. "2d 03h 04m 05s".
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let (days, hours, minutes, seconds) = (
        total / 86_400,
        (total % 86_400) / 3_600,
        (total % 3_600) / 60,
        total % 60,
    );

    match (days, hours, minutes) {
        (0, 0, 0) => format!("{seconds}s"),
        (0, 0, _) => format!("{minutes}m {seconds:02}s"),
        (0, _, _) => format!("{hours}h {minutes:02}m {seconds:02}s"),
        _ => format!("{days}d {hours:02}h {minutes:02}m {seconds:02}s"),
    }
}

// Slack renders <@U123> as the member's current display name.
pub fn mention(contributor: &Contributor) -> String {
    format!("<@{}>", contributor)
}
