use crate::{
    core::{
        leaderboard::Standing,
        run::{Contributor, GameTitle, Run},
        templates::MessageTemplate,
    },
    utils::{format_duration, format_rank, mention},
};

use chrono::Duration;
use minijinja::context;
use std::fmt;

/// Outcome of a command, rendered as the text posted back in the channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Help,
    Usage(&'static str),
    RunSaved {
        game: GameTitle,
        time: String,
        placement: usize,
    },
    InvalidTime(String),
    RunRemoved {
        game: GameTitle,
        placement: usize,
    },
    RunNotFound {
        game: GameTitle,
        placement: usize,
    },
    ContributorRuns {
        contributor: Contributor,
        runs: Vec<(GameTitle, Run)>,
    },
    UnknownMember(String),
    Leaderboard {
        game: GameTitle,
        standings: Vec<Standing>,
    },
    Games(Vec<GameTitle>),
    Uptime(Duration),
    Failure(String),
}

/// Notices posted on the monitoring channel, outside of any command.
#[derive(Debug, Clone, PartialEq)]
pub enum Lifecycle {
    Online,
    Offline(Duration),
}

fn usage(cmd: &str) -> &'static str {
    match cmd {
        "!speedrun" => "!speedrun <game> <HH:MM:SS.mmm>",
        "!remove" => "!remove <placement> <game>",
        "!leaderboard" => "!leaderboard <game>",
        "!runs" => "!runs [member]",
        _ => "!help",
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rendered = match self {
            Reply::Help => MessageTemplate::Help.get().render(context! {}),
            Reply::Usage(cmd) => MessageTemplate::Usage
                .get()
                .render(context! { usage => usage(cmd) }),
            Reply::RunSaved {
                game,
                time,
                placement,
            } => MessageTemplate::RunSaved.get().render(context! {
                game => game.as_str(),
                time => time,
                placement => format_rank(*placement),
            }),
            Reply::InvalidTime(time) => MessageTemplate::InvalidTime
                .get()
                .render(context! { time => time }),
            Reply::RunRemoved { game, placement } => {
                MessageTemplate::RunRemoved.get().render(context! {
                    game => game.as_str(),
                    placement => format_rank(*placement),
                })
            }
            Reply::RunNotFound { game, placement } => {
                MessageTemplate::RunNotFound.get().render(context! {
                    game => game.as_str(),
                    placement => format_rank(*placement),
                })
            }
            Reply::ContributorRuns { contributor, runs } => {
                let runs = runs
                    .iter()
                    .map(|(game, run)| {
                        (
                            game.to_string(),
                            run.time.to_string(),
                            format_rank(run.placement),
                        )
                    })
                    .collect::<Vec<(String, String, String)>>();
                MessageTemplate::ContributorRuns.get().render(context! {
                    contributor => mention(contributor),
                    runs => runs,
                })
            }
            Reply::UnknownMember(name) => MessageTemplate::UnknownMember
                .get()
                .render(context! { name => name }),
            Reply::Leaderboard { game, standings } => {
                let standings = standings
                    .iter()
                    .map(|s| {
                        (
                            s.medal.map(|m| m.to_string()).unwrap_or_default(),
                            s.position,
                            mention(&s.run.contributor),
                            s.run.time.to_string(),
                        )
                    })
                    .collect::<Vec<(String, usize, String, String)>>();
                MessageTemplate::Leaderboard.get().render(context! {
                    game => game.as_str(),
                    standings => standings,
                })
            }
            Reply::Games(games) => {
                let games = games.iter().map(|g| g.to_string()).collect::<Vec<String>>();
                MessageTemplate::Games
                    .get()
                    .render(context! { games => games })
            }
            Reply::Uptime(uptime) => MessageTemplate::Uptime
                .get()
                .render(context! { uptime => format_duration(*uptime) }),
            Reply::Failure(error) => MessageTemplate::Failure
                .get()
                .render(context! { error => error }),
        };

        write!(f, "{}", rendered.map_err(|_| fmt::Error)?)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rendered = match self {
            Lifecycle::Online => MessageTemplate::Online.get().render(context! {}),
            Lifecycle::Offline(uptime) => MessageTemplate::Offline
                .get()
                .render(context! { uptime => format_duration(*uptime) }),
        };

        write!(f, "{}", rendered.map_err(|_| fmt::Error)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{leaderboard::Medal, time::RunTime};

    fn run(who: &str, time: &str, placement: usize) -> Run {
        Run {
            time: RunTime::parse(time).unwrap(),
            contributor: Contributor::new(who),
            placement,
        }
    }

    #[test]
    fn run_saved_mentions_ordinal_placement() {
        let reply = Reply::RunSaved {
            game: GameTitle::normalize("mario kart"),
            time: "00:01:30.5".to_string(),
            placement: 2,
        };
        assert_eq!(
            reply.to_string(),
            "✅ Speedrun saved! 00:01:30.5 on *Mario kart*, you are *2nd*."
        );
    }

    #[test]
    fn leaderboard_marks_podium_only() {
        let standings = (1..=4)
            .map(|position| Standing {
                position,
                medal: Medal::for_position(position),
                run: run(&format!("U{position}"), "00:01:00.0", position),
            })
            .collect();
        let text = Reply::Leaderboard {
            game: GameTitle::normalize("celeste"),
            standings,
        }
        .to_string();

        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "🏆 Leaderboard for *Celeste*:");
        assert!(lines[1].starts_with("🥇 <@U1>"));
        assert!(lines[2].starts_with("🥈 <@U2>"));
        assert!(lines[3].starts_with("🥉 <@U3>"));
        assert_eq!(lines[4].trim(), "4. <@U4> 00:01:00.0");
    }

    #[test]
    fn empty_leaderboard() {
        let text = Reply::Leaderboard {
            game: GameTitle::normalize("hades"),
            standings: vec![],
        }
        .to_string();
        assert_eq!(text, "🤷 No speedrun found for *Hades*.");
    }

    #[test]
    fn contributor_runs_list_games_and_placements() {
        let text = Reply::ContributorRuns {
            contributor: Contributor::new("U1"),
            runs: vec![
                (GameTitle::normalize("celeste"), run("U1", "00:30:00.000", 1)),
                (GameTitle::normalize("celeste"), run("U1", "01:00:00.000", 3)),
            ],
        }
        .to_string();

        assert!(text.starts_with("🏃 Runs of <@U1>:"));
        assert!(text.contains("*Celeste* 00:30:00.000 (1st)"));
        assert!(text.contains("*Celeste* 01:00:00.000 (3rd)"));
    }

    #[test]
    fn games_and_usage_render() {
        let text = Reply::Games(vec![
            GameTitle::normalize("zelda"),
            GameTitle::normalize("celeste"),
        ])
        .to_string();
        assert!(text.contains("• Zelda"));
        assert!(text.find("Zelda") < text.find("Celeste"));

        assert!(Reply::Usage("!remove")
            .to_string()
            .contains("!remove <placement> <game>"));
        assert!(Lifecycle::Offline(Duration::seconds(61))
            .to_string()
            .contains("1m 01s"));
    }
}
