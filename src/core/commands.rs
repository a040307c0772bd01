use crate::core::{
    events::Reply,
    leaderboard::LeaderboardView,
    run::{Contributor, GameTitle},
    store::RunStore,
};
use crate::error::BotError;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

const COMMANDS: [&str; 7] = [
    "!help",
    "!speedrun",
    "!remove",
    "!runs",
    "!leaderboard",
    "!games",
    "!uptime",
];
// First word of the message, with "!" prefix
static REGEX_KEYWORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(![[:alpha:]]+)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    // !speedrun <game...> <time>
    Submit { game: String, time: String },
    // !remove <placement> <game...>
    Remove { placement: usize, game: String },
    // !runs [member]
    ListUser(Option<String>),
    // !leaderboard <game...>
    ListGame(String),
    ListGames,
    Uptime,
    // Known keyword, unusable arguments.
    Usage(&'static str),
}

/// What the messaging layer knows about the message being handled.
#[derive(Debug, Clone)]
pub struct Context {
    pub author: Contributor,
    // Contributor resolved from the member named by `!runs <member>`, if any.
    pub member: Option<Contributor>,
    pub started: DateTime<Utc>,
}

fn keyword(input: &str) -> Option<&'static str> {
    REGEX_KEYWORD
        .captures(input)
        .and_then(|caps| caps.get(1))
        .and_then(|mat| COMMANDS.iter().find(|c| **c == mat.as_str()).copied())
}

impl Command {
    pub fn is_command(input: &str) -> bool {
        keyword(input).is_some()
    }

    pub fn build_from(input: &str) -> Option<Command> {
        let keyword = keyword(input)?;
        let args = input.split_whitespace().skip(1).collect::<Vec<&str>>();

        let command = match keyword {
            cmd if cmd == COMMANDS[0] => Command::Help,
            cmd if cmd == COMMANDS[1] => match args.split_last() {
                // The last word is the time, everything before is the title.
                Some((time, game)) if !game.is_empty() => Command::Submit {
                    game: game.join(" "),
                    time: time.to_string(),
                },
                _ => Command::Usage(cmd),
            },
            cmd if cmd == COMMANDS[2] => match args.split_first() {
                Some((placement, game)) if !game.is_empty() => match placement.parse::<usize>() {
                    Ok(placement) if placement > 0 => Command::Remove {
                        placement,
                        game: game.join(" "),
                    },
                    _ => Command::Usage(cmd),
                },
                _ => Command::Usage(cmd),
            },
            cmd if cmd == COMMANDS[3] => match args.is_empty() {
                true => Command::ListUser(None),
                false => Command::ListUser(Some(args.join(" "))),
            },
            cmd if cmd == COMMANDS[4] => match args.is_empty() {
                true => Command::Usage(cmd),
                false => Command::ListGame(args.join(" ")),
            },
            cmd if cmd == COMMANDS[5] => Command::ListGames,
            cmd if cmd == COMMANDS[6] => Command::Uptime,
            _ => unreachable!(),
        };
        Some(command)
    }

    /// Member name to resolve before the command can be executed.
    pub fn member_to_resolve(&self) -> Option<&str> {
        match self {
            Command::ListUser(Some(name)) => Some(name),
            _ => None,
        }
    }

    pub fn execute(&self, store: &mut RunStore, ctx: &Context) -> Reply {
        match self {
            Command::Help => Reply::Help,
            Command::Usage(cmd) => Reply::Usage(*cmd),
            Command::Submit { game, time } => {
                match store.submit(game, time, &ctx.author) {
                    Ok(placement) => Reply::RunSaved {
                        game: GameTitle::normalize(game),
                        time: time.trim().to_string(),
                        placement,
                    },
                    Err(BotError::InvalidTimeFormat(time)) => Reply::InvalidTime(time),
                    Err(e) => Reply::Failure(e.to_string()),
                }
            }
            Command::Remove { placement, game } => {
                match store.remove(game, *placement, &ctx.author) {
                    Ok(()) => Reply::RunRemoved {
                        game: GameTitle::normalize(game),
                        placement: *placement,
                    },
                    Err(BotError::NotFound) => Reply::RunNotFound {
                        game: GameTitle::normalize(game),
                        placement: *placement,
                    },
                    Err(e) => Reply::Failure(e.to_string()),
                }
            }
            Command::ListUser(name) => {
                let contributor = match (name, &ctx.member) {
                    (None, _) => ctx.author.clone(),
                    (Some(_), Some(member)) => member.clone(),
                    (Some(name), None) => return Reply::UnknownMember(name.clone()),
                };
                let runs = store.runs_by_contributor(&contributor);
                Reply::ContributorRuns { contributor, runs }
            }
            Command::ListGame(game) => {
                let standings =
                    LeaderboardView::new(store).best_per_contributor_leaderboard(game);
                Reply::Leaderboard {
                    game: GameTitle::normalize(game),
                    standings,
                }
            }
            Command::ListGames => Reply::Games(store.list_games()),
            Command::Uptime => Reply::Uptime(Utc::now() - ctx.started),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::tests::empty_store;

    fn ctx(author: &str) -> Context {
        Context {
            author: Contributor::new(author),
            member: None,
            started: Utc::now(),
        }
    }

    #[test]
    fn recognizes_commands() {
        assert!(Command::is_command("!speedrun celeste 00:30:00.0"));
        assert!(Command::is_command("  !games"));
        assert!(!Command::is_command("!speedruns"));
        assert!(!Command::is_command("hello !games"));
        assert!(!Command::is_command("games"));
    }

    #[test]
    fn submit_takes_last_word_as_time() {
        assert_eq!(
            Command::build_from("!speedrun mario kart 00:01:30.5"),
            Some(Command::Submit {
                game: "mario kart".to_string(),
                time: "00:01:30.5".to_string()
            })
        );
        assert_eq!(
            Command::build_from("!speedrun 00:01:30.5"),
            Some(Command::Usage("!speedrun"))
        );
    }

    #[test]
    fn remove_needs_positive_placement_and_game() {
        assert_eq!(
            Command::build_from("!remove 2 mario kart"),
            Some(Command::Remove {
                placement: 2,
                game: "mario kart".to_string()
            })
        );
        assert_eq!(
            Command::build_from("!remove 0 celeste"),
            Some(Command::Usage("!remove"))
        );
        assert_eq!(
            Command::build_from("!remove celeste"),
            Some(Command::Usage("!remove"))
        );
    }

    #[test]
    fn runs_takes_optional_member() {
        assert_eq!(Command::build_from("!runs"), Some(Command::ListUser(None)));
        let command = Command::build_from("!runs @jane doe").unwrap();
        assert_eq!(command.member_to_resolve(), Some("@jane doe"));
    }

    #[test]
    fn unknown_keyword_is_not_a_command() {
        assert_eq!(Command::build_from("!liste celeste"), None);
        assert_eq!(Command::build_from("just chatting"), None);
    }

    #[test]
    fn submit_then_list_leaderboard() {
        let mut store = empty_store();
        let submit = Command::build_from("!speedrun mario kart 00:01:30.5").unwrap();

        assert_eq!(
            submit.execute(&mut store, &ctx("U1")),
            Reply::RunSaved {
                game: GameTitle::normalize("Mario kart"),
                time: "00:01:30.5".to_string(),
                placement: 1
            }
        );

        let list = Command::build_from("!leaderboard MARIO KART").unwrap();
        match list.execute(&mut store, &ctx("U2")) {
            Reply::Leaderboard { game, standings } => {
                assert_eq!(game.as_str(), "Mario kart");
                assert_eq!(standings.len(), 1);
                assert_eq!(standings[0].run.contributor, Contributor::new("U1"));
            }
            other => panic!("unexpected reply {other:?}"),
        }
    }

    #[test]
    fn invalid_time_is_reported() {
        let mut store = empty_store();
        let submit = Command::build_from("!speedrun celeste 1:30").unwrap();
        assert_eq!(
            submit.execute(&mut store, &ctx("U1")),
            Reply::InvalidTime("1:30".to_string())
        );
        assert!(store.list_games().is_empty());
    }

    #[test]
    fn remove_is_scoped_to_author() {
        let mut store = empty_store();
        Command::build_from("!speedrun celeste 00:30:00.0")
            .unwrap()
            .execute(&mut store, &ctx("U1"));

        let remove = Command::build_from("!remove 1 celeste").unwrap();
        assert_eq!(
            remove.execute(&mut store, &ctx("U2")),
            Reply::RunNotFound {
                game: GameTitle::normalize("celeste"),
                placement: 1
            }
        );
        assert_eq!(
            remove.execute(&mut store, &ctx("U1")),
            Reply::RunRemoved {
                game: GameTitle::normalize("celeste"),
                placement: 1
            }
        );
        assert!(store.list_games().is_empty());
    }

    #[test]
    fn runs_of_unresolved_member() {
        let mut store = empty_store();
        let command = Command::build_from("!runs nobody").unwrap();
        assert_eq!(
            command.execute(&mut store, &ctx("U1")),
            Reply::UnknownMember("nobody".to_string())
        );

        let resolved = Context {
            member: Some(Contributor::new("U9")),
            ..ctx("U1")
        };
        assert_eq!(
            command.execute(&mut store, &resolved),
            Reply::ContributorRuns {
                contributor: Contributor::new("U9"),
                runs: vec![]
            }
        );
    }
}
