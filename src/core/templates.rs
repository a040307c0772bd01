use minijinja::{Environment, Template};
use once_cell::sync::Lazy;
use strum::{EnumIter, IntoEnumIterator};
use tracing::info;

static TEMPLATES_ENVIRONMENT: Lazy<Environment> = Lazy::new(|| {
    info!("Initializing templating engine environment.");
    let mut env = Environment::new();

    // Use strum to iterate over the variants of the enum.
    for template in MessageTemplate::iter() {
        env.add_template(template.name(), template.template())
            .unwrap();
    }

    info!("Templates loaded in templating engine environment.");

    env
});

#[derive(Debug, Clone, Copy, EnumIter)]
pub enum MessageTemplate {
    Help,
    Usage,
    RunSaved,
    InvalidTime,
    RunRemoved,
    RunNotFound,
    ContributorRuns,
    UnknownMember,
    Leaderboard,
    Games,
    Uptime,
    Failure,
    Online,
    Offline,
}

impl MessageTemplate {
    pub fn name(&self) -> &'static str {
        match self {
            MessageTemplate::Help => "help.txt",
            MessageTemplate::Usage => "usage.txt",
            MessageTemplate::RunSaved => "run_saved.txt",
            MessageTemplate::InvalidTime => "invalid_time.txt",
            MessageTemplate::RunRemoved => "run_removed.txt",
            MessageTemplate::RunNotFound => "run_not_found.txt",
            MessageTemplate::ContributorRuns => "contributor_runs.txt",
            MessageTemplate::UnknownMember => "unknown_member.txt",
            MessageTemplate::Leaderboard => "leaderboard.txt",
            MessageTemplate::Games => "games.txt",
            MessageTemplate::Uptime => "uptime.txt",
            MessageTemplate::Failure => "failure.txt",
            MessageTemplate::Online => "online.txt",
            MessageTemplate::Offline => "offline.txt",
        }
    }

    pub fn get(&self) -> Template<'_, '_> {
        TEMPLATES_ENVIRONMENT.get_template(self.name()).unwrap()
    }

    pub fn template(&self) -> &'static str {
        // \n\ at each code line end creates a line break at the proper position and discards further spaces in this line of code.
        // \x20 (hex; 32 in decimal) is an ASCII space and an indicator for the first space to be preserved in this line of the string.
        match self {
            MessageTemplate::Help => {
                "🗒️ Please find below the speedrun commands handbook.\n\
                Times are always written `HH:MM:SS.mmm` (1 to 3 digits after the dot).\n\n\
                👉 ⏱️ *Submit a run*\n\
                ```!speedrun <game> <time>```\n\
                Records your run and tells you where it landed.\n\n\
                👉 🗑️ *Remove one of your runs*\n\
                ```!remove <placement> <game>```\n\
                Only works on your own runs.\n\n\
                👉 🏃 *Runs of a member*\n\
                ```!runs [member]```\n\
                All runs of a member (yours if no member is given), with their placement.\n\n\
                👉 🏆 *Leaderboard*\n\
                ```!leaderboard <game>```\n\
                Best run of each member for the game.\n\n\
                👉 🎮 *Games*\n\
                ```!games```\n\
                Every game with at least one run.\n\n\
                👉 🤖 *Uptime*\n\
                ```!uptime```"
            }
            MessageTemplate::Usage => {
                "🤔 I did not get that, the command is used like this:\n\
                ```{{ usage }}```"
            }
            MessageTemplate::RunSaved => {
                "✅ Speedrun saved! {{ time }} on *{{ game }}*, you are *{{ placement }}*{{ ' 🏆' if placement == '1st' }}."
            }
            MessageTemplate::InvalidTime => {
                "⚠️ `{{ time }}` is not a valid time, please use the `HH:MM:SS.mmm` format (e.g. `00:01:30.5`)."
            }
            MessageTemplate::RunRemoved => {
                "🗑️ Your run placed *{{ placement }}* on *{{ game }}* was removed."
            }
            MessageTemplate::RunNotFound => {
                "🔍 You have no run placed *{{ placement }}* on *{{ game }}*."
            }
            MessageTemplate::ContributorRuns => {
                "{%- if runs -%}
                    🏃 Runs of {{ contributor }}:
                    {%- for (game, time, placement) in runs %}\n\
                    \x20 • *{{ game }}* {{ time }} ({{ placement }})
                    {%- endfor %}
                {%- else -%}
                    🤷 {{ contributor }} has no run yet.
                {%- endif -%}"
            }
            MessageTemplate::UnknownMember => {
                "🤷 I could not find any member named *{{ name }}*."
            }
            MessageTemplate::Leaderboard => {
                "{%- if standings -%}
                    🏆 Leaderboard for *{{ game }}*:
                    {%- for (medal, position, contributor, time) in standings %}\n\
                    {{ medal if medal else '\x20 ' ~ position ~ '.' }} {{ contributor }} {{ time }}
                    {%- endfor %}
                {%- else -%}
                    🤷 No speedrun found for *{{ game }}*.
                {%- endif -%}"
            }
            MessageTemplate::Games => {
                "{%- if games -%}
                    🎮 Known games:
                    {%- for game in games %}\n\
                    \x20 • {{ game }}
                    {%- endfor %}
                {%- else -%}
                    🎮 No game has a run yet.
                {%- endif -%}"
            }
            MessageTemplate::Uptime => "🤖 Up and running for {{ uptime }}.",
            MessageTemplate::Failure => "💥 Something went wrong: {{ error }}",
            MessageTemplate::Online => "🟢 Speedrun bot is online.",
            MessageTemplate::Offline => "🔴 Speedrun bot is going offline after {{ uptime }}.",
        }
    }
}
