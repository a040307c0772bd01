use crate::core::run::Contributor;
use crate::error::BotResult;

use once_cell::sync::Lazy;
use regex::Regex;
use slack_morphism::{
    api::SlackApiUsersListRequest, hyper_tokio::SlackHyperClient, SlackApiToken, SlackUser,
};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error};

// <@U123> or <@U123|display name>
static REGEX_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<@([A-Z0-9]+)(?:\|[^>]*)?>$").unwrap());

/// Turns what a member typed to designate someone into that person's stable identifier.
pub trait ContributorResolver {
    fn resolve(&self, text: &str) -> impl Future<Output = Option<Contributor>> + Send;
}

// The names a workspace member can be designated by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: String,
    pub names: Vec<String>,
}

impl From<&SlackUser> for Member {
    fn from(user: &SlackUser) -> Self {
        let profile = user.profile.as_ref();
        let names = [
            user.name.clone(),
            profile.and_then(|p| p.display_name.clone()),
            profile.and_then(|p| p.real_name.clone()),
        ]
        .into_iter()
        .flatten()
        .filter(|name| !name.is_empty())
        .collect();

        Member {
            id: user.id.0.clone(),
            names,
        }
    }
}

pub fn mention_id(text: &str) -> Option<&str> {
    REGEX_MENTION
        .captures(text.trim())
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str())
}

/// First member having a username, display name or real name equal to `text`, ignoring case.
pub fn match_member(members: &[Member], text: &str) -> Option<Contributor> {
    let wanted = text.trim().trim_start_matches('@').to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    members
        .iter()
        .find(|m| m.names.iter().any(|name| name.to_lowercase() == wanted))
        .map(|m| Contributor::new(m.id.clone()))
}

/// Resolution against the Slack workspace directory.
pub struct SlackResolver {
    client: Arc<SlackHyperClient>,
    token: SlackApiToken,
}

impl SlackResolver {
    pub fn new(client: Arc<SlackHyperClient>, token: SlackApiToken) -> Self {
        SlackResolver { client, token }
    }

    async fn members(&self) -> BotResult<Vec<Member>> {
        let session = self.client.open_session(&self.token);
        let response = session
            .users_list(&SlackApiUsersListRequest::new())
            .await?;
        Ok(response.members.iter().map(Member::from).collect())
    }
}

impl ContributorResolver for SlackResolver {
    async fn resolve(&self, text: &str) -> Option<Contributor> {
        if let Some(id) = mention_id(text) {
            return Some(Contributor::new(id));
        }

        match self.members().await {
            Ok(members) => {
                let found = match_member(&members, text);
                debug!("Resolved '{text}' to {found:?} among {} members.", members.len());
                found
            }
            Err(e) => {
                error!("{e}");
                None
            }
        }
    }
}
