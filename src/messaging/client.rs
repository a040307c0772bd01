use crate::config::Settings;
use crate::core::{
    commands::{Command, Context},
    events::{Lifecycle, Reply},
    run::Contributor,
    store::RunStore,
};
use crate::error::{BotError, BotResult};
use crate::messaging::resolver::{ContributorResolver, SlackResolver};

use chrono::{DateTime, Utc};
use http::StatusCode;
use slack_morphism::{
    api::SlackApiChatPostMessageRequest,
    events::{SlackEventCallbackBody, SlackPushEventCallback},
    hyper_tokio::{SlackClientHyperConnector, SlackHyperClient},
    listener::{SlackClientEventsListenerEnvironment, SlackClientEventsUserState},
    SlackApiToken, SlackApiTokenValue, SlackChannelId, SlackClient, SlackClientSocketModeConfig,
    SlackClientSocketModeListener, SlackMessageContent, SlackSocketModeListenerCallbacks,
};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info};

/// State shared with the Slack event callbacks.
#[derive(Clone)]
pub struct BotState {
    // One command at a time mutates the store, the lock is never held across an await.
    pub store: Arc<Mutex<RunStore>>,
    pub started: DateTime<Utc>,
    pub bot_token: SlackApiToken,
}

impl BotState {
    pub fn new(store: RunStore, bot_token: SlackApiToken) -> Self {
        BotState {
            store: Arc::new(Mutex::new(store)),
            started: Utc::now(),
            bot_token,
        }
    }

    /// Resolve the member named by the command (if any), then run it against the store.
    pub async fn handle<R: ContributorResolver>(
        &self,
        command: Command,
        author: Contributor,
        resolver: &R,
    ) -> Reply {
        let member = match command.member_to_resolve() {
            Some(name) => resolver.resolve(name).await,
            None => None,
        };
        let ctx = Context {
            author,
            member,
            started: self.started,
        };

        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        command.execute(&mut store, &ctx)
    }
}

async fn push_events_socket_mode_function(
    event: SlackPushEventCallback,
    client: Arc<SlackHyperClient>,
    states: SlackClientEventsUserState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Only watch Message events for now. To be switched to match cases if we want other behaviors
    // on other event types.
    if let SlackEventCallbackBody::Message(message) = event.event {
        if message.sender.bot_id.is_some() {
            // Abort if message from bot
            return Ok(());
        }

        if let (Some(content), Some(channel_id), Some(user)) =
            (message.content, message.origin.channel, message.sender.user)
        {
            let Some(text) = content.text else {
                return Ok(());
            };
            let Some(command) = Command::build_from(&text) else {
                return Ok(());
            };

            info!("Received {command:?} from {user} in channel id {channel_id}.");
            let state = states
                .read()
                .await
                .get_user_state::<BotState>()
                .cloned()
                .ok_or_else(|| BotError::Slack("Bot state is not registered".to_string()))?;

            let resolver = SlackResolver::new(client.clone(), state.bot_token.clone());
            let reply = state
                .handle(command, Contributor::new(user.0), &resolver)
                .await;

            let ts = message.origin.ts; // to respond in thread
            let session = client.open_session(&state.bot_token);
            let response = SlackApiChatPostMessageRequest::new(
                channel_id,
                SlackMessageContent::new().with_text(reply.to_string()),
            )
            .with_thread_ts(ts);
            session.chat_post_message(&response).await?;
        }
    }
    Ok(())
}

fn error_handler(
    err: Box<dyn std::error::Error + Send + Sync>,
    _client: Arc<SlackHyperClient>,
    _states: SlackClientEventsUserState,
) -> StatusCode {
    let error = BotError::Slack(err.to_string());
    error!("{error}");

    // Acknowledge anyway, Slack would otherwise redeliver the event.
    // https://api.slack.com/apis/connections/socket-implement#acknowledge
    StatusCode::OK
}

pub struct Messaging {
    client: Arc<SlackHyperClient>,
    state: BotState,
    app_token: SlackApiToken,
    monitoring_channel: Option<SlackChannelId>,
}

impl Messaging {
    pub fn new(settings: &Settings, store: RunStore) -> Self {
        let client = Arc::new(SlackClient::new(SlackClientHyperConnector::new()));
        let bot_token_value: SlackApiTokenValue = settings.slack_token.clone().into();
        let app_token_value: SlackApiTokenValue = settings.slack_app_token.clone().into();

        Messaging {
            client,
            state: BotState::new(store, SlackApiToken::new(bot_token_value)),
            app_token: SlackApiToken::new(app_token_value),
            monitoring_channel: settings
                .slack_monitoring_channel
                .clone()
                .map(SlackChannelId),
        }
    }

    /// Post a lifecycle notice on the monitoring channel, if one is configured.
    pub async fn announce(&self, notice: Lifecycle) {
        let Some(channel_id) = self.monitoring_channel.clone() else {
            debug!("No monitoring channel, skipping notice: {notice:?}");
            return;
        };

        let session = self.client.open_session(&self.state.bot_token);
        let request = SlackApiChatPostMessageRequest::new(
            channel_id,
            SlackMessageContent::new().with_text(notice.to_string()),
        );
        if let Err(e) = session.chat_post_message(&request).await {
            let error = BotError::from(e);
            error!("{error}");
        };
    }

    pub async fn announce_online(&self) {
        self.announce(Lifecycle::Online).await
    }

    /// Shutdown hook, to be called by the host process before it exits.
    pub async fn announce_offline(&self) {
        let uptime = Utc::now() - self.state.started;
        self.announce(Lifecycle::Offline(uptime)).await
    }

    /// Handle messages from users until ctrl-c.
    pub async fn listen(&self) -> BotResult<()> {
        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new()
            .with_push_events(push_events_socket_mode_function);

        let listener_environment = Arc::new(
            SlackClientEventsListenerEnvironment::new(self.client.clone())
                .with_error_handler(error_handler)
                .with_user_state(self.state.clone()),
        );

        let socket_mode_listener = SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment.clone(),
            socket_mode_callbacks,
        );

        socket_mode_listener.listen_for(&self.app_token).await?;
        info!("Listening for commands.");

        // Returns once the listener has shut itself down on ctrl-c.
        socket_mode_listener.serve().await;
        info!("Received shutdown signal.");

        Ok(())
    }
}
