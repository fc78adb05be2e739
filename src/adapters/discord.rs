//! Discord REST adapter: implements [`ChannelPort`] over [`HttpTransport`].
//!
//! | Operation      | Request                                                      |
//! |----------------|--------------------------------------------------------------|
//! | `fetch_latest` | `GET  /channels/{channel}/messages?limit=1`                  |
//! | `react`        | `PUT  /channels/{channel}/messages/{id}/reactions/{emoji}/@me` |
//! | `reply`        | `POST /channels/{channel}/messages` (JSON body)              |
//!
//! Every request carries `Authorization: Bot <token>`.  The WiFi link is
//! checked (and re-associated if needed) before each request.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use super::utils::percent_encode;
use super::wifi::ConnectivityPort;
use crate::app::ports::{ChannelPort, InboundMessage};
use crate::config::AgentConfig;
use crate::error::{DecodeError, TransportError};

const USER_AGENT: &str = concat!("DiscordBot (powerswitch, ", env!("CARGO_PKG_VERSION"), ")");

// ── Wire types ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ApiAuthor {
    id: String,
}

/// The subset of a Discord message object the agent reads.
#[derive(Debug, Deserialize)]
struct ApiMessage {
    id: String,
    channel_id: String,
    author: ApiAuthor,
    /// Absent for some system messages.
    #[serde(default)]
    content: String,
}

impl From<ApiMessage> for InboundMessage {
    fn from(m: ApiMessage) -> Self {
        Self {
            message_id: m.id,
            author_id: m.author.id,
            channel_id: m.channel_id,
            content: m.content,
        }
    }
}

#[derive(Debug, Serialize)]
struct MessageReference<'a> {
    message_id: &'a str,
}

#[derive(Debug, Serialize)]
struct ReplyBody<'a> {
    content: &'a str,
    message_reference: MessageReference<'a>,
}

/// Decode a `GET messages?limit=1` response body: a JSON array holding
/// zero or one message object.
pub fn parse_latest(body: &[u8]) -> Result<Option<InboundMessage>, DecodeError> {
    let text = core::str::from_utf8(body).map_err(|_| DecodeError::Utf8)?;
    let messages: Vec<ApiMessage> = serde_json::from_str(text)?;
    Ok(messages.into_iter().next().map(InboundMessage::from))
}

/// JSON body of a reply to `message_id`.
pub fn reply_body(message_id: &str, text: &str) -> Result<Vec<u8>, DecodeError> {
    let body = ReplyBody {
        content: text,
        message_reference: MessageReference { message_id },
    };
    Ok(serde_json::to_vec(&body)?)
}

// ── Adapter ───────────────────────────────────────────────────

pub struct DiscordChannel<H, C> {
    http: H,
    link: C,
    api_base: String,
    channel_id: String,
    authorization: String,
}

impl<H: HttpTransport, C: ConnectivityPort> DiscordChannel<H, C> {
    pub fn new(http: H, link: C, config: &AgentConfig) -> Self {
        Self {
            http,
            link,
            api_base: config.api_base.trim_end_matches('/').into(),
            channel_id: config.auth.channel_id.clone(),
            authorization: format!("Bot {}", config.auth.bot_credential),
        }
    }

    pub fn link(&self) -> &C {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut C {
        &mut self.link
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    // ── URL builders ──────────────────────────────────────────

    pub fn latest_message_url(&self) -> String {
        format!("{}/channels/{}/messages?limit=1", self.api_base, self.channel_id)
    }

    pub fn reaction_url(&self, message_id: &str, emoji: &str) -> String {
        format!(
            "{}/channels/{}/messages/{}/reactions/{}/@me",
            self.api_base,
            self.channel_id,
            message_id,
            percent_encode(emoji)
        )
    }

    pub fn post_message_url(&self, channel_id: &str) -> String {
        format!("{}/channels/{}/messages", self.api_base, channel_id)
    }

    // ── Internal ──────────────────────────────────────────────

    fn ensure_link(&mut self) -> Result<(), TransportError> {
        self.link.ensure_connected().map_err(|e| {
            warn!("Discord: link down ({})", e);
            TransportError::NotConnected
        })
    }

    fn send(
        &mut self,
        method: HttpMethod,
        url: &str,
        body: &[u8],
    ) -> Result<HttpResponse, TransportError> {
        self.ensure_link()?;

        let json = [
            ("Authorization", self.authorization.as_str()),
            ("User-Agent", USER_AGENT),
            ("Content-Type", "application/json"),
        ];
        let headers = if body.is_empty() { &json[..2] } else { &json[..] };
        let response = self.http.execute(&HttpRequest {
            method,
            url,
            headers,
            body,
        })?;

        debug!("Discord: {:?} -> {}", method, response.status);
        if !response.is_success() {
            return Err(TransportError::Status(response.status));
        }
        Ok(response)
    }
}

impl<H: HttpTransport, C: ConnectivityPort> ChannelPort for DiscordChannel<H, C> {
    fn fetch_latest(&mut self) -> Result<Option<InboundMessage>, TransportError> {
        let url = self.latest_message_url();
        let response = self.send(HttpMethod::Get, &url, &[])?;
        Ok(parse_latest(&response.body)?)
    }

    fn react(&mut self, message_id: &str, emoji: &str) -> Result<(), TransportError> {
        let url = self.reaction_url(message_id, emoji);
        self.send(HttpMethod::Put, &url, &[]).map(drop)
    }

    fn reply(
        &mut self,
        message_id: &str,
        channel_id: &str,
        text: &str,
    ) -> Result<(), TransportError> {
        let url = self.post_message_url(channel_id);
        let body = reply_body(message_id, text)?;
        self.send(HttpMethod::Post, &url, &body).map(drop)
    }
}
