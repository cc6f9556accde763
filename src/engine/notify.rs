// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use serde_json::json;

use super::EngineError;
use crate::utils::{get_setting, http_client};

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub action_link: Option<String>,
}

/// One delivery mechanism. Channels fail independently; the sink swallows and
/// logs failures so callers never block on delivery.
pub trait NotificationChannel: Send {
    fn name(&self) -> &'static str;
    fn send(&self, conn: &Connection, user_id: i64, note: &Notification)
        -> Result<(), EngineError>;
}

/// Webhook-style push delivery to every endpoint the user registered.
/// A user with no endpoints is a silent no-op, not an error.
pub struct PushChannel {
    client: reqwest::blocking::Client,
}

impl PushChannel {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: http_client()?,
        })
    }
}

impl NotificationChannel for PushChannel {
    fn name(&self) -> &'static str {
        "push"
    }

    fn send(
        &self,
        conn: &Connection,
        user_id: i64,
        note: &Notification,
    ) -> Result<(), EngineError> {
        let mut stmt =
            conn.prepare_cached("SELECT label, url FROM push_endpoints WHERE user_id=?1")?;
        let rows = stmt.query_map(params![user_id], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
        })?;

        let mut failed = Vec::new();
        for row in rows {
            let (label, url) = row?;
            let resp = self
                .client
                .post(&url)
                .json(&json!({
                    "title": note.title,
                    "body": note.body,
                    "link": note.action_link,
                }))
                .send();
            match resp {
                Ok(r) if r.status().is_success() => {}
                Ok(r) => failed.push(format!("{}: HTTP {}", label, r.status())),
                Err(e) => failed.push(format!("{}: {}", label, e)),
            }
        }
        if failed.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Channel {
                channel: "push",
                message: failed.join("; "),
            })
        }
    }
}

/// Email delivery through a configured HTTP relay. Constructed only when a
/// relay URL is set; a user without an email address is a silent no-op.
pub struct EmailChannel {
    client: reqwest::blocking::Client,
    relay_url: String,
}

impl EmailChannel {
    pub fn new(relay_url: String) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            relay_url,
        })
    }
}

impl NotificationChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    fn send(
        &self,
        conn: &Connection,
        user_id: i64,
        note: &Notification,
    ) -> Result<(), EngineError> {
        let email: Option<String> = conn
            .query_row("SELECT email FROM users WHERE id=?1", params![user_id], |r| {
                r.get(0)
            })
            .optional()?
            .flatten();
        let Some(to) = email else {
            return Ok(());
        };
        let resp = self
            .client
            .post(&self.relay_url)
            .json(&json!({
                "to": to,
                "subject": note.title,
                "body": note.body,
                "link": note.action_link,
            }))
            .send();
        match resp {
            Ok(r) if r.status().is_success() => Ok(()),
            Ok(r) => Err(EngineError::Channel {
                channel: "email",
                message: format!("relay returned HTTP {}", r.status()),
            }),
            Err(e) => Err(EngineError::Channel {
                channel: "email",
                message: e.to_string(),
            }),
        }
    }
}

/// Best-effort fan-out over the registered channels. `notify` never fails:
/// a dead push endpoint must not block email and neither may surface as a
/// sweep error.
pub struct NotificationSink {
    channels: Vec<Box<dyn NotificationChannel>>,
}

impl NotificationSink {
    pub fn with_channels(channels: Vec<Box<dyn NotificationChannel>>) -> Self {
        Self { channels }
    }

    /// Sink with no channels at all; notifications are dropped.
    pub fn disabled() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Build the channel registry from stored configuration. Push is always
    /// on; email only when a relay URL is configured. A missing channel is a
    /// configuration state, not an error.
    pub fn from_settings(conn: &Connection) -> Result<Self> {
        let mut channels: Vec<Box<dyn NotificationChannel>> = vec![Box::new(PushChannel::new()?)];
        if let Some(relay) = get_setting(conn, "email_relay_url")? {
            channels.push(Box::new(EmailChannel::new(relay)?));
        }
        Ok(Self { channels })
    }

    pub fn notify(&self, conn: &Connection, user_id: i64, note: &Notification) {
        for ch in &self.channels {
            if let Err(e) = ch.send(conn, user_id, note) {
                tracing::warn!(channel = ch.name(), user_id, error = %e, "notification delivery failed");
            }
        }
    }
}
