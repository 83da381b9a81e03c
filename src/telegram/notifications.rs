//! Team notifications over a Discord webhook.
//!
//! Flows emit events into an unbounded channel and move on; a background
//! consumer turns them into webhook embeds. A slow or dead webhook never
//! blocks or fails a user-facing handler.

use serde_json::json;
use tokio::sync::mpsc;

use crate::core::config;
use crate::core::types::Profession;
use crate::core::validation::mask_phone;

#[derive(Debug, Clone)]
pub enum NotifyEvent {
    UserStarted {
        telegram_id: i64,
        username: Option<String>,
    },
    ContactProvided {
        telegram_id: i64,
        username: Option<String>,
        first_name: String,
        phone_number: String,
    },
    TaskSent {
        telegram_id: i64,
        username: Option<String>,
        profession: Profession,
        deadline: String,
    },
    TaskSubmitted {
        telegram_id: i64,
        username: Option<String>,
        profession: Option<Profession>,
    },
    DeadlineWarning {
        telegram_id: i64,
        username: Option<String>,
        days_left: u32,
    },
    DeadlineToday {
        telegram_id: i64,
        username: Option<String>,
    },
}

impl NotifyEvent {
    fn title(&self) -> &'static str {
        match self {
            NotifyEvent::UserStarted { .. } => "Новий користувач",
            NotifyEvent::ContactProvided { .. } => "Отримано контакт",
            NotifyEvent::TaskSent { .. } => "Тестове надіслано",
            NotifyEvent::TaskSubmitted { .. } => "Тестове здано",
            NotifyEvent::DeadlineWarning { .. } => "Дедлайн наближається",
            NotifyEvent::DeadlineToday { .. } => "Сьогодні дедлайн",
        }
    }

    fn color(&self) -> u32 {
        match self {
            NotifyEvent::UserStarted { .. } => 0x95a5a6,
            NotifyEvent::ContactProvided { .. } => 0x3498db,
            NotifyEvent::TaskSent { .. } => 0x2ecc71,
            NotifyEvent::TaskSubmitted { .. } => 0x9b59b6,
            NotifyEvent::DeadlineWarning { .. } => 0xe67e22,
            NotifyEvent::DeadlineToday { .. } => 0xe74c3c,
        }
    }

    fn description(&self) -> String {
        let who = |id: &i64, username: &Option<String>| match username {
            Some(name) => format!("@{} ({})", name, id),
            None => format!("id {}", id),
        };
        match self {
            NotifyEvent::UserStarted { telegram_id, username } => {
                format!("{} почав онбордінг", who(telegram_id, username))
            }
            NotifyEvent::ContactProvided {
                telegram_id,
                username,
                first_name,
                phone_number,
            } => format!(
                "{} поділився контактом: {} {}",
                who(telegram_id, username),
                first_name,
                mask_phone(phone_number)
            ),
            NotifyEvent::TaskSent {
                telegram_id,
                username,
                profession,
                deadline,
            } => format!(
                "{} отримав завдання {}, дедлайн {}",
                who(telegram_id, username),
                profession,
                deadline
            ),
            NotifyEvent::TaskSubmitted {
                telegram_id,
                username,
                profession,
            } => match profession {
                Some(p) => format!("{} здав завдання {}", who(telegram_id, username), p),
                None => format!("{} здав завдання", who(telegram_id, username)),
            },
            NotifyEvent::DeadlineWarning {
                telegram_id,
                username,
                days_left,
            } => format!(
                "у {} лишилося {} робочих дні(в)",
                who(telegram_id, username),
                days_left
            ),
            NotifyEvent::DeadlineToday { telegram_id, username } => {
                format!("у {} дедлайн сьогодні", who(telegram_id, username))
            }
        }
    }
}

/// Cheap cloneable handle used by flows and the reminder sweep.
#[derive(Clone)]
pub struct NotificationSink {
    tx: mpsc::UnboundedSender<NotifyEvent>,
}

impl NotificationSink {
    /// Queues an event. Never fails; a closed channel is only logged.
    pub fn emit(&self, event: NotifyEvent) {
        if self.tx.send(event).is_err() {
            log::warn!("Notification channel closed, event dropped");
        }
    }
}

/// Spawns the webhook consumer and returns the sink.
///
/// Without a configured webhook URL events are logged and discarded.
pub fn start_notifier() -> NotificationSink {
    let (tx, mut rx) = mpsc::unbounded_channel::<NotifyEvent>();
    let webhook_url = config::DISCORD_WEBHOOK_URL.clone();

    tokio::spawn(async move {
        let client = match reqwest::Client::builder()
            .timeout(config::network::timeout())
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                log::error!("Failed to build webhook HTTP client, webhook delivery disabled: {}", e);
                while let Some(event) = rx.recv().await {
                    log::info!("Notification: {} - {}", event.title(), event.description());
                }
                return;
            }
        };

        while let Some(event) = rx.recv().await {
            log::info!("Notification: {} - {}", event.title(), event.description());

            let Some(url) = webhook_url.as_deref() else {
                continue;
            };

            let payload = json!({
                "embeds": [{
                    "title": event.title(),
                    "description": event.description(),
                    "color": event.color(),
                }]
            });

            match client.post(url).json(&payload).send().await {
                Ok(resp) if !resp.status().is_success() => {
                    log::warn!("Webhook returned status {}", resp.status());
                }
                Ok(_) => {}
                Err(e) => log::warn!("Failed to deliver webhook: {}", e),
            }
        }
    });

    NotificationSink { tx }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_event_masks_phone() {
        let event = NotifyEvent::ContactProvided {
            telegram_id: 1,
            username: Some("ann".into()),
            first_name: "Ann".into(),
            phone_number: "+380501234567".into(),
        };
        let text = event.description();
        assert!(!text.contains("+380501234567"));
        assert!(text.contains("+38"));
    }

    #[tokio::test]
    async fn emit_never_fails_without_a_webhook() {
        let sink = start_notifier();
        sink.emit(NotifyEvent::UserStarted { telegram_id: 1, username: None });
        sink.emit(NotifyEvent::DeadlineToday { telegram_id: 1, username: None });
        tokio::task::yield_now().await;
    }

    #[test]
    fn every_event_has_title_and_color() {
        let events = [
            NotifyEvent::UserStarted { telegram_id: 1, username: None },
            NotifyEvent::DeadlineToday { telegram_id: 1, username: None },
        ];
        for event in events {
            assert!(!event.title().is_empty());
            assert!(event.color() > 0);
        }
    }
}
