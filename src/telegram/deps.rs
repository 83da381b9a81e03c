//! Shared dependencies handed to middleware and flows.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::User;

use crate::storage::UserStateStore;
use crate::tasks::TaskCatalog;
use crate::telegram::notifications::NotificationSink;

#[derive(Clone)]
pub struct BotDeps {
    pub bot: Bot,
    pub store: Arc<UserStateStore>,
    pub tasks: Arc<TaskCatalog>,
    pub notify: NotificationSink,
}

/// Identity of the user behind the current update.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: String,
}

impl UserInfo {
    pub fn from_telegram(user: &User) -> Self {
        Self {
            telegram_id: i64::try_from(user.id.0).unwrap_or(0),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn user_info_carries_id_and_names() {
        let user: User = serde_json::from_value(json!({
            "id": 123456,
            "is_bot": false,
            "first_name": "Ann",
            "username": "ann",
        }))
        .unwrap();

        let info = UserInfo::from_telegram(&user);
        assert_eq!(info.telegram_id, 123456);
        assert_eq!(info.username.as_deref(), Some("ann"));
        assert_eq!(info.first_name, "Ann");
    }

    #[test]
    fn out_of_range_ids_do_not_wrap_negative() {
        let user: User = serde_json::from_value(json!({
            "id": u64::MAX,
            "is_bot": false,
            "first_name": "X",
        }))
        .unwrap();

        let info = UserInfo::from_telegram(&user);
        assert_eq!(info.telegram_id, 0);
    }
}
