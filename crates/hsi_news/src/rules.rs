use hsi_core::{keys, Error, KeyValueStore, Result};
use hsi_storage::typed::{get_json, set_json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::config::{DEFAULT_POSTS_PER_DAY, MAX_POSTS_PER_DAY};

/// Editorial rules for generated insights plus the daily auto-posting rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsRules {
    pub rules: Option<String>,
    pub auto_posts_per_day: u8,
}

pub fn validate_posts_per_day(count: u8) -> Result<u8> {
    if (1..=MAX_POSTS_PER_DAY).contains(&count) {
        Ok(count)
    } else {
        Err(Error::Validation(format!(
            "posts per day must be between 1 and {}, got {}",
            MAX_POSTS_PER_DAY, count
        )))
    }
}

/// The configured rules text, if any non-blank text is stored.
pub async fn rules_text(store: &dyn KeyValueStore) -> Result<Option<String>> {
    let text = match store.get(keys::NEWS_RULES).await? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    };
    Ok(text.filter(|t| !t.trim().is_empty()))
}

pub async fn load(store: &dyn KeyValueStore) -> Result<NewsRules> {
    let rules = rules_text(store).await?;
    let auto_posts_per_day = get_json::<u8>(store, keys::AUTO_POSTS_PER_DAY)
        .await?
        .unwrap_or(DEFAULT_POSTS_PER_DAY);
    Ok(NewsRules { rules, auto_posts_per_day })
}

pub async fn save(store: &dyn KeyValueStore, rules: &str, auto_posts_per_day: u8) -> Result<()> {
    let auto_posts_per_day = validate_posts_per_day(auto_posts_per_day)?;
    store
        .set(keys::NEWS_RULES, Value::String(rules.to_string()))
        .await?;
    set_json(store, keys::AUTO_POSTS_PER_DAY, &auto_posts_per_day).await
}
