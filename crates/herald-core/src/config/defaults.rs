//! Serde default functions.

pub(super) fn default_true() -> bool {
    true
}

pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_db_path() -> String {
    "~/.herald/data/herald.db".to_string()
}

pub(super) fn default_user_agent() -> String {
    "HeraldBot/0.1".to_string()
}

pub(super) fn default_subreddits() -> Vec<String> {
    vec![
        "Calgary".to_string(),
        "Edmonton".to_string(),
        "Alberta".to_string(),
    ]
}

pub(super) fn default_poll_interval() -> u64 {
    15
}

pub(super) fn default_max_prompts_per_day() -> u32 {
    8
}

pub(super) fn default_expire_hours() -> i64 {
    48
}

pub(super) fn default_min_body_len() -> usize {
    15
}

pub(super) fn default_max_attempts() -> u32 {
    5
}

pub(super) fn default_post_send_pause() -> u64 {
    2
}

pub(super) fn default_purge_interval() -> u64 {
    3600
}

pub(super) fn default_resource_url() -> String {
    "https://fabsy.ca/traffic-tickets".to_string()
}

pub(super) fn default_utm_source() -> String {
    "reddit-bot".to_string()
}

pub(super) fn default_utm_medium() -> String {
    "comment".to_string()
}

pub(super) fn default_utm_campaign() -> String {
    "reddit_alberta".to_string()
}

pub(super) fn default_trigger_keywords() -> Vec<String> {
    [
        "ticket",
        "ticketed",
        "speeding",
        "citation",
        "fine",
        "traffic ticket",
        "got a ticket",
        "cop stopped",
        "speed trap",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub(super) fn default_affirmative_words() -> Vec<String> {
    ["yes", "yep", "please", "link", "sure", "send"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
