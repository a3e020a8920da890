use super::*;
use std::collections::HashMap;

#[test]
fn test_outreach_defaults() {
    let o = OutreachConfig::default();
    assert_eq!(o.max_prompts_per_day, 8);
    assert_eq!(o.soft_ask_expire_hours, 48);
    assert_eq!(o.min_body_len, 15);
    assert_eq!(o.max_attempts, 5);
    assert_eq!(o.post_send_pause_secs, 2);
    assert!(o.reprompt_after_expiry);
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let toml_str = r#"
        [outreach]
        max_prompts_per_day = 3

        [reddit]
        username = "herald_bot"
        subreddits = ["Calgary"]
    "#;
    let cfg: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(cfg.outreach.max_prompts_per_day, 3);
    assert_eq!(cfg.outreach.max_attempts, 5);
    assert_eq!(cfg.reddit.username, "herald_bot");
    assert_eq!(cfg.reddit.subreddits, vec!["Calgary".to_string()]);
    assert!(cfg.reddit.skip_existing);
    assert_eq!(cfg.intent.affirmative_words.len(), 6);
    assert!(!cfg.notify.enabled);
}

#[test]
fn test_empty_toml_is_default() {
    let cfg: Config = toml::from_str("").unwrap();
    assert_eq!(cfg.herald.log_level, "info");
    assert_eq!(cfg.memory.db_path, "~/.herald/data/herald.db");
    cfg.validate().unwrap();
}

#[test]
fn test_resource_link_query_separator() {
    let mut o = OutreachConfig::default();
    assert_eq!(
        o.resource_link(),
        "https://fabsy.ca/traffic-tickets?utm_source=reddit-bot&utm_medium=comment&utm_campaign=reddit_alberta"
    );
    o.resource_url = "https://example.com/guide?ref=1".into();
    assert!(o
        .resource_link()
        .starts_with("https://example.com/guide?ref=1&utm_source="));
}

#[test]
fn test_full_reply_contains_link_and_soft_prompt_does_not() {
    let o = OutreachConfig::default();
    let full = o.full_reply_text();
    assert!(full.contains(&o.resource_link()));
    assert!(!full.contains(LINK_PLACEHOLDER));
    assert!(!o.soft_prompt.contains("https://"));
}

#[test]
fn test_render_full_reply_without_placeholder_appends() {
    assert_eq!(
        render_full_reply("Here you go:", "https://x.y"),
        "Here you go:\n\nhttps://x.y"
    );
}

#[test]
fn test_validate_rejects_zero_ceiling_and_budget() {
    let mut cfg = Config::default();
    cfg.outreach.max_prompts_per_day = 0;
    assert!(matches!(cfg.validate(), Err(HeraldError::Config(_))));

    let mut cfg = Config::default();
    cfg.outreach.max_attempts = 0;
    assert!(matches!(cfg.validate(), Err(HeraldError::Config(_))));

    let mut cfg = Config::default();
    cfg.intent.trigger_keywords.clear();
    assert!(matches!(cfg.validate(), Err(HeraldError::Config(_))));
}

#[test]
fn test_validate_bounds_expire_hours() {
    let mut cfg = Config::default();
    cfg.outreach.soft_ask_expire_hours = MAX_EXPIRE_HOURS;
    cfg.validate().unwrap();

    cfg.outreach.soft_ask_expire_hours = MAX_EXPIRE_HOURS + 1;
    assert!(matches!(cfg.validate(), Err(HeraldError::Config(_))));

    cfg.outreach.soft_ask_expire_hours = i64::MAX;
    assert!(matches!(cfg.validate(), Err(HeraldError::Config(_))));
}

#[test]
fn test_offer_expiry_out_of_range_is_none() {
    let mut o = OutreachConfig::default();
    o.soft_ask_expire_hours = i64::MAX;
    assert_eq!(o.offer_expiry(chrono::Utc::now()), None);

    o.soft_ask_expire_hours = 48;
    let now = chrono::Utc::now();
    assert_eq!(o.offer_expiry(now), Some(now + chrono::Duration::hours(48)));
}

#[test]
fn test_legacy_herald_keys_are_ignored() {
    let cfg: Config =
        toml::from_str("[herald]\nname = \"old\"\ndata_dir = \"~/.old\"\nlog_level = \"debug\"\n")
            .unwrap();
    assert_eq!(cfg.herald.log_level, "debug");
}

#[test]
fn test_validate_rejects_link_in_soft_prompt() {
    let mut cfg = Config::default();
    cfg.outreach.soft_prompt = format!("see {}", cfg.outreach.resource_url);
    assert!(cfg.validate().is_err());
}

#[test]
fn test_env_overrides_secrets() {
    let env: HashMap<&str, &str> = [
        ("REDDIT_CLIENT_ID", "cid"),
        ("REDDIT_PASSWORD", "hunter2"),
        ("HERALD_TELEGRAM_CHAT_ID", ""),
    ]
    .into_iter()
    .collect();

    let mut cfg = Config::default();
    cfg.notify.chat_id = "42".into();
    cfg.apply_env_from(|k| env.get(k).map(|v| v.to_string()));

    assert_eq!(cfg.reddit.client_id, "cid");
    assert_eq!(cfg.reddit.password, "hunter2");
    assert_eq!(cfg.notify.chat_id, "42", "empty env values are ignored");
}

#[test]
fn test_notify_is_active() {
    let mut n = NotifyConfig::default();
    assert!(!n.is_active());
    n.enabled = true;
    n.bot_token = "tok".into();
    assert!(!n.is_active());
    n.chat_id = "1".into();
    assert!(n.is_active());
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let cfg = load("/nonexistent/herald/config.toml").unwrap();
    assert_eq!(cfg.outreach.max_prompts_per_day, 8);
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[outreach]\nsoft_ask_expire_hours = 12\n").unwrap();
    let cfg = load(path.to_str().unwrap()).unwrap();
    assert_eq!(cfg.outreach.soft_ask_expire_hours, 12);
    let now = chrono::Utc::now();
    assert_eq!(
        cfg.outreach.offer_expiry(now),
        Some(now + chrono::Duration::hours(12))
    );
}

#[test]
fn test_load_invalid_toml_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[outreach\n").unwrap();
    assert!(matches!(
        load(path.to_str().unwrap()),
        Err(HeraldError::Config(_))
    ));
}

#[test]
fn test_shellexpand_home() {
    if let Some(home) = std::env::var_os("HOME") {
        let expanded = shellexpand("~/data/x.db");
        assert_eq!(expanded, format!("{}/data/x.db", home.to_string_lossy()));
    }
    assert_eq!(shellexpand("/abs/path"), "/abs/path");
}
