use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix the provider uses for references to comments (as opposed to posts).
pub const REPLY_PREFIX: &str = "t1_";

/// A public comment observed on the event stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Bare provider id (e.g. `k3j9x2a`).
    pub id: String,
    /// Author name. Empty when the author was deleted.
    pub author: String,
    pub body: String,
    /// Full reference of the parent (`t1_<id>` for a comment, `t3_<id>` for a post).
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Community the event was posted in (e.g. a subreddit name).
    pub channel: String,
    /// Path or URL of the event on the provider site.
    #[serde(default)]
    pub permalink: String,
    pub timestamp: DateTime<Utc>,
}

impl InboundEvent {
    /// Bare id of the parent comment, if this event replies to a comment.
    ///
    /// Replies to top-level posts return `None`.
    pub fn reply_parent_id(&self) -> Option<&str> {
        self.parent_id
            .as_deref()
            .and_then(|p| p.strip_prefix(REPLY_PREFIX))
            .filter(|id| !id.is_empty())
    }

    /// Case-insensitive author comparison.
    pub fn is_authored_by(&self, name: &str) -> bool {
        self.author.eq_ignore_ascii_case(name)
    }

    /// Whether the author is missing or was deleted.
    pub fn has_author(&self) -> bool {
        let a = self.author.trim();
        !a.is_empty() && a != "[deleted]"
    }

    /// Absolute URL of the event.
    pub fn url(&self) -> String {
        absolute_url(&self.permalink)
    }
}

/// Reference to a message the bot posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveredRef {
    /// Bare provider id of the posted reply.
    pub id: String,
    pub permalink: String,
}

/// Operator notification priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Normal,
    High,
}

/// Turn a site-relative permalink into an absolute URL.
pub fn absolute_url(permalink: &str) -> String {
    if permalink.starts_with("http://") || permalink.starts_with("https://") {
        permalink.to_string()
    } else {
        format!("https://reddit.com{permalink}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(parent: Option<&str>) -> InboundEvent {
        InboundEvent {
            id: "c2".into(),
            author: "Alice".into(),
            body: "yes".into(),
            parent_id: parent.map(str::to_string),
            channel: "Calgary".into(),
            permalink: "/r/Calgary/comments/x/y/c2/".into(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_reply_parent_id_only_for_comments() {
        assert_eq!(event(Some("t1_p1")).reply_parent_id(), Some("p1"));
        assert_eq!(event(Some("t3_post")).reply_parent_id(), None);
        assert_eq!(event(Some("t1_")).reply_parent_id(), None);
        assert_eq!(event(None).reply_parent_id(), None);
    }

    #[test]
    fn test_is_authored_by_ignores_case() {
        let e = event(None);
        assert!(e.is_authored_by("alice"));
        assert!(e.is_authored_by("ALICE"));
        assert!(!e.is_authored_by("bob"));
    }

    #[test]
    fn test_has_author() {
        let mut e = event(None);
        assert!(e.has_author());
        e.author = "[deleted]".into();
        assert!(!e.has_author());
        e.author = "  ".into();
        assert!(!e.has_author());
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            absolute_url("/r/Calgary/comments/x/"),
            "https://reddit.com/r/Calgary/comments/x/"
        );
        assert_eq!(absolute_url("https://example.com/a"), "https://example.com/a");
    }
}
