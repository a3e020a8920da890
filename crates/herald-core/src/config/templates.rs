//! Reply templates and resource link construction.

/// Placeholder replaced by the tracked resource link in the full reply.
pub const LINK_PLACEHOLDER: &str = "{link}";

pub(super) fn default_soft_prompt() -> String {
    "Hi, I'm an automated helper for Alberta traffic tickets (disclosure: I work for fabsy.ca). \
     I can share a short, free step-by-step guide that explains options and next steps. \
     If you'd like the guide, reply here with **yes** or **link** and I'll send it. \
     This is not legal advice."
        .to_string()
}

pub(super) fn default_full_reply() -> String {
    "Here's the short guide we mentioned (free, general info, not legal advice):\n\n\
     {link}\n\n\
     If you want more tailored suggestions, reply here (no personal documents)."
        .to_string()
}

/// Append UTM tracking parameters to `base`.
pub fn build_link(base: &str, source: &str, medium: &str, campaign: &str) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}utm_source={source}&utm_medium={medium}&utm_campaign={campaign}")
}

/// Substitute the link into a reply template.
///
/// Templates without the placeholder get the link appended on its own line.
pub fn render_full_reply(template: &str, link: &str) -> String {
    if template.contains(LINK_PLACEHOLDER) {
        template.replace(LINK_PLACEHOLDER, link)
    } else {
        format!("{template}\n\n{link}")
    }
}
