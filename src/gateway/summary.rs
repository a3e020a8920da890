//! Daily activity summary built from the per-channel counters.

use super::Notices;
use herald_core::error::HeraldError;
use herald_memory::Store;
use tracing::info;

/// Subject and body for `date`, or `None` when nothing happened that day.
pub fn format_daily_summary(date: &str, counts: &[(String, u32)]) -> Option<(String, String)> {
    if counts.is_empty() {
        return None;
    }
    let total: u32 = counts.iter().map(|(_, n)| n).sum();

    let subject = format!("Daily Summary - {total} replies");
    let mut body = format!("Bot activity for {date}:\n\nTotal replies: {total}\n\nBy subreddit:");
    for (channel, n) in counts {
        body.push_str(&format!("\n- r/{channel}: {n} replies"));
    }
    body.push_str(
        "\n\nCounts include soft-ask prompts and full replies. \
         The link only goes out after the author says yes.",
    );
    Some((subject, body))
}

/// Send the summary for `date`. Returns `Ok(false)` when there was nothing
/// to report or the notifier did not take it.
pub async fn send_daily_summary(
    store: &Store,
    notices: &Notices,
    date: &str,
) -> Result<bool, HeraldError> {
    let counts = store.day_counts(date).await?;
    let Some((subject, body)) = format_daily_summary(date, &counts) else {
        info!("no activity on {date}, skipping daily summary");
        return Ok(false);
    };
    let sent = notices.daily_summary(&subject, &body).await;
    if sent {
        info!("daily summary for {date} sent");
    }
    Ok(sent)
}
