//! Block Kit formatting for the daily digest.
//!
//! Every summary becomes the same four blocks: a linked headline, a
//! "why it matters" section, a highlight section and a divider. Build
//! your own layouts at <https://api.slack.com/block-kit/building>.

use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::core::models::{ParentPayload, Summary, ThreadReplyPayload};

pub const BLOCKS_PER_SUMMARY: usize = 4;

fn mrkdwn_section(text: String) -> Value {
    json!({
        "type": "section",
        "text": {
            "type": "mrkdwn",
            "text": text
        }
    })
}

/// Build the fixed four-block representation of one summary.
#[must_use]
pub fn create_summary_blocks(summary: &Summary) -> Vec<Value> {
    vec![
        mrkdwn_section(format!(
            "*{}:* <{}|*{}*>",
            summary.source, summary.url, summary.title
        )),
        mrkdwn_section(format!("*Why it Matters:* {}", summary.why)),
        mrkdwn_section(format!("*Highlight:* _{}_", summary.highlight)),
        json!({ "type": "divider" }),
    ]
}

/// Title line, e.g. `📰 *Daily Top 5 – June 1, 2025* 📰`.
#[must_use]
pub fn digest_title(date: NaiveDate) -> String {
    format!("📰 *Daily Top 5 – {}* 📰", date.format("%B %-d, %Y"))
}

/// Blocks for every summary, in summary order.
#[must_use]
pub fn build_blocks(summaries: &[Summary]) -> Vec<Value> {
    summaries.iter().flat_map(create_summary_blocks).collect()
}

/// Build the parent announcement and the threaded reply for one run.
#[must_use]
pub fn build_payloads(
    summaries: &[Summary],
    channel: Option<&str>,
    date: NaiveDate,
) -> (ParentPayload, ThreadReplyPayload) {
    let title = digest_title(date);

    let reply = ThreadReplyPayload {
        channel: channel.map(str::to_string),
        text: title.clone(),
        blocks: build_blocks(summaries),
        unfurl_links: false,
        unfurl_media: false,
    };

    let parent = ParentPayload {
        channel: channel.map(str::to_string),
        text: title,
    };

    (parent, reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(n: usize) -> Summary {
        Summary {
            title: format!("Title {n}"),
            url: format!("https://a.co/{n}"),
            source: "TechCrunch".to_string(),
            why: format!("why {n}"),
            highlight: format!("highlight {n}"),
        }
    }

    #[test]
    fn test_create_summary_blocks_shape() {
        let blocks = create_summary_blocks(&summary(1));
        assert_eq!(blocks.len(), BLOCKS_PER_SUMMARY);
        assert_eq!(
            blocks[0]["text"]["text"],
            "*TechCrunch:* <https://a.co/1|*Title 1*>"
        );
        assert_eq!(blocks[0]["text"]["type"], "mrkdwn");
        assert_eq!(blocks[1]["text"]["text"], "*Why it Matters:* why 1");
        assert_eq!(blocks[2]["text"]["text"], "*Highlight:* _highlight 1_");
        assert_eq!(blocks[3], json!({"type": "divider"}));
    }

    #[test]
    fn test_digest_title_uses_long_month() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(digest_title(date), "📰 *Daily Top 5 – June 1, 2025* 📰");
    }

    #[test]
    fn test_build_payloads_share_title() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 24).unwrap();
        let (parent, reply) = build_payloads(&[summary(1)], Some("C1"), date);
        assert_eq!(parent.text, reply.text);
        assert_eq!(parent.channel.as_deref(), Some("C1"));
        assert_eq!(reply.blocks.len(), 4);
        assert!(!reply.unfurl_links);
        assert!(!reply.unfurl_media);
    }

    #[test]
    fn test_empty_summaries_produce_no_blocks() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let (_, reply) = build_payloads(&[], None, date);
        assert!(reply.blocks.is_empty());
        assert!(reply.channel.is_none());
    }
}
