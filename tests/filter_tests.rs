use chrono::{Duration, Utc};
use newsdigest::utils::filters::{MAX_ARTICLE_AGE_HOURS, filter_articles, parse_articles};

#[test]
fn test_filter_on_raw_json_batch() {
    let now = Utc::now();
    let ago = |hours: i64| (now - Duration::hours(hours)).to_rfc3339();

    let raw = format!(
        r#"[
            {{"title": "X", "url": "https://a.co/1", "published": "{}"}},
            {{"title": "Old", "url": "https://a.co/2", "published": "{}"}},
            {{"title": "Ftp", "url": "ftp://a.co", "published": "{}"}},
            {{"title": "Epoch", "url": "https://a.co/3", "timestamp": {}}},
            {{"title": "Alt", "url": "https://a.co/4", "created_at": "{}", "summary": "s"}},
            {{"title": "NoDate", "url": "https://a.co/5"}}
        ]"#,
        ago(35),
        ago(40),
        ago(1),
        (now - Duration::hours(2)).timestamp_millis(),
        ago(12),
    );

    let articles = parse_articles(&raw).unwrap();
    assert_eq!(articles.len(), 6);

    let kept: Vec<String> = filter_articles(articles, now, Duration::hours(MAX_ARTICLE_AGE_HOURS))
        .into_iter()
        .map(|a| a.title)
        .collect();
    assert_eq!(kept, vec!["X", "Epoch", "Alt"]);
}

#[test]
fn test_malformed_records_do_not_sink_the_batch() {
    let now = Utc::now();
    let published = (now - Duration::hours(3)).to_rfc3339();

    let raw = format!(
        r#"[
            {{"title": "Good", "url": "https://a.co/1", "published": "{published}"}},
            {{"title": "Bad", "url": null, "published": "{published}"}},
            {{"title": null, "url": "https://a.co/2", "source": {{"id": null, "name": "Wired"}}, "publishedAt": "{published}"}},
            {{"title": "NoDate", "url": "https://a.co/3", "published": null}},
            "stray string",
            null
        ]"#
    );

    let articles = parse_articles(&raw).unwrap();
    assert_eq!(articles.len(), 4);

    let kept = filter_articles(articles, now, Duration::hours(MAX_ARTICLE_AGE_HOURS));
    assert_eq!(kept.len(), 2);
    assert_eq!(kept[0].title, "Good");
    assert_eq!(kept[1].url, "https://a.co/2");
    assert_eq!(kept[1].source, "Wired");
}
