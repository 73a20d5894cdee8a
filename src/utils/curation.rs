//! Selection rules for collected articles: topic and publication filters,
//! near-duplicate removal and relevance scoring.

use std::collections::HashSet;

use url::Url;

use crate::core::models::Article;

/// Topics an entry must mention in its title or description.
pub const KEYWORDS: &[&str] = &[
    "Github", "Anthropic", "Cursor", "Claude", "GPT", "OpenAI", "AI", "AWS", "Amazon",
    "Developers", "AI Agents", "Tariffs", "Global Affairs", "Microsoft", "Nvidia", "Technology",
    "Europe", "Computers", "Google Gemini", "RAG", "LLMs", "xAI", "Elon Musk", "ChatGPT",
    "Gemini", "Mistral", "Open Source AI",
];

/// Publications whose feeds are trusted.
pub const PUBLICATIONS: &[&str] = &[
    "TechCrunch", "Axios", "InformationWeek", "Time", "SiliconANGLE", "CNBC", "Quartz",
    "Wall Street Journal", "Eurasianet", "Fortune", "New York Times", "CBS News", "Politico",
    "Wired", "VentureBeat", "Bloomberg", "The Guardian", "BBC", "Deadline", "The Atlantic",
    "The Verge", "Vulture", "Reuters", "NPR", "The Information",
];

pub const RSS_FEEDS: &[&str] = &[
    "https://techcrunch.com/feed/",
    "http://www.axios.com/feeds/feed.rss",
    "https://feeds.feedburner.com/Informationweek-AllStories",
    "https://time.com/feed/",
    "https://siliconangle.com/feed/",
    "https://www.cnbc.com/id/100003114/device/rss/rss.html",
    "https://qz.com/rss",
    "https://www.wsj.com/xml/rss/3_7085.xml",
    "https://eurasianet.org/taxonomy/term/34/all/feed",
    "https://fortune.com/feed/",
    "https://rss.nytimes.com/services/xml/rss/nyt/Movies.xml",
    "https://www.cbsnews.com/latest/rss/",
    "http://rss.nytimes.com/services/xml/rss/nyt/Technology.xml",
    "http://www.politico.com/rss/politicopicks.xml",
    "https://rss.nytimes.com/services/xml/rss/nyt/World.xml",
    "http://feeds.nytimes.com/nyt/rss/HomePage",
    "http://feeds.wired.com/wired/index",
    "https://venturebeat.com/feed/",
    "https://www.bloomberg.com/feeds/bbizdaily.xml",
    "https://www.theguardian.com/world/rss",
    "http://feeds.bbci.co.uk/news/rss.xml",
    "https://deadline.com/feed/",
    "https://www.theatlantic.com/feed/all/",
    "https://www.theverge.com/rss/index.xml",
    "https://www.vulture.com/rss/",
    "https://www.reuters.com/rssFeed/topNews",
    "https://www.npr.org/rss/rss.php",
    "https://www.theinformation.com/rss",
];

const PREFERRED_SOURCES: &[&str] = &[
    "techcrunch.com",
    "cnbc.com",
    "axios.com",
    "siliconangle.com",
    "venturebeat.com",
];
const PREFERRED_SOURCE_BONUS: usize = 3;

const LAUNCH_KEYWORDS: &[&str] = &[
    "launch", "rolls out", "announces", "introduces", "unveils", "update", "beta",
    "developer preview", "api", "version", "preview",
];
const AI_ENTITIES: &[&str] = &[
    "openai", "github", "gemini", "copilot", "gpt", "anthropic", "claude", "cursor",
    "microsoft", "xai", "perplexity", "deepmind", "hugging face", "rag",
];
const METRIC_KEYWORDS: &[&str] = &[
    "users", "weekly", "monthly", "million", "billion", "growth", "adoption", "usage",
];
const CONTROVERSY_KEYWORDS: &[&str] = &[
    "accused", "lawsuit", "ban", "block", "restrict", "scraping", "court", "investigation",
];

/// Similarity above which two articles count as the same story.
pub const SIMILARITY_THRESHOLD: f64 = 0.7;

/// Host of a feed URL without a `www.` prefix, e.g. `techcrunch.com`.
#[must_use]
pub fn source_host(feed_url: &str) -> Option<String> {
    let url = Url::parse(feed_url).ok()?;
    let host = url.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

#[must_use]
pub fn mentions_keyword(title: &str, description: &str) -> bool {
    let title = title.to_lowercase();
    let description = description.to_lowercase();
    KEYWORDS.iter().any(|kw| {
        let kw = kw.to_lowercase();
        title.contains(&kw) || description.contains(&kw)
    })
}

/// True when a tracked publication name (spaces ignored) appears in the host.
#[must_use]
pub fn is_tracked_publication(source: &str) -> bool {
    let source = source.to_lowercase();
    PUBLICATIONS
        .iter()
        .any(|publication| source.contains(&publication.to_lowercase().replace(' ', "")))
}

fn word_set(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Dice coefficient over the lowercase word sets of `a` and `b`.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let left = word_set(a);
    let right = word_set(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let shared = left.intersection(&right).count();
    #[allow(clippy::cast_precision_loss)]
    let score = (2 * shared) as f64 / (left.len() + right.len()) as f64;
    score
}

#[must_use]
pub fn is_similar(a: &str, b: &str) -> bool {
    similarity(a, b) > SIMILARITY_THRESHOLD
}

/// Drop articles whose title or body matches one already kept.
#[must_use]
pub fn deduplicate_articles(articles: Vec<Article>) -> Vec<Article> {
    let mut unique: Vec<Article> = Vec::new();
    for article in articles {
        let duplicate = unique.iter().any(|existing| {
            is_similar(&article.title, &existing.title) || is_similar(article.body(), existing.body())
        });
        if !duplicate {
            unique.push(article);
        }
    }
    unique
}

/// Relevance score: source bonus plus one point per matched signal keyword.
#[must_use]
pub fn score_article(article: &Article) -> usize {
    let title = article.title.to_lowercase();
    let content = article.body().to_lowercase();

    let source_bonus = if PREFERRED_SOURCES.contains(&article.source.as_str()) {
        PREFERRED_SOURCE_BONUS
    } else {
        0
    };

    let hits = [LAUNCH_KEYWORDS, AI_ENTITIES, METRIC_KEYWORDS, CONTROVERSY_KEYWORDS]
        .iter()
        .flat_map(|group| group.iter())
        .filter(|kw| title.contains(**kw) || content.contains(**kw))
        .count();

    source_bonus + hits
}

/// Highest-scoring first; ties keep collection order.
#[must_use]
pub fn rank_articles(mut articles: Vec<Article>, limit: usize) -> Vec<Article> {
    articles.sort_by_key(|a| std::cmp::Reverse(score_article(a)));
    articles.truncate(limit);
    articles
}
