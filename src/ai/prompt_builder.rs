//! Prompt text for per-article summarization.

use crate::core::models::Article;

/// Max characters of article body sent to the model.
pub const MAX_SNIPPET_CHARS: usize = 1500;

/// Fixed instruction describing the JSON object the model must return.
pub const SYSTEM_PROMPT: &str = "\
You are an AI assistant that summarizes technology news articles for developers and product teams.

Return a single valid JSON object with the following keys:
- \"title\" (string): The title of the article
- \"url\" (string): The original URL
- \"source\" (string): The news source
- \"why\" (string): A 25–50 word summary explaining the importance or relevance of this article
- \"highlight\" (string): An 80–110 word summary with key quotes, stats, or product details

DO NOT include:
- Code blocks (e.g., triple backticks)
- Markdown formatting
- Any other text — only return raw, valid JSON

Prioritize:
- Articles about developer tools, AI, product launches, and infrastructure
- Content from trusted sources (e.g., TechCrunch, Wired, Bloomberg, The Verge, Axios, MIT Tech Review)

If the article is off-topic or unrelated to tech/AI/development, summarize it factually without overstating its importance.
";

/// Truncate on a char boundary.
#[must_use]
pub fn snippet(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Build the user message for one article.
#[must_use]
pub fn format_news_prompt(article: &Article) -> String {
    let published = article
        .raw_published()
        .map_or_else(|| "Unknown".to_string(), |ts| ts.display());

    format!(
        "{}: {}\nPublished: {}\nURL: {}\n\n{}",
        article.source,
        article.title,
        published,
        article.url,
        snippet(article.body(), MAX_SNIPPET_CHARS)
    )
}
