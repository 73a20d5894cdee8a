use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};

use crate::ai::Completion;
use crate::ai::parse::parse_summary;
use crate::ai::prompt_builder::{SYSTEM_PROMPT, format_news_prompt};
use crate::core::models::{Article, Summary};
use crate::errors::DigestError;

/// Upper bound on summaries per digest.
pub const MAX_SUMMARIES: usize = 5;

const MAX_DEBUG_TITLE_CHARS: usize = 50;

/// An article that did not make it into the digest.
#[derive(Debug)]
pub struct SkippedArticle {
    pub title: String,
    pub error: DigestError,
    /// Where the unparseable model output was saved, if it was.
    pub debug_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct SummarizeOutcome {
    pub summaries: Vec<Summary>,
    pub skipped: Vec<SkippedArticle>,
}

impl SummarizeOutcome {
    /// The first skip that must fail the run, such as an empty model reply.
    #[must_use]
    pub fn first_unrecoverable(&self) -> Option<&SkippedArticle> {
        self.skipped.iter().find(|s| !s.error.is_recoverable())
    }
}

/// Title reduced to `[A-Za-z0-9_]`, capped at 50 characters.
///
/// Characters outside the Basic Multilingual Plane become `__`, one
/// underscore per UTF-16 unit, so names line up with older dumps.
#[must_use]
pub fn sanitize_debug_title(title: &str) -> String {
    title
        .chars()
        .flat_map(|c| {
            let (ch, count) = if c.is_ascii_alphanumeric() {
                (c, 1)
            } else {
                ('_', c.len_utf16())
            };
            std::iter::repeat_n(ch, count)
        })
        .take(MAX_DEBUG_TITLE_CHARS)
        .collect()
}

fn debug_file_name(safe_title: &str, attempt: usize) -> String {
    if attempt <= 1 {
        format!("debug_failed_{safe_title}.json")
    } else {
        format!("debug_failed_{safe_title}_{attempt}.json")
    }
}

/// Save raw model output under a name that does not clobber earlier dumps.
///
/// # Errors
///
/// Returns `IoError` if the file cannot be created or written.
pub async fn write_debug_file(dir: &Path, title: &str, raw: &str) -> Result<PathBuf, DigestError> {
    let safe_title = sanitize_debug_title(title);
    let mut attempt = 1;

    loop {
        let path = dir.join(debug_file_name(&safe_title, attempt));
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(mut file) => {
                file.write_all(raw.as_bytes()).await?;
                file.flush().await?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Summarize articles in order until [`MAX_SUMMARIES`] succeed or input runs out.
///
/// Completion and parse failures skip the article; they never stop the loop.
/// Check [`SummarizeOutcome::first_unrecoverable`] afterwards for skips that
/// should still fail the run.
pub async fn summarize_articles<C>(
    completer: &C,
    articles: &[Article],
    debug_dir: &Path,
) -> SummarizeOutcome
where
    C: Completion + ?Sized,
{
    info!("Summarizing {} candidate articles individually", articles.len());
    let mut outcome = SummarizeOutcome::default();

    for article in articles {
        if outcome.summaries.len() >= MAX_SUMMARIES {
            break;
        }

        info!("Summarizing: {}", article.title);
        let prompt = format_news_prompt(article);

        let raw = match completer.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                if e.is_recoverable() {
                    warn!("Failed to generate summary for: {} → {}", article.title, e);
                } else {
                    error!("Failed to generate summary for: {} → {}; the run will fail", article.title, e);
                }
                outcome.skipped.push(SkippedArticle {
                    title: article.title.clone(),
                    error: e,
                    debug_file: None,
                });
                continue;
            }
        };

        #[cfg(feature = "debug-logs")]
        info!("Raw model output for {}:\n{}", article.title, raw);

        match parse_summary(&raw) {
            Ok(summary) => outcome.summaries.push(summary),
            Err(e) => {
                warn!("Failed to parse summary for: {} → {}", article.title, e);
                let debug_file = match write_debug_file(debug_dir, &article.title, &raw).await {
                    Ok(path) => {
                        info!("Saved raw model output to {}", path.display());
                        Some(path)
                    }
                    Err(write_err) => {
                        warn!("Could not save raw model output: {}", write_err);
                        None
                    }
                };
                outcome.skipped.push(SkippedArticle {
                    title: article.title.clone(),
                    error: e,
                    debug_file,
                });
            }
        }
    }

    info!(
        "Collected {} summaries ({} articles skipped)",
        outcome.summaries.len(),
        outcome.skipped.len()
    );
    outcome
}
