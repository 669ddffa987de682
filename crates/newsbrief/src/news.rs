use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use std::time::Duration;

/// Sentinel returned when the search API fails or reports nothing.
pub const NO_NEWS_FOUND: &str = "No news found.";
/// Placeholder substituted when one article's body cannot be extracted.
pub const FULL_TEXT_UNAVAILABLE: &str = "Full text unavailable";

const EXTRACT_LIMIT: usize = 2000;
const DIVIDER: &str = "------------------------------------------------------------";

/// Where the orchestrator gets news text from when the assistant asks for it.
///
/// Infallible by contract: implementations degrade to sentinel text instead
/// of erroring, so a bad news day never sinks a run.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_news(&self, topic: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct NewsApiConfig {
    pub host: String,
    pub api_key: String,
    pub page_size: u32,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            host: "https://newsapi.org".to_string(),
            api_key: String::new(),
            page_size: 5,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ArticlesResponse {
    #[serde(default)]
    articles: Vec<ArticleRecord>,
}

#[derive(Debug, Deserialize)]
struct ArticleRecord {
    title: String,
    source: ArticleSource,
    #[serde(default)]
    description: Option<String>,
    url: String,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: String,
}

/// Queries a news search endpoint and enriches each hit with best-effort
/// full text scraped from the article page.
pub struct NewsApiClient {
    client: Client,
    config: NewsApiConfig,
}

impl NewsApiClient {
    pub fn new(config: NewsApiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (compatible; newsbrief/1.0)")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, config })
    }

    async fn search(&self, topic: &str) -> anyhow::Result<Vec<ArticleRecord>> {
        let url = format!("{}/v2/everything", self.config.host.trim_end_matches('/'));
        let page_size = self.config.page_size.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", topic),
                ("apiKey", self.config.api_key.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let parsed: ArticlesResponse = response.json().await?;
        Ok(parsed.articles)
    }

    async fn full_text(&self, article_url: &str) -> anyhow::Result<String> {
        let html = self
            .client
            .get(article_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let text = extract_text(&html)
            .ok_or_else(|| anyhow::anyhow!("no article text in {}", article_url))?;

        Ok(format!(
            "{}...",
            text.chars().take(EXTRACT_LIMIT).collect::<String>()
        ))
    }

    fn format_article(&self, article: &ArticleRecord, full_text: &str) -> String {
        format!(
            "Title: {}\nSource: {}\nDescription: {}\nFull Article Text: {}\nURL: {}\n{}",
            article.title,
            article.source.name,
            article
                .description
                .as_deref()
                .unwrap_or("No description available."),
            full_text,
            article.url,
            DIVIDER,
        )
    }
}

/// Pull readable paragraph text out of an article page. Prefers paragraphs
/// inside an `<article>` element, falling back to all paragraphs.
fn extract_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    for selector in ["article p", "p"] {
        let selector = Selector::parse(selector).expect("static selector");
        let text = document
            .select(&selector)
            .map(|p| p.text().collect::<String>())
            .collect::<Vec<_>>()
            .join(" ");
        let text = text.trim();
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }

    None
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn fetch_news(&self, topic: &str) -> String {
        let articles = match self.search(topic).await {
            Ok(articles) if !articles.is_empty() => articles,
            Ok(_) => {
                tracing::warn!(topic, "news search returned no articles");
                return NO_NEWS_FOUND.to_string();
            }
            Err(err) => {
                tracing::warn!(topic, "news search failed: {}", err);
                return NO_NEWS_FOUND.to_string();
            }
        };

        let mut blocks = Vec::with_capacity(articles.len());
        for article in &articles {
            // One bad article page must not take the batch down with it.
            let full_text = match self.full_text(&article.url).await {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(url = %article.url, "could not extract full text: {}", err);
                    FULL_TEXT_UNAVAILABLE.to_string()
                }
            };
            blocks.push(self.format_article(article, &full_text));
        }

        blocks.join("\n\n")
    }
}
