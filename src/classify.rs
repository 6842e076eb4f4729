//! Locale classification and weight aggregation.
//!
//! A locale here is a plain keyword (usually a place name). An article is
//! tagged with the first keyword, in caller order, that appears verbatim in
//! its title or content. Matching is case-sensitive and nothing is trimmed.

use crate::models::{Article, ClassifiedArticle, LocaleWeights};
use tracing::debug;

/// First locale in `locales` found in the article's title or content.
pub fn detect_locale<'a>(article: &Article, locales: &'a [String]) -> Option<&'a str> {
    let title = article.title.as_deref();
    let content = article.content.as_deref();

    locales
        .iter()
        .map(String::as_str)
        .filter(|name| !name.is_empty())
        .find(|name| {
            title.is_some_and(|t| t.contains(name)) || content.is_some_and(|c| c.contains(name))
        })
}

pub fn classify_article(article: Article, locales: &[String]) -> ClassifiedArticle {
    let locale = detect_locale(&article, locales).map(str::to_string);
    ClassifiedArticle { article, locale }
}

/// Classify every article, preserving the response order.
pub fn classify_all(articles: Vec<Article>, locales: &[String]) -> Vec<ClassifiedArticle> {
    let classified: Vec<ClassifiedArticle> = articles
        .into_iter()
        .map(|a| classify_article(a, locales))
        .collect();
    debug!(
        total = classified.len(),
        tagged = classified.iter().filter(|a| a.locale().is_some()).count(),
        "Classified articles"
    );
    classified
}

/// Count tagged articles per locale. Untagged articles contribute nothing.
pub fn aggregate_weights(articles: &[ClassifiedArticle]) -> LocaleWeights {
    let mut weights = LocaleWeights::new();
    for locale in articles.iter().filter_map(ClassifiedArticle::locale) {
        weights.record(locale);
    }
    weights
}
