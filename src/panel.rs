//! The article panel: inputs, fetch lifecycle, and weight reporting.
//!
//! # Lifecycle
//!
//! 1. Changing the locales or topic resets the state to
//!    [`PanelState::Loading`] and starts a new request generation.
//! 2. [`ArticlePanel::begin_fetch`] hands out a [`FetchTicket`] carrying the
//!    endpoint and the generation it belongs to.
//! 3. [`ArticlePanel::complete`] applies a fetch result only if its ticket is
//!    still the latest generation. Older completions are dropped.
//! 4. A successful completion classifies the articles, replaces the state
//!    wholesale, and emits fresh [`LocaleWeights`] to the weight callback.
//!
//! Changing only the selected locale does not refetch; it only changes which
//! entries the view highlights.

use crate::api::ArticleFetcher;
use crate::classify::{aggregate_weights, classify_all};
use crate::config::{normalize_locales, PanelInputs};
use crate::endpoint::EndpointBuilder;
use crate::models::{Article, ClassifiedArticle, LocaleWeights, PanelState};
use std::error::Error;
use tracing::{debug, info, instrument, warn};

/// Callback receiving the weights of each completed fetch.
pub type WeightCallback = Box<dyn FnMut(&LocaleWeights)>;

/// A request the panel wants made.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub generation: u64,
    pub endpoint: String,
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result replaced the panel state.
    Applied,
    /// A newer generation was started; the result was discarded.
    Stale,
}

pub struct ArticlePanel {
    endpoints: EndpointBuilder,
    inputs: PanelInputs,
    state: PanelState,
    generation: u64,
    on_weights: WeightCallback,
}

impl std::fmt::Debug for ArticlePanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticlePanel")
            .field("inputs", &self.inputs)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .finish()
    }
}

impl ArticlePanel {
    pub fn new(endpoints: EndpointBuilder, inputs: PanelInputs, on_weights: WeightCallback) -> Self {
        Self {
            endpoints,
            inputs,
            state: PanelState::Loading,
            generation: 0,
            on_weights,
        }
    }

    pub fn inputs(&self) -> &PanelInputs {
        &self.inputs
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new generation for the current inputs.
    ///
    /// The state goes back to loading; any request still in flight for an
    /// older generation will be ignored when it completes.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = PanelState::Loading;
        let endpoint = self
            .endpoints
            .build(self.inputs.topic.as_deref(), &self.inputs.locales);
        debug!(generation = self.generation, "Starting fetch");
        FetchTicket {
            generation: self.generation,
            endpoint,
        }
    }

    /// Replace the locale list. Returns a ticket when this changed the query.
    pub fn set_locales(&mut self, locales: Vec<String>) -> Option<FetchTicket> {
        let locales = normalize_locales(locales);
        if locales == self.inputs.locales {
            return None;
        }
        self.inputs.locales = locales;
        Some(self.begin_fetch())
    }

    /// Replace the topic. Returns a ticket when this changed the query.
    pub fn set_topic(&mut self, topic: Option<String>) -> Option<FetchTicket> {
        let topic = topic.filter(|t| !t.is_empty());
        if topic == self.inputs.topic {
            return None;
        }
        self.inputs.topic = topic;
        Some(self.begin_fetch())
    }

    /// Change which locale the view highlights. Never triggers a fetch.
    pub fn select_locale(&mut self, locale: Option<String>) {
        self.inputs.selected_locale = locale.filter(|l| !l.is_empty());
    }

    /// Apply the outcome of the request identified by `generation`.
    ///
    /// On success the articles are classified against the current locales,
    /// the state becomes [`PanelState::Loaded`] and the weight callback runs
    /// once. On failure the state becomes [`PanelState::Failed`] and the
    /// callback does not run.
    #[instrument(level = "info", skip(self, result))]
    pub fn complete(
        &mut self,
        generation: u64,
        result: Result<Vec<Article>, Box<dyn Error>>,
    ) -> Completion {
        if generation != self.generation {
            warn!(latest = self.generation, "Discarding stale fetch result");
            return Completion::Stale;
        }

        match result {
            Ok(articles) => {
                let articles = classify_all(articles, &self.inputs.locales);
                self.state = PanelState::Loaded { articles };
                self.emit_weights();
            }
            Err(e) => {
                warn!(error = %e, "Fetch failed");
                self.state = PanelState::Failed {
                    message: e.to_string(),
                };
            }
        }
        Completion::Applied
    }

    /// Begin a fetch for the current inputs and wait for it to complete.
    pub async fn refresh<F: ArticleFetcher>(&mut self, fetcher: &F) -> Completion {
        let ticket = self.begin_fetch();
        let result = fetcher.fetch(&ticket.endpoint).await;
        self.complete(ticket.generation, result)
    }

    /// Articles that received a locale tag, in response order.
    pub fn visible_articles(&self) -> Vec<&ClassifiedArticle> {
        self.state
            .articles()
            .iter()
            .filter(|a| a.locale().is_some())
            .collect()
    }

    fn emit_weights(&mut self) {
        let weights = aggregate_weights(self.state.articles());
        info!(
            locales = weights.len(),
            tagged = weights.total(),
            total = self.state.articles().len(),
            "Reporting locale weights"
        );
        (self.on_weights)(&weights);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NewsApiConfig;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeFetcher {
        articles: Vec<Article>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        fn new(titles: &[&str]) -> Self {
            Self {
                articles: titles
                    .iter()
                    .map(|t| Article {
                        title: Some(t.to_string()),
                        ..Default::default()
                    })
                    .collect(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ArticleFetcher for FakeFetcher {
        async fn fetch(&self, endpoint: &str) -> Result<Vec<Article>, Box<dyn Error>> {
            self.calls.borrow_mut().push(endpoint.to_string());
            Ok(self.articles.clone())
        }
    }

    struct FailingFetcher;

    impl ArticleFetcher for FailingFetcher {
        async fn fetch(&self, _endpoint: &str) -> Result<Vec<Article>, Box<dyn Error>> {
            Err("connection refused".into())
        }
    }

    fn panel(locales: &[&str], topic: Option<&str>) -> (ArticlePanel, Rc<RefCell<Vec<LocaleWeights>>>) {
        let emitted = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&emitted);
        let endpoints = EndpointBuilder::new(NewsApiConfig::new("k", "https://newsapi.org").unwrap());
        let inputs = PanelInputs::new(
            locales.iter().map(|s| s.to_string()).collect(),
            topic.map(String::from),
            None,
        );
        let panel = ArticlePanel::new(
            endpoints,
            inputs,
            Box::new(move |w: &LocaleWeights| sink.borrow_mut().push(w.clone())),
        );
        (panel, emitted)
    }

    #[tokio::test]
    async fn test_refresh_classifies_and_reports_weights() {
        let (mut panel, emitted) = panel(&["Paris", "Berlin"], Some("election"));
        let fetcher = FakeFetcher::new(&["Paris votes", "Berlin votes", "Paris again", "Madrid"]);

        assert!(panel.state().is_loading());
        assert_eq!(panel.refresh(&fetcher).await, Completion::Applied);

        assert!(!panel.state().is_loading());
        assert_eq!(panel.state().articles().len(), 4);
        assert_eq!(panel.visible_articles().len(), 3);

        let emitted = emitted.borrow();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].get("Paris"), 2);
        assert_eq!(emitted[0].get("Berlin"), 1);
        assert_eq!(emitted[0].total(), 3);

        let calls = fetcher.calls.borrow();
        assert!(calls[0].contains("/v2/everything?"));
    }

    #[tokio::test]
    async fn test_headlines_without_inputs() {
        let (mut panel, emitted) = panel(&[], None);
        let fetcher = FakeFetcher::new(&["Anything"]);
        panel.refresh(&fetcher).await;

        assert!(fetcher.calls.borrow()[0].contains("/v2/top-headlines?"));
        // nothing can be tagged without locales
        assert!(panel.visible_articles().is_empty());
        assert_eq!(emitted.borrow().len(), 1);
        assert!(emitted.borrow()[0].is_empty());
    }

    #[tokio::test]
    async fn test_weights_are_not_accumulated_across_fetches() {
        let (mut panel, emitted) = panel(&["Paris"], None);
        let fetcher = FakeFetcher::new(&["Paris"]);
        panel.refresh(&fetcher).await;
        panel.refresh(&fetcher).await;

        let emitted = emitted.borrow();
        assert_eq!(emitted.len(), 2);
        assert_eq!(emitted[1].get("Paris"), 1);
    }

    #[tokio::test]
    async fn test_failure_sets_failed_state_without_weights() {
        let (mut panel, emitted) = panel(&["Paris"], None);
        assert_eq!(panel.refresh(&FailingFetcher).await, Completion::Applied);

        match panel.state() {
            PanelState::Failed { message } => assert!(message.contains("connection refused")),
            other => panic!("unexpected state: {:?}", other),
        }
        assert!(emitted.borrow().is_empty());
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let (mut panel, emitted) = panel(&["Paris"], None);
        let first = panel.begin_fetch();
        let second = panel.set_topic(Some("floods".to_string())).unwrap();
        assert!(second.generation > first.generation);

        let late = vec![Article {
            title: Some("Paris old news".to_string()),
            ..Default::default()
        }];
        assert_eq!(panel.complete(first.generation, Ok(late)), Completion::Stale);
        assert!(panel.state().is_loading());
        assert!(emitted.borrow().is_empty());

        assert_eq!(panel.complete(second.generation, Ok(vec![])), Completion::Applied);
        assert_eq!(panel.state(), &PanelState::Loaded { articles: vec![] });
        assert_eq!(emitted.borrow().len(), 1);

        // a stale failure cannot clobber the settled state either
        assert_eq!(
            panel.complete(first.generation, Err("late".into())),
            Completion::Stale
        );
        assert!(matches!(panel.state(), PanelState::Loaded { .. }));
    }

    #[test]
    fn test_input_changes_reset_to_loading() {
        let (mut panel, _) = panel(&["Paris"], None);
        let ticket = panel.begin_fetch();
        panel.complete(ticket.generation, Ok(vec![]));
        assert!(!panel.state().is_loading());

        let ticket = panel.set_locales(vec!["Rome".to_string(), "Milan".to_string()]).unwrap();
        assert!(panel.state().is_loading());
        assert!(ticket.endpoint.contains("Rome"));
        assert_eq!(panel.inputs().locales, vec!["Rome", "Milan"]);
    }

    #[test]
    fn test_unchanged_inputs_do_not_refetch() {
        let (mut panel, _) = panel(&["Paris"], Some("rail"));
        let generation = panel.generation();
        assert!(panel.set_locales(vec!["Paris".to_string()]).is_none());
        assert!(panel.set_topic(Some("rail".to_string())).is_none());
        assert_eq!(panel.generation(), generation);
    }

    #[test]
    fn test_select_locale_does_not_refetch() {
        let (mut panel, _) = panel(&["Paris"], None);
        let generation = panel.generation();
        panel.select_locale(Some("Paris".to_string()));
        assert_eq!(panel.inputs().selected_locale.as_deref(), Some("Paris"));
        assert_eq!(panel.generation(), generation);
        panel.select_locale(Some(String::new()));
        assert_eq!(panel.inputs().selected_locale, None);
    }
}
