//! Core Critic implementation

use crate::config::CriticConfig;
use crate::error::CriticError;
use crate::parser::parse_critique;
use crate::prompt::{Language, PromptBuilder, ToneMode};
use crate::types::{Analysis, Critique, SimilarQuote, Usage};
use aphorist_domain::{AnalysisId, ChatProvider, ChatRequest, Completion, QuoteCorpus};
use aphorist_gatekeeper::{Clock, InputValidator, RateLimiter, SystemClock};
use aphorist_store::{find_similar, QueryOptions, QuoteStore, SharedCorpus};
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::time::timeout;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
struct Session {
    mode: ToneMode,
    language: Language,
}

/// The Critic turns a user quote into a structured critique
///
/// One critic is one session: it owns the rate limit window, the analysis
/// history and the usage counters.
pub struct Critic<L, C = QuoteStore, K = SystemClock>
where
    L: ChatProvider,
    C: QuoteCorpus,
    K: Clock,
{
    llm_provider: Arc<L>,
    corpus: SharedCorpus<C>,
    validator: InputValidator,
    limiter: RateLimiter<K>,
    config: CriticConfig,
    session: Mutex<Session>,
    history: Mutex<Vec<Analysis>>,
    api_calls: AtomicU64,
    total_tokens: AtomicU64,
}

impl<L, C> Critic<L, C, SystemClock>
where
    L: ChatProvider + Send + Sync + 'static,
    C: QuoteCorpus,
    L::Error: Display,
    C::Error: Display,
{
    /// Create a new Critic
    ///
    /// # Errors
    ///
    /// Returns `CriticError::Config` if `config` does not validate.
    pub fn new(llm_provider: L, corpus: Arc<C>, config: CriticConfig) -> Result<Self, CriticError> {
        Self::with_clock(llm_provider, corpus, config, SystemClock)
    }
}

impl<L, C, K> Critic<L, C, K>
where
    L: ChatProvider + Send + Sync + 'static,
    C: QuoteCorpus,
    K: Clock,
    L::Error: Display,
    C::Error: Display,
{
    /// Create a new Critic whose rate limiter reads `clock`
    pub fn with_clock(
        llm_provider: L,
        corpus: Arc<C>,
        config: CriticConfig,
        clock: K,
    ) -> Result<Self, CriticError> {
        config.validate().map_err(CriticError::Config)?;

        let limiter = RateLimiter::with_clock(
            config.rate_limit_max_calls,
            config.rate_limit_period(),
            clock,
        );
        let session = Session {
            mode: config.default_mode,
            language: config.default_language,
        };

        Ok(Self {
            llm_provider: Arc::new(llm_provider),
            corpus: SharedCorpus::from_arc(corpus),
            validator: InputValidator::new(config.validation.clone()),
            limiter,
            config,
            session: Mutex::new(session),
            history: Mutex::new(Vec::new()),
            api_calls: AtomicU64::new(0),
            total_tokens: AtomicU64::new(0),
        })
    }

    /// Validate, rate-check, ask the model, then attach corpus matches
    ///
    /// # Errors
    ///
    /// - `Rejected` if the input fails validation (no rate slot is used)
    /// - `RateLimited` if the window is full
    /// - `Llm` / `Timeout` if the model call fails
    ///
    /// A reply that is not a JSON critique is not an error: the raw text is
    /// kept as the surface claim and `Analysis::parsed` is false.
    pub async fn analyze(&self, quote: &str) -> Result<Analysis, CriticError> {
        let cleaned = self.validator.validate(quote)?.to_string();

        if !self.limiter.try_acquire() {
            warn!("Rejecting critique: rate limit reached");
            return Err(CriticError::RateLimited);
        }

        let Session { mode, language } = *self.lock_session();
        let request = PromptBuilder::new(mode, language).build(&cleaned, self.config.max_tokens);

        info!(
            "Starting critique: mode={}, language={}, {} chars",
            mode,
            language,
            cleaned.chars().count()
        );
        debug!("System prompt length: {} chars", request.system.len());

        self.api_calls.fetch_add(1, Ordering::Relaxed);
        let completion = timeout(self.config.request_timeout(), self.call_llm(request))
            .await
            .map_err(|_| CriticError::Timeout(self.config.request_timeout_secs))??;

        if let Some(tokens) = completion.total_tokens {
            self.total_tokens.fetch_add(tokens, Ordering::Relaxed);
        }
        debug!("LLM response length: {} chars", completion.content.len());

        let (critique, parsed) = match parse_critique(&completion.content) {
            Ok(critique) => (critique, true),
            Err(e) => {
                warn!("Model reply is not a critique ({}), keeping raw text", e);
                (Critique::fallback(&completion.content), false)
            }
        };

        let similar = self.similar(&cleaned, self.config.query_options());

        let id = AnalysisId::new();
        let analysis = Analysis {
            id,
            input_quote: cleaned,
            critique,
            similar,
            mode,
            language,
            created_at: id.timestamp() / 1000,
            parsed,
        };

        info!(
            "Critique complete: {} canonical matches, parsed={}",
            analysis.similar.len(),
            analysis.parsed
        );

        self.lock_history().push(analysis.clone());
        Ok(analysis)
    }

    /// Rank corpus quotes against `text`
    ///
    /// Corpus errors are logged and yield no matches.
    pub fn similar(&self, text: &str, options: QueryOptions) -> Vec<SimilarQuote> {
        let snapshot = self.corpus.snapshot();
        match find_similar(&*snapshot, text, options) {
            Ok(matches) => matches.into_iter().map(SimilarQuote::from).collect(),
            Err(e) => {
                warn!("Corpus query failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Swap the corpus used for matching
    pub fn replace_corpus(&self, corpus: C) {
        self.corpus.replace(corpus);
    }

    /// Current corpus snapshot
    pub fn corpus(&self) -> Arc<C> {
        self.corpus.snapshot()
    }

    /// Set the tone by name; unknown names select `clarity`
    pub fn set_mode(&self, name: &str) -> ToneMode {
        let mode = ToneMode::parse_or_default(name);
        if mode.name() != name.trim().to_lowercase() {
            warn!("Unknown mode '{}', using {}", name, mode);
        }
        self.lock_session().mode = mode;
        mode
    }

    /// Current tone
    pub fn mode(&self) -> ToneMode {
        self.lock_session().mode
    }

    /// Set the response language
    pub fn set_language(&self, language: Language) {
        self.lock_session().language = language;
    }

    /// Current response language
    pub fn language(&self) -> Language {
        self.lock_session().language
    }

    /// Completed analyses, oldest first
    pub fn history(&self) -> Vec<Analysis> {
        self.lock_history().clone()
    }

    /// Forget past analyses
    pub fn clear_history(&self) {
        self.lock_history().clear();
    }

    /// Model usage so far
    pub fn usage(&self) -> Usage {
        Usage {
            api_calls: self.api_calls.load(Ordering::Relaxed),
            total_tokens: self.total_tokens.load(Ordering::Relaxed),
        }
    }

    /// Model calls still admissible in the current window
    pub fn remaining_calls(&self) -> usize {
        self.limiter.remaining_capacity()
    }

    /// Model identifier of the provider
    pub fn model_name(&self) -> &str {
        self.llm_provider.model_name()
    }

    /// Active configuration
    pub fn config(&self) -> &CriticConfig {
        &self.config
    }

    /// Call the LLM provider
    async fn call_llm(&self, request: ChatRequest) -> Result<Completion, CriticError> {
        let llm = Arc::clone(&self.llm_provider);

        // ChatProvider is synchronous; keep it off the async workers
        tokio::task::spawn_blocking(move || {
            llm.complete(&request)
                .map_err(|e| CriticError::Llm(e.to_string()))
        })
        .await
        .map_err(|e| CriticError::Llm(format!("Task join error: {}", e)))?
    }

    fn lock_session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn lock_history(&self) -> MutexGuard<'_, Vec<Analysis>> {
        self.history.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aphorist_domain::RawQuote;
    use aphorist_gatekeeper::{InputRejection, ManualClock};
    use aphorist_llm::MockProvider;
    use std::time::Duration;

    const REPLY: &str = r#"{
        "surface_claim": "Suffering is optional.",
        "hidden_assumption": "Pain and suffering are separable.",
        "philosophical_grounding": ["Stoicism", "Buddhism"],
        "revised_quote": "Suffering is partly shaped by judgment.",
        "anchor_quote": {"text": "Men are disturbed not by things.", "author": "Epictetus", "tradition": "Stoicism"}
    }"#;

    fn raw(id: &str, themes: &[&str], verified: bool) -> RawQuote {
        RawQuote {
            id: Some(id.to_string()),
            text: Some(format!("Quote {}", id)),
            author: Some("Author".to_string()),
            tradition: Some("Stoicism".to_string()),
            themes: Some(themes.iter().map(|t| t.to_string()).collect()),
            verified: Some(verified),
            ..Default::default()
        }
    }

    fn store() -> Arc<QuoteStore> {
        Arc::new(
            QuoteStore::load(vec![
                raw("virtue-death", &["virtue", "death"], true),
                raw("freedom", &["freedom"], true),
                raw("unverified-death", &["death"], false),
            ])
            .unwrap(),
        )
    }

    fn critic_with(llm: MockProvider, config: CriticConfig) -> Critic<MockProvider, QuoteStore, ManualClock> {
        Critic::with_clock(llm, store(), config, ManualClock::new()).unwrap()
    }

    #[tokio::test]
    async fn test_analyze_success() {
        let llm = MockProvider::new(REPLY).with_usage(120);
        let critic = critic_with(llm.clone(), CriticConfig::default());

        let analysis = critic
            .analyze("  A meditation on virtue and death.  ")
            .await
            .unwrap();

        assert!(analysis.parsed);
        assert_eq!(analysis.input_quote, "A meditation on virtue and death.");
        assert_eq!(analysis.critique.surface_claim, "Suffering is optional.");
        assert_eq!(analysis.critique.anchor_quote.author, "Epictetus");
        assert_eq!(analysis.mode, ToneMode::Clarity);

        // Unverified quotes are excluded by default
        assert_eq!(analysis.similar.len(), 1);
        assert_eq!(analysis.similar[0].id, "virtue-death");
        assert_eq!(analysis.similar[0].score, 2);

        assert_eq!(llm.call_count(), 1);
        assert_eq!(llm.last_request().unwrap().max_tokens, 500);
        assert_eq!(
            critic.usage(),
            Usage {
                api_calls: 1,
                total_tokens: 120
            }
        );
    }

    #[tokio::test]
    async fn test_rejected_input_skips_model_and_rate_slot() {
        let llm = MockProvider::new(REPLY);
        let config = CriticConfig {
            rate_limit_max_calls: 1,
            ..Default::default()
        };
        let critic = critic_with(llm.clone(), config);

        let result = critic.analyze("hi").await;
        assert!(matches!(
            result,
            Err(CriticError::Rejected(InputRejection::TooShort { .. }))
        ));
        assert_eq!(llm.call_count(), 0);
        assert_eq!(critic.remaining_calls(), 1);
        assert_eq!(critic.usage().api_calls, 0);
    }

    #[tokio::test]
    async fn test_include_unverified_from_config() {
        let config = CriticConfig {
            include_unverified: true,
            ..Default::default()
        };
        let critic = critic_with(MockProvider::new(REPLY), config);

        let analysis = critic.analyze("Thinking about death every day.").await.unwrap();
        let ids: Vec<_> = analysis.similar.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["virtue-death", "unverified-death"]);
    }

    #[tokio::test]
    async fn test_rate_limit_window() {
        let llm = MockProvider::new(REPLY);
        let clock = ManualClock::new();
        let config = CriticConfig {
            rate_limit_max_calls: 2,
            ..Default::default()
        };
        let critic = Critic::with_clock(llm.clone(), store(), config, clock.clone()).unwrap();

        assert!(critic.analyze("The first quote here.").await.is_ok());
        assert!(critic.analyze("The second quote here.").await.is_ok());

        let third = critic.analyze("The third quote here.").await;
        assert!(matches!(third, Err(CriticError::RateLimited)));
        assert_eq!(
            third.unwrap_err().to_string(),
            "Rate limit exceeded. Slow down."
        );
        assert_eq!(llm.call_count(), 2);

        clock.advance(Duration::from_secs(60));
        assert!(critic.analyze("The fourth quote here.").await.is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CriticConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        let result = Critic::new(MockProvider::default(), store(), config);
        assert!(matches!(result, Err(CriticError::Config(_))));
    }

    #[test]
    fn test_set_mode_falls_back() {
        let critic = critic_with(MockProvider::default(), CriticConfig::default());
        assert_eq!(critic.set_mode("brutal"), ToneMode::Brutal);
        assert_eq!(critic.mode(), ToneMode::Brutal);
        assert_eq!(critic.set_mode("snarky"), ToneMode::Clarity);
        assert_eq!(critic.mode(), ToneMode::Clarity);
    }

    #[test]
    fn test_defaults_from_config() {
        let config = CriticConfig {
            default_mode: ToneMode::Compassion,
            default_language: Language::German,
            ..Default::default()
        };
        let critic = critic_with(MockProvider::default(), config);
        assert_eq!(critic.mode(), ToneMode::Compassion);
        assert_eq!(critic.language(), Language::German);
        assert_eq!(critic.model_name(), "mock");
    }
}
