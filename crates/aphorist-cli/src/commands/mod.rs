//! Command implementations.

pub mod analyze;
pub mod browse;
pub mod catalog;
pub mod languages;
pub mod search;
pub mod similar;
pub mod stats;

pub use self::analyze::execute_analyze;
pub use self::browse::execute_browse;
pub use self::catalog::execute_catalog;
pub use self::languages::execute_languages;
pub use self::search::execute_search;
pub use self::similar::execute_similar;
pub use self::stats::execute_stats;

use crate::config::Config;
use crate::error::Result;
use aphorist_critic::Critic;
use aphorist_llm::HuggingFaceProvider;
use aphorist_store::{corpus, CorpusWarning, LoadPolicy, QuoteStore};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Load the corpus named by `override_path`, or by the config file.
///
/// The store logs its own integrity warnings; they never stop the load.
pub fn load_store(config: &Config, override_path: Option<&Path>) -> Result<QuoteStore> {
    let path = override_path.unwrap_or(&config.corpus.path);
    let policy = if config.corpus.skip_invalid {
        LoadPolicy::SkipInvalid
    } else {
        LoadPolicy::Strict
    };

    let store = corpus::load_from_path(path, policy)?;
    info!("Loaded {} quotes from {}", store.len(), path.display());
    Ok(store)
}

/// Number of records dropped under `corpus.skip_invalid`.
pub fn skipped_records(store: &QuoteStore) -> usize {
    store
        .warnings()
        .iter()
        .filter(|w| matches!(w, CorpusWarning::Skipped { .. }))
        .count()
}

/// Build a critic backed by the configured inference endpoint.
pub fn build_critic(config: &Config, store: Arc<QuoteStore>) -> Result<Critic<HuggingFaceProvider>> {
    let model = &config.model;
    if model.api_key.is_none() {
        warn!(
            "No API key found in ${}; requests will be sent unauthenticated",
            model.api_key_env
        );
    }

    let provider = HuggingFaceProvider::with_timeout(
        model.endpoint.clone(),
        model.model_id.clone(),
        model.api_key.clone(),
        config.critic.request_timeout(),
    )?
    .with_max_retries(model.max_retries);

    Ok(Critic::new(provider, store, config.critic.clone())?)
}
