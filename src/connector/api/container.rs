use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use tracing::{debug, info, warn};

use crate::application::{
    ChatClient, ExistenceChecker, ListValidationCoordinator, LocationLookup, ResultCache,
    SubmitWeatherQueryUseCase, WeatherChatService, DEFAULT_LOOKUP_TIMEOUT, DEFAULT_SETTLE_DELAY,
};
use crate::connector::adapter::{
    GeminiChatClient, InMemoryResultCache, MockChatClient, WeatherApiLookup,
};
use crate::connector::config::{AppConfig, DEFAULT_CONFIG_PATH};
use crate::domain::{FormRules, FormState, LocationEntry, DATE_FORMAT, DEFAULT_MAX_LOCATIONS};

pub struct ContainerConfig {
    pub config_path: PathBuf,
    /// Answer every chat message from the mock client.
    pub mock_chat: bool,
    pub settle_delay: Duration,
    pub lookup_timeout: Duration,
    /// `None` disables the `too_many` rule.
    pub max_locations: Option<usize>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            mock_chat: false,
            settle_delay: DEFAULT_SETTLE_DELAY,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            max_locations: Some(DEFAULT_MAX_LOCATIONS),
        }
    }
}

pub struct Container {
    lookup: Arc<dyn LocationLookup>,
    cache: Arc<dyn ResultCache>,
    checker: Arc<ExistenceChecker>,
    chat_client: Arc<dyn ChatClient>,
    chat_service: Arc<WeatherChatService>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let app_config = AppConfig::load_or_default(&config.config_path);

        if !app_config.has_weather_key() {
            warn!("No weather lookup key configured; every location will report as not found");
        }
        let lookup: Arc<dyn LocationLookup> =
            Arc::new(WeatherApiLookup::with_default_base(app_config.weather_api_key.clone()));

        let cache: Arc<dyn ResultCache> = Arc::new(InMemoryResultCache::new());

        Ok(Self::with_services(
            config,
            lookup,
            cache,
            Self::chat_client_for(&app_config),
        ))
    }

    /// Wire the container around explicit adapters.
    pub fn with_services(
        config: ContainerConfig,
        lookup: Arc<dyn LocationLookup>,
        cache: Arc<dyn ResultCache>,
        chat_client: Arc<dyn ChatClient>,
    ) -> Self {
        let checker = Arc::new(
            ExistenceChecker::new(Arc::clone(&lookup), Arc::clone(&cache))
                .with_settle_delay(config.settle_delay)
                .with_lookup_timeout(config.lookup_timeout),
        );

        let fallback: Arc<dyn ChatClient> = Arc::new(MockChatClient::new());
        let primary = if config.mock_chat {
            debug!("Using mock chat client");
            Arc::clone(&fallback)
        } else {
            Arc::clone(&chat_client)
        };
        let chat_service = Arc::new(WeatherChatService::new(primary, fallback));

        Self {
            lookup,
            cache,
            checker,
            chat_client,
            chat_service,
            config,
        }
    }

    fn chat_client_for(app_config: &AppConfig) -> Arc<dyn ChatClient> {
        if app_config.has_ai_key() {
            info!("Using Gemini chat client");
        } else {
            warn!("No AI key configured; replies will be simulated");
        }
        Arc::new(GeminiChatClient::with_key(app_config.ai_studio_api_key.clone()))
    }

    pub fn checker(&self) -> Arc<ExistenceChecker> {
        Arc::clone(&self.checker)
    }

    /// Checker for the HTTP relay: same lookup and cache, no settle delay.
    pub fn relay_checker(&self) -> Arc<ExistenceChecker> {
        Arc::new(
            ExistenceChecker::new(Arc::clone(&self.lookup), Arc::clone(&self.cache))
                .with_settle_delay(Duration::ZERO)
                .with_lookup_timeout(self.config.lookup_timeout),
        )
    }

    pub fn chat_client(&self) -> Arc<dyn ChatClient> {
        if self.config.mock_chat {
            Arc::new(MockChatClient::new())
        } else {
            Arc::clone(&self.chat_client)
        }
    }

    pub fn chat_service(&self) -> Arc<WeatherChatService> {
        Arc::clone(&self.chat_service)
    }

    pub fn submit_use_case(&self) -> SubmitWeatherQueryUseCase {
        SubmitWeatherQueryUseCase::new(self.chat_service())
    }

    pub fn form_rules(&self) -> FormRules {
        FormRules::new().with_max_locations(self.config.max_locations)
    }

    /// A blank form: today, one empty location, celsius.
    pub fn blank_form(&self) -> ListValidationCoordinator {
        ListValidationCoordinator::new(self.checker()).with_rules(self.form_rules())
    }

    /// A form pre-filled from command-line values; checks start immediately.
    pub fn form_from_args(
        &self,
        locations: &[String],
        date: Option<String>,
        unit: String,
    ) -> ListValidationCoordinator {
        let today = Local::now().date_naive();
        let state = FormState {
            date: date.unwrap_or_else(|| today.format(DATE_FORMAT).to_string()),
            locations: locations.iter().map(|l| LocationEntry::parse(l)).collect(),
            temperature_unit: unit,
        };
        ListValidationCoordinator::with_state(self.checker(), state)
            .with_rules(self.form_rules())
            .with_today(today)
    }

    pub fn cache(&self) -> &Arc<dyn ResultCache> {
        &self.cache
    }
}
