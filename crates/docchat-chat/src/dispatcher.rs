use std::sync::Arc;

use docchat_llm_api::{CompletionProvider, CompletionRequest, ProviderConfig, ProviderError};
use docchat_logging::safe_truncate;
use docchat_types::{ChatTurn, ProviderId, UsageSnapshot};
use serde::Serialize;

use crate::clock::Clock;
use crate::error::{ConfigError, DispatchError, ProviderFailure};
use crate::prompt::{ChatPrompt, PromptSettings};
use crate::usage::UsageStore;

/// Which of the two configured providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotRole {
    Primary,
    Fallback,
}

impl SlotRole {
    pub fn other(self) -> Self {
        match self {
            SlotRole::Primary => SlotRole::Fallback,
            SlotRole::Fallback => SlotRole::Primary,
        }
    }
}

/// A provider's descriptor together with the client that talks to it
#[derive(Clone)]
pub struct ProviderSlot {
    pub config: ProviderConfig,
    pub client: Arc<dyn CompletionProvider>,
}

impl ProviderSlot {
    pub fn new(config: ProviderConfig, client: Arc<dyn CompletionProvider>) -> Self {
        Self { config, client }
    }

    pub fn id(&self) -> &ProviderId {
        &self.config.id
    }
}

#[derive(Debug)]
pub enum AttemptResult {
    Succeeded,
    Failed(ProviderError),
}

/// One upstream call made while handling a dispatch
#[derive(Debug)]
pub struct Attempt {
    pub provider: ProviderId,
    pub role: SlotRole,
    pub result: AttemptResult,
}

/// A successful dispatch
#[derive(Debug)]
pub struct DispatchOutcome {
    pub response: String,
    /// The provider that produced `response`
    pub provider: ProviderId,
    pub provider_name: String,
    pub role: SlotRole,
    /// Every call made, in order; the last one succeeded
    pub attempts: Vec<Attempt>,
    /// Counters after this dispatch was recorded
    pub usage: UsageSnapshot,
}

impl DispatchOutcome {
    pub fn fallback_used(&self) -> bool {
        self.attempts.len() > 1
    }
}

/// Routes chat requests between a quota-limited primary and an unlimited fallback
pub struct Dispatcher {
    primary: ProviderSlot,
    fallback: ProviderSlot,
    store: Arc<dyn UsageStore>,
    clock: Arc<dyn Clock>,
    prompt: PromptSettings,
}

impl Dispatcher {
    pub fn new(
        primary: ProviderSlot,
        fallback: ProviderSlot,
        store: Arc<dyn UsageStore>,
        clock: Arc<dyn Clock>,
        prompt: PromptSettings,
    ) -> Result<Self, ConfigError> {
        if !fallback.config.daily_quota.is_unlimited() {
            return Err(ConfigError::LimitedFallback(fallback.id().clone()));
        }
        if primary.id() == fallback.id() {
            return Err(ConfigError::DuplicateProviderId(primary.id().clone()));
        }

        Ok(Self {
            primary,
            fallback,
            store,
            clock,
            prompt,
        })
    }

    pub fn slot(&self, role: SlotRole) -> &ProviderSlot {
        match role {
            SlotRole::Primary => &self.primary,
            SlotRole::Fallback => &self.fallback,
        }
    }

    /// The primary while it is under today's quota, otherwise the fallback
    pub async fn select_provider(&self) -> SlotRole {
        let today = self.clock.today();
        let used = self.store.count(self.primary.id(), today).await;

        if self.primary.config.daily_quota.allows(used) {
            SlotRole::Primary
        } else {
            tracing::debug!(
                provider = %self.primary.id(),
                used,
                quota = %self.primary.config.daily_quota,
                "primary quota reached"
            );
            SlotRole::Fallback
        }
    }

    pub async fn usage(&self) -> UsageSnapshot {
        self.store.snapshot(self.clock.today()).await
    }

    /// Answer `message`, trying the selected provider and then, once, the other one
    #[tracing::instrument(skip_all, fields(dispatch_id = %uuid::Uuid::new_v4()))]
    pub async fn dispatch(
        &self,
        message: &str,
        history: &[ChatTurn],
        context: Option<&str>,
    ) -> Result<DispatchOutcome, DispatchError> {
        if message.trim().is_empty() {
            return Err(DispatchError::MissingMessage);
        }

        let prompt = ChatPrompt::new(&self.prompt, message, history, context);
        let request = prompt.to_request();
        tracing::debug!(
            history_turns = prompt.history().len(),
            grounded = prompt.context().is_some(),
            "prompt built"
        );

        let selected = self.select_provider().await;
        let mut attempts = Vec::with_capacity(2);

        let first_error = match self.attempt(selected, &request).await {
            Ok(response) => return Ok(self.succeed(selected, response, attempts).await),
            Err(error) => error,
        };

        let fallback = selected.other();
        tracing::warn!(
            failed = %self.slot(selected).id(),
            fallback = %self.slot(fallback).id(),
            error = %first_error,
            "provider failed, trying fallback"
        );

        match self.attempt(fallback, &request).await {
            Ok(response) => {
                attempts.push(Attempt {
                    provider: self.slot(selected).id().clone(),
                    role: selected,
                    result: AttemptResult::Failed(first_error),
                });
                Ok(self.succeed(fallback, response, attempts).await)
            }
            Err(second_error) => {
                tracing::error!(error = %second_error, "fallback provider failed");
                Err(DispatchError::AllProvidersFailed {
                    first: ProviderFailure {
                        provider: self.slot(selected).id().clone(),
                        error: first_error,
                    },
                    second: ProviderFailure {
                        provider: self.slot(fallback).id().clone(),
                        error: second_error,
                    },
                })
            }
        }
    }

    async fn attempt(&self, role: SlotRole, request: &CompletionRequest) -> Result<String, ProviderError> {
        let slot = self.slot(role);
        tracing::info!(
            provider = %slot.id(),
            backend = %slot.client.backend(),
            model = slot.client.model(),
            "calling provider"
        );
        slot.client.complete(request).await
    }

    async fn succeed(&self, role: SlotRole, response: String, mut attempts: Vec<Attempt>) -> DispatchOutcome {
        let slot = self.slot(role);
        let today = self.clock.today();
        let count = self.store.increment(slot.id(), today).await;
        tracing::info!(
            provider = %slot.id(),
            served_today = count,
            preview = %safe_truncate(&response, 80),
            "provider answered"
        );

        attempts.push(Attempt {
            provider: slot.id().clone(),
            role,
            result: AttemptResult::Succeeded,
        });

        DispatchOutcome {
            response,
            provider: slot.id().clone(),
            provider_name: slot.config.display_name.clone(),
            role,
            attempts,
            usage: self.store.snapshot(today).await,
        }
    }
}
