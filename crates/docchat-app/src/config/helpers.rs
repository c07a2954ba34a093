use std::env;

use docchat_llm_api::BackendType;

/// Reads one environment variable; tests substitute a map lookup
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Look a variable up in the process environment, treating empty values as unset
pub fn process_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Provider settings from `DOCCHAT_<SLOT>_*` environment variables
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SlotEnv {
    pub backend: Option<String>,
    pub url: Option<String>,
    pub key: Option<String>,
    pub model: Option<String>,
    pub quota: Option<String>,
    pub name: Option<String>,
}

/// Read slot configuration from DOCCHAT_* environment variables
pub fn get_slot_config_from_env(slot: &str, lookup: EnvLookup<'_>) -> SlotEnv {
    let prefix = format!("DOCCHAT_{}", slot.to_uppercase());
    let var = |suffix: &str| lookup(&format!("{}_{}", prefix, suffix));

    SlotEnv {
        backend: var("BACKEND"),
        url: var("URL"),
        key: var("KEY"),
        model: var("MODEL"),
        quota: var("QUOTA"),
        name: var("NAME"),
    }
}

/// Credential variable conventionally used by each backend
pub fn legacy_key_var(backend: BackendType) -> &'static str {
    match backend {
        BackendType::OpenAiCompatible => "OPENROUTER_API_KEY",
        BackendType::Gemini => "GEMINI_API_KEY",
    }
}

/// Model used when a slot names a backend but no model
pub fn default_model_for_backend(backend: BackendType) -> &'static str {
    match backend {
        BackendType::OpenAiCompatible => "mistralai/mistral-small",
        BackendType::Gemini => "gemini-2.0-flash-exp",
    }
}
