#[cfg(test)]
mod config_tests {
    use crate::config::{get_default_url_for_backend, normalize_api_url, BackendType, ProviderConfig};
    use crate::config::{GEMINI_API_URL, OPENROUTER_API_URL};
    use docchat_types::DailyQuota;

    #[test]
    fn test_backend_from_str_aliases() {
        assert_eq!(BackendType::from_str("openrouter"), Some(BackendType::OpenAiCompatible));
        assert_eq!(BackendType::from_str("OpenAI"), Some(BackendType::OpenAiCompatible));
        assert_eq!(BackendType::from_str("llama.cpp"), Some(BackendType::OpenAiCompatible));
        assert_eq!(BackendType::from_str("Gemini"), Some(BackendType::Gemini));
        assert_eq!(BackendType::from_str("google"), Some(BackendType::Gemini));
        assert_eq!(BackendType::from_str("anthropic"), None);
    }

    #[test]
    fn test_backend_round_trip_names() {
        for backend in [BackendType::OpenAiCompatible, BackendType::Gemini] {
            assert_eq!(BackendType::from_str(backend.as_str()), Some(backend));
        }
    }

    #[test]
    fn test_default_urls() {
        assert_eq!(get_default_url_for_backend(&BackendType::OpenAiCompatible), OPENROUTER_API_URL);
        assert_eq!(get_default_url_for_backend(&BackendType::Gemini), GEMINI_API_URL);
    }

    #[test]
    fn test_normalize_api_url() {
        assert_eq!(
            normalize_api_url("http://localhost:8080"),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(
            normalize_api_url("http://localhost:8080/"),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(normalize_api_url(OPENROUTER_API_URL), OPENROUTER_API_URL);
    }

    #[test]
    fn test_default_provider_configs() {
        let primary = ProviderConfig::default_primary();
        let fallback = ProviderConfig::default_fallback();

        assert_eq!(primary.id.as_str(), "mistral");
        assert_eq!(primary.daily_quota, DailyQuota::Limited(10_000));
        assert_eq!(primary.backend, BackendType::OpenAiCompatible);
        assert_eq!(fallback.id.as_str(), "gemini");
        assert!(fallback.daily_quota.is_unlimited());
        assert_eq!(fallback.backend, BackendType::Gemini);
    }

    #[test]
    fn test_provider_config_debug_masks_key() {
        let mut config = ProviderConfig::default_primary();
        config.api_key = "sk-or-v1-supersecretvalue".to_string();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("supersecretvalue"));
        assert!(debug.contains("sk-or-v1-s***"));
    }

    #[test]
    fn test_factory_builds_client_for_backend() {
        use crate::config::{Attribution, ClientFactory};

        for config in [ProviderConfig::default_primary(), ProviderConfig::default_fallback()] {
            let client = ClientFactory::create(&config, reqwest::Client::new(), &Attribution::default(), None);
            assert_eq!(client.backend(), config.backend);
            assert_eq!(client.model(), config.model);
        }
    }
}
