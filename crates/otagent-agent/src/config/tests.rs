#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.opentargets.endpoint, "https://api.platform.opentargets.org/api/v4/graphql");
        assert_eq!(config.opentargets.timeout(), Duration::from_secs(30));
        assert_eq!(config.tools.default_target_limit, 10);
        assert_eq!(config.tools.drug_search_limit, 5);
        assert_eq!(config.agents.model, "gemini-2.5-pro");
        assert_eq!(config.logging.filter, "otagent=info");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = Config::parse(
            r#"
            [opentargets]
            endpoint = "http://localhost:8080/api/v4/graphql"

            [tools]
            default_drug_limit = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.opentargets.endpoint, "http://localhost:8080/api/v4/graphql");
        assert_eq!(config.opentargets.timeout_secs, 30);
        assert_eq!(config.tools.default_drug_limit, 3);
        assert_eq!(config.tools.default_target_limit, 10);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = Config::parse("[opentargets]\ntimeout_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_missing_file_errors() {
        let err = Config::load_from("/nonexistent/otagent.toml").unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_example_file_parses() {
        let example = include_str!("../../otagent.example.toml");
        let config = Config::parse(example).unwrap();
        assert_eq!(config.opentargets.user_agent, "otagent/0.1");
    }
}
