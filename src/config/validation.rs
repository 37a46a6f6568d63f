use crate::config::types::{AuditConfig, CheckerConfig, Config, OutputConfig, UserAgentConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_audit_config(&config.audit)?;
    validate_checker_config(&config.checker)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the classification policy lists
fn validate_audit_config(config: &AuditConfig) -> Result<(), ConfigError> {
    for email in &config.valid_email_addresses {
        validate_email(email)?;
    }

    // An empty pattern is a substring of every URL and would skip everything
    if config
        .skip_check_url_patterns
        .iter()
        .any(|pattern| pattern.trim().is_empty())
    {
        return Err(ConfigError::Validation(
            "skip-check-url-patterns cannot contain empty patterns".to_string(),
        ));
    }

    if config.skip_check_urls.iter().any(|url| url.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "skip-check-urls cannot contain empty URLs".to_string(),
        ));
    }

    Ok(())
}

/// Validates checker configuration
fn validate_checker_config(config: &CheckerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_checks < 1 || config.max_concurrent_checks > 64 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-checks must be between 1 and 64, got {}",
            config.max_concurrent_checks
        )));
    }

    if config.request_timeout_secs < 1 || config.request_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be between 1 and 300, got {}",
            config.request_timeout_secs
        )));
    }

    if config.max_redirects < 1 || config.max_redirects > 20 {
        return Err(ConfigError::Validation(format!(
            "max-redirects must be between 1 and 20, got {}",
            config.max_redirects
        )));
    }

    if config.link_delay_min_ms > config.link_delay_max_ms {
        return Err(ConfigError::Validation(format!(
            "link-delay-min-ms ({}) cannot exceed link-delay-max-ms ({})",
            config.link_delay_min_ms, config.link_delay_max_ms
        )));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.accept_language.trim().is_empty() {
        return Err(ConfigError::Validation(
            "accept-language cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.report_dir.is_empty() {
        return Err(ConfigError::Validation(
            "report-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
