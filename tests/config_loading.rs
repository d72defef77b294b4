//! Config file loading tests.

use std::io::Write;

use subwatch::config::{JobConfig, CLIENT_SECRET_ENV};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(
        r#"
            tenant_id = "tenant"
            client_id = "app"
            client_secret = "s3cret"
            sender = "noreply@contoso.com"
            default_recipient = "cloud-team@contoso.com"
            warn_lead_days = 21
        "#,
    );

    let config = JobConfig::from_file(file.path()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.tenant_id, "tenant");
    assert_eq!(config.warn_lead_days, 21);
}

#[test]
fn test_missing_file_is_io_error() {
    let result = JobConfig::from_file(std::path::Path::new("/nonexistent/subwatch.toml"));
    assert!(result.is_err());
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let file = write_config("tenant_id = [unclosed");
    assert!(JobConfig::from_file(file.path()).is_err());
}

#[test]
fn test_secret_env_fallback() {
    let file = write_config(
        r#"
            tenant_id = "tenant"
            client_id = "app"
            sender = "noreply@contoso.com"
            default_recipient = "cloud-team@contoso.com"
        "#,
    );

    std::env::set_var(CLIENT_SECRET_ENV, "from-env");
    let config = JobConfig::from_file(file.path()).unwrap();
    std::env::remove_var(CLIENT_SECRET_ENV);

    assert_eq!(config.client_secret, "from-env");
    assert!(config.validate().is_ok());
}
