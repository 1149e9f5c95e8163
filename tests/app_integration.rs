use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use cambio::core::config::AppConfig;
use cambio::core::{Notification, NotificationSink, PermissionStatus};
use tokio::sync::Mutex;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const USD_RATES: &str = r#"{
        "provider": "https://www.exchangerate-api.com",
        "base": "USD",
        "date": "2025-03-14",
        "rates": {"USD": 1, "BRL": 5.03, "EUR": 0.92}
    }"#;

    pub async fn create_mock_server(base: &str, template: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;
        let url_path = format!("/v4/latest/{base}");

        Mock::given(method("GET"))
            .and(path(&url_path))
            .respond_with(template)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub async fn create_rates_server() -> MockServer {
        create_mock_server(
            "USD",
            ResponseTemplate::new(200).set_body_string(USD_RATES),
        )
        .await
    }

    pub fn write_config(file: &tempfile::NamedTempFile, base_url: &str) {
        let config_content = format!(
            r#"
            provider:
              base_url: {base_url}
            default_from: "USD"
            default_to: "BRL"
            notifications:
              enabled: false
            "#
        );
        std::fs::write(file.path(), config_content).expect("Failed to write config file");
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn request_permission(&self) -> anyhow::Result<PermissionStatus> {
        Ok(PermissionStatus::Granted)
    }

    async fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        self.sent.lock().await.push(notification.clone());
        Ok(())
    }
}

fn config_for(base_url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.provider.base_url = base_url.to_string();
    config
}

#[test_log::test(tokio::test)]
async fn test_convert_command_with_mock() {
    let mock_server = test_utils::create_rates_server().await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let result = cambio::run_command(
        cambio::AppCommand::Convert {
            amount: "100".to_string(),
            from: Some("usd".to_string()),
            to: Some("BRL".to_string()),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Convert command failed with: {:?}",
        result.err()
    );

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/v4/latest/USD");
}

#[test_log::test(tokio::test)]
async fn test_convert_command_surfaces_provider_failure() {
    let mock_server =
        test_utils::create_mock_server("USD", wiremock::ResponseTemplate::new(503)).await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let result = cambio::run_command(
        cambio::AppCommand::Convert {
            amount: "100".to_string(),
            from: None,
            to: None,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("Provider failure should fail the command");
    info!(error = ?err, "Convert failed as expected");
    assert_eq!(
        err.to_string(),
        "Could not fetch exchange rates. Please try again."
    );
}

#[test_log::test(tokio::test)]
async fn test_convert_command_reports_missing_rate() {
    let mock_server = test_utils::create_rates_server().await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, &mock_server.uri());

    let result = cambio::run_command(
        cambio::AppCommand::Convert {
            amount: "100".to_string(),
            from: None,
            to: Some("JPY".to_string()),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    assert_eq!(
        result.unwrap_err().to_string(),
        "No exchange rate available from USD to JPY."
    );
}

#[test_log::test(tokio::test)]
async fn test_convert_command_rejects_empty_amount() {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    test_utils::write_config(&config_file, "http://127.0.0.1:9");

    let result = cambio::run_command(
        cambio::AppCommand::Convert {
            amount: "  ".to_string(),
            from: None,
            to: None,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert_eq!(result.unwrap_err().to_string(), "Enter an amount to convert.");
}

#[test_log::test(tokio::test)]
async fn test_currencies_command() {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(config_file.path(), "default_to: \"EUR\"\n").expect("Failed to write config file");

    let result = cambio::run_command(
        cambio::AppCommand::Currencies,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Currencies failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_missing_explicit_config_fails() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let missing = temp_dir.path().join("absent.yaml");

    let result = cambio::run_command(
        cambio::AppCommand::Currencies,
        Some(missing.to_str().unwrap()),
    )
    .await;
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Failed to read config file")
    );
}

#[test_log::test(tokio::test)]
async fn test_success_emits_one_notification() {
    let mock_server = test_utils::create_rates_server().await;
    let notifier = Arc::new(RecordingNotifier::default());
    let controller =
        cambio::build_controller(&config_for(&mock_server.uri()), notifier.clone()).unwrap();

    assert!(controller.start().await.is_none());
    controller.set_amount("100").await;
    let result = controller.convert().await.unwrap().unwrap();
    assert_eq!(result.summary(), "100 USD = 503.00 BRL");

    let sent = notifier.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, "100 USD = 503.00 BRL");
}

#[test_log::test(tokio::test)]
async fn test_interactive_session_swap_clears_result() {
    let mock_server = test_utils::create_rates_server().await;
    let controller = cambio::build_controller(
        &config_for(&mock_server.uri()),
        Arc::new(cambio::core::notify::NoopNotifier),
    )
    .unwrap();

    let script = b"100\nto eur\nconvert\nwait\nswap\nswap\nquit\nconvert\n";
    cambio::cli::interactive::run(&controller, &script[..])
        .await
        .unwrap();

    let view = controller.snapshot().await;
    assert_eq!(view.from, "USD");
    assert_eq!(view.to, "EUR");
    assert!(view.result.is_none());
    assert!(!view.busy);

    // `quit` stops the session before the trailing convert
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_interactive_session_select_keeps_result() {
    let mock_server = test_utils::create_rates_server().await;
    let controller = cambio::build_controller(
        &config_for(&mock_server.uri()),
        Arc::new(cambio::core::notify::NoopNotifier),
    )
    .unwrap();

    let script = b"amount 100\nconvert\nwait\nfrom gbp\nbogus\nfrom XYZ\n";
    cambio::cli::interactive::run(&controller, &script[..])
        .await
        .unwrap();

    let view = controller.snapshot().await;
    assert_eq!(view.from, "GBP");
    let result = view.result.expect("selection should keep the result");
    assert_eq!(result.summary(), "100 USD = 503.00 BRL");
}
