mod common;

use std::time::Duration;

use common::{sample_recipes, TestEnvironment};
use culinary_compass::client::AuthScheme;
use culinary_compass::config::{Config, DEFAULT_API_URL, DEFAULT_BIND_ADDR};
use culinary_compass::server::CompassMcpServer;
use pretty_assertions::assert_eq;
use rmcp::ServerHandler;
use serial_test::serial;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

const CONFIG_VARS: [&str; 6] = [
    "COMPASS_API_URL",
    "COMPASS_ASSET_URL",
    "COMPASS_TOKEN_FILE",
    "COMPASS_AUTH_HEADER",
    "COMPASS_TIMEOUT_SECS",
    "BIND_ADDR",
];

fn clear_config_env() {
    for var in CONFIG_VARS {
        std::env::remove_var(var);
    }
}

#[tokio::test]
async fn test_mcp_server_initialization() {
    common::init_test_logging();
    let env = TestEnvironment::new().await;

    let server = CompassMcpServer::new(env.api.client().clone())
        .with_asset_url("http://localhost:5000".to_string());

    let info = server.get_info();
    assert!(info.capabilities.tools.is_some(), "Server should advertise tools");
    assert!(info.instructions.is_some());
}

#[test_log::test(tokio::test)]
async fn test_api_access_check_counts_recipes() {
    let env = TestEnvironment::new().await;

    Mock::given(method("GET"))
        .and(path("/api/recipes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_recipes()))
        .mount(&env.server)
        .await;

    let server = CompassMcpServer::new(env.api.client().clone());
    assert_eq!(server.test_api_access().await.unwrap(), 4);
}

#[test_log::test(tokio::test)]
async fn test_api_access_check_reports_unreachable_backend() {
    let env = TestEnvironment::new().await;

    Mock::given(method("GET"))
        .and(path("/api/recipes"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&env.server)
        .await;

    let server = CompassMcpServer::new(env.api.client().clone());
    let err = server.test_api_access().await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
}

#[test]
#[serial]
fn test_config_defaults() {
    clear_config_env();

    let config = Config::from_env().expect("defaults load");
    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
    assert_eq!(config.auth_scheme, AuthScheme::Bearer);
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(config.token_file, None);
}

#[test]
#[serial]
fn test_config_from_env_overrides() {
    clear_config_env();
    let dir = tempfile::tempdir().unwrap();
    let token_file = dir.path().join("token.json");

    std::env::set_var("COMPASS_API_URL", "http://recipes.test/api");
    std::env::set_var("COMPASS_TOKEN_FILE", &token_file);
    std::env::set_var("COMPASS_AUTH_HEADER", "X-Auth-Token");
    std::env::set_var("COMPASS_TIMEOUT_SECS", "3");
    std::env::set_var("BIND_ADDR", "0.0.0.0:9000");

    let config = Config::from_env().expect("env config");
    clear_config_env();

    assert_eq!(config.api_url, "http://recipes.test/api");
    assert_eq!(config.auth_scheme, AuthScheme::XAuthToken);
    assert_eq!(config.timeout, Duration::from_secs(3));
    assert_eq!(config.bind_addr, "0.0.0.0:9000");
    assert_eq!(config.token_file.as_deref(), Some(token_file.as_path()));

    // The configured store is file-backed
    let api = config.build_api();
    api.auth().login("persisted".to_string(), "ana".to_string());
    assert!(token_file.exists());
}

#[test]
#[serial]
fn test_config_rejects_bad_values() {
    clear_config_env();

    std::env::set_var("COMPASS_TIMEOUT_SECS", "soon");
    assert!(Config::from_env().is_err());
    std::env::remove_var("COMPASS_TIMEOUT_SECS");

    std::env::set_var("COMPASS_AUTH_HEADER", "cookie");
    assert!(Config::from_env().is_err());
    clear_config_env();
}
