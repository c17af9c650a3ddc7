use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use gatenet_sandbox::app::execute;
use gatenet_sandbox::cli::{Cli, Command, HttpCommand, OutputFormat, Scenario};
use gatenet_sandbox::discovery::identify_service;
use gatenet_sandbox::sandbox::{
    DeadlineFacade, LatencyProfile, MockNetworkFacade, MockTables, NetworkFacade, PortSignatures,
    RecordingDelay,
};
use gatenet_sandbox::SandboxError;

#[test]
fn test_parse_dns_command() {
    let cli = Cli::try_parse_from(["gatenet-sandbox", "dns", "github.com"]).unwrap();
    assert_eq!(cli.command, Command::Dns { domain: "github.com".to_string() });
    assert_eq!(cli.output_format, OutputFormat::Human);
    assert_eq!(cli.latency_scale, 1.0);
    assert!(!cli.no_delay);
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "gatenet-sandbox", "ping", "1.1.1.1", "-c", "3", "--no-delay", "-o", "json", "--timeout", "250",
    ]).unwrap();
    assert_eq!(cli.command, Command::Ping { host: "1.1.1.1".to_string(), count: 3 });
    assert_eq!(cli.output_format, OutputFormat::Json);
    assert_eq!(cli.timeout, Some(250));
    assert!(cli.no_delay);
}

#[test]
fn test_parse_rejects_zero_ping_count() {
    assert!(Cli::try_parse_from(["gatenet-sandbox", "ping", "1.1.1.1", "-c", "0"]).is_err());
}

#[test]
fn test_parse_identify_defaults_to_empty_banner() {
    let cli = Cli::try_parse_from(["gatenet-sandbox", "identify", "443"]).unwrap();
    assert_eq!(cli.command, Command::Identify { port: 443, banner: String::new() });
}

#[test]
fn test_parse_http_post_and_demo() {
    let cli = Cli::try_parse_from([
        "gatenet-sandbox", "http", "post", "https://httpbin.org/post", "--body", r#"{"a":1}"#,
    ]).unwrap();
    assert_eq!(cli.command, Command::Http {
        request: HttpCommand::Post {
            url: "https://httpbin.org/post".to_string(),
            body: r#"{"a":1}"#.to_string(),
        },
    });

    let cli = Cli::try_parse_from(["gatenet-sandbox", "demo", "diagnostics", "--show-code"]).unwrap();
    assert_eq!(cli.command, Command::Demo { scenario: Scenario::Diagnostics, show_code: true });
}

#[tokio::test]
async fn test_unknown_inputs_are_results_not_errors() {
    let facade = MockNetworkFacade::instant();
    let dns = NetworkFacade::dns_lookup(&facade, "no-such-host.invalid").await.unwrap();
    assert_eq!(dns.address, Ipv4Addr::new(203, 0, 113, 1));

    let geo = NetworkFacade::geo_lookup(&facade, "10.0.0.1").await.unwrap();
    assert_eq!((geo.country.as_str(), geo.city.as_str(), geo.organization.as_str()),
        ("Unknown", "Unknown", "Unknown"));

    let id = NetworkFacade::identify_service(&facade, 9999, "anything").await.unwrap();
    assert_eq!(id.label, "Unknown Service (Port 9999)");
}

#[tokio::test]
async fn test_diagnostics_demo_latency_budget() {
    let delay = Arc::new(RecordingDelay::new());
    let facade = MockNetworkFacade::new(MockTables::default(), LatencyProfile::default(), delay.clone());
    let command = Command::Demo { scenario: Scenario::Diagnostics, show_code: false };
    execute(&command, &facade).await.unwrap();

    let mut waits: Vec<u128> = delay.requested().iter().map(|d| d.as_millis()).collect();
    waits.sort();
    assert_eq!(waits, vec![300, 400, 600]);
}

#[tokio::test]
async fn test_custom_tables_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tables.json");

    let mut tables = MockTables::default();
    tables.dns.insert("gatenet.dev".to_string(), Ipv4Addr::new(192, 0, 2, 10));
    tables.services.push(PortSignatures::new(6379, &[("redis", "Redis Server"), ("", "Key-Value Store")]));
    tables.save(&path).unwrap();

    let loaded = MockTables::discover(Some(&path)).unwrap();
    let facade = MockNetworkFacade::new(loaded, LatencyProfile::default().scaled(0.0), Arc::new(RecordingDelay::new()));
    assert_eq!(facade.dns_lookup("gatenet.dev").await.address, Ipv4Addr::new(192, 0, 2, 10));
    assert_eq!(facade.identify_service(6379, "-ERR redis").label, "Redis Server");
    assert_eq!(facade.identify_service(6379, "+PONG").label, "Key-Value Store");
}

#[tokio::test]
async fn test_timeout_surfaces_as_error() {
    let facade = DeadlineFacade::new(MockNetworkFacade::default(), Some(Duration::from_millis(5)));
    let command = Command::Http { request: HttpCommand::Get { url: "/status".to_string() } };
    let err = execute(&command, &facade).await.unwrap_err();
    assert!(matches!(err, SandboxError::Timeout { operation: "http.get", .. }));
}

#[test]
fn test_mock_table_and_detector_chain_differ_on_ssh() {
    let facade = MockNetworkFacade::instant();
    assert_eq!(facade.identify_service(22, "SSH-2.0-OpenSSH_8.9p1").label, "OpenSSH Server");
    assert_eq!(identify_service(22, "SSH-2.0-OpenSSH_8.9p1"), "OpenSSH 8.9p1");
}
