// Scripted sandbox examples and their reference snippets
use serde::Serialize;

use crate::cli::Scenario;
use crate::discovery::DetectorChain;
use crate::error::Result;
use crate::sandbox::NetworkFacade;

pub const HTTP_GET_URL: &str = "https://httpbin.org/json";
pub const HTTP_POST_URL: &str = "https://httpbin.org/post";

/// (port, banner) pairs identified by the discovery example.
pub const DISCOVERY_SAMPLES: &[(u16, &str)] = &[
    (22, "SSH-2.0-OpenSSH_8.9p1"),
    (80, "Server: nginx/1.18.0"),
    (443, ""),
    (25, "220 Postfix SMTP"),
    (3306, "MySQL Server 8.0.25"),
];

const HTTP_CODE: &str = r#"# HTTP Client Example - Try it out!
from gatenet.http_.client import HTTPClient

# Create a client
client = HTTPClient("https://httpbin.org")

# Make a GET request
response = client.get("/json")
print("GET Response:", response["data"])

# Make a POST request
payload = {"message": "Hello from Gatenet!", "user": "sandbox"}
post_response = client.post("/post", data=payload)
print("POST Response:", post_response["data"]["json"])"#;

const DIAGNOSTICS_CODE: &str = r#"# Network Diagnostics Example
from gatenet.diagnostics.dns import dns_lookup
from gatenet.diagnostics.geo import get_geo_info
from gatenet.diagnostics.ping import ping

# DNS Lookup
ip = dns_lookup("google.com")
print(f"google.com resolves to: {ip}")

# Geo IP Information
geo = get_geo_info("8.8.8.8")
print(f"8.8.8.8 location: {geo}")

# Ping test (simulated in browser)
result = ping("1.1.1.1", count=3)
print(f"Ping result: {result}")"#;

const DISCOVERY_CODE: &str = r#"# Service Discovery Example
from gatenet.discovery.ssh import _identify_service, SSHDetector

# Basic service identification
service = _identify_service(22, "SSH-2.0-OpenSSH_8.9p1")
print(f"Port 22 service: {service}")

# HTTP service detection
http_service = _identify_service(80, "Server: nginx/1.18.0")
print(f"Port 80 service: {http_service}")

# Using individual detectors
ssh_detector = SSHDetector()
result = ssh_detector.detect(22, "SSH-2.0-OpenSSH_8.9p1")
print(f"SSH detector result: {result}")

# Multiple service tests
services = [
    (443, ""),  # HTTPS
    (25, "220 Postfix SMTP"),
    (3306, "MySQL Server 8.0.25")
]

for port, banner in services:
    identified = _identify_service(port, banner)
    print(f"Port {port}: {identified}")"#;

impl Scenario {
    /// Static snippet the example starts from; restored by a reset.
    pub fn reference_code(&self) -> &'static str {
        match self {
            Scenario::Http => HTTP_CODE,
            Scenario::Diagnostics => DIAGNOSTICS_CODE,
            Scenario::Discovery => DISCOVERY_CODE,
        }
    }

    pub async fn run(&self, facade: &dyn NetworkFacade) -> Result<String> {
        match self {
            Scenario::Http => run_http(facade).await,
            Scenario::Diagnostics => run_diagnostics(facade).await,
            Scenario::Discovery => run_discovery(facade).await,
        }
    }
}

fn pretty<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

async fn run_http(facade: &dyn NetworkFacade) -> Result<String> {
    let get = facade.http_get(HTTP_GET_URL).await?;
    let body = serde_json::json!({"message": "Hello from Gatenet!", "user": "sandbox"});
    let post = facade.http_post(HTTP_POST_URL, body).await?;

    Ok(format!(
        "GET Response: {}\n\nPOST Response: {}",
        pretty(&get.data())?,
        pretty(&post.data())?
    ))
}

async fn run_diagnostics(facade: &dyn NetworkFacade) -> Result<String> {
    // Independent lookups; nothing is shared between them
    let (dns, geo, ping) = futures::join!(
        facade.dns_lookup("google.com"),
        facade.geo_lookup("8.8.8.8"),
        facade.ping_test("1.1.1.1", 3),
    );
    let (dns, geo, ping) = (dns?, geo?, ping?);

    Ok(format!(
        "google.com resolves to: {}\n\n8.8.8.8 location: {}\n\nPing result: {}",
        dns.address,
        pretty(&geo)?,
        pretty(&ping)?
    ))
}

async fn run_discovery(facade: &dyn NetworkFacade) -> Result<String> {
    let chain = DetectorChain::new();
    let ssh = facade.identify_service(22, "SSH-2.0-OpenSSH_8.9p1").await?;
    let http = facade.identify_service(80, "Server: nginx/1.18.0").await?;

    let mut output = String::new();
    output.push_str(&format!("Port 22 service: {}\n", ssh));
    output.push_str(&format!("Port 80 service: {}\n", http));
    output.push_str(&format!(
        "SSH detector result: {}\n\n",
        chain.identify(22, "SSH-2.0-OpenSSH_8.9p1")
    ));

    for (port, banner) in DISCOVERY_SAMPLES {
        let identified = facade.identify_service(*port, banner).await?;
        output.push_str(&format!("Port {}: {}\n", port, identified));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::MockNetworkFacade;

    #[tokio::test]
    async fn test_http_demo() {
        let facade = MockNetworkFacade::instant();
        let output = Scenario::Http.run(&facade).await.unwrap();
        assert!(output.starts_with("GET Response: {"));
        assert!(output.contains("\"origin\": \"sandbox-demo\""));
        assert!(output.contains("POST Response: {"));
        assert!(output.contains("\"message\": \"Hello from Gatenet!\""));
    }

    #[tokio::test]
    async fn test_diagnostics_demo() {
        let facade = MockNetworkFacade::instant();
        let output = Scenario::Diagnostics.run(&facade).await.unwrap();
        assert!(output.starts_with("google.com resolves to: 142.250.185.78"));
        assert!(output.contains("\"city\": \"Mountain View\""));
        assert!(output.contains("\"packets_sent\": 3"));
        assert!(output.contains("\"packet_loss\": 0.0"));
    }

    #[tokio::test]
    async fn test_discovery_demo() {
        let facade = MockNetworkFacade::instant();
        let output = Scenario::Discovery.run(&facade).await.unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Port 22 service: OpenSSH Server");
        assert_eq!(lines[1], "Port 80 service: Nginx HTTP Server");
        assert_eq!(lines[2], "SSH detector result: OpenSSH 8.9p1");
        assert!(lines.contains(&"Port 443: HTTPS Server"));
        assert!(lines.contains(&"Port 25: Postfix SMTP"));
        assert!(lines.contains(&"Port 3306: MySQL Database Server"));
    }

    #[test]
    fn test_reference_code_is_static() {
        assert!(Scenario::Http.reference_code().contains("HTTPClient(\"https://httpbin.org\")"));
        assert!(Scenario::Diagnostics.reference_code().contains("ping(\"1.1.1.1\", count=3)"));
        assert!(Scenario::Discovery.reference_code().contains("SSHDetector()"));
    }
}
