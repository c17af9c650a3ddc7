// Canned lookup tables backing the mock facade
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SandboxError};
use crate::sandbox::results::GeoResult;

/// Address handed out for every domain missing from the DNS table (TEST-NET-3).
pub const DNS_FALLBACK: Ipv4Addr = Ipv4Addr::new(203, 0, 113, 1);

/// How a banner is tested against one service signature.
///
/// Serialized as the plain signature string; the empty string is the wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SignatureMatcher {
    Any,
    Contains(String),
}

impl SignatureMatcher {
    pub fn matches(&self, banner: &str) -> bool {
        match self {
            SignatureMatcher::Any => true,
            SignatureMatcher::Contains(needle) => banner.contains(needle.as_str()),
        }
    }

    pub fn signature(&self) -> &str {
        match self {
            SignatureMatcher::Any => "",
            SignatureMatcher::Contains(needle) => needle,
        }
    }
}

impl From<String> for SignatureMatcher {
    fn from(signature: String) -> Self {
        if signature.is_empty() {
            SignatureMatcher::Any
        } else {
            SignatureMatcher::Contains(signature)
        }
    }
}

impl From<SignatureMatcher> for String {
    fn from(matcher: SignatureMatcher) -> Self {
        matcher.signature().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSignature {
    #[serde(rename = "signature")]
    pub matcher: SignatureMatcher,
    pub label: String,
}

impl ServiceSignature {
    pub fn new(signature: &str, label: &str) -> Self {
        Self {
            matcher: SignatureMatcher::from(signature.to_string()),
            label: label.to_string(),
        }
    }
}

/// Ordered signatures for one port. Evaluation follows declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSignatures {
    pub port: u16,
    pub signatures: Vec<ServiceSignature>,
}

impl PortSignatures {
    pub fn new(port: u16, signatures: &[(&str, &str)]) -> Self {
        Self {
            port,
            signatures: signatures.iter()
                .map(|(signature, label)| ServiceSignature::new(signature, label))
                .collect(),
        }
    }

    /// First signature, in declared position, that accepts the banner.
    pub fn first_match(&self, banner: &str) -> Option<&ServiceSignature> {
        self.signatures.iter().find(|s| s.matcher.matches(banner))
    }
}

/// Immutable set of tables owned by a facade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockTables {
    pub dns: BTreeMap<String, Ipv4Addr>,
    #[serde(default = "default_dns_fallback")]
    pub dns_fallback: Ipv4Addr,
    pub geo: BTreeMap<String, GeoResult>,
    pub services: Vec<PortSignatures>,
}

fn default_dns_fallback() -> Ipv4Addr {
    DNS_FALLBACK
}

impl Default for MockTables {
    fn default() -> Self {
        let dns = BTreeMap::from([
            ("google.com".to_string(), Ipv4Addr::new(142, 250, 185, 78)),
            ("github.com".to_string(), Ipv4Addr::new(140, 82, 113, 3)),
            ("cloudflare.com".to_string(), Ipv4Addr::new(104, 16, 124, 96)),
            ("stackoverflow.com".to_string(), Ipv4Addr::new(151, 101, 1, 69)),
        ]);

        let geo = BTreeMap::from([
            ("8.8.8.8".to_string(), GeoResult::new("US", "Mountain View", "Google LLC")),
            ("1.1.1.1".to_string(), GeoResult::new("US", "San Francisco", "Cloudflare")),
            ("208.67.222.222".to_string(), GeoResult::new("US", "San Francisco", "OpenDNS")),
        ]);

        let services = vec![
            PortSignatures::new(22, &[
                ("SSH-2.0-OpenSSH", "OpenSSH Server"),
                ("SSH-2.0-libssh", "LibSSH Server"),
            ]),
            PortSignatures::new(80, &[
                ("nginx", "Nginx HTTP Server"),
                ("Apache", "Apache HTTP Server"),
                ("Server:", "HTTP Server"),
            ]),
            PortSignatures::new(443, &[("", "HTTPS Server")]),
            PortSignatures::new(25, &[
                ("Postfix", "Postfix SMTP"),
                ("220", "SMTP Server"),
            ]),
            PortSignatures::new(3306, &[("MySQL", "MySQL Database Server")]),
            PortSignatures::new(5432, &[("PostgreSQL", "PostgreSQL Database")]),
        ];

        Self {
            dns,
            dns_fallback: DNS_FALLBACK,
            geo,
            services,
        }
    }
}

impl MockTables {
    pub fn resolve(&self, domain: &str) -> Option<Ipv4Addr> {
        self.dns.get(domain).copied()
    }

    pub fn locate(&self, address: &str) -> Option<&GeoResult> {
        self.geo.get(address)
    }

    pub fn signatures_for(&self, port: u16) -> Option<&PortSignatures> {
        self.services.iter().find(|p| p.port == port)
    }

    /// Reject tables whose service list is ambiguous.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.services {
            if !seen.insert(entry.port) {
                return Err(SandboxError::InvalidInput(format!(
                    "port {} declared more than once", entry.port
                )));
            }
            if entry.signatures.is_empty() {
                return Err(SandboxError::InvalidInput(format!(
                    "port {} has no signatures", entry.port
                )));
            }
        }
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let wrap = |source: SandboxError| SandboxError::Config {
            path: path.to_path_buf(),
            source: Box::new(source),
        };
        let content = fs::read_to_string(path).map_err(|e| wrap(e.into()))?;
        let tables: MockTables = serde_json::from_str(&content).map_err(|e| wrap(e.into()))?;
        tables.validate().map_err(wrap)?;
        info!(path = %path.display(), ports = tables.services.len(), "loaded mock tables");
        Ok(tables)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// `<config_dir>/gatenet-sandbox/tables.json`
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("gatenet-sandbox");
        path.push("tables.json");
        path
    }

    /// Explicit path wins; otherwise the user config file if present, else built-ins.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        let path = Self::default_path();
        if path.is_file() {
            Self::load_from_file(&path)
        } else {
            debug!(path = %path.display(), "no tables file, using built-in tables");
            Ok(Self::default())
        }
    }
}
