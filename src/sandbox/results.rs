use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// Canned HTTP response. `data()` gives the body the demo prints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResult {
    pub status: u16,
    pub url: String,
    pub method: HttpMethod,
    #[serde(rename = "json", skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl HttpResult {
    /// Response body without the status line.
    pub fn data(&self) -> serde_json::Value {
        let mut data = serde_json::Map::new();
        data.insert("url".to_string(), self.url.clone().into());
        data.insert("method".to_string(), self.method.to_string().into());
        if let Some(ref payload) = self.payload {
            data.insert("json".to_string(), payload.clone());
        }
        let headers = self.headers.iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        data.insert("headers".to_string(), serde_json::Value::Object(headers));
        if let Some(ref origin) = self.origin {
            data.insert("origin".to_string(), origin.clone().into());
        }
        serde_json::Value::Object(data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsResult {
    pub domain: String,
    pub address: Ipv4Addr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoResult {
    pub country: String,
    pub city: String,
    #[serde(rename = "org")]
    pub organization: String,
}

impl GeoResult {
    pub fn new(country: &str, city: &str, organization: &str) -> Self {
        Self {
            country: country.to_string(),
            city: city.to_string(),
            organization: organization.to_string(),
        }
    }

    pub fn unknown() -> Self {
        Self::new("Unknown", "Unknown", "Unknown")
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::unknown()
    }
}

impl std::fmt::Display for GeoResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {} ({})", self.city, self.country, self.organization)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingResult {
    pub host: String,
    pub packets_sent: u32,
    pub packets_received: u32,
    #[serde(rename = "packet_loss")]
    pub packet_loss_percent: f64,
    #[serde(rename = "avg_time")]
    pub average_latency_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceIdentification {
    pub port: u16,
    /// Signature that matched; `Some("")` for a wildcard, `None` when unknown.
    pub matched_signature: Option<String>,
    pub label: String,
}

impl ServiceIdentification {
    pub fn unknown(port: u16) -> Self {
        Self {
            port,
            matched_signature: None,
            label: unknown_service_label(port),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.matched_signature.is_none()
    }
}

impl std::fmt::Display for ServiceIdentification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

pub fn unknown_service_label(port: u16) -> String {
    format!("Unknown Service (Port {})", port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_data_echoes_json_field() {
        let result = HttpResult {
            status: 200,
            url: "https://httpbin.org/post".to_string(),
            method: HttpMethod::Post,
            payload: Some(serde_json::json!({"user": "sandbox"})),
            headers: BTreeMap::from([("Content-Type".to_string(), "application/json".to_string())]),
            origin: None,
        };
        let data = result.data();
        assert_eq!(data["method"], "POST");
        assert_eq!(data["json"]["user"], "sandbox");
        assert!(data.get("origin").is_none());
    }

    #[test]
    fn test_ping_serializes_wire_names() {
        let ping = PingResult {
            host: "1.1.1.1".to_string(),
            packets_sent: 3,
            packets_received: 3,
            packet_loss_percent: 0.0,
            average_latency_ms: 12.5,
        };
        let value = serde_json::to_value(&ping).unwrap();
        assert_eq!(value["packet_loss"], 0.0);
        assert_eq!(value["avg_time"], 12.5);
    }

    #[test]
    fn test_geo_display_and_sentinel() {
        let geo = GeoResult::new("US", "Mountain View", "Google LLC");
        assert_eq!(geo.to_string(), "Mountain View, US (Google LLC)");
        assert!(!geo.is_unknown());
        assert!(GeoResult::unknown().is_unknown());
        let value = serde_json::to_value(GeoResult::unknown()).unwrap();
        assert_eq!(value["org"], "Unknown");
    }

    #[test]
    fn test_unknown_service_label() {
        let id = ServiceIdentification::unknown(9999);
        assert_eq!(id.label, "Unknown Service (Port 9999)");
        assert!(id.is_unknown());
    }
}
