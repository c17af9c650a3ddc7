// Individual banner detectors, ordered from most to least specific

use regex::Regex;

use super::BannerDetector;
use crate::sandbox::results::unknown_service_label;

lazy_static::lazy_static! {
    static ref OPENSSH_VERSION: Regex = Regex::new(r"openssh[_\s]+([\d.]+p?\d*)")
        .expect("OpenSSH version pattern is valid");
}

pub struct SshDetector;

impl BannerDetector for SshDetector {
    fn name(&self) -> &str {
        "SSH"
    }

    fn detect(&self, port: u16, banner: &str) -> Option<String> {
        if port != 22 && !banner.contains("ssh") {
            return None;
        }

        if banner.contains("openssh") {
            let version = OPENSSH_VERSION
                .captures(banner)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str())
                .unwrap_or("unknown");
            return Some(format!("OpenSSH {}", version));
        }

        if banner.contains("ssh") {
            return Some("SSH Server".to_string());
        }

        None
    }
}

pub struct HttpDetector;

impl BannerDetector for HttpDetector {
    fn name(&self) -> &str {
        "HTTP"
    }

    fn detect(&self, port: u16, banner: &str) -> Option<String> {
        if !matches!(port, 80 | 8080 | 8000 | 443) && !banner.starts_with("http") {
            return None;
        }

        let service = if banner.contains("apache") {
            "Apache HTTP Server"
        } else if banner.contains("nginx") {
            "Nginx HTTP Server"
        } else if banner.contains("iis") {
            "Microsoft IIS"
        } else if banner.starts_with("http") {
            "HTTP Server"
        } else {
            return None;
        };
        Some(service.to_string())
    }
}

pub struct FtpDetector;

impl BannerDetector for FtpDetector {
    fn name(&self) -> &str {
        "FTP"
    }

    fn detect(&self, port: u16, banner: &str) -> Option<String> {
        if port != 21 && !banner.contains("ftp") {
            return None;
        }

        let service = if banner.contains("vsftpd") {
            "vsftpd FTP Server"
        } else if banner.contains("filezilla") {
            "FileZilla FTP Server"
        } else if banner.contains("ftp") {
            "FTP Server"
        } else {
            return None;
        };
        Some(service.to_string())
    }
}

pub struct SmtpDetector;

impl BannerDetector for SmtpDetector {
    fn name(&self) -> &str {
        "SMTP"
    }

    fn detect(&self, port: u16, banner: &str) -> Option<String> {
        if port != 25 && !banner.contains("smtp") {
            return None;
        }

        let service = if banner.contains("postfix") {
            "Postfix SMTP"
        } else if banner.contains("sendmail") {
            "Sendmail SMTP"
        } else if banner.contains("smtp") {
            "SMTP Server"
        } else {
            return None;
        };
        Some(service.to_string())
    }
}

/// Ports that identify their service regardless of banner.
pub struct PortMappingDetector;

impl BannerDetector for PortMappingDetector {
    fn name(&self) -> &str {
        "PortMapping"
    }

    fn detect(&self, port: u16, _banner: &str) -> Option<String> {
        let service = match port {
            443 => "HTTPS Server",
            53 => "DNS Server",
            23 => "Telnet Server",
            110 => "POP3 Server",
            143 => "IMAP Server",
            993 => "IMAPS Server",
            995 => "POP3S Server",
            3389 => "Remote Desktop Protocol (RDP)",
            _ => return None,
        };
        Some(service.to_string())
    }
}

pub struct BannerKeywordDetector;

const BANNER_KEYWORDS: &[(&[&str], &str)] = &[
    (&["telnet"], "Telnet Server"),
    (&["pop3"], "POP3 Server"),
    (&["imap"], "IMAP Server"),
];

impl BannerDetector for BannerKeywordDetector {
    fn name(&self) -> &str {
        "BannerKeyword"
    }

    fn detect(&self, _port: u16, banner: &str) -> Option<String> {
        BANNER_KEYWORDS.iter()
            .find(|(keywords, _)| keywords.iter().any(|k| banner.contains(k)))
            .map(|(_, service)| service.to_string())
    }
}

pub struct GenericServiceDetector;

const SERVICE_INDICATORS: &[(&str, &str)] = &[
    ("mysql", "MySQL Database"),
    ("postgresql", "PostgreSQL Database"),
    ("redis", "Redis Server"),
    ("mongodb", "MongoDB Database"),
    ("elasticsearch", "Elasticsearch"),
    ("docker", "Docker Registry"),
    ("jenkins", "Jenkins CI/CD"),
    ("gitlab", "GitLab"),
    ("apache", "Apache Server"),
    ("nginx", "Nginx Server"),
];

impl BannerDetector for GenericServiceDetector {
    fn name(&self) -> &str {
        "Generic"
    }

    fn detect(&self, _port: u16, banner: &str) -> Option<String> {
        SERVICE_INDICATORS.iter()
            .find(|(indicator, _)| banner.contains(indicator))
            .map(|(_, service)| service.to_string())
    }
}

/// Always answers: a well-known name for silent ports, otherwise "unknown".
pub struct FallbackDetector;

fn default_port_service(port: u16) -> Option<&'static str> {
    match port {
        22 => Some("SSH"),
        23 => Some("Telnet"),
        25 => Some("SMTP"),
        53 => Some("DNS"),
        80 | 8080 | 8000 => Some("HTTP"),
        110 => Some("POP3"),
        143 => Some("IMAP"),
        443 => Some("HTTPS"),
        993 => Some("IMAPS"),
        995 => Some("POP3S"),
        3389 => Some("RDP"),
        21 => Some("FTP"),
        _ => None,
    }
}

impl BannerDetector for FallbackDetector {
    fn name(&self) -> &str {
        "Fallback"
    }

    fn detect(&self, port: u16, banner: &str) -> Option<String> {
        if !banner.is_empty() {
            return Some(unknown_service_label(port));
        }
        Some(default_port_service(port)
            .map(str::to_string)
            .unwrap_or_else(|| unknown_service_label(port)))
    }
}
