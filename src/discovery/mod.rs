// Banner fingerprinting for discovered services
// Detectors run in a fixed chain; the first one to answer wins.

pub mod detectors;

use tracing::trace;

use detectors::*;

pub trait BannerDetector: Send + Sync {
    fn name(&self) -> &str;
    /// `banner` arrives trimmed and lower-cased.
    fn detect(&self, port: u16, banner: &str) -> Option<String>;
}

pub struct DetectorChain {
    detectors: Vec<Box<dyn BannerDetector>>,
}

impl Default for DetectorChain {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorChain {
    pub fn new() -> Self {
        let detectors: Vec<Box<dyn BannerDetector>> = vec![
            Box::new(SshDetector),
            Box::new(HttpDetector),
            Box::new(FtpDetector),
            Box::new(SmtpDetector),
            Box::new(PortMappingDetector),
            Box::new(BannerKeywordDetector),
            Box::new(GenericServiceDetector),
            Box::new(FallbackDetector),
        ];
        Self { detectors }
    }

    pub fn detector_names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Name the service behind `port` from its banner. Never fails.
    pub fn identify(&self, port: u16, banner: &str) -> String {
        let normalized = banner.trim().to_lowercase();

        for detector in &self.detectors {
            if let Some(service) = detector.detect(port, &normalized) {
                trace!(port, detector = detector.name(), %service, "banner matched");
                return service;
            }
        }

        // FallbackDetector always answers
        crate::sandbox::results::unknown_service_label(port)
    }
}

/// One-shot identification with the default chain.
pub fn identify_service(port: u16, banner: &str) -> String {
    DetectorChain::new().identify(port, banner)
}
