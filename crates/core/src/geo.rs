//! Coarse reporter geolocation.
//!
//! Resolves a reporter IP to country / city / timezone through public
//! lookup services, primary first, one fallback. Lookups are strictly
//! best-effort: any failure yields an empty location and a log line,
//! never an error to the caller. Non-routable addresses are skipped
//! without a network call.

use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use dzretour_common::config::GeoIpConfig;
use dzretour_common::{AppError, AppResult};
use serde::Deserialize;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; ReportBot/1.0)";

/// Coarse location of a reporter IP. All fields optional; an entirely
/// empty value means the lookup was skipped or failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoLocation {
    /// ISO 3166-1 alpha-2 country code.
    pub country: Option<String>,
    /// City name as reported by the lookup service.
    pub city: Option<String>,
    /// IANA timezone identifier.
    pub timezone: Option<String>,
}

/// Client for the public IP geolocation services.
#[derive(Clone)]
pub struct GeoLocator {
    client: reqwest::Client,
    enabled: bool,
}

#[derive(Deserialize)]
struct IpapiResponse {
    #[serde(default)]
    error: bool,
    country_code: Option<String>,
    city: Option<String>,
    timezone: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpApiComResponse {
    status: String,
    country_code: Option<String>,
    city: Option<String>,
    timezone: Option<String>,
}

impl GeoLocator {
    /// Build the locator from configuration.
    pub fn new(config: &GeoIpConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        Ok(Self {
            client,
            enabled: config.enabled,
        })
    }

    /// Resolve `ip` to a coarse location. Never fails: disabled lookups,
    /// non-routable addresses and service errors all yield the empty
    /// location.
    pub async fn lookup(&self, ip: &str) -> GeoLocation {
        if !self.enabled || !is_routable(ip) {
            return GeoLocation::default();
        }

        match self.lookup_ipapi(ip).await {
            Ok(location) => location,
            Err(primary) => {
                tracing::debug!(ip, error = %primary, "primary geolocation lookup failed");
                match self.lookup_ip_api_com(ip).await {
                    Ok(location) => location,
                    Err(fallback) => {
                        tracing::warn!(ip, error = %fallback, "geolocation unavailable");
                        GeoLocation::default()
                    }
                }
            }
        }
    }

    async fn lookup_ipapi(&self, ip: &str) -> AppResult<GeoLocation> {
        let body: IpapiResponse = self
            .client
            .get(format!("https://ipapi.co/{ip}/json/"))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::ExternalService(e.to_string()))?
            .json()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        if body.error {
            return Err(AppError::ExternalService(
                "ipapi.co returned an error payload".to_string(),
            ));
        }

        Ok(GeoLocation {
            country: body.country_code,
            city: body.city,
            timezone: body.timezone,
        })
    }

    async fn lookup_ip_api_com(&self, ip: &str) -> AppResult<GeoLocation> {
        let body: IpApiComResponse = self
            .client
            .get(format!(
                "http://ip-api.com/json/{ip}?fields=status,countryCode,city,timezone"
            ))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?
            .json()
            .await
            .map_err(|e| AppError::ExternalService(e.to_string()))?;

        if body.status != "success" {
            return Err(AppError::ExternalService(
                "ip-api.com returned a failure status".to_string(),
            ));
        }

        Ok(GeoLocation {
            country: body.country_code,
            city: body.city,
            timezone: body.timezone,
        })
    }
}

/// Whether `ip` is a publicly routable address worth a lookup.
/// Placeholders like "unknown" and anything unparseable are skipped.
fn is_routable(ip: &str) -> bool {
    match IpAddr::from_str(ip) {
        Ok(IpAddr::V4(v4)) => {
            !(v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified())
        }
        Ok(IpAddr::V6(v6)) => {
            !(v6.is_loopback()
                || v6.is_unspecified()
                || v6.is_unique_local()
                || v6.is_unicast_link_local())
        }
        Err(_) => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn routable_filters_non_public_addresses() {
        assert!(is_routable("203.0.113.10"));
        assert!(is_routable("2001:db8::1"));

        assert!(!is_routable("unknown"));
        assert!(!is_routable(""));
        assert!(!is_routable("not-an-ip"));
        assert!(!is_routable("127.0.0.1"));
        assert!(!is_routable("10.0.0.5"));
        assert!(!is_routable("192.168.1.1"));
        assert!(!is_routable("169.254.0.1"));
        assert!(!is_routable("0.0.0.0"));
        assert!(!is_routable("::1"));
        assert!(!is_routable("fd12:3456::1"));
        assert!(!is_routable("fe80::1"));
    }

    #[tokio::test]
    async fn disabled_locator_skips_lookup() {
        let locator = GeoLocator::new(&GeoIpConfig {
            enabled: false,
            timeout_secs: 5,
        })
        .unwrap();

        let location = locator.lookup("203.0.113.10").await;
        assert_eq!(location, GeoLocation::default());
    }

    #[tokio::test]
    async fn private_address_skips_lookup() {
        let locator = GeoLocator::new(&GeoIpConfig::default()).unwrap();
        let location = locator.lookup("192.168.0.20").await;
        assert_eq!(location, GeoLocation::default());
    }
}
