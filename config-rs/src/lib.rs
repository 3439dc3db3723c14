//! config-rs/lib.rs
//! Shared configuration utilities for consistent service configuration
//! Provides standardized functions for port/address management and
//! external endpoint resolution

use std::env;
use std::net::SocketAddr;

/// Get service port from environment variables with proper fallback
///
/// # Arguments
/// * `service_name` - The name of the service (e.g., "RECOMMEND")
/// * `default_port` - The default port to use if not specified in environment
///
/// # Returns
/// The port number to use for the service
pub fn get_service_port(service_name: &str, default_port: u16) -> u16 {
    let var_name = format!("{}_SERVICE_PORT", service_name.to_uppercase());
    env::var(&var_name)
        .unwrap_or_else(|_| default_port.to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            log::warn!("Invalid port in {}, using default {}", var_name, default_port);
            default_port
        })
}

/// Create a SocketAddr for binding a service
///
/// # Arguments
/// * `service_name` - The name of the service (e.g., "RECOMMEND")
/// * `default_port` - The default port to use if not specified in environment
///
/// # Returns
/// A SocketAddr configured with the appropriate bind address and port
pub fn get_bind_address(service_name: &str, default_port: u16) -> SocketAddr {
    let var_name = format!("{}_SERVICE_ADDR", service_name.to_uppercase());

    // Check if there's a full address override
    if let Ok(addr_str) = env::var(&var_name) {
        if let Ok(addr) = addr_str.parse::<SocketAddr>() {
            return addr;
        } else {
            log::warn!("Invalid address format in {}, using default", var_name);
        }
    }

    // Use the port from environment or default
    let port = get_service_port(service_name, default_port);
    format!("0.0.0.0:{}", port).parse().unwrap()
}

/// Resolve the base URL of an external API with an environment override
///
/// # Arguments
/// * `var_name` - The environment variable holding the override (e.g., "LEETCODE_API_URL")
/// * `default_url` - The URL to use when no override is set
///
/// # Returns
/// The base URL with any trailing slash removed
pub fn get_external_api_url(var_name: &str, default_url: &str) -> String {
    let url = env::var(var_name).unwrap_or_else(|_| default_url.to_string());
    url.trim_end_matches('/').to_string()
}

/// Get service name for logging and monitoring
///
/// # Arguments
/// * `service_name` - The name of the service (e.g., "RECOMMEND")
///
/// # Returns
/// A formatted service name suitable for logging
pub fn get_formatted_service_name(service_name: &str) -> String {
    match service_name {
        "RECOMMEND" => "recommend-service".to_string(),
        _ => format!("{}-service", service_name.to_lowercase()),
    }
}

/// Get default port for a specific service
///
/// # Arguments
/// * `service_name` - The name of the service (e.g., "RECOMMEND")
///
/// # Returns
/// The default port for the service
pub fn get_default_port(service_name: &str) -> u16 {
    match service_name.to_uppercase().as_str() {
        "RECOMMEND" => 8000,
        _ => 8100, // Unknown services start at 8100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_service_port() {
        // Test with environment variable
        std::env::set_var("TEST_SERVICE_PORT", "9000");
        assert_eq!(get_service_port("TEST", 8000), 9000);

        // Test with default
        std::env::remove_var("UNKNOWN_SERVICE_PORT");
        assert_eq!(get_service_port("UNKNOWN", 8000), 8000);
    }

    #[test]
    fn test_get_external_api_url() {
        // Test with override
        std::env::set_var("TEST_API_URL", "http://example.com/api/");
        assert_eq!(
            get_external_api_url("TEST_API_URL", "http://fallback"),
            "http://example.com/api"
        );

        // Test with default
        std::env::remove_var("MISSING_API_URL");
        assert_eq!(
            get_external_api_url("MISSING_API_URL", "http://fallback"),
            "http://fallback"
        );
    }

    #[test]
    fn test_get_formatted_service_name() {
        assert_eq!(get_formatted_service_name("RECOMMEND"), "recommend-service");
        assert_eq!(get_formatted_service_name("OTHER"), "other-service");
    }
}
