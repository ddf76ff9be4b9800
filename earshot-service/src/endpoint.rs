//! Endpoint resolution, done once at startup.

use earshot_core::ConfigService;
use earshot_core::config::ServiceConfig;
use tracing::{error, info};

use crate::types::Endpoint;

/// Build the service endpoint from configuration and the host's settings.
///
/// The port is read from the integer setting named by
/// `config.port_setting`. A missing or out-of-range value is logged and
/// replaced by `config.default_port`.
#[must_use]
pub fn resolve_endpoint(config: &ServiceConfig, settings: &dyn ConfigService) -> Endpoint {
    let port = match settings.get_int_setting(&config.port_setting) {
        Some(value) => match u16::try_from(value) {
            Ok(port) if port != 0 => port,
            _ => {
                error!(
                    setting = %config.port_setting,
                    value,
                    fallback = config.default_port,
                    "Service port setting out of range"
                );
                config.default_port
            }
        },
        None => {
            error!(
                setting = %config.port_setting,
                fallback = config.default_port,
                "Service port setting not found"
            );
            config.default_port
        }
    };

    let endpoint = Endpoint {
        base_url: config.base_url.clone(),
        port,
        route: config.route.clone(),
    };
    info!(url = %endpoint, "Resolved conversation service endpoint");
    endpoint
}
