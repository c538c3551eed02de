//! Provider connection settings baked in at build time.
//!
//! The API key identifies this app to the managed identity provider; it is
//! not a secret. Override any of these at build time to point the client at
//! a different project or a local emulator.

use identity::ProviderConfig;

pub fn provider() -> ProviderConfig {
    let mut config = ProviderConfig::new(option_env!("SKYLIGHT_API_KEY").unwrap_or("demo-key"));
    if let Some(origin) = option_env!("SKYLIGHT_API_ORIGIN") {
        config = config.with_api_origin(origin);
    }
    if let Some(url) = option_env!("SKYLIGHT_FEDERATED_URL") {
        config = config.with_federated_url(url);
    }
    config
}
