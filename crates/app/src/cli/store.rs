use std::time::Duration;

use caleta_app::catalog::{AuthMode, WooCommerceClient, WooCommerceConfig};
use clap::Args;
use zeroize::Zeroizing;

/// Store connection settings shared by every command.
#[derive(Debug, Args)]
pub(crate) struct StoreArgs {
    /// Store address, e.g. https://tienda.example.cl
    #[arg(long, env = "WOO_STORE_URL")]
    store_url: String,

    /// REST API consumer key
    #[arg(long, env = "WOO_CONSUMER_KEY")]
    consumer_key: String,

    /// REST API consumer secret
    #[arg(long, env = "WOO_CONSUMER_SECRET", hide_env_values = true)]
    consumer_secret: String,

    /// How credentials are sent (basic, query)
    #[arg(long, env = "WOO_AUTH_MODE", value_enum, default_value_t = AuthMode::Basic)]
    auth_mode: AuthMode,

    /// Per-request timeout in seconds
    #[arg(long, env = "WOO_TIMEOUT_SECONDS", default_value_t = 30)]
    timeout_seconds: u64,
}

impl StoreArgs {
    pub(crate) fn connect(self) -> Result<WooCommerceClient, String> {
        WooCommerceClient::new(WooCommerceConfig {
            store_url: self.store_url,
            consumer_key: self.consumer_key,
            consumer_secret: Zeroizing::new(self.consumer_secret),
            auth_mode: self.auth_mode,
            timeout: Duration::from_secs(self.timeout_seconds),
        })
        .map_err(|error| format!("failed to build store client: {error}"))
    }
}
