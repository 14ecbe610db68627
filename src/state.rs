use crate::gateway::{GatewaySettings, transport::HttpTransport};

#[derive(Debug, Clone)]
pub struct AppState<T = HttpTransport> {
    pub transport: T,
    /// Defaults for every merchant, the region can be overridden per request
    pub settings: GatewaySettings,
}

impl<T> AppState<T> {
    pub fn new(transport: T, settings: GatewaySettings) -> Self {
        Self {
            transport,
            settings,
        }
    }
}
