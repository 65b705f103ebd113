//! Server configuration

use bridgelink_shared::helm;

/// Configuration for the helm command server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP listen address
    pub bind_addr: String,
    /// Simulation and service rate
    pub tick_hz: u32,
    /// Velocity fraction retained per emergency damp
    pub stop_damping_retain: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5005".into(),
            tick_hz: 30,
            stop_damping_retain: helm::DEFAULT_STOP_DAMPING_RETAIN,
        }
    }
}

impl ServerConfig {
    /// Build a config from defaults plus environment overrides
    ///
    /// `HELM_BIND` overrides the listen address, `HELM_TICK_HZ` the tick
    /// rate. Unparseable overrides fall back to the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var("HELM_BIND") {
            config.bind_addr = addr;
        }
        if let Ok(hz) = std::env::var("HELM_TICK_HZ") {
            if let Ok(hz) = hz.parse::<u32>() {
                if hz > 0 {
                    config.tick_hz = hz;
                }
            }
        }
        config
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.tick_hz))
    }
}
