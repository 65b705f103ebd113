mod command;
mod config;
mod connection;
mod helm;

use anyhow::Result;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bridgelink_shared::Ack;

use command::CommandRouter;
use config::ServerConfig;
use connection::{BridgeEndpoint, ConnectionEvent};
use helm::{HelmStateMachine, SimShip};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = ServerConfig::from_env();
    info!("helm command server starting");
    info!("  listen: {}", config.bind_addr);
    info!("  tick rate: {} Hz", config.tick_hz);

    let mut endpoint = BridgeEndpoint::bind(&config.bind_addr).await?;
    let mut ship = SimShip::new();
    let mut machine = HelmStateMachine::new(config.stop_damping_retain);
    let mut router = CommandRouter::new();

    let mut ticker = interval(config.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();

    loop {
        ticker.tick().await;
        let now = Instant::now();
        let dt = (now - last).as_secs_f32();
        last = now;

        ship.tick(dt);

        let polled = endpoint.poll();
        for event in &polled.events {
            match event {
                ConnectionEvent::Connected { addr } => info!("helm taken by {addr}"),
                ConnectionEvent::Disconnected { reason } => warn!("helm released: {reason}"),
            }
        }

        // One ack per message, in arrival order
        for line in &polled.lines {
            let ack = router.handle_line(line, &mut machine, &mut ship);
            endpoint.send(&ack);
        }

        machine.tick(dt, &mut ship);
        for announcement in machine.take_announcements() {
            info!("{announcement}");
            endpoint.send(&Ack::announcement(announcement));
        }
    }
}
