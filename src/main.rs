//! PowerSwitch firmware entry point.
//!
//! Hexagonal architecture, one thread, one poll loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  DiscordChannel      HardwareAdapter    LogEventSink           │
//! │  (ChannelPort)       (PowerPort)        (EventSink)            │
//! │   ├ EspHttpTransport  ├ RelayDriver     Esp32TimeAdapter       │
//! │   └ WifiAdapter       └ PowerSense      (ClockPort)            │
//! │                                         SntpClockSync          │
//! │                                         (ClockSyncPort)        │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Gate · Interpreter · Power sequences                  │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Agent · Scheduler (message check every 1 s, SNTP daily)       │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::{info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{AnyInputPin, AnyOutputPin, PinDriver};
use esp_idf_svc::hal::prelude::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

use powerswitch::adapters::discord::DiscordChannel;
use powerswitch::adapters::hardware::HardwareAdapter;
use powerswitch::adapters::http::EspHttpTransport;
use powerswitch::adapters::log_sink::LogEventSink;
use powerswitch::adapters::time::{Esp32TimeAdapter, SntpClockSync};
use powerswitch::adapters::wifi::{ConnectivityPort, WifiAdapter};
use powerswitch::agent::{Agent, Ports};
use powerswitch::config::AgentConfig;
use powerswitch::drivers::power_sense::PowerSense;
use powerswitch::drivers::relay::RelayDriver;
use powerswitch::pins;

/// Pause between WiFi association attempts at boot.
const WIFI_RETRY_MS: u32 = 1_000;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PowerSwitch v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (baked in at build time) ─────────────
    let config = AgentConfig::from_build_env();
    config.validate().context("invalid build-time configuration")?;
    info!("Config: {:?}", config);

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // SAFETY: these two GPIOs are claimed nowhere else; `pins` is the only
    // place that names them.
    let relay_pin = PinDriver::output(unsafe { AnyOutputPin::new(pins::POWER_SWITCH_GPIO) })?;
    let status_pin = PinDriver::input(unsafe { AnyInputPin::new(pins::STATUS_GPIO) })?;

    let relay = RelayDriver::new(relay_pin, FreeRtos).context("relay init")?;
    let hw = HardwareAdapter::new(relay, PowerSense::new(status_pin));

    // ── 4. Network ────────────────────────────────────────────
    let mut wifi = WifiAdapter::with_credentials(&config.wifi).context("WiFi credentials")?;
    wifi.attach(BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?,
        sysloop,
    )?);
    while let Err(e) = wifi.connect() {
        warn!("WiFi: {}, retrying in {} ms", e, WIFI_RETRY_MS);
        FreeRtos::delay_ms(WIFI_RETRY_MS);
    }

    let channel = DiscordChannel::new(EspHttpTransport::new(), wifi, &config);

    // ── 5. Agent ──────────────────────────────────────────────
    let mut agent = Agent::new(
        &config,
        Ports {
            channel,
            hw,
            clock: Esp32TimeAdapter::new(),
            clock_sync: SntpClockSync::new(),
            sink: LogEventSink::new(),
        },
    );
    agent.boot();

    info!("System ready. Entering poll loop.");
    agent.run()
}
