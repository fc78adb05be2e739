//! ESP32 time adapters.
//!
//! [`Esp32TimeAdapter`] provides the monotonic clock and blocking delay
//! behind [`ClockPort`]; [`SntpClockSync`] keeps the wall clock in step
//! behind [`ClockSyncPort`].
//!
//! - **`target_os = "espidf"`**: `esp_timer_get_time()` (microsecond
//!   precision, monotonic), FreeRTOS delays, and the ESP-IDF SNTP client.
//! - **`not(target_os = "espidf")`**: `std::time::Instant` and
//!   `thread::sleep` for host-side runs; SNTP always succeeds.

use log::info;

use crate::app::ports::{ClockPort, ClockSyncPort};
use crate::error::CommsError;

/// Time adapter for the ESP32 platform.
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since boot (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl ClockPort for Esp32TimeAdapter {
    fn now_ms(&self) -> u64 {
        self.uptime_us() / 1_000
    }

    #[cfg(target_os = "espidf")]
    fn delay_ms(&mut self, ms: u32) {
        esp_idf_svc::hal::delay::FreeRtos::delay_ms(ms);
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}

// ───────────────────────────────────────────────────────────────
// Wall-clock sync
// ───────────────────────────────────────────────────────────────

/// How long one sync may block before giving up.
pub const SNTP_TIMEOUT_MS: u32 = 15_000;
#[cfg(target_os = "espidf")]
const SNTP_POLL_MS: u32 = 100;

/// SNTP client, restarted on every sync.
pub struct SntpClockSync {
    #[cfg(target_os = "espidf")]
    sntp: Option<esp_idf_svc::sntp::EspSntp<'static>>,
    syncs: u32,
}

impl Default for SntpClockSync {
    fn default() -> Self {
        Self::new()
    }
}

impl SntpClockSync {
    pub fn new() -> Self {
        Self {
            #[cfg(target_os = "espidf")]
            sntp: None,
            syncs: 0,
        }
    }

    /// Successful syncs since boot.
    pub fn syncs(&self) -> u32 {
        self.syncs
    }

    #[cfg(target_os = "espidf")]
    fn platform_sync(&mut self) -> Result<(), CommsError> {
        use esp_idf_svc::hal::delay::FreeRtos;
        use esp_idf_svc::sntp::{EspSntp, SyncStatus};

        // Only one SNTP client may exist; drop the old one first.
        self.sntp = None;
        let sntp = EspSntp::new_default().map_err(|e| {
            log::warn!("SNTP: start failed: {:?}", e);
            CommsError::ClockSyncFailed
        })?;

        let mut waited = 0;
        while sntp.get_sync_status() != SyncStatus::Completed {
            if waited >= SNTP_TIMEOUT_MS {
                self.sntp = Some(sntp);
                return Err(CommsError::ClockSyncTimeout);
            }
            FreeRtos::delay_ms(SNTP_POLL_MS);
            waited += SNTP_POLL_MS;
        }
        self.sntp = Some(sntp);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_sync(&mut self) -> Result<(), CommsError> {
        info!("SNTP(sim): synced");
        Ok(())
    }
}

impl ClockSyncPort for SntpClockSync {
    fn sync(&mut self) -> Result<(), CommsError> {
        self.platform_sync()?;
        self.syncs = self.syncs.wrapping_add(1);
        info!("SNTP: wall clock synced (#{})", self.syncs);
        Ok(())
    }
}
