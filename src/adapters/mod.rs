//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements         | Connects to                  |
//! |-------------|--------------------|------------------------------|
//! | `discord`   | ChannelPort        | Discord REST v10 over `http` |
//! | `hardware`  | PowerPort          | Relay GPIO, status GPIO      |
//! | `http`      | HttpTransport      | esp_http_client + TLS bundle |
//! | `log_sink`  | EventSink          | Serial log output            |
//! | `time`      | ClockPort          | ESP32 system timer, FreeRTOS |
//! |             | ClockSyncPort      | ESP-IDF SNTP                 |
//! | `wifi`      | ConnectivityPort   | ESP-IDF WiFi STA             |

pub mod discord;
pub mod hardware;
pub mod http;
pub mod log_sink;
pub mod time;
pub(super) mod utils;
pub mod wifi;
