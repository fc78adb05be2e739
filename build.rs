fn main() {
    // Build-time configuration is baked in via `option_env!` in src/config.rs.
    for var in [
        "POWERSWITCH_WIFI_SSID",
        "POWERSWITCH_WIFI_PASSWORD",
        "POWERSWITCH_BOT_TOKEN",
        "POWERSWITCH_CHANNEL_ID",
        "POWERSWITCH_ADMIN_ID",
    ] {
        println!("cargo:rerun-if-env-changed={var}");
    }

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
