use once_cell::sync::Lazy;
use prometheus::{register_int_counter, IntCounter};
use tracing::info;

/// Install a `tracing` subscriber honoring `LICENSURE_LOG`, falling back to
/// `RUST_LOG`, then `info`.
///
/// Safe to call more than once; only the first call takes effect.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("LICENSURE_LOG")
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

static LICENSE_KEYS_GENERATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "license_keys_generated_total",
        "Total number of license keys generated by generateKeyFrom"
    )
    .expect("metric registration to succeed")
});

static LICENSE_INSTALLS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "license_installs_total",
        "Total number of license artifacts successfully installed"
    )
    .expect("metric registration to succeed")
});

static LICENSE_VERIFICATIONS_FAILED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "license_verifications_failed_total",
        "Total number of verify() calls that failed authentication or validation"
    )
    .expect("metric registration to succeed")
});

static LICENSE_FTP_KEYS_GENERATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "license_ftp_keys_generated_total",
        "Total number of free-trial keys auto-generated by a chained manager"
    )
    .expect("metric registration to succeed")
});

/// Record a successful `generateKeyFrom` call.
pub fn record_key_generated() {
    LICENSE_KEYS_GENERATED_TOTAL.inc();
    info!("license key generated");
}

/// Record a successful `install`.
pub fn record_install() {
    LICENSE_INSTALLS_TOTAL.inc();
    info!("license installed");
}

/// Record a `verify` call that failed authentication or validation.
pub fn record_verification_failed() {
    LICENSE_VERIFICATIONS_FAILED_TOTAL.inc();
    info!("license verification failed");
}

/// Record a chained manager auto-generating a free-trial key.
pub fn record_ftp_key_generated() {
    LICENSE_FTP_KEYS_GENERATED_TOTAL.inc();
    info!("free-trial license key generated");
}
