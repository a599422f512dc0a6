// crates/test-utils/src/lib.rs

pub mod builders;
pub mod fakes;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Await `f`, failing the test if `what` takes longer than three seconds.
///
/// Session loops block on their event channel, so a missing shutdown shows
/// up as a hang rather than a failure without this.
pub async fn with_timeout<F, T>(what: &str, f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(Duration::from_secs(3), f).await {
        Ok(v) => v,
        Err(_) => panic!("{what} did not finish within 3 seconds"),
    }
}
