#![deny(warnings)]
#![deny(clippy::unwrap_used)]

use std::sync::Arc;

use dotenv::dotenv;
use tracing::info;

use authprobe::auth::harness::{ProbeHarness, ProbeOptions};
use authprobe::auth::transport::TcpTransport;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    // Initialize logging with proper tracing default
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse().expect("valid directive")),
        )
        .init();

    // Probe parameters resolve parameter -> environment -> default inside
    // the harness; the binary passes everything through the environment
    // (AUTHPROBE_PORT, AUTHPROBE_USER, AUTHPROBE_PRINCIPAL, KRB5_CONFIG).
    let opts = ProbeOptions::default();
    let transport = Arc::new(TcpTransport::from_env());
    let harness = ProbeHarness::new(transport);

    info!("probing authentication methods against the transfer daemon");
    let report = harness.run(&opts).await?;
    println!("{report}");

    Ok(())
}
