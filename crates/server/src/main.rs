use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use blindsig::IssuerKeys;
use blindsig_server::{AppState, run};

#[derive(Parser)]
struct Args {
    #[clap(long, default_value = "127.0.0.1")]
    host: String,
    #[clap(long, default_value = "3000")]
    port: u16,
    #[clap(long, env = "SIGNING_KEY_SEED")]
    signing_key_seed: String,
    #[clap(long, env = "RSA_KEY_BITS", default_value = "2048")]
    rsa_key_bits: usize,
    /// Stored per-session nonces expire after this many seconds.
    #[clap(long, env = "SESSION_TTL_SECS", default_value = "120")]
    session_ttl_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let keys = IssuerKeys::from_seed_with_bits(&args.signing_key_seed, args.rsa_key_bits)
        .context("generating issuer keys from seed")?;
    let state = AppState::new(keys, Duration::from_secs(args.session_ttl_secs));

    run(&args.host, args.port, state).await
}
