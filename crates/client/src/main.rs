use anyhow::Result;
use clap::Parser;

use blindsig_client::{Algorithm, run};

#[derive(Parser)]
struct Args {
    #[clap(long, default_value = "127.0.0.1")]
    host: String,
    #[clap(long, default_value = "3000")]
    port: u16,
    /// Blind-signature scheme to request from the signer.
    #[clap(long, value_enum, default_value = "butun")]
    algorithm: Algorithm,
    /// Message to obtain a blind signature over.
    #[clap(long)]
    message: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    run(&args.host, args.port, args.algorithm, &args.message).await
}
