use anyhow::Result;
use clap::Parser;
use client_core::{load_settings, PurchaseClient, PurchaseController, PurchaseOutcome};

#[derive(Parser, Debug)]
struct Args {
    /// Farm endpoint override; falls back to corn.toml / CORN_FARM_URL.
    #[arg(long)]
    farm_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let settings = load_settings().with_override(args.farm_url);
    let client = PurchaseClient::from_settings(&settings)?;
    let mut controller = PurchaseController::new(client);

    controller.purchase_corn().await;

    match controller.last_outcome() {
        Some(PurchaseOutcome::Fulfilled { message, .. }) => {
            println!("{message}");
            println!("Purchases this session: {}", controller.fulfilled_count());
        }
        Some(PurchaseOutcome::Rejected {
            kind,
            error,
            status,
        }) => {
            match status {
                Some(code) => println!("Purchase failed ({}, status {code}): {error}", kind.label()),
                None => println!("Purchase failed ({}): {error}", kind.label()),
            }
            std::process::exit(1);
        }
        None => println!("Purchase attempt did not settle; check the logs."),
    }

    Ok(())
}
