use anyhow::{Context, Result};
use reward_swap_client::{
    config::AppConfig,
    dex::EthersLedger,
    models::SwapOutcome,
    swap_client::SwapClient,
    utils::{self, format_amount},
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = AppConfig::load().context("loading configuration")?;
    tracing::info!(?config, "[INIT] reward-swap-client starting");

    let ledger = EthersLedger::connect(&config)
        .await
        .context("connecting to ledger")?;
    let missing = ledger.check_deployment(&config.contracts).await?;
    if !missing.is_empty() {
        tracing::warn!(?missing, "[INIT] registry does not match this node's deployment");
    }

    let client = SwapClient::new(ledger, config.contracts);
    let session = client.initialize().await.context("initializing swap client")?;
    println!("Connected as: {:?}", session.account);
    if let Some(points) = client.view().points_balance {
        println!("Your POINTS balance: {}", format_amount(points));
    }

    println!("Enter an amount of token0 to swap, `balance` to refresh points, `quit` to exit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => continue,
            "quit" | "exit" => break,
            "balance" => match client.refresh_points_balance().await {
                Ok(Some(points)) => println!("Your POINTS balance: {}", format_amount(points)),
                Ok(None) => println!("Client not initialized"),
                Err(e) => println!("Balance query failed: {e}"),
            },
            amount => match client.perform_swap(amount).await {
                Ok(SwapOutcome::Completed(result)) => {
                    println!("New Token0 balance: {}", format_amount(result.token0_balance));
                    println!("New Token1 balance: {}", format_amount(result.token1_balance));
                    println!("Your POINTS balance: {}", format_amount(result.points_balance));
                }
                Ok(SwapOutcome::NotReady) => println!("Client not initialized"),
                Ok(SwapOutcome::InFlight) => println!("A swap is already in flight"),
                Err(e) => println!("Swap failed: {e}"),
            },
        }
    }

    tracing::info!("[SHUTDOWN] bye");
    Ok(())
}
