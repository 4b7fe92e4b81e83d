use std::io;

use eskiz::{EskizClient, EskizError};
use tracing_subscriber::EnvFilter;

/// Query two accounts through one client by overriding the token per call tree.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let primary = std::env::var("ESKIZ_TOKEN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "ESKIZ_TOKEN environment variable is required",
        )
    })?;
    let secondary = std::env::var("ESKIZ_SECOND_TOKEN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "ESKIZ_SECOND_TOKEN environment variable is required",
        )
    })?;

    let client = EskizClient::builder().token(primary).build()?;

    let own = client.get_limit().await?;
    println!("primary balance: {}", own.data.balance);

    let other = client
        .with_token(secondary, async {
            let nicks = client.get_nick_list().await?;
            let limit = client.get_limit().await?;
            Ok::<_, EskizError>((nicks, limit))
        })
        .await;

    match other {
        Ok((nicks, limit)) => {
            println!("secondary nicks: {}", nicks.join(", "));
            println!("secondary balance: {}", limit.data.balance);
        }
        Err(err) => {
            // Upstream failures close the session; reopen before going on.
            println!("secondary account failed: {err}");
            if client.is_closed() {
                client.reopen()?;
            }
        }
    }

    println!(
        "stored token still active: {}",
        client.token().is_some_and(|token| !token.is_expired().unwrap_or(true))
    );

    Ok(())
}
