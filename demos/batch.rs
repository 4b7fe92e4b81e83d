use std::io;

use eskiz::{EskizClient, MessageBuilder, MessageText, RawPhoneNumber};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let token = std::env::var("ESKIZ_TOKEN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "ESKIZ_TOKEN environment variable is required",
        )
    })?;
    // Comma-separated recipients.
    let phones = std::env::var("ESKIZ_PHONES").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "ESKIZ_PHONES environment variable is required",
        )
    })?;
    let dispatch_id: u64 = std::env::var("ESKIZ_DISPATCH_ID")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(1);

    let client = EskizClient::builder().token(token).build()?;

    let mut builder = MessageBuilder::new(dispatch_id);
    for phone in phones.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        builder.add(
            RawPhoneNumber::new(phone)?,
            MessageText::new("Bu Eskiz dan test")?,
            None,
        );
    }
    let batch = builder.build()?;
    for message in &batch.messages {
        println!("{} -> {}", message.user_sms_id, message.to.raw());
    }

    let response = client.send_batch_sms(&batch).await?;
    println!("id: {}, message: {}", response.id, response.message);

    let query = eskiz::DispatchQuery::new(
        client.get_user().await?.data.id,
        dispatch_id,
    );
    let status = client.get_dispatch_status(&query).await?;
    for total in status.data {
        println!("{}: {}", total.status, total.total);
    }

    Ok(())
}
