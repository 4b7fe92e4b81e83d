use std::io;

use eskiz::{Credentials, EskizClient, MessageText, RawPhoneNumber, SendSms};
use tracing_subscriber::EnvFilter;

fn required(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let email = required("ESKIZ_EMAIL")?;
    let password = required("ESKIZ_PASSWORD")?;
    let phone_raw = required("ESKIZ_PHONE")?;
    let message = std::env::var("ESKIZ_MESSAGE")
        .unwrap_or_else(|_| "Bu Eskiz dan test".to_owned());

    let client = EskizClient::builder().log_responses(true).build()?;
    let token = client
        .get_token(&Credentials::new(email, password)?)
        .await?;
    println!("token expired: {}", token.is_expired()?);

    let request = SendSms::new(RawPhoneNumber::new(phone_raw)?, MessageText::new(message)?);
    let response = client.send_sms(&request).await?;
    println!("id: {}, message: {}", response.id, response.message);

    let balance = client.get_limit().await?;
    println!("balance: {}", balance.data.balance);

    Ok(())
}
