use datalis_api::{Client, DatalisApiError, Request, DEFAULT_BACKEND_URL};
use secrecy::SecretString;

#[tokio::main]
pub async fn main() -> Result<(), DatalisApiError> {
    let client = Client::new(DEFAULT_BACKEND_URL, || {
        Some(SecretString::from("access_token".to_string()))
    });

    let req = Request::workbenches().with_company("company_id").list();

    let _res = client.send(req).await?;
    Ok(())
}
