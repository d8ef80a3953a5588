use anyhow::Result;
use datalis::App;
use datalis_auth::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::new()?;
    settings.validate().map_err(anyhow::Error::msg)?;

    // Logging is initialized in App::run()
    App::new(settings).run().await
}
