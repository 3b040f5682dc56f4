use health_assistant::infrastructure::{telemetry, terminal, AppConfig, RetrievalAssistant};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing("chatbot=info,health_assistant=warn");

    let config = AppConfig::load()?;
    let assistant = RetrievalAssistant::from_config(&config);

    let mut stdout = tokio::io::stdout();
    terminal::chat_loop(
        &assistant,
        &config.prompts.assistant,
        BufReader::new(tokio::io::stdin()),
        &mut stdout,
    )
    .await?;

    Ok(())
}
