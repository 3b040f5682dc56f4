use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::domain::Message;
use crate::infrastructure::config::AssistantPrompts;
use crate::infrastructure::RetrievalAssistant;

pub const EXIT_COMMAND: &str = "/exit";

/// Line-oriented chat session. Prints the banner, then answers one line at a
/// time until [`EXIT_COMMAND`] or end of input. Returns the transcript.
pub async fn chat_loop<R, W>(
    assistant: &RetrievalAssistant,
    prompts: &AssistantPrompts,
    input: R,
    output: &mut W,
) -> std::io::Result<Vec<Message>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output
        .write_all(format!("{}\n\n{}\n\n", prompts.title, prompts.description).as_bytes())
        .await?;

    let mut lines = input.lines();
    let mut transcript: Vec<Message> = Vec::new();

    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let message = line.trim();
        if message == EXIT_COMMAND {
            break;
        }

        let reply = assistant.respond(message, &transcript).await;
        for turn in &reply {
            output.write_all(format!("\n{}\n\n", turn.content).as_bytes()).await?;
        }

        transcript.push(Message::user(message));
        transcript.extend(reply);
    }

    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(transcript)
}
