mod gradio;

pub use gradio::{parse_event_stream, space_host, GradioSpaceClient};
