mod anthropic_client;
mod api_key;
mod gemini_client;
mod mock_text_generator;

pub use anthropic_client::*;
pub use api_key::*;
pub use gemini_client::*;
pub use mock_text_generator::*;
