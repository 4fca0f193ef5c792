//! Infrastructure adapters
//!
//! Adapters connect application ports to the integration crates.

mod anthropic_inference_adapter;
mod gmail_email_adapter;
mod google_calendar_adapter;
mod news_adapter;
mod todoist_adapter;
mod traffic_adapter;
mod weather_adapter;

pub use anthropic_inference_adapter::AnthropicInferenceAdapter;
pub use gmail_email_adapter::GmailEmailAdapter;
pub use google_calendar_adapter::GoogleCalendarAdapter;
pub use news_adapter::NewsAdapter;
pub use todoist_adapter::TodoistAdapter;
pub use traffic_adapter::TrafficAdapter;
pub use weather_adapter::WeatherAdapter;
