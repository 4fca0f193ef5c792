//! Ports - Interfaces for external dependencies
//!
//! One port per data source plus the language model. Adapters in the
//! infrastructure layer implement these against the real APIs.

mod calendar_port;
mod email_port;
mod inference_port;
mod news_port;
mod todo_port;
mod traffic_port;
mod weather_port;

pub use calendar_port::CalendarPort;
pub use email_port::EmailPort;
pub use inference_port::{InferencePort, InferenceResult};
pub use news_port::NewsPort;
pub use todo_port::TodoPort;
pub use traffic_port::TrafficPort;
pub use weather_port::WeatherPort;

#[cfg(test)]
pub use calendar_port::MockCalendarPort;
#[cfg(test)]
pub use email_port::MockEmailPort;
#[cfg(test)]
pub use inference_port::MockInferencePort;
#[cfg(test)]
pub use news_port::MockNewsPort;
#[cfg(test)]
pub use todo_port::MockTodoPort;
#[cfg(test)]
pub use traffic_port::MockTrafficPort;
#[cfg(test)]
pub use weather_port::MockWeatherPort;
