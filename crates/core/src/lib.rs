pub mod config;
pub mod error;
pub mod logger;
pub mod series;

pub use config::{load_dotenv, Config, DisplayTimezone};
pub use error::*;
pub use logger::*;
pub use series::*;
