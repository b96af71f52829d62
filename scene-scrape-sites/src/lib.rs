pub mod avbase;
pub mod client;
pub mod config;
pub mod dlgetchu;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod site;

pub use avbase::AvBase;
pub use client::{PageClient, TransportProfile};
pub use config::FetchConfig;
pub use dlgetchu::DlGetchu;
pub use error::ScrapeError;
pub use logging::init_logging;
pub use protocol::{Response, run};
pub use site::{SiteScraper, resolve_code};
