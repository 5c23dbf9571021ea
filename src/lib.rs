pub mod analysis;
pub mod chart;
pub mod device;
pub mod event;
pub mod lang;
pub mod series;
pub mod session;
pub mod settings;
pub mod timezone;

pub use analysis::{AnalysisConfig, DatePhrase, Element};
pub use device::{DeviceLink, HttpDeviceGateway, LinkStore, MemoryLinkStore};
pub use event::{IncomingEvent, Intent, SkillResponse};
pub use series::ReadingSeries;
pub use session::{SessionAttributes, SessionController, SessionState};
pub use settings::Settings;

/// Initialize logging (reads RUST_LOG env var).
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
