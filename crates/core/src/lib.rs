pub mod config;
pub mod dispatcher;
pub mod metrics;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, CorsConfig,
    SanitizedConfig, ServerConfig,
};
pub use dispatcher::{
    AttendantId, AttendantLoad, DispatchError, Dispatcher, ParseEnumError, Ticket, TicketFilter,
    TicketPatch, TicketStatus, TicketType, ATTENDANT_CAPACITY,
};
