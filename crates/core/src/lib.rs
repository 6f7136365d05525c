pub mod auth;
pub mod config;
mod db;
pub mod error;
pub mod metrics;
pub mod pagination;
pub mod response;
pub mod ticket;
pub mod user;
pub mod validation;

pub use auth::{
    create_authenticator, AuthError, AuthRequest, Authenticator, Identity, NoneAuthenticator,
    TokenAuthenticator,
};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthConfig, AuthMethod, Config,
    ConfigError, DatabaseConfig, LoggingConfig, SanitizedConfig, ServerConfig, TicketsConfig,
    TokenGrant,
};
pub use error::{Resource, ServiceError, StoreError};
pub use pagination::{Page, PageRequest};
pub use response::{
    NewResponse, Response, ResponseService, ResponseStore, SqliteResponseStore,
};
pub use ticket::{
    NewTicket, SqliteTicketStore, Ticket, TicketChanges, TicketFilter, TicketQuery,
    TicketService, TicketStatus, TicketStore, TicketValidator,
};
pub use user::{NewUser, SqliteUserStore, User, UserService, UserStore};
pub use validation::FieldErrors;
