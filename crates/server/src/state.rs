use std::sync::Arc;

use helpdesk_core::{
    Authenticator, Config, ResponseService, ResponseStore, SanitizedConfig, TicketService,
    TicketStore, UserService, UserStore,
};

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    ticket_store: Arc<dyn TicketStore>,
    tickets: TicketService,
    responses: ResponseService,
    users: UserService,
}

impl AppState {
    /// Wire the services over the given stores.
    pub fn new(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
        ticket_store: Arc<dyn TicketStore>,
        response_store: Arc<dyn ResponseStore>,
        user_store: Arc<dyn UserStore>,
    ) -> Self {
        let tickets = TicketService::new(Arc::clone(&ticket_store), Arc::clone(&user_store));
        let responses = ResponseService::new(
            response_store,
            Arc::clone(&ticket_store),
            Arc::clone(&user_store),
        );
        let users = UserService::new(user_store);

        Self {
            config,
            authenticator,
            ticket_store,
            tickets,
            responses,
            users,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    /// Raw ticket store, used for gauge collection.
    pub fn ticket_store(&self) -> &dyn TicketStore {
        self.ticket_store.as_ref()
    }

    pub fn tickets(&self) -> &TicketService {
        &self.tickets
    }

    pub fn responses(&self) -> &ResponseService {
        &self.responses
    }

    pub fn users(&self) -> &UserService {
        &self.users
    }
}
