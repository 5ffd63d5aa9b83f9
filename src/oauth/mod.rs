pub mod authorize;
pub mod callback;
pub mod flow;
pub mod state;
pub mod token;

pub use authorize::{build_authorization_request, AuthorizationRequest};
pub use callback::{listen_for_callback, CallbackParams};
pub use flow::run_login_flow;
pub use state::generate_state;
pub use token::TokenClient;
