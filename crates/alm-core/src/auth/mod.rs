//! Session establishment.
//!
//! ALM sessions are cookie based. A client asks whether it is already
//! authenticated; if not, the 401 answer names an authentication point,
//! where Basic credentials are exchanged for session cookies.

mod challenge;
mod establisher;

pub use challenge::{AuthPoint, AuthStatus};
pub use establisher::{IS_AUTHENTICATED_PATH, LOGOUT_PATH, LoginOutcome, SessionEstablisher};
