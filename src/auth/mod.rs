//! Authentication
//!
//! Drivers log in with a username and password. A successful login creates
//! a row in the `sessions` table and hands its random token to the browser in
//! an HTTP-only cookie. Every fleet route sits behind [`middleware::require_login`],
//! which resolves the cookie back to a driver or redirects to the login page.
//! The login form itself carries a [`csrf`] token.

pub mod password;
pub mod session;
pub mod middleware;
pub mod current_driver;
pub mod csrf;

pub use current_driver::CurrentDriver;
pub use middleware::{login_redirect, require_login};
