/// Router Module Index
///
/// Routes are grouped by the access class the route gate assigns to their
/// paths. The gate runs in front of all three, so a route's module must
/// agree with `gate::classify` for its path.

/// Marketing pages, the contact form, health and the public API.
pub mod public;

/// Login, signup and password-reset flows. Signed-in visitors are redirected
/// to their dashboard before reaching these handlers.
pub mod auth_only;

/// The dashboard surface. Requires a valid session.
pub mod protected;
