use crate::models::session::LoginSurface;
use crate::session::SessionManager;

/// What a protected admin view should do, decided purely from session state.
/// The guard performs no mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session restore has not finished; show a placeholder.
    Loading,
    Render,
    ToLogin(LoginSurface),
    ToHome,
}

/// Gate for administrative views: render only once initialization has
/// completed and the visitor is an authenticated admin.
pub fn admin_route(session: &SessionManager) -> RouteDecision {
    if !session.is_ready() {
        return RouteDecision::Loading;
    }
    if !session.is_authenticated() {
        return RouteDecision::ToLogin(LoginSurface::Admin);
    }
    if !session.is_admin() {
        return RouteDecision::ToHome;
    }
    RouteDecision::Render
}
