//! The embedding application's side of the contract.
//!
//! Each method stands in for one UI collaborator: the loading indicator, the
//! alert dialog, the router, the locale service, and the post-login redirect
//! store. Implementations are expected to be cheap and non-blocking.

pub trait Host {
    /// Make the loading indicator visible. Called only on the idle-to-busy edge.
    fn show_loading(&self);

    /// Hide the loading indicator. Called only on the busy-to-idle edge.
    fn hide_loading(&self);

    fn alert(&self, message: &str);

    fn push_route(&self, path: &str);

    /// Active locale code, e.g. `en` or `zh`. Read on every request.
    fn language(&self) -> String;

    /// Full URL of the page currently shown.
    fn current_url(&self) -> String;

    /// Remember where to return after the user logs in again.
    fn save_redirect_url(&self, url: &str);
}
