//! Navigation targets returned by the controllers.

/// A screen the front-end should show next.
///
/// Controllers never drive navigation themselves; they return the target and
/// the presentation layer decides how to get there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Launch screen shown while the stored session is checked.
    Splash,
    /// Sign-in form.
    Login,
    /// Admin collection view.
    Home,
    /// Create/edit form for a single admin.
    Register,
    /// Signed-in admin's cached profile.
    Profile,
}

impl Route {
    /// Screen name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Splash => "splash",
            Self::Login => "login",
            Self::Home => "home",
            Self::Register => "register",
            Self::Profile => "profile",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
