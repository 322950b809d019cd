use crate::boundary::Component;
use crate::error::RenderError;

/// Placeholder content of the app.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RootView;

impl RootView {
    pub const GREETING: &'static str = "Hello";
}

impl Component for RootView {
    type Output = &'static str;

    fn render(&self) -> Result<&'static str, RenderError> {
        Ok(Self::GREETING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_greeting() {
        assert_eq!(RootView.render(), Ok("Hello"));
        assert_eq!(RootView.name(), "RootView");
    }
}
