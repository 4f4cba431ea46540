use std::fmt;

/// Render decision for one button. Recomputed on every render, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ButtonView {
    code: String,
    visible: bool,
    enabled: bool,
    disabled_click: bool,
    loading: bool,
}

impl ButtonView {
    pub(crate) fn new(
        code: impl Into<String>,
        visible: bool,
        enabled: bool,
        disabled_click: bool,
        loading: bool,
    ) -> Self {
        Self {
            code: code.into(),
            visible,
            enabled,
            disabled_click,
            loading,
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the click lock is currently held.
    #[must_use]
    pub fn disabled_click(&self) -> bool {
        self.disabled_click
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading
    }
}

impl fmt::Display for ButtonView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: visible={} enabled={}",
            self.code, self.visible, self.enabled
        )?;
        if self.loading {
            write!(f, " (loading)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let view = ButtonView::new("save", true, false, true, true);
        assert_eq!(view.code(), "save");
        assert!(view.visible());
        assert!(!view.enabled());
        assert!(view.disabled_click());
        assert!(view.loading());
    }

    #[test]
    fn display() {
        let idle = ButtonView::new("delete", false, true, false, false);
        assert_eq!(idle.to_string(), "delete: visible=false enabled=true");
        let busy = ButtonView::new("save", true, false, true, true);
        assert_eq!(busy.to_string(), "save: visible=true enabled=false (loading)");
    }
}
