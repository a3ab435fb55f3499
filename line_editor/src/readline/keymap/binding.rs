// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter, Result},
          sync::Arc};

use super::WidgetName;
use crate::{InlineString, LineReader};

/// Host supplied operation. Returns `false` to ring the bell.
pub type InlineWidget = Arc<dyn Fn(&mut LineReader) -> bool + Send + Sync>;

/// What a key sequence resolves to.
#[derive(Clone)]
pub enum Binding {
    /// Named widget: a [`WidgetName`] or a name registered with
    /// [`LineReader::register_widget`].
    Widget(InlineString),
    /// Keys replayed as if the user typed them.
    Macro(String),
    Inline(InlineWidget),
}

impl Binding {
    #[must_use]
    pub fn widget(name: WidgetName) -> Self {
        let name: &'static str = name.into();
        Binding::Widget(name.into())
    }

    #[must_use]
    pub fn macro_keys(keys: impl Into<String>) -> Self { Binding::Macro(keys.into()) }

    pub fn inline(widget: impl Fn(&mut LineReader) -> bool + Send + Sync + 'static) -> Self {
        Binding::Inline(Arc::new(widget))
    }

    /// Name of the widget this binding refers to, if it is a named widget.
    #[must_use]
    pub fn widget_name(&self) -> Option<&str> {
        match self {
            Binding::Widget(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// The built in widget this binding refers to, if any.
    #[must_use]
    pub fn builtin(&self) -> Option<WidgetName> {
        self.widget_name().and_then(|it| it.parse().ok())
    }

    #[must_use]
    pub fn is(&self, name: WidgetName) -> bool { self.builtin() == Some(name) }
}

impl From<WidgetName> for Binding {
    fn from(name: WidgetName) -> Self { Binding::widget(name) }
}

impl Debug for Binding {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Binding::Widget(name) => write!(f, "Widget({name})"),
            Binding::Macro(keys) => write!(f, "Macro({keys:?})"),
            Binding::Inline(_) => write!(f, "Inline(..)"),
        }
    }
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Binding::Widget(lhs), Binding::Widget(rhs)) => lhs == rhs,
            (Binding::Macro(lhs), Binding::Macro(rhs)) => lhs == rhs,
            (Binding::Inline(lhs), Binding::Inline(rhs)) => Arc::ptr_eq(lhs, rhs),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_widget_binding() {
        let it = Binding::widget(WidgetName::KillLine);
        assert_eq!(it.widget_name(), Some("kill-line"));
        assert!(it.is(WidgetName::KillLine));
        assert_eq!(Binding::Widget("my-widget".into()).builtin(), None);
    }

    #[test]
    fn test_inline_equality_is_identity() {
        let lhs = Binding::inline(|_| true);
        let rhs = Binding::inline(|_| true);
        assert_eq!(lhs, lhs.clone());
        assert!(lhs != rhs);
        assert_eq!(format!("{lhs:?}"), "Inline(..)");
    }
}
