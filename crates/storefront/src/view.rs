//! Panel visibility for the storefront UI.
//!
//! The cart drawer, the menu and the newsletter dialog each have an open flag.
//! The flags are independent: opening one panel leaves the others as they are.
//! A [`ViewState`] is a plain value owned by whoever renders the UI; the HTTP
//! server keeps one per visitor session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Visibility of every panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub cart_open: bool,
    pub menu_open: bool,
    pub newsletter_open: bool,
}

/// A panel that can be opened or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Cart,
    Menu,
    Newsletter,
}

/// What to do with a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelAction {
    Open,
    Close,
    Toggle,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("unknown panel: {0}")]
    UnknownPanel(String),

    #[error("unknown panel action: {0}")]
    UnknownAction(String),
}

impl ViewState {
    #[must_use]
    pub const fn is_open(&self, panel: Panel) -> bool {
        match panel {
            Panel::Cart => self.cart_open,
            Panel::Menu => self.menu_open,
            Panel::Newsletter => self.newsletter_open,
        }
    }

    const fn flag_mut(&mut self, panel: Panel) -> &mut bool {
        match panel {
            Panel::Cart => &mut self.cart_open,
            Panel::Menu => &mut self.menu_open,
            Panel::Newsletter => &mut self.newsletter_open,
        }
    }

    pub const fn open(&mut self, panel: Panel) {
        *self.flag_mut(panel) = true;
    }

    pub const fn close(&mut self, panel: Panel) {
        *self.flag_mut(panel) = false;
    }

    pub const fn toggle(&mut self, panel: Panel) {
        let flag = self.flag_mut(panel);
        *flag = !*flag;
    }

    /// Apply `action` to `panel` and return whether the panel is now open.
    pub const fn apply(&mut self, panel: Panel, action: PanelAction) -> bool {
        match action {
            PanelAction::Open => self.open(panel),
            PanelAction::Close => self.close(panel),
            PanelAction::Toggle => self.toggle(panel),
        }
        self.is_open(panel)
    }
}

impl Panel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Menu => "menu",
            Self::Newsletter => "newsletter",
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Panel {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cart" => Ok(Self::Cart),
            "menu" => Ok(Self::Menu),
            "newsletter" => Ok(Self::Newsletter),
            other => Err(ViewError::UnknownPanel(other.to_string())),
        }
    }
}

impl FromStr for PanelAction {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "close" => Ok(Self::Close),
            "toggle" => Ok(Self::Toggle),
            other => Err(ViewError::UnknownAction(other.to_string())),
        }
    }
}
