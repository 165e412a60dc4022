use std::fmt;

use crate::window::ContentKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    // Module launchers
    OpenMarketData,
    OpenChart,
    OpenLog,
    OpenSecurity,
    // Layouts
    SaveLayout,
    ToggleLoadMenu,
    // Focused surface
    CloseFocused,
    MinimizeFocused,
    ToggleMaximizeFocused,
    RestoreLastMinimized,
    CycleWindows,
    // Tab groups
    GroupWithNext,
    Ungroup,
    NextTab,
    PrevTab,
    // Load menu navigation
    MenuUp,
    MenuDown,
    MenuSelect,
    MenuDelete,
    /// Abort a drag or resize, or close the load menu.
    Cancel,
}

impl Action {
    /// Module opened by a launcher action.
    pub fn launches(self) -> Option<ContentKind> {
        match self {
            Action::OpenMarketData => Some(ContentKind::MarketData),
            Action::OpenChart => Some(ContentKind::Chart),
            Action::OpenLog => Some(ContentKind::Log),
            Action::OpenSecurity => Some(ContentKind::Security),
            _ => None,
        }
    }

    /// Actions that only apply while the load menu is open.
    pub fn is_menu_navigation(self) -> bool {
        matches!(
            self,
            Action::MenuUp | Action::MenuDown | Action::MenuSelect | Action::MenuDelete
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::OpenMarketData => "Open Market Data",
            Action::OpenChart => "Open Chart",
            Action::OpenLog => "Open Log Viewer",
            Action::OpenSecurity => "Open Security",
            Action::SaveLayout => "Save layout",
            Action::ToggleLoadMenu => "Load layout",
            Action::CloseFocused => "Close focused window",
            Action::MinimizeFocused => "Minimize focused window",
            Action::ToggleMaximizeFocused => "Maximize / restore focused window",
            Action::RestoreLastMinimized => "Restore last minimized window",
            Action::CycleWindows => "Cycle windows",
            Action::GroupWithNext => "Group focused window with the one behind it",
            Action::Ungroup => "Ungroup focused tab group",
            Action::NextTab => "Next tab",
            Action::PrevTab => "Previous tab",
            Action::MenuUp => "Menu up",
            Action::MenuDown => "Menu down",
            Action::MenuSelect => "Menu select",
            Action::MenuDelete => "Delete selected layout",
            Action::Cancel => "Cancel drag / close menu",
        };
        write!(f, "{s}")
    }
}
