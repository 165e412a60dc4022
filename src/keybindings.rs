use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::actions::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn alt(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::ALT)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Ordered key map. Earlier entries win, which lets menu navigation keys
/// shadow content keys only while the caller asks for them.
#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    entries: Vec<(Action, KeyCombo)>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn workspace_defaults() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(Quit, KeyCombo::ctrl('q'));
        kb.add(OpenMarketData, KeyCombo::alt(KeyCode::Char('1')));
        kb.add(OpenChart, KeyCombo::alt(KeyCode::Char('2')));
        kb.add(OpenLog, KeyCombo::alt(KeyCode::Char('3')));
        kb.add(OpenSecurity, KeyCombo::alt(KeyCode::Char('4')));
        kb.add(SaveLayout, KeyCombo::ctrl('s'));
        kb.add(ToggleLoadMenu, KeyCombo::ctrl('o'));
        kb.add(CloseFocused, KeyCombo::alt(KeyCode::Char('w')));
        kb.add(MinimizeFocused, KeyCombo::alt(KeyCode::Char('m')));
        kb.add(ToggleMaximizeFocused, KeyCombo::alt(KeyCode::Up));
        kb.add(ToggleMaximizeFocused, KeyCombo::alt(KeyCode::Char('x')));
        kb.add(RestoreLastMinimized, KeyCombo::alt(KeyCode::Char('r')));
        kb.add(CycleWindows, KeyCombo::alt(KeyCode::Char('n')));
        kb.add(CycleWindows, KeyCombo::plain(KeyCode::F(6)));
        kb.add(GroupWithNext, KeyCombo::alt(KeyCode::Char('g')));
        kb.add(Ungroup, KeyCombo::alt(KeyCode::Char('u')));
        kb.add(NextTab, KeyCombo::alt(KeyCode::Right));
        kb.add(PrevTab, KeyCombo::alt(KeyCode::Left));
        kb.add(MenuUp, KeyCombo::plain(KeyCode::Up));
        kb.add(MenuDown, KeyCombo::plain(KeyCode::Down));
        kb.add(MenuSelect, KeyCombo::plain(KeyCode::Enter));
        kb.add(MenuDelete, KeyCombo::plain(KeyCode::Delete));
        kb.add(Cancel, KeyCombo::plain(KeyCode::Esc));
        kb
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.entries.push((action, combo));
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.entries
            .iter()
            .any(|(a, combo)| *a == action && combo.matches(key))
    }

    /// First action bound to `key`. Menu navigation is only considered
    /// when `menu_open`, so plain arrows reach window content otherwise.
    pub fn action_for_key(&self, key: &KeyEvent, menu_open: bool) -> Option<Action> {
        self.entries
            .iter()
            .filter(|(action, _)| menu_open || !action.is_menu_navigation())
            .find(|(_, combo)| combo.matches(key))
            .map(|(action, _)| *action)
    }

    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(a, _)| *a == action)
            .map(|(_, combo)| combo.display())
            .collect()
    }

    /// `(action, combos)` in binding order, one row per action.
    pub fn help_entries(&self) -> Vec<(Action, Vec<String>)> {
        let mut rows: Vec<(Action, Vec<String>)> = Vec::new();
        for (action, combo) in &self.entries {
            match rows.iter_mut().find(|(a, _)| a == action) {
                Some((_, combos)) => combos.push(combo.display()),
                None => rows.push((*action, vec![combo.display()])),
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_quit() {
        let kb = KeyBindings::workspace_defaults();
        let ev = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(kb.matches(Action::Quit, &ev));
        assert_eq!(kb.action_for_key(&ev, false), Some(Action::Quit));
    }

    #[test]
    fn arrows_only_navigate_an_open_menu() {
        let kb = KeyBindings::workspace_defaults();
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(kb.action_for_key(&down, false), None);
        assert_eq!(kb.action_for_key(&down, true), Some(Action::MenuDown));
    }

    #[test]
    fn launchers_map_to_modules() {
        let kb = KeyBindings::workspace_defaults();
        let ev = KeyEvent::new(KeyCode::Char('3'), KeyModifiers::ALT);
        let action = kb.action_for_key(&ev, false).unwrap();
        assert_eq!(action.launches(), Some(crate::window::ContentKind::Log));
    }

    #[test]
    fn help_groups_combos_per_action() {
        let kb = KeyBindings::workspace_defaults();
        let rows = kb.help_entries();
        let (_, combos) = rows
            .iter()
            .find(|(a, _)| *a == Action::ToggleMaximizeFocused)
            .unwrap();
        assert_eq!(combos, &vec!["Alt+Up".to_string(), "Alt+X".to_string()]);
        assert_eq!(KeyCombo::ctrl('s').to_string(), "Ctrl+S");
    }
}
