//! English menu strings.

use jrpg_core::StringsOracle;

/// Built-in English localization. Resources map menu item ids to display
/// labels, in menu order.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnglishStrings;

impl EnglishStrings {
    pub fn new() -> Self {
        Self
    }
}

fn table(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(id, label)| (id.to_string(), label.to_string()))
        .collect()
}

impl StringsOracle for EnglishStrings {
    fn strings(&self, resource: &str) -> Option<Vec<(String, String)>> {
        match resource {
            "main_menu" => Some(table(&[
                ("new_game", "New game"),
                ("load_game", "Load game"),
                ("exit", "Exit"),
            ])),
            "load_menu" => Some(table(&[
                ("slot_1", "Slot 1"),
                ("slot_2", "Slot 2"),
                ("slot_3", "Slot 3"),
                ("back", "Back"),
            ])),
            "pause_menu" => Some(table(&[
                ("resume", "Resume"),
                ("save_game", "Save game"),
                ("main_menu", "Main menu"),
            ])),
            "trader_greeting" => Some(table(&[("greeting", "Have a look at my wares!")])),
            "wizard_greeting" => Some(table(&[(
                "greeting",
                "Knowledge has its price, friend.",
            )])),
            _ => None,
        }
    }
}
