//! Tastiere reply del bot
//!
//! Le etichette sono costanti condivise con il dispatcher dei comandi:
//! il confronto è sul testo esatto del bottone premuto.

use serde::Serialize;

// Bottoni del menu utente
pub const BTN_MY_STATS: &str = "📊 My stats";
pub const BTN_HELP: &str = "❓ Help";
pub const BTN_SUPPORT: &str = "📞 Support";
pub const BTN_ABOUT: &str = "🎯 About";
pub const BTN_RECENT: &str = "🔄 Recent downloads";

// Bottoni del menu amministratore
pub const BTN_ADMIN_STATS: &str = "📊 Overall stats";
pub const BTN_ADMIN_USERS: &str = "👥 Top users";
pub const BTN_ADMIN_REPORT: &str = "📈 Download report";
pub const BTN_BACK: &str = "🔙 Back";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct KeyboardButton {
    pub text: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReplyKeyboard {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    pub resize_keyboard: bool,
    pub one_time_keyboard: bool,
}

fn row(labels: &[&str]) -> Vec<KeyboardButton> {
    labels
        .iter()
        .map(|label| KeyboardButton {
            text: (*label).to_string(),
        })
        .collect()
}

pub fn main_keyboard() -> ReplyKeyboard {
    ReplyKeyboard {
        keyboard: vec![
            row(&[BTN_MY_STATS, BTN_HELP]),
            row(&[BTN_SUPPORT, BTN_ABOUT]),
            row(&[BTN_RECENT]),
        ],
        resize_keyboard: true,
        one_time_keyboard: false,
    }
}

pub fn admin_keyboard() -> ReplyKeyboard {
    ReplyKeyboard {
        keyboard: vec![
            row(&[BTN_ADMIN_STATS, BTN_ADMIN_USERS]),
            row(&[BTN_ADMIN_REPORT, BTN_BACK]),
        ],
        resize_keyboard: true,
        one_time_keyboard: false,
    }
}
