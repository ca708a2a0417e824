use std::io::IsTerminal;

use pascheck::Diagnostic;

const RED_BACKGROUND: &str = "\x1b[41m";
const WHITE_BACKGROUND: &str = "\x1b[47m";
const RESET: &str = "\x1b[0m";

/// Вывод результата проверки в терминал.
pub struct Presenter {
    color: bool,
}

impl Presenter {
    /// Цвет только в терминале и если не задан NO_COLOR.
    pub fn new(color: bool) -> Self {
        let color = color && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal();
        Self { color }
    }

    pub fn diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let text = diagnostic.to_string();
        if !self.color {
            return text;
        }
        text.replacen("Error:", &format!("{RED_BACKGROUND}Error:{RESET}"), 1)
    }

    pub fn success(&self) -> String {
        if self.color {
            format!("{WHITE_BACKGROUND} Success run {RESET}")
        } else {
            " Success run ".to_string()
        }
    }
}
