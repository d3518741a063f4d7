use console::style;
use termimad::MadSkin;

const BOT_NAME: &str = "Carlton";
const USER_NAME: &str = "You";

pub fn bot_says(message: &str) {
    println!("{}: {}", style(BOT_NAME).green().bright().bold(), message);
}

/// Prompt label for the main input line
pub fn user_prompt() -> String {
    format!("{}: ", style(USER_NAME).blue().bright())
}

/// Model output, unmodified, set off by blank lines
pub fn display_code(text: &str) {
    println!("\n{}\n", text);
}

pub fn display_markdown(text: &str) {
    let mut skin = MadSkin::default();
    skin.inline_code.set_fg(termimad::crossterm::style::Color::Yellow);
    println!();
    skin.print_text(text);
    println!();
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), style(message).red());
}

pub fn clear_screen() {
    let term = console::Term::stdout();
    if term.is_term() {
        term.clear_screen().ok();
    }
}
