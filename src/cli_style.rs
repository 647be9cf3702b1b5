//! Terminal styling for the console chat and the command line help.

use crate::catalog::Song;
use crate::chat::GOODBYE_REPLY;
use crate::mood::MoodLabel;
use crate::user::HistoryEntry;
use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Color as CtColor, Stylize};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Clap Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_styles() -> Styles {
    Styles::styled()
        .usage(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Magenta))),
        )
        .header(
            Style::new()
                .bold()
                .underline()
                .fg_color(Some(Color::Ansi(AnsiColor::Magenta))),
        )
        .literal(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
        )
        .invalid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .error(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .valid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Color Palette
// ═══════════════════════════════════════════════════════════════════════════════

pub mod colors {
    use crossterm::style::Color;

    pub const MAGENTA: Color = Color::Rgb {
        r: 236,
        g: 72,
        b: 153,
    };
    pub const PURPLE: Color = Color::Rgb {
        r: 168,
        g: 85,
        b: 247,
    };
    pub const CYAN: Color = Color::Rgb {
        r: 34,
        g: 211,
        b: 238,
    };
    pub const BLUE: Color = Color::Rgb {
        r: 96,
        g: 165,
        b: 250,
    };
    pub const GREEN: Color = Color::Rgb {
        r: 74,
        g: 222,
        b: 128,
    };
    pub const YELLOW: Color = Color::Rgb {
        r: 250,
        g: 204,
        b: 21,
    };
    pub const ORANGE: Color = Color::Rgb {
        r: 251,
        g: 146,
        b: 60,
    };
    pub const RED: Color = Color::Rgb {
        r: 248,
        g: 113,
        b: 113,
    };
    pub const DIM: Color = Color::Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
    pub const WHITE: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
}

pub fn mood_color(mood: MoodLabel) -> CtColor {
    match mood {
        MoodLabel::Happy => colors::YELLOW,
        MoodLabel::Calm => colors::CYAN,
        MoodLabel::Sad => colors::BLUE,
        MoodLabel::Angry => colors::RED,
        MoodLabel::Neutral => colors::WHITE,
        MoodLabel::Fear => colors::PURPLE,
        MoodLabel::Surprise => colors::ORANGE,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Box Drawing Characters
// ═══════════════════════════════════════════════════════════════════════════════

pub mod box_chars {
    pub const DOUBLE_TOP_LEFT: &str = "╔";
    pub const DOUBLE_TOP_RIGHT: &str = "╗";
    pub const DOUBLE_BOTTOM_LEFT: &str = "╚";
    pub const DOUBLE_BOTTOM_RIGHT: &str = "╝";
    pub const DOUBLE_HORIZONTAL: &str = "═";
    pub const DOUBLE_VERTICAL: &str = "║";

    pub const SINGLE_HORIZONTAL: &str = "─";
    pub const SINGLE_VERTICAL: &str = "│";

    pub const ROUND_TOP_LEFT: &str = "╭";
    pub const ROUND_TOP_RIGHT: &str = "╮";
    pub const ROUND_BOTTOM_LEFT: &str = "╰";
    pub const ROUND_BOTTOM_RIGHT: &str = "╯";

    pub const T_LEFT: &str = "├";
    pub const T_RIGHT: &str = "┤";
    pub const T_TOP: &str = "┬";
    pub const T_BOTTOM: &str = "┴";
    pub const CROSS: &str = "┼";

    pub const BULLET_EMPTY: &str = "○";
    pub const CHECK: &str = "✓";
    pub const CROSS_MARK: &str = "✗";
}

// ═══════════════════════════════════════════════════════════════════════════════
// Banner
// ═══════════════════════════════════════════════════════════════════════════════

const PANEL_WIDTH: usize = 60;

pub fn print_banner() {
    let title = "🎶 Emotion-Based Song Recommender";
    let padding = PANEL_WIDTH.saturating_sub(title.width()) / 2;

    println!(
        "{}{}{}",
        box_chars::DOUBLE_TOP_LEFT.with(colors::MAGENTA),
        box_chars::DOUBLE_HORIZONTAL
            .repeat(PANEL_WIDTH)
            .with(colors::MAGENTA),
        box_chars::DOUBLE_TOP_RIGHT.with(colors::MAGENTA)
    );
    println!(
        "{}{}{}{}{}",
        box_chars::DOUBLE_VERTICAL.with(colors::MAGENTA),
        " ".repeat(padding),
        title.with(colors::WHITE).bold(),
        " ".repeat(PANEL_WIDTH.saturating_sub(padding + title.width())),
        box_chars::DOUBLE_VERTICAL.with(colors::MAGENTA)
    );
    println!(
        "{}{}{}",
        box_chars::DOUBLE_BOTTOM_LEFT.with(colors::MAGENTA),
        box_chars::DOUBLE_HORIZONTAL
            .repeat(PANEL_WIDTH)
            .with(colors::MAGENTA),
        box_chars::DOUBLE_BOTTOM_RIGHT.with(colors::MAGENTA)
    );
    println!();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Status Indicators
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_success(message: &str) {
    println!(
        " {} {}",
        box_chars::CHECK.to_string().with(colors::GREEN).bold(),
        message.with(colors::GREEN).bold()
    );
}

pub fn print_error(message: &str) {
    println!(
        " {} {}",
        box_chars::CROSS_MARK.to_string().with(colors::RED).bold(),
        message.with(colors::RED).bold()
    );
}

pub fn print_warning(message: &str) {
    println!(
        " {} {}",
        "❗".with(colors::ORANGE).bold(),
        message.with(colors::ORANGE)
    );
}

/// A line spoken by the chatbot.
pub fn print_bot(message: &str) {
    println!("{} {}", "🤖 Chatbot:".with(colors::DIM), message.with(colors::DIM));
}

pub fn print_detected_mood(mood: MoodLabel) {
    println!(
        "{} {}{}",
        "🤖 Chatbot: I detect you're feeling".bold(),
        mood.as_str()
            .to_uppercase()
            .with(mood_color(mood))
            .bold(),
        "...".bold()
    );
}

pub fn print_separator() {
    println!("{}", box_chars::SINGLE_HORIZONTAL.repeat(50).with(colors::DIM));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Song Panel
// ═══════════════════════════════════════════════════════════════════════════════

fn print_panel_row(label: &str, value: &str, color: CtColor) {
    let content_width = label.width() + 1 + value.width();
    print!("{}  ", box_chars::SINGLE_VERTICAL.with(colors::DIM));
    print!("{} {}", label.with(color).bold(), value.with(color));
    print!(
        "{}",
        " ".repeat(PANEL_WIDTH.saturating_sub(content_width + 2))
    );
    println!("{}", box_chars::SINGLE_VERTICAL.with(colors::DIM));
}

fn print_panel_spacer() {
    println!(
        "{}{}{}",
        box_chars::SINGLE_VERTICAL.with(colors::DIM),
        " ".repeat(PANEL_WIDTH),
        box_chars::SINGLE_VERTICAL.with(colors::DIM)
    );
}

pub fn print_song_panel(song: &Song) {
    let title = " ✨ Your Song Recommendation ";
    print!("{}", box_chars::ROUND_TOP_LEFT.with(colors::DIM));
    print!("{}", title.with(colors::WHITE).bold());
    print!(
        "{}",
        box_chars::SINGLE_HORIZONTAL
            .repeat(PANEL_WIDTH.saturating_sub(title.width()))
            .with(colors::DIM)
    );
    println!("{}", box_chars::ROUND_TOP_RIGHT.with(colors::DIM));

    print_panel_spacer();
    print_panel_row("🎶 Title: ", &song.title, colors::GREEN);
    print_panel_row("🎤 Artist:", &song.artists, colors::BLUE);
    print_panel_row("🔗 Link:  ", &song.link, colors::CYAN);
    print_panel_spacer();

    print!("{}", box_chars::ROUND_BOTTOM_LEFT.with(colors::DIM));
    print!(
        "{}",
        box_chars::SINGLE_HORIZONTAL
            .repeat(PANEL_WIDTH)
            .with(colors::DIM)
    );
    println!("{}", box_chars::ROUND_BOTTOM_RIGHT.with(colors::DIM));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Table Display
// ═══════════════════════════════════════════════════════════════════════════════

pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl TableBuilder {
    pub fn new(headers: Vec<&str>) -> Self {
        let col_widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
        TableBuilder {
            headers: headers.into_iter().map(String::from).collect(),
            rows: Vec::new(),
            col_widths,
        }
    }

    pub fn add_row(&mut self, row: Vec<&str>) {
        for (i, cell) in row.iter().enumerate() {
            if i < self.col_widths.len() {
                self.col_widths[i] = self.col_widths[i].max(cell.width());
            }
        }
        self.rows.push(row.into_iter().map(String::from).collect());
    }

    fn print_border(&self, left: &str, junction: &str, right: &str) {
        print!("{}", left.with(colors::PURPLE));
        for (i, width) in self.col_widths.iter().enumerate() {
            print!(
                "{}",
                box_chars::SINGLE_HORIZONTAL
                    .repeat(width + 2)
                    .with(colors::PURPLE)
            );
            if i + 1 < self.col_widths.len() {
                print!("{}", junction.with(colors::PURPLE));
            }
        }
        println!("{}", right.with(colors::PURPLE));
    }

    fn print_cells(&self, cells: &[String], header: bool) {
        print!("{}", box_chars::SINGLE_VERTICAL.with(colors::PURPLE));
        for (i, cell) in cells.iter().enumerate() {
            let width = self.col_widths.get(i).copied().unwrap_or(0);
            let padding = " ".repeat(width.saturating_sub(cell.width()));
            if header {
                print!(" {}{} ", cell.clone().with(colors::PURPLE).bold(), padding);
            } else {
                print!(" {}{} ", cell.clone().with(colors::WHITE), padding);
            }
            print!("{}", box_chars::SINGLE_VERTICAL.with(colors::PURPLE));
        }
        println!();
    }

    pub fn print(&self) {
        self.print_border(
            box_chars::ROUND_TOP_LEFT,
            box_chars::T_TOP,
            box_chars::ROUND_TOP_RIGHT,
        );
        self.print_cells(&self.headers, true);
        self.print_border(box_chars::T_LEFT, box_chars::CROSS, box_chars::T_RIGHT);
        for row in &self.rows {
            self.print_cells(row, false);
        }
        self.print_border(
            box_chars::ROUND_BOTTOM_LEFT,
            box_chars::T_BOTTOM,
            box_chars::ROUND_BOTTOM_RIGHT,
        );
    }
}

pub fn print_history(history: &[HistoryEntry]) {
    if history.is_empty() {
        println!(
            "  {} {}",
            box_chars::BULLET_EMPTY.with(colors::DIM),
            "You haven't requested any songs yet!"
                .with(colors::DIM)
                .attribute(Attribute::Italic)
        );
        return;
    }

    let mut table = TableBuilder::new(vec!["Time", "You said", "Mood", "Song", "Artist"]);
    for entry in history {
        table.add_row(vec![
            entry.time.as_str(),
            entry.input_snippet.as_str(),
            entry.mood.as_str(),
            entry.song_title.as_str(),
            entry.artists.as_str(),
        ]);
    }
    table.print();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Prompt Styling
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_prompt() -> String {
    format!("{} ", "You:".with(colors::MAGENTA).bold())
}

pub fn get_auth_prompt(prompt: &str) -> String {
    format!("{} ", format!("> {}:", prompt).with(colors::YELLOW).bold())
}

pub fn print_goodbye() {
    println!();
    println!(
        "{}",
        format!("👋 Chatbot: {}", GOODBYE_REPLY).with(colors::DIM)
    );
    let _ = io::stdout().flush();
}
