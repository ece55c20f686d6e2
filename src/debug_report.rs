use speedtags::{ClauseSummary, ParseDetails, SpeedError};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(cell: &str, details: &ParseDetails, color: bool) {
    let palette = ansi::Palette::new(color);
    print_header(cell, &palette);

    println!("\n{}", palette.paint("━━━ Clauses ━━━", ansi::GRAY));
    for (idx, clause) in details.clauses.iter().enumerate() {
        print_clause(idx, clause, &palette);
    }

    println!("\n{}", palette.paint("━━━ Tags ━━━", ansi::GRAY));
    for (key, value) in &details.tags {
        println!("  {} {}", palette.paint(format!("{key}="), ansi::BLUE), palette.bold(palette.paint(value, ansi::GREEN)));
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!("  Total: {}", palette.paint(format!("{:?}", details.elapsed), ansi::GREEN));
    println!();
}

pub fn print_failure(cell: &str, err: &SpeedError, color: bool) {
    let palette = ansi::Palette::new(color);
    print_header(cell, &palette);

    println!("\n{}", palette.paint("━━━ Error ━━━", ansi::GRAY));
    match err {
        SpeedError::Syntax { fragment, message } => {
            println!("  {} {}", palette.bold(palette.paint("syntax:", ansi::RED)), message);
            println!("  {} {}", palette.dim("at:"), palette.paint(format!("\"{fragment}\""), ansi::YELLOW));
        }
        SpeedError::Semantic { message } => {
            println!("  {} {}", palette.bold(palette.paint("semantic:", ansi::RED)), message);
        }
    }
    println!("\n{}", palette.dim("  Tip: Set RUST_LOG=speedtags=trace to see every production attempt"));
    println!();
}

fn print_header(cell: &str, palette: &ansi::Palette) {
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Compiling: \"{}\"", cell), ansi::CYAN)));
}

fn print_clause(idx: usize, clause: &ClauseSummary, palette: &ansi::Palette) {
    println!(
        "  {} {} {} {}",
        palette.paint(format!("[{}]", idx), ansi::GRAY),
        palette.bold(&clause.text),
        palette.dim("│ production:"),
        palette.paint(&clause.production, ansi::CYAN),
    );
    for (key, value) in &clause.fragment {
        println!("      {} {}", palette.paint(format!("{key}="), ansi::BLUE), palette.paint(value, ansi::YELLOW));
    }
}
