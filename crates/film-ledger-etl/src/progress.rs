//! Terminal progress bars for batch collection.

use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{msg:>14} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})";

/// A bar over `len` items, or a hidden one when disabled or when stderr is
/// not a terminal.
pub fn batch_bar(len: u64, label: &str, enabled: bool) -> ProgressBar {
    if !enabled || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message(label.to_string());
    bar
}
