use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Create a ticking spinner for the "working…" indicator.
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_spinner() {
        let pb = create_spinner("Sending to Dropbox...");
        assert_eq!(pb.message(), "Sending to Dropbox...");
        pb.finish_and_clear();
        assert!(pb.is_finished());
    }

    #[test]
    fn test_create_spinner_empty_message() {
        let pb = create_spinner("");
        assert_eq!(pb.message(), "");
        pb.finish_and_clear();
    }
}
