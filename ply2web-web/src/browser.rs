//! Launch the system browser

use std::process::{Command, Stdio};

/// Platform command that opens a URL
fn open_command(url: &str) -> Command {
    if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", "", url]);
        command
    } else if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(url);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(url);
        command
    }
}

/// Open `url` without waiting; failures are logged
pub fn open(url: &str) {
    let result = open_command(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    match result {
        Ok(_) => log::info!("opened browser at {}", url),
        Err(e) => log::warn!("could not open a browser at {}: {}", url, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_includes_url() {
        let command = open_command("http://localhost:38080/");
        assert!(command
            .get_args()
            .any(|a| a == "http://localhost:38080/"));
    }
}
