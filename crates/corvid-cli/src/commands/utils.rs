//! Shared helpers for command implementations.

/// Open `url` in the default browser.
///
/// Failure to open is reported as a warning, never an error; the server is
/// reachable either way.
pub fn open_browser(url: &str) {
    #[cfg(target_os = "macos")]
    let result = std::process::Command::new("open").arg(url).spawn();

    #[cfg(target_os = "windows")]
    let result = std::process::Command::new("cmd")
        .args(["/C", "start", url])
        .spawn();

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let result = std::process::Command::new("xdg-open").arg(url).spawn();

    if let Err(e) = result {
        crate::ui::warning(&format!("Could not open browser: {}", e));
    }
}
