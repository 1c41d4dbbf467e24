//! Best-effort detection of the desktop's light/dark preference.

use crate::core::config::data::ThemeMode;

/// Ask the OS which appearance it prefers. `None` when there is no hint.
pub fn detect_preferred_theme() -> Option<ThemeMode> {
    detect_via_os_hint()
}

/// `defaults read -g AppleInterfaceStyle` prints "Dark" in dark mode and fails
/// when the key is missing, which means light.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn theme_from_apple_interface_style(output: Option<&str>) -> ThemeMode {
    match output {
        Some(value) if value.to_ascii_lowercase().contains("dark") => ThemeMode::Dark,
        _ => ThemeMode::Light,
    }
}

/// GNOME 42+ reports 'prefer-dark' or 'default'.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn theme_from_color_scheme(output: &str) -> Option<ThemeMode> {
    let value = output.to_ascii_lowercase();
    if value.contains("prefer-dark") {
        Some(ThemeMode::Dark)
    } else if value.contains("default") || value.contains("prefer-light") {
        Some(ThemeMode::Light)
    } else {
        None
    }
}

/// Older GNOME themes carry "-dark" in the GTK theme name.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn theme_from_gtk_theme(output: &str) -> ThemeMode {
    if output.to_ascii_lowercase().contains("-dark") {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    }
}

/// `AppsUseLightTheme` is 0 for dark and 1 for light.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn theme_from_apps_use_light_theme(value: u32) -> ThemeMode {
    if value == 0 {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    }
}

#[cfg(any(target_os = "macos", target_os = "linux"))]
fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    let output = std::process::Command::new(program).args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).into_owned())
}

fn detect_via_os_hint() -> Option<ThemeMode> {
    #[cfg(target_os = "macos")]
    {
        let output = command_stdout("/usr/bin/defaults", &["read", "-g", "AppleInterfaceStyle"]);
        return Some(theme_from_apple_interface_style(output.as_deref()));
    }

    #[cfg(target_os = "windows")]
    {
        use winreg::enums::HKEY_CURRENT_USER;
        use winreg::RegKey;

        let personalize = RegKey::predef(HKEY_CURRENT_USER)
            .open_subkey("Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize")
            .ok()?;
        let value: u32 = personalize.get_value("AppsUseLightTheme").ok()?;
        return Some(theme_from_apps_use_light_theme(value));
    }

    #[cfg(target_os = "linux")]
    {
        let schema = "org.gnome.desktop.interface";
        if let Some(theme) = command_stdout("gsettings", &["get", schema, "color-scheme"])
            .as_deref()
            .and_then(theme_from_color_scheme)
        {
            return Some(theme);
        }
        command_stdout("gsettings", &["get", schema, "gtk-theme"])
            .as_deref()
            .map(theme_from_gtk_theme)
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        None
    }
}
