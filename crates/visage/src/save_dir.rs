//! Default save folder lookup.

use std::env;
use std::path::PathBuf;

use visage_save::Flavor;

/// Folder name of the game under `Documents/My Games`.
pub const fn game_folder(flavor: Flavor) -> &'static str {
    match flavor {
        Flavor::SkyrimSe => "Skyrim Special Edition",
        Flavor::Fallout4 => "Fallout4",
    }
}

/// Best-effort path of the game's save folder, or an empty string.
///
/// Looks under the user profile (`USERPROFILE`, then `HOME`) for
/// `Documents/My Games/<game>/Saves`. Never fails.
pub fn default_save_dir(flavor: Flavor) -> String {
    let Some(profile) = env::var_os("USERPROFILE")
        .or_else(|| env::var_os("HOME"))
        .filter(|p| !p.is_empty())
    else {
        return String::new();
    };

    let path: PathBuf = [
        PathBuf::from(profile),
        PathBuf::from("Documents"),
        PathBuf::from("My Games"),
        PathBuf::from(game_folder(flavor)),
        PathBuf::from("Saves"),
    ]
    .iter()
    .collect();

    path.into_os_string().into_string().unwrap_or_default()
}
