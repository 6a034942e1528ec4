//! Fixed color palette for item borders. A color is picked once, when an item is created.

pub const PALETTE: [&str; 8] = [
    "#1abc9c", "#2ecc71", "#3498db", "#9b59b6", "#f1c40f", "#e67e22", "#e74c3c", "#34495e",
];

/// Picks a palette entry using OS randomness. Falls back to the first entry if the OS
/// source is unavailable.
pub fn random_color() -> &'static str {
    let mut buf = [0u8; 1];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => color_for(buf[0]),
        Err(_) => PALETTE[0],
    }
}

pub fn color_for(seed: u8) -> &'static str {
    PALETTE[seed as usize % PALETTE.len()]
}

pub fn is_palette_color(color: &str) -> bool {
    PALETTE.contains(&color)
}
