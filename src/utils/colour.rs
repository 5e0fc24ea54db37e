//! Community colour assignment
//!
//! Colours are derived from the community id alone:
//! `rgb = (id * COLOUR_MULTIPLIER) mod 2^24`, hex-encoded as `#RRGGBB`.
//! Nearby ids land far apart in colour space; distinct communities may
//! still end up with similar colours.

/// Multiplier applied to community ids (odd, so ids below 2^24 never collide exactly)
pub const COLOUR_MULTIPLIER: u64 = 0x9E_3779;

/// Size of the 24-bit RGB colour space
const COLOUR_SPACE: u64 = 1 << 24;

/// Colour for edges whose endpoints sit in different communities
pub const CROSS_COMMUNITY_EDGE_COLOUR: &str = "#cccccc";

/// 24-bit RGB triple for a community id
pub fn community_rgb(community: u32) -> [u8; 3] {
    let value = (community as u64).wrapping_mul(COLOUR_MULTIPLIER) % COLOUR_SPACE;
    [(value >> 16) as u8, (value >> 8) as u8, value as u8]
}

/// `#RRGGBB` colour string for a community id
///
/// # Examples
/// ```
/// use token_flow_graph::utils::colour::community_colour;
///
/// assert_eq!(community_colour(0), "#000000");
/// assert_eq!(community_colour(1), "#9e3779");
/// ```
pub fn community_colour(community: u32) -> String {
    format!("#{}", hex::encode(community_rgb(community)))
}
