// Dashboard domain model
use super::account::UserProfile;
use super::widgets::{ChartData, TileData};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub display_name: String,
    pub profile: Option<UserProfile>,
    pub tiles: Vec<TileData>,
    pub charts: Vec<ChartData>,
}

impl Dashboard {
    pub fn new(
        title: String,
        profile: Option<UserProfile>,
        tiles: Vec<TileData>,
        charts: Vec<ChartData>,
    ) -> Self {
        Self {
            title,
            display_name: display_name(profile.as_ref()),
            profile,
            tiles,
            charts,
        }
    }

    #[cfg(test)]
    pub fn tile(&self, id: &str) -> Option<&TileData> {
        self.tiles.iter().find(|t| t.id == id)
    }
}

/// Header name for the signed-in user, "Guest" when the profile is missing
pub fn display_name(profile: Option<&UserProfile>) -> String {
    profile.map_or("Guest", UserProfile::display_name).to_string()
}
