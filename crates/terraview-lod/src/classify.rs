//! Land/sea classification of grid cells.

/// Which list a cell's triangles go into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceKind {
    Land,
    Sea,
}

/// Majority-vote classifier, chosen once per tier.
///
/// A cell is land when at least `min_land_corners` of its four corner
/// elevations lie strictly above sea level.
#[derive(Clone, Copy, Debug)]
pub struct CellClassifier {
    pub sea_level_m: f64,
    pub min_land_corners: u8,
}

impl CellClassifier {
    pub fn new(sea_level_m: f64, min_land_corners: u8) -> Self {
        Self {
            sea_level_m,
            min_land_corners: min_land_corners.clamp(1, 4),
        }
    }

    pub fn is_land_point(&self, elevation_m: f64) -> bool {
        elevation_m > self.sea_level_m
    }

    pub fn classify(&self, corners: [f64; 4]) -> SurfaceKind {
        let land = corners.iter().filter(|&&h| self.is_land_point(h)).count();
        if land >= self.min_land_corners as usize {
            SurfaceKind::Land
        } else {
            SurfaceKind::Sea
        }
    }
}
