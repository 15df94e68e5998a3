use helpers::general::{argsort, SortOrder};
use std::collections::HashMap;

/// ExternalData holds the supplementary per-driver and per-team columns loaded from the theme's
/// CSV files. It is rebuilt as a whole whenever the files are reloaded.
#[derive(Debug, Clone, Default)]
pub struct ExternalData {
    drivers: HashMap<i32, Vec<String>>,
    teams: HashMap<i32, Vec<String>>,
    points: Vec<(i32, i32)>,
}

impl ExternalData {
    /// `points` keeps file order, which decides ties in the points ranking.
    pub fn new(
        drivers: Vec<(i32, Vec<String>)>,
        teams: Vec<(i32, Vec<String>)>,
        points: Vec<(i32, i32)>,
    ) -> ExternalData {
        ExternalData {
            drivers: drivers.into_iter().collect(),
            teams: teams.into_iter().collect(),
            points,
        }
    }

    pub fn data_for(&self, user_id: i32) -> &[String] {
        self.drivers.get(&user_id).map_or(&[], |d| d.as_slice())
    }

    pub fn team_data_for(&self, team_id: i32) -> &[String] {
        self.teams.get(&team_id).map_or(&[], |d| d.as_slice())
    }

    pub fn points_for(&self, user_id: i32) -> Option<i32> {
        self.points
            .iter()
            .find(|(id, _)| *id == user_id)
            .map(|(_, points)| *points)
    }

    /// points_ranking returns (user id, points) sorted by points in descending order.
    pub fn points_ranking(&self) -> Vec<(i32, i32)> {
        let values: Vec<i32> = self.points.iter().map(|(_, p)| *p).collect();
        argsort(&values, SortOrder::Descending)
            .into_iter()
            .map(|i| self.points[i])
            .collect()
    }

    /// points_position_of returns the 1-based championship position of the driver, if ranked.
    pub fn points_position_of(&self, user_id: i32) -> Option<i32> {
        self.points_ranking()
            .iter()
            .position(|(id, _)| *id == user_id)
            .map(|idx| idx as i32 + 1)
    }

    pub fn ranked_count(&self) -> usize {
        self.points.len()
    }
}
