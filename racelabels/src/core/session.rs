use crate::core::external_data::ExternalData;
use helpers::general::{argsort, SortOrder};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    None,
    Practice,
    Qualify,
    Race,
}

impl Default for SessionType {
    fn default() -> Self {
        SessionType::None
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Gridding,
    Pacing,
    Racing,
    Caution,
    Checkered,
    Cooldown,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Racing
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrackSurface {
    NotInWorld,
    OffTrack,
    InPitStall,
    ApproachingPits,
    OnTrack,
}

impl Default for TrackSurface {
    fn default() -> Self {
        TrackSurface::OnTrack
    }
}

/// Orderings a label can pick its standing from.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DataOrder {
    Position,
    LivePosition,
    ClassPosition,
    FastestLap,
    Points,
    TrackPosition,
}

impl Default for DataOrder {
    fn default() -> Self {
        DataOrder::Position
    }
}

/// * `name` - Full driver name
/// * `license` - License and safety rating string, e.g. A 3.45
/// * `number_plate` - Car number as painted on the car, kept as text to preserve leading zeros
/// * `car_idx` - Index of the car in the telemetry arrays, negative for synthetic entries
/// * `user_id` - Customer id, key into the external data tables
/// * `car_class_order` - Rank of the car class on the grid, lower classes are shown first
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DriverInfo {
    pub name: String,
    pub shortname: String,
    pub initials: String,
    pub license: String,
    pub club: String,
    pub number_plate: String,
    pub irating: i32,
    pub car_idx: i32,
    pub user_id: i32,
    pub team_id: i32,
    pub team_name: String,
    pub car_id: i32,
    pub car_class_name: String,
    pub car_class_order: i32,
}

impl Default for DriverInfo {
    fn default() -> Self {
        DriverInfo {
            name: String::new(),
            shortname: String::new(),
            initials: String::new(),
            license: String::new(),
            club: String::new(),
            number_plate: "0".to_owned(),
            irating: 0,
            car_idx: -1,
            user_id: 0,
            team_id: 0,
            team_name: String::new(),
            car_id: 0,
            car_class_name: String::new(),
            car_class_order: 0,
        }
    }
}

/// * `num` - 0-based sector number
/// * `time` - (s) Sector time
/// * `speed` - (m/s) Average speed through the sector
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Sector {
    pub num: usize,
    pub time: f64,
    pub speed: f64,
}

/// * `lap_num` - Lap number
/// * `lap_time` - (s) Lap time
/// * `position` - Overall position at the end of the lap
/// * `gap` - (s) Gap to the leader at the end of the lap
/// * `gap_laps` - Full laps behind the leader at the end of the lap
/// * `sector_times` - Sectors recorded so far
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LapInfo {
    pub lap_num: i32,
    pub lap_time: f64,
    pub position: i32,
    pub gap: f64,
    pub gap_laps: i32,
    pub sector_times: Vec<Sector>,
}

impl LapInfo {
    pub fn find_sector(&self, num: usize) -> Option<&Sector> {
        self.sector_times.iter().find(|s| s.num == num)
    }
}

/// StandingEntry is one driver's competitive state within a session. Times referring to the
/// session clock (`lap_begin`, `off_track_since`) are in session seconds.
///
/// * `lap_begin` - (s) Session time at which the current lap started
/// * `sector` - Index of the sector the car is currently in
/// * `current_track_pct` - Race progress in laps, e.g. 12.25 = a quarter into lap 13
/// * `speed` - (m/s) Current speed
/// * `gap_live` / `interval_live` - (s) Live gap to the leader / car ahead
/// * `distance_to_followed` - Track distance to the followed car, negative when behind it
/// * `laps` - Completed lap records of this session
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct StandingEntry {
    pub driver: DriverInfo,
    pub position: i32,
    pub position_live: i32,
    pub fastest_lap: f64,
    pub previous_lap: LapInfo,
    pub current_lap: LapInfo,
    pub laps: Vec<LapInfo>,
    pub lap_begin: f64,
    pub sector: i32,
    pub current_track_pct: f64,
    pub speed: f64,
    pub laps_led: i32,
    pub class_laps_led: i32,
    pub pit_stops: i32,
    pub pit_stop_time: f64,
    pub highest_position: i32,
    pub lowest_position: i32,
    pub highest_class_position: i32,
    pub lowest_class_position: i32,
    pub track_surface: TrackSurface,
    pub off_track_since: f64,
    pub gap_live: f64,
    pub interval_live: f64,
    pub class_gap_live: f64,
    pub class_interval_live: f64,
    pub interval_to_followed_live: f64,
    pub distance_to_followed: f64,
}

impl StandingEntry {
    /// find_lap returns the completed lap record with the given number, or the previous lap if
    /// that lap was never recorded.
    pub fn find_lap(&self, lap_num: i32) -> &LapInfo {
        self.laps
            .iter()
            .find(|l| l.lap_num == lap_num)
            .unwrap_or(&self.previous_lap)
    }
}

/// * `length` - (m) Track length
/// * `altitude` - (m) Altitude above sea level
/// * `track_temperature` / `air_temperature` - (°C)
/// * `air_pressure` - (mmHg)
/// * `wind_speed` - (m/s)
/// * `wind_direction` - (rad)
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TrackInfo {
    pub name: String,
    pub length: f64,
    pub turns: i32,
    pub city: String,
    pub country: String,
    pub altitude: f64,
    pub sky: String,
    pub track_temperature: f64,
    pub air_temperature: f64,
    pub humidity: f64,
    pub fog: f64,
    pub air_pressure: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
}

/// SessionSnapshot is one phase of a race weekend with its own timing and standings.
///
/// * `id` - Session number, unique within the weekend and used as cache key
/// * `session_length` - (s) Scheduled length, non-finite for unlimited sessions
/// * `time` - (s) Session time passed
/// * `fastest_lap` - (s) Fastest lap of the session
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SessionSnapshot {
    pub id: i32,
    pub session_type: SessionType,
    pub state: SessionState,
    pub laps_total: i32,
    pub laps_remaining: i32,
    pub laps_complete: i32,
    pub session_length: f64,
    pub time_remaining: f64,
    pub time: f64,
    pub cautions: i32,
    pub caution_laps: i32,
    pub lead_changes: i32,
    pub fastest_lap: f64,
    pub standings: Vec<StandingEntry>,
}

impl SessionSnapshot {
    /// ordered_by returns the standings sorted by the given order. Points come from the
    /// external data tables, drivers without points are sorted last.
    pub fn ordered_by(&self, order: DataOrder, external: &ExternalData) -> Vec<&StandingEntry> {
        let mut ordered: Vec<&StandingEntry> = self.standings.iter().collect();
        match order {
            DataOrder::Position => ordered.sort_by_key(|s| rank_key(s.position)),
            DataOrder::LivePosition => ordered.sort_by_key(|s| rank_key(s.position_live)),
            DataOrder::ClassPosition => {
                ordered.sort_by(|a, b| class_rank_key(a).cmp(&class_rank_key(b)))
            }
            DataOrder::FastestLap => {
                let laps: Vec<f64> = ordered
                    .iter()
                    .map(|s| if s.fastest_lap > 0.0 { s.fastest_lap } else { f64::MAX })
                    .collect();
                ordered = argsort(&laps, SortOrder::Ascending)
                    .into_iter()
                    .map(|i| ordered[i])
                    .collect();
            }
            DataOrder::Points => {
                let points: Vec<i64> = ordered
                    .iter()
                    .map(|s| {
                        external
                            .points_for(s.driver.user_id)
                            .map(i64::from)
                            .unwrap_or(i64::MIN)
                    })
                    .collect();
                ordered = argsort(&points, SortOrder::Descending)
                    .into_iter()
                    .map(|i| ordered[i])
                    .collect();
            }
            DataOrder::TrackPosition => {
                let progress: Vec<f64> = ordered.iter().map(|s| s.current_track_pct).collect();
                ordered = argsort(&progress, SortOrder::Descending)
                    .into_iter()
                    .map(|i| ordered[i])
                    .collect();
            }
        }
        ordered
    }

    /// find_position returns the standing at the 1-based `rank` of the given order, optionally
    /// restricted to one car class.
    pub fn find_position(
        &self,
        rank: i32,
        order: DataOrder,
        class: Option<&str>,
        external: &ExternalData,
    ) -> Option<&StandingEntry> {
        if rank < 1 {
            return None;
        }
        self.ordered_by(order, external)
            .into_iter()
            .filter(|s| class.map_or(true, |c| s.driver.car_class_name == c))
            .nth(rank as usize - 1)
    }

    pub fn find_driver(&self, car_idx: i32) -> Option<&StandingEntry> {
        self.standings.iter().find(|s| s.driver.car_idx == car_idx)
    }

    /// class_position_of returns the 1-based position of the driver among the cars of its
    /// class, 0 if the driver is not part of this session.
    pub fn class_position_of(&self, driver: &DriverInfo) -> i32 {
        self.class_rank_of(driver, |s| s.position)
    }

    pub fn class_live_position_of(&self, driver: &DriverInfo) -> i32 {
        self.class_rank_of(driver, |s| s.position_live)
    }

    pub fn class_leader_of(&self, class_name: &str) -> Option<&StandingEntry> {
        self.standings
            .iter()
            .filter(|s| s.driver.car_class_name == class_name)
            .min_by_key(|s| rank_key(s.position))
    }

    fn class_rank_of<F>(&self, driver: &DriverInfo, rank: F) -> i32
    where
        F: Fn(&StandingEntry) -> i32,
    {
        let mut class: Vec<&StandingEntry> = self
            .standings
            .iter()
            .filter(|s| s.driver.car_class_name == driver.car_class_name)
            .collect();
        class.sort_by_key(|s| rank_key(rank(s)));

        class
            .iter()
            .position(|s| s.driver.car_idx == driver.car_idx)
            .map_or(0, |idx| idx as i32 + 1)
    }
}

/// Unclassified cars (position 0) sort behind every classified car.
fn rank_key(position: i32) -> i32 {
    if position > 0 {
        position
    } else {
        i32::MAX
    }
}

/// class_rank_key sorts by class order first, then class name, then position.
fn class_rank_key(standing: &StandingEntry) -> (i32, &str, i32) {
    (
        standing.driver.car_class_order,
        standing.driver.car_class_name.as_str(),
        rank_key(standing.position),
    )
}

/// RaceWeekend holds the ordered sessions of an event together with the track they run on.
///
/// * `current_session` - Index into `sessions` of the session currently running
/// * `followed_car_idx` - Car index the camera is following
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RaceWeekend {
    pub track: TrackInfo,
    pub sessions: Vec<SessionSnapshot>,
    pub current_session: usize,
    pub followed_car_idx: i32,
}

impl RaceWeekend {
    pub fn current_session(&self) -> Option<&SessionSnapshot> {
        self.sessions.get(self.current_session)
    }

    /// current_time returns the session clock of the running session.
    pub fn current_time(&self) -> f64 {
        self.current_session().map_or(0.0, |s| s.time)
    }

    pub fn session(&self, id: i32) -> Option<&SessionSnapshot> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn find_session_by_type(&self, session_type: SessionType) -> Option<&SessionSnapshot> {
        self.sessions
            .iter()
            .find(|s| s.session_type == session_type && s.session_type != SessionType::None)
    }

    /// followed_standing returns the standing of the followed car in the given session. If the
    /// car has no standing there, a synthetic entry with car index -1 is returned instead.
    pub fn followed_standing(&self, session: &SessionSnapshot) -> StandingEntry {
        session
            .find_driver(self.followed_car_idx)
            .cloned()
            .unwrap_or_default()
    }
}
