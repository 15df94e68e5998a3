use crate::core::context::RenderContext;
use crate::core::rounding::Rounding;
use crate::core::session::{
    DataOrder, LapInfo, SessionSnapshot, SessionState, SessionType, StandingEntry, TrackSurface,
};
use crate::core::tokens::{StandingField as SF, StandingFields};
use helpers::general::{ordinal, round_fixed};

/// (s) Lap times below this value are telemetry garbage and shown as invalid.
pub const LAP_TIME_FLOOR: f64 = 5.0;

/// (s) A lap running longer than this is shown as invalid.
const MAX_LAP_AGE: f64 = 3600.0;

/// (s) Time a car must have been out of the world before it is reported as out.
const RETIRE_DELAY: f64 = 1.0;

const METERS_PER_MILE: f64 = 1609.344;
const MS_TO_KPH: f64 = 3.6;
const MS_TO_MPH: f64 = 2.237;

const SECTOR_TIMES: [SF; 3] = [SF::Sector1, SF::Sector2, SF::Sector3];
const SECTOR_KPH: [SF; 3] = [SF::Sector1SpeedKph, SF::Sector2SpeedKph, SF::Sector3SpeedKph];
const SECTOR_MPH: [SF; 3] = [SF::Sector1SpeedMph, SF::Sector2SpeedMph, SF::Sector3SpeedMph];

/// lap_speed_kph returns the average speed of a lap, None if the lap time is not positive.
pub fn lap_speed_kph(track_length: f64, lap_time: f64) -> Option<f64> {
    if lap_time > 0.0 {
        Some(MS_TO_KPH * track_length / lap_time)
    } else {
        None
    }
}

pub fn lap_speed_mph(track_length: f64, lap_time: f64) -> Option<f64> {
    if lap_time > 0.0 {
        Some(3600.0 * track_length / (METERS_PER_MILE * lap_time))
    } else {
        None
    }
}

/// compute_standing_fields computes every standing field of one driver, followed by the
/// driver's external data columns.
pub fn compute_standing_fields(
    standing: &StandingEntry,
    session: &SessionSnapshot,
    rounding: Rounding,
    ctx: &RenderContext,
) -> StandingFields {
    let computer = FieldComputer {
        standing,
        session,
        ctx,
        decimals: rounding.decimals(),
    };
    let mut fields = StandingFields::new();

    computer.identity(&mut fields);
    computer.lap_times(&mut fields);
    computer.speeds(&mut fields);
    computer.positions(&mut fields);
    computer.gaps(&mut fields);
    computer.class_fields(&mut fields);
    computer.live_fields(&mut fields);
    computer.sectors(&mut fields);
    computer.start_positions(&mut fields);
    computer.points(&mut fields);

    fields.set_external(ctx.external.data_for(standing.driver.user_id).to_vec());
    fields
}

struct FieldComputer<'a> {
    standing: &'a StandingEntry,
    session: &'a SessionSnapshot,
    ctx: &'a RenderContext<'a>,
    decimals: u8,
}

impl<'a> FieldComputer<'a> {
    fn time(&self, seconds: f64) -> String {
        self.ctx.timer.format_time(seconds, self.decimals, false)
    }

    fn round(&self, value: f64) -> String {
        round_fixed(value, self.decimals)
    }

    fn translate(&self, key: &'a str) -> String {
        self.ctx.theme.translation.translate(key).to_owned()
    }

    fn behind(&self, text: &str) -> String {
        format!("{}{}", self.ctx.theme.translation.behind(), text)
    }

    fn is_race(&self) -> bool {
        self.session.session_type == SessionType::Race
    }

    /// A car is out once it has been removed from the world for longer than the retire delay,
    /// and only if the theme reports retirements at all.
    fn is_out(&self) -> bool {
        self.standing.track_surface == TrackSurface::NotInWorld
            && self.ctx.theme.allow_retire
            && self.ctx.weekend.current_time() - self.standing.off_track_since > RETIRE_DELAY
    }

    fn lap_time(&self, lap_time: f64) -> String {
        if lap_time < LAP_TIME_FLOOR {
            self.translate("invalid")
        } else {
            self.time(lap_time)
        }
    }

    /// The lap a race gap is taken from. After the finish the gap freezes at the lap the
    /// session was completed on.
    fn gap_lap(&self, standing: &'a StandingEntry) -> &'a LapInfo {
        let finished = self.session.state == SessionState::Cooldown
            || (self.session.state == SessionState::Checkered
                && standing.current_track_pct > self.session.laps_complete as f64);
        if finished {
            standing.find_lap(self.session.laps_complete)
        } else {
            &standing.previous_lap
        }
    }

    /// Text shown in place of a gap for the car everybody else is compared against.
    fn reference_gap(&self) -> String {
        if self.is_race() {
            String::new()
        } else {
            self.time(self.standing.fastest_lap)
        }
    }

    fn identity(&self, fields: &mut StandingFields) {
        let driver = &self.standing.driver;
        let theme = self.ctx.theme;

        fields.set(SF::FullName, driver.name.as_str());
        fields.set(SF::ShortName, driver.shortname.as_str());
        fields.set(SF::Initials, driver.initials.as_str());
        fields.set(SF::License, driver.license.as_str());
        fields.set(SF::Club, driver.club.as_str());
        fields.set(SF::Car, theme.car_name(driver.car_id));
        fields.set(SF::Class, theme.car_class(driver.car_id, &driver.car_class_name));
        fields.set(SF::CarNum, driver.number_plate.as_str());
        fields.set(SF::DriverId, driver.user_id.to_string());
        fields.set(SF::IRating, driver.irating.to_string());
        fields.set(SF::TeamId, driver.team_id.to_string());
        fields.set(SF::TeamName, driver.team_name.as_str());
    }

    fn lap_times(&self, fields: &mut StandingFields) {
        let standing = self.standing;

        fields.set(SF::FastLap, self.lap_time(standing.fastest_lap));
        fields.set(SF::PrevLap, self.lap_time(standing.previous_lap.lap_time));
        fields.set(SF::LapNum, standing.current_lap.lap_num.to_string());
        fields.set(SF::PitStops, standing.pit_stops.to_string());
        fields.set(SF::PitStopTime, self.time(standing.pit_stop_time));

        let lap_age = self.ctx.weekend.current_time() - standing.lap_begin;
        let current = if lap_age > MAX_LAP_AGE {
            self.translate("invalid")
        } else if lap_age < LAP_TIME_FLOOR {
            // the lap just started, keep showing the one before
            self.lap_time(standing.previous_lap.lap_time)
        } else if standing.track_surface == TrackSurface::NotInWorld {
            self.time(standing.fastest_lap)
        } else {
            self.time(lap_age)
        };
        fields.set(SF::CurLap, current);
    }

    fn speeds(&self, fields: &mut StandingFields) {
        let length = self.ctx.weekend.track.length;
        let fast = self.standing.fastest_lap;
        let prev = self.standing.previous_lap.lap_time;
        let show = |speed: Option<f64>| speed.map_or_else(|| "-".to_owned(), |v| self.round(v));

        fields.set(SF::SpeedFastMph, show(lap_speed_mph(length, fast)));
        fields.set(SF::SpeedPrevMph, show(lap_speed_mph(length, prev)));
        fields.set(SF::SpeedFastKph, show(lap_speed_kph(length, fast)));
        fields.set(SF::SpeedPrevKph, show(lap_speed_kph(length, prev)));
        fields.set(SF::LiveSpeedKph, self.round(self.standing.speed * MS_TO_KPH));
        fields.set(SF::LiveSpeedMph, self.round(self.standing.speed * MS_TO_MPH));
    }

    fn positions(&self, fields: &mut StandingFields) {
        let standing = self.standing;

        fields.set(SF::Position, standing.position.to_string());
        fields.set(SF::PositionOrd, ordinal(standing.position));
        fields.set(SF::LivePosition, standing.position_live.to_string());
        fields.set(SF::LivePositionOrd, ordinal(standing.position_live));
        fields.set(SF::LapsLed, standing.laps_led.to_string());
        fields.set(SF::ClassLapsLed, standing.class_laps_led.to_string());

        fields.set(SF::HighestPosition, standing.highest_position.to_string());
        fields.set(SF::HighestPositionOrd, ordinal(standing.highest_position));
        fields.set(SF::LowestPosition, standing.lowest_position.to_string());
        fields.set(SF::LowestPositionOrd, ordinal(standing.lowest_position));
        fields.set(SF::ClassHighestPosition, standing.highest_class_position.to_string());
        fields.set(SF::ClassHighestPositionOrd, ordinal(standing.highest_class_position));
        fields.set(SF::ClassLowestPosition, standing.lowest_class_position.to_string());
        fields.set(SF::ClassLowestPositionOrd, ordinal(standing.lowest_class_position));

        let in_pit = standing.track_surface == TrackSurface::InPitStall;
        fields.set(SF::InPit, if in_pit { "1" } else { "0" });
    }

    /// gap_to renders the deficit to `leader`, the overall or the class leader. Race gaps come
    /// from the last completed lap, other sessions compare the fastest lap with `best_lap`.
    fn gap_to(&self, leader: Option<&'a StandingEntry>, is_leader: bool, best_lap: f64) -> String {
        if self.is_out() {
            return self.translate("out");
        }
        if is_leader {
            return self.reference_gap();
        }

        if !self.is_race() {
            return if self.standing.fastest_lap <= 1.0 {
                self.translate("invalid")
            } else {
                self.behind(&self.time(self.standing.fastest_lap - best_lap))
            };
        }

        let leader = match leader {
            Some(leader) => leader,
            None => return String::new(),
        };
        let lap = self.gap_lap(self.standing);
        let leader_lap = self.gap_lap(leader);
        let gap_laps = lap.gap_laps - leader_lap.gap_laps;
        if gap_laps > 0 {
            self.behind(&self.ctx.theme.translation.lap_count(gap_laps))
        } else {
            self.behind(&self.time(lap.gap - leader_lap.gap))
        }
    }

    /// interval_to renders the deficit to the car directly ahead.
    fn interval_to(&self, infront: Option<&'a StandingEntry>, is_leader: bool) -> String {
        if self.is_out() {
            return self.translate("out");
        }
        if is_leader {
            return self.reference_gap();
        }

        let infront = match infront {
            Some(infront) => infront,
            None => return String::new(),
        };

        if self.is_race() {
            // a car exactly one lap behind is still shown by time
            let laps_apart = infront.current_track_pct - self.standing.current_track_pct;
            if laps_apart > 1.0 {
                let laps = laps_apart.floor() as i32;
                self.behind(&self.ctx.theme.translation.lap_count(laps))
            } else {
                self.behind(&self.time(self.standing.previous_lap.gap - infront.previous_lap.gap))
            }
        } else if self.standing.fastest_lap <= 1.0 {
            self.translate("invalid")
        } else {
            self.behind(&self.time(self.standing.fastest_lap - infront.fastest_lap))
        }
    }

    /// interval_time_to renders the time between the two cars at the end of their previous lap,
    /// regardless of laps apart.
    fn interval_time_to(&self, infront: Option<&'a StandingEntry>, is_leader: bool) -> String {
        if self.is_out() {
            return self.translate("out");
        }
        if is_leader {
            return self.reference_gap();
        }
        match infront {
            Some(infront) => self.behind(
                &self.time(self.standing.previous_lap.gap - infront.previous_lap.gap),
            ),
            None => String::new(),
        }
    }

    fn gaps(&self, fields: &mut StandingFields) {
        let external = self.ctx.external;
        let position = self.standing.position;
        let is_leader = position <= 1;

        let leader = self
            .session
            .find_position(1, DataOrder::Position, None, external);
        let infront = if position > 1 {
            self.session
                .find_position(position - 1, DataOrder::Position, None, external)
        } else {
            None
        };

        fields.set(
            SF::Gap,
            self.gap_to(leader, is_leader, self.session.fastest_lap),
        );
        fields.set(SF::Interval, self.interval_to(infront, is_leader));
        fields.set(SF::IntervalTime, self.interval_time_to(infront, is_leader));
    }

    fn class_fields(&self, fields: &mut StandingFields) {
        let driver = &self.standing.driver;
        let class = driver.car_class_name.as_str();
        let class_position = self.session.class_position_of(driver);
        let class_live_position = self.session.class_live_position_of(driver);
        let is_class_leader = class_position <= 1;

        fields.set(SF::ClassPosition, class_position.to_string());
        fields.set(SF::ClassPositionOrd, ordinal(class_position));
        fields.set(SF::ClassLivePosition, class_live_position.to_string());
        fields.set(SF::ClassLivePositionOrd, ordinal(class_live_position));

        let class_leader = self.session.class_leader_of(class);
        let class_best_lap = class_leader.map_or(0.0, |leader| leader.fastest_lap);
        fields.set(
            SF::ClassGap,
            self.gap_to(class_leader, is_class_leader, class_best_lap),
        );

        let infront = if class_position > 1 {
            self.session.find_position(
                class_position - 1,
                DataOrder::Position,
                Some(class),
                self.ctx.external,
            )
        } else {
            None
        };
        fields.set(SF::ClassInterval, self.interval_to(infront, is_class_leader));
    }

    fn live_fields(&self, fields: &mut StandingFields) {
        let standing = self.standing;

        if self.is_race() {
            let class_leader = self.session.class_position_of(&standing.driver) <= 1;
            fields.set(SF::LiveGap, self.live_gap(standing.gap_live, standing.position <= 1));
            fields.set(
                SF::LiveInterval,
                self.live_gap(standing.interval_live, standing.position <= 1),
            );
            fields.set(SF::ClassLiveGap, self.live_gap(standing.class_gap_live, class_leader));
            fields.set(
                SF::ClassLiveInterval,
                self.live_gap(standing.class_interval_live, class_leader),
            );
        } else {
            // outside of races there is no live gap, mirror the lap based values
            let mirrored = [
                (SF::LiveGap, SF::Gap),
                (SF::LiveInterval, SF::IntervalTime),
                (SF::ClassLiveGap, SF::ClassGap),
                (SF::ClassLiveInterval, SF::ClassInterval),
            ];
            for (live, source) in mirrored {
                let value = fields.get(source).to_owned();
                fields.set(live, value);
            }
        }

        let sign = if standing.distance_to_followed < 0.0 {
            self.ctx.theme.translation.behind()
        } else {
            self.ctx.theme.translation.ahead()
        };
        fields.set(
            SF::LiveIntervalFollowed,
            format!("{}{}", sign, self.round(standing.interval_to_followed_live)),
        );
    }

    fn live_gap(&self, gap: f64, is_leader: bool) -> String {
        if self.is_out() {
            self.translate("out")
        } else if is_leader {
            String::new()
        } else {
            self.behind(&self.time(gap))
        }
    }

    /// Sector times come from the previous lap until the car has completed the first sector of
    /// its current lap.
    fn sectors(&self, fields: &mut StandingFields) {
        let lap = if self.standing.sector <= 0 {
            &self.standing.previous_lap
        } else {
            &self.standing.current_lap
        };

        for num in 0..SECTOR_TIMES.len() {
            if let Some(sector) = lap.find_sector(num) {
                fields.set(SECTOR_TIMES[num], self.time(sector.time));
                fields.set(SECTOR_KPH[num], self.round(sector.speed * MS_TO_KPH));
                fields.set(SECTOR_MPH[num], self.round(sector.speed * MS_TO_MPH));
            }
        }
    }

    /// Start positions and position gains are taken from qualifying, and stay empty if there
    /// was none or the driver did not take part.
    fn start_positions(&self, fields: &mut StandingFields) {
        let qualify = match self.ctx.weekend.find_session_by_type(SessionType::Qualify) {
            Some(qualify) => qualify,
            None => return,
        };
        let driver = &self.standing.driver;
        let start_position = match qualify.find_driver(driver.car_idx) {
            Some(entry) => entry.position,
            None => return,
        };
        let class_start_position = qualify.class_position_of(driver);
        let class_position = self.session.class_position_of(driver);

        fields.set(SF::StartPosition, start_position.to_string());
        fields.set(SF::StartPositionOrd, ordinal(start_position));
        fields.set(SF::ClassStartPosition, class_start_position.to_string());
        fields.set(SF::ClassStartPositionOrd, ordinal(class_start_position));
        fields.set(
            SF::PositionGain,
            signed_gain(start_position - self.standing.position),
        );
        fields.set(
            SF::ClassPositionGain,
            signed_gain(class_start_position - class_position),
        );
    }

    /// Drivers without championship points are ranked behind every ranked driver.
    fn points(&self, fields: &mut StandingFields) {
        let external = self.ctx.external;
        let user_id = self.standing.driver.user_id;

        let (points, position) = match external.points_for(user_id) {
            Some(points) => (
                points,
                external
                    .points_position_of(user_id)
                    .unwrap_or(external.ranked_count() as i32 + 1),
            ),
            None => (0, external.ranked_count() as i32 + 1),
        };

        fields.set(SF::Points, points.to_string());
        fields.set(SF::PointsPos, position.to_string());
        fields.set(SF::PointsPosOrd, ordinal(position));
    }
}

/// signed_gain shows gained places with an explicit plus sign.
fn signed_gain(gain: i32) -> String {
    if gain > 0 {
        format!("+{}", gain)
    } else {
        gain.to_string()
    }
}
