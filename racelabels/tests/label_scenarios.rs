use racelabels::core::compiler::CompiledLabel;
use racelabels::core::context::RenderContext;
use racelabels::core::external_data::ExternalData;
use racelabels::core::handle_tick::LabelEngine;
use racelabels::core::render::render_label;
use racelabels::core::rounding::Rounding;
use racelabels::core::session::{
    DriverInfo, LapInfo, RaceWeekend, Sector, SessionSnapshot, SessionState, SessionType,
    StandingEntry, TrackSurface,
};
use racelabels::core::standing_fields::compute_standing_fields;
use racelabels::core::theme::{Theme, ThemePars};
use racelabels::core::tokens::{StandingField, StandingFields};
use racelabels::interfaces::scripting::ScriptRegistry;
use racelabels::interfaces::time_format::ClockTimeFormatter;

fn theme(json: &str) -> Theme {
    let pars: ThemePars = serde_json::from_str(json).unwrap();
    Theme::new(&pars, &ScriptRegistry::new())
}

fn driver(car_idx: i32, name: &str, position: i32) -> StandingEntry {
    StandingEntry {
        driver: DriverInfo {
            car_idx,
            user_id: car_idx + 100,
            name: name.to_owned(),
            car_class_name: "GT3".to_owned(),
            ..DriverInfo::default()
        },
        position,
        ..StandingEntry::default()
    }
}

fn weekend(session_type: SessionType, standings: Vec<StandingEntry>) -> RaceWeekend {
    RaceWeekend {
        sessions: vec![SessionSnapshot {
            id: 1,
            session_type,
            time: 100.0,
            laps_total: 20,
            standings,
            ..SessionSnapshot::default()
        }],
        ..RaceWeekend::default()
    }
}

/// fields computes the standing fields of the car with `car_idx` in the current session.
fn fields(
    weekend: &RaceWeekend,
    theme: &Theme,
    external: &ExternalData,
    car_idx: i32,
) -> StandingFields {
    let scripts = ScriptRegistry::new();
    let ctx = RenderContext {
        weekend,
        theme,
        external,
        scripts: &scripts,
        timer: &ClockTimeFormatter,
    };
    let session = weekend.current_session().unwrap();
    let standing = session.find_driver(car_idx).unwrap();
    compute_standing_fields(standing, session, Rounding::default(), &ctx)
}

#[test]
fn lap_below_the_validity_floor_is_invalid() {
    let mut entry = driver(0, "J. Doe", 1);
    entry.fastest_lap = 3.0;
    let weekend = weekend(SessionType::Race, vec![entry]);

    let fields = fields(&weekend, &Theme::default(), &ExternalData::default(), 0);
    assert_eq!(fields.get(StandingField::FastLap), "invalid");
}

#[test]
fn leader_gap_depends_on_the_session_type() {
    let mut leader = driver(0, "A. Smith", 1);
    leader.fastest_lap = 92.345;

    let race = weekend(SessionType::Race, vec![leader.clone()]);
    let race_fields = fields(&race, &Theme::default(), &ExternalData::default(), 0);
    assert_eq!(race_fields.get(StandingField::Gap), "");

    let qualify = weekend(SessionType::Qualify, vec![leader]);
    let qualify_fields = fields(&qualify, &Theme::default(), &ExternalData::default(), 0);
    assert_eq!(qualify_fields.get(StandingField::Gap), "1:32.345");
}

#[test]
fn retired_car_is_reported_out() {
    let mut entry = driver(3, "J. Doe", 4);
    entry.track_surface = TrackSurface::NotInWorld;
    entry.off_track_since = 98.0;
    let weekend = weekend(SessionType::Race, vec![driver(0, "A. Smith", 1), entry]);
    let theme = theme(r#"{ "name": "t", "allow_retire": true, "translation": { "out": "OUT" } }"#);

    let fields = fields(&weekend, &theme, &ExternalData::default(), 3);
    assert_eq!(fields.get(StandingField::Gap), "OUT");
    assert_eq!(fields.get(StandingField::ClassGap), "OUT");

    let quiet = self::fields(&weekend, &Theme::default(), &ExternalData::default(), 3);
    assert_ne!(quiet.get(StandingField::Gap), "out");
}

#[test]
fn drivers_without_points_rank_last() {
    let weekend = weekend(SessionType::Race, vec![driver(7, "J. Doe", 1)]);
    let external = ExternalData::new(Vec::new(), Vec::new(), vec![(201, 50), (202, 30)]);

    let fields = fields(&weekend, &Theme::default(), &external, 7);
    assert_eq!(fields.get(StandingField::Points), "0");
    assert_eq!(fields.get(StandingField::PointsPos), "3");
    assert_eq!(fields.get(StandingField::PointsPosOrd), "3rd");
}

#[test]
fn switching_signs_flips_only_the_glyph() {
    let mut second = driver(5, "J. Doe", 2);
    second.previous_lap = LapInfo {
        gap: 1.5,
        ..LapInfo::default()
    };
    let weekend = weekend(SessionType::Race, vec![driver(0, "A. Smith", 1), second]);

    let plain = fields(&weekend, &Theme::default(), &ExternalData::default(), 5);
    let switched = fields(
        &weekend,
        &theme(r#"{ "name": "t", "switch_sign": true }"#),
        &ExternalData::default(),
        5,
    );

    assert_eq!(plain.get(StandingField::Gap), "+1.500");
    assert_eq!(switched.get(StandingField::Gap), "-1.500");
    assert_eq!(plain.get(StandingField::Interval), "+1.500");
    assert_eq!(switched.get(StandingField::Interval), "-1.500");
}

#[test]
fn position_and_name_template() {
    let theme = theme(
        r#"{
            "name": "t",
            "labels": [ { "name": "p2", "text": "{position_ord} - {fullname}", "offset": 1 } ]
        }"#,
    );
    let weekend = weekend(
        SessionType::Race,
        vec![driver(0, "A. Smith", 1), driver(5, "J. Doe", 2)],
    );

    let mut engine = LabelEngine::new(theme, ExternalData::default(), ScriptRegistry::new());
    let report = engine.render_tick(&weekend);
    assert_eq!(report.labels[0].text, "2nd - J. Doe");
}

#[test]
fn literal_labels_render_unchanged() {
    let source = "Live from Okayama";
    let label = CompiledLabel::compile::<StandingField>(source, &[], Rounding::default(), false);

    let mut filled = StandingFields::new();
    filled.set(StandingField::FullName, "J. Doe");

    assert_eq!(label.format, source);
    assert_eq!(render_label(&label, &StandingFields::new(), &[]), source);
    assert_eq!(render_label(&label, &filled, &[]), source);
}

#[test]
fn stray_closing_brace_is_literal_text() {
    let source = "Score: 3} pts";
    let label = CompiledLabel::compile::<StandingField>(source, &[], Rounding::default(), false);

    let mut filled = StandingFields::new();
    filled.set(StandingField::FullName, "J. Doe");

    assert_eq!(render_label(&label, &StandingFields::new(), &[]), source);
    assert_eq!(render_label(&label, &filled, &[]), source);
}

#[test]
fn external_columns_and_team_script_render_per_driver() {
    let pars: ThemePars = serde_json::from_str(
        r#"{
            "name": "t",
            "labels": [
                { "name": "info", "text": "{fullname} ({external:1|carnum}) {script:team:0}" }
            ]
        }"#,
    )
    .unwrap();
    let scripts = ScriptRegistry::with_builtin_scripts();
    let theme = Theme::new(&pars, &scripts);
    let external = ExternalData::new(
        vec![(100, vec!["Rookie".to_owned(), "DE".to_owned()])],
        vec![(9, vec!["Red Bulls".to_owned()])],
        Vec::new(),
    );

    let mut leader = driver(0, "A. Smith", 1);
    leader.driver.team_id = 9;
    let mut second = driver(5, "J. Doe", 2);
    second.driver.number_plate = "07".to_owned();
    let weekend = weekend(SessionType::Race, vec![leader, second]);

    let mut engine = LabelEngine::new(theme, external, scripts);
    assert_eq!(engine.render_tick(&weekend).labels[0].text, "A. Smith (DE) Red Bulls");

    engine.theme.labels[0].pars.offset = 1;
    assert_eq!(engine.render_tick(&weekend).labels[0].text, "J. Doe (07) ");
}

fn lap(lap_num: i32, gap: f64) -> LapInfo {
    LapInfo {
        lap_num,
        gap,
        ..LapInfo::default()
    }
}

fn sector(num: usize, time: f64, speed: f64) -> Sector {
    Sector { num, time, speed }
}

#[test]
fn current_lap_time_follows_the_lap_age() {
    let mut entry = driver(0, "J. Doe", 1);
    entry.fastest_lap = 90.5;
    entry.previous_lap.lap_time = 92.345;
    let current_lap = |entry: &StandingEntry| {
        let weekend = weekend(SessionType::Race, vec![entry.clone()]);
        fields(&weekend, &Theme::default(), &ExternalData::default(), 0)
            .get(StandingField::CurLap)
            .to_owned()
    };

    // session clock is at 100 s
    entry.lap_begin = 40.0;
    assert_eq!(current_lap(&entry), "1:00.000");

    entry.lap_begin = 100.0 - 3700.0;
    assert_eq!(current_lap(&entry), "invalid");

    entry.lap_begin = 98.0;
    assert_eq!(current_lap(&entry), "1:32.345");
    entry.previous_lap.lap_time = 0.0;
    assert_eq!(current_lap(&entry), "invalid");

    entry.lap_begin = 40.0;
    entry.track_surface = TrackSurface::NotInWorld;
    assert_eq!(current_lap(&entry), "1:30.500");
}

#[test]
fn sectors_come_from_the_previous_lap_until_the_first_is_done() {
    let mut entry = driver(0, "J. Doe", 1);
    entry.previous_lap.sector_times = vec![sector(0, 28.0, 50.0), sector(1, 31.0, 40.0)];
    entry.current_lap.sector_times = vec![sector(0, 30.1, 45.0)];

    entry.sector = 0;
    let weekend_start = weekend(SessionType::Race, vec![entry.clone()]);
    let start = fields(&weekend_start, &Theme::default(), &ExternalData::default(), 0);
    assert_eq!(start.get(StandingField::Sector1), "28.000");
    assert_eq!(start.get(StandingField::Sector2), "31.000");
    assert_eq!(start.get(StandingField::Sector3), "");
    assert_eq!(start.get(StandingField::Sector1SpeedKph), "180.000");

    entry.sector = 1;
    let weekend_running = weekend(SessionType::Race, vec![entry]);
    let running = fields(&weekend_running, &Theme::default(), &ExternalData::default(), 0);
    assert_eq!(running.get(StandingField::Sector1), "30.100");
    assert_eq!(running.get(StandingField::Sector2), "");
    assert_eq!(running.get(StandingField::Sector2SpeedMph), "");
}

#[test]
fn position_gain_is_measured_against_qualifying() {
    let qualify = SessionSnapshot {
        id: 1,
        session_type: SessionType::Qualify,
        standings: vec![
            driver(0, "A. Smith", 3),
            driver(1, "J. Doe", 1),
            driver(2, "M. Rossi", 2),
        ],
        ..SessionSnapshot::default()
    };
    let race = SessionSnapshot {
        id: 2,
        session_type: SessionType::Race,
        time: 100.0,
        standings: vec![
            driver(0, "A. Smith", 1),
            driver(1, "J. Doe", 2),
            driver(2, "M. Rossi", 3),
        ],
        ..SessionSnapshot::default()
    };
    let weekend = RaceWeekend {
        sessions: vec![qualify, race],
        current_session: 1,
        ..RaceWeekend::default()
    };
    let external = ExternalData::default();

    let gained = fields(&weekend, &Theme::default(), &external, 0);
    assert_eq!(gained.get(StandingField::StartPosition), "3");
    assert_eq!(gained.get(StandingField::PositionGain), "+2");
    assert_eq!(gained.get(StandingField::ClassPositionGain), "+2");

    let lost = fields(&weekend, &Theme::default(), &external, 1);
    assert_eq!(lost.get(StandingField::PositionGain), "-1");
    assert_eq!(lost.get(StandingField::ClassPositionGain), "-1");

    let held = RaceWeekend {
        sessions: vec![weekend.sessions[1].clone()],
        ..RaceWeekend::default()
    };
    let without_qualifying = fields(&held, &Theme::default(), &external, 0);
    assert_eq!(without_qualifying.get(StandingField::StartPosition), "");
    assert_eq!(without_qualifying.get(StandingField::PositionGain), "");
    assert_eq!(without_qualifying.get(StandingField::ClassPositionGain), "");
}

#[test]
fn lapped_cars_show_the_lap_count() {
    let mut one_down = driver(1, "J. Doe", 2);
    one_down.previous_lap = LapInfo {
        gap_laps: 1,
        ..LapInfo::default()
    };
    let mut two_down = driver(2, "M. Rossi", 3);
    two_down.previous_lap = LapInfo {
        gap_laps: 2,
        ..LapInfo::default()
    };
    let weekend = weekend(
        SessionType::Race,
        vec![driver(0, "A. Smith", 1), one_down, two_down],
    );
    let external = ExternalData::default();

    assert_eq!(
        fields(&weekend, &Theme::default(), &external, 1).get(StandingField::Gap),
        "+1 lap"
    );
    assert_eq!(
        fields(&weekend, &Theme::default(), &external, 2).get(StandingField::Gap),
        "+2 laps"
    );
}

#[test]
fn interval_turns_into_laps_beyond_one_full_lap() {
    let mut leader = driver(0, "A. Smith", 1);
    leader.current_track_pct = 10.0;
    let mut exactly_one = driver(1, "J. Doe", 2);
    exactly_one.current_track_pct = 9.0;
    exactly_one.previous_lap.gap = 80.0;
    let mut one_and_a_half = driver(2, "M. Rossi", 3);
    one_and_a_half.current_track_pct = 7.5;
    let mut two_and_a_half = driver(3, "K. Lee", 4);
    two_and_a_half.current_track_pct = 5.0;
    let weekend = weekend(
        SessionType::Race,
        vec![leader, exactly_one, one_and_a_half, two_and_a_half],
    );
    let interval = |car_idx| {
        fields(&weekend, &Theme::default(), &ExternalData::default(), car_idx)
            .get(StandingField::Interval)
            .to_owned()
    };

    assert_eq!(interval(1), "+1:20.000");
    assert_eq!(interval(2), "+1 lap");
    assert_eq!(interval(3), "+2 laps");
}

#[test]
fn class_interval_skips_cars_of_other_classes() {
    let mut prototype = driver(1, "P. Blanc", 2);
    prototype.driver.car_class_name = "LMP2".to_owned();
    prototype.previous_lap.gap = 1.0;
    let mut chaser = driver(2, "J. Doe", 3);
    chaser.previous_lap.gap = 2.5;
    let weekend = weekend(
        SessionType::Race,
        vec![driver(0, "A. Smith", 1), prototype, chaser],
    );

    let fields = fields(&weekend, &Theme::default(), &ExternalData::default(), 2);
    assert_eq!(fields.get(StandingField::Interval), "+1.500");
    assert_eq!(fields.get(StandingField::ClassInterval), "+2.500");
    assert_eq!(fields.get(StandingField::ClassPosition), "2");
}

#[test]
fn lap_speeds_need_a_positive_lap_time() {
    let mut entry = driver(0, "J. Doe", 1);
    entry.previous_lap.lap_time = 100.0;
    let mut weekend = weekend(SessionType::Race, vec![entry]);
    weekend.track.length = 5000.0;

    let fields = fields(&weekend, &Theme::default(), &ExternalData::default(), 0);
    assert_eq!(fields.get(StandingField::SpeedFastKph), "-");
    assert_eq!(fields.get(StandingField::SpeedFastMph), "-");
    assert_eq!(fields.get(StandingField::SpeedPrevKph), "180.000");
}

#[test]
fn gap_freezes_once_the_race_is_finished() {
    let mut leader = driver(0, "A. Smith", 1);
    leader.laps = vec![lap(20, 0.0)];
    let mut second = driver(1, "J. Doe", 2);
    second.laps = vec![lap(19, 3.1), lap(20, 4.2)];
    second.previous_lap = lap(21, 9.9);

    let gap = |state: SessionState, second_progress: f64| {
        let mut second = second.clone();
        second.current_track_pct = second_progress;
        let mut weekend = weekend(SessionType::Race, vec![leader.clone(), second]);
        weekend.sessions[0].state = state;
        weekend.sessions[0].laps_complete = 20;
        fields(&weekend, &Theme::default(), &ExternalData::default(), 1)
            .get(StandingField::Gap)
            .to_owned()
    };

    assert_eq!(gap(SessionState::Racing, 20.3), "+9.900");
    assert_eq!(gap(SessionState::Cooldown, 19.8), "+4.200");
    assert_eq!(gap(SessionState::Checkered, 20.3), "+4.200");
    assert_eq!(gap(SessionState::Checkered, 19.8), "+9.900");
}
