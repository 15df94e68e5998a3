use crate::core::context::RenderContext;
use crate::core::rounding::Rounding;
use crate::core::session::{SessionSnapshot, SessionState, SessionType};
use crate::core::tokens::{SessionField as SesF, SessionFields};
use crate::core::translation::TranslationTable;
use helpers::general::round_fixed;
use std::f64::consts::PI;

/// (s) Remaining times above this are not a real countdown.
const MAX_TIME_REMAINING: f64 = 600_000.0;

const KM_TO_MI: f64 = 0.6214;
const M_TO_FT: f64 = 3.281;
const MMHG_TO_HPA: f64 = 1.333224;
const MS_TO_KNOTS: f64 = 1.943844;
const MS_TO_KPH: f64 = 3.6;

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn radians_to_degrees(radians: f64) -> f64 {
    360.0 * radians / (2.0 * PI)
}

/// compute_session_fields computes every session field of one session and the weekend's track.
pub fn compute_session_fields(
    session: &SessionSnapshot,
    rounding: Rounding,
    ctx: &RenderContext,
) -> SessionFields {
    let decimals = rounding.decimals();
    let translation = &ctx.theme.translation;
    let track = &ctx.weekend.track;
    let round = |value: f64| round_fixed(value, decimals);
    let time = |seconds: f64| ctx.timer.format_time(seconds, decimals, true);
    let mut fields = SessionFields::new();

    fields.set(SesF::LapsTotal, session.laps_total.to_string());
    fields.set(SesF::LapsRemaining, session.laps_remaining.to_string());
    fields.set(SesF::LapsCompleted, session.laps_complete.max(0).to_string());
    fields.set(SesF::CurrentLap, (session.laps_complete + 1).to_string());
    fields.set(SesF::Cautions, session.cautions.to_string());
    fields.set(SesF::CautionLaps, session.caution_laps.to_string());
    fields.set(SesF::LeadChanges, session.lead_changes.to_string());

    let time_total = if is_unlimited_time(session.session_length) {
        "-.--".to_owned()
    } else {
        time(session.session_length)
    };
    let time_remaining = if is_unlimited_time(session.time_remaining)
        || session.time_remaining > MAX_TIME_REMAINING
    {
        "-.--".to_owned()
    } else {
        time(session.time_remaining)
    };
    fields.set(SesF::TimeTotal, time_total);
    fields.set(SesF::TimeRemaining, time_remaining);
    fields.set(SesF::TimePassed, time(session.time));

    let remaining_in_current = ctx
        .weekend
        .current_session()
        .map_or(session.time_remaining, |s| s.time_remaining);
    fields.set(
        SesF::LapCounter,
        lap_counter(
            session,
            translation,
            ctx.theme.lap_countdown_from,
            time(remaining_in_current),
        ),
    );

    let session_type = match session.session_type {
        SessionType::Race => translation.translate("race"),
        SessionType::Qualify => translation.translate("qualify"),
        SessionType::Practice => translation.translate("practice"),
        SessionType::None => "",
    };
    fields.set(SesF::SessionType, session_type);

    fields.set(SesF::TrackName, track.name.as_str());
    fields.set(SesF::TrackLenMi, round(track.length * KM_TO_MI / 1000.0));
    fields.set(SesF::TrackLenKm, round(track.length / 1000.0));
    fields.set(SesF::Turns, track.turns.to_string());
    fields.set(SesF::City, track.city.as_str());
    fields.set(SesF::Country, track.country.as_str());
    fields.set(SesF::Sky, translation.translate(&track.sky));

    // the plain altitude is always shown in whole meters
    fields.set(SesF::AltitudeM, round_fixed(track.altitude, 0));
    fields.set(SesF::AltitudeFt, round(track.altitude * M_TO_FT));
    fields.set(SesF::TrackTempC, round(track.track_temperature));
    fields.set(SesF::TrackTempF, round(celsius_to_fahrenheit(track.track_temperature)));
    fields.set(SesF::AirTempC, round(track.air_temperature));
    fields.set(SesF::AirTempF, round(celsius_to_fahrenheit(track.air_temperature)));
    fields.set(SesF::Humidity, round(track.humidity));
    fields.set(SesF::Fog, round(track.fog));
    fields.set(SesF::AirPressureHg, round(track.air_pressure));
    fields.set(SesF::AirPressureHpa, round(track.air_pressure * MMHG_TO_HPA));
    fields.set(SesF::WindSpeedMs, round(track.wind_speed));
    fields.set(SesF::WindSpeedKt, round(track.wind_speed * MS_TO_KNOTS));
    fields.set(SesF::WindSpeedKph, round(track.wind_speed * MS_TO_KPH));
    fields.set(SesF::WindDirDeg, round(radians_to_degrees(track.wind_direction)));

    fields
}

fn is_unlimited_time(seconds: f64) -> bool {
    !seconds.is_finite() || seconds >= f32::MAX as f64
}

/// lap_counter renders the composite lap counter, e.g. "lap 4 of 20", "3 laps remaining",
/// "finallap". Sessions without a lap limit count down the time remaining instead.
pub fn lap_counter(
    session: &SessionSnapshot,
    translation: &TranslationTable,
    countdown_from: i32,
    time_remaining: String,
) -> String {
    if session.laps_total < 1 || session.laps_total == i32::MAX {
        return if session.state == SessionState::Checkered {
            translation.translate("finishing").to_owned()
        } else {
            time_remaining
        };
    }

    match session.state {
        SessionState::Gridding => return translation.translate("gridding").to_owned(),
        SessionState::Pacing => return translation.translate("pacelap").to_owned(),
        _ => {}
    }

    if session.laps_remaining < 1 && session.laps_complete > 0 {
        translation.translate("finishing").to_owned()
    } else if session.laps_remaining == 1 {
        translation.translate("finallap").to_owned()
    } else if session.laps_remaining <= countdown_from {
        format!(
            "{} {} {}",
            session.laps_remaining,
            translation.translate("laps"),
            translation.translate("remaining")
        )
    } else {
        format!(
            "{} {} {} {}",
            translation.translate("lap"),
            session.laps_complete.max(0) + 1,
            translation.translate("of"),
            session.laps_total
        )
    }
}
