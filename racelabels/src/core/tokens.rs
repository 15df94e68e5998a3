use std::marker::PhantomData;

/// TokenSet is a fixed, ordered table of field names for one label domain. The slot of a field
/// is its position in the table. Saved themes reference fields by name, compiled labels by
/// slot, so new fields must only ever be appended.
pub trait TokenSet: Copy + Eq + std::fmt::Debug + 'static {
    const ALL: &'static [Self];

    /// Whether `{external:n}` references resolve in this domain.
    const EXTERNAL: bool;

    fn name(self) -> &'static str;

    fn slot(self) -> usize;

    fn count() -> usize {
        Self::ALL.len()
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// external_slot returns the slot of the n-th external data column, placed after the table.
    fn external_slot(n: usize) -> usize {
        Self::count() + n
    }
}

macro_rules! token_table {
    (
        $(#[$meta:meta])*
        pub enum $ty:ident, external = $ext:expr;
        $($variant:ident => $name:literal,)*
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $ty {
            $($variant,)*
        }

        impl TokenSet for $ty {
            const ALL: &'static [Self] = &[$($ty::$variant,)*];
            const EXTERNAL: bool = $ext;

            fn name(self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)*
                }
            }

            fn slot(self) -> usize {
                self as usize
            }
        }
    };
}

token_table! {
    /// Fields describing one driver standing.
    pub enum StandingField, external = true;
    FullName => "fullname",
    ShortName => "shortname",
    Initials => "initials",
    License => "license",
    Club => "club",
    Car => "car",
    Class => "class",
    CarNum => "carnum",
    FastLap => "fastlap",
    PrevLap => "prevlap",
    CurLap => "curlap",
    LapNum => "lapnum",
    SpeedFastMph => "speedfast_mph",
    SpeedPrevMph => "speedprev_mph",
    SpeedFastKph => "speedfast_kph",
    SpeedPrevKph => "speedprev_kph",
    Position => "position",
    PositionOrd => "position_ord",
    Gap => "gap",
    LapsLed => "lapsled",
    DriverId => "driverid",
    Interval => "interval",
    IntervalTime => "interval_time",
    LiveGap => "livegap",
    LiveInterval => "liveinterval",
    LiveSpeedKph => "livespeed_kph",
    LiveSpeedMph => "livespeed_mph",
    Sector1 => "sector1",
    Sector2 => "sector2",
    Sector3 => "sector3",
    PitStops => "pitstops",
    PitStopTime => "pitstoptime",
    Sector1SpeedKph => "sector1_speed_kph",
    Sector2SpeedKph => "sector2_speed_kph",
    Sector3SpeedKph => "sector3_speed_kph",
    Sector1SpeedMph => "sector1_speed_mph",
    Sector2SpeedMph => "sector2_speed_mph",
    Sector3SpeedMph => "sector3_speed_mph",
    PositionGain => "positiongain",
    ClassPosition => "classposition",
    ClassPositionOrd => "classposition_ord",
    ClassPositionGain => "classpositiongain",
    ClassGap => "classgap",
    ClassLiveGap => "classlivegap",
    ClassInterval => "classinterval",
    ClassLiveInterval => "classliveinterval",
    ClassLapsLed => "classlapsled",
    StartPosition => "startposition",
    ClassStartPosition => "classstartposition",
    ClassStartPositionOrd => "classstartposition_ord",
    StartPositionOrd => "startposition_ord",
    HighestPosition => "highestposition",
    HighestPositionOrd => "highestposition_ord",
    LowestPosition => "lowestposition",
    LowestPositionOrd => "lowestposition_ord",
    ClassHighestPosition => "classhighestposition",
    ClassHighestPositionOrd => "classhighestposition_ord",
    ClassLowestPosition => "classlowestposition",
    ClassLowestPositionOrd => "classlowestposition_ord",
    Points => "points",
    PointsPos => "points_pos",
    PointsPosOrd => "points_pos_ord",
    LivePosition => "liveposition",
    LivePositionOrd => "liveposition_ord",
    ClassLivePosition => "classliveposition",
    ClassLivePositionOrd => "classliveposition_ord",
    IRating => "irating",
    LiveIntervalFollowed => "liveintervalfollowed",
    InPit => "inpit",
    TeamId => "teamid",
    TeamName => "teamname",
}

token_table! {
    /// Fields describing the state of a session and its track.
    pub enum SessionField, external = false;
    LapsTotal => "lapstotal",
    LapsRemaining => "lapsremaining",
    TimeTotal => "timetotal",
    TimeRemaining => "timeremaining",
    LapsCompleted => "lapscompleted",
    TimePassed => "timepassed",
    LapCounter => "lapcounter",
    TrackName => "trackname",
    TrackLenMi => "tracklen_mi",
    TrackLenKm => "tracklen_km",
    Cautions => "cautions",
    CautionLaps => "cautionlaps",
    LeadChanges => "leadchanges",
    SessionType => "sessiontype",
    CurrentLap => "currentlap",
    Turns => "turns",
    City => "city",
    Country => "country",
    AltitudeM => "altitude_m",
    Sky => "sky",
    TrackTempC => "tracktemp_c",
    AirTempC => "airtemp_c",
    Humidity => "humidity",
    Fog => "fog",
    AirPressureHg => "airpressure_hg",
    WindSpeedMs => "windspeed_ms",
    WindDirDeg => "winddir_deg",
    AltitudeFt => "altitude_ft",
    TrackTempF => "tracktemp_f",
    AirTempF => "airtemp_f",
    AirPressureHpa => "airpressure_hpa",
    WindSpeedKt => "windspeed_kt",
    WindSpeedKph => "windspeed_kph",
}

/// FieldValues is the computed text of every field of one domain, followed by any external
/// data columns. Fields are addressed by their typed name, slots only exist for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValues<F: TokenSet> {
    values: Vec<String>,
    external: Vec<String>,
    _fields: PhantomData<F>,
}

pub type StandingFields = FieldValues<StandingField>;
pub type SessionFields = FieldValues<SessionField>;

impl<F: TokenSet> FieldValues<F> {
    /// new creates a value set with every field empty.
    pub fn new() -> FieldValues<F> {
        FieldValues {
            values: vec![String::new(); F::count()],
            external: Vec::new(),
            _fields: PhantomData,
        }
    }

    pub fn set<S: Into<String>>(&mut self, field: F, value: S) {
        self.values[field.slot()] = value.into();
    }

    pub fn get(&self, field: F) -> &str {
        &self.values[field.slot()]
    }

    pub fn set_external(&mut self, external: Vec<String>) {
        self.external = external;
    }

    /// slot returns the text at a positional slot, including the trailing external columns.
    pub fn slot(&self, slot: usize) -> Option<&str> {
        if slot < self.values.len() {
            Some(&self.values[slot])
        } else {
            self.external.get(slot - self.values.len()).map(|s| s.as_str())
        }
    }

    /// len is the number of slots, i.e. fixed fields plus external columns.
    pub fn len(&self) -> usize {
        self.values.len() + self.external.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<F: TokenSet> Default for FieldValues<F> {
    fn default() -> Self {
        FieldValues::new()
    }
}
