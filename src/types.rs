use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CardioValues {
    pub duration: String,
    pub level: String,
    pub rpm: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CardioMainValues {
    pub cycles: String,
    pub duration: String,
    pub level: String,
    pub rpm: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CardioProtocolData {
    pub warmup: CardioValues,
    pub main: CardioMainValues,
    pub high: CardioMainValues,
    pub cooldown: CardioValues,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardioPhase {
    Warmup,
    Main,
    High,
    Cooldown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardioField {
    Duration,
    Level,
    Rpm,
    Cycles,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeightMode {
    Standard,
    Split,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SplitWeights {
    pub set1: String,
    pub set2: String,
    pub set3: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetSlot {
    One,
    Two,
    Three,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExerciseField {
    Weight,
    Reps,
    SplitSet(SetSlot),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub reps: String,
    #[serde(rename = "weightMode")]
    pub weight_mode: WeightMode,
    pub weight: String,
    #[serde(rename = "splitWeights")]
    pub split_weights: SplitWeights,
    pub progress: [bool; 3],
    #[serde(rename = "isDone")]
    pub is_done: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutDay {
    pub day: String,
    pub icon: String,
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
    pub exercises: Vec<Exercise>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Cardio,
    Strength,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum SplitKind {
    #[serde(rename = "5-day")]
    FiveDay,
    #[serde(rename = "3-day")]
    ThreeDay,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Language {
    #[serde(rename = "en")]
    En,
    #[serde(rename = "ro")]
    Ro,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSettings {
    #[serde(rename = "cardioVisible")]
    pub cardio_visible: bool,
    #[serde(rename = "sectionsOrder")]
    pub sections_order: [Section; 2],
    #[serde(rename = "activeSplit")]
    pub active_split: SplitKind,
    pub theme: Theme,
    pub language: Language,
}

impl Default for WorkoutSettings {
    fn default() -> Self {
        Self {
            cardio_visible: true,
            sections_order: [Section::Cardio, Section::Strength],
            active_split: SplitKind::FiveDay,
            theme: Theme::Light,
            language: Language::En,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutPlan {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub cardio: CardioProtocolData,
    #[serde(rename = "fiveDaySplit")]
    pub five_day_split: Vec<WorkoutDay>,
    #[serde(rename = "threeDaySplit")]
    pub three_day_split: Vec<WorkoutDay>,
    #[serde(default)]
    pub settings: WorkoutSettings,
}

impl WorkoutPlan {
    /// The schedule selected by `settings.active_split`.
    pub fn active_days(&self) -> &[WorkoutDay] {
        match self.settings.active_split {
            SplitKind::ThreeDay => &self.three_day_split,
            SplitKind::FiveDay => &self.five_day_split,
        }
    }

    pub fn active_days_mut(&mut self) -> &mut Vec<WorkoutDay> {
        match self.settings.active_split {
            SplitKind::ThreeDay => &mut self.three_day_split,
            SplitKind::FiveDay => &mut self.five_day_split,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Profile document, bound 1:1 to a plan via `workout_id`. The date of birth
/// is stored both whole and decomposed so nothing locale-dependent has to be
/// parsed after signup.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(rename = "firstName")]
    pub first_name: String,
    pub email: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    #[serde(rename = "dateOfBirth", default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(rename = "dobDay", default, skip_serializing_if = "Option::is_none")]
    pub dob_day: Option<String>,
    #[serde(rename = "dobMonth", default, skip_serializing_if = "Option::is_none")]
    pub dob_month: Option<String>,
    #[serde(rename = "dobYear", default, skip_serializing_if = "Option::is_none")]
    pub dob_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(rename = "workoutId")]
    pub workout_id: String,
    #[serde(rename = "isAdmin", default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.is_admin.unwrap_or(false)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppView {
    Login,
    Welcome,
    Tracker,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncStatus {
    Connecting,
    Syncing,
    Synced,
    Error,
    Offline,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Connecting => "connecting",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Synced => "synced",
            SyncStatus::Error => "error",
            SyncStatus::Offline => "offline",
        }
    }
}
