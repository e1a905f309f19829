use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Statut d'un bloc pour un jour ouvré donné.
///
/// Sérialisé sous forme de chaîne brute (`"WFA"`, `"WFO"`, ...), pour rester
/// compatible avec les fichiers de configuration existants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    /// Télétravail libre ("work from anywhere") — le statut "absent du bureau".
    Wfa,
    /// Présence au bureau.
    Wfo,
    /// Télétravail à domicile.
    Wfh,
    /// Statut libre, non interprété.
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Wfa => "WFA",
            Status::Wfo => "WFO",
            Status::Wfh => "WFH",
            Status::Other(s) => s.as_str(),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "WFA" => Status::Wfa,
            "WFO" => Status::Wfo,
            "WFH" => Status::Wfh,
            _ => Status::Other(s),
        }
    }
}

impl From<&str> for Status {
    fn from(s: &str) -> Self {
        Status::from(s.to_owned())
    }
}

impl From<Status> for String {
    fn from(s: Status) -> Self {
        s.as_str().to_owned()
    }
}

/// Configuration de la rotation : blocs, motif de statuts, date d'ancrage.
///
/// Construite une fois à la frontière (CLI ou fichier calendrier) puis passée
/// aux fonctions pures — aucune lecture d'environnement dans le cœur de calcul.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationConfig {
    /// Identifiants de blocs, dans l'ordre (ex. A, B, C, D).
    pub blocks: Vec<String>,
    /// Motif de statuts, décalé circulairement à chaque jour ouvré.
    pub pattern: Vec<Status>,
    /// Date d'ancrage : aucun planning n'existe avant elle.
    pub start_date: NaiveDate,
    /// Statut considéré "absent" — seuls ces blocs sont émis.
    #[serde(default = "default_away_status")]
    pub away_status: Status,
    /// Décalage initial du motif, en jours ouvrés.
    #[serde(default)]
    pub offset: u32,
}

fn default_away_status() -> Status {
    Status::Wfa
}

impl RotationConfig {
    pub const DEFAULT_BLOCKS: [&'static str; 4] = ["A", "B", "C", "D"];

    /// Motif par défaut : premier bloc absent, les autres au bureau.
    pub fn default_pattern() -> Vec<Status> {
        vec![Status::Wfa, Status::Wfo, Status::Wfo, Status::Wfo]
    }

    pub fn new(blocks: Vec<String>, pattern: Vec<Status>, start_date: NaiveDate) -> Self {
        Self {
            blocks,
            pattern,
            start_date,
            away_status: Status::Wfa,
            offset: 0,
        }
    }

    /// Blocs effectifs (repli sur A/B/C/D si la liste est vide).
    pub fn effective_blocks(&self) -> Vec<String> {
        if self.blocks.is_empty() {
            Self::DEFAULT_BLOCKS.iter().map(|b| (*b).to_owned()).collect()
        } else {
            self.blocks.clone()
        }
    }

    /// Motif effectif (repli sur le motif par défaut si vide).
    pub fn effective_pattern(&self) -> Vec<Status> {
        if self.pattern.is_empty() {
            Self::default_pattern()
        } else {
            self.pattern.clone()
        }
    }
}

impl Default for RotationConfig {
    fn default() -> Self {
        let start_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        Self::new(
            Self::DEFAULT_BLOCKS.iter().map(|b| (*b).to_owned()).collect(),
            Self::default_pattern(),
            start_date,
        )
    }
}

/// Identifiant fort pour Holiday
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HolidayId(String);

impl HolidayId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Jour férié (exclu du décompte des jours ouvrés).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub id: HolidayId,
    pub date: NaiveDate,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Saisi à la main (true) ou importé d'une source externe (false).
    #[serde(default)]
    pub manual: bool,
}

impl Holiday {
    pub fn new<N: Into<String>>(date: NaiveDate, name: N) -> Self {
        Self {
            id: HolidayId::random(),
            date,
            name: name.into(),
            description: None,
            manual: false,
        }
    }

    pub fn manual<N: Into<String>>(date: NaiveDate, name: N, description: Option<String>) -> Self {
        Self {
            id: HolidayId::random(),
            date,
            name: name.into(),
            description,
            manual: true,
        }
    }
}

/// Identifiant fort pour Leave
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaveId(String);

impl LeaveId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Congé individuel, repéré par initiales (intervalle inclusif [start, end]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leave {
    pub id: LeaveId,
    /// Initiales, 1 à 3 caractères, stockées en majuscules.
    pub initials: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Leave {
    /// Crée un congé en validant initiales et bornes (`end >= start`).
    pub fn new<S: AsRef<str>>(
        initials: S,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, String> {
        let initials = initials.as_ref().trim().to_ascii_uppercase();
        if initials.is_empty() {
            return Err("initials are required".to_string());
        }
        if initials.chars().count() > 3 {
            return Err("initials must be at most 3 characters".to_string());
        }
        if end < start {
            return Err("leave end cannot be before start".to_string());
        }
        Ok(Self {
            id: LeaveId::random(),
            initials,
            start,
            end,
        })
    }

    /// Durée en jours calendaires (bornes incluses).
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Vrai si le congé intersecte l'intervalle inclusif donné.
    pub fn overlaps_range(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start <= end && start <= self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Entrée de planning dérivée (jamais persistée).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub date: NaiveDate,
    pub block: String,
    pub status: Status,
}

/// Action tracée dans le journal d'audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    AddHoliday,
    RemoveHoliday,
    ImportHolidays,
    AddLeave,
    ImportLeaves,
    UpdateLeave,
    RemoveLeave,
    SetRotation,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::AddHoliday => "add_holiday",
            AuditAction::RemoveHoliday => "remove_holiday",
            AuditAction::ImportHolidays => "import_holidays",
            AuditAction::AddLeave => "add_leave",
            AuditAction::ImportLeaves => "import_leaves",
            AuditAction::UpdateLeave => "update_leave",
            AuditAction::RemoveLeave => "remove_leave",
            AuditAction::SetRotation => "set_rotation",
        }
    }
}

/// Trace d'une mutation du calendrier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    pub action: AuditAction,
    pub details: String,
    pub at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new<D: Into<String>>(action: AuditAction, details: D) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            action,
            details: details.into(),
            at: Utc::now(),
        }
    }
}

/// Calendrier complet persisté (rotation, fériés, congés, audit).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Calendar {
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub holidays: Vec<Holiday>,
    #[serde(default)]
    pub leaves: Vec<Leave>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audit: Vec<AuditEntry>,
}

impl Calendar {
    pub fn find_holiday_by_id<'a>(&'a self, id: &HolidayId) -> Option<&'a Holiday> {
        self.holidays.iter().find(|h| &h.id == id)
    }
    pub fn find_holiday_by_date<'a>(&'a self, date: NaiveDate) -> Option<&'a Holiday> {
        self.holidays.iter().find(|h| h.date == date)
    }
    pub fn find_leave_by_id<'a>(&'a self, id: &LeaveId) -> Option<&'a Leave> {
        self.leaves.iter().find(|l| &l.id == id)
    }
    pub fn find_leave_mut_by_id(&mut self, id: &LeaveId) -> Option<&mut Leave> {
        self.leaves.iter_mut().find(|l| &l.id == id)
    }
}
