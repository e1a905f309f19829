use crate::model::{
    AuditAction, AuditEntry, Calendar, Holiday, HolidayId, Leave, LeaveId, RotationConfig,
    ScheduleEntry,
};
use crate::rotation::{self, RotationError};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error(transparent)]
    Rotation(#[from] RotationError),
    #[error("invalid month: {0}")]
    InvalidMonth(u32),
    #[error("invalid leave: {0}")]
    InvalidLeave(String),
    #[error("a holiday already exists on {0}")]
    DuplicateHoliday(NaiveDate),
    #[error("unknown holiday: {0}")]
    UnknownHoliday(String),
    #[error("unknown leave: {0}")]
    UnknownLeave(String),
    #[error("leave already exists for {initials} on: {ranges}")]
    LeaveConflict { initials: String, ranges: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Paire de congés qui se chevauchent pour les mêmes initiales.
#[derive(Debug, Clone)]
pub struct LeaveOverlap {
    pub initials: String,
    pub leave_a: LeaveId,
    pub leave_b: LeaveId,
}

/// Vue combinée d'un intervalle : planning, fériés, congés — l'équivalent
/// d'un aller-retour unique côté appelant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarView {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub entries: Vec<ScheduleEntry>,
    pub holidays: Vec<Holiday>,
    pub leaves: Vec<Leave>,
}

/// Premier et dernier jour d'un mois calendaire.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next_month.pred_opt()?))
}

/// Planner : encapsule un Calendar et journalise chaque mutation.
#[derive(Debug, Default)]
pub struct Planner {
    calendar: Calendar,
}

impl Planner {
    pub fn new() -> Self {
        Self {
            calendar: Calendar::default(),
        }
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }
    pub fn calendar_mut(&mut self) -> &mut Calendar {
        &mut self.calendar
    }

    pub fn rotation(&self) -> &RotationConfig {
        &self.calendar.rotation
    }

    pub fn set_rotation(&mut self, config: RotationConfig) {
        let details = format!(
            "blocks={} pattern_len={} start={}",
            config.blocks.join(","),
            config.pattern.len(),
            config.start_date
        );
        self.calendar.rotation = config;
        self.audit(AuditAction::SetRotation, details);
    }

    fn audit<D: Into<String>>(&mut self, action: AuditAction, details: D) {
        self.calendar.audit.push(AuditEntry::new(action, details));
    }

    /// Ajoute un férié saisi à la main. Refuse un doublon de date.
    pub fn add_holiday(
        &mut self,
        date: NaiveDate,
        name: &str,
        description: Option<String>,
    ) -> Result<HolidayId, PlanError> {
        if self.calendar.find_holiday_by_date(date).is_some() {
            return Err(PlanError::DuplicateHoliday(date));
        }
        let holiday = Holiday::manual(date, name, description);
        let id = holiday.id.clone();
        let details = format!("date={date} name={name}");
        self.calendar.holidays.push(holiday);
        self.calendar.holidays.sort_by_key(|h| h.date);
        self.audit(AuditAction::AddHoliday, details);
        Ok(id)
    }

    /// Import en masse : une date déjà connue garde son id, nom et
    /// description sont rafraîchis. Retourne le nombre de fériés touchés.
    pub fn upsert_holidays(&mut self, incoming: Vec<Holiday>) -> usize {
        let mut touched = 0;
        for holiday in incoming {
            if let Some(existing) = self
                .calendar
                .holidays
                .iter_mut()
                .find(|h| h.date == holiday.date)
            {
                existing.name = holiday.name;
                existing.description = holiday.description;
            } else {
                self.calendar.holidays.push(holiday);
            }
            touched += 1;
        }
        self.calendar.holidays.sort_by_key(|h| h.date);
        if touched > 0 {
            self.audit(AuditAction::ImportHolidays, format!("count={touched}"));
        }
        touched
    }

    pub fn remove_holiday(&mut self, id: &HolidayId) -> Result<Holiday, PlanError> {
        let pos = self
            .calendar
            .holidays
            .iter()
            .position(|h| &h.id == id)
            .ok_or_else(|| PlanError::UnknownHoliday(id.as_str().to_string()))?;
        let removed = self.calendar.holidays.remove(pos);
        self.audit(
            AuditAction::RemoveHoliday,
            format!("date={} name={}", removed.date, removed.name),
        );
        Ok(removed)
    }

    pub fn holidays_in_year(&self, year: i32) -> Vec<&Holiday> {
        let mut out: Vec<&Holiday> = self
            .calendar
            .holidays
            .iter()
            .filter(|h| h.date.year() == year)
            .collect();
        out.sort_by_key(|h| h.date);
        out
    }

    /// Ajoute un congé après validation et contrôle de chevauchement pour
    /// les mêmes initiales.
    pub fn add_leave(
        &mut self,
        initials: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<LeaveId, PlanError> {
        let leave = Leave::new(initials, start, end).map_err(PlanError::InvalidLeave)?;
        self.check_leave_conflicts(&leave, None)?;
        let id = leave.id.clone();
        let details = format!("initials={} {}..{}", leave.initials, leave.start, leave.end);
        self.calendar.leaves.push(leave);
        self.calendar.leaves.sort_by_key(|l| l.start);
        self.audit(AuditAction::AddLeave, details);
        Ok(id)
    }

    /// Import en masse : les congés sont ajoutés tels quels, les
    /// chevauchements éventuels restent à la charge de `detect_overlaps`.
    pub fn import_leaves(&mut self, incoming: Vec<Leave>) -> usize {
        let count = incoming.len();
        self.calendar.leaves.extend(incoming);
        self.calendar.leaves.sort_by_key(|l| l.start);
        if count > 0 {
            self.audit(AuditAction::ImportLeaves, format!("count={count}"));
        }
        count
    }

    /// Remplace les bornes/initiales d'un congé existant, même validation
    /// qu'à la création (le congé édité est exclu du contrôle).
    pub fn update_leave(
        &mut self,
        id: &LeaveId,
        initials: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(), PlanError> {
        if self.calendar.find_leave_by_id(id).is_none() {
            return Err(PlanError::UnknownLeave(id.as_str().to_string()));
        }
        let candidate = Leave::new(initials, start, end).map_err(PlanError::InvalidLeave)?;
        self.check_leave_conflicts(&candidate, Some(id))?;

        let leave = self
            .calendar
            .find_leave_mut_by_id(id)
            .ok_or_else(|| PlanError::UnknownLeave(id.as_str().to_string()))?;
        leave.initials = candidate.initials;
        leave.start = candidate.start;
        leave.end = candidate.end;
        let details = format!(
            "id={} initials={} {}..{}",
            id.as_str(),
            leave.initials,
            leave.start,
            leave.end
        );
        self.calendar.leaves.sort_by_key(|l| l.start);
        self.audit(AuditAction::UpdateLeave, details);
        Ok(())
    }

    pub fn remove_leave(&mut self, id: &LeaveId) -> Result<Leave, PlanError> {
        let pos = self
            .calendar
            .leaves
            .iter()
            .position(|l| &l.id == id)
            .ok_or_else(|| PlanError::UnknownLeave(id.as_str().to_string()))?;
        let removed = self.calendar.leaves.remove(pos);
        self.audit(
            AuditAction::RemoveLeave,
            format!("initials={} {}..{}", removed.initials, removed.start, removed.end),
        );
        Ok(removed)
    }

    fn check_leave_conflicts(
        &self,
        candidate: &Leave,
        exclude: Option<&LeaveId>,
    ) -> Result<(), PlanError> {
        let colliding: Vec<&Leave> = self
            .calendar
            .leaves
            .iter()
            .filter(|l| {
                l.initials == candidate.initials
                    && exclude.map(|id| &l.id != id).unwrap_or(true)
                    && l.overlaps_range(candidate.start, candidate.end)
            })
            .collect();
        if colliding.is_empty() {
            return Ok(());
        }
        let ranges = colliding
            .iter()
            .map(|l| format_leave_range(l))
            .collect::<Vec<_>>()
            .join(", ");
        Err(PlanError::LeaveConflict {
            initials: candidate.initials.clone(),
            ranges,
        })
    }

    /// Congés intersectant `[start, end]` : débutant, finissant, ou
    /// couvrant entièrement l'intervalle.
    pub fn leaves_overlapping(&self, start: NaiveDate, end: NaiveDate) -> Vec<&Leave> {
        let mut out: Vec<&Leave> = self
            .calendar
            .leaves
            .iter()
            .filter(|l| l.overlaps_range(start, end))
            .collect();
        out.sort_by_key(|l| l.start);
        out
    }

    /// Recherche par initiales (sous-chaîne, insensible à la casse).
    pub fn leaves_for_initials(&self, query: &str) -> Vec<&Leave> {
        let needle = query.trim().to_ascii_uppercase();
        let mut out: Vec<&Leave> = self
            .calendar
            .leaves
            .iter()
            .filter(|l| l.initials.contains(&needle))
            .collect();
        out.sort_by_key(|l| l.start);
        out
    }

    /// Balayage en paires des congés persistés (données importées comprises).
    pub fn detect_overlaps(&self) -> Vec<LeaveOverlap> {
        let mut out = Vec::new();
        let leaves = &self.calendar.leaves;
        for i in 0..leaves.len() {
            for j in i + 1..leaves.len() {
                let (a, b) = (&leaves[i], &leaves[j]);
                if a.initials == b.initials && a.overlaps_range(b.start, b.end) {
                    out.push(LeaveOverlap {
                        initials: a.initials.clone(),
                        leave_a: a.id.clone(),
                        leave_b: b.id.clone(),
                    });
                }
            }
        }
        out
    }

    /// Vue combinée sur un intervalle arbitraire.
    pub fn range_view(&self, start: NaiveDate, end: NaiveDate) -> Result<CalendarView, PlanError> {
        let result = rotation::compute(start, end, &self.calendar.rotation, &self.calendar.holidays)?;
        let leaves = self
            .leaves_overlapping(start, end)
            .into_iter()
            .cloned()
            .collect();
        Ok(CalendarView {
            start,
            end,
            entries: result.entries,
            holidays: result.holidays,
            leaves,
        })
    }

    /// Vue combinée sur un mois calendaire.
    pub fn month_view(&self, year: i32, month: u32) -> Result<CalendarView, PlanError> {
        let (start, end) = month_bounds(year, month).ok_or(PlanError::InvalidMonth(month))?;
        self.range_view(start, end)
    }
}

fn format_leave_range(leave: &Leave) -> String {
    if leave.start == leave.end {
        leave.start.to_string()
    } else {
        format!("{} - {}", leave.start, leave.end)
    }
}
