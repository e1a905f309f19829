#![forbid(unsafe_code)]
//! Rotaplan — bibliothèque de calendrier de rotation télétravail locale (sans BD).
//!
//! - Stockage fichiers (JSON/CSV).
//! - Planning calculé à la volée : la position dans la rotation est une
//!   fonction pure de la date d'ancrage, du motif et des jours fériés.
//! - Gestion des fériés et des congés, journal d'audit.
//! - Dates calendaires naïves ; les heures n'entrent pas en jeu.

pub mod io;
pub mod model;
pub mod planner;
pub mod report;
pub mod rotation;
pub mod storage;

pub use model::{
    AuditAction, AuditEntry, Calendar, Holiday, HolidayId, Leave, LeaveId, RotationConfig,
    ScheduleEntry, Status,
};
pub use planner::{month_bounds, CalendarView, LeaveOverlap, PlanError, Planner};
pub use report::{prepare_report, Report, ReportRenderer, TextReport};
pub use rotation::{compute, day_statuses, RotationError, ScheduleResult};
pub use storage::{JsonStorage, Storage};
