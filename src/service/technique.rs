//! Technique service.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{
    self, add_day_off, create_technique, end_technique, remove_day_off, toggle_day_off,
    update_technique,
};
use crate::clock::Clock;
use crate::config::ValidationLimits;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CalendarDay, NewTechnique, PortfolioSummary, RentalSummary, Technique, TechniqueUpdate,
    ToCalendarDay,
};
use crate::session::Session;
use crate::store::TechniqueRepository;
use crate::validation::Validate;

/// Keeps a snapshot of the caller's techniques and applies mutations to it.
///
/// Each mutation validates its input, runs the lifecycle or day-off engine
/// on the current snapshot, writes the result, and refetches the full list.
/// A failure at any step leaves both the store and the snapshot unchanged.
pub struct TechniqueService {
    repository: Arc<dyn TechniqueRepository>,
    clock: Arc<dyn Clock>,
    limits: ValidationLimits,
    techniques: Vec<Technique>,
}

impl TechniqueService {
    /// Creates a service with an empty snapshot.
    pub fn new(
        repository: Arc<dyn TechniqueRepository>,
        clock: Arc<dyn Clock>,
        limits: ValidationLimits,
    ) -> Self {
        Self {
            repository,
            clock,
            limits,
            techniques: Vec::new(),
        }
    }

    /// The current snapshot, oldest first.
    pub fn techniques(&self) -> &[Technique] {
        &self.techniques
    }

    /// Finds a technique in the snapshot.
    pub fn technique(&self, id: &str) -> EngineResult<&Technique> {
        self.techniques
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| EngineError::not_found("technique", id))
    }

    /// Refetches the snapshot. A signed-out session empties it.
    pub fn refresh(&mut self, session: &mut Session) -> EngineResult<()> {
        if !session.is_authenticated() {
            self.techniques.clear();
            return Ok(());
        }
        let repository = Arc::clone(&self.repository);
        let fetched = session.authorized(|c| repository.list_techniques(c));
        match fetched {
            Ok(techniques) => {
                debug!(count = techniques.len(), "Techniques refreshed");
                self.techniques = techniques;
                Ok(())
            }
            Err(e) => {
                if !session.is_authenticated() {
                    self.techniques.clear();
                }
                Err(e)
            }
        }
    }

    /// Refetches after a committed write. The write stands even if the
    /// refetch fails, so the failure is logged rather than returned.
    fn refresh_after_write(&mut self, session: &mut Session) {
        if let Err(err) = self.refresh(session) {
            warn!(error = %err, "Refresh after write failed; snapshot is stale");
        }
    }

    /// Adds a technique. It starts active unless an end date is given.
    pub fn add(&mut self, session: &mut Session, input: NewTechnique) -> EngineResult<Technique> {
        input.validate(&self.limits)?;
        let technique = create_technique(input, Uuid::new_v4().to_string(), Utc::now())?;

        let repository = Arc::clone(&self.repository);
        let stored = session.authorized(|c| repository.insert_technique(c, technique))?;
        info!(technique_id = %stored.id, status = %stored.status, "Technique added");

        self.refresh_after_write(session);
        Ok(stored)
    }

    /// Applies a partial update. Setting `end_date` ends the rental and
    /// clearing it reopens the rental.
    pub fn update(
        &mut self,
        session: &mut Session,
        id: &str,
        update: &TechniqueUpdate,
    ) -> EngineResult<Technique> {
        update.validate(&self.limits)?;
        let updated = update_technique(self.technique(id)?, update, self.clock.today())?;
        self.write(session, updated, "Technique updated")
    }

    /// Ends a rental on `end_date`, or today.
    pub fn end(
        &mut self,
        session: &mut Session,
        id: &str,
        end_date: Option<NaiveDate>,
    ) -> EngineResult<Technique> {
        let ended = end_technique(self.technique(id)?, end_date, self.clock.today())?;
        self.write(session, ended, "Technique ended")
    }

    /// Flips a day-off.
    pub fn toggle_day_off(
        &mut self,
        session: &mut Session,
        id: &str,
        day: impl ToCalendarDay,
    ) -> EngineResult<Technique> {
        let current = self.technique(id)?;
        let updated = Technique {
            day_offs: toggle_day_off(&current.day_offs, day),
            ..current.clone()
        };
        self.write(session, updated, "Day-off toggled")
    }

    /// Marks a day-off. Writes nothing if it is already marked.
    pub fn add_day_off(
        &mut self,
        session: &mut Session,
        id: &str,
        day: impl ToCalendarDay,
    ) -> EngineResult<Technique> {
        let current = self.technique(id)?;
        let day_offs = add_day_off(&current.day_offs, day);
        if day_offs == current.day_offs {
            return Ok(current.clone());
        }
        let updated = Technique {
            day_offs,
            ..current.clone()
        };
        self.write(session, updated, "Day-off added")
    }

    /// Unmarks a day-off. Writes nothing if it is not marked.
    pub fn remove_day_off(
        &mut self,
        session: &mut Session,
        id: &str,
        day: impl ToCalendarDay,
    ) -> EngineResult<Technique> {
        let current = self.technique(id)?;
        let day_offs = remove_day_off(&current.day_offs, day);
        if day_offs == current.day_offs {
            return Ok(current.clone());
        }
        let updated = Technique {
            day_offs,
            ..current.clone()
        };
        self.write(session, updated, "Day-off removed")
    }

    /// Deletes a technique.
    pub fn delete(&mut self, session: &mut Session, id: &str) -> EngineResult<()> {
        let repository = Arc::clone(&self.repository);
        session.authorized(|c| repository.delete_technique(c, id))?;
        info!(technique_id = %id, "Technique deleted");
        self.refresh_after_write(session);
        Ok(())
    }

    fn write(
        &mut self,
        session: &mut Session,
        technique: Technique,
        message: &'static str,
    ) -> EngineResult<Technique> {
        let repository = Arc::clone(&self.repository);
        let stored = session.authorized(|c| repository.update_technique(c, technique))?;
        info!(
            technique_id = %stored.id,
            version = stored.version,
            status = %stored.status,
            day_offs = stored.day_offs.len(),
            "{}",
            message
        );
        self.refresh_after_write(session);
        Ok(stored)
    }

    /// Ongoing rentals in the snapshot.
    pub fn active_techniques(&self) -> Vec<&Technique> {
        calculation::active_techniques(&self.techniques)
    }

    /// Ended rentals in the snapshot.
    pub fn ended_techniques(&self) -> Vec<&Technique> {
        calculation::ended_techniques(&self.techniques)
    }

    /// Accrued rent over ongoing rentals, as of today.
    pub fn total_active_rent(&self) -> Decimal {
        calculation::total_active_rent(&self.techniques, self.clock.today())
    }

    /// Derived figures for one rental, as of today.
    pub fn summary(&self, id: &str) -> EngineResult<RentalSummary> {
        Ok(calculation::summarize(self.technique(id)?, self.clock.today()))
    }

    /// Derived figures for every rental, as of today.
    pub fn portfolio(&self) -> PortfolioSummary {
        calculation::summarize_portfolio(&self.techniques, self.clock.today())
    }

    /// The month calendar of one rental.
    pub fn calendar(&self, id: &str, month: impl ToCalendarDay) -> EngineResult<Vec<CalendarDay>> {
        Ok(calculation::month_calendar(
            self.technique(id)?,
            month.calendar_day(),
            self.clock.today(),
        ))
    }
}
