//! Worker, payment and note service.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{self, month_start, normalize_text};
use crate::clock::Clock;
use crate::config::ValidationLimits;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    NewPayment, NewWorker, NewWorkerNote, Payment, PaymentStatus, PaymentWithWorker,
    ToCalendarDay, Worker, WorkerMonthSummary, WorkerNote, WorkerNoteUpdate, WorkerUpdate,
};
use crate::session::Session;
use crate::store::{PaymentRepository, WorkerRepository};
use crate::validation::Validate;

/// Keeps snapshots of the caller's workers and payments, and a selected month
/// that the "this month" queries refer to.
pub struct WorkerService {
    workers_repository: Arc<dyn WorkerRepository>,
    payments_repository: Arc<dyn PaymentRepository>,
    limits: ValidationLimits,
    recent_payments_limit: usize,
    selected_month: NaiveDate,
    workers: Vec<Worker>,
    payments: Vec<Payment>,
}

impl WorkerService {
    /// Creates a service with empty snapshots and the current month selected.
    pub fn new(
        workers_repository: Arc<dyn WorkerRepository>,
        payments_repository: Arc<dyn PaymentRepository>,
        clock: &dyn Clock,
        limits: ValidationLimits,
        recent_payments_limit: usize,
    ) -> Self {
        Self {
            workers_repository,
            payments_repository,
            limits,
            recent_payments_limit,
            selected_month: month_start(clock.today()),
            workers: Vec::new(),
            payments: Vec::new(),
        }
    }

    /// The worker snapshot, oldest first.
    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// The payment snapshot.
    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    /// Finds a worker in the snapshot.
    pub fn worker(&self, id: &str) -> EngineResult<&Worker> {
        self.workers
            .iter()
            .find(|w| w.id == id)
            .ok_or_else(|| EngineError::not_found("worker", id))
    }

    /// The first day of the selected month.
    pub fn selected_month(&self) -> NaiveDate {
        self.selected_month
    }

    /// Selects the month containing `day`.
    pub fn set_selected_month(&mut self, day: impl ToCalendarDay) {
        self.selected_month = month_start(day.calendar_day());
    }

    /// Refetches workers and payments. A signed-out session empties both.
    pub fn refresh(&mut self, session: &mut Session) -> EngineResult<()> {
        if !session.is_authenticated() {
            self.workers.clear();
            self.payments.clear();
            return Ok(());
        }
        let workers_repository = Arc::clone(&self.workers_repository);
        let payments_repository = Arc::clone(&self.payments_repository);
        let fetched = session.authorized(|c| {
            Ok((
                workers_repository.list_workers(c)?,
                payments_repository.list_payments(c)?,
            ))
        });
        match fetched {
            Ok((workers, payments)) => {
                debug!(workers = workers.len(), payments = payments.len(), "Workers refreshed");
                self.workers = workers;
                self.payments = payments;
                Ok(())
            }
            Err(e) => {
                if !session.is_authenticated() {
                    self.workers.clear();
                    self.payments.clear();
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

    /// Adds a worker.
    pub fn add_worker(&mut self, session: &mut Session, input: NewWorker) -> EngineResult<Worker> {
        input.validate(&self.limits)?;
        let worker = Worker {
            id: Uuid::new_v4().to_string(),
            full_name: input.full_name.trim().to_string(),
            position: input.position.trim().to_string(),
            monthly_salary: input.monthly_salary,
            description: normalize_text(input.description),
            photo: normalize_text(input.photo),
            created_at: Utc::now(),
            notes: Vec::new(),
            version: 0,
        };

        let repository = Arc::clone(&self.workers_repository);
        let stored = session.authorized(|c| repository.insert_worker(c, worker))?;
        info!(worker_id = %stored.id, "Worker added");
        self.refresh_after_write(session);
        Ok(stored)
    }

    /// Applies a partial update to a worker.
    pub fn update_worker(
        &mut self,
        session: &mut Session,
        id: &str,
        update: &WorkerUpdate,
    ) -> EngineResult<Worker> {
        update.validate(&self.limits)?;
        let mut worker = self.worker(id)?.clone();
        if let Some(name) = &update.full_name {
            worker.full_name = name.trim().to_string();
        }
        if let Some(position) = &update.position {
            worker.position = position.trim().to_string();
        }
        if let Some(salary) = update.monthly_salary {
            worker.monthly_salary = salary;
        }
        if let Some(description) = &update.description {
            worker.description = normalize_text(description.clone());
        }
        if let Some(photo) = &update.photo {
            worker.photo = normalize_text(photo.clone());
        }
        self.write_worker(session, worker, "Worker updated")
    }

    /// Deletes a worker. Their payments are kept and drop out of the recent
    /// payment list.
    pub fn delete_worker(&mut self, session: &mut Session, id: &str) -> EngineResult<()> {
        let repository = Arc::clone(&self.workers_repository);
        session.authorized(|c| repository.delete_worker(c, id))?;
        info!(worker_id = %id, "Worker deleted");
        self.refresh_after_write(session);
        Ok(())
    }

    /// Records a payment.
    pub fn add_payment(&mut self, session: &mut Session, input: NewPayment) -> EngineResult<Payment> {
        input.validate(&self.limits)?;
        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            worker_id: input.worker_id,
            amount: input.amount,
            date: input.date,
            note: normalize_text(input.note),
        };

        let repository = Arc::clone(&self.payments_repository);
        let stored = session.authorized(|c| repository.insert_payment(c, payment))?;
        info!(
            payment_id = %stored.id,
            worker_id = %stored.worker_id,
            amount = %stored.amount,
            date = %stored.date,
            "Payment recorded"
        );
        self.refresh_after_write(session);
        Ok(stored)
    }

    /// Deletes a payment.
    pub fn delete_payment(&mut self, session: &mut Session, id: &str) -> EngineResult<()> {
        let repository = Arc::clone(&self.payments_repository);
        session.authorized(|c| repository.delete_payment(c, id))?;
        info!(payment_id = %id, "Payment deleted");
        self.refresh_after_write(session);
        Ok(())
    }

    /// Attaches a note to a worker.
    pub fn add_note(
        &mut self,
        session: &mut Session,
        worker_id: &str,
        input: NewWorkerNote,
    ) -> EngineResult<WorkerNote> {
        input.validate(&self.limits)?;
        let note = WorkerNote {
            id: Uuid::new_v4().to_string(),
            title: normalize_text(input.title),
            content: input.content.trim().to_string(),
            created_at: Utc::now(),
        };
        let mut worker = self.worker(worker_id)?.clone();
        worker.notes.push(note.clone());
        self.write_worker(session, worker, "Note added")?;
        Ok(note)
    }

    /// Applies a partial update to a note.
    pub fn update_note(
        &mut self,
        session: &mut Session,
        worker_id: &str,
        note_id: &str,
        update: &WorkerNoteUpdate,
    ) -> EngineResult<WorkerNote> {
        update.validate(&self.limits)?;
        let mut worker = self.worker(worker_id)?.clone();
        let note = worker
            .notes
            .iter_mut()
            .find(|n| n.id == note_id)
            .ok_or_else(|| EngineError::not_found("note", note_id))?;
        if let Some(title) = &update.title {
            note.title = normalize_text(title.clone());
        }
        if let Some(content) = &update.content {
            note.content = content.trim().to_string();
        }
        let updated = note.clone();
        self.write_worker(session, worker, "Note updated")?;
        Ok(updated)
    }

    /// Removes a note from a worker.
    pub fn delete_note(
        &mut self,
        session: &mut Session,
        worker_id: &str,
        note_id: &str,
    ) -> EngineResult<()> {
        let mut worker = self.worker(worker_id)?.clone();
        let before = worker.notes.len();
        worker.notes.retain(|n| n.id != note_id);
        if worker.notes.len() == before {
            return Err(EngineError::not_found("note", note_id));
        }
        self.write_worker(session, worker, "Note deleted")?;
        Ok(())
    }

    fn write_worker(
        &mut self,
        session: &mut Session,
        worker: Worker,
        message: &'static str,
    ) -> EngineResult<Worker> {
        let repository = Arc::clone(&self.workers_repository);
        let stored = session.authorized(|c| repository.update_worker(c, worker))?;
        info!(
            worker_id = %stored.id,
            version = stored.version,
            notes = stored.notes.len(),
            "{}",
            message
        );
        self.refresh_after_write(session);
        Ok(stored)
    }

    /// Every payment made to a worker.
    pub fn worker_payments(&self, worker_id: &str) -> Vec<&Payment> {
        calculation::worker_payments(&self.payments, worker_id)
    }

    /// A worker's payments in the month containing `month`.
    pub fn monthly_payments(&self, worker_id: &str, month: impl ToCalendarDay) -> Vec<&Payment> {
        calculation::monthly_payments(&self.payments, worker_id, month.calendar_day())
    }

    /// A worker's total for the selected month.
    pub fn total_paid_this_month(&self, worker_id: &str) -> Decimal {
        calculation::total_paid(&self.payments, worker_id, self.selected_month)
    }

    /// A worker's status for the selected month; `None` for unknown workers.
    pub fn payment_status(&self, worker_id: &str) -> PaymentStatus {
        match self.worker(worker_id) {
            Ok(worker) => {
                calculation::payment_status(self.total_paid_this_month(worker_id), worker.monthly_salary)
            }
            Err(_) => PaymentStatus::None,
        }
    }

    /// A worker's payments and status for the selected month.
    pub fn worker_month_summary(&self, worker_id: &str) -> EngineResult<WorkerMonthSummary> {
        Ok(calculation::worker_month_summary(
            self.worker(worker_id)?,
            &self.payments,
            self.selected_month,
        ))
    }

    /// Workers fully paid in the selected month.
    pub fn fully_paid_count(&self) -> usize {
        calculation::fully_paid_count(&self.workers, &self.payments, self.selected_month)
    }

    /// Everything paid to anyone in the month containing `month`.
    pub fn total_payments_for_month(&self, month: impl ToCalendarDay) -> Decimal {
        calculation::total_payments_for_month(&self.payments, month.calendar_day())
    }

    /// The latest payments with their workers; `limit` defaults to the
    /// configured size.
    pub fn recent_payments(&self, limit: Option<usize>) -> Vec<PaymentWithWorker> {
        calculation::recent_payments(
            &self.payments,
            &self.workers,
            limit.unwrap_or(self.recent_payments_limit),
        )
    }
}
