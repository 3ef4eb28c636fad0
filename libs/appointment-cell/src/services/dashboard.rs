use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;

use shared_database::Database;
use shared_models::appointment::{AppointmentFilter, AppointmentRecord};

use crate::models::{AdminDashboard, AppointmentError, AppointmentScope, DoctorDashboard};
use crate::services::booking::AppointmentBookingService;

pub const LATEST_APPOINTMENTS: usize = 5;

pub struct DashboardService {
    db: Database,
    booking: AppointmentBookingService,
}

impl DashboardService {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            booking: AppointmentBookingService::new(db),
        }
    }

    pub async fn doctor_dashboard(&self, doctor_id: Uuid) -> Result<DoctorDashboard, AppointmentError> {
        let appointments = self
            .booking
            .list_for(AppointmentScope::Doctor(doctor_id))
            .await?;

        let dashboard = DoctorDashboard {
            earnings: earnings(&appointments),
            appointments: appointments.len(),
            patients: distinct_patients(&appointments),
            latest_appointments: latest(appointments),
        };

        debug!(
            "Doctor {} dashboard: {} appointments, earnings {}",
            doctor_id, dashboard.appointments, dashboard.earnings
        );
        Ok(dashboard)
    }

    /// Totals are exact counts; only the newest rows are fetched.
    pub async fn admin_dashboard(&self) -> Result<AdminDashboard, AppointmentError> {
        let latest_appointments = self
            .db
            .appointments
            .list_appointments(AppointmentFilter::default().newest(LATEST_APPOINTMENTS))
            .await?;

        Ok(AdminDashboard {
            doctors: self.db.doctors.count_doctors().await?,
            appointments: self.db.appointments.count_appointments().await?,
            patients: self.db.patients.count_patients().await?,
            latest_appointments,
        })
    }
}

/// Completed or paid appointments count; cancellation does not subtract.
fn earnings(appointments: &[AppointmentRecord]) -> f64 {
    appointments
        .iter()
        .filter(|appointment| appointment.counts_towards_earnings())
        .map(|appointment| appointment.amount)
        .sum()
}

fn distinct_patients(appointments: &[AppointmentRecord]) -> usize {
    appointments
        .iter()
        .map(|appointment| appointment.user_id)
        .collect::<HashSet<_>>()
        .len()
}

fn latest(mut newest_first: Vec<AppointmentRecord>) -> Vec<AppointmentRecord> {
    newest_first.truncate(LATEST_APPOINTMENTS);
    newest_first
}
