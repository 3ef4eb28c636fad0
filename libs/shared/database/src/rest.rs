use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use urlencoding::encode;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::appointment::{AppointmentFilter, AppointmentRecord, AppointmentUpdate};
use shared_models::doctor::{DoctorRecord, DoctorUpdate};
use shared_models::patient::{PatientRecord, PatientUpdate};
use shared_models::slot::{group_booked_slots, BookedSlots, SlotKey, SlotReservation};

use crate::error::{DatabaseError, DbResult};
use crate::store::{AppointmentStore, DoctorStore, PatientStore, SlotStore};
use crate::supabase::SupabaseClient;

const DOCTORS: &str = "/rest/v1/doctors";
const PATIENTS: &str = "/rest/v1/patients";
const APPOINTMENTS: &str = "/rest/v1/appointments";
const RESERVATIONS: &str = "/rest/v1/slot_reservations";

/// Matches PostgREST's default `max-rows`; unbounded listings are fetched page by page.
const PAGE_SIZE: usize = 1000;
const NEWEST_FIRST: &str = "order=created_at.desc,id.desc";

/// Store backed by Supabase tables (see `schema.sql`).
pub struct SupabaseStore {
    supabase: SupabaseClient,
}

#[derive(Debug, Deserialize)]
struct BookedRow {
    slot_date: String,
    slot_time: String,
}

#[derive(Debug, Deserialize)]
struct HolderRow {
    appointment_id: Uuid,
}

fn slot_filter(key: &SlotKey) -> String {
    format!(
        "doctor_id=eq.{}&slot_date=eq.{}&slot_time=eq.{}",
        key.doctor_id,
        encode(&key.slot_date),
        encode(&key.slot_time)
    )
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub fn with_client(supabase: SupabaseClient) -> Self {
        Self { supabase }
    }

    async fn fetch_one<T>(&self, path: &str) -> DbResult<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut rows: Vec<T> = self.supabase.request(Method::GET, path, None).await?;
        Ok(if rows.is_empty() { None } else { Some(rows.swap_remove(0)) })
    }

    async fn insert_row<T>(&self, table: &str, row: &T) -> DbResult<T>
    where
        T: serde::Serialize + serde::de::DeserializeOwned,
    {
        let mut rows: Vec<T> = self
            .supabase
            .request_with_headers(
                Method::POST,
                table,
                Some(serde_json::to_value(row)?),
                Some(SupabaseClient::representation_headers()),
            )
            .await?;

        if rows.is_empty() {
            return Err(DatabaseError::Api {
                status: 200,
                message: format!("Insert into {} returned no rows", table),
            });
        }

        Ok(rows.swap_remove(0))
    }

    async fn patch_row<T, U>(&self, path: &str, update: &U) -> DbResult<Option<T>>
    where
        T: serde::de::DeserializeOwned,
        U: serde::Serialize,
    {
        let mut rows: Vec<T> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                path,
                Some(serde_json::to_value(update)?),
                Some(SupabaseClient::representation_headers()),
            )
            .await?;

        Ok(if rows.is_empty() { None } else { Some(rows.swap_remove(0)) })
    }

    async fn count(&self, table: &str) -> DbResult<usize> {
        self.supabase
            .count_exact(&format!("{}?select=id", table))
            .await
    }

    /// Follows `limit`/`offset` pages until a short page; `path` must already carry a query.
    async fn fetch_all<T>(&self, path: &str) -> DbResult<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut rows = Vec::new();
        let mut offset = 0;
        loop {
            let page: Vec<T> = self
                .supabase
                .request(
                    Method::GET,
                    &format!("{}&limit={}&offset={}", path, PAGE_SIZE, offset),
                    None,
                )
                .await?;
            let fetched = page.len();
            rows.extend(page);
            if fetched < PAGE_SIZE {
                return Ok(rows);
            }
            offset += fetched;
        }
    }
}

#[async_trait]
impl DoctorStore for SupabaseStore {
    async fn insert_doctor(&self, doctor: DoctorRecord) -> DbResult<DoctorRecord> {
        debug!("Inserting doctor {}", doctor.id);
        self.insert_row(DOCTORS, &doctor).await
    }

    async fn get_doctor(&self, id: Uuid) -> DbResult<Option<DoctorRecord>> {
        self.fetch_one(&format!("{}?id=eq.{}", DOCTORS, id)).await
    }

    async fn find_doctor_by_email(&self, email: &str) -> DbResult<Option<DoctorRecord>> {
        self.fetch_one(&format!("{}?email=eq.{}", DOCTORS, encode(email)))
            .await
    }

    async fn list_doctors(&self) -> DbResult<Vec<DoctorRecord>> {
        self.fetch_all(&format!("{}?order=created_at.asc,id.asc", DOCTORS))
            .await
    }

    async fn update_doctor(&self, id: Uuid, update: DoctorUpdate) -> DbResult<Option<DoctorRecord>> {
        if update.is_empty() {
            return self.get_doctor(id).await;
        }
        self.patch_row(&format!("{}?id=eq.{}", DOCTORS, id), &update)
            .await
    }

    async fn count_doctors(&self) -> DbResult<usize> {
        self.count(DOCTORS).await
    }
}

#[async_trait]
impl PatientStore for SupabaseStore {
    async fn insert_patient(&self, patient: PatientRecord) -> DbResult<PatientRecord> {
        debug!("Inserting patient {}", patient.id);
        self.insert_row(PATIENTS, &patient).await
    }

    async fn get_patient(&self, id: Uuid) -> DbResult<Option<PatientRecord>> {
        self.fetch_one(&format!("{}?id=eq.{}", PATIENTS, id)).await
    }

    async fn find_patient_by_email(&self, email: &str) -> DbResult<Option<PatientRecord>> {
        self.fetch_one(&format!("{}?email=eq.{}", PATIENTS, encode(email)))
            .await
    }

    async fn update_patient(&self, id: Uuid, update: PatientUpdate) -> DbResult<Option<PatientRecord>> {
        self.patch_row(&format!("{}?id=eq.{}", PATIENTS, id), &update)
            .await
    }

    async fn count_patients(&self) -> DbResult<usize> {
        self.count(PATIENTS).await
    }
}

#[async_trait]
impl AppointmentStore for SupabaseStore {
    async fn insert_appointment(&self, appointment: AppointmentRecord) -> DbResult<AppointmentRecord> {
        debug!("Inserting appointment {}", appointment.id);
        self.insert_row(APPOINTMENTS, &appointment).await
    }

    async fn get_appointment(&self, id: Uuid) -> DbResult<Option<AppointmentRecord>> {
        self.fetch_one(&format!("{}?id=eq.{}", APPOINTMENTS, id))
            .await
    }

    async fn list_appointments(&self, filter: AppointmentFilter) -> DbResult<Vec<AppointmentRecord>> {
        let mut query_parts = Vec::new();
        if let Some(user_id) = filter.user_id {
            query_parts.push(format!("user_id=eq.{}", user_id));
        }
        if let Some(doc_id) = filter.doc_id {
            query_parts.push(format!("doc_id=eq.{}", doc_id));
        }
        query_parts.push(NEWEST_FIRST.to_string());

        let path = format!("{}?{}", APPOINTMENTS, query_parts.join("&"));
        match filter.limit {
            Some(limit) => {
                self.supabase
                    .request(Method::GET, &format!("{}&limit={}", path, limit), None)
                    .await
            }
            None => self.fetch_all(&path).await,
        }
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        update: AppointmentUpdate,
    ) -> DbResult<Option<AppointmentRecord>> {
        self.patch_row(&format!("{}?id=eq.{}", APPOINTMENTS, id), &update)
            .await
    }

    async fn count_appointments(&self) -> DbResult<usize> {
        self.count(APPOINTMENTS).await
    }
}

#[async_trait]
impl SlotStore for SupabaseStore {
    async fn reserve_slot(&self, reservation: SlotReservation) -> DbResult<()> {
        // The unique (doctor_id, slot_date, slot_time) constraint turns a lost race into a 409.
        self.insert_row(RESERVATIONS, &reservation).await.map(|_| ())
    }

    async fn release_slot(&self, key: &SlotKey, holder: Option<Uuid>) -> DbResult<bool> {
        let mut path = format!("{}?{}", RESERVATIONS, slot_filter(key));
        if let Some(holder) = holder {
            path.push_str(&format!("&appointment_id=eq.{}", holder));
        }

        let removed: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::DELETE,
                &path,
                None,
                Some(SupabaseClient::representation_headers()),
            )
            .await?;

        Ok(!removed.is_empty())
    }

    async fn slot_holder(&self, key: &SlotKey) -> DbResult<Option<Uuid>> {
        let path = format!(
            "{}?{}&select=appointment_id&limit=1",
            RESERVATIONS,
            slot_filter(key)
        );
        let row: Option<HolderRow> = self.fetch_one(&path).await?;
        Ok(row.map(|row| row.appointment_id))
    }

    async fn booked_slots(&self, doctor_id: Uuid) -> DbResult<BookedSlots> {
        let path = format!(
            "{}?doctor_id=eq.{}&select=slot_date,slot_time",
            RESERVATIONS, doctor_id
        );
        let rows: Vec<BookedRow> = self.fetch_all(&path).await?;
        Ok(group_booked_slots(
            rows.into_iter().map(|row| (row.slot_date, row.slot_time)),
        ))
    }
}
