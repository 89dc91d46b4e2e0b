//! Scheduler de mantenimiento
//!
//! Dueño del ciclo de vida del registro de mantenimiento: clasificación de
//! vencimiento, baja (completar) y reagendamiento en la baja. Los estados
//! son `Scheduled` -> `Completed` (terminal); un registro jamás transiciona
//! hacia atrás, y el reagendamiento siempre crea un registro NUEVO.
//!
//! La planificación es pura (funciones de abajo); la persistencia la
//! ejecutan los repositorios. La baja y el alta del sucesor son dos
//! escrituras separadas, NO una transacción: un crash entre ambas deja un
//! registro completado sin sucesor. Es un límite aceptado y documentado;
//! el operador puede recrear el agendamiento a mano.

use std::collections::BTreeMap;

use sqlx::PgPool;

use crate::dto::maintenance_dto::{
    CompleteMaintenanceRequest, CompleteMaintenanceResponse, CreateMaintenanceRequest,
    CreateMaintenanceResponse, EditMaintenanceRequest, PendingMaintenanceResponse,
};
use crate::models::{DueStatus, MaintenanceDraft, MaintenanceRecord, MaintenanceStatus};
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::services::odometer_resolver::ResolvedOdometer;
use crate::utils::errors::AppError;

/// Separador con el que se concatenan notas en la baja
pub const NOTES_SEPARATOR: &str = " | ";

/// Clasificar un registro frente al odómetro actual.
///
/// `remaining < 0` -> Overdue; `0 <= remaining < threshold` -> Attention;
/// si no -> OnTrack. El umbral es configuración, no una constante.
pub fn classify(next_km_target: f64, current_odometer: f64, threshold: f64) -> DueStatus {
    let remaining = next_km_target - current_odometer;
    if remaining < 0.0 {
        DueStatus::Overdue
    } else if remaining < threshold {
        DueStatus::Attention
    } else {
        DueStatus::OnTrack
    }
}

/// Intervalo sugerido para reagendar: lo que separaba la meta anterior del
/// km en que se realizó. Si no es computable o no es positivo, cae al
/// default configurado.
pub fn suggested_interval(record: &MaintenanceRecord, default_interval: f64) -> f64 {
    match record.km_done {
        Some(base) if record.next_km_target - base > 0.0 => record.next_km_target - base,
        _ => default_interval,
    }
}

/// Concatenar una nota a las existentes; nunca pisa lo anterior
pub fn append_note(existing: &str, note: &str) -> String {
    if note.is_empty() {
        existing.to_string()
    } else if existing.is_empty() {
        note.to_string()
    } else {
        format!("{}{}{}", existing, NOTES_SEPARATOR, note)
    }
}

/// Resultado puro de planear una baja
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionPlan {
    pub km_done: f64,
    pub cost: f64,
    pub responsible: String,
    pub notes: String,
    pub reschedule_draft: Option<MaintenanceDraft>,
}

/// Planear la baja de un registro: campos finales del registro completado
/// y, si corresponde, el draft del sucesor agendado
/// (`next_km_target = km_done + interval`).
pub fn plan_completion(
    record: &MaintenanceRecord,
    request: &CompleteMaintenanceRequest,
    default_interval: f64,
) -> CompletionPlan {
    let cost = request.cost.unwrap_or(record.cost);
    let responsible = request
        .responsible
        .clone()
        .unwrap_or_else(|| record.responsible.clone());
    let notes = append_note(&record.notes, request.note.as_deref().unwrap_or(""));

    let reschedule_draft = if request.reschedule {
        let interval = match request.interval_km {
            Some(i) if i > 0.0 => i,
            _ => suggested_interval(record, default_interval),
        };
        Some(MaintenanceDraft {
            plate: record.plate.clone(),
            service_type: record.service_type.clone(),
            km_done: None,
            date_done: None,
            next_km_target: request.km_done + interval,
            responsible: responsible.clone(),
            cost: 0.0,
            notes: "Auto-scheduled on completion".to_string(),
            status: MaintenanceStatus::Scheduled,
        })
    } else {
        None
    };

    CompletionPlan {
        km_done: request.km_done,
        cost,
        responsible,
        notes,
        reschedule_draft,
    }
}

/// Planear un alta: registro principal y, si se pidió, el sucesor agendado
pub fn plan_creation(
    request: &CreateMaintenanceRequest,
) -> (MaintenanceDraft, Option<MaintenanceDraft>) {
    let next_km_target = request.km_base + request.interval_km;

    let main = MaintenanceDraft {
        plate: request.plate.clone(),
        service_type: request.service_type.clone(),
        km_done: request.already_performed.then_some(request.km_base),
        date_done: if request.already_performed {
            request.date_done
        } else {
            None
        },
        next_km_target,
        responsible: request.responsible.clone().unwrap_or_default(),
        cost: request.cost.unwrap_or(0.0),
        notes: request.notes.clone().unwrap_or_default(),
        status: if request.already_performed {
            MaintenanceStatus::Completed
        } else {
            MaintenanceStatus::Scheduled
        },
    };

    // El sucesor solo tiene sentido cuando el alta entra directo al histórico
    let followup = (request.already_performed && request.auto_schedule).then(|| MaintenanceDraft {
        plate: request.plate.clone(),
        service_type: request.service_type.clone(),
        km_done: None,
        date_done: None,
        next_km_target,
        responsible: String::new(),
        cost: 0.0,
        notes: "Auto-scheduled".to_string(),
        status: MaintenanceStatus::Scheduled,
    });

    (main, followup)
}

/// Ordenar los pendientes por km restante ascendente (lo más vencido o más
/// próximo primero) y clasificarlos
pub fn rank_pending(
    records: Vec<MaintenanceRecord>,
    odometers: &BTreeMap<String, ResolvedOdometer>,
    threshold: f64,
    default_interval: f64,
) -> Vec<PendingMaintenanceResponse> {
    let mut pending: Vec<PendingMaintenanceResponse> = records
        .into_iter()
        .map(|record| {
            let current = odometers
                .get(&record.plate)
                .map(|r| r.odometer)
                .unwrap_or(0.0);
            let remaining = record.next_km_target - current;
            PendingMaintenanceResponse {
                id: record.id,
                plate: record.plate.clone(),
                service_type: record.service_type.clone(),
                next_km_target: record.next_km_target,
                responsible: record.responsible.clone(),
                current_odometer: current,
                remaining_km: remaining,
                due_status: classify(record.next_km_target, current, threshold),
                suggested_interval_km: suggested_interval(&record, default_interval),
            }
        })
        .collect();

    pending.sort_by(|a, b| {
        a.remaining_km
            .partial_cmp(&b.remaining_km)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    pending
}

pub struct MaintenanceScheduler {
    repository: MaintenanceRepository,
    due_threshold_km: f64,
    default_interval_km: f64,
}

impl MaintenanceScheduler {
    pub fn new(pool: PgPool, due_threshold_km: f64, default_interval_km: f64) -> Self {
        Self {
            repository: MaintenanceRepository::new(pool),
            due_threshold_km,
            default_interval_km,
        }
    }

    /// Pendientes clasificados y ordenados por urgencia
    pub async fn list_pending(
        &self,
        odometers: &BTreeMap<String, ResolvedOdometer>,
    ) -> Result<Vec<PendingMaintenanceResponse>, AppError> {
        let records = self.repository.find_pending().await?;
        Ok(rank_pending(
            records,
            odometers,
            self.due_threshold_km,
            self.default_interval_km,
        ))
    }

    /// Histórico de completados
    pub async fn list_history(&self) -> Result<Vec<MaintenanceRecord>, AppError> {
        self.repository.find_completed().await
    }

    /// Dar de baja un registro agendado, opcionalmente reagendando el
    /// sucesor. Dos escrituras, no transaccionales (ver doc del módulo).
    pub async fn complete(
        &self,
        id: i64,
        request: CompleteMaintenanceRequest,
    ) -> Result<CompleteMaintenanceResponse, AppError> {
        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance record {} not found", id)))?;

        if record.is_completed() {
            // Un registro completado es terminal: para la baja no existe
            return Err(AppError::NotFound(format!(
                "Maintenance record {} is already completed",
                id
            )));
        }

        let plan = plan_completion(&record, &request, self.default_interval_km);

        let completed = self
            .repository
            .mark_completed(
                id,
                plan.km_done,
                request.date_done,
                plan.cost,
                &plan.responsible,
                &plan.notes,
            )
            .await?;
        log::info!("✅ O.S. {} dada de baja ({})", id, completed.plate);

        let rescheduled = match plan.reschedule_draft {
            Some(draft) => {
                let created = self.repository.insert(&draft).await?;
                log::info!(
                    "🔄 Reagendado {} de {} para {} km",
                    created.service_type,
                    created.plate,
                    created.next_km_target
                );
                Some(created)
            }
            None => None,
        };

        Ok(CompleteMaintenanceResponse {
            completed,
            rescheduled,
        })
    }

    /// Alta de un registro (agendado, o directo al histórico si ya se
    /// realizó), con sucesor opcional
    pub async fn create(
        &self,
        request: CreateMaintenanceRequest,
    ) -> Result<CreateMaintenanceResponse, AppError> {
        let (main_draft, followup_draft) = plan_creation(&request);

        let created = self.repository.insert(&main_draft).await?;
        log::info!(
            "💾 Registro {} creado: {} / {} ({})",
            created.id,
            created.plate,
            created.service_type,
            created.status
        );

        let scheduled_followup = match followup_draft {
            Some(draft) => Some(self.repository.insert(&draft).await?),
            None => None,
        };

        Ok(CreateMaintenanceResponse {
            created,
            scheduled_followup,
        })
    }

    /// Edición in-place; no altera el status
    pub async fn edit(
        &self,
        id: i64,
        request: EditMaintenanceRequest,
    ) -> Result<MaintenanceRecord, AppError> {
        self.repository
            .update_fields(
                id,
                request.plate,
                request.service_type,
                request.responsible,
                request.km_done,
                request.next_km_target,
                request.cost,
                request.notes,
            )
            .await
    }

    /// Borrado permanente
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.repository.delete(id).await?;
        log::info!("🗑️ Registro {} eliminado", id);
        Ok(())
    }
}
