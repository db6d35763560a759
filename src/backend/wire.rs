//! JSON shapes exchanged with the REST backend.
//!
//! Field names follow the backend's Spanish camelCase contract.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{DraftId, DraftTask, TaskStatus, TeamMember};

/// `GET /usuarioProyecto/proyecto/{id}` element.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRecord {
    pub id: i64,
    pub usuario: UserRecord,
    #[serde(default)]
    pub proyecto: Option<ProjectRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    #[serde(default)]
    pub nombre_usuario: String,
    #[serde(default)]
    pub correo: String,
    #[serde(default)]
    pub rol: Option<RoleRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleRecord {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: i64,
    #[serde(default)]
    pub nombre_proyecto: Option<String>,
}

impl From<MembershipRecord> for TeamMember {
    fn from(record: MembershipRecord) -> Self {
        TeamMember {
            id: record.usuario.id,
            membership_id: record.id,
            name: record.usuario.nombre_usuario,
            email: record.usuario.correo,
            role_id: record.usuario.rol.map(|r| r.id),
        }
    }
}

/// A task as returned by the suggestion endpoint. Every field is optional:
/// the records come from a language model and are not validated server side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub fecha_inicio: Option<NaiveDate>,
    #[serde(default)]
    pub fecha_fin_estimada: Option<NaiveDate>,
    #[serde(default)]
    pub prioridad: Option<i64>,
    #[serde(default)]
    pub estado_tarea_id: Option<i64>,
    #[serde(default)]
    pub proyecto_id: Option<i64>,
    #[serde(default)]
    pub sprint_id: Option<i64>,
    #[serde(default)]
    pub desarrollador_id: Option<i64>,
    #[serde(default)]
    pub historia_usuario_id: Option<i64>,
}

/// Values used where a suggested record leaves a field empty.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionDefaults {
    pub estimated_date: NaiveDate,
    pub project_id: i64,
    pub user_story_id: i64,
}

impl TaskRecord {
    pub fn into_draft(self, id: DraftId, defaults: &SuggestionDefaults) -> DraftTask {
        DraftTask {
            id,
            name: self.titulo.map(|t| t.trim().to_string()).unwrap_or_default(),
            description: self.descripcion.filter(|d| !d.trim().is_empty()),
            start_date: self.fecha_inicio,
            estimated_date: self.fecha_fin_estimada.unwrap_or(defaults.estimated_date),
            story_points: self
                .prioridad
                .and_then(|p| u32::try_from(p).ok())
                .unwrap_or(0),
            status: TaskStatus::from_code(self.estado_tarea_id),
            responsible_id: self.desarrollador_id.filter(|id| *id != 0),
            project_id: self.proyecto_id.unwrap_or(defaults.project_id),
            user_story_id: self.historia_usuario_id.unwrap_or(defaults.user_story_id),
        }
    }
}

/// `POST /tarea` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub titulo: String,
    pub descripcion: Option<String>,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin_estimada: NaiveDate,
    pub fecha_fin_real: Option<NaiveDate>,
    pub prioridad: u32,
    pub estado_tarea_id: i64,
    pub proyecto_id: i64,
    pub sprint_id: Option<i64>,
    pub desarrollador_id: i64,
    pub historia_usuario_id: i64,
}

/// The subset of the created task record the planner needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTask {
    pub id: i64,
    #[serde(default)]
    pub titulo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> SuggestionDefaults {
        SuggestionDefaults {
            estimated_date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            project_id: 3,
            user_story_id: 1,
        }
    }

    #[test]
    fn test_membership_record_maps_to_member() {
        let json = r#"{
            "id": 12,
            "usuario": {"id": 4, "nombreUsuario": "ana", "correo": "ana@x.io", "rol": {"id": 2}},
            "proyecto": {"id": 1, "nombreProyecto": "Oracle"}
        }"#;
        let record: MembershipRecord = serde_json::from_str(json).unwrap();
        let member = TeamMember::from(record);
        assert_eq!(member.id, 4);
        assert_eq!(member.membership_id, 12);
        assert_eq!(member.name, "ana");
        assert_eq!(member.email, "ana@x.io");
        assert_eq!(member.role_id, Some(2));
    }

    #[test]
    fn test_membership_record_tolerates_missing_role() {
        let json = r#"{"id": 1, "usuario": {"id": 9, "nombreUsuario": "bo"}}"#;
        let record: MembershipRecord = serde_json::from_str(json).unwrap();
        let member = TeamMember::from(record);
        assert_eq!(member.role_id, None);
        assert_eq!(member.email, "");
    }

    #[test]
    fn test_full_task_record_maps_to_draft() {
        let json = r#"{
            "titulo": " Login ",
            "descripcion": "OAuth flow",
            "fechaInicio": "2026-10-20",
            "fechaFinEstimada": "2026-10-25",
            "prioridad": 5,
            "estadoTareaId": 2,
            "proyectoId": 7,
            "sprintId": null,
            "desarrolladorId": 4,
            "historiaUsuarioId": 8
        }"#;
        let record: TaskRecord = serde_json::from_str(json).unwrap();
        let draft = record.into_draft(DraftId(1), &defaults());
        assert_eq!(draft.name, "Login");
        assert_eq!(draft.description.as_deref(), Some("OAuth flow"));
        assert_eq!(draft.start_date, NaiveDate::from_ymd_opt(2026, 10, 20));
        assert_eq!(draft.estimated_date, NaiveDate::from_ymd_opt(2026, 10, 25).unwrap());
        assert_eq!(draft.story_points, 5);
        assert_eq!(draft.status, TaskStatus::Doing);
        assert_eq!(draft.project_id, 7);
        assert_eq!(draft.responsible_id, Some(4));
        assert_eq!(draft.user_story_id, 8);
    }

    #[test]
    fn test_sparse_task_record_uses_defaults() {
        let record: TaskRecord =
            serde_json::from_str(r#"{"titulo": "x", "estadoTareaId": 7, "desarrolladorId": 0}"#)
                .unwrap();
        let draft = record.into_draft(DraftId(2), &defaults());
        assert_eq!(draft.status, TaskStatus::Todo);
        assert_eq!(draft.estimated_date, defaults().estimated_date);
        assert_eq!(draft.project_id, 3);
        assert_eq!(draft.user_story_id, 1);
        assert_eq!(draft.responsible_id, None);
        assert_eq!(draft.story_points, 0);
    }

    #[test]
    fn test_negative_priority_becomes_zero_points() {
        let record = TaskRecord {
            prioridad: Some(-2),
            ..Default::default()
        };
        assert_eq!(record.into_draft(DraftId(1), &defaults()).story_points, 0);
    }

    #[test]
    fn test_create_request_serializes_backend_names() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let request = CreateTaskRequest {
            titulo: "t".into(),
            descripcion: None,
            fecha_inicio: date,
            fecha_fin_estimada: date,
            fecha_fin_real: None,
            prioridad: 3,
            estado_tarea_id: 1,
            proyecto_id: 1,
            sprint_id: Some(2),
            desarrollador_id: 4,
            historia_usuario_id: 1,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["fechaInicio"], "2026-10-18");
        assert_eq!(value["desarrolladorId"], 4);
        assert_eq!(value["estadoTareaId"], 1);
        assert!(value["fechaFinReal"].is_null());
        assert_eq!(value["sprintId"], 2);
    }

    #[test]
    fn test_created_task_ignores_extra_fields() {
        let created: CreatedTask =
            serde_json::from_str(r#"{"id": 55, "titulo": "t", "estado": {"id": 1}}"#).unwrap();
        assert_eq!(created.id, 55);
    }
}
